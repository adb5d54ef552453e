use reqwest::Client;

use crate::{config, types::CurrentUser};

/// Retrieves the authenticated user's profile via `GET /me`.
///
/// Used right after authentication to confirm whose library the tool is
/// about to read, and by `sporeccli info --me`.
pub async fn get_current_user(token: &str) -> Result<CurrentUser, reqwest::Error> {
    let api_url = format!("{uri}/me", uri = &config::spotify_apiurl());

    let client = Client::new();
    let response = client
        .get(&api_url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?;

    let user = response.json::<CurrentUser>().await?;
    Ok(user)
}
