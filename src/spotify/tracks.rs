use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config, error,
    management::TokenManager,
    types::{SavedTracksResponse, SeveralTracksResponse, Track},
    warning,
};

/// Page size for `GET /me/tracks`; the endpoint's maximum.
pub const SAVED_TRACKS_PAGE_SIZE: u32 = 50;

/// Retrieves one page of the user's saved tracks from the Spotify Web API.
///
/// Uses offset pagination at up to [`SAVED_TRACKS_PAGE_SIZE`] items per
/// request. Handles rate limiting by honoring the `Retry-After` header and
/// retries 502 Bad Gateway responses with a 10-second delay; other errors
/// are propagated to the caller.
///
/// # Arguments
///
/// * `token` - Valid access token for Spotify API authentication
/// * `limit` - Maximum number of tracks to return in this request (1-50)
/// * `offset` - Index of the first track to return
///
/// # Example
///
/// ```
/// let page = get_saved_tracks_page(&token, 50, 0).await?;
/// println!("library holds {:?} tracks", page.total);
/// ```
pub async fn get_saved_tracks_page(
    token: &str,
    limit: u32,
    offset: u32,
) -> Result<SavedTracksResponse, reqwest::Error> {
    loop {
        let api_url = format!(
            "{uri}/me/tracks?limit={limit}&offset={offset}",
            uri = &config::spotify_apiurl(),
            limit = limit,
            offset = offset
        );

        let client = Client::new();
        let response = client.get(&api_url).bearer_auth(token).send().await;

        let response = match response {
            Ok(resp) => {
                if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                    if let Some(retry_after) = resp.headers().get("retry-after") {
                        let retry_after = retry_after
                            .to_str()
                            .unwrap_or("0")
                            .parse::<u64>()
                            .unwrap_or(0);
                        if retry_after <= 120 {
                            sleep(Duration::from_secs(retry_after)).await;
                            continue; // retry
                        }
                        warning!(
                            "Retry after has reached an abnormal high of {} seconds.",
                            retry_after
                        );
                    }
                }

                match resp.error_for_status() {
                    Ok(valid_response) => valid_response,
                    Err(err) => {
                        if let Some(status) = err.status() {
                            if status == StatusCode::BAD_GATEWAY {
                                sleep(Duration::from_secs(10)).await;
                                continue; // retry
                            }
                        }
                        return Err(err); // propagate other errors
                    }
                }
            }
            Err(err) => {
                return Err(err);
            } // network or reqwest error
        };

        let res = response.json::<SavedTracksResponse>().await?;
        return Ok(res);
    }
}

/// Retrieves the total count of the user's saved tracks.
///
/// Makes a minimal `limit=1` request to read the total from the response
/// metadata without fetching the library. Loads the token from the token
/// manager and shows a spinner while the request is in flight. If no valid
/// token is found the program terminates with a pointer to `sporeccli auth`.
pub async fn get_total_saved_count() -> Result<u64, reqwest::Error> {
    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run sporeccli auth\n Error: {}",
                e
            );
        }
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching saved tracks count...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    loop {
        let token = token_mgr.get_valid_token().await;
        let api_url = format!(
            "{uri}/me/tracks?limit=1",
            uri = &config::spotify_apiurl()
        );

        let client = Client::new();
        let response = client.get(&api_url).bearer_auth(token).send().await;

        let response = match response {
            Ok(resp) => match resp.error_for_status() {
                Ok(valid_response) => valid_response,
                Err(err) => {
                    if let Some(status) = err.status() {
                        if status == StatusCode::BAD_GATEWAY {
                            sleep(Duration::from_secs(10)).await;
                            continue; // retry
                        }
                    }

                    pb.finish_and_clear();
                    return Err(err); // propagate other errors
                }
            },
            Err(err) => {
                pb.finish_and_clear();
                return Err(err);
            } // network or reqwest error
        };

        pb.finish_and_clear();
        let res = response.json::<SavedTracksResponse>().await?;

        return Ok(res.total.unwrap_or(0));
    }
}

/// Retrieves metadata for multiple tracks in a single API request.
///
/// Batch lookup over `GET /tracks` for up to 50 ids per call, used to
/// backfill display fields when a saved-track payload arrives incomplete.
/// Unknown ids come back as `None` entries.
///
/// Retries 502 Bad Gateway with a 10-second delay; other errors are
/// propagated.
pub async fn get_several_tracks(track_ids: &[String]) -> Result<Vec<Option<Track>>, reqwest::Error> {
    let api_url = format!(
        "{url}/tracks?ids={ids}",
        url = &config::spotify_apiurl(),
        ids = track_ids.join(",")
    );

    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run sporeccli auth\n Error: {}",
                e
            );
        }
    };

    loop {
        let client = Client::new();
        let token = token_mgr.get_valid_token().await;
        let response = client.get(&api_url).bearer_auth(token).send().await;

        let response = match response {
            Ok(resp) => match resp.error_for_status() {
                Ok(valid_response) => valid_response,
                Err(err) => {
                    if let Some(status) = err.status() {
                        if status == StatusCode::BAD_GATEWAY {
                            sleep(Duration::from_secs(10)).await;
                            continue; // retry
                        }
                    }

                    return Err(err); // propagate other errors
                }
            },
            Err(err) => {
                return Err(err);
            } // network or reqwest error
        };

        let json = response.json::<SeveralTracksResponse>().await?;
        return Ok(json.tracks);
    }
}
