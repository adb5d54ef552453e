use crate::{error, info, management::TokenManager, spotify, warning};

/// Displays information about the authenticated user and their library.
///
/// `--me` prints the current user's display name and id; `--library` prints
/// the saved-track count straight from the API metadata. Flags are evaluated
/// in that order and the first match wins.
pub async fn info(me: bool, library: bool) {
    if me {
        let mut token_mgr = match TokenManager::load().await {
            Ok(t) => t,
            Err(e) => {
                error!(
                    "Failed to load token. Please run sporeccli auth\n Error: {}",
                    e
                );
            }
        };

        let token = token_mgr.get_valid_token().await;
        match spotify::user::get_current_user(&token).await {
            Ok(user) => {
                info!(
                    "Authenticated as: {}",
                    user.display_name.clone().unwrap_or_else(|| user.id.clone())
                );
                info!("User id: {}", user.id);
            }
            Err(e) => error!("Failed to fetch user profile: {}", e),
        }
        return;
    }

    if library {
        match spotify::tracks::get_total_saved_count().await {
            Ok(count) => info!("Saved tracks in library: {}", count),
            Err(e) => error!("Failed to fetch saved tracks count: {}", e),
        }
        return;
    }

    warning!("Nothing to show. Try --me or --library.");
}
