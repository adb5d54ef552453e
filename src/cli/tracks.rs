use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error,
    management::TokenManager,
    recommend, spotify, success,
    types::{SavedTrack, Track, TrackTableRow},
    warning,
};

/// Default cap on how much of the library is fetched.
pub const DEFAULT_LIBRARY_LIMIT: u32 = 200;

pub async fn list_tracks(limit: Option<u32>) {
    let saved = match fetch_saved_tracks(limit.unwrap_or(DEFAULT_LIBRARY_LIMIT)).await {
        Ok(saved) => saved,
        Err(e) => error!("Failed to fetch saved tracks: {}", e),
    };

    if saved.is_empty() {
        warning!("No saved tracks found. Save some songs on Spotify first.");
        return;
    }

    let table_rows: Vec<TrackTableRow> = saved
        .iter()
        .map(|t| TrackTableRow {
            track: t.name.clone(),
            artist: t.artist.clone(),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
    success!("{} saved tracks", saved.len());
}

/// Fetches up to `max` saved tracks, page by page, and flattens them into
/// library records.
///
/// Saved items whose track payload has an id but an empty name are
/// backfilled through a batched `GET /tracks` metadata lookup. Local files
/// (tracks without an id) are dropped with a warning since they can never be
/// joined against audio features.
pub(crate) async fn fetch_saved_tracks(max: u32) -> Result<Vec<SavedTrack>, reqwest::Error> {
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
    pb.set_message("Fetching saved tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut tracks: Vec<Track> = Vec::new();
    let mut offset: u32 = 0;

    loop {
        let remaining = max.saturating_sub(tracks.len() as u32);
        if remaining == 0 {
            break;
        }
        let page_size = remaining.min(spotify::tracks::SAVED_TRACKS_PAGE_SIZE);

        let token = token_mgr.get_valid_token().await;
        let page = match spotify::tracks::get_saved_tracks_page(&token, page_size, offset).await {
            Ok(page) => page,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        let fetched = page.items.len() as u32;
        tracks.extend(page.items.into_iter().filter_map(|item| item.track));
        pb.set_message(format!("Fetched {} saved tracks...", tracks.len()));

        offset += fetched;
        if fetched < page_size || page.next.is_none() {
            break;
        }
    }

    pb.finish_and_clear();

    backfill_track_names(&mut tracks).await;

    let saved = recommend::flatten_saved_tracks(&tracks);
    let dropped = tracks.len() - saved.len();
    if dropped > 0 {
        warning!("Skipped {} local tracks without a Spotify id.", dropped);
    }

    Ok(saved)
}

/// Fills in display fields for tracks that arrived with an id but no name.
///
/// Failures here only warn; a missing display name is not worth aborting a
/// run over.
async fn backfill_track_names(tracks: &mut [Track]) {
    let missing_ids: Vec<String> = tracks
        .iter()
        .filter(|t| t.name.is_empty())
        .filter_map(|t| t.id.clone())
        .collect();

    if missing_ids.is_empty() {
        return;
    }

    let fetched = match spotify::tracks::get_several_tracks(&missing_ids).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warning!("Metadata lookup for {} tracks failed: {}", missing_ids.len(), e);
            return;
        }
    };

    for full in fetched.into_iter().flatten() {
        if let Some(track) = tracks
            .iter_mut()
            .find(|t| t.id == full.id && t.name.is_empty())
        {
            *track = full;
        }
    }
}
