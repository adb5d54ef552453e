use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::tracks::{DEFAULT_LIBRARY_LIMIT, fetch_saved_tracks},
    error, info,
    management::TokenManager,
    recommend::{build_feature_table, recommend_from_song},
    spotify::features::{
        DEFAULT_CHUNK_SIZE, RetryPolicy, SpotifyFeatureSource, collect_features,
    },
    success,
    types::RecommendationTableRow,
    utils, warning,
};

const DEFAULT_TOP_N: usize = 5;

/// Runs the whole recommendation pipeline for one query song.
///
/// Fetches the saved-track library, retrieves audio features chunk by chunk
/// (degrading failed chunks to null rows), joins the two tables, and prints
/// the top similar tracks with their Spotify links.
pub async fn recommend(
    song: String,
    top: Option<usize>,
    limit: Option<u32>,
    chunk_size: Option<usize>,
) {
    let saved = match fetch_saved_tracks(limit.unwrap_or(DEFAULT_LIBRARY_LIMIT)).await {
        Ok(saved) => saved,
        Err(e) => error!("Failed to fetch saved tracks: {}", e),
    };

    if saved.is_empty() {
        warning!("No saved tracks found. Save some songs on Spotify first.");
        return;
    }
    info!("Found {} saved tracks", saved.len());

    let mut track_ids: Vec<String> = Vec::with_capacity(saved.len());
    for track in &saved {
        match utils::extract_track_id(&track.uri) {
            Some(id) => track_ids.push(id),
            None => warning!("Skipping malformed track reference: {}", track.uri),
        }
    }

    let token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run sporeccli auth\n Error: {}",
                e
            );
        }
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!(
        "Analyzing audio features for {} tracks...",
        track_ids.len()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut source = SpotifyFeatureSource::new(token_mgr);
    let feature_rows = collect_features(
        &mut source,
        &track_ids,
        chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
        &RetryPolicy::default(),
    )
    .await;

    pb.finish_and_clear();

    let table = build_feature_table(&saved, &feature_rows);

    let unanalyzed = table.iter().filter(|row| row.is_unanalyzed()).count();
    if unanalyzed > 0 {
        warning!("{} tracks are missing audio features", unanalyzed);
    }
    success!("Combined {} tracks with audio features", table.len());

    let recommendations = recommend_from_song(&song, &table, top.unwrap_or(DEFAULT_TOP_N));

    if recommendations.is_empty() {
        warning!(
            "No recommendations found for '{}'. Try a different song from your library.",
            song
        );
        return;
    }

    let table_rows: Vec<RecommendationTableRow> = recommendations
        .iter()
        .enumerate()
        .map(|(idx, rec)| RecommendationTableRow {
            rank: idx + 1,
            track: rec.track.name.clone(),
            artist: rec.track.artist.clone(),
            score: format!("{:.3}", rec.score),
            link: rec.track.link.clone(),
        })
        .collect();

    let out = Table::new(table_rows);
    println!("{}", out);
}
