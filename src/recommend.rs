//! Similarity-based track recommendation.
//!
//! Implements the data-science half of the pipeline: joining saved tracks to
//! their audio feature vectors, standardizing every feature column to zero
//! mean and unit variance across the whole table, and ranking tracks by
//! cosine similarity against a query track picked by name.
//!
//! All functions here are pure and operate on in-memory tables; network
//! access and token handling live in [`crate::spotify`].

use crate::{
    spotify::features::FeatureRow,
    types::{SavedTrack, Track},
};

/// The audio feature columns used for similarity, in vector order.
///
/// This is the superset of columns Spotify's `GET /audio-features` endpoint
/// returns as numeric values. The order is load-bearing: it matches
/// [`crate::types::AudioFeatures::values`] and the feature arrays carried by
/// [`FeatureRow`] and [`TrackFeatureRow`].
pub const FEATURE_COLUMNS: [&str; 13] = [
    "danceability",
    "energy",
    "key",
    "loudness",
    "mode",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_ms",
    "time_signature",
];

/// Number of feature columns; the fixed width of every feature vector.
pub const FEATURE_COUNT: usize = FEATURE_COLUMNS.len();

/// One row of the combined table: a saved track joined to its (possibly
/// partially or entirely missing) audio feature vector.
#[derive(Debug, Clone)]
pub struct TrackFeatureRow {
    pub track: SavedTrack,
    pub features: [Option<f64>; FEATURE_COUNT],
}

impl TrackFeatureRow {
    /// True when not a single feature value is known for this track.
    pub fn is_unanalyzed(&self) -> bool {
        self.features.iter().all(|v| v.is_none())
    }
}

/// A recommended track with its cosine similarity score against the query.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub track: SavedTrack,
    pub score: f64,
}

/// Left-joins saved tracks to fetched feature rows on track id.
///
/// The output preserves the saved-track order and has exactly one row per
/// saved track. Tracks without a matching feature row keep a row with all
/// feature values null rather than being dropped.
pub fn build_feature_table(
    saved_tracks: &[SavedTrack],
    feature_rows: &[FeatureRow],
) -> Vec<TrackFeatureRow> {
    saved_tracks
        .iter()
        .map(|track| {
            let features = feature_rows
                .iter()
                .find(|row| row.id == track.id)
                .map(|row| row.values)
                .unwrap_or([None; FEATURE_COUNT]);

            TrackFeatureRow {
                track: track.clone(),
                features,
            }
        })
        .collect()
}

/// Recommends up to `top_n` tracks similar to the track named `song_name`.
///
/// The query is matched against track names case-insensitively: an exact
/// match wins, otherwise the first row whose name contains the query is
/// used. Missing feature values are imputed to zero, every column is then
/// standardized to zero mean and unit variance over the whole table, and the
/// query row is compared to every other row by cosine similarity.
///
/// Results are sorted by descending score; equal scores keep their original
/// table order (the sort is stable). The query track itself is excluded.
///
/// Returns an empty vector when the table is empty, the query does not match
/// any row, or the table carries no feature values at all.
pub fn recommend_from_song(
    song_name: &str,
    table: &[TrackFeatureRow],
    top_n: usize,
) -> Vec<Recommendation> {
    if table.is_empty() || top_n == 0 {
        return Vec::new();
    }

    if table.iter().all(|row| row.is_unanalyzed()) {
        return Vec::new();
    }

    let Some(query_idx) = find_query_row(song_name, table) else {
        return Vec::new();
    };

    let matrix = standardized_matrix(table);
    let query_vec = &matrix[query_idx];

    let mut scored: Vec<(usize, f64)> = matrix
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != query_idx)
        .map(|(idx, row)| (idx, cosine_similarity(query_vec, row)))
        .collect();

    // sort_by is stable, so ties keep original row order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_n);

    scored
        .into_iter()
        .map(|(idx, score)| Recommendation {
            track: table[idx].track.clone(),
            score,
        })
        .collect()
}

/// Finds the row index for a query string.
///
/// Exact case-insensitive name match takes priority; substring match is the
/// fallback. First match wins in both passes.
fn find_query_row(song_name: &str, table: &[TrackFeatureRow]) -> Option<usize> {
    let needle = song_name.to_lowercase();

    if let Some(idx) = table
        .iter()
        .position(|row| row.track.name.to_lowercase() == needle)
    {
        return Some(idx);
    }

    table
        .iter()
        .position(|row| row.track.name.to_lowercase().contains(&needle))
}

/// Standardizes every feature column to zero mean and unit variance.
///
/// Missing values are imputed to 0.0 before scaling, matching the join
/// semantics of [`build_feature_table`]. Columns with zero variance map to
/// all zeros instead of dividing by zero.
fn standardized_matrix(table: &[TrackFeatureRow]) -> Vec<[f64; FEATURE_COUNT]> {
    let n = table.len() as f64;

    let mut imputed: Vec<[f64; FEATURE_COUNT]> = table
        .iter()
        .map(|row| row.features.map(|v| v.unwrap_or(0.0)))
        .collect();

    for col in 0..FEATURE_COUNT {
        let mean = imputed.iter().map(|row| row[col]).sum::<f64>() / n;
        let variance = imputed
            .iter()
            .map(|row| (row[col] - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        for row in imputed.iter_mut() {
            row[col] = if std_dev > f64::EPSILON {
                (row[col] - mean) / std_dev
            } else {
                0.0
            };
        }
    }

    imputed
}

/// Cosine similarity of two equal-length vectors.
///
/// Zero-magnitude vectors have no direction; any comparison involving one
/// scores 0.0.
fn cosine_similarity(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if mag_a <= f64::EPSILON || mag_b <= f64::EPSILON {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Flattens raw saved-track API payloads into library records.
///
/// Tracks without an id (local files) are dropped; the caller decides how to
/// report them.
pub fn flatten_saved_tracks(tracks: &[Track]) -> Vec<SavedTrack> {
    tracks.iter().filter_map(SavedTrack::from_track).collect()
}
