//! Batched audio-feature retrieval with partial-failure tolerance.
//!
//! The pipeline here is deliberately sequential: partition the track ids
//! into fixed-size chunks, request one chunk at a time, retry transient
//! failures a bounded number of times, and when a chunk is beyond saving
//! emit null-feature rows for its members instead of failing the whole run.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config,
    management::TokenManager,
    recommend::FEATURE_COUNT,
    types::{AudioFeatures, AudioFeaturesResponse},
    warning,
};

/// Default number of track ids per `GET /audio-features` request.
///
/// The endpoint accepts up to 100 ids; 50 keeps URLs short and has behaved
/// well against rate limits.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Retry behavior for a single feature chunk.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per chunk before giving up on it.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Pacing delay between chunk requests.
    pub chunk_pacing: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            retry_delay: Duration::from_secs(2),
            chunk_pacing: Duration::from_millis(500),
        }
    }
}

/// One fetched feature vector, keyed by track id.
///
/// `values` follows [`crate::recommend::FEATURE_COLUMNS`] order; a track the
/// vendor could not analyze (or whose chunk failed) carries all-null values.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub id: String,
    pub values: [Option<f64>; FEATURE_COUNT],
}

impl FeatureRow {
    pub fn null(id: String) -> Self {
        FeatureRow {
            id,
            values: [None; FEATURE_COUNT],
        }
    }
}

/// Source of audio features for one chunk of track ids.
///
/// The production implementation is [`SpotifyFeatureSource`]; tests provide
/// scripted sources to exercise the retry and degradation logic without a
/// network.
pub trait FeatureSource {
    /// Fetches feature entries for one chunk of ids.
    ///
    /// The result is positional per the vendor response and may contain
    /// `None` entries for unanalyzable tracks; callers must align entries to
    /// ids via the entry's own `id` field, not by position.
    async fn chunk_features(
        &mut self,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, String>;
}

/// Fetches feature vectors for all `track_ids`, one chunk at a time.
///
/// Guarantees exactly one [`FeatureRow`] per input id, in input order. A
/// chunk whose requests keep failing past the retry budget contributes
/// all-null rows; an entry the vendor returns as `null` likewise becomes an
/// all-null row. No failure mode aborts the run.
pub async fn collect_features<S: FeatureSource>(
    source: &mut S,
    track_ids: &[String],
    chunk_size: usize,
    policy: &RetryPolicy,
) -> Vec<FeatureRow> {
    let chunk_size = chunk_size.max(1);
    let mut rows: Vec<FeatureRow> = Vec::with_capacity(track_ids.len());

    for chunk in track_ids.chunks(chunk_size) {
        match fetch_chunk_with_retry(source, chunk, policy).await {
            Some(entries) => {
                for id in chunk {
                    let row = entries
                        .iter()
                        .flatten()
                        .find(|f| f.id.as_deref() == Some(id.as_str()))
                        .map(|f| FeatureRow {
                            id: id.clone(),
                            values: f.values(),
                        })
                        .unwrap_or_else(|| FeatureRow::null(id.clone()));
                    rows.push(row);
                }
            }
            None => {
                warning!(
                    "No audio features for a chunk of {} tracks after {} attempts, keeping null rows",
                    chunk.len(),
                    policy.attempts
                );
                rows.extend(chunk.iter().cloned().map(FeatureRow::null));
            }
        }

        if policy.chunk_pacing > Duration::ZERO {
            sleep(policy.chunk_pacing).await;
        }
    }

    rows
}

async fn fetch_chunk_with_retry<S: FeatureSource>(
    source: &mut S,
    chunk: &[String],
    policy: &RetryPolicy,
) -> Option<Vec<Option<AudioFeatures>>> {
    for attempt in 1..=policy.attempts.max(1) {
        match source.chunk_features(chunk).await {
            Ok(entries) => return Some(entries),
            Err(e) => {
                if attempt < policy.attempts {
                    warning!(
                        "Audio features request failed (attempt {}/{}): {}",
                        attempt,
                        policy.attempts,
                        e
                    );
                    sleep(policy.retry_delay).await;
                }
            }
        }
    }

    None
}

/// [`FeatureSource`] backed by the Spotify `GET /audio-features` endpoint.
pub struct SpotifyFeatureSource {
    token_mgr: TokenManager,
}

impl SpotifyFeatureSource {
    pub fn new(token_mgr: TokenManager) -> Self {
        SpotifyFeatureSource { token_mgr }
    }
}

impl FeatureSource for SpotifyFeatureSource {
    async fn chunk_features(
        &mut self,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, String> {
        let token = self.token_mgr.get_valid_token().await;
        let api_url = format!(
            "{uri}/audio-features?ids={ids}",
            uri = &config::spotify_apiurl(),
            ids = ids.join(",")
        );

        let client = Client::new();
        let response = client
            .get(&api_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        // check for retry-after header
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            if let Some(retry_after) = response.headers().get("retry-after") {
                let retry_after = retry_after
                    .to_str()
                    .unwrap_or("0")
                    .parse::<u64>()
                    .unwrap_or(0);
                if retry_after <= 120 {
                    sleep(Duration::from_secs(retry_after)).await;
                } else {
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds. Try again tomorrow.",
                        retry_after
                    );
                }
            }
            return Err("rate limited (429)".to_string());
        }

        let response = response.error_for_status().map_err(|e| e.to_string())?;
        let json = response
            .json::<AudioFeaturesResponse>()
            .await
            .map_err(|e| e.to_string())?;

        Ok(json.audio_features)
    }
}
