use std::collections::{HashMap, HashSet};
use std::time::Duration;

use sporeccli::recommend::FEATURE_COUNT;
use sporeccli::spotify::features::{FeatureSource, RetryPolicy, collect_features};
use sporeccli::types::AudioFeatures;

// Retry policy without real sleeps, for fast tests
fn test_policy(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        attempts,
        retry_delay: Duration::ZERO,
        chunk_pacing: Duration::ZERO,
    }
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn features_for(id: &str) -> AudioFeatures {
    AudioFeatures {
        id: Some(id.to_string()),
        danceability: Some(0.5),
        energy: Some(0.6),
        key: Some(4.0),
        loudness: Some(-7.2),
        mode: Some(1.0),
        speechiness: Some(0.05),
        acousticness: Some(0.2),
        instrumentalness: Some(0.0),
        liveness: Some(0.1),
        valence: Some(0.7),
        tempo: Some(120.0),
        duration_ms: Some(210_000.0),
        time_signature: Some(4.0),
    }
}

/// Scripted feature source keyed by the first id of each chunk.
struct ScriptedSource {
    /// Chunks whose first id is listed here always fail
    failing_chunks: HashSet<String>,
    /// Chunks whose first id is listed here fail this many times first
    flaky_chunks: HashMap<String, u32>,
    /// Ids the vendor returns as null entries
    null_entries: HashSet<String>,
    /// Return chunk entries in reverse order to exercise id alignment
    reverse_responses: bool,
    /// Every chunk request seen, in order
    calls: Vec<Vec<String>>,
}

impl ScriptedSource {
    fn ok() -> Self {
        ScriptedSource {
            failing_chunks: HashSet::new(),
            flaky_chunks: HashMap::new(),
            null_entries: HashSet::new(),
            reverse_responses: false,
            calls: Vec::new(),
        }
    }
}

impl FeatureSource for ScriptedSource {
    async fn chunk_features(
        &mut self,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, String> {
        self.calls.push(ids.to_vec());

        let first = ids.first().cloned().unwrap_or_default();
        if self.failing_chunks.contains(&first) {
            return Err("simulated outage".to_string());
        }
        if let Some(remaining) = self.flaky_chunks.get_mut(&first) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err("simulated timeout".to_string());
            }
        }

        let mut entries: Vec<Option<AudioFeatures>> = ids
            .iter()
            .map(|id| {
                if self.null_entries.contains(id) {
                    None
                } else {
                    Some(features_for(id))
                }
            })
            .collect();

        if self.reverse_responses {
            entries.reverse();
        }

        Ok(entries)
    }
}

#[tokio::test]
async fn test_one_row_per_input_in_input_order() {
    let track_ids = ids(&["t1", "t2", "t3", "t4", "t5"]);
    let mut source = ScriptedSource::ok();

    let rows = collect_features(&mut source, &track_ids, 2, &test_policy(3)).await;

    assert_eq!(rows.len(), track_ids.len());
    for (row, id) in rows.iter().zip(track_ids.iter()) {
        assert_eq!(&row.id, id);
        assert!(row.values.iter().all(|v| v.is_some()));
        assert_eq!(row.values.len(), FEATURE_COUNT);
    }

    // 5 ids at chunk size 2 means 3 requests
    assert_eq!(source.calls.len(), 3);
    assert_eq!(source.calls[0], ids(&["t1", "t2"]));
    assert_eq!(source.calls[2], ids(&["t5"]));
}

#[tokio::test]
async fn test_failed_chunk_degrades_to_null_rows() {
    let track_ids = ids(&["t1", "t2", "t3", "t4"]);
    let mut source = ScriptedSource::ok();
    // second chunk (t3, t4) never succeeds
    source.failing_chunks.insert("t3".to_string());

    let rows = collect_features(&mut source, &track_ids, 2, &test_policy(3)).await;

    // all rows are still present
    assert_eq!(rows.len(), 4);
    assert!(rows[0].values.iter().all(|v| v.is_some()));
    assert!(rows[1].values.iter().all(|v| v.is_some()));
    assert!(rows[2].values.iter().all(|v| v.is_none()));
    assert!(rows[3].values.iter().all(|v| v.is_none()));
    assert_eq!(rows[2].id, "t3");
    assert_eq!(rows[3].id, "t4");

    // one request for the good chunk, the full retry budget for the bad one
    assert_eq!(source.calls.len(), 1 + 3);
}

#[tokio::test]
async fn test_flaky_chunk_recovers_within_retry_budget() {
    let track_ids = ids(&["t1", "t2"]);
    let mut source = ScriptedSource::ok();
    source.flaky_chunks.insert("t1".to_string(), 2);

    let rows = collect_features(&mut source, &track_ids, 50, &test_policy(3)).await;

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.values.iter().all(|v| v.is_some())));
    // two failures plus the successful attempt
    assert_eq!(source.calls.len(), 3);
}

#[tokio::test]
async fn test_null_vendor_entry_keeps_null_row() {
    let track_ids = ids(&["t1", "t2", "t3"]);
    let mut source = ScriptedSource::ok();
    source.null_entries.insert("t2".to_string());

    let rows = collect_features(&mut source, &track_ids, 50, &test_policy(3)).await;

    assert_eq!(rows.len(), 3);
    assert!(rows[0].values.iter().all(|v| v.is_some()));
    assert!(rows[1].values.iter().all(|v| v.is_none()));
    assert!(rows[2].values.iter().all(|v| v.is_some()));
}

#[tokio::test]
async fn test_rows_align_by_id_not_position() {
    let track_ids = ids(&["t1", "t2", "t3"]);
    let mut source = ScriptedSource::ok();
    source.reverse_responses = true;

    let rows = collect_features(&mut source, &track_ids, 50, &test_policy(3)).await;

    assert_eq!(rows.len(), 3);
    for (row, id) in rows.iter().zip(track_ids.iter()) {
        assert_eq!(&row.id, id);
        assert!(row.values.iter().all(|v| v.is_some()));
    }
}

#[tokio::test]
async fn test_oversized_chunk_size_makes_single_request() {
    let track_ids = ids(&["t1", "t2", "t3"]);
    let mut source = ScriptedSource::ok();

    let rows = collect_features(&mut source, &track_ids, 100, &test_policy(3)).await;

    assert_eq!(rows.len(), 3);
    assert_eq!(source.calls.len(), 1);
}

#[tokio::test]
async fn test_empty_input_yields_empty_output() {
    let mut source = ScriptedSource::ok();

    let rows = collect_features(&mut source, &[], 50, &test_policy(3)).await;

    assert!(rows.is_empty());
    assert!(source.calls.is_empty());
}
