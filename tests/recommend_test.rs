use sporeccli::recommend::{
    FEATURE_COUNT, TrackFeatureRow, build_feature_table, recommend_from_song,
};
use sporeccli::spotify::features::FeatureRow;
use sporeccli::types::SavedTrack;

// Helper function to create a test library record
fn create_test_track(id: &str, name: &str, artist: &str) -> SavedTrack {
    SavedTrack {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        name: name.to_string(),
        artist: artist.to_string(),
        link: format!("https://open.spotify.com/track/{}", id),
    }
}

// Helper function to create a combined-table row
fn create_test_row(id: &str, name: &str, features: [Option<f64>; FEATURE_COUNT]) -> TrackFeatureRow {
    TrackFeatureRow {
        track: create_test_track(id, name, &format!("{}_artist", id)),
        features,
    }
}

// All feature columns set to the same value
fn uniform_features(value: f64) -> [Option<f64>; FEATURE_COUNT] {
    [Some(value); FEATURE_COUNT]
}

#[test]
fn test_recommend_empty_table_returns_empty() {
    let result = recommend_from_song("anything", &[], 5);
    assert!(result.is_empty());
}

#[test]
fn test_recommend_unknown_song_returns_empty() {
    let table = vec![
        create_test_row("id1", "Song One", uniform_features(0.5)),
        create_test_row("id2", "Song Two", uniform_features(0.7)),
    ];

    let result = recommend_from_song("does not exist", &table, 5);
    assert!(result.is_empty());
}

#[test]
fn test_recommend_all_null_table_returns_empty() {
    // Every feature chunk failed: rows exist but carry no values at all
    let table = vec![
        create_test_row("id1", "Song One", [None; FEATURE_COUNT]),
        create_test_row("id2", "Song Two", [None; FEATURE_COUNT]),
    ];

    let result = recommend_from_song("Song One", &table, 5);
    assert!(result.is_empty());
}

#[test]
fn test_recommend_identical_track_ranks_first() {
    // B is feature-identical to the query A; C is far away
    let table = vec![
        create_test_row("a", "Alpha", uniform_features(1.0)),
        create_test_row("b", "Beta", uniform_features(1.0)),
        create_test_row("c", "Gamma", uniform_features(0.0)),
    ];

    let result = recommend_from_song("Alpha", &table, 3);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].track.id, "b");
    assert!((result[0].score - 1.0).abs() < 1e-9);
    assert!(result[1].score < result[0].score);
}

#[test]
fn test_recommend_excludes_query_track() {
    let table = vec![
        create_test_row("a", "Alpha", uniform_features(1.0)),
        create_test_row("b", "Beta", uniform_features(1.0)),
        create_test_row("c", "Gamma", uniform_features(0.0)),
    ];

    let result = recommend_from_song("Alpha", &table, 10);
    assert!(result.iter().all(|rec| rec.track.id != "a"));
}

#[test]
fn test_recommend_match_is_case_insensitive() {
    let table = vec![
        create_test_row("a", "Alpha", uniform_features(1.0)),
        create_test_row("b", "Beta", uniform_features(1.0)),
    ];

    let result = recommend_from_song("aLpHa", &table, 5);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].track.id, "b");
}

#[test]
fn test_recommend_substring_match_fallback() {
    let table = vec![
        create_test_row("a", "Nightcall", uniform_features(1.0)),
        create_test_row("b", "Daylight", uniform_features(1.0)),
    ];

    let result = recommend_from_song("night", &table, 5);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].track.id, "b");
}

#[test]
fn test_recommend_exact_match_beats_substring() {
    // "Runaway" appears before "Run" in the table; an exact match on "Run"
    // must still win over the earlier substring hit
    let table = vec![
        create_test_row("a", "Runaway", uniform_features(0.2)),
        create_test_row("b", "Run", uniform_features(0.9)),
        create_test_row("c", "Walk", uniform_features(0.9)),
    ];

    let result = recommend_from_song("run", &table, 5);
    assert!(result.iter().all(|rec| rec.track.id != "b"));
    assert!(result.iter().any(|rec| rec.track.id == "a"));
}

#[test]
fn test_recommend_ties_keep_row_order() {
    // B and C are identical to each other, so both tie against the query;
    // the earlier row must come first
    let table = vec![
        create_test_row("a", "Alpha", uniform_features(1.0)),
        create_test_row("b", "Beta", uniform_features(0.4)),
        create_test_row("c", "Gamma", uniform_features(0.4)),
    ];

    let result = recommend_from_song("Alpha", &table, 3);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].score, result[1].score);
    assert_eq!(result[0].track.id, "b");
    assert_eq!(result[1].track.id, "c");
}

#[test]
fn test_recommend_truncates_to_top_n() {
    let table = vec![
        create_test_row("a", "Alpha", uniform_features(1.0)),
        create_test_row("b", "Beta", uniform_features(0.9)),
        create_test_row("c", "Gamma", uniform_features(0.5)),
        create_test_row("d", "Delta", uniform_features(0.1)),
    ];

    let result = recommend_from_song("Alpha", &table, 2);
    assert_eq!(result.len(), 2);
}

#[test]
fn test_recommend_handles_partially_null_rows() {
    // A row with some missing values is imputed to zero, not dropped
    let mut partial = uniform_features(0.8);
    partial[0] = None;
    partial[5] = None;

    let table = vec![
        create_test_row("a", "Alpha", uniform_features(0.8)),
        create_test_row("b", "Beta", partial),
        create_test_row("c", "Gamma", uniform_features(0.1)),
    ];

    let result = recommend_from_song("Alpha", &table, 3);
    assert_eq!(result.len(), 2);
}

#[test]
fn test_build_feature_table_preserves_order_and_count() {
    let saved = vec![
        create_test_track("id1", "Song One", "Artist A"),
        create_test_track("id2", "Song Two", "Artist B"),
        create_test_track("id3", "Song Three", "Artist C"),
    ];

    // Feature rows arrive out of order and incomplete
    let features = vec![
        FeatureRow {
            id: "id3".to_string(),
            values: uniform_features(0.3),
        },
        FeatureRow {
            id: "id1".to_string(),
            values: uniform_features(0.1),
        },
    ];

    let table = build_feature_table(&saved, &features);

    assert_eq!(table.len(), saved.len());
    assert_eq!(table[0].track.id, "id1");
    assert_eq!(table[1].track.id, "id2");
    assert_eq!(table[2].track.id, "id3");

    assert_eq!(table[0].features, uniform_features(0.1));
    // id2 had no feature row and keeps an all-null vector
    assert!(table[1].is_unanalyzed());
    assert_eq!(table[2].features, uniform_features(0.3));
}
