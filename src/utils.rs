use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

/// Spotify track ids are 22 base62 characters.
const TRACK_ID_LEN: usize = 22;

const TRACK_URI_PREFIX: &str = "spotify:track:";

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Extracts a bare track id from a track URI or an already-bare id.
///
/// Accepts `spotify:track:<id>` URIs and raw 22-character base62 ids;
/// anything else returns `None` and should be skipped by the caller.
pub fn extract_track_id(uri_or_id: &str) -> Option<String> {
    let candidate = uri_or_id.strip_prefix(TRACK_URI_PREFIX).unwrap_or(uri_or_id);

    if candidate.len() == TRACK_ID_LEN && candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(candidate.to_string())
    } else {
        None
    }
}

pub fn spotify_track_link(track_id: &str) -> String {
    format!("https://open.spotify.com/track/{}", track_id)
}
