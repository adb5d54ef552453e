use sporeccli::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_extract_track_id_from_uri() {
    let id = extract_track_id("spotify:track:4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(id.as_deref(), Some("4uLU6hMCjMI75M1A2tKUQC"));
}

#[test]
fn test_extract_track_id_from_bare_id() {
    let id = extract_track_id("4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(id.as_deref(), Some("4uLU6hMCjMI75M1A2tKUQC"));
}

#[test]
fn test_extract_track_id_rejects_malformed_input() {
    // wrong length
    assert_eq!(extract_track_id("spotify:track:tooshort"), None);
    assert_eq!(extract_track_id("abc"), None);

    // wrong entity type keeps its prefix and fails the length check
    assert_eq!(extract_track_id("spotify:album:4uLU6hMCjMI75M1A2tKUQC"), None);

    // non-alphanumeric characters
    assert_eq!(extract_track_id("4uLU6hMCjMI75M1A2tKUQ!"), None);

    // empty
    assert_eq!(extract_track_id(""), None);
}

#[test]
fn test_spotify_track_link() {
    assert_eq!(
        spotify_track_link("4uLU6hMCjMI75M1A2tKUQC"),
        "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC"
    );
}
