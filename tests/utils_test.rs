use spotcli::types::{PkceMaterial, TokenResponse};
use spotcli::utils::*;

use chrono::{Duration, TimeZone, Utc};

#[test]
fn test_generate_random_string_length_and_charset() {
    let verifier = generate_random_string(32).unwrap();

    // 32 bytes encode to 43 characters without padding
    assert_eq!(verifier.len(), 43);

    // Should only contain URL-safe base64 characters
    assert!(
        verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );

    // Two generated strings should be different
    let other = generate_random_string(32).unwrap();
    assert_ne!(verifier, other);
}

#[test]
fn test_generate_random_string_state_length() {
    let state = generate_random_string(16).unwrap();
    assert_eq!(state.len(), 22);
}

#[test]
fn test_generate_code_challenge_is_deterministic() {
    let verifier = generate_random_string(32).unwrap();

    let first = generate_code_challenge(&verifier);
    let second = generate_code_challenge(&verifier);
    assert_eq!(first, second);

    // SHA-256 digest is 32 bytes -> 43 characters
    assert_eq!(first.len(), 43);
    assert!(!first.contains('='));
}

#[test]
fn test_generate_code_challenge_known_vector() {
    // Appendix B of RFC 7636
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    assert_eq!(
        generate_code_challenge(verifier),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_pkce_material_generate() {
    let pkce = PkceMaterial::generate().unwrap();

    assert_eq!(pkce.code_challenge, generate_code_challenge(&pkce.code_verifier));
    assert_ne!(pkce.state, pkce.code_verifier);
}

#[test]
fn test_format_progress() {
    assert_eq!(format_progress(125_000, 243_000), "02:05 / 04:03");
    assert_eq!(format_progress(0, 0), "00:00 / 00:00");

    // Truncated, not rounded
    assert_eq!(format_progress(59_999, 60_000), "00:59 / 01:00");
}

#[test]
fn test_format_progress_does_not_clamp() {
    // Elapsed beyond total is shown as reported
    assert_eq!(format_progress(250_000, 243_000), "04:10 / 04:03");
}

#[test]
fn test_join_artists() {
    let artists = vec!["Daft Punk".to_string(), "Pharrell Williams".to_string()];
    assert_eq!(join_artists(&artists), "Daft Punk, Pharrell Williams");
    assert_eq!(join_artists(&[]), "");
}

#[test]
fn test_token_response_defaults_expiry_to_one_hour() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let res: TokenResponse =
        serde_json::from_str(r#"{"access_token":"abc","token_type":"Bearer"}"#).unwrap();

    let token = res.into_token(now, None);
    assert_eq!(token.expiry, now + Duration::seconds(3600));
    assert_eq!(token.refresh_token, None);
}

#[test]
fn test_token_response_keeps_previous_refresh_token() {
    let now = Utc::now();
    let res: TokenResponse =
        serde_json::from_str(r#"{"access_token":"new","expires_in":120}"#).unwrap();

    let token = res.into_token(now, Some("old-refresh"));
    assert_eq!(token.access_token, "new");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.refresh_token.as_deref(), Some("old-refresh"));
    assert_eq!(token.expiry, now + Duration::seconds(120));
}

#[test]
fn test_token_response_out_of_range_expires_in_falls_back() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let res: TokenResponse =
        serde_json::from_str(r#"{"access_token":"a","expires_in":9223372036854775807}"#).unwrap();

    let token = res.into_token(now, None);
    assert_eq!(token.expiry, now + Duration::seconds(3600));
}

#[test]
fn test_token_response_expiry_overflow_falls_back() {
    // Representable as a duration, but past the largest DateTime
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let body = format!(r#"{{"access_token":"a","expires_in":{}}}"#, i64::MAX / 1000);
    let res: TokenResponse = serde_json::from_str(&body).unwrap();

    let token = res.into_token(now, None);
    assert_eq!(token.expiry, now + Duration::seconds(3600));
}
