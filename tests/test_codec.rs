//! Share-token codec tests: round-trips and rejection of malformed tokens.

mod common;

use std::io::Write;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use poketcg_tracker::{codec, TrackerError};

/// Build a token from arbitrary JSON text, bypassing `encode`'s guarantees.
fn forge_token(json: &str) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes()).unwrap();
    URL_SAFE_NO_PAD.encode(encoder.finish().unwrap())
}

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

#[test]
fn encode_empty_collection_yields_no_token() {
    assert_eq!(codec::encode(&common::id_set(&[])), None);
}

#[test]
fn token_contains_only_url_safe_characters() {
    let ids = common::id_set(&["base1-1", "base1-10", "swsh12pt5gg-GG44"]);
    let token = codec::encode(&ids).unwrap();

    assert!(!token.is_empty());
    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert!(!token.ends_with('='));
}

// ---------------------------------------------------------------------------
// round trips
// ---------------------------------------------------------------------------

#[test]
fn round_trip_restores_the_id_set() {
    let ids = common::id_set(&["base1-1", "base1-3", "base1-58"]);
    let token = codec::encode(&ids).unwrap();

    let decoded: std::collections::BTreeSet<String> =
        codec::decode(&token).unwrap().into_iter().collect();
    assert_eq!(decoded, ids);
}

#[test]
fn round_trip_single_id() {
    let ids = common::id_set(&["xy7-54"]);
    let token = codec::encode(&ids).unwrap();
    assert_eq!(codec::decode(&token).unwrap(), vec!["xy7-54".to_string()]);
}

#[test]
fn round_trip_order_is_normalized() {
    // BTreeSet iteration is sorted, so the decoded list is too.
    let ids = common::id_set(&["c", "a", "b"]);
    let token = codec::encode(&ids).unwrap();
    assert_eq!(
        codec::decode(&token).unwrap(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[test]
fn round_trip_non_ascii_ids() {
    let ids = common::id_set(&["sm115-Å-7", "promo-ポケモン"]);
    let token = codec::encode(&ids).unwrap();
    let decoded: std::collections::BTreeSet<String> =
        codec::decode(&token).unwrap().into_iter().collect();
    assert_eq!(decoded, ids);
}

#[test]
fn round_trip_large_collection() {
    let ids: std::collections::BTreeSet<String> =
        (1..=400).map(|n| format!("swsh12-{n}")).collect();
    let token = codec::encode(&ids).unwrap();

    let decoded = codec::decode(&token).unwrap();
    assert_eq!(decoded.len(), 400);
    assert_eq!(
        decoded.into_iter().collect::<std::collections::BTreeSet<_>>(),
        ids
    );
}

// ---------------------------------------------------------------------------
// decode failures — all-or-nothing
// ---------------------------------------------------------------------------

#[test]
fn decode_empty_token_fails() {
    assert!(matches!(codec::decode(""), Err(TrackerError::Decode(_))));
    assert!(matches!(codec::decode("   "), Err(TrackerError::Decode(_))));
}

#[test]
fn decode_invalid_base64_fails() {
    assert!(matches!(
        codec::decode("not a token!!!"),
        Err(TrackerError::Decode(_))
    ));
}

#[test]
fn decode_valid_base64_garbage_bytes_fails() {
    let token = URL_SAFE_NO_PAD.encode(b"these bytes are not a zlib stream");
    assert!(matches!(
        codec::decode(&token),
        Err(TrackerError::Decode(_))
    ));
}

#[test]
fn decode_truncated_token_fails() {
    let ids = common::id_set(&["base1-1", "base1-2", "base1-3"]);
    let token = codec::encode(&ids).unwrap();
    let truncated = &token[..token.len() / 2];

    assert!(codec::decode(truncated).is_err());
}

#[test]
fn decode_non_json_payload_fails() {
    let token = forge_token("this is not json");
    assert!(matches!(
        codec::decode(&token),
        Err(TrackerError::Decode(_))
    ));
}

#[test]
fn decode_non_list_payload_fails() {
    let token = forge_token(r#"{"cards": ["base1-1"]}"#);
    assert!(matches!(
        codec::decode(&token),
        Err(TrackerError::Validation(_))
    ));
}

#[test]
fn decode_list_with_non_string_entry_fails_wholesale() {
    // One bad entry poisons the whole token; no partial list comes back.
    let token = forge_token(r#"["base1-1", 7, "base1-3"]"#);
    assert!(matches!(
        codec::decode(&token),
        Err(TrackerError::Validation(_))
    ));
}
