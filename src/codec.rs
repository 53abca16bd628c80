//! Shareable collection tokens.
//!
//! A token is a collection snapshot made safe for embedding in a URL
//! fragment: the card ids are serialized as a JSON array, zlib-compressed,
//! and base64-encoded with the URL-safe alphabet and no padding. Decoding
//! reverses every step and is all-or-nothing — a token that fails at any
//! stage yields an error, never a partial list.

use std::collections::BTreeSet;
use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Result, TrackerError};

/// Encode a collection snapshot as a URL-safe token.
///
/// Returns `None` when the collection is empty — there is nothing to export
/// and callers hide the share affordance entirely.
pub fn encode(ids: &BTreeSet<String>) -> Option<String> {
    if ids.is_empty() {
        return None;
    }

    let list: Vec<&str> = ids.iter().map(String::as_str).collect();
    let json = serde_json::to_vec(&list).ok()?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).ok()?;
    let compressed = encoder.finish().ok()?;

    Some(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decode a token back into the list of card ids it was built from.
///
/// Fails with [`TrackerError::Decode`] when the token is empty, not valid
/// base64, or not a valid zlib stream, and with [`TrackerError::Validation`]
/// when the decompressed payload is not a JSON array of strings.
pub fn decode(token: &str) -> Result<Vec<String>> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TrackerError::Decode("empty token".into()));
    }

    let compressed = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| TrackerError::Decode(format!("base64: {e}")))?;

    let mut json = Vec::new();
    ZlibDecoder::new(&compressed[..])
        .read_to_end(&mut json)
        .map_err(|e| TrackerError::Decode(format!("inflate: {e}")))?;

    let value: serde_json::Value =
        serde_json::from_slice(&json).map_err(|e| TrackerError::Decode(format!("json: {e}")))?;

    let items = value
        .as_array()
        .ok_or_else(|| TrackerError::Validation("decoded payload is not a list".into()))?;

    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(id) => ids.push(id.to_string()),
            None => {
                return Err(TrackerError::Validation(
                    "decoded payload contains a non-string entry".into(),
                ))
            }
        }
    }
    Ok(ids)
}
