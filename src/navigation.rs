//! Location-fragment parsing and navigation dispatch.
//!
//! The shareable location string is the URL fragment, shaped
//! `<setId>?collected=<token>` with the query part optional. Resolution maps
//! every combination of (set id present/absent/changed) × (import data
//! present/absent/valid) to exactly one [`NavAction`], so callers dispatch on
//! a closed set of variants instead of re-deriving the cases.

use tracing::warn;

use crate::codec;

// ---------------------------------------------------------------------------
// NavAction
// ---------------------------------------------------------------------------

/// The single thing a location change asks the application to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Load `set_id` from scratch, seeding the collection from `seed` when an
    /// import was carried in the fragment.
    LoadSet {
        set_id: String,
        seed: Option<Vec<String>>,
    },
    /// The fragment targets the already-active set with fresh import data:
    /// overwrite the collection in place, no refetch.
    Replace { ids: Vec<String> },
    /// The fragment is empty but a set is active: clear the view.
    Clear,
    /// Nothing to do.
    Stay,
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// A parsed location fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Candidate set id (the part before `?`), trimmed; `None` when empty.
    pub set_id: Option<String>,
    /// The raw `collected` query value, percent-decoded but not yet run
    /// through the codec. `None` when absent or empty.
    pub collected_param: Option<String>,
}

impl Route {
    /// Parse a fragment. A leading `#` is tolerated so callers can pass the
    /// location hash verbatim.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let (set_part, query) = match fragment.split_once('?') {
            Some((set_part, query)) => (set_part, Some(query)),
            None => (fragment, None),
        };

        let set_id = {
            let trimmed = set_part.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        let collected_param = query.and_then(|q| query_param(q, "collected"));

        Self {
            set_id,
            collected_param,
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key && !v.is_empty()).then(|| percent_decode(v))
    })
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

/// Decide what a location change means given the currently active set.
///
/// A `collected` token that fails to decode is logged and treated as "no
/// import data"; it never blocks navigation.
pub fn resolve(fragment: &str, active_set: Option<&str>) -> NavAction {
    let route = Route::parse(fragment);

    let import = route.collected_param.as_deref().and_then(|token| {
        match codec::decode(token) {
            Ok(ids) => Some(ids),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable collection import in location string");
                None
            }
        }
    });

    match (route.set_id, active_set) {
        (Some(target), active) if active != Some(target.as_str()) => NavAction::LoadSet {
            set_id: target,
            seed: import,
        },
        (Some(_), _) => match import {
            Some(ids) => NavAction::Replace { ids },
            None => NavAction::Stay,
        },
        (None, Some(_)) => NavAction::Clear,
        (None, None) => NavAction::Stay,
    }
}

/// Build the shareable fragment for a set and token:
/// `<setId>?collected=<pctEncodedToken>`.
///
/// The token is percent-encoded so it survives query-string parsing even if
/// a future token alphabet includes reserved characters.
pub fn share_fragment(set_id: &str, token: &str) -> String {
    format!("{}?collected={}", set_id, percent_encode(token))
}

// ---------------------------------------------------------------------------
// Percent encoding
// ---------------------------------------------------------------------------

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push(hex_digit(byte >> 4));
                out.push(hex_digit(byte & 0x0f));
            }
        }
    }
    out
}

fn hex_digit(nibble: u8) -> char {
    char::from_digit(u32::from(nibble), 16)
        .unwrap_or('0')
        .to_ascii_uppercase()
}

fn percent_decode(value: &str) -> String {
    let mut out = Vec::with_capacity(value.len());
    let mut bytes = value.bytes().peekable();

    while let Some(byte) = bytes.next() {
        if byte == b'%' {
            let hi = bytes.next();
            let lo = bytes.next();
            if let (Some(hi), Some(lo)) = (hi, lo) {
                if let (Some(hi), Some(lo)) = (from_hex(hi), from_hex(lo)) {
                    out.push(hi << 4 | lo);
                    continue;
                }
            }
            // Malformed escape: keep the bytes as-is.
            out.push(b'%');
            if let Some(hi) = hi {
                out.push(hi);
            }
            if let Some(lo) = lo {
                out.push(lo);
            }
        } else {
            out.push(byte);
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn from_hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
