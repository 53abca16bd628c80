//! Blocking HTTP client for the card catalog API.
//!
//! Talks to the public Pokémon TCG catalog: the set list, per-set detail,
//! and the paginated card listing. No call here retries; every failure is
//! terminal for that operation and the caller decides what happens next.

use std::cmp::Ordering;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config;
use crate::error::Result;
use crate::models::{Card, CardPage, SetDetail, SetDetailEnvelope, SetListEnvelope, SetSummary};

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    /// Build a client against `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { base_url, client })
    }

    /// List all sets, newest release first.
    ///
    /// The API orders oldest-first when asked to sort by release date, so the
    /// list is reversed before returning.
    pub fn list_sets(&self) -> Result<Vec<SetSummary>> {
        let url = format!("{}/sets?orderBy=releaseDate", self.base_url);
        let envelope: SetListEnvelope =
            self.client.get(&url).send()?.error_for_status()?.json()?;

        let mut sets = envelope.data;
        sets.reverse();
        debug!(count = sets.len(), "fetched set list");
        Ok(sets)
    }

    /// Fetch the detail record for a set.
    ///
    /// Never fails: when the request errors, the failure is logged and a
    /// degraded placeholder (id echoed as name, "Unknown" series and date)
    /// is returned, since callers proceed regardless.
    pub fn fetch_set_detail(&self, set_id: &str) -> SetDetail {
        match self.try_fetch_set_detail(set_id) {
            Ok(detail) => detail,
            Err(e) => {
                warn!(set_id, error = %e, "set detail unavailable, using placeholder");
                SetDetail::placeholder(set_id)
            }
        }
    }

    fn try_fetch_set_detail(&self, set_id: &str) -> Result<SetDetail> {
        let url = format!("{}/sets/{}", self.base_url, set_id);
        let envelope: SetDetailEnvelope =
            self.client.get(&url).send()?.error_for_status()?.json()?;
        Ok(envelope.data)
    }

    /// Fetch every card in a set, ordered by collector number.
    ///
    /// Pages through the listing strictly sequentially — each page's
    /// envelope decides whether another page is requested — and accumulates
    /// until the API-reported total is reached. Any page failure aborts the
    /// whole operation; partial results are discarded, not returned.
    pub fn fetch_all_cards(&self, set_id: &str) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!(
                "{}/cards?q=set.id:{}&page={}&pageSize={}&orderBy=number",
                self.base_url,
                set_id,
                page,
                config::PAGE_SIZE
            );
            debug!(set_id, page, "fetching card page");
            let envelope: CardPage =
                self.client.get(&url).send()?.error_for_status()?.json()?;

            let fetched = envelope.data.len();
            let more = envelope.has_more();
            let total_count = envelope.total_count;
            cards.extend(envelope.data);

            if !more {
                break;
            }
            if fetched == 0 {
                // The reported total overshoots what the API will return.
                warn!(
                    set_id,
                    total_count,
                    accumulated = cards.len(),
                    "empty page before reported total; stopping pagination"
                );
                break;
            }
            page += 1;
        }

        cards.sort_by(|a, b| compare_collector_numbers(&a.number, &b.number));
        debug!(set_id, total = cards.len(), "fetched all cards");
        Ok(cards)
    }
}

// ---------------------------------------------------------------------------
// Collector number ordering
// ---------------------------------------------------------------------------

/// Order collector numbers the way a binder reads.
///
/// When both operands start with digits, their leading integer values are
/// compared (equal values compare `Equal`; the surrounding sort is stable).
/// Otherwise a natural string comparison applies, treating embedded digit
/// runs numerically so `"10"` sorts after `"9"` and `"SWSH001"` before
/// `"SWSH010"`. Promotional formats make the fallback necessary.
pub fn compare_collector_numbers(a: &str, b: &str) -> Ordering {
    match (leading_int(a), leading_int(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => natural_cmp(a, b),
    }
}

/// The integer value of the leading digit run, if any.
fn leading_int(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let run_a = take_digit_run(&mut ca);
                    let run_b = take_digit_run(&mut cb);
                    let ord = compare_digit_runs(&run_a, &run_b);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                } else {
                    let ord = x.cmp(&y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    ca.next();
                    cb.next();
                }
            }
        }
    }
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compare digit runs by numeric value without parsing, so arbitrarily long
/// runs cannot overflow. Ties on value fall back to run length ("01" after
/// "1") for a deterministic total order.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_sig = a.trim_start_matches('0');
    let b_sig = b.trim_start_matches('0');
    a_sig
        .len()
        .cmp(&b_sig.len())
        .then_with(|| a_sig.cmp(b_sig))
        .then_with(|| a.len().cmp(&b.len()))
}
