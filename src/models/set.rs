use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SetSummary — Summary info for a set (used by the set list endpoint)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSummary {
    pub id: String,
    pub name: String,
    pub series: String,
    pub release_date: String,
    pub printed_total: Option<i64>,
    pub total: Option<i64>,
}

// ---------------------------------------------------------------------------
// SetDetail — Full detail for the active set
// ---------------------------------------------------------------------------

/// Detail record for a single set.
///
/// The declared totals come from the API and may differ from the number of
/// cards the listing actually returns; progress reporting always uses the
/// fetched count, never these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDetail {
    pub id: String,
    pub name: String,
    pub series: String,
    pub release_date: String,
    pub printed_total: Option<i64>,
    pub total: Option<i64>,
}

impl SetDetail {
    /// Degraded stand-in used when the detail request fails: the set id is
    /// echoed back as the name so the view still has something to show.
    pub fn placeholder(set_id: &str) -> Self {
        Self {
            id: set_id.to_string(),
            name: set_id.to_string(),
            series: "Unknown".to_string(),
            release_date: "Unknown".to_string(),
            printed_total: None,
            total: None,
        }
    }

    /// The declared card count, preferring the printed total when both exist.
    pub fn declared_total(&self) -> Option<i64> {
        self.printed_total.or(self.total)
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SetListEnvelope {
    pub data: Vec<SetSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SetDetailEnvelope {
    pub data: SetDetail,
}
