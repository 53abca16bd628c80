use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card — A single collectible card within a set
// ---------------------------------------------------------------------------

/// Thumbnail and full-size image references for a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImages {
    pub small: String,
    pub large: Option<String>,
}

/// A card as returned by the catalog's `/cards` endpoint.
///
/// The `id` is unique within a set and stable across sessions; it is the key
/// the collection store and share tokens operate on. The collector `number`
/// is a string because promotional printings use non-numeric formats such as
/// `"SWSH001"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub number: String,
    pub supertype: Option<String>,
    pub rarity: Option<String>,
    pub images: Option<CardImages>,
}

// ---------------------------------------------------------------------------
// CardPage — Paginated envelope around the card listing
// ---------------------------------------------------------------------------

/// One page of the `/cards` listing.
///
/// `page`, `page_size` and `total_count` are the API-reported values used to
/// decide whether another page must be requested.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPage {
    pub data: Vec<Card>,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub count: u32,
    pub total_count: u32,
}

impl CardPage {
    /// True when the API-reported total extends past this page.
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.page_size) < u64::from(self.total_count)
    }
}
