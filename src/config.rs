use std::path::PathBuf;

pub const API_BASE: &str = "https://api.pokemontcg.io/v2";

/// Cards fetched per page. 250 is the maximum the API allows.
pub const PAGE_SIZE: u32 = 250;

/// Filename prefix for per-set collection records in the vault directory.
pub const STORAGE_PREFIX: &str = "poketcg-tracker-";

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("poketcg-tracker")
    } else {
        PathBuf::from(".poketcg-tracker")
    }
}
