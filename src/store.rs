//! Collection state for the active set, mirrored to a file-backed vault.
//!
//! The vault keeps one JSON record per set (an array of card id strings)
//! under a fixed filename prefix. Records are overwritten wholesale on every
//! mutation and read once when a set becomes active; nothing is ever merged.
//! A record that fails to parse is discarded so the next activation starts
//! clean.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config;
use crate::error::{Result, TrackerError};

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Collection progress against the fetched card list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub collected: usize,
    pub total: usize,
    /// Percentage of the set collected, rounded to one fraction digit.
    pub percentage: f64,
}

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

/// Durable per-set storage for collection records.
///
/// Keys are set ids; values are JSON arrays of card id strings stored as
/// `<prefix><setId>.json` inside the vault directory.
pub struct Vault {
    dir: PathBuf,
}

impl Vault {
    /// Open a vault rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory the vault stores records in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, set_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.json", config::STORAGE_PREFIX, set_id))
    }

    /// Load the stored collection for a set.
    ///
    /// Returns `None` when no record exists. A record that is unreadable or
    /// not a JSON array of strings is removed and also yields `None`.
    pub fn load(&self, set_id: &str) -> Option<Vec<String>> {
        let path = self.record_path(set_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(set_id, error = %e, "failed to read collection record");
                return None;
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                debug!(set_id, count = ids.len(), "collection record loaded");
                Some(ids)
            }
            Err(e) => {
                warn!(set_id, error = %e, "discarding malformed collection record");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    /// Overwrite the stored collection for a set.
    ///
    /// Writes to a temp file and renames on success, so an interrupted write
    /// never leaves a corrupt partial record behind.
    pub fn save(&self, set_id: &str, ids: &BTreeSet<String>) -> Result<()> {
        let path = self.record_path(set_id);
        let list: Vec<&str> = ids.iter().map(String::as_str).collect();
        let json = serde_json::to_string(&list)?;

        let tmp = path.with_extension("json.tmp");
        let written = fs::write(&tmp, json.as_bytes()).and_then(|_| fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(TrackerError::Persistence(format!(
                "failed to save collection for '{}': {}",
                set_id, e
            )));
        }

        debug!(set_id, count = list.len(), "collection record saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CollectionStore
// ---------------------------------------------------------------------------

/// In-memory set of collected card ids, scoped to the active set and written
/// through to the vault on every mutation.
pub struct CollectionStore {
    vault: Vault,
    active_set: Option<String>,
    collected: BTreeSet<String>,
}

impl CollectionStore {
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            active_set: None,
            collected: BTreeSet::new(),
        }
    }

    /// The id of the currently active set, if any.
    pub fn active_set(&self) -> Option<&str> {
        self.active_set.as_deref()
    }

    /// The collected card ids, in normalized (sorted) order.
    pub fn collected(&self) -> &BTreeSet<String> {
        &self.collected
    }

    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    pub fn contains(&self, card_id: &str) -> bool {
        self.collected.contains(card_id)
    }

    /// Make `set_id` the active set, replacing the previous collection.
    ///
    /// With `seed` (an import), the collection becomes exactly that list —
    /// deduplicated — and is persisted immediately, overwriting any prior
    /// record for the set: an import always wins over stored history.
    /// Without a seed, the collection is loaded from the vault, or starts
    /// empty when no usable record exists.
    pub fn activate(&mut self, set_id: &str, seed: Option<Vec<String>>) -> Result<()> {
        self.active_set = Some(set_id.to_string());
        match seed {
            Some(ids) => {
                self.collected = ids.into_iter().collect();
                debug!(set_id, count = self.collected.len(), "collection seeded from import");
                self.vault.save(set_id, &self.collected)
            }
            None => {
                self.collected = self
                    .vault
                    .load(set_id)
                    .map(|ids| ids.into_iter().collect())
                    .unwrap_or_default();
                Ok(())
            }
        }
    }

    /// Flip whether `card_id` is collected and persist the result.
    ///
    /// Returns the new membership state. Ignored (returns `false`) when no
    /// set is active. The write-through happens before this returns; on a
    /// persistence failure the in-memory flip is kept and the error is
    /// surfaced to the caller.
    pub fn toggle(&mut self, card_id: &str) -> Result<bool> {
        let Some(set_id) = self.active_set.clone() else {
            debug!(card_id, "toggle ignored: no active set");
            return Ok(false);
        };

        let now_collected = if self.collected.remove(card_id) {
            false
        } else {
            self.collected.insert(card_id.to_string());
            true
        };

        self.vault.save(&set_id, &self.collected)?;
        Ok(now_collected)
    }

    /// Overwrite the active set's collection wholesale (not a union) and
    /// persist. Used when an import arrives for the set that is already
    /// loaded. Ignored when no set is active.
    pub fn replace(&mut self, ids: Vec<String>) -> Result<()> {
        let Some(set_id) = self.active_set.clone() else {
            warn!("replace ignored: no active set");
            return Ok(());
        };

        self.collected = ids.into_iter().collect();
        debug!(%set_id, count = self.collected.len(), "collection replaced from import");
        self.vault.save(&set_id, &self.collected)
    }

    /// Progress against `total`, the count of cards actually fetched for the
    /// active set (the declared set size can differ and is never used here).
    ///
    /// Returns `None` when no set is active or `total` is zero. The
    /// collected count is capped at `total`: imported ids that reference no
    /// fetched card stay in the collection but never push progress past 100%.
    pub fn progress(&self, total: usize) -> Option<Progress> {
        if self.active_set.is_none() || total == 0 {
            return None;
        }
        let collected = self.collected.len().min(total);
        let percentage = ((collected as f64 / total as f64) * 1000.0).round() / 10.0;
        Some(Progress {
            collected,
            total,
            percentage,
        })
    }

    /// Deactivate and empty the in-memory collection. Persisted records are
    /// untouched.
    pub fn clear(&mut self) {
        self.active_set = None;
        self.collected.clear();
    }
}
