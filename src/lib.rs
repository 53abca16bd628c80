//! Collection tracker core for the Pokémon TCG catalog.
//!
//! Fetches set and card data from the public catalog API, tracks which cards
//! of the active set a user has collected, persists each set's collection to
//! a per-set record on disk, and shares collections through compressed
//! URL-safe tokens embedded in a location fragment. Rendering is left to the
//! host: the tracker consumes plain events ("set chosen", "card toggled",
//! "location changed") and produces plain data ([`ViewState`]).
//!
//! # Quick start
//!
//! ```no_run
//! use poketcg_tracker::Tracker;
//!
//! let mut tracker = Tracker::builder().build().unwrap();
//!
//! // The user navigated to "#base1".
//! tracker.navigate("base1").unwrap();
//!
//! // The user clicked a card thumbnail.
//! tracker.toggle("base1-4").unwrap();
//!
//! // Hand the view layer everything it needs to render.
//! let view = tracker.view();
//! println!("{:?} {:?}", view.progress, view.share_fragment);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncTracker;
pub use catalog::CatalogClient;
pub use error::{Result, TrackerError};
pub use navigation::NavAction;
pub use store::{CollectionStore, Progress, Vault};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use models::{Card, SetDetail, SetSummary};

// ---------------------------------------------------------------------------
// TrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Tracker`] instance.
///
/// Use [`Tracker::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](TrackerBuilder::build) to create the
/// tracker.
pub struct TrackerBuilder {
    base_url: String,
    data_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self {
            base_url: config::API_BASE.to_string(),
            data_dir: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TrackerBuilder {
    /// Point the tracker at a different catalog API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom directory for persisted collection records.
    ///
    /// If not set, the platform-appropriate default data directory is used
    /// (e.g. `~/.local/share/poketcg-tracker` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the HTTP request timeout for catalog calls. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the tracker, creating the vault directory and HTTP client.
    ///
    /// No network traffic happens here; sets and cards are fetched on
    /// navigation.
    pub fn build(self) -> Result<Tracker> {
        let catalog = CatalogClient::new(self.base_url, self.timeout)?;
        let vault = Vault::new(self.data_dir.unwrap_or_else(config::default_data_dir))?;
        Ok(Tracker {
            catalog,
            store: CollectionStore::new(vault),
            loaded: None,
            generation: 0,
        })
    }
}

// ---------------------------------------------------------------------------
// Outcome / view types
// ---------------------------------------------------------------------------

/// What a call to [`Tracker::navigate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A set and its card list were loaded and are now active.
    Loaded,
    /// Import data was applied to the already-active set in place.
    Imported,
    /// The active set was cleared.
    Cleared,
    /// Nothing needed to change.
    Unchanged,
    /// A newer navigation superseded this load; its result was discarded.
    Superseded,
}

/// A card as the view layer renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub number: String,
    /// Thumbnail URL, when the catalog provided one.
    pub image: Option<String>,
    pub collected: bool,
}

/// Plain-data snapshot handed across the render boundary.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Detail for the active set, `None` in the cleared/empty state.
    pub set: Option<SetDetail>,
    /// Cards of the active set in collector-number order.
    pub cards: Vec<CardView>,
    /// Suppressed (`None`) when no set is active or no cards are known.
    pub progress: Option<Progress>,
    /// `<setId>?collected=<token>` for the current collection, `None` when
    /// there is nothing to export.
    pub share_fragment: Option<String>,
}

struct LoadedSet {
    detail: SetDetail,
    cards: Vec<Card>,
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// The main entry point: owns the catalog client, the collection store, and
/// the currently loaded set.
///
/// All state lives here explicitly — there are no ambient globals — and all
/// mutation goes through the event methods ([`navigate`](Self::navigate),
/// [`choose_set`](Self::choose_set), [`toggle`](Self::toggle)), which a host
/// calls from whatever event source it has.
pub struct Tracker {
    catalog: CatalogClient,
    store: CollectionStore,
    loaded: Option<LoadedSet>,
    generation: u64,
}

impl Tracker {
    /// Create a new builder for configuring the tracker.
    pub fn builder() -> TrackerBuilder {
        TrackerBuilder::default()
    }

    // -- Events -------------------------------------------------------------

    /// Resolve a location fragment and apply the resulting action.
    ///
    /// This is the single entry point invoked on startup and on every
    /// location change; the fragment is shaped `<setId>?collected=<token>`
    /// with both parts optional. A token that fails to decode is logged and
    /// ignored. A failed set load clears to the empty state — a half-loaded
    /// set is never left active — and returns the error.
    pub fn navigate(&mut self, fragment: &str) -> Result<Outcome> {
        match navigation::resolve(fragment, self.store.active_set()) {
            NavAction::LoadSet { set_id, seed } => self.load_set(&set_id, seed),
            NavAction::Replace { ids } => {
                self.store.replace(ids)?;
                Ok(Outcome::Imported)
            }
            NavAction::Clear => {
                self.clear_view();
                Ok(Outcome::Cleared)
            }
            NavAction::Stay => Ok(Outcome::Unchanged),
        }
    }

    /// The "set chosen" render event: `None` means the empty choice.
    pub fn choose_set(&mut self, set_id: Option<&str>) -> Result<Outcome> {
        self.navigate(set_id.unwrap_or(""))
    }

    /// The "card toggled" render event. Returns the new membership state.
    ///
    /// The collection record is written through before this returns; a
    /// persistence failure surfaces here while the in-memory state stays
    /// correct.
    pub fn toggle(&mut self, card_id: &str) -> Result<bool> {
        self.store.toggle(card_id)
    }

    // -- Catalog ------------------------------------------------------------

    /// List all sets, newest release first (dropdown population data).
    pub fn list_sets(&self) -> Result<Vec<SetSummary>> {
        self.catalog.list_sets()
    }

    // -- Render boundary ----------------------------------------------------

    /// Snapshot everything the view layer needs.
    pub fn view(&self) -> ViewState {
        let cards = match &self.loaded {
            Some(loaded) => loaded
                .cards
                .iter()
                .map(|card| CardView {
                    id: card.id.clone(),
                    name: card.name.clone(),
                    number: card.number.clone(),
                    image: card.images.as_ref().map(|images| images.small.clone()),
                    collected: self.store.contains(&card.id),
                })
                .collect(),
            None => Vec::new(),
        };

        ViewState {
            set: self.loaded.as_ref().map(|loaded| loaded.detail.clone()),
            cards,
            progress: self.progress(),
            share_fragment: self.share_fragment(),
        }
    }

    /// Progress against the fetched card count, `None` when suppressed.
    pub fn progress(&self) -> Option<Progress> {
        let total = self.loaded.as_ref().map(|l| l.cards.len()).unwrap_or(0);
        self.store.progress(total)
    }

    /// The shareable fragment for the current collection, regenerated from
    /// current state on every call, `None` when nothing is collected.
    pub fn share_fragment(&self) -> Option<String> {
        let set_id = self.store.active_set()?;
        let token = codec::encode(self.store.collected())?;
        Some(navigation::share_fragment(set_id, &token))
    }

    /// Read access to the collection store.
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    // -- Internals ----------------------------------------------------------

    fn load_set(&mut self, set_id: &str, seed: Option<Vec<String>>) -> Result<Outcome> {
        self.generation += 1;
        let ticket = self.generation;

        // Seed the collection first: an import is persisted even when the
        // fetch below fails.
        self.store.activate(set_id, seed)?;

        let catalog = &self.catalog;
        let fetched = std::thread::scope(|scope| {
            // Detail and card list have no ordering dependency; issue both
            // and wait for both before the view updates.
            let detail = scope.spawn(move || catalog.fetch_set_detail(set_id));
            let cards = catalog.fetch_all_cards(set_id);
            let detail = detail
                .join()
                .unwrap_or_else(|_| SetDetail::placeholder(set_id));
            cards.map(|cards| (detail, cards))
        });

        let (detail, cards) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                self.clear_view();
                return Err(e);
            }
        };

        if ticket != self.generation {
            // A newer navigation started while this one was in flight; its
            // result must not overwrite the fresher state.
            debug!(set_id, "discarding superseded set load");
            return Ok(Outcome::Superseded);
        }

        debug!(set_id, cards = cards.len(), "set loaded");
        self.loaded = Some(LoadedSet { detail, cards });
        Ok(Outcome::Loaded)
    }

    fn clear_view(&mut self) {
        self.store.clear();
        self.loaded = None;
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.active_set() {
            Some(set_id) => write!(
                f,
                "Tracker(set={}, collected={}, cards={})",
                set_id,
                self.store.collected_count(),
                self.loaded.as_ref().map(|l| l.cards.len()).unwrap_or(0)
            ),
            None => write!(f, "Tracker(no active set)"),
        }
    }
}
