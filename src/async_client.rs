//! Async wrapper around [`Tracker`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all tracker operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client pages through a set. The mutex serializes event
//! processing, preserving the tracker's single-logical-thread model; the
//! load-generation check inside [`Tracker`] takes care of navigations that
//! queue up behind a slow load.
//!
//! # Example
//!
//! ```no_run
//! use poketcg_tracker::AsyncTracker;
//!
//! # async fn demo() -> poketcg_tracker::Result<()> {
//! let tracker = AsyncTracker::builder().build().await?;
//!
//! tracker.navigate("base1".to_string()).await?;
//! let view = tracker.view().await?;
//! println!("{} cards", view.cards.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, TrackerError};
use crate::models::SetSummary;
use crate::{Outcome, Tracker, ViewState};

// ---------------------------------------------------------------------------
// AsyncTrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncTracker`] instance.
#[derive(Default)]
pub struct AsyncTrackerBuilder {
    base_url: Option<String>,
    data_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl AsyncTrackerBuilder {
    /// Point the tracker at a different catalog API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a custom directory for persisted collection records.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the HTTP request timeout for catalog calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the async tracker. Initialization runs on the blocking thread
    /// pool so it won't block the async event loop.
    pub async fn build(self) -> Result<AsyncTracker> {
        tokio::task::spawn_blocking(move || {
            let mut builder = Tracker::builder();
            if let Some(url) = self.base_url {
                builder = builder.base_url(url);
            }
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            let tracker = builder.build()?;
            Ok(AsyncTracker {
                inner: Arc::new(Mutex::new(tracker)),
            })
        })
        .await
        .map_err(|e| TrackerError::Runtime(format!("task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncTracker
// ---------------------------------------------------------------------------

/// Async wrapper around [`Tracker`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]; the underlying [`Tracker`] is protected
/// by a [`Mutex`].
pub struct AsyncTracker {
    inner: Arc<Mutex<Tracker>>,
}

impl AsyncTracker {
    /// Create a new builder for configuring the async tracker.
    pub fn builder() -> AsyncTrackerBuilder {
        AsyncTrackerBuilder::default()
    }

    /// Run a sync tracker operation on the blocking thread pool.
    ///
    /// The closure receives `&mut Tracker` and should return a `Result<T>`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use poketcg_tracker::AsyncTracker;
    /// # async fn example() -> poketcg_tracker::Result<()> {
    /// # let tracker = AsyncTracker::builder().build().await?;
    /// let progress = tracker.run(|t| Ok(t.progress())).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tracker) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tracker = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = tracker
                .lock()
                .map_err(|_| TrackerError::Runtime("tracker lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| TrackerError::Runtime(format!("task join error: {e}")))?
    }

    /// Resolve a location fragment and apply it. See [`Tracker::navigate`].
    pub async fn navigate(&self, fragment: String) -> Result<Outcome> {
        self.run(move |t| t.navigate(&fragment)).await
    }

    /// Toggle a card's collected state. See [`Tracker::toggle`].
    pub async fn toggle(&self, card_id: String) -> Result<bool> {
        self.run(move |t| t.toggle(&card_id)).await
    }

    /// List all sets, newest release first.
    pub async fn list_sets(&self) -> Result<Vec<SetSummary>> {
        self.run(|t| t.list_sets()).await
    }

    /// Snapshot everything the view layer needs.
    pub async fn view(&self) -> Result<ViewState> {
        self.run(|t| Ok(t.view())).await
    }
}
