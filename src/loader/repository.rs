//! Lazily loaded, memoized record collection

use crate::loader::error::LoadError;
use crate::loader::record_set::RecordSet;
use crate::loader::source::IndexSource;
use crate::metrics::{
    INDEX_LOADS_TOTAL, INDEX_LOAD_DURATION_SECONDS, INDEX_RECORDS, INDEX_RECORDS_DROPPED_TOTAL,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

/// Observable load state of an [`IndexRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded { records: usize, dropped: usize },
    Failed { reason: String },
}

impl LoadState {
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded { .. } | LoadState::Failed { .. })
    }
}

/// Owns the record collection for one session.
///
/// The first call to [`ensure_loaded`](Self::ensure_loaded) fetches the document;
/// callers arriving while that fetch is in flight wait for it, and every later
/// call returns the memoized set.
pub struct IndexRepository {
    source: Arc<dyn IndexSource>,
    records: OnceCell<RecordSet>,
    state: RwLock<LoadState>,
}

impl IndexRepository {
    pub fn new(source: Arc<dyn IndexSource>) -> Self {
        Self {
            source,
            records: OnceCell::new(),
            state: RwLock::new(LoadState::NotLoaded),
        }
    }

    /// Repository whose collection is already in memory
    pub fn preloaded(records: RecordSet) -> Self {
        let state = LoadState::Loaded {
            records: records.len(),
            dropped: records.dropped(),
        };
        Self {
            source: Arc::new(crate::loader::source::StaticSource::default()),
            records: OnceCell::new_with(Some(records)),
            state: RwLock::new(state),
        }
    }

    /// Load the collection if needed and return it.
    ///
    /// Never fails: a failed load yields an empty set and is reported through
    /// [`state`](Self::state).
    pub async fn ensure_loaded(&self) -> RecordSet {
        self.records.get_or_init(|| self.load()).await.clone()
    }

    /// Collection if the load already finished
    pub fn loaded(&self) -> Option<RecordSet> {
        self.records.get().cloned()
    }

    pub fn state(&self) -> LoadState {
        self.state.read().clone()
    }

    pub fn source(&self) -> &dyn IndexSource {
        self.source.as_ref()
    }

    async fn load(&self) -> RecordSet {
        *self.state.write() = LoadState::Loading;
        let location = self.source.describe();
        let start = Instant::now();

        let result = self.fetch_and_decode().await;
        INDEX_LOAD_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());

        match result {
            Ok(records) => {
                tracing::info!(
                    location = %location,
                    records = records.len(),
                    dropped = records.dropped(),
                    "Index loaded"
                );
                INDEX_LOADS_TOTAL.with_label_values(&["success"]).inc();
                INDEX_RECORDS.set(records.len() as f64);
                INDEX_RECORDS_DROPPED_TOTAL.inc_by(records.dropped() as u64);

                *self.state.write() = LoadState::Loaded {
                    records: records.len(),
                    dropped: records.dropped(),
                };
                records
            }
            Err(e) => {
                tracing::error!(location = %location, error = %e, "Index load failed, continuing with an empty catalog");
                INDEX_LOADS_TOTAL.with_label_values(&["failure"]).inc();
                INDEX_RECORDS.set(0.0);

                *self.state.write() = LoadState::Failed {
                    reason: e.to_string(),
                };
                RecordSet::empty()
            }
        }
    }

    async fn fetch_and_decode(&self) -> Result<RecordSet, LoadError> {
        let bytes = self.source.fetch().await?;
        RecordSet::from_json(&bytes)
    }
}

impl std::fmt::Debug for IndexRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexRepository")
            .field("source", &self.source.describe())
            .field("state", &self.state())
            .finish()
    }
}
