//! The in-memory exoplanet catalog.
//!
//! A [`Dataset`] is immutable once built. The [`Catalog`] holds the current
//! dataset behind a single swappable reference: readers clone the `Arc` and
//! keep working on that snapshot while a reload publishes a new one.

mod index;
mod normalize;

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::models::*;

pub use index::build_options;
pub use normalize::normalize;

/// Where a dataset came from and when it was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    pub source: DataSource,
    pub loaded_at: DateTime<Utc>,
}

/// Normalized records plus the indexes derived from them.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    options: FilterOptions,
    provenance: Option<Provenance>,
}

impl Dataset {
    /// Build a dataset from records that are already normalized.
    pub fn new(records: Vec<Record>, source: DataSource) -> Self {
        let options = build_options(&records);
        Self {
            records,
            options,
            provenance: Some(Provenance {
                source,
                loaded_at: Utc::now(),
            }),
        }
    }

    /// Normalize raw archive text and index the result.
    pub fn from_raw(raw: &str, source: DataSource) -> Self {
        Self::new(normalize(raw), source)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// `None` until something has been loaded.
    pub fn provenance(&self) -> Option<Provenance> {
        self.provenance
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records satisfying every constraint in `filter`, in dataset order.
    ///
    /// Callers reject an empty filter before getting here; an empty filter
    /// constrains nothing and would match every record.
    pub fn search(&self, filter: &Filter) -> Vec<&Record> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }
}

/// Shared handle to the current [`Dataset`].
///
/// Cloning the handle shares the same cell. The lock is only held while the
/// `Arc` is read or replaced, so a reader sees either the old dataset or the
/// new one, never a mix.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    current: Arc<RwLock<Arc<Dataset>>>,
}

impl Catalog {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(dataset))),
        }
    }

    /// The dataset published most recently.
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.current.read().expect("catalog lock poisoned").clone()
    }

    /// Replace the current dataset wholesale and return the new snapshot.
    pub fn publish(&self, dataset: Dataset) -> Arc<Dataset> {
        let next = Arc::new(dataset);
        *self.current.write().expect("catalog lock poisoned") = Arc::clone(&next);
        next
    }
}
