//! A cache of stores keyed by their source file.
//!
//! The registry is an explicit object rather than process-global state:
//! each subsystem owns one and decides its lifetime. Handles are
//! `Arc<Mutex<Store>>`, so callers sharing a file serialize their access
//! through the lock and the last handle dropped performs the store's
//! flush-on-drop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::store::Store;
use crate::{Error, Result};

/// Shared handle to a cached store.
pub type StoreHandle = Arc<Mutex<Store>>;

/// Caches one [`Store`] per source path.
#[derive(Debug, Default)]
pub struct Registry {
    stores: HashMap<String, StoreHandle>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The store for `source`, loading it on first request. Later calls
    /// with the same source return the same handle.
    pub fn open(&mut self, source: &str) -> StoreHandle {
        if let Some(handle) = self.stores.get(source) {
            debug!(%source, "reusing cached store");
            return Arc::clone(handle);
        }
        info!(%source, "opening store");
        let handle = Arc::new(Mutex::new(Store::open(source)));
        self.stores.insert(source.to_string(), Arc::clone(&handle));
        handle
    }

    /// The cached handle for `source`, if it was opened.
    pub fn get(&self, source: &str) -> Option<StoreHandle> {
        self.stores.get(source).map(Arc::clone)
    }

    /// Re-reads `source` from disk into its cached store, discarding any
    /// unsaved changes.
    ///
    /// A lock poisoned by a panicked holder is recovered — the reload
    /// replaces the store's state wholesale, so whatever the holder left
    /// half-done is overwritten anyway.
    pub fn reload(&self, source: &str) -> Result<()> {
        let handle = self.stores.get(source).ok_or_else(|| Error::UnknownSource {
            name: source.to_string(),
        })?;
        let mut store = handle.lock().unwrap_or_else(PoisonError::into_inner);
        store.load_from_file(source)
    }

    /// Drops `source` from the cache. Returns `false` when it was never
    /// opened. Outstanding handles stay valid; the store flushes when the
    /// last one goes away.
    pub fn evict(&mut self, source: &str) -> bool {
        self.stores.remove(source).is_some()
    }

    /// Number of cached stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// True when nothing has been opened yet.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
