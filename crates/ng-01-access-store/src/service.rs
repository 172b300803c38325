//! # Access List Repository
//!
//! Shared handle over the node's `AccessStore` and its persistence.
//!
//! Reads take a shared lock and never block on disk. Writers that persist
//! are serialized by the persistence mutex, mutate under the store lock,
//! release it, then write the snapshot they produced. The on-disk copy
//! therefore always matches one state the in-memory store actually held.

use crate::domain::errors::AccessStoreError;
use crate::domain::layout::StorageLayout;
use crate::domain::store::AccessStore;
use crate::ports::outbound::KeyValueStore;
use parking_lot::{Mutex, RwLock};
use shared_types::Identifier;
use tracing::{debug, info, warn};

pub struct AccessListRepository {
    store: RwLock<AccessStore>,
    persistence: Mutex<Box<dyn KeyValueStore>>,
    layout: StorageLayout,
}

impl AccessListRepository {
    pub fn new(capacity: usize, persistence: Box<dyn KeyValueStore>, layout: StorageLayout) -> Self {
        Self {
            store: RwLock::new(AccessStore::new(capacity)),
            persistence: Mutex::new(persistence),
            layout,
        }
    }

    #[must_use]
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.store.read().contains(identifier)
    }

    /// Insert without persisting. Returns the evicted entry, if any.
    pub fn insert(&self, identifier: Identifier) -> Option<Identifier> {
        let evicted = self.store.write().insert(identifier);
        if let Some(ref old) = evicted {
            debug!("[ng-01] Evicted oldest entry {} to make room", old);
        }
        evicted
    }

    /// Remove an identifier and persist the result.
    ///
    /// Returns `Ok(false)` when the identifier was not present; nothing is
    /// written in that case.
    pub fn remove_and_persist(&self, identifier: &Identifier) -> Result<bool, AccessStoreError> {
        let mut kv = self.persistence.lock();
        let snapshot = {
            let mut store = self.store.write();
            if !store.remove(identifier) {
                return Ok(false);
            }
            store.snapshot()
        };
        self.write_snapshot(&mut **kv, &snapshot)?;
        Ok(true)
    }

    /// Replace the whole list and persist it.
    ///
    /// Over-capacity input is rejected before anything changes. A
    /// `Persistence` error means memory holds the new list but disk does not.
    pub fn replace_and_persist(&self, identifiers: Vec<Identifier>) -> Result<usize, AccessStoreError> {
        let mut kv = self.persistence.lock();
        let snapshot = {
            let mut store = self.store.write();
            store.replace_all(identifiers)?;
            store.snapshot()
        };
        self.write_snapshot(&mut **kv, &snapshot)?;
        info!("[ng-01] Access list replaced ({} entries)", snapshot.len());
        Ok(snapshot.len())
    }

    /// Replace the in-memory list with the persisted snapshot.
    ///
    /// On any failure the in-memory list is left as it was.
    pub fn load(&self) -> Result<usize, AccessStoreError> {
        let kv = self.persistence.lock();
        let capacity = self.store.read().capacity();
        let entries = self.layout.decode(&**kv, capacity)?;
        let count = entries.len();
        self.store.write().replace_all(entries)?;
        info!("[ng-01] 💾 Loaded {} entries from persistent storage", count);
        Ok(count)
    }

    /// Persist the current in-memory list.
    pub fn save(&self) -> Result<(), AccessStoreError> {
        let mut kv = self.persistence.lock();
        let snapshot = self.store.read().snapshot();
        self.write_snapshot(&mut **kv, &snapshot)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Identifier> {
        self.store.read().snapshot()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.store.read().capacity()
    }

    fn write_snapshot(
        &self,
        kv: &mut dyn KeyValueStore,
        snapshot: &[Identifier],
    ) -> Result<(), AccessStoreError> {
        let previous = match self.layout.stored_count(&*kv) {
            Ok(count) => count.unwrap_or(0),
            Err(e) => {
                warn!("[ng-01] Ignoring unreadable stored count: {}", e);
                0
            }
        };
        let ops = self.layout.encode(snapshot, previous)?;
        kv.atomic_batch_write(ops).map_err(|e| {
            warn!("[ng-01] Failed to persist access list: {}", e);
            AccessStoreError::Persistence(e)
        })
    }
}
