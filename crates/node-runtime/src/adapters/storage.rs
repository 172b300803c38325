//! Storage backend selection.

use crate::container::config::StorageConfig;
use ng_01_access_store::{FileBackedKVStore, InMemoryKVStore, KVStoreError, KeyValueStore};
use tracing::info;

/// File-backed store at the configured path, or memory when none is set.
pub fn open_persistence(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>, KVStoreError> {
    match &config.path {
        Some(path) => Ok(Box::new(FileBackedKVStore::open_or_reset(path)?)),
        None => {
            info!("No storage path configured, access list will not survive restart");
            Ok(Box::new(InMemoryKVStore::new()))
        }
    }
}
