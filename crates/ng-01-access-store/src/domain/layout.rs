//! # Storage Layout
//!
//! How an access-list snapshot maps onto key-value records:
//!
//! ```text
//! {namespace}/count    -> u32 LE entry count
//! {namespace}/uid_{i}  -> identifier bytes, 0 <= i < count
//! ```

use crate::domain::errors::{AccessStoreError, KVStoreError};
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use shared_types::Identifier;

pub const DEFAULT_NAMESPACE: &str = "access_list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    namespace: String,
}

impl StorageLayout {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn count_key(&self) -> Vec<u8> {
        format!("{}/count", self.namespace).into_bytes()
    }

    #[must_use]
    pub fn entry_key(&self, index: usize) -> Vec<u8> {
        format!("{}/uid_{}", self.namespace, index).into_bytes()
    }

    /// Stored entry count, or `None` when nothing was ever saved.
    pub fn stored_count(&self, kv: &dyn KeyValueStore) -> Result<Option<usize>, AccessStoreError> {
        let Some(raw) = kv.get(&self.count_key())? else {
            return Ok(None);
        };
        let bytes: [u8; 4] = raw.as_slice().try_into().map_err(|_| {
            AccessStoreError::CorruptSnapshot(format!("count record has {} bytes", raw.len()))
        })?;
        Ok(Some(u32::from_le_bytes(bytes) as usize))
    }

    /// Batch that writes `entries` and deletes records left over from a
    /// longer `previous_count`.
    pub fn encode(
        &self,
        entries: &[Identifier],
        previous_count: usize,
    ) -> Result<Vec<BatchOperation>, AccessStoreError> {
        let count = u32::try_from(entries.len()).map_err(|_| {
            AccessStoreError::Persistence(KVStoreError::IOError {
                message: format!("{} entries cannot be counted in u32", entries.len()),
            })
        })?;

        let mut ops = Vec::with_capacity(entries.len().max(previous_count) + 1);
        ops.push(BatchOperation::put(self.count_key(), count.to_le_bytes().to_vec()));
        for (index, entry) in entries.iter().enumerate() {
            ops.push(BatchOperation::put(
                self.entry_key(index),
                entry.as_bytes().to_vec(),
            ));
        }
        for stale in entries.len()..previous_count {
            ops.push(BatchOperation::delete(self.entry_key(stale)));
        }
        Ok(ops)
    }

    /// Read a snapshot back. Absent count means an empty list.
    pub fn decode(
        &self,
        kv: &dyn KeyValueStore,
        capacity: usize,
    ) -> Result<Vec<Identifier>, AccessStoreError> {
        let Some(count) = self.stored_count(kv)? else {
            return Ok(Vec::new());
        };
        if count > capacity {
            return Err(AccessStoreError::CorruptSnapshot(format!(
                "stored count {count} exceeds capacity {capacity}"
            )));
        }

        (0..count)
            .map(|index| {
                let raw = kv.get(&self.entry_key(index))?.ok_or_else(|| {
                    AccessStoreError::CorruptSnapshot(format!("entry {index} missing"))
                })?;
                let text = String::from_utf8(raw).map_err(|_| {
                    AccessStoreError::CorruptSnapshot(format!("entry {index} is not UTF-8"))
                })?;
                Identifier::new(text).map_err(|e| {
                    AccessStoreError::CorruptSnapshot(format!("entry {index}: {e}"))
                })
            })
            .collect()
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryKVStore;

    fn ids(values: &[&str]) -> Vec<Identifier> {
        values.iter().map(|v| Identifier::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_key_names() {
        let layout = StorageLayout::default();
        assert_eq!(layout.count_key(), b"access_list/count");
        assert_eq!(layout.entry_key(7), b"access_list/uid_7");
    }

    #[test]
    fn test_encode_then_decode() {
        let layout = StorageLayout::default();
        let mut kv = InMemoryKVStore::new();
        let entries = ids(&["A", "B", "C"]);

        kv.atomic_batch_write(layout.encode(&entries, 0).unwrap())
            .unwrap();
        assert_eq!(layout.decode(&kv, 100).unwrap(), entries);
    }

    #[test]
    fn test_shrinking_save_deletes_stale_records() {
        let layout = StorageLayout::default();
        let mut kv = InMemoryKVStore::new();
        kv.atomic_batch_write(layout.encode(&ids(&["A", "B", "C"]), 0).unwrap())
            .unwrap();
        kv.atomic_batch_write(layout.encode(&ids(&["Z"]), 3).unwrap())
            .unwrap();

        assert_eq!(layout.decode(&kv, 100).unwrap(), ids(&["Z"]));
        assert!(!kv.exists(&layout.entry_key(1)).unwrap());
        assert!(!kv.exists(&layout.entry_key(2)).unwrap());
    }

    #[test]
    fn test_decode_fresh_store_is_empty() {
        let kv = InMemoryKVStore::new();
        assert!(StorageLayout::default().decode(&kv, 100).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_missing_entry() {
        let layout = StorageLayout::default();
        let mut kv = InMemoryKVStore::new();
        kv.put(&layout.count_key(), &2u32.to_le_bytes()).unwrap();
        kv.put(&layout.entry_key(0), b"A").unwrap();

        let result = layout.decode(&kv, 100);
        assert!(matches!(result, Err(AccessStoreError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_decode_rejects_oversized_count() {
        let layout = StorageLayout::default();
        let mut kv = InMemoryKVStore::new();
        kv.put(&layout.count_key(), &500u32.to_le_bytes()).unwrap();

        let result = layout.decode(&kv, 100);
        assert!(matches!(result, Err(AccessStoreError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_decode_rejects_bad_count_width() {
        let layout = StorageLayout::default();
        let mut kv = InMemoryKVStore::new();
        kv.put(&layout.count_key(), &[1, 0]).unwrap();
        assert!(layout.decode(&kv, 100).is_err());
    }
}
