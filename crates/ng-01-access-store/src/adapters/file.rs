use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

type Records = BTreeMap<Vec<u8>, Vec<u8>>;

/// Key-value store persisted to a single file.
///
/// File format is a flat run of `[key_len:u32 LE][key][value_len:u32 LE][value]`
/// records. Every write rewrites the file through a temp file and rename, so
/// a crash leaves either the old or the new contents on disk.
pub struct FileBackedKVStore {
    data: Records,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`. A missing file yields an empty store; a
    /// truncated one is reported as corruption.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                let data = decode_records(&bytes)?;
                info!(
                    "[ng-01] 💾 Loaded {} keys from {} ({} bytes)",
                    data.len(),
                    path.display(),
                    bytes.len()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[ng-01] 📁 No existing storage file at {}", path.display());
                Records::new()
            }
            Err(e) => return Err(KVStoreError::io(e)),
        };

        Ok(Self { data, path })
    }

    /// Like `open`, but a corrupt file is treated as empty and will be
    /// overwritten by the next write.
    pub fn open_or_reset<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        match Self::open(&path) {
            Err(KVStoreError::CorruptionError { message }) => {
                warn!(
                    "[ng-01] ⚠️ Discarding corrupt storage file {}: {}",
                    path.as_ref().display(),
                    message
                );
                Ok(Self {
                    data: Records::new(),
                    path: path.as_ref().to_path_buf(),
                })
            }
            other => other,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &Records) -> Result<(), KVStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(KVStoreError::io)?;
        }

        let bytes = encode_records(data)?;
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(KVStoreError::io)?;
        file.write_all(&bytes).map_err(KVStoreError::io)?;
        file.sync_all().map_err(KVStoreError::io)?;
        std::fs::rename(&temp_path, &self.path).map_err(KVStoreError::io)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Storage file written");
        Ok(())
    }

    /// Apply `mutate` to a copy, persist it, then adopt it. On failure the
    /// in-memory view is left untouched.
    fn commit<F: FnOnce(&mut Records)>(&mut self, mutate: F) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        mutate(&mut next);
        self.persist(&next)?;
        self.data = next;
        Ok(())
    }
}

fn encode_records(data: &Records) -> Result<Vec<u8>, KVStoreError> {
    let mut bytes = Vec::new();
    for (key, value) in data {
        for field in [key, value] {
            let len = u32::try_from(field.len()).map_err(|_| KVStoreError::IOError {
                message: format!("record of {} bytes is too large", field.len()),
            })?;
            bytes.extend_from_slice(&len.to_le_bytes());
            bytes.extend_from_slice(field);
        }
    }
    Ok(bytes)
}

fn decode_records(bytes: &[u8]) -> Result<Records, KVStoreError> {
    let mut data = Records::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let key = read_field(bytes, &mut cursor)?;
        let value = read_field(bytes, &mut cursor)?;
        data.insert(key, value);
    }

    Ok(data)
}

fn read_field(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, KVStoreError> {
    let at = *cursor;
    let truncated = || KVStoreError::CorruptionError {
        message: format!("storage file truncated at byte {at}"),
    };

    let header: [u8; 4] = bytes
        .get(at..at + 4)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(truncated)?;
    let len = u32::from_le_bytes(header) as usize;
    let start = at + 4;
    let field = bytes.get(start..start + len).ok_or_else(truncated)?;
    *cursor = start + len;
    Ok(field.to_vec())
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|data| {
            data.insert(key.to_vec(), value.to_vec());
        })
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|data| {
            data.remove(key);
        })
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.commit(|data| {
            for op in operations {
                match op {
                    BatchOperation::Put { key, value } => {
                        data.insert(key, value);
                    }
                    BatchOperation::Delete { key } => {
                        data.remove(&key);
                    }
                }
            }
        })
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(self
            .data
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
