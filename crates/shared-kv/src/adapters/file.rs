use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info};

use super::lock::{DatabaseLock, LockError};
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};

type Image = BTreeMap<Vec<u8>, Vec<u8>>;

/// File-backed key-value store for nodes without RocksDB.
///
/// The whole keyspace lives in one image file (`store.bin`): a bincode-encoded
/// ordered map followed by a CRC32 of those bytes. Every mutation writes a
/// new image to a temp file and renames it over the old one, so a single put
/// and a whole batch are equally atomic with respect to crashes. The store
/// directory is locked for the lifetime of the handle.
pub struct FileBackedKVStore {
    data: RwLock<Image>,
    dir: PathBuf,
    _lock: DatabaseLock,
}

impl FileBackedKVStore {
    const IMAGE_FILE: &'static str = "store.bin";

    /// Open (or create) the store in directory `dir`.
    ///
    /// # Errors
    ///
    /// - `Locked` if another handle already has the directory open
    /// - `OpenFailed` if the directory cannot be created
    /// - `CorruptionError` if an existing image is truncated or fails its checksum
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, KVStoreError> {
        let dir = dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&dir).map_err(|e| KVStoreError::OpenFailed {
            path: dir.clone(),
            message: e.to_string(),
        })?;

        let lock = DatabaseLock::acquire(&dir).map_err(|e| match e {
            LockError::AlreadyLocked { .. } => KVStoreError::from(e),
            other => KVStoreError::OpenFailed {
                path: dir.clone(),
                message: other.to_string(),
            },
        })?;

        let image_path = dir.join(Self::IMAGE_FILE);
        let data = if image_path.exists() {
            let data = Self::load_image(&image_path)?;
            info!(
                path = %image_path.display(),
                keys = data.len(),
                "Loaded existing store image"
            );
            data
        } else {
            info!(path = %dir.display(), "No store image found, starting empty");
            Image::new()
        };

        Ok(Self {
            data: RwLock::new(data),
            dir,
            _lock: lock,
        })
    }

    /// Directory this store lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_image(path: &Path) -> Result<Image, KVStoreError> {
        let bytes = std::fs::read(path).map_err(KVStoreError::io)?;

        if bytes.len() < 4 {
            return Err(KVStoreError::CorruptionError {
                message: format!("{}: image shorter than its checksum", path.display()),
            });
        }

        let (body, footer) = bytes.split_at(bytes.len() - 4);
        let mut expected = [0u8; 4];
        expected.copy_from_slice(footer);
        let expected = u32::from_le_bytes(expected);
        let actual = crc32fast::hash(body);
        if expected != actual {
            return Err(KVStoreError::CorruptionError {
                message: format!(
                    "{}: checksum mismatch (expected {:08x}, got {:08x})",
                    path.display(),
                    expected,
                    actual
                ),
            });
        }

        bincode::deserialize(body).map_err(|e| KVStoreError::CorruptionError {
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn save_image(&self, data: &Image) -> Result<(), KVStoreError> {
        use std::io::Write;

        let mut bytes = bincode::serialize(data).map_err(KVStoreError::io)?;
        let checksum = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&checksum.to_le_bytes());

        let image_path = self.dir.join(Self::IMAGE_FILE);
        let temp_path = image_path.with_extension("tmp");

        let mut file = std::fs::File::create(&temp_path).map_err(KVStoreError::io)?;
        file.write_all(&bytes).map_err(KVStoreError::io)?;
        file.sync_all().map_err(KVStoreError::io)?;
        std::fs::rename(&temp_path, &image_path).map_err(KVStoreError::io)?;

        debug!(keys = data.len(), bytes = bytes.len(), "Store image written");
        Ok(())
    }

    /// Apply `mutate` to a copy of the image, persist it, then publish it.
    ///
    /// If persisting fails the in-memory image is left untouched.
    fn commit(&self, mutate: impl FnOnce(&mut Image)) -> Result<(), KVStoreError> {
        let mut data = self.data.write();
        let mut next = data.clone();
        mutate(&mut next);
        self.save_image(&next)?;
        *data = next;
        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|data| {
            data.insert(key.to_vec(), value.to_vec());
        })
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        if !self.data.read().contains_key(key) {
            return Ok(());
        }
        self.commit(|data| {
            data.remove(key);
        })
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        if operations.is_empty() {
            return Ok(());
        }
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
        Ok(self.data.read().contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        let data = self.data.read();
        let results = data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(results)
    }
}
