use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use zeroize::Zeroizing;

use crate::error::StorageError;

/// Persistent slot for one account's key material.
///
/// For keystore-backed accounts the stored bytes are the serialized keystore
/// document; for raw accounts they are the 32-byte private key itself.
pub trait KeyStorage: Send + Sync {
    fn load_private_key(&self) -> Result<Zeroizing<Vec<u8>>, StorageError>;

    fn store_private_key(&self, key: &[u8]) -> Result<(), StorageError>;
}

/// Key material kept in a single file.
#[derive(Debug, Clone)]
pub struct FileKeyStorage {
    path: PathBuf,
}

impl FileKeyStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyStorage for FileKeyStorage {
    fn load_private_key(&self) -> Result<Zeroizing<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Zeroizing::new(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::Empty),
            Err(e) => Err(e.into()),
        }
    }

    fn store_private_key(&self, key: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, key)?;
        Ok(())
    }
}

/// In-process key slot, mainly for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryKeyStorage {
    slot: Mutex<Option<Zeroizing<Vec<u8>>>>,
}

impl MemoryKeyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: &[u8]) -> Self {
        Self {
            slot: Mutex::new(Some(Zeroizing::new(key.to_vec()))),
        }
    }
}

impl KeyStorage for MemoryKeyStorage {
    fn load_private_key(&self) -> Result<Zeroizing<Vec<u8>>, StorageError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| StorageError::Backend("key slot lock poisoned".into()))?;
        (*slot).clone().ok_or(StorageError::Empty)
    }

    fn store_private_key(&self, key: &[u8]) -> Result<(), StorageError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StorageError::Backend("key slot lock poisoned".into()))?;
        *slot = Some(Zeroizing::new(key.to_vec()));
        Ok(())
    }
}
