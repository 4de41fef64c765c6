//! Local persistence for the last successful comparison.
//!
//! Exactly one entry is kept. Backends only move strings around; JSON encoding
//! and recovery from a corrupt entry live in [`restore_result`] and
//! [`persist_result`] so every backend behaves the same.

use std::cell::RefCell;

use api::ComparisonResult;
use thiserror::Error;
use tracing::{debug, warn};

/// Key of the cached result in browser storage.
pub const RESULTS_KEY: &str = "results";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cached result is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub trait ResultStore {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, payload: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Read the cached result. A corrupt entry is removed and treated as absent.
pub fn restore_result<S: ResultStore + ?Sized>(store: &S) -> Option<ComparisonResult> {
    let raw = match store.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(%err, "could not read cached result");
            return None;
        }
    };

    // Older builds wrote the literal `null` on reset.
    if raw.trim() == "null" {
        return None;
    }

    match serde_json::from_str::<ComparisonResult>(&raw) {
        Ok(result) => {
            debug!(models = result.models.len(), "restored cached result");
            Some(result)
        }
        Err(err) => {
            let err = StorageError::from(err);
            warn!(%err, "dropping cached result");
            if let Err(err) = store.clear() {
                warn!(%err, "could not remove corrupt cache entry");
            }
            None
        }
    }
}

/// Mirror the committed result into the store (`None` removes the entry).
pub fn persist_result<S: ResultStore + ?Sized>(
    store: &S,
    result: Option<&ComparisonResult>,
) -> Result<(), StorageError> {
    match result {
        Some(result) => {
            let payload = serde_json::to_string(result)?;
            store.save(&payload)
        }
        None => store.clear(),
    }
}

/// In-process store, used by tests and as a fallback when no durable storage exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(payload.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl ResultStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        self.slot.replace(Some(payload.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.slot.replace(None);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{ResultStore, StorageError};

    /// Single JSON file under the application's data directory.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn in_data_dir() -> Result<Self, StorageError> {
            let dirs = directories::ProjectDirs::from("com", "MLCompare", "MLCompare").ok_or_else(
                || StorageError::Unavailable("unable to determine data directory".into()),
            )?;
            Ok(Self::new(dirs.data_dir().join("results.json")))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl ResultStore for FileStore {
        fn load(&self) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(&self.path) {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        fn save(&self, payload: &str) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, payload)?;
            Ok(())
        }

        fn clear(&self) -> Result<(), StorageError> {
            match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStore;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{ResultStore, StorageError, RESULTS_KEY};

    /// `window.localStorage`, one key.
    #[derive(Debug, Clone, Default)]
    pub struct BrowserStore;

    impl BrowserStore {
        fn storage(&self) -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .ok_or_else(|| StorageError::Unavailable("window unavailable".into()))?
                .local_storage()
                .map_err(|_| StorageError::Unavailable("localStorage blocked".into()))?
                .ok_or_else(|| StorageError::Unavailable("localStorage missing".into()))
        }
    }

    impl ResultStore for BrowserStore {
        fn load(&self) -> Result<Option<String>, StorageError> {
            self.storage()?
                .get_item(RESULTS_KEY)
                .map_err(|_| StorageError::Unavailable("localStorage read failed".into()))
        }

        fn save(&self, payload: &str) -> Result<(), StorageError> {
            self.storage()?
                .set_item(RESULTS_KEY, payload)
                .map_err(|_| StorageError::Unavailable("localStorage quota exceeded".into()))
        }

        fn clear(&self) -> Result<(), StorageError> {
            self.storage()?
                .remove_item(RESULTS_KEY)
                .map_err(|_| StorageError::Unavailable("localStorage remove failed".into()))
        }
    }
}

impl<T: ResultStore + ?Sized> ResultStore for Box<T> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        (**self).save(payload)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// Durable store for the current platform, or an in-memory one when the
/// platform offers none (results then last for the session only).
pub fn platform_store() -> Box<dyn ResultStore> {
    #[cfg(target_arch = "wasm32")]
    let durable: Result<Box<dyn ResultStore>, StorageError> = Ok(Box::new(BrowserStore));

    #[cfg(not(target_arch = "wasm32"))]
    let durable: Result<Box<dyn ResultStore>, StorageError> =
        FileStore::in_data_dir().map(|store| Box::new(store) as Box<dyn ResultStore>);

    match durable {
        Ok(store) => store,
        Err(err) => {
            warn!(%err, "falling back to in-memory result cache");
            Box::new(MemoryStore::new())
        }
    }
}
