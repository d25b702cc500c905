//! JSON file-based token store.
//!
//! The token file is tiny and rewritten whole on every change. Writes go to a
//! temporary sibling first and are renamed into place, so a crash never leaves
//! a half-written file behind.

use crate::domain::error::{BloglineError, Result};
use crate::storage::backend::TokenStore;
use crate::storage::models::TokenRecord;
use std::path::{Path, PathBuf};

/// JSON file token store.
///
/// The record is loaded once on creation and kept in memory; reads never touch
/// the disk again.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is owned by the session context and
/// only used from the store's thread.
pub struct JsonTokenStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the file.
    data: TokenRecord,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonTokenStore {
    /// Creates or opens a token file.
    ///
    /// Parent directories are created automatically. A missing file is an
    /// empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing token store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no token file yet");
            TokenRecord::default()
        };

        tracing::debug!(has_token = data.token.is_some(), "token store initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<TokenRecord> {
        let contents = std::fs::read_to_string(path)?;
        let data: TokenRecord = serde_json::from_str(&contents)
            .map_err(|e| BloglineError::Storage(format!("failed to parse token file: {e}")))?;

        tracing::debug!(version = data.version, "loaded token file");
        Ok(data)
    }

    /// Writes the record atomically (temp file + rename).
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| BloglineError::Storage(format!("failed to serialize token file: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "token file saved");
        Ok(())
    }
}

impl TokenStore for JsonTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.data.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<()> {
        let _span = tracing::debug_span!("token_store_save").entered();

        self.data = TokenRecord::new(token);
        self.dirty = true;
        self.save_to_file()
    }

    fn clear(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("token_store_clear").entered();

        if self.data.token.is_none() && !self.file_path.exists() {
            return Ok(());
        }
        self.data = TokenRecord::default();
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonTokenStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty token file on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save token file on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = JsonTokenStore::new(path.clone()).unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.save("abc").unwrap();
        drop(store);

        let reopened = JsonTokenStore::new(path).unwrap();
        assert_eq!(reopened.load().unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn clear_persists_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = JsonTokenStore::new(path.clone()).unwrap();
        store.save("abc").unwrap();
        store.clear().unwrap();
        assert!(!path.with_extension("tmp").exists());

        let reopened = JsonTokenStore::new(path).unwrap();
        assert_eq!(reopened.load().unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonTokenStore::new(path).err().unwrap();
        assert!(matches!(err, BloglineError::Storage(_)));
    }

    #[test]
    fn clearing_an_empty_store_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = JsonTokenStore::new(path.clone()).unwrap();
        store.clear().unwrap();
        assert!(!path.exists());
    }
}
