//! File-based store backend for persistent storage.

use crate::backend::{Collection, Store, StoreTransaction};
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, Settings};
use crate::state::{StateTransaction, StoreState};
use parking_lot::RwLock;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A file-based store.
///
/// The four collections persist as a single JSON document. The full
/// document is kept in memory; commits rewrite the file.
///
/// # Durability
///
/// Commits write to a sibling temp file, `sync_all`, then rename over
/// the document, so a crash mid-commit leaves either the old or the
/// new contents, never a torn file.
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use growpanion_store::{Collection, FileStore, Record, Store};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("growpanion.json")).unwrap();
/// store
///     .with_transaction(&mut |txn| txn.put(Collection::Grows, Record::new("g1")))
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileStore {
    /// Opens or creates a file store at the given path.
    ///
    /// If the file exists its contents are loaded; otherwise the store
    /// starts empty and the file is created on first commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let state = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)
                .map_err(|e| StoreError::corrupted(format!("{}: {e}", path.display())))?
        } else {
            StoreState::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            state: RwLock::new(state),
        })
    }

    /// Opens or creates a file store, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file
    /// cannot be read or parsed.
    pub fn open_with_create_dirs(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &StoreState) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::corrupted(format!("serialize store: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn to_array(&self, collection: Collection) -> StoreResult<Vec<Record>> {
        Ok(self.state.read().records(collection).clone())
    }

    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>> {
        Ok(self.state.read().find(collection, id).cloned())
    }

    fn settings(&self) -> StoreResult<Option<Settings>> {
        Ok(self.state.read().settings.clone())
    }

    fn with_transaction(
        &self,
        f: &mut dyn FnMut(&mut dyn StoreTransaction) -> StoreResult<()>,
    ) -> StoreResult<()> {
        let mut txn = StateTransaction::new(self.state.read().clone());
        f(&mut txn)?;

        let next = txn.into_state();
        self.persist(&next)?;
        *self.state.write() = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn committed_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = FileStore::open(&path).unwrap();
            store
                .with_transaction(&mut |txn| {
                    txn.put(Collection::Grows, Record::new("g1").with_field("name", "tent"))?;
                    txn.put_settings(Settings::new().with_field("theme", "light"))?;
                    Ok(())
                })
                .unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.to_array(Collection::Grows).unwrap().len(), 1);
        assert!(reopened.settings().unwrap().is_some());
    }

    #[test]
    fn aborted_transaction_leaves_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store
            .with_transaction(&mut |txn| txn.put(Collection::Plants, Record::new("keep")))
            .unwrap();

        let result = store.with_transaction(&mut |txn| {
            txn.clear(Collection::Plants)?;
            Err(StoreError::aborted("test"))
        });
        assert!(result.is_err());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.to_array(Collection::Plants).unwrap().len(), 1);
    }

    #[test]
    fn corrupted_document_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupted(_))
        ));
    }
}
