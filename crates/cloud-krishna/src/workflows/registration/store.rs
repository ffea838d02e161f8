use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::domain::StudentId;
use super::repository::{ApplicationMarkerStore, MarkerStoreError};

/// Key under which the re-submission marker is persisted.
pub const APPLICATION_MARKER_KEY: &str = "application-id";

/// Process-local marker store, suitable for tests and embedded sessions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMarkerStore {
    value: Arc<Mutex<Option<StudentId>>>,
}

impl InMemoryMarkerStore {
    pub fn with_marker(id: StudentId) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(id))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<StudentId>>, MarkerStoreError> {
        self.value
            .lock()
            .map_err(|_| MarkerStoreError::Unavailable("marker mutex poisoned".to_string()))
    }
}

impl ApplicationMarkerStore for InMemoryMarkerStore {
    fn get(&self) -> Result<Option<StudentId>, MarkerStoreError> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, id: &StudentId) -> Result<(), MarkerStoreError> {
        *self.lock()? = Some(id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), MarkerStoreError> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Marker persisted as a single file named `application-id` inside a state directory.
#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    path: PathBuf,
}

impl FileMarkerStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(APPLICATION_MARKER_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ApplicationMarkerStore for FileMarkerStore {
    fn get(&self) -> Result<Option<StudentId>, MarkerStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let value = raw.trim();
                if value.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(StudentId(value.to_string())))
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, id: &StudentId) -> Result<(), MarkerStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, id.as_str())?;
        debug!(path = %self.path.display(), "application marker written");
        Ok(())
    }

    fn clear(&self) -> Result<(), MarkerStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_marker() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileMarkerStore::new(dir.path().join("nested"));

        assert!(store.get().expect("read empty").is_none());

        store
            .set(&StudentId("665f1c2e9b".to_string()))
            .expect("write marker");
        assert_eq!(
            store.get().expect("read marker"),
            Some(StudentId("665f1c2e9b".to_string()))
        );
        assert!(store.path().ends_with(APPLICATION_MARKER_KEY));

        store.clear().expect("clear marker");
        assert!(store.get().expect("read cleared").is_none());
    }

    #[test]
    fn clearing_missing_marker_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileMarkerStore::new(dir.path());
        store.clear().expect("clear is idempotent");
    }

    #[test]
    fn blank_marker_file_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileMarkerStore::new(dir.path());
        fs::write(store.path(), "  \n").expect("seed file");
        assert!(store.get().expect("read").is_none());
    }

    #[test]
    fn in_memory_store_starts_with_seeded_marker() {
        let store = InMemoryMarkerStore::with_marker(StudentId("abc".to_string()));
        assert_eq!(
            store.get().expect("read"),
            Some(StudentId("abc".to_string()))
        );
        store.clear().expect("clear");
        assert!(store.get().expect("read").is_none());
    }
}
