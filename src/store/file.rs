use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

const LOCK_FILE: &str = ".lock";

/// One file per key under a directory.
///
/// Writers hold an exclusive advisory lock on `<dir>/.lock` and replace the
/// value through a temp file + rename, so readers never see a torn value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data dir>/profile-intake`, or `./profile-intake` when the platform
    /// has no data directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("profile-intake")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(sanitize_filename::sanitize(key))
    }

    fn io_error(&self, path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn open_lock(&self) -> Result<File, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| self.io_error(&self.dir, e))?;
        let path = self.dir.join(LOCK_FILE);
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| self.io_error(&path, e))
    }

    /// Runs `f` while holding the exclusive lock. The lock is released when
    /// the lock file handle is dropped.
    fn with_write_lock<T>(
        &self,
        f: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let lock = self.open_lock()?;
        fs2::FileExt::lock_exclusive(&lock)
            .map_err(|e| self.io_error(&self.dir.join(LOCK_FILE), e))?;
        f()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        self.with_write_lock(|| {
            let tmp = self
                .dir
                .join(format!(".{}.tmp", uuid::Uuid::new_v4()));
            let write = || -> io::Result<()> {
                let mut file = File::create(&tmp)?;
                file.write_all(value)?;
                file.sync_all()?;
                fs::rename(&tmp, &path)
            };
            write().map_err(|e| {
                let _ = fs::remove_file(&tmp);
                self.io_error(&path, e)
            })
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        self.with_write_lock(|| match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(&path, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get("userData").unwrap().is_none());
    }

    #[test]
    fn set_then_get_survives_new_handle() {
        let dir = TempDir::new().unwrap();
        FileStore::new(dir.path().join("nested"))
            .set("userData", b"{\"a\":1}")
            .unwrap();

        let reopened = FileStore::new(dir.path().join("nested"));
        assert_eq!(
            reopened.get("userData").unwrap().as_deref(),
            Some(&b"{\"a\":1}"[..])
        );
    }

    #[test]
    fn set_overwrites_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.set("k", b"one").unwrap();
        store.set("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"two"[..]));

        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.set("k", b"v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("inner"));
        store.set("../escape", b"v").unwrap();
        assert!(!dir.path().join("escape").exists());
        assert_eq!(store.get("../escape").unwrap().as_deref(), Some(&b"v"[..]));
    }
}
