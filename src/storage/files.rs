use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{KeyValueStorage, ensure_capacity};
use crate::errors::StorageError;

/// Sequence for temp file names, shared by every handle in the process
static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Directory-backed provider: one `<key>.json` file per key
pub struct FileStorage {
    dir: PathBuf,
    capacity: Option<usize>,
}

impl FileStorage {
    /// Open (and create if needed) the storage directory
    pub fn new<P: AsRef<Path>>(dir: P, capacity: Option<usize>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();

        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            operation: "create directory for",
            key: dir.display().to_string(),
            source,
        })?;

        info!("Using file storage at {}", dir.display());
        Ok(Self { dir, capacity })
    }

    // --- Helper Methods ---

    fn build_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// A fresh name per write, so concurrent writers never share a temp file
    fn build_temp_path(&self, key: &str) -> PathBuf {
        let sequence = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!("{}.json.{}.{}.tmp", key, std::process::id(), sequence))
    }

    fn used_by_others(&self, key: &str) -> Result<usize, StorageError> {
        let own = self.build_path(key);
        let io_error = |source| StorageError::Io {
            operation: "measure",
            key: key.to_string(),
            source,
        };

        let mut total = 0usize;
        for entry in fs::read_dir(&self.dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path == own || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            total += fs::metadata(&path).map_err(io_error)?.len() as usize;
        }
        Ok(total)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.build_path(key);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    operation: "read",
                    key: key.to_string(),
                    source,
                });
            }
        };

        debug!("Loaded {} bytes from {}", contents.len(), path.display());
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        ensure_capacity(key, self.used_by_others(key)?, value.len(), self.capacity)?;

        let path = self.build_path(key);
        let temp_path = self.build_temp_path(key);
        let io_error = |source| StorageError::Io {
            operation: "write",
            key: key.to_string(),
            source,
        };

        // Rename over the old file so readers never see a half-written value
        let written = fs::write(&temp_path, value).and_then(|_| fs::rename(&temp_path, &path));
        if let Err(source) = written {
            if let Err(e) = fs::remove_file(&temp_path) {
                warn!("Could not remove {}: {}", temp_path.display(), e);
            }
            return Err(io_error(source));
        }

        debug!("Saved {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("game_zone_files_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_storage_save_and_load() {
        let dir = scratch_dir("roundtrip");
        let storage = FileStorage::new(&dir, None).unwrap();

        assert_eq!(storage.get("board").unwrap(), None);

        storage.set("board", "{\"dice\":[]}").unwrap();
        assert_eq!(storage.get("board").unwrap().as_deref(), Some("{\"dice\":[]}"));
        assert!(dir.join("board.json").exists());
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name != "board.json")
            .collect();
        assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);

        // Cleanup
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_storage_quota() {
        let dir = scratch_dir("quota");
        let storage = FileStorage::new(&dir, Some(10)).unwrap();

        storage.set("a", "123456").unwrap();
        // Replacing a key does not count its old value
        storage.set("a", "1234567").unwrap();

        let result = storage.set("b", "12345");
        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert_eq!(storage.get("b").unwrap(), None);
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1234567"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_concurrent_writers_never_tear_reads() {
        let dir = scratch_dir("concurrent");
        let first = FileStorage::new(&dir, None).unwrap();
        let second = FileStorage::new(&dir, None).unwrap();
        let a = "a".repeat(64 * 1024);
        let b = "b".repeat(64 * 1024);
        first.set("board", &a).unwrap();

        std::thread::scope(|scope| {
            for (storage, value) in [(&first, &a), (&second, &b)] {
                scope.spawn(move || {
                    for _ in 0..50 {
                        storage.set("board", value).unwrap();
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..200 {
                    let read = second.get("board").unwrap().unwrap();
                    assert!(read == a || read == b, "torn read of {} bytes", read.len());
                }
            });
        });

        let names: Vec<_> = fs::read_dir(&dir).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec!["board.json"]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
