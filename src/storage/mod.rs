pub mod files;
pub mod memory;

use std::sync::Arc;

use crate::errors::StorageError;

pub use files::FileStorage;
pub use memory::MemoryStorage;

/// Synchronous string key-value provider the stores persist into.
///
/// `set` replaces the whole value or fails without touching the previous
/// one. There is no locking across a `get` followed by a `set`: concurrent
/// writers from separate processes are last-writer-wins.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Rejects a write whose resulting total would exceed `capacity`.
///
/// `used_by_others` is the byte count of every stored value except the one
/// under `key`, which the write replaces.
pub fn ensure_capacity(
    key: &str,
    used_by_others: usize,
    value_len: usize,
    capacity: Option<usize>,
) -> Result<(), StorageError> {
    let Some(capacity) = capacity else {
        return Ok(());
    };

    let required = used_by_others + value_len;
    if required > capacity {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            required,
            capacity,
        });
    }
    Ok(())
}
