//! Persisted game-zone documents.
//!
//! Each store keeps exactly one JSON document under a fixed key and rewrites
//! it whole on every mutation. Nothing is cached between calls: every
//! operation loads a fresh copy, modifies it, and stores it back. This is
//! fine for a handful of kilobytes and is not meant to scale further.

pub mod scores;
pub mod tournaments;

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::StorageError;
use crate::storage::KeyValueStorage;

pub use scores::ScoreStore;
pub use tournaments::TournamentStore;

/// Reads the document under `key`.
///
/// A missing key and a value that no longer parses are both `None`, so a
/// corrupted document is replaced by a fresh one instead of failing forever.
fn load_document<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(document) => Ok(Some(document)),
        Err(e) => {
            warn!(
                "Discarding malformed document {}: {}. First 200 chars: {}",
                key,
                e,
                raw.chars().take(200).collect::<String>()
            );
            Ok(None)
        }
    }
}

fn save_document<T, S>(storage: &S, key: &str, document: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStorage + ?Sized,
{
    let json = serde_json::to_string(document).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    storage.set(key, &json)
}
