use thiserror::Error;

use crate::domain::{PlayerName, TournamentId};

/// Failure of the underlying key-value provider.
///
/// Fatal for the operation that hit it: the mutation is abandoned and the
/// previously persisted document stays as it was.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing {key}: {required} bytes needed, {capacity} bytes available")]
    QuotaExceeded {
        key: String,
        required: usize,
        capacity: usize,
    },

    #[error("failed to {operation} key {key}")]
    Io {
        operation: &'static str,
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("database error while accessing key {key}")]
    Database {
        key: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to get database connection from pool")]
    Pool(#[from] r2d2::Error),

    #[error("failed to serialize document {key}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Caller-supplied input rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("player name must not be blank")]
    BlankName,
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcomes of a rejected tournament join, in the order they are checked.
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("player name must not be blank")]
    InvalidName,

    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("{player} has already joined tournament {tournament}")]
    AlreadyJoined {
        tournament: TournamentId,
        player: PlayerName,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ValidationError> for JoinError {
    fn from(_: ValidationError) -> Self {
        JoinError::InvalidName
    }
}

impl JoinError {
    /// Whether this is an expected business outcome rather than a failure.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, JoinError::Storage(_))
    }
}

/// Context message for reading a stored document
pub fn load_context(key: &str) -> String {
    format!("Failed to load document {}", key)
}

/// Context message for writing a stored document
pub fn store_context(key: &str) -> String {
    format!("Failed to store document {}", key)
}
