//! Error types for the save-game adapter

use thiserror::Error;

/// Failure reported by the remote table store.
///
/// These never reach callers of the adapter as `Err`; they are logged and
/// carried inside a fallback outcome instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never completed (DNS, TLS, connection reset, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("Remote API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend is switched off or unreachable
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    /// The response body could not be understood
    #[error("Failed to decode remote response: {0}")]
    Decode(String),
}

/// Failure of the local key-value fallback.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Local store quota exceeded writing '{key}': {needed} bytes needed, {capacity} bytes available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        capacity: usize,
    },

    #[error("Malformed value stored under '{key}': {source}")]
    Malformed {
        key: String,
        source: serde_json::Error,
    },

    #[error("Failed to acquire {0} lock on local store")]
    Poisoned(&'static str),
}

/// General adapter error type
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Local(#[from] LocalStoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::Api {
            status: 409,
            message: "duplicate key value".to_string(),
        };
        assert_eq!(err.to_string(), "Remote API error (409): duplicate key value");
    }

    #[test]
    fn test_local_error_is_transparent() {
        let err: SaveError = LocalStoreError::QuotaExceeded {
            key: "gameSave".to_string(),
            needed: 10,
            capacity: 4,
        }
        .into();
        assert!(err.to_string().starts_with("Local store quota exceeded"));
    }
}
