//! Error types for SeaWatch

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeawatchError {
    // Drawing errors
    #[error("Pick did not resolve to a ground coordinate")]
    PickMiss,

    #[error("A zone needs at least 3 vertices, found {found}")]
    InsufficientVertices { found: usize },

    // Zone errors
    #[error("Zone not found: {id}")]
    ZoneNotFound { id: String },

    #[error("Invalid geometry for zone {zone}: {reason}")]
    InvalidGeometry { zone: String, reason: String },

    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    // Backend errors
    #[error("Network failure: {reason}")]
    Network { reason: String },

    #[error("Server rejected request ({status}): {body}")]
    ServerRejection { status: u16, body: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SeawatchError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }

    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network { reason: reason.into() }
    }

    /// True for failures that happened at the backend boundary, including
    /// response bodies that could not be decoded
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::ServerRejection { .. } | Self::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SeawatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_rejection_message() {
        let err = SeawatchError::ServerRejection { status: 500, body: "boom".to_string() };
        assert_eq!(err.to_string(), "Server rejected request (500): boom");
        assert!(err.is_remote());
    }

    #[test]
    fn test_local_errors_are_not_remote() {
        assert!(!SeawatchError::validation("empty name").is_remote());
        assert!(!SeawatchError::InsufficientVertices { found: 2 }.is_remote());
        assert!(SeawatchError::network("timed out").is_remote());
    }
}
