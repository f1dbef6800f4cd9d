//! Error types for connection resolving and the game bridge

use thiserror::Error;

/// Result type for connection operations
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Connection error types
///
/// The resolvers themselves never produce these; they surface from the
/// game bridge, scenario loading and the caller-side placement loop.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// IPC communication error
    #[error("IPC error: {0}")]
    IpcError(String),

    /// Protocol error
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Game-specific error
    #[error("Game error: {0}")]
    GameError(String),

    /// No entity with this unit number in the queried area
    #[error("Entity not found: {0}")]
    EntityNotFound(u64),

    /// Endpoint description could not be interpreted
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Every ranked pair was tried and none could be placed
    #[error("Failed to connect entities after {attempts} attempts")]
    ConnectionFailed { attempts: usize },
}

impl From<serde_json::Error> for ConnectError {
    fn from(err: serde_json::Error) -> Self {
        ConnectError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_message() {
        let err = ConnectError::ConnectionFailed { attempts: 3 };
        assert_eq!(err.to_string(), "Failed to connect entities after 3 attempts");
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: ConnectError = parse.unwrap_err().into();
        assert!(matches!(err, ConnectError::SerializationError(_)));
    }
}
