//! Error types for opencti-mcp
//!
//! Centralized error handling using thiserror. The set is closed so the
//! tool boundary can tell transport failures from rejected queries
//! without looking at message text.

use thiserror::Error;

/// How the transport to the knowledge base failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// Server answered with a non-2xx HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// DNS, connect, timeout or body read failure
    #[error("{0}")]
    Network(String),
}

/// All error types that can occur in opencti-mcp
#[derive(Debug, Error)]
pub enum OpenCtiError {
    /// Required startup configuration missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Knowledge base reached but rejected the query
    #[error("GraphQL error: {0}")]
    RemoteApplication(String),

    /// Knowledge base unreachable or answered with a failure status
    #[error("Transport error: {0}")]
    RemoteTransport(TransportFailure),

    /// Anything else that went wrong during the exchange
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OpenCtiError {
    pub fn status(code: u16) -> Self {
        OpenCtiError::RemoteTransport(TransportFailure::Status(code))
    }

    pub fn network(message: impl Into<String>) -> Self {
        OpenCtiError::RemoteTransport(TransportFailure::Network(message.into()))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, OpenCtiError::RemoteTransport(_))
    }

    /// HTTP status carried by a transport failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            OpenCtiError::RemoteTransport(TransportFailure::Status(code)) => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OpenCtiError {
    fn from(err: serde_json::Error) -> Self {
        OpenCtiError::Internal(format!("JSON error: {}", err))
    }
}

/// Result type alias for opencti-mcp operations
pub type Result<T> = std::result::Result<T, OpenCtiError>;
