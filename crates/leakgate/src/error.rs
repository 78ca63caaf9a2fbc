//! Error types for leakgate.
//!
//! The firewall is deliberately forgiving: configuration and detector
//! problems are degraded to logged warnings inside the components that
//! encounter them, so the variants here cover only the failures that a
//! caller can meaningfully react to.

use thiserror::Error;

/// The main error type for firewall operations.
#[derive(Debug, Error)]
pub enum FirewallError {
    /// An I/O error occurred while persisting state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The filter configuration could not be serialized.
    #[error("serializing filter configuration: {0}")]
    ConfigSerialize(#[from] serde_json::Error),

    /// A contextual detector implementation failed.
    ///
    /// The sanitization pipeline never surfaces this variant; it is
    /// swallowed and the remaining layers still run. It exists so
    /// detector implementations have a typed way to report failure.
    #[error("contextual detector failure: {0}")]
    Detector(String),

    /// The model backend exchange failed.
    ///
    /// The message is opaque to the core; conversation history is left
    /// untouched by a failed exchange.
    #[error("backend relay failure: {0}")]
    Relay(String),

    /// The caller submitted blank input.
    #[error("empty input")]
    EmptyInput,

    /// The backend produced an empty reply.
    #[error("backend returned an empty reply")]
    EmptyReply,
}

/// A specialized `Result` type for firewall operations.
pub type Result<T> = std::result::Result<T, FirewallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FirewallError::Relay("connection refused".to_string());
        assert_eq!(err.to_string(), "backend relay failure: connection refused");
    }

    #[test]
    fn io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = FirewallError::from(io);
        assert!(matches!(err, FirewallError::Io(_)));
    }
}
