//! Engine error types.
//!
//! All engine-level failures surface to the immediate caller unmodified;
//! the engine performs no retries and no partial-failure bookkeeping.

use thiserror::Error;

/// Errors that can occur during sync and search operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The query description is malformed; raised before any network call.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Failure from the transport client (connection, timeout, protocol).
    #[error("Transport error: {0}")]
    TransportError(#[from] opensearch::Error),

    /// The engine answered with a non-success status.
    #[error("Engine returned status {status}: {body}")]
    ResponseError { status: u16, body: String },

    /// A record failed to produce its searchable projection.
    #[error("Projection error: {0}")]
    ProjectionError(#[from] serde_json::Error),

    /// Invalid connection or index configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl EngineError {
    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a response error from an engine status and body.
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::ResponseError {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
