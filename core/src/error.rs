//! Error types for the catalog client.
//!
//! # Design
//! Callers in the UI layer only ever see the `Display` text of an error, so
//! the variants exist for logging and for the FFI error code. Transport,
//! status and decode failures describe their cause; `MissingResults` renders
//! as the fixed message shown when a response decodes but carries no list.

use thiserror::Error;

/// Message surfaced when a response decodes but has no result list.
pub const MISSING_RESULTS_MESSAGE: &str = "Some error";

/// Errors returned by `CatalogClient` and `Transport` implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("network request failed: {0}")]
    Transport(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The response decoded but `data.results` was absent or not a list.
    #[error("{}", MISSING_RESULTS_MESSAGE)]
    MissingResults,

    /// The client was built from an unusable configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DeserializationError(err.to_string())
    }
}
