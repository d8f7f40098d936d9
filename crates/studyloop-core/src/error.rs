//! Core error types for studyloop-core.
//!
//! Failures inside the engine's own operations are resolved into state
//! transitions rather than surfaced to callers; the types here cover the
//! boundaries where an error *is* part of the contract (store writes, API
//! calls, operations invoked from an invalid state).

use std::path::PathBuf;
use thiserror::Error;

use crate::api::ApiError;
use crate::session::SessionStatus;

/// Top-level error type for studyloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Review API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the durable review store.
///
/// The engine never propagates these to its caller: a failed store
/// operation is logged and the session degrades to non-durable rather
/// than crashing.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to write a session record to the backing medium
    #[error("Failed to write session record at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored record could not be serialized
    #[error("Failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),

    /// No session record exists for the deck
    #[error("No session record for deck '{deck_id}'")]
    NoSession { deck_id: String },
}

/// Session lifecycle errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// An operation was invoked from a state that does not permit it.
    #[error("Cannot {operation} while session is {status}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// An operation that needs a live session was invoked without one.
    #[error("No session in progress")]
    NoSession,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
