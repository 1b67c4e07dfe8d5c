//! Triage error types
//!
//! Degenerate inputs (no tags, no knowledge-base hits, no free agent,
//! escalating a terminal ticket) are ordinary values in this crate. Only
//! malformed input and infrastructure faults end up here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for triage operations
pub type TriageResult<T> = Result<T, TriageError>;

/// Errors surfaced by the triage engine
#[derive(Debug, Error)]
pub enum TriageError {
    /// Chat session is missing a required field
    #[error("Invalid chat session: missing {field}")]
    InvalidSession { field: &'static str },

    /// Agent id not present in the directory
    #[error("Agent not found: {agent_id}")]
    AgentNotFound { agent_id: String },

    /// A shared lock was poisoned by a panicking holder
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: &'static str },

    /// Configuration could not be loaded or was out of range
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Config file could not be read
    #[error("Failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
