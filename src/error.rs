//! Error types for Reachflow.
//!
//! All errors in Reachflow are represented by the `ReachflowError` enum,
//! which provides specific variants for different error categories.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Reachflow operations.
///
/// Each variant represents a specific category of error that can occur
/// during workflow design, validation, execution, or storage operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum ReachflowError {
    /// Engine-level errors (startup, shutdown, configuration).
    #[error("{0}")]
    Engine(String),

    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, config payloads).
    #[error("{0}")]
    Convert(String),

    /// Design-time validation errors blocking activation.
    #[error("{0}")]
    Validation(String),

    /// Runtime execution errors.
    #[error("{0}")]
    Runtime(String),

    /// Storage operation errors.
    #[error("{0}")]
    Store(String),

    /// Execution record lifecycle errors.
    #[error("{0}")]
    Record(String),

    /// Workflow definition errors.
    #[error("{0}")]
    Workflow(String),

    /// Node definition or configuration errors.
    #[error("{0}")]
    Node(String),

    /// Edge definition errors.
    #[error("{0}")]
    Edge(String),

    /// Collaborator call errors (messaging, webhook, AI, contact data).
    #[error("{0}")]
    Collab(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),

    /// Message queue errors.
    #[error("{0}")]
    Queue(String),
}

impl From<ReachflowError> for String {
    fn from(val: ReachflowError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for ReachflowError {
    fn from(error: std::io::Error) -> Self {
        ReachflowError::IoError(error.to_string())
    }
}

impl From<ReachflowError> for std::io::Error {
    fn from(val: ReachflowError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for ReachflowError {
    fn from(error: serde_json::Error) -> Self {
        ReachflowError::Convert(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for ReachflowError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        ReachflowError::Node(error.to_string())
    }
}
