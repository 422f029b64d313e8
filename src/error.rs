//! Error types for hwcap operations.
//!
//! This module defines [`HwcapError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Detection probes never surface errors: a failed probe excludes its
//!   capability and detection continues.
//! - Installation errors are caught per capability by the orchestrator and
//!   aggregated into a batch report; they do not abort the batch.
//! - Use `anyhow::Error` (via `HwcapError::Other`) for unexpected errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::capability::Capability;

/// Core error type for hwcap operations.
#[derive(Debug, Error)]
pub enum HwcapError {
    /// The third-party artifact is an empty placeholder; the operator has not
    /// supplied the real binary yet. Recoverable by re-upload.
    #[error("{capability}: artifact at {path} has zero size")]
    MissingArtifact {
        capability: Capability,
        path: PathBuf,
    },

    /// The artifact's digest matches no trusted catalog record for this
    /// platform. The binary is never installed. Recoverable by re-upload.
    #[error("{capability}: artifact at {path} failed checksum validation")]
    ChecksumMismatch {
        capability: Capability,
        path: PathBuf,
    },

    /// An OS tool (dpkg, apt-get, snap, ...) ran and reported failure.
    /// Carries the tool's own message.
    #[error("{tool} failed: {message}")]
    UnderlyingTool { tool: String, message: String },

    /// A command could not be started at all (binary missing, spawn error).
    #[error("command failed to start: {command}")]
    CommandFailed { command: String },

    /// Probe tool output could not be parsed.
    #[error("failed to parse {tool} output: {message}")]
    InvalidOutput { tool: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for hwcap operations.
pub type Result<T> = std::result::Result<T, HwcapError>;
