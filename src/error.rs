//! Error types for Gantry operations.
//!
//! This module defines [`GantryError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `GantryError` for operational errors that need distinct handling
//! - Use `anyhow::Error` (via `GantryError::Other`) for unexpected errors
//! - Capability failures are NOT errors: a missing engine or a denied
//!   microphone becomes a `fail` result in the readiness snapshot, never an
//!   `Err`. Only genuine operational failures (unreadable config, bad URLs,
//!   I/O) surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Gantry operations.
#[derive(Debug, Error)]
pub enum GantryError {
    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The configured origin is not a usable URL.
    #[error("Invalid origin '{origin}': {message}")]
    InvalidOrigin { origin: String, message: String },

    /// The launch destination could not be resolved against the base URL.
    #[error("Cannot resolve launch URL against '{base}': {message}")]
    LaunchUrlError { base: String, message: String },

    /// A landing document handed to the auditor could not be read.
    #[error("Cannot read landing document at {path}: {message}")]
    AuditTargetUnreadable { path: PathBuf, message: String },

    /// An interactive prompt failed (terminal gone, input aborted).
    #[error("Prompt failed: {message}")]
    PromptFailed { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Gantry operations.
pub type Result<T> = std::result::Result<T, GantryError>;
