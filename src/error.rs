//! # Error Types
//!
//! This module defines error types used throughout the certificate renderer.
//!
//! Only [`CertificateError::Font`] is recoverable: the renderer logs it and
//! falls back to another face. Every other variant aborts the render call.

use thiserror::Error;

/// Main error type for certificate operations
#[derive(Debug, Error)]
pub enum CertificateError {
    /// Caller supplied data that cannot be rendered (empty name, etc.)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tier string did not name one of the certificate grades
    #[error("Unknown tier '{0}'. Use 'pass', 'credit' or 'distinction'")]
    UnknownTier(String),

    /// Configuration file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Asset could not be fetched (missing file, HTTP status, network)
    #[error("Asset error: {0}")]
    Asset(String),

    /// Background template could not be loaded or decoded
    #[error("Template load failed: {0}")]
    TemplateLoad(String),

    /// Font could not be loaded or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Drawing surface could not be created
    #[error("Surface error: {0}")]
    Surface(String),

    /// Composed image could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// Asset fetch exceeded the configured timeout
    #[error("Timed out after {secs}s fetching {what}")]
    Timeout { what: String, secs: u64 },

    /// HTTP server errors (bind, serve)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
