//! Error types for the mus2pdf library.
//!
//! Every fatal failure is a [`MusError`]. The variants fall into two
//! families, reported by [`MusError::kind`]:
//!
//! * [`ErrorKind::Io`]: the source file, a chord image or the debug HTML
//!   could not be read or written.
//! * [`ErrorKind::Render`]: the external HTML-to-PDF engine could not be
//!   started, failed, or its output could not be written to the target path.
//!
//! Malformed input is never an error. A missing title, an empty structure or
//! an undefined section all degrade to defaults inside the parsers.

use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`MusError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File not found, unreadable or unwritable.
    Io,
    /// Templating or PDF engine failure, including writing the PDF itself.
    Render,
    /// The configuration was rejected by the builder.
    Config,
}

/// All fatal errors returned by the mus2pdf library.
#[derive(Debug, Error)]
pub enum MusError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read as UTF-8 text.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A chord image could not be read while inlining it into the HTML.
    #[error("Failed to read chord image '{path}': {source}")]
    AssetReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The debug HTML copy could not be written.
    #[error("Failed to write debug HTML '{path}': {source}")]
    DebugWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The HTML-to-PDF program could not be started.
    #[error(
        "Failed to start PDF engine '{program}': {source}\n\
Install it (e.g. `pip install weasyprint`) or pass --engine <PROGRAM>."
    )]
    EngineNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTML-to-PDF program ran but reported failure.
    #[error("PDF engine '{program}' failed ({status}):\n{stderr}")]
    EngineFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The HTML-to-PDF program exited successfully but produced no bytes.
    #[error("PDF engine '{program}' produced an empty document")]
    EmptyPdf { program: String },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MusError {
    /// Which family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MusError::FileNotFound { .. }
            | MusError::PermissionDenied { .. }
            | MusError::ReadFailed { .. }
            | MusError::AssetReadFailed { .. }
            | MusError::DebugWriteFailed { .. } => ErrorKind::Io,
            MusError::EngineNotFound { .. }
            | MusError::EngineFailed { .. }
            | MusError::EmptyPdf { .. }
            | MusError::OutputWriteFailed { .. } => ErrorKind::Render,
            MusError::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}
