//! Error types for flexdex operations.

use thiserror::Error;

/// Errors that can abort processing.
///
/// Recoverable conditions (unknown style names, unresolved template
/// placeholders, malformed column specs, ...) are never errors; they are
/// collected as [`crate::diag::Diagnostic`]s so the rest of the document
/// still renders.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown backend: {0}")]
    UnknownBackend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
