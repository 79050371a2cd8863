//! Error types for pagesim.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in pagesim.
///
/// By having a single error type, error handling stays consistent across
/// the engine, the trace reader, and the sweep driver.
#[derive(Debug, Error)]
pub enum Error {
    /// A policy was constructed with a frame count of zero.
    ///
    /// Every policy needs at least one frame to hold a resident page.
    #[error("invalid frame count {0}: must be at least 1")]
    InvalidFrameCount(usize),

    /// `access` was called with the reserved invalid page id.
    ///
    /// Rejected before any counter or frame-table mutation.
    #[error("page id is the reserved INVALID sentinel")]
    InvalidPageId,

    /// A trace line could not be parsed.
    #[error("trace line {line}: {reason}")]
    TraceParse { line: usize, reason: String },

    /// A sweep was requested over a trace with no accesses.
    #[error("trace contains no accesses")]
    EmptyTrace,

    /// I/O error from trace or report file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
