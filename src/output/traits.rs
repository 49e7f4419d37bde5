//! Log sink trait and error types
//!
//! This module defines the interface the crawler uses to persist accepted pages.

use crate::storage::PageRecord;
use thiserror::Error;

/// Errors that can occur while appending to a sink
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only destination for accepted pages
///
/// Implementations are called concurrently from every in-flight group and must
/// serialize their own writes. A failed append is reported by the caller and
/// never retried.
pub trait LogSink: Send + Sync {
    /// Appends one record
    fn append(&self, record: &PageRecord) -> OutputResult<()>;

    /// Human-readable identity of the sink (e.g. a file path), used in log messages
    fn describe(&self) -> String;
}
