//! Gleaner: a batch page harvester
//!
//! This crate fetches a batch of links, extracts a title and the raw content from
//! each page, and aggregates the results keyed by the requested link. Accepted pages
//! can also be appended to a human-readable text log.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Gleaner operations
#[derive(Debug, Error)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
///
/// These are raised before any work is dispatched and abort the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Group size must be a positive integer, got {0}")]
    InvalidGroupSize(i64),

    #[error("Invalid link at position {index}: {reason}")]
    InvalidLink { index: usize, reason: String },
}

/// Result type alias for Gleaner operations
pub type Result<T> = std::result::Result<T, GleanerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// A link to fetch. No canonicalization is applied, the exact string is the key.
pub type Link = String;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{group_links, validate_and_extract, BatchGroup, FetchOutcome, Orchestrator};
pub use output::{FileLogSink, LogSink, RunSummary};
pub use storage::{PageRecord, ResultStore, RunResult};
