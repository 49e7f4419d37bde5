//! Output module for logging accepted pages and reporting runs
//!
//! This module handles:
//! - The append-only log sink interface and its text-file implementation
//! - Run statistics handed to completion callbacks

pub mod stats;
mod text_log;
mod traits;

pub use stats::{format_summary, print_summary, RunSummary};
pub use text_log::{format_record, FileLogSink, SEPARATOR_WIDTH};
pub use traits::{LogSink, OutputError, OutputResult};
