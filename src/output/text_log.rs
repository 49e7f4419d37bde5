//! Timestamped text log of accepted pages
//!
//! Each orchestrator that has logging enabled creates one file named
//! `output_YYYYmmdd_HHMMSS.txt` in the output directory. Every accepted page is
//! appended as:
//!
//! ```text
//! URL: <link>
//! Title: <title>
//! Content:
//! <content>
//! --------------------------------------------------------------------------------
//! ```

use crate::output::traits::{LogSink, OutputResult};
use crate::storage::PageRecord;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Width of the separator line written after each record
pub const SEPARATOR_WIDTH: usize = 80;

/// Appends accepted pages to a text file
#[derive(Debug)]
pub struct FileLogSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileLogSink {
    /// Creates a new timestamp-named log file inside `output_dir`
    ///
    /// The directory is created if it does not exist.
    pub fn create(output_dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(output_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = output_dir.join(format!("output_{}.txt", timestamp));
        Self::open(path)
    }

    /// Opens (or creates) a specific file in append mode
    pub fn open(path: PathBuf) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::info!("Writing page log to {}", path.display());
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Renders one record in the log format
pub fn format_record(record: &PageRecord) -> String {
    format!(
        "URL: {}\nTitle: {}\nContent:\n{}\n{}\n",
        record.link,
        record.title,
        record.content,
        "-".repeat(SEPARATOR_WIDTH)
    )
}

impl LogSink for FileLogSink {
    fn append(&self, record: &PageRecord) -> OutputResult<()> {
        let entry = format_record(record);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(entry.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
