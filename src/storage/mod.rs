//! Storage module for extracted pages
//!
//! This module holds the records produced by the crawler:
//! - `PageRecord`, the unit extracted from one accepted page
//! - `ResultStore`, the shared link-keyed map that aggregates them
//! - `RunResult`, the per-link view assembled at the end of a run

mod memory;

pub use memory::ResultStore;

use crate::Link;
use thiserror::Error;

/// A record that cannot be stored or logged as-is
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemShapeError {
    #[error("Record has an empty link")]
    EmptyLink,

    #[error("Record link contains a line break")]
    MultilineLink,
}

/// Represents one extracted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// The link the page was requested with
    pub link: Link,

    /// First non-empty heading or document title, or the fallback text
    pub title: String,

    /// The full raw body text
    pub content: String,
}

impl PageRecord {
    pub fn new(link: impl Into<Link>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Checks that the record can be keyed in a store
    ///
    /// Links are checked for emptiness before dispatch; this guards records built
    /// outside a run.
    pub fn check_shape(&self) -> Result<(), ItemShapeError> {
        if self.link.is_empty() {
            return Err(ItemShapeError::EmptyLink);
        }
        Ok(())
    }

    /// Checks that the record fits the line-oriented log format
    ///
    /// The link must stay on its own line; title and content may span lines.
    pub fn check_log_shape(&self) -> Result<(), ItemShapeError> {
        self.check_shape()?;
        if self.link.contains(['\n', '\r']) {
            return Err(ItemShapeError::MultilineLink);
        }
        Ok(())
    }
}

/// One entry per input link, in input order; `None` marks a link with no stored record
pub type RunResult = Vec<Option<PageRecord>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_shape() {
        assert!(PageRecord::new("https://example.com", "Title", "body")
            .check_shape()
            .is_ok());
        assert_eq!(
            PageRecord::new("", "Title", "body").check_shape(),
            Err(ItemShapeError::EmptyLink)
        );
    }

    #[test]
    fn test_check_log_shape() {
        let record = PageRecord::new("https://example.com", "Two\nlines", "a\nb");
        assert!(record.check_log_shape().is_ok());

        let broken = PageRecord::new("https://example.com/\nURL: forged", "Title", "body");
        assert!(broken.check_shape().is_ok());
        assert_eq!(
            broken.check_log_shape(),
            Err(ItemShapeError::MultilineLink)
        );
    }
}
