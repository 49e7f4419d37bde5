//! In-memory result store
//!
//! Pages are kept in a `HashMap` keyed by the requested link, behind a `RwLock`
//! so concurrent fetch completions can insert while results are being read.
//!
//! # Same-link writes
//!
//! Writes for the same link are serialized by the lock, but their order is not
//! defined: whichever write lands last is what `get` returns. Callers that need
//! a deterministic winner must dispatch each link at most once per run.
//!
//! # Growth
//!
//! There is no eviction, expiry, or size bound. A store that is retained across
//! runs grows with every distinct link it has ever accepted until `clear` is called.

use crate::storage::PageRecord;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Link-keyed store of extracted pages, safe to share between tasks
#[derive(Debug, Default)]
pub struct ResultStore {
    pages: RwLock<HashMap<String, PageRecord>>,
}

impl ResultStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record for `record.link`
    pub fn put(&self, record: PageRecord) {
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        if pages.insert(record.link.clone(), record).is_some() {
            tracing::debug!("Replaced existing record in result store");
        }
    }

    /// Looks up the record for a link
    ///
    /// Returns `None` when the link was never stored.
    pub fn get(&self, link: &str) -> Option<PageRecord> {
        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        pages.get(link).cloned()
    }

    /// Returns true if a record exists for the link
    pub fn contains(&self, link: &str) -> bool {
        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        pages.contains_key(link)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every stored record
    pub fn clear(&self) {
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Replaces every stored record with the contents of `other`
    ///
    /// Readers see either the old contents or the new ones, never a mix.
    pub fn replace_with(&self, other: &ResultStore) {
        let snapshot = other
            .pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        *self.pages.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Looks up each link in order, preserving duplicates
    pub fn collect(&self, links: &[String]) -> Vec<Option<PageRecord>> {
        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        links.iter().map(|link| pages.get(link).cloned()).collect()
    }
}
