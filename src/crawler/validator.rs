//! Response validation and page extraction
//!
//! A fetched response is accepted only when it has status 200 and a non-empty
//! body. Accepted pages keep the full raw body as content and get a title from,
//! in order, the first `<h1>`, the `<title>` element, or a fixed fallback.
//!
//! Short content is reported as an advisory and never causes a rejection.

use crate::crawler::fetcher::FetchOutcome;
use crate::storage::PageRecord;
use scraper::{Html, Selector};
use thiserror::Error;

/// Title used when neither a heading nor a document title is present
pub const NO_TITLE: &str = "No title found";

/// Selectors tried in order when deriving a title
const TITLE_SELECTORS: [&str; 2] = ["h1", "title"];

/// Reasons a fetched response produces no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Failed to fetch {link} with status code {status}")]
    BadStatus { link: String, status: u16 },

    #[error("Empty content from {link}")]
    EmptyBody { link: String },
}

/// Non-blocking observations about an accepted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Content is shorter than the configured minimum
    ShortContent { length: usize, minimum: usize },
}

/// An accepted page together with any advisories raised while extracting it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: PageRecord,
    pub advisories: Vec<Advisory>,
}

/// Validates a fetch outcome and extracts a record from it
///
/// # Arguments
///
/// * `outcome` - Status code and body returned by the fetcher
/// * `link` - The link the outcome belongs to, used as the record key
/// * `min_content_length` - Advisory threshold, in characters
///
/// # Returns
///
/// * `Ok(Extraction)` - The page was accepted
/// * `Err(Rejection)` - The page was rejected; a warning has been emitted
pub fn validate_and_extract(
    outcome: &FetchOutcome,
    link: &str,
    min_content_length: usize,
) -> Result<Extraction, Rejection> {
    if outcome.status != 200 {
        tracing::warn!(
            "Failed to fetch {} with status code {}",
            link,
            outcome.status
        );
        return Err(Rejection::BadStatus {
            link: link.to_string(),
            status: outcome.status,
        });
    }

    if outcome.body.is_empty() {
        tracing::warn!("Empty content from {}", link);
        return Err(Rejection::EmptyBody {
            link: link.to_string(),
        });
    }

    let title = extract_title(&outcome.body);

    let mut advisories = Vec::new();
    let length = outcome.body.chars().count();
    if length < min_content_length {
        tracing::info!("Content from {} might be too short ({} chars)", link, length);
        advisories.push(Advisory::ShortContent {
            length,
            minimum: min_content_length,
        });
    }

    tracing::debug!("Parsed {} (title: {})", link, title);

    Ok(Extraction {
        record: PageRecord::new(link, title, outcome.body.clone()),
        advisories,
    })
}

/// Derives a page title, falling back to `NO_TITLE`
pub fn extract_title(html: &str) -> String {
    let document = Html::parse_document(html);

    TITLE_SELECTORS
        .iter()
        .find_map(|selector| first_text(&document, selector))
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Returns the trimmed text of the first element matching `selector` that has any
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
}
