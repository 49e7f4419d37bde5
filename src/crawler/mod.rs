//! Crawler module for batch page fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - Splitting link lists into bounded groups
//! - The fetch capability and its HTTP implementation
//! - Response validation and title extraction
//! - Overall run orchestration and result aggregation

mod batcher;
mod coordinator;
mod fetcher;
mod validator;

pub use batcher::{group_links, BatchGroup};
pub use coordinator::{Orchestrator, OrchestratorOptions, RunHandle};
pub use fetcher::{build_http_client, FetchError, FetchOutcome, Fetcher, HttpFetcher};
pub use validator::{extract_title, validate_and_extract, Advisory, Extraction, Rejection, NO_TITLE};

use crate::config::{validate, Config};
use crate::storage::RunResult;
use crate::{GleanerError, Link};
use std::sync::Arc;

/// Crawls `links` over HTTP with the given configuration
///
/// This is the simplest entry point. It will:
/// 1. Validate the configuration
/// 2. Build an HTTP fetcher from the user agent settings
/// 3. Create an orchestrator (and its log file, if enabled)
/// 4. Run every link and call `on_complete` once all groups finish
///
/// # Returns
///
/// * `Ok(RunResult)` - One entry per input link, in input order
/// * `Err(GleanerError)` - The run was refused before dispatch
pub async fn crawl<F>(config: &Config, links: &[Link], on_complete: F) -> Result<RunResult, GleanerError>
where
    F: FnOnce(&crate::output::RunSummary),
{
    validate(config)?;
    let fetcher = Arc::new(HttpFetcher::new(&config.user_agent)?);
    let orchestrator = Orchestrator::from_config(config, fetcher)?;
    orchestrator.run(links, on_complete).await
}
