//! Crawl orchestration
//!
//! The orchestrator drives one run end to end:
//! 1. Check the links and split them into batch groups
//! 2. Spawn one task per group; each task fetches its links concurrently
//! 3. Validate every response, store accepted pages, and append them to the log sink
//! 4. Wait for every group, then fire the completion callback once
//! 5. Read each input link back from the result store, in input order
//!
//! Per-link failures (transport errors, rejected responses, log write failures)
//! are reported and counted but never abort a run. Only configuration errors do,
//! and those are raised before anything is dispatched.
//!
//! There is no cancellation or deadline: a run lasts until every dispatched group
//! has finished. Request timeouts are the fetcher's concern.

use crate::config::{validate_group_size, Config};
use crate::crawler::batcher::{group_links, BatchGroup};
use crate::crawler::fetcher::{FetchError, FetchOutcome, Fetcher};
use crate::crawler::validator::{validate_and_extract, Advisory};
use crate::output::{FileLogSink, LogSink, RunSummary};
use crate::storage::{PageRecord, ResultStore, RunResult};
use crate::{ConfigError, GleanerError, Link};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};

/// Settings for an orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Maximum links per batch group; must be positive
    pub group_size: i64,

    /// Advisory threshold for content length, in characters
    pub min_content_length: usize,

    /// In-flight fetches per group
    pub max_concurrent_fetches: usize,

    /// Create a text log and append every accepted page to it
    pub logging_enabled: bool,

    /// Directory for the text log
    pub output_dir: PathBuf,

    /// Keep stored pages from earlier runs instead of clearing the store
    pub retain_results: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OrchestratorOptions {
    fn from(config: &Config) -> Self {
        Self {
            group_size: config.scraper.group_size,
            min_content_length: config.scraper.min_content_length,
            max_concurrent_fetches: config.scraper.max_concurrent_fetches,
            logging_enabled: config.output.log_enabled,
            output_dir: PathBuf::from(&config.output.output_dir),
            retain_results: config.scraper.retain_results,
        }
    }
}

/// Runs batches of links through fetch, validation, and storage
///
/// Cloning is cheap; clones share the fetcher, the result store, and the log sink.
///
/// Unless `retain_results` is set, every run collects into its own store and only
/// publishes into the shared one once all of its groups have finished, so runs that
/// overlap on one orchestrator never see each other's results.
#[derive(Clone)]
pub struct Orchestrator {
    options: Arc<OrchestratorOptions>,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<ResultStore>,
    sink: Option<Arc<dyn LogSink>>,
}

impl Orchestrator {
    /// Creates a new orchestrator
    ///
    /// When logging is enabled a new timestamp-named log file is created here, once
    /// for the lifetime of the orchestrator.
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run
    /// * `Err(GleanerError)` - Invalid options, or the log file could not be created
    pub fn new(options: OrchestratorOptions, fetcher: Arc<dyn Fetcher>) -> Result<Self, GleanerError> {
        validate_group_size(options.group_size)?;
        if options.max_concurrent_fetches == 0 {
            return Err(ConfigError::Validation(
                "max_concurrent_fetches must be at least 1".to_string(),
            )
            .into());
        }

        let sink: Option<Arc<dyn LogSink>> = if options.logging_enabled {
            Some(Arc::new(FileLogSink::create(&options.output_dir)?))
        } else {
            None
        };

        Ok(Self {
            options: Arc::new(options),
            fetcher,
            store: Arc::new(ResultStore::new()),
            sink,
        })
    }

    /// Creates an orchestrator from a loaded configuration
    pub fn from_config(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, GleanerError> {
        Self::new(OrchestratorOptions::from(config), fetcher)
    }

    /// Replaces the log sink, enabling logging regardless of the options
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Uses a caller-owned result store
    pub fn with_store(mut self, store: Arc<ResultStore>) -> Self {
        self.store = store;
        self
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// The shared store
    ///
    /// With `retain_results` it accumulates every run; otherwise it holds the
    /// results of the most recently finished run.
    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// Crawls `links` and returns one entry per link, in input order
    ///
    /// `on_complete` is called exactly once, after every group has finished and
    /// before the results are read back. It is not called when the run is refused
    /// for a configuration error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gleaner::config::UserAgentConfig;
    /// use gleaner::crawler::{HttpFetcher, Orchestrator, OrchestratorOptions};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = Arc::new(HttpFetcher::new(&UserAgentConfig::default())?);
    /// let orchestrator = Orchestrator::new(OrchestratorOptions::default(), fetcher)?;
    ///
    /// let links = vec!["https://example.com/".to_string()];
    /// let results = orchestrator
    ///     .run(&links, |summary| println!("done: {} accepted", summary.accepted))
    ///     .await?;
    /// assert_eq!(results.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F>(&self, links: &[Link], on_complete: F) -> Result<RunResult, GleanerError>
    where
        F: FnOnce(&RunSummary),
    {
        let (summary, run_store) = self.dispatch(links).await?;
        on_complete(&summary);
        Ok(run_store.collect(links))
    }

    /// Starts a run in the background
    ///
    /// The returned handle resolves `completed()` once every group has finished,
    /// and `join()` with the run's results.
    pub fn spawn(&self, links: Vec<Link>) -> RunHandle {
        let (completed_tx, completed_rx) = oneshot::channel();
        let orchestrator = self.clone();

        let task = tokio::spawn(async move {
            orchestrator
                .run(&links, move |summary| {
                    // The handle may already have been dropped
                    let _ = completed_tx.send(summary.clone());
                })
                .await
        });

        RunHandle {
            completed: Some(completed_rx),
            task,
        }
    }

    /// Batches the links, dispatches every group, and waits for all of them
    ///
    /// Returns the summary and the store the run's records were written to.
    async fn dispatch(
        &self,
        links: &[Link],
    ) -> Result<(RunSummary, Arc<ResultStore>), GleanerError> {
        let started = Instant::now();

        check_links(links)?;
        let group_size = validate_group_size(self.options.group_size)?;
        let groups = group_links(links, group_size)?;

        let run_store = if self.options.retain_results {
            Arc::clone(&self.store)
        } else {
            Arc::new(ResultStore::new())
        };

        let mut summary = RunSummary {
            links_requested: links.len(),
            groups_dispatched: groups.len(),
            ..Default::default()
        };

        tracing::info!(
            "Starting run: {} links in {} groups (group size {})",
            links.len(),
            groups.len(),
            group_size
        );

        let mut tasks = JoinSet::new();
        for (index, group) in groups.into_iter().enumerate() {
            let worker = GroupWorker {
                fetcher: Arc::clone(&self.fetcher),
                store: Arc::clone(&run_store),
                sink: self.sink.clone(),
                min_content_length: self.options.min_content_length,
                max_concurrent_fetches: self.options.max_concurrent_fetches,
            };
            tasks.spawn(worker.crawl(index, group));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(group_summary) => summary.merge(&group_summary),
                Err(e) => tracing::error!("Group task failed: {}", e),
            }
        }

        if !self.options.retain_results {
            self.store.replace_with(&run_store);
        }

        summary.elapsed = started.elapsed();

        tracing::info!(
            "Run completed: {} accepted, {} rejected, {} fetch failures in {:?}",
            summary.accepted,
            summary.rejected,
            summary.fetch_failures,
            summary.elapsed
        );

        Ok((summary, run_store))
    }
}

/// Handle to a run started with `Orchestrator::spawn`
pub struct RunHandle {
    completed: Option<oneshot::Receiver<RunSummary>>,
    task: JoinHandle<Result<RunResult, GleanerError>>,
}

impl RunHandle {
    /// Waits until every group of the run has finished
    ///
    /// Returns the run summary the first time it is awaited, and `None` afterwards
    /// or if the run was refused before dispatch.
    pub async fn completed(&mut self) -> Option<RunSummary> {
        match self.completed.take() {
            Some(receiver) => receiver.await.ok(),
            None => None,
        }
    }

    /// Waits for the run and returns its results
    pub async fn join(self) -> Result<RunResult, GleanerError> {
        self.task.await?
    }
}

/// Rejects link lists containing empty links
fn check_links(links: &[Link]) -> Result<(), ConfigError> {
    match links.iter().position(|link| link.is_empty()) {
        Some(index) => Err(ConfigError::InvalidLink {
            index,
            reason: "link is empty".to_string(),
        }),
        None => Ok(()),
    }
}

/// Everything one group task needs
struct GroupWorker {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<ResultStore>,
    sink: Option<Arc<dyn LogSink>>,
    min_content_length: usize,
    max_concurrent_fetches: usize,
}

impl GroupWorker {
    /// Fetches every link in the group and processes each response as it arrives
    async fn crawl(self, index: usize, group: BatchGroup) -> RunSummary {
        tracing::debug!("Dispatching group {} ({} links)", index, group.len());

        let mut summary = RunSummary::default();
        let fetcher = Arc::clone(&self.fetcher);

        let mut fetches = stream::iter(group.into_links())
            .map(move |link| {
                let fetcher = Arc::clone(&fetcher);
                async move {
                    let result = fetcher.fetch(&link).await;
                    (link, result)
                }
            })
            .buffer_unordered(self.max_concurrent_fetches);

        while let Some((link, result)) = fetches.next().await {
            self.process(&link, result, &mut summary);
        }

        tracing::debug!(
            "Group {} finished: {} accepted of {} fetched",
            index,
            summary.accepted,
            summary.fetched
        );

        summary
    }

    fn process(
        &self,
        link: &str,
        result: Result<FetchOutcome, FetchError>,
        summary: &mut RunSummary,
    ) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("{}", e);
                summary.fetch_failures += 1;
                return;
            }
        };
        summary.fetched += 1;

        let extraction = match validate_and_extract(&outcome, link, self.min_content_length) {
            Ok(extraction) => extraction,
            Err(_) => {
                summary.rejected += 1;
                return;
            }
        };

        summary.short_content += extraction
            .advisories
            .iter()
            .filter(|advisory| matches!(advisory, Advisory::ShortContent { .. }))
            .count();

        self.store_record(extraction.record, summary);
    }

    /// Stores the record, then appends it to the sink
    ///
    /// A record that does not fit the log format, or a sink failure, leaves the
    /// stored record in place.
    fn store_record(&self, record: PageRecord, summary: &mut RunSummary) {
        if let Err(e) = record.check_shape() {
            tracing::error!("Invalid item format for {:?}: {}", record.link, e);
            summary.shape_errors += 1;
            return;
        }

        self.store.put(record.clone());
        summary.accepted += 1;

        if let Some(sink) = &self.sink {
            if let Err(e) = record.check_log_shape() {
                tracing::error!("Invalid item format for {:?}: {}", record.link, e);
                summary.shape_errors += 1;
                return;
            }
            if let Err(e) = sink.append(&record) {
                tracing::error!("Error writing {} to {}: {}", record.link, sink.describe(), e);
                summary.sink_failures += 1;
            }
        }
    }
}
