//! Run statistics
//!
//! Every run produces a `RunSummary`, handed to the completion callback and
//! printable as a short report.

use std::time::Duration;

/// Counters collected while a run executes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of links passed to the run, duplicates included
    pub links_requested: usize,

    /// Number of batch groups dispatched
    pub groups_dispatched: usize,

    /// Fetches that returned a response (any status)
    pub fetched: usize,

    /// Responses accepted and stored
    pub accepted: usize,

    /// Responses rejected for a non-200 status or an empty body
    pub rejected: usize,

    /// Fetches that failed before a response was available
    pub fetch_failures: usize,

    /// Accepted pages whose content was shorter than the advisory threshold
    pub short_content: usize,

    /// Accepted pages that could not be appended to the log sink
    pub sink_failures: usize,

    /// Records that could not be stored or logged because they were malformed
    pub shape_errors: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Adds the per-item counters of another summary into this one
    pub fn merge(&mut self, other: &RunSummary) {
        self.fetched += other.fetched;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.fetch_failures += other.fetch_failures;
        self.short_content += other.short_content;
        self.sink_failures += other.sink_failures;
        self.shape_errors += other.shape_errors;
    }

    /// Number of dispatched fetches that produced no record
    pub fn failed(&self) -> usize {
        self.rejected + self.fetch_failures
    }

    /// Percentage of attempted fetches that produced a record
    pub fn success_rate(&self) -> f64 {
        let attempted = self.fetched + self.fetch_failures;
        if attempted == 0 {
            return 0.0;
        }
        (self.accepted as f64 / attempted as f64) * 100.0
    }
}

/// Formats a summary as a multi-line report
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("=== Gleaner Run Summary ===\n");
    out.push_str(&format!("Links requested:   {}\n", summary.links_requested));
    out.push_str(&format!("Groups dispatched: {}\n", summary.groups_dispatched));
    out.push_str(&format!("Fetched:           {}\n", summary.fetched));
    out.push_str(&format!("Accepted:          {}\n", summary.accepted));
    out.push_str(&format!("Rejected:          {}\n", summary.rejected));
    out.push_str(&format!("Fetch failures:    {}\n", summary.fetch_failures));
    if summary.short_content > 0 {
        out.push_str(&format!("Short content:     {}\n", summary.short_content));
    }
    if summary.sink_failures > 0 {
        out.push_str(&format!("Log failures:      {}\n", summary.sink_failures));
    }
    if summary.shape_errors > 0 {
        out.push_str(&format!("Malformed records: {}\n", summary.shape_errors));
    }
    out.push_str(&format!("Success rate:      {:.2}%\n", summary.success_rate()));
    out.push_str(&format!(
        "Elapsed:           {:.2}s\n",
        summary.elapsed.as_secs_f64()
    ));
    out
}

/// Prints a summary to stdout
pub fn print_summary(summary: &RunSummary) {
    print!("{}", format_summary(summary));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_item_counters() {
        let mut total = RunSummary {
            links_requested: 3,
            groups_dispatched: 2,
            ..Default::default()
        };
        let group = RunSummary {
            fetched: 2,
            accepted: 1,
            rejected: 1,
            fetch_failures: 1,
            ..Default::default()
        };

        total.merge(&group);
        total.merge(&group);

        assert_eq!(total.links_requested, 3);
        assert_eq!(total.groups_dispatched, 2);
        assert_eq!(total.fetched, 4);
        assert_eq!(total.accepted, 2);
        assert_eq!(total.failed(), 4);
    }

    #[test]
    fn test_success_rate() {
        let summary = RunSummary {
            fetched: 3,
            accepted: 3,
            fetch_failures: 1,
            ..Default::default()
        };
        assert!((summary.success_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(RunSummary::default().success_rate(), 0.0);
    }

    #[test]
    fn test_format_summary_hides_zero_optional_lines() {
        let formatted = format_summary(&RunSummary {
            links_requested: 2,
            accepted: 1,
            ..Default::default()
        });

        assert!(formatted.contains("Links requested:   2"));
        assert!(!formatted.contains("Log failures"));
        assert!(!formatted.contains("Malformed records"));
    }
}
