// Crawl summary rendering

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format '{}'", other)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Totals collected by the scheduler over a whole crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub seed_url: String,
    pub base_host: String,
    pub ip: String,
    pub workers: usize,
    pub rounds: usize,
    pub tasks_dispatched: usize,
    pub pages_fetched: usize,
    pub links_discovered: usize,
    pub links_enqueued: usize,
    /// Failed fetches keyed by classification (`connect`, `status`, ...)
    pub fetch_failures: BTreeMap<String, usize>,
    pub parse_failures: usize,
    pub tasks_panicked: usize,
    pub frontier_remaining: usize,
    pub round_limit_reached: bool,
}

impl CrawlSummary {
    pub fn total_fetch_failures(&self) -> usize {
        self.fetch_failures.values().sum()
    }

    pub fn record_fetch_failure(&mut self, kind: &str) {
        *self.fetch_failures.entry(kind.to_string()).or_insert(0) += 1;
    }
}

/// Render a summary in the requested format
pub fn render_summary(summary: &CrawlSummary, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_summary_report(summary)),
        ReportFormat::Json => serde_json::to_string_pretty(summary),
    }
}

/// Generate a human-readable crawl summary
pub fn generate_summary_report(summary: &CrawlSummary) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!(
        "  Target: {} ({})\n",
        summary.base_host, summary.ip
    ));
    report.push_str(&format!("  Seed: {}\n", summary.seed_url));
    report.push_str(&format!("  Workers: {}\n", summary.workers));
    report.push_str(&format!("  Rounds: {}\n", summary.rounds));
    report.push_str(&format!("  Tasks dispatched: {}\n", summary.tasks_dispatched));
    report.push_str(&format!("  Pages fetched: {}\n", summary.pages_fetched));
    report.push_str(&format!("  Links discovered: {}\n", summary.links_discovered));
    report.push_str(&format!("  Links enqueued: {}\n", summary.links_enqueued));

    report.push_str(&format!(
        "  Fetch failures: {}\n",
        summary.total_fetch_failures()
    ));
    for (kind, count) in &summary.fetch_failures {
        report.push_str(&format!("    {}: {}\n", kind, count));
    }

    report.push_str(&format!("  Parse failures: {}\n", summary.parse_failures));
    if summary.tasks_panicked > 0 {
        report.push_str(&format!("  Tasks panicked: {}\n", summary.tasks_panicked));
    }

    report.push_str(&format!(
        "  Frontier remaining: {}\n",
        summary.frontier_remaining
    ));
    if summary.round_limit_reached {
        report.push_str("  Stopped early: round limit reached\n");
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report
}
