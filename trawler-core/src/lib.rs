pub mod crawl;
pub mod frontier;
pub mod report;

pub use crawl::{
    CrawlOptions, CrawlSession, LinkCallback, LinkScope, TaskOutcome, execute_crawl, run_crawl,
    same_host_path,
};
pub use frontier::Frontier;
pub use report::{CrawlSummary, ReportFormat, generate_summary_report, render_summary};
