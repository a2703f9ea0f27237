pub mod commands;
pub mod handlers;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

// Re-export commonly used handler functions for convenience
pub use handlers::{
    ArgumentError, crawl_options_from_matches, handle_crawl, load_seed_from_file,
    parse_thread_count, require_url, seed_from_argument,
};

// Re-export crawl functionality from trawler-core
pub use trawler_core::crawl::{CrawlOptions, LinkScope, execute_crawl};
pub use trawler_core::report::{CrawlSummary, ReportFormat, generate_summary_report};
