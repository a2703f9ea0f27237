use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trawler_core::crawl::{CrawlOptions, LinkScope, execute_crawl};
use trawler_core::report::{CrawlSummary, ReportFormat, render_summary};
use trawler_scanner::{Fetcher, resolve};

/// Exit code for every fatal error
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Number of desired threads must be provided as the first argument!")]
    MissingThreadCount,

    #[error("An error occurred parsing the desired number of threads: '{0}'")]
    InvalidThreadCount(String),

    #[error("Number of desired threads must be > 0! (got {0})")]
    NonPositiveThreadCount(i64),

    #[error("URL must be provided as a command line argument!")]
    MissingUrl,
}

/// Parse the positional thread count. Must be a positive integer.
pub fn parse_thread_count(raw: Option<&str>) -> Result<usize, ArgumentError> {
    let raw = raw.ok_or(ArgumentError::MissingThreadCount)?;
    let count: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ArgumentError::InvalidThreadCount(raw.to_string()))?;

    if count <= 0 {
        return Err(ArgumentError::NonPositiveThreadCount(count));
    }

    usize::try_from(count).map_err(|_| ArgumentError::InvalidThreadCount(raw.to_string()))
}

pub fn require_url(raw: Option<&str>) -> Result<String, ArgumentError> {
    match raw.map(str::trim) {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(ArgumentError::MissingUrl),
    }
}

/// Load the seed URL from the first non-empty, non-comment line of a file
pub fn load_seed_from_file(path: &Path) -> Result<String, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read seed file {}: {}", path.display(), e))?;

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .ok_or_else(|| format!("No seed URL found in {}", path.display()))
}

/// `@path` reads the seed from a file, anything else is the seed itself
pub fn seed_from_argument(url: &str) -> Result<String, String> {
    match url.strip_prefix('@') {
        Some(path) => load_seed_from_file(Path::new(path)),
        None => Ok(url.to_string()),
    }
}

/// Build crawl options from parsed arguments. The link callback is left unset.
pub fn crawl_options_from_matches(matches: &ArgMatches, workers: usize) -> CrawlOptions {
    let chunk_size = matches.get_one::<u64>("chunk-size").copied().unwrap_or(4096);
    let port = matches.get_one::<u16>("port").copied().unwrap_or(80);

    let mut fetcher = Fetcher::new()
        .with_port(port)
        .with_chunk_size(usize::try_from(chunk_size).unwrap_or(usize::MAX));
    if let Some(seconds) = matches.get_one::<u64>("timeout") {
        fetcher = fetcher.with_timeout(Duration::from_secs(*seconds));
    }

    let mut options = CrawlOptions::new(workers);
    options.fetcher = fetcher;
    options.dedup = matches.get_flag("dedup");
    options.link_scope = if matches.get_flag("same-host") {
        LinkScope::SameHost
    } else {
        LinkScope::Raw
    };
    options.max_rounds = matches.get_one::<usize>("max-rounds").copied();
    options
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the verbosity flag.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore the error when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn print_banner() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    eprintln!(
        "{} {}",
        "  TRAWLER".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_fatal(message: impl std::fmt::Display) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

fn print_summary(summary: &CrawlSummary, format: ReportFormat) -> anyhow::Result<()> {
    let rendered =
        render_summary(summary, format).with_context(|| format!("rendering {} summary", format))?;
    eprintln!("{}", rendered);
    Ok(())
}

/// Run a crawl from parsed arguments and return the process exit code.
pub fn handle_crawl(matches: &ArgMatches) -> i32 {
    init_logging(matches.get_count("verbose"));

    if !matches.get_flag("quiet") {
        print_banner();
    }

    let threads = parse_thread_count(matches.get_one::<String>("THREADS").map(String::as_str));
    let url = require_url(matches.get_one::<String>("URL").map(String::as_str));
    let (workers, url) = match (threads, url) {
        (Ok(workers), Ok(url)) => (workers, url),
        (Err(e), _) | (_, Err(e)) => {
            print_fatal(e);
            return EXIT_FAILURE;
        }
    };

    let seed = match seed_from_argument(&url) {
        Ok(seed) => seed,
        Err(e) => {
            print_fatal(e);
            return EXIT_FAILURE;
        }
    };

    let target = match resolve(&seed) {
        Ok(target) => target,
        Err(e) => {
            print_fatal(e);
            return EXIT_FAILURE;
        }
    };
    info!(
        "Crawling {} ({}) starting at {} with {} worker(s)",
        target.base_host, target.ip, target.path, workers
    );

    let mut options = crawl_options_from_matches(matches, workers);
    options.on_link = Some(Arc::new(|link: &str| {
        // A closed stdout (e.g. piped into `head`) must not abort the crawl.
        let _ = writeln!(io::stdout().lock(), "{}", link);
    }));

    let summary = execute_crawl(target, options);

    if let Some(format) = matches.get_one::<String>("summary")
        && let Ok(format) = format.parse::<ReportFormat>()
        && let Err(e) = print_summary(&summary, format)
    {
        print_fatal(format!("{:#}", e));
    }

    0
}
