use crate::frontier::Frontier;
use crate::report::CrawlSummary;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};
use trawler_scanner::{CrawlTarget, FetchError, Fetcher, ParseError, extract_links};
use url::Url;

/// Callback invoked with every extracted link, in extraction order, before it is enqueued
pub type LinkCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// How extracted `href` values become frontier entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkScope {
    /// Push the raw attribute value unchanged
    #[default]
    Raw,
    /// Resolve against the current page, keep only links on the base host, push `path[?query]`
    SameHost,
}

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub workers: usize,
    pub fetcher: Fetcher,
    pub dedup: bool,
    pub link_scope: LinkScope,
    pub max_rounds: Option<usize>,
    pub on_link: Option<LinkCallback>,
}

impl CrawlOptions {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            fetcher: Fetcher::new(),
            dedup: false,
            link_scope: LinkScope::Raw,
            max_rounds: None,
            on_link: None,
        }
    }
}

/// What a single fetch-and-extract task ended with.
#[derive(Debug)]
pub enum TaskOutcome {
    Fetched {
        path: String,
        links_discovered: usize,
        links_enqueued: usize,
    },
    FetchFailed {
        path: String,
        error: FetchError,
    },
    ParseFailed {
        path: String,
        error: ParseError,
    },
}

/// Everything a crawl's tasks share: the resolved target, the frontier and the fetcher.
///
/// Built once per crawl and handed to every task by reference.
pub struct CrawlSession {
    target: CrawlTarget,
    frontier: Frontier,
    fetcher: Fetcher,
    link_scope: LinkScope,
    max_rounds: Option<usize>,
    on_link: Option<LinkCallback>,
}

impl CrawlSession {
    /// Create a session whose frontier holds just the seed path.
    pub fn new(target: CrawlTarget, options: CrawlOptions) -> Self {
        let frontier = if options.dedup {
            Frontier::with_dedup()
        } else {
            Frontier::new()
        };
        frontier.push(target.path.clone());
        debug!(
            "Session for {} seeded with {} (dedup: {})",
            target.base_host,
            target.path,
            frontier.is_dedup()
        );

        Self {
            target,
            frontier,
            fetcher: options.fetcher,
            link_scope: options.link_scope,
            max_rounds: options.max_rounds,
            on_link: options.on_link,
        }
    }

    pub fn target(&self) -> &CrawlTarget {
        &self.target
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Fetch one path, extract its links and push them onto the frontier.
    pub fn run_task(&self, path: String) -> TaskOutcome {
        let response = match self
            .fetcher
            .fetch(self.target.ip, &self.target.base_host, &path)
        {
            Ok(response) => response,
            Err(error) => {
                warn!("Could not get HTML for {} ({}): {}", path, error.kind(), error);
                return TaskOutcome::FetchFailed { path, error };
            }
        };

        if !response.is_success() {
            debug!("{} answered without a parsable status code", path);
        }
        debug!(
            "Fetched {} ({} bytes, content-type {:?})",
            path,
            response.body.len(),
            response.header("content-type")
        );

        let links = match extract_links(&response.body) {
            Ok(links) => links,
            Err(error) => {
                warn!("Could not parse HTML for {}: {}", path, error);
                return TaskOutcome::ParseFailed { path, error };
            }
        };

        if let Some(callback) = &self.on_link {
            for link in &links {
                callback(link);
            }
        }

        let links_discovered = links.len();
        let paths: Vec<String> = match self.link_scope {
            LinkScope::Raw => links,
            LinkScope::SameHost => links
                .iter()
                .filter_map(|href| same_host_path(&self.target.base_host, &path, href))
                .collect(),
        };
        let paths: Vec<String> = paths
            .into_iter()
            .filter(|link| {
                let usable = is_request_path(link);
                if !usable {
                    warn!("Skipping link {:?} on {}: not usable in a request line", link, path);
                }
                usable
            })
            .collect();
        let links_enqueued = self.frontier.push_all(paths);

        debug!(
            "{}: {} link(s) found, {} enqueued",
            path, links_discovered, links_enqueued
        );

        TaskOutcome::Fetched {
            path,
            links_discovered,
            links_enqueued,
        }
    }
}

/// Run rounds until the frontier is empty at the start of a round (or the round limit hits).
///
/// Each round pops up to `workers` paths, runs one thread per path and joins
/// every one of them before the next round is drained.
pub fn run_crawl(session: &CrawlSession, workers: usize) -> CrawlSummary {
    let workers = workers.max(1);
    let target = session.target();

    info!(
        "Starting crawl of {} ({}) from {} with {} workers",
        target.base_host, target.ip, target.path, workers
    );

    let mut summary = CrawlSummary {
        seed_url: target.original_url.clone(),
        base_host: target.base_host.clone(),
        ip: target.ip.to_string(),
        workers,
        ..CrawlSummary::default()
    };

    loop {
        if let Some(limit) = session.max_rounds
            && summary.rounds >= limit
        {
            summary.round_limit_reached = !session.frontier.is_empty();
            if summary.round_limit_reached {
                debug!(
                    "Round limit {} reached, left pending: {:?}",
                    limit,
                    session.frontier.pending()
                );
            }
            break;
        }

        let batch = session.frontier.drain_batch(workers);
        if batch.is_empty() {
            break;
        }

        summary.rounds += 1;
        summary.tasks_dispatched += batch.len();
        info!("Round {}: dispatching {} task(s)", summary.rounds, batch.len());

        let outcomes: Vec<thread::Result<TaskOutcome>> = thread::scope(|scope| {
            let handles: Vec<_> = batch
                .into_iter()
                .map(|path| scope.spawn(move || session.run_task(path)))
                .collect();

            handles.into_iter().map(|handle| handle.join()).collect()
        });

        for outcome in outcomes {
            match outcome {
                Ok(TaskOutcome::Fetched {
                    links_discovered,
                    links_enqueued,
                    ..
                }) => {
                    summary.pages_fetched += 1;
                    summary.links_discovered += links_discovered;
                    summary.links_enqueued += links_enqueued;
                }
                Ok(TaskOutcome::FetchFailed { error, .. }) => {
                    summary.record_fetch_failure(error.kind());
                }
                Ok(TaskOutcome::ParseFailed { .. }) => summary.parse_failures += 1,
                Err(_) => {
                    warn!("A crawl task panicked in round {}", summary.rounds);
                    summary.tasks_panicked += 1;
                }
            }
        }

        debug!(
            "Round {} complete, {} path(s) pending",
            summary.rounds,
            session.frontier.len()
        );
    }

    summary.frontier_remaining = session.frontier.len();
    info!(
        "Crawl complete. {} round(s), {} page(s) fetched, {} pending",
        summary.rounds, summary.pages_fetched, summary.frontier_remaining
    );
    summary
}

/// Build a session for `target` and crawl it to completion
pub fn execute_crawl(target: CrawlTarget, options: CrawlOptions) -> CrawlSummary {
    let workers = options.workers;
    let session = CrawlSession::new(target, options);
    run_crawl(&session, workers)
}

/// Turn an `href` found on `current_path` into a path on `base_host`.
///
/// Returns `None` for fragment-only links, non-HTTP schemes and other hosts.
pub fn same_host_path(base_host: &str, current_path: &str, href: &str) -> Option<String> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let page = Url::parse(&format!("http://{}", base_host))
        .ok()?
        .join(current_path)
        .ok()?;
    let resolved = page.join(href).ok()?;

    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    if !resolved
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(base_host))
    {
        return None;
    }

    let mut path = resolved.path().to_string();
    if let Some(query) = resolved.query() {
        path.push('?');
        path.push_str(query);
    }
    Some(path)
}

/// A request line is `GET <path> HTTP/1.1`, so whitespace or control bytes in
/// the path would split it or inject headers.
fn is_request_path(path: &str) -> bool {
    !path
        .bytes()
        .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
}
