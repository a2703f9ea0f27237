use crate::error::ResolutionError;
use regex::Regex;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use tracing::debug;

/// Optional `scheme://` prefix, a host with at least one `.label`, then an optional `/path`.
const URL_PATTERN: &str = r"(?:.*?//)?((?:www\.)?.*?(?:\.\w+)+)(/.*)?";

/// The seed of a crawl: the host every request is sent to and the first path to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlTarget {
    pub original_url: String,
    pub base_host: String,
    pub path: String,
    pub ip: Ipv4Addr,
}

/// Split a URL string into its base host and path without touching the network.
///
/// A missing path becomes `/`.
pub fn split_url(raw_url: &str) -> Result<(String, String), ResolutionError> {
    let pattern =
        Regex::new(URL_PATTERN).map_err(|e| ResolutionError::PatternInvalid(e.to_string()))?;

    let captures = pattern
        .captures(raw_url.trim())
        .ok_or_else(|| ResolutionError::MalformedUrl(raw_url.to_string()))?;

    let host = captures
        .get(1)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ResolutionError::MalformedUrl(raw_url.to_string()))?;

    let path = captures
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    Ok((host, path))
}

/// Blocking lookup of the first IPv4 address for `host`
pub fn lookup_ipv4(host: &str) -> Result<Ipv4Addr, ResolutionError> {
    let unreachable = |reason: String| ResolutionError::HostUnreachable {
        host: host.to_string(),
        reason,
    };

    let addrs = (host, 0u16)
        .to_socket_addrs()
        .map_err(|e| unreachable(e.to_string()))?;

    addrs
        .filter_map(|addr| match addr.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| unreachable("no IPv4 address found".to_string()))
}

/// Resolve a seed URL into a [`CrawlTarget`]. Runs exactly once per crawl.
pub fn resolve(raw_url: &str) -> Result<CrawlTarget, ResolutionError> {
    let (base_host, path) = split_url(raw_url)?;
    let ip = lookup_ipv4(&base_host)?;

    debug!("Resolved {} -> host={} path={} ip={}", raw_url, base_host, path, ip);

    Ok(CrawlTarget {
        original_url: raw_url.to_string(),
        base_host,
        path,
        ip,
    })
}
