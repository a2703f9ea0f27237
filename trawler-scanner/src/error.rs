use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Regex compilation failed: {0}")]
    PatternInvalid(String),

    #[error("Regex matching failed: no host found in '{0}'")]
    MalformedUrl(String),

    #[error("URL was inaccessible: {host}: {reason}")]
    HostUnreachable { host: String, reason: String },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not create a socket to make the request: {0}")]
    SocketCreateFailed(#[source] io::Error),

    #[error("connection failure: {0}")]
    ConnectFailed(#[source] io::Error),

    #[error("connection write failure: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("connection read failure: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("bad response (non-2xx status code {0})")]
    BadStatus(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(&'static str),
}

impl FetchError {
    /// Short classification used in logs and crawl summaries
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::SocketCreateFailed(_) => "socket",
            FetchError::ConnectFailed(_) => "connect",
            FetchError::WriteFailed(_) => "write",
            FetchError::ReadFailed(_) => "read",
            FetchError::BadStatus(_) => "status",
            FetchError::MalformedResponse(_) => "malformed",
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("document is not valid HTML text: {0}")]
    DocumentInvalid(String),
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
