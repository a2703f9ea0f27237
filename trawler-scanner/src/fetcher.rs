use crate::error::FetchError;
use crate::result::{HttpResponse, UNKNOWN_STATUS};
use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_CHUNK_SIZE: usize = 4096;
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/35.0.1916.47 Safari/537.36";

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Issues raw HTTP/1.1 GET requests over a plain TCP socket.
///
/// Responses are framed by the peer closing the connection; `Content-Length`
/// and chunked transfer encoding are not interpreted.
#[derive(Debug, Clone)]
pub struct Fetcher {
    port: u16,
    chunk_size: usize,
    timeout: Option<Duration>,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            port: DEFAULT_PORT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Size of the buffer each socket read fills. Zero is bumped to one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Deadline applied to connect and to every individual read and write.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn fetch(&self, ip: Ipv4Addr, host: &str, path: &str) -> Result<HttpResponse, FetchError> {
        let addr = SocketAddr::from((ip, self.port));
        debug!("Fetching http://{}{} via {}", host, path, addr);

        let mut stream = self.connect(&addr)?;

        let request = build_request(host, path);
        stream
            .write_all(request.as_bytes())
            .and_then(|_| stream.flush())
            .map_err(FetchError::WriteFailed)?;

        // The stream is dropped (and the connection closed) on every return path.
        read_response(&mut stream, self.chunk_size)
    }

    fn connect(&self, addr: &SocketAddr) -> Result<TcpStream, FetchError> {
        let stream = match self.timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        }
        .map_err(FetchError::ConnectFailed)?;

        // std creates and connects the socket in one call, so socket-level
        // failures surface while configuring the connected stream.
        stream
            .set_read_timeout(self.timeout)
            .and_then(|_| stream.set_write_timeout(self.timeout))
            .and_then(|_| stream.set_nodelay(true))
            .map_err(FetchError::SocketCreateFailed)?;

        Ok(stream)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Format the GET request. Only `Host` and `User-Agent` are sent.
pub fn build_request(host: &str, path: &str) -> String {
    format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\n\r\n",
        path, host, USER_AGENT
    )
}

/// Drain `reader` in `chunk_size` reads until the peer closes, assembling the response.
///
/// Aborts with [`FetchError::BadStatus`] as soon as a non-2xx status code is
/// visible, without reading the rest of the stream.
pub fn read_response<R: Read>(mut reader: R, chunk_size: usize) -> Result<HttpResponse, FetchError> {
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut assembler = ResponseAssembler::default();

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FetchError::ReadFailed(e)),
        };
        assembler.feed(&chunk[..read])?;
    }

    assembler.finish()
}

/// Incremental header/body splitter fed one chunk at a time.
#[derive(Debug, Default)]
struct ResponseAssembler {
    header: Vec<u8>,
    body: Vec<u8>,
    headers_complete: bool,
    status_code: Option<u16>,
}

impl ResponseAssembler {
    fn feed(&mut self, chunk: &[u8]) -> Result<(), FetchError> {
        if self.headers_complete {
            self.body.extend_from_slice(chunk);
            return Ok(());
        }

        // The terminator may straddle the previous chunk, so back up by up to three bytes.
        let search_from = self.header.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
        self.header.extend_from_slice(chunk);

        if let Some(offset) = find_terminator(&self.header[search_from..]) {
            let header_end = search_from + offset;
            self.body
                .extend_from_slice(&self.header[header_end + HEADER_TERMINATOR.len()..]);
            self.header.truncate(header_end);
            self.headers_complete = true;
        }

        if self.status_code.is_none() {
            self.status_code = parse_status_code(&self.header, self.headers_complete);
        }

        // A missing status code is not fatal; only a known non-2xx one is.
        match self.status_code {
            Some(code) if !(200..=299).contains(&code) => Err(FetchError::BadStatus(code)),
            _ => Ok(()),
        }
    }

    fn finish(self) -> Result<HttpResponse, FetchError> {
        if !self.headers_complete {
            return Err(FetchError::MalformedResponse(
                "connection closed before the end of the header block",
            ));
        }

        Ok(HttpResponse {
            status_code: self.status_code.unwrap_or(UNKNOWN_STATUS),
            header_block: String::from_utf8_lossy(&self.header).into_owned(),
            body: self.body,
        })
    }
}

fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
}

/// Skip the first whitespace-delimited token and read the second as the status code.
///
/// A token running into the end of a still-growing buffer may be truncated, so
/// it only counts once whitespace follows it or the header block is complete.
fn parse_status_code(header: &[u8], headers_complete: bool) -> Option<u16> {
    let rest = skip_whitespace(header);
    let version_len = rest.iter().position(u8::is_ascii_whitespace)?;

    let rest = skip_whitespace(&rest[version_len..]);
    let code_len = match rest.iter().position(u8::is_ascii_whitespace) {
        Some(len) => len,
        None if headers_complete => rest.len(),
        None => return None,
    };

    std::str::from_utf8(&rest[..code_len]).ok()?.parse().ok()
}

fn skip_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}
