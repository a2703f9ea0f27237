use serde::Serialize;

/// Status recorded when the status line carries no parsable code
pub const UNKNOWN_STATUS: u16 = 0;

/// A fully drained HTTP response as assembled by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub header_block: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// False for non-2xx codes and for [`UNKNOWN_STATUS`]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status_code)
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_block
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
    }
}
