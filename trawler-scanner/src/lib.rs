pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod resolver;
pub mod result;

pub use error::{FetchError, ParseError, ResolutionError, ScanError};
pub use extractor::extract_links;
pub use fetcher::Fetcher;
pub use resolver::{CrawlTarget, resolve};
pub use result::{HttpResponse, UNKNOWN_STATUS};
