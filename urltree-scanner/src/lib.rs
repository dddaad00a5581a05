pub mod classify;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod result;

pub use classify::{ResolvedUrl, resolve};
pub use error::ScanError;
pub use extract::extract;
pub use fetcher::{FetchOptions, FetchedPage, Fetcher};
pub use result::{Extraction, LinkRecord, LinkType};
