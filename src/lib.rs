//! QUOTES SCRAPER
//! Walks the paginated quote listing in fixed-size batches, stops at the first batch
//! that contains an empty page and writes every collected quote to a single JSON file.

pub mod config;
mod error;
mod macros;
pub mod model;
pub mod parse;
pub mod process;
pub mod request;
pub mod write;

pub use config::ScrapeConfig;
pub use error::{Error, Result};

/// Site that is scraped when no other base URL is configured.
pub const BASE_URL: &str = "https://quotes.toscrape.com";
/// Pages requested per batch. Also the default cap of in-flight page requests.
pub const URLS_PER_BATCH: usize = 10;
/// Upper bound for the pages of one batch.
pub const MAX_URLS_PER_BATCH: usize = 1_000;
/// Highest page number that is ever requested.
pub const MAX_PAGES: usize = 50;
const FILE_PATH: &str = "collected_data.json";
/// There are 10 quotes on a full page.
const QUOTES_PER_PAGE: usize = 10;
