use std::ops::RangeInclusive;
use std::path::PathBuf;

use url::Url;

use crate::{Error, Result, BASE_URL, FILE_PATH, MAX_PAGES, MAX_URLS_PER_BATCH, URLS_PER_BATCH};

/// Immutable settings of a single scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    base_url: Url,
    urls_per_batch: usize,
    max_concurrency: usize,
    max_pages: usize,
    output_path: PathBuf,
    stop_at_first_empty: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("BASE_URL constant is a valid URL"),
            urls_per_batch: URLS_PER_BATCH,
            max_concurrency: URLS_PER_BATCH,
            max_pages: MAX_PAGES,
            output_path: PathBuf::from(FILE_PATH),
            stop_at_first_empty: false,
        }
    }
}

impl ScrapeConfig {
    /// Default settings pointed at another site.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "base url must be http(s), got: {base_url}"
            )));
        }
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    pub fn with_urls_per_batch(mut self, urls_per_batch: usize) -> Self {
        self.urls_per_batch = urls_per_batch;
        self
    }

    /// Caps the in-flight page requests. Values above the batch size behave like the batch size.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Drop pages at or after the first empty page of the terminal batch
    /// instead of keeping every non-empty page of that batch.
    pub fn with_stop_at_first_empty(mut self, stop_at_first_empty: bool) -> Self {
        self.stop_at_first_empty = stop_at_first_empty;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("urls per batch", self.urls_per_batch),
            ("max concurrency", self.max_concurrency),
            ("max pages", self.max_pages),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        // Every page of a batch gets its own task.
        if self.urls_per_batch() > MAX_URLS_PER_BATCH {
            return Err(Error::InvalidConfig(format!(
                "urls per batch must be at most {MAX_URLS_PER_BATCH}, got {}",
                self.urls_per_batch()
            )));
        }
        Ok(())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A batch never spans more than `max_pages` pages.
    pub fn urls_per_batch(&self) -> usize {
        self.urls_per_batch.min(self.max_pages)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.min(self.urls_per_batch())
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    pub fn stop_at_first_empty(&self) -> bool {
        self.stop_at_first_empty
    }

    /// `{base}/page/{page_num}`
    pub fn page_url(&self, page_num: usize) -> String {
        prefix_base(&self.base_url, &format!("/page/{page_num}"))
    }

    /// Consecutive page ranges covering `1..=max_pages`, `urls_per_batch` pages each.
    /// The last range is cut short at `max_pages`.
    pub fn batches(&self) -> impl Iterator<Item = RangeInclusive<usize>> {
        let step = self.urls_per_batch().max(1);
        let max_pages = self.max_pages;
        (1..=max_pages)
            .step_by(step)
            .map(move |start| start..=start.saturating_add(step - 1).min(max_pages))
    }
}

/// Prefixes `path` with the base URL, base path included.
pub(crate) fn prefix_base(base_url: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
