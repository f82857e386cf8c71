use std::future::Future;
use std::ops::RangeInclusive;
use std::sync::Arc;

use reqwest::Client;
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::warn;
use url::Url;

use crate::model::PageOutcome;
use crate::parse::parse_page;
use crate::{info_time, Error, Result, ScrapeConfig};

/// Performs exactly one request for a page and hands back its raw body.
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// `PageFetcher` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    // Client uses Arc so we can clone cheaply
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("quotes-scrap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    /// Server errors count as transport failures, every other status yields its body.
    async fn fetch(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        if status.is_server_error() {
            return Err(Error::ServerStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            // A body without quotes reads as an empty page and ends the run.
            warn!(
                url,
                status = status.as_u16(),
                "non-success status, parsing body anyway"
            );
        }
        let html = res.text().await?;
        Ok(html)
    }
}

/// Requests and parses every page of the block, at most `config.max_concurrency()` at a time.
/// Waits for the whole block and returns the outcomes sorted by page number.
pub(crate) async fn request_batch<F: PageFetcher>(
    pages: RangeInclusive<usize>,
    fetcher: Arc<F>,
    config: &ScrapeConfig,
) -> Result<Vec<(usize, PageOutcome)>> {
    info_time!("Requesting pages {}..={}", pages.start(), pages.end());

    let limiter = Arc::new(Semaphore::new(config.max_concurrency()));
    let mut task_set = JoinSet::new();

    for page_num in pages {
        task_set.spawn({
            let fetcher = fetcher.clone();
            let limiter = limiter.clone();
            let url = config.page_url(page_num);
            let base_url = config.base_url().clone();

            async move {
                let _permit = limiter.acquire_owned().await?;
                let outcome = request_page(fetcher.as_ref(), &url, base_url).await;
                Ok::<_, Error>((page_num, outcome))
            }
        });
    }

    let mut outcomes = Vec::with_capacity(task_set.len());
    while let Some(task) = task_set.join_next().await {
        outcomes.push(task??);
    }
    // Tasks finish in any order.
    outcomes.sort_unstable_by_key(|(page_num, _)| *page_num);
    Ok(outcomes)
}

/// Fetch then extract a single page. Failures stay scoped to the page.
async fn request_page<F: PageFetcher>(fetcher: &F, url: &str, base_url: Url) -> PageOutcome {
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(url, error = %e, "failed to fetch page");
            return PageOutcome::Failed(e.to_string());
        }
    };
    match parse_page(html, base_url).await {
        Ok(quotes) => PageOutcome::from_quotes(quotes),
        Err(e) => {
            warn!(url, error = %e, "failed to extract quotes");
            PageOutcome::Failed(e.to_string())
        }
    }
}
