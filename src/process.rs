use std::sync::Arc;

use chrono::Local;
use tracing::{debug, error, warn};

use crate::model::{PageOutcome, Quote};
use crate::request::{request_batch, HttpFetcher, PageFetcher};
use crate::write::write_collection;
use crate::{info_time, Result, ScrapeConfig, MAX_PAGES, QUOTES_PER_PAGE};

/// Where the scheduler stands between two batches.
#[derive(Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Request the next batch, if `max_pages` leaves one.
    Running,
    /// The settled batch holds an empty page. Its pages still get merged, nothing more is requested.
    Draining(Vec<(usize, PageOutcome)>),
    Done,
}

/// What a settled batch contributes to the collection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchMerge {
    /// In page order, then in page position order.
    pub quotes: Vec<Quote>,
    pub failed_pages: Vec<usize>,
    /// The batch held an empty page, no further batch may be requested.
    pub is_last: bool,
}

/// Merges the outcomes of one batch, already sorted by page number.
///
/// Any empty page makes the batch the last one. By default the non-empty pages of that batch
/// are all kept, including the ones numbered after the empty page. With `stop_at_first_empty`
/// everything at or after the first empty page is dropped instead.
/// Failed pages contribute nothing and never end the run on their own.
pub fn merge_batch(outcomes: Vec<(usize, PageOutcome)>, stop_at_first_empty: bool) -> BatchMerge {
    let first_empty = outcomes
        .iter()
        .find(|(_, outcome)| outcome.is_empty())
        .map(|(page_num, _)| *page_num);

    let mut merge = BatchMerge {
        is_last: first_empty.is_some(),
        ..BatchMerge::default()
    };
    for (page_num, outcome) in outcomes {
        if stop_at_first_empty && first_empty.is_some_and(|empty| page_num >= empty) {
            debug!(page_num, "dropping page at or after the first empty page");
            continue;
        }
        match outcome {
            PageOutcome::Quotes(quotes) => merge.quotes.extend(quotes),
            PageOutcome::Empty => {}
            PageOutcome::Failed(_) => merge.failed_pages.push(page_num),
        }
    }
    merge
}

/// Summary of a finished run.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub quotes: Vec<Quote>,
    pub pages_requested: usize,
    pub batches_dispatched: usize,
    pub failed_pages: Vec<usize>,
    /// An empty page was seen before `max_pages` ran out.
    pub reached_end: bool,
}

/// Drives the batches: one batch at a time, every page of a batch in flight together.
pub struct Scraper<F: PageFetcher> {
    config: ScrapeConfig,
    fetcher: Arc<F>,
}

impl<F: PageFetcher> Scraper<F> {
    pub fn new(config: ScrapeConfig, fetcher: F) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Runs batches until one of them holds an empty page or `max_pages` is exhausted.
    pub async fn run(&self) -> Result<ScrapeReport> {
        let start_time = Local::now();
        info_time!("Started scraping {}", self.config.base_url());

        let mut report = ScrapeReport {
            quotes: Vec::with_capacity(self.config.max_pages().min(MAX_PAGES) * QUOTES_PER_PAGE),
            ..ScrapeReport::default()
        };
        let mut batches = self.config.batches();
        let mut state = SchedulerState::Running;

        loop {
            state = match state {
                SchedulerState::Running => {
                    let Some(pages) = batches.next() else {
                        break;
                    };
                    let start_batch_time = Local::now();
                    let (first, last) = (*pages.start(), *pages.end());

                    let outcomes = request_batch(pages, self.fetcher.clone(), &self.config).await?;
                    info_time!(start_batch_time, "Requested pages {first}..={last}");
                    report.batches_dispatched += 1;
                    report.pages_requested += outcomes.len();

                    if outcomes.iter().any(|(_, outcome)| outcome.is_empty()) {
                        info_time!("Found EMPTY page in pages {first}..={last}, draining the batch");
                        SchedulerState::Draining(outcomes)
                    } else {
                        self.append_batch(&mut report, outcomes);
                        SchedulerState::Running
                    }
                }
                SchedulerState::Draining(outcomes) => {
                    self.append_batch(&mut report, outcomes);
                    report.reached_end = true;
                    SchedulerState::Done
                }
                SchedulerState::Done => break,
            };
        }

        info_time!(
            start_time,
            "DONE: {} quotes from {} pages in {} batches, {} failed pages",
            report.quotes.len(),
            report.pages_requested,
            report.batches_dispatched,
            report.failed_pages.len()
        );
        Ok(report)
    }

    fn append_batch(&self, report: &mut ScrapeReport, outcomes: Vec<(usize, PageOutcome)>) {
        let merge = merge_batch(outcomes, self.config.stop_at_first_empty());
        for page_num in &merge.failed_pages {
            warn!(page_num, "page contributed no quotes: fetch or extraction failed");
        }
        report.failed_pages.extend(merge.failed_pages);
        report.quotes.extend(merge.quotes);
        info_time!("Merged batch, {} quotes so far", report.quotes.len());
    }
}

/// Scrapes the configured site over HTTP and writes the collection to `config.output_path()`.
pub async fn process_site(config: ScrapeConfig) -> Result<ScrapeReport> {
    let scraper = Scraper::new(config, HttpFetcher::new()?)?;
    let report = scraper.run().await?;

    let local_now = Local::now();
    let path = scraper.config().output_path();
    if let Err(e) = write_collection(path, &report.quotes).await {
        error!(
            path = %path.display(),
            quotes = report.quotes.len(),
            error = %e,
            "could not write the collection, it was not persisted"
        );
        return Err(e);
    }
    info_time!(local_now, "Wrote the results to file: {}", path.display());

    Ok(report)
}
