use clap::Parser;
use quotes_scrap::{Result, ScrapeConfig, BASE_URL, MAX_PAGES, URLS_PER_BATCH};

/// Without any flag the scraper runs with its built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "quotes-scrap")]
#[command(about = "Scrapes every quote of a paginated quote listing into a JSON file")]
#[command(version)]
pub struct Args {
    /// Site to scrape, pages are requested as {base-url}/page/{n}
    #[arg(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Number of pages requested per batch
    #[arg(long, default_value_t = URLS_PER_BATCH)]
    pub urls_per_batch: usize,

    /// Maximum number of pages in flight at once (defaults to the batch size)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Highest page number ever requested
    #[arg(long, default_value_t = MAX_PAGES)]
    pub max_pages: usize,

    /// Output JSON file, overwritten on every run
    #[arg(short, long)]
    pub output: Option<String>,

    /// Drop pages numbered after the first empty page of the last batch
    #[arg(long)]
    pub stop_at_first_empty: bool,
}

impl Args {
    pub fn into_config(self) -> Result<ScrapeConfig> {
        let mut config = ScrapeConfig::new(&self.base_url)?
            .with_urls_per_batch(self.urls_per_batch)
            .with_max_concurrency(self.max_concurrency.unwrap_or(self.urls_per_batch))
            .with_max_pages(self.max_pages)
            .with_stop_at_first_empty(self.stop_at_first_empty);
        if let Some(output) = self.output {
            config = config.with_output_path(output);
        }
        config.validate()?;
        Ok(config)
    }
}
