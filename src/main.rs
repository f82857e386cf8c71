use chrono::Local;
use clap::Parser;
use quotes_scrap::{info_time, process::process_site, Result};
use tracing_subscriber::EnvFilter;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let start_time = Local::now();
    let config = Args::parse().into_config()?;

    process_site(config).await?;
    info_time!(start_time, "Full program time:");

    Ok(())
}
