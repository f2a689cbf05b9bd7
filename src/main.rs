use anyhow::Result;
use reqwest::Client;
use std::time::Instant;
use tracing::{error, info};
use worldstats::{collect::collect_records, config::Config, logging, process, store};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init("info");
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg = Config::from_env()?;
    info!(base = %cfg.base_url, raw = %cfg.raw_dir.display(), processed = %cfg.processed_dir.display(), "configured");

    // ─── 3) scrape ───────────────────────────────────────────────────
    let client = Client::new();
    let start = Instant::now();
    let records = match collect_records(&client, &cfg.base_url, cfg.delay).await {
        Ok(records) => records,
        Err(e) => {
            error!("Error extracting data: {:#}", e);
            return Ok(());
        }
    };
    if records.is_empty() {
        return Ok(());
    }
    info!(rows = records.len(), elapsed = ?start.elapsed(), "scraped");

    // ─── 4) save raw table ───────────────────────────────────────────
    if let Err(e) = store::write_raw(&cfg.raw_dir, &records, cfg.write_mode) {
        error!("Error saving raw data file: {:#}", e);
        return Ok(());
    }

    // ─── 5) normalize + save processed table ─────────────────────────
    let processed = process::process_table(&records);
    if let Err(e) = store::write_processed(&cfg.processed_dir, &processed, cfg.write_mode) {
        error!("Error saving processed data file: {:#}", e);
    }

    info!("all done");
    Ok(())
}
