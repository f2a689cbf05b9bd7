use anyhow::{Context, Result};
use tracing::{error, info};
use worldstats::{config::Config, logging, process, store};

fn main() -> Result<()> {
    logging::init("info");

    let cfg = Config::from_env()?;
    let Some(raw_path) = store::latest_csv(&cfg.raw_dir)
        .with_context(|| format!("listing {}", cfg.raw_dir.display()))?
    else {
        error!("No CSV files found in {}", cfg.raw_dir.display());
        return Ok(());
    };

    info!(path = %raw_path.display(), "normalizing");
    let raw = store::read_raw(&raw_path)?;
    let processed = process::process_table(&raw);

    if let Err(e) = store::write_processed(&cfg.processed_dir, &processed, cfg.write_mode) {
        error!("Error saving processed data file: {:#}", e);
        return Ok(());
    }
    info!(rows = processed.len(), "done");
    Ok(())
}
