use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use warp::Filter;
use worldstats::{
    config::Config,
    logging,
    serve::{routes, QueryTable},
};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info");
    info!("Starting country data API");

    let cfg = Config::from_env()?;
    let table = QueryTable::load(&cfg.processed_dir).context("loading processed data")?;
    let api = routes(Arc::new(table)).with(warp::trace::request());

    info!("Server starting on port {}", cfg.port);
    info!("Data endpoint: http://localhost:{}/data?COUNTRIES=<name>", cfg.port);
    info!("Health check: http://localhost:{}/health", cfg.port);

    warp::serve(api).run(([0, 0, 0, 0], cfg.port)).await;
    Ok(())
}
