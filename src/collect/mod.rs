// src/collect/mod.rs

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use url::Url;

use crate::config::DelayRange;
use crate::fetch::{discover_entities, extract_indicators, PageSource};
use crate::record::CountryRecord;

pub mod pace;

pub use pace::Paced;

/// Discover every country under `base` and scrape its indicators, one page
/// at a time with a politeness sleep after each.
///
/// Zero discovered countries is logged and returns an empty table. A
/// transport failure while discovering aborts the run.
#[tracing::instrument(level = "info", skip(source, base, delay), fields(base = %base))]
pub async fn collect_records<S: PageSource>(
    source: &S,
    base: &Url,
    delay: DelayRange,
) -> Result<Vec<CountryRecord>> {
    let entities = discover_entities(source, base)
        .await
        .context("discovering country links")?;
    if entities.is_empty() {
        error!("Could not get country links");
        return Ok(Vec::new());
    }

    let total = entities.len();
    let mut records = Vec::with_capacity(total);
    let mut paced = Paced::new(entities, delay);
    while let Some(entity) = paced.next().await {
        records.push(extract_indicators(source, &entity).await);
    }

    let empty = records.iter().filter(|r| r.is_all_absent()).count();
    if empty > 0 {
        warn!(empty, total, "countries with no indicator found");
    }
    info!(rows = records.len(), "collection finished");
    Ok(records)
}
