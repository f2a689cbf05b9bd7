// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

pub mod indicators;
pub mod links;

pub use indicators::{extract_indicators, parse_indicators};
pub use links::{discover_entities, parse_entity_links, Entity};

/// A fetched page: status code and body text.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can GET a page. Non-2xx responses are returned as a
/// `Page`; only transport failures are errors.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn get(&self, url: &Url) -> Result<Page>;
}

impl PageSource for Client {
    async fn get(&self, url: &Url) -> Result<Page> {
        debug!("Fetching {}", url);
        let resp = Client::get(self, url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading body from {}", url))?;
        Ok(Page { status, body })
    }
}
