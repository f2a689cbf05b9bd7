// src/fetch/links.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{error, info, trace, warn};
use url::Url;

use super::PageSource;

static NAV_SECTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section.nav-item").expect("nav section selector should parse"));
static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("anchor selector should parse"));

/// A country and its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub url: Url,
}

/// Fetch `<base>/country` and list every country link on it.
///
/// A non-2xx index page is logged and yields no entities. Transport
/// failures are returned as errors.
pub async fn discover_entities<S: PageSource>(source: &S, base: &Url) -> Result<Vec<Entity>> {
    let index = index_url(base)?;
    let page = source.get(&index).await?;
    if !page.is_success() {
        error!(url = %index, status = page.status, "Error accessing country index");
        return Ok(Vec::new());
    }

    let entities = parse_entity_links(&page.body, base);
    info!(count = entities.len(), "discovered countries");
    Ok(entities)
}

/// `<base>/country`, keeping any path already on `base`.
pub fn index_url(base: &Url) -> Result<Url> {
    let raw = format!("{}/country", base.as_str().trim_end_matches('/'));
    Url::parse(&raw).with_context(|| format!("building country index URL from {}", base))
}

/// Pull `(name, url)` pairs out of every `section.nav-item` anchor.
/// Duplicates are kept in document order.
pub fn parse_entity_links(html: &str, base: &Url) -> Vec<Entity> {
    let document = Html::parse_document(html);
    let mut out = Vec::new();

    for section in document.select(&NAV_SECTION) {
        for anchor in section.select(&ANCHOR) {
            let name = anchor.text().collect::<String>().trim().to_string();
            let Some(href) = anchor.value().attr("href") else {
                warn!(name = %name, "anchor without href, skipping");
                continue;
            };
            match base.join(href) {
                Ok(url) => {
                    trace!(%url, "Found country link");
                    out.push(Entity { name, url });
                }
                Err(e) => warn!(href, error = %e, "unresolvable country link"),
            }
        }
    }

    out
}
