// src/fetch/indicators.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{error, info, warn};

use super::{Entity, PageSource};
use crate::record::{CountryRecord, Indicator};

const PANEL_CLASS: &str = "indicator-item__inner";

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("anchor selector should parse"));
static VALUE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.indicator-item__data-info").expect("value selector should parse")
});
static YEAR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p.indicator-item__data-info-year").expect("year selector should parse")
});

/// Fetch a country page and read its five indicators.
///
/// Never fails: a transport error or non-2xx status is logged and the
/// returned record has every indicator absent.
pub async fn extract_indicators<S: PageSource>(source: &S, entity: &Entity) -> CountryRecord {
    info!(country = %entity.name, "accessing data");

    let page = match source.get(&entity.url).await {
        Ok(page) => page,
        Err(e) => {
            error!(url = %entity.url, error = %e, "Error accessing country page");
            return CountryRecord::absent(&entity.name);
        }
    };
    if !page.is_success() {
        error!(url = %entity.url, status = page.status, "Error accessing country page");
        return CountryRecord::absent(&entity.name);
    }

    parse_indicators(&entity.name, &page.body)
}

/// Read every indicator panel from a country page. An indicator whose panel
/// is missing or malformed stays absent; the others are still read.
pub fn parse_indicators(country: &str, html: &str) -> CountryRecord {
    let document = Html::parse_document(html);
    let mut record = CountryRecord::absent(country);

    for indicator in Indicator::ALL {
        let Some(panel) = find_panel(&document, indicator.label()) else {
            warn!(
                indicator = indicator.label(),
                country, "Indicator was not found"
            );
            continue;
        };

        let (value, year) = record.slot_mut(indicator);
        match panel.select(&VALUE).next() {
            Some(node) => *value = text_of(node),
            None => {
                warn!(indicator = indicator.label(), country, "Indicator value missing");
                continue;
            }
        }
        match panel.select(&YEAR).next() {
            Some(node) => *year = text_of(node).replace(['(', ')'], ""),
            None => warn!(indicator = indicator.label(), country, "Indicator year missing"),
        }
    }

    record
}

/// The panel enclosing the anchor whose text is exactly `label`.
fn find_panel<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let anchor = document
        .select(&ANCHOR)
        .find(|a| a.text().collect::<String>().trim() == label)?;
    anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().classes().any(|c| c == PANEL_CLASS))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
