// src/serve/mod.rs

use std::{convert::Infallible, sync::Arc};
use tracing::debug;
use warp::{reply::Reply, Filter};

pub mod table;

pub use table::{QueryTable, RowView};

/// Name of the repeatable query parameter selecting countries.
pub const COUNTRIES_PARAM: &str = "COUNTRIES";

/// All values of the `COUNTRIES` parameter, in request order.
pub fn requested_countries(raw_query: &str) -> Vec<String> {
    url::form_urlencoded::parse(raw_query.as_bytes())
        .filter(|(k, _)| k == COUNTRIES_PARAM)
        .map(|(_, v)| v.into_owned())
        .collect()
}

fn with_table(
    table: Arc<QueryTable>,
) -> impl Filter<Extract = (Arc<QueryTable>,), Error = Infallible> + Clone {
    warp::any().map(move || table.clone())
}

/// Raw query string, empty when the request has none.
fn raw_query() -> impl Filter<Extract = (String,), Error = Infallible> + Clone {
    warp::query::raw()
        .or(warp::any().map(String::new))
        .unify()
}

async fn get_data(raw: String, table: Arc<QueryTable>) -> Result<impl Reply, Infallible> {
    let countries = requested_countries(&raw);
    let rows = table.filter(&countries);
    debug!(requested = countries.len(), returned = rows.len(), "GET /data");
    Ok(warp::reply::json(&rows))
}

async fn health(table: Arc<QueryTable>) -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "country-data-api",
        "rows": table.len(),
    })))
}

/// `GET /data` and `GET /health` over a loaded table.
pub fn routes(
    table: Arc<QueryTable>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let data = warp::path("data")
        .and(warp::path::end())
        .and(warp::get())
        .and(raw_query())
        .and(with_table(table.clone()))
        .and_then(get_data);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_table(table))
        .and_then(health);

    data.or(health)
}
