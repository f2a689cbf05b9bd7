// src/logging.rs

use std::env;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `LOG_LEVEL` (or `default_level`)
/// is used as the filter.
pub fn init(default_level: &str) {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
    });
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
}
