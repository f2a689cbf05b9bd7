// src/config.rs

use anyhow::{bail, Context, Result};
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://data.worldbank.org";
pub const DEFAULT_RAW_DIR: &str = "Raw_Data_Country";
pub const DEFAULT_PROCESSED_DIR: &str = "Process_Data_Country";
pub const RAW_FILE_STEM: &str = "raw_data_country";
pub const PROCESSED_FILE_STEM: &str = "process_data_country";

/// Whether a run overwrites the previous output file or adds a new one
/// next to it. The query service concatenates every CSV it finds, so
/// `Append` makes repeated scrapes accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Replace,
    Append,
}

impl FromStr for WriteMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(WriteMode::Replace),
            "append" => Ok(WriteMode::Append),
            other => bail!("unknown WRITE_MODE `{}` (expected `replace` or `append`)", other),
        }
    }
}

/// Bounds of the politeness sleep between two country pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            bail!("delay min {:?} is greater than max {:?}", min, max);
        }
        Ok(Self { min, max })
    }

    /// No sleeping at all.
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub delay: DelayRange,
    pub write_mode: WriteMode,
    pub port: u16,
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base).with_context(|| format!("parsing BASE_URL {}", base))?;

        let delay_min: f64 = parse_or(&lookup, "DELAY_MIN_SECS", 1.0)?;
        let delay_max: f64 = parse_or(&lookup, "DELAY_MAX_SECS", 3.0)?;
        let delay = DelayRange::new(
            Duration::try_from_secs_f64(delay_min).context("DELAY_MIN_SECS out of range")?,
            Duration::try_from_secs_f64(delay_max).context("DELAY_MAX_SECS out of range")?,
        )?;

        Ok(Self {
            base_url,
            raw_dir: lookup("RAW_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_RAW_DIR.to_string())
                .into(),
            processed_dir: lookup("PROCESSED_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_PROCESSED_DIR.to_string())
                .into(),
            delay,
            write_mode: parse_or(&lookup, "WRITE_MODE", WriteMode::Replace)?,
            port: parse_or(&lookup, "PORT", 8000)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {} `{}`: {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = Config::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://data.worldbank.org/");
        assert_eq!(cfg.raw_dir, PathBuf::from("Raw_Data_Country"));
        assert_eq!(cfg.processed_dir, PathBuf::from("Process_Data_Country"));
        assert_eq!(cfg.delay.min, Duration::from_secs(1));
        assert_eq!(cfg.delay.max, Duration::from_secs(3));
        assert_eq!(cfg.write_mode, WriteMode::Replace);
        assert_eq!(cfg.port, 8000);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("BASE_URL", "http://localhost:9000"),
            ("DELAY_MIN_SECS", "0"),
            ("DELAY_MAX_SECS", "0.5"),
            ("WRITE_MODE", "Append"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url.host_str(), Some("localhost"));
        assert_eq!(cfg.delay.max, Duration::from_millis(500));
        assert_eq!(cfg.write_mode, WriteMode::Append);
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[("WRITE_MODE", "merge")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[
            ("DELAY_MIN_SECS", "5"),
            ("DELAY_MAX_SECS", "2"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup_from(&[("DELAY_MIN_SECS", "-1")])).is_err());
    }
}
