// src/store.rs

use anyhow::{Context, Result};
use chrono::Local;
use csv::{ReaderBuilder, WriterBuilder};
use glob::glob;
use serde::Serialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};
use tracing::{debug, info, warn};

use crate::config::{WriteMode, PROCESSED_FILE_STEM, RAW_FILE_STEM};
use crate::record::{CountryRecord, NormalizedRecord, PROCESSED_COLUMNS, RAW_COLUMNS};

/// Target file for a table. `Replace` always reuses `<stem>.csv`;
/// `Append` adds a timestamp so earlier runs stay on disk.
pub fn output_path(dir: &Path, stem: &str, mode: WriteMode) -> PathBuf {
    match mode {
        WriteMode::Replace => dir.join(format!("{}.csv", stem)),
        WriteMode::Append => {
            let now = Local::now().format("%Y%m%d_%H%M%S");
            dir.join(format!("{}_{}.csv", stem, now))
        }
    }
}

/// Write `rows` under an explicit header, creating `dir` if needed.
///
/// The header is always written, so an empty table still has its schema.
/// Writes to a temp file and renames it over the target; the temp file is
/// removed again if either step fails.
fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let tmp_path = path.with_extension("csv.tmp");
    let result = write_csv(&tmp_path, header, rows).and_then(|()| {
        fs::rename(&tmp_path, path)
            .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))
    });
    if let Err(e) = result {
        if let Err(rm) = fs::remove_file(&tmp_path) {
            if rm.kind() != io::ErrorKind::NotFound {
                warn!(path = %tmp_path.display(), error = %rm, "could not remove temp file");
            }
        }
        return Err(e);
    }

    debug!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("writing row to {}", path.display()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the scraped table to the raw directory.
pub fn write_raw(dir: &Path, rows: &[CountryRecord], mode: WriteMode) -> Result<PathBuf> {
    let path = output_path(dir, RAW_FILE_STEM, mode);
    write_table(&path, &RAW_COLUMNS, rows)?;
    info!("DataFrame saved in: {}", path.display());
    Ok(path)
}

/// Save the normalized table to the processed directory.
pub fn write_processed(dir: &Path, rows: &[NormalizedRecord], mode: WriteMode) -> Result<PathBuf> {
    let path = output_path(dir, PROCESSED_FILE_STEM, mode);
    write_table(&path, &PROCESSED_COLUMNS, rows)?;
    info!("Processed data frame saved in: {}", path.display());
    Ok(path)
}

/// Read a raw CSV back as text rows.
pub fn read_raw(path: &Path) -> Result<Vec<CountryRecord>> {
    let mut rdr = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    rdr.deserialize()
        .collect::<Result<Vec<CountryRecord>, _>>()
        .with_context(|| format!("parsing raw table {}", path.display()))
}

/// Every `*.csv` directly inside `dir`, sorted by file name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.csv", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob(&pattern)
        .context("invalid glob pattern for CSV listing")?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// The most recently modified CSV in `dir`. Equal modification times are
/// broken by file name, the one sorting last wins.
pub fn latest_csv(dir: &Path) -> Result<Option<PathBuf>> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for path in list_csv_files(dir)? {
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .with_context(|| format!("reading modification time of {}", path.display()))?;
        // listing is name-sorted, so `>=` lets the later name win a tie
        if newest.as_ref().map_or(true, |(t, _)| modified >= *t) {
            newest = Some((modified, path));
        }
    }
    Ok(newest.map(|(_, path)| path))
}
