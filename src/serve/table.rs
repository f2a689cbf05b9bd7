// src/serve/table.rs

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};
use std::{collections::HashSet, path::Path};
use tracing::{info, warn};

use crate::store::list_csv_files;

/// Column used for lookups; lower-cased at load time.
pub const KEY_COLUMN: &str = "Country";

/// In-memory snapshot of every processed CSV. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct QueryTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    key: usize,
}

/// One row borrowed from a [`QueryTable`]; serializes as a JSON object
/// whose keys follow the table's column order.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [String],
    cells: &'a [Value],
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (col, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(col, cell)?;
        }
        map.end()
    }
}

impl QueryTable {
    /// Load and concatenate every `*.csv` in `dir`, in file-name order.
    ///
    /// Fails when the directory is missing, holds no CSV, or a file has no
    /// `Country` column.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!("The {} folder does not exist.", dir.display());
        }
        let files = list_csv_files(dir)?;
        if files.is_empty() {
            bail!("No csv files found in {}.", dir.display());
        }

        let mut columns: Vec<String> = Vec::new();
        let mut text_rows: Vec<Vec<Option<String>>> = Vec::new();

        for path in &files {
            let mut rdr = ReaderBuilder::new()
                .flexible(true)
                .from_path(path)
                .with_context(|| format!("opening {}", path.display()))?;
            let headers: Vec<String> = rdr
                .headers()
                .with_context(|| format!("reading header of {}", path.display()))?
                .iter()
                .map(str::to_string)
                .collect();
            if !headers.iter().any(|h| h == KEY_COLUMN) {
                bail!("{} has no `{}` column", path.display(), KEY_COLUMN);
            }

            // position of each file column in the merged table
            let mut index = Vec::with_capacity(headers.len());
            for h in &headers {
                let pos = match columns.iter().position(|c| c == h) {
                    Some(pos) => pos,
                    None => {
                        columns.push(h.clone());
                        columns.len() - 1
                    }
                };
                index.push(pos);
            }

            let mut count = 0usize;
            for record in rdr.records() {
                let record =
                    record.with_context(|| format!("reading row of {}", path.display()))?;
                let mut row = vec![None; columns.len()];
                for (i, field) in record.iter().enumerate() {
                    match index.get(i) {
                        Some(&pos) if !field.is_empty() => row[pos] = Some(field.to_string()),
                        Some(_) => {}
                        None => warn!(file = %path.display(), "extra field ignored"),
                    }
                }
                text_rows.push(row);
                count += 1;
            }
            info!(file = %path.display(), rows = count, "loaded");
        }

        let table = Self::from_text(columns, text_rows);
        info!(
            files = files.len(),
            rows = table.len(),
            "query table ready"
        );
        Ok(table)
    }

    /// Build a typed table from text cells. Rows shorter than `columns`
    /// are padded with nulls.
    fn from_text(columns: Vec<String>, mut rows: Vec<Vec<Option<String>>>) -> Self {
        let key = columns.iter().position(|c| c == KEY_COLUMN).unwrap_or(0);
        for row in &mut rows {
            row.resize(columns.len(), None);
        }

        let kinds: Vec<Kind> = (0..columns.len())
            .map(|c| {
                if c == key {
                    Kind::Text
                } else {
                    Kind::infer(rows.iter().filter_map(|r| r[c].as_deref()))
                }
            })
            .collect();

        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .map(|(c, cell)| match cell {
                        None => Value::Null,
                        Some(text) if c == key => Value::String(text.to_lowercase()),
                        Some(text) => kinds[c].convert(text),
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows, key }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose country matches any of `countries`, case-insensitively.
    /// An empty list returns every row.
    pub fn filter(&self, countries: &[String]) -> Vec<RowView<'_>> {
        let wanted: Option<HashSet<String>> = if countries.is_empty() {
            None
        } else {
            Some(countries.iter().map(|n| n.to_lowercase()).collect())
        };

        self.rows
            .iter()
            .filter(|row| match &wanted {
                None => true,
                Some(set) => row[self.key].as_str().is_some_and(|c| set.contains(c)),
            })
            .map(|row| RowView {
                columns: &self.columns,
                cells: row,
            })
            .collect()
    }
}

/// Column type chosen from the cells present in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Int,
    Float,
    Text,
}

impl Kind {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Kind {
        let mut kind = Kind::Int;
        for cell in cells {
            if kind == Kind::Int && cell.parse::<i64>().is_err() {
                kind = Kind::Float;
            }
            if kind == Kind::Float && cell.parse::<f64>().is_err() {
                return Kind::Text;
            }
        }
        kind
    }

    fn convert(self, text: String) -> Value {
        match self {
            Kind::Int => text
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::String(text)),
            Kind::Float => text
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Kind::Text => Value::String(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PROCESSED: &str = "\
Country,Life Expectancy,Year (Life Expectancy),Population Normalized,Year (Population),GDP Normalized (Current $US),Year (GDP),GDP Per Capita (Current US$),Year (GDP Per Capita),Access to Electricity (% Of Population),Year (Access Electricity)
Peru,73,2021,33700000,2022,242600000000,2022,7125.8,2022,95.1,2021
Chile,78,2021,19600000,2022,301000000000,2022,15355.5,2022,100.0,2021
";

    #[test]
    fn missing_directory_is_fatal() {
        let tmp = tempdir().unwrap();
        let err = QueryTable::load(&tmp.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err}");
    }

    #[test]
    fn directory_without_csv_is_fatal() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("readme.txt"), "hello").unwrap();
        let err = QueryTable::load(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("No csv files found"), "{err}");
    }

    #[test]
    fn loads_and_lowercases_country() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("process_data_country.csv"), PROCESSED).unwrap();
        let table = QueryTable::load(tmp.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns()[0], "Country");
        assert_eq!(table.columns().len(), 11);
        let all = serde_json::to_value(table.filter(&[])).unwrap();
        assert_eq!(all[0]["Country"], "peru");
        assert_eq!(all[0]["Population Normalized"], 33_700_000);
        assert_eq!(all[1]["Access to Electricity (% Of Population)"], 100.0);
        assert_eq!(all[0]["GDP Per Capita (Current US$)"], 7125.8);
    }

    #[test]
    fn concatenates_files_without_dedup() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.csv"), PROCESSED).unwrap();
        fs::write(tmp.path().join("b.csv"), PROCESSED).unwrap();
        let table = QueryTable::load(tmp.path()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.filter(&["PERU".to_string()]).len(), 2);
    }

    #[test]
    fn differing_headers_are_unioned() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.csv"), "Country,X\nPeru,1\n").unwrap();
        fs::write(tmp.path().join("b.csv"), "Y,Country\nz,Chile\n").unwrap();
        let table = QueryTable::load(tmp.path()).unwrap();
        assert_eq!(table.columns(), &["Country", "X", "Y"]);

        let rows = serde_json::to_value(table.filter(&[])).unwrap();
        assert_eq!(rows[0]["Y"], Value::Null);
        assert_eq!(rows[1]["X"], Value::Null);
        assert_eq!(rows[1]["Country"], "chile");
        assert_eq!(rows[1]["Y"], "z");
    }

    #[test]
    fn file_without_country_column_is_fatal() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.csv"), "Name,X\nPeru,1\n").unwrap();
        assert!(QueryTable::load(tmp.path()).is_err());
    }

    #[test]
    fn filter_is_case_insensitive_and_keeps_order() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.csv"), PROCESSED).unwrap();
        let table = QueryTable::load(tmp.path()).unwrap();

        let rows = table.filter(&["cHiLe".to_string(), "PERU".to_string()]);
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["Country"], "peru");
        assert_eq!(json[1]["Country"], "chile");

        assert!(table.filter(&["atlantis".to_string()]).is_empty());
        assert_eq!(table.filter(&[]).len(), 2);
    }

    #[test]
    fn row_keys_follow_column_order() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.csv"), PROCESSED).unwrap();
        let table = QueryTable::load(tmp.path()).unwrap();
        let text = serde_json::to_string(&table.filter(&[])[0]).unwrap();
        let country = text.find("\"Country\"").unwrap();
        let life = text.find("\"Life Expectancy\"").unwrap();
        let gdp = text.find("\"GDP Normalized (Current $US)\"").unwrap();
        assert!(country < life && life < gdp);
    }

    #[test]
    fn column_kinds() {
        assert_eq!(Kind::infer(["1", "2"].into_iter()), Kind::Int);
        assert_eq!(Kind::infer(["1", "2.5"].into_iter()), Kind::Float);
        assert_eq!(Kind::infer(["1", "x"].into_iter()), Kind::Text);
        assert_eq!(Kind::infer(std::iter::empty()), Kind::Int);
    }
}
