//! Data source collaborators: CSV and JSON readers of wide-format rows.
//!
//! The core only depends on the [`DataSource`] contract; the concrete reader
//! is picked by file extension via [`source_for_path`].

use crate::models::WideRow;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

const REQUIRED_COLUMNS: [&str; 2] = ["Country Name", "Continent"];

/// Yields raw wide-format rows and checks that the fixed schema is present.
pub trait DataSource: std::fmt::Debug {
    /// Read all rows. An empty file is an error at this boundary.
    fn read(&self) -> Result<Vec<WideRow>>;

    /// Check the required columns (`Country Name`, `Continent`) on the first
    /// row. The BOM-prefixed `Country Name` variant is accepted.
    fn validate(&self, rows: &[WideRow]) -> Result<()> {
        let Some(first) = rows.first() else {
            bail!("no data to validate");
        };
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| {
                !first.contains_key(**col) && !first.contains_key(&format!("\u{feff}{}", col))
            })
            .copied()
            .collect();
        if !missing.is_empty() {
            bail!("missing required columns: {}", missing.join(", "));
        }
        Ok(())
    }
}

/// Wide-format CSV file reader (header row names the columns).
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for CsvSource {
    fn read(&self) -> Result<Vec<WideRow>> {
        let mut rdr = csv::Reader::from_path(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        let headers = rdr
            .headers()
            .with_context(|| format!("read headers of {}", self.path.display()))?
            .clone();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.with_context(|| format!("read {}", self.path.display()))?;
            let row: WideRow = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect();
            rows.push(row);
        }
        if rows.is_empty() {
            bail!("{}: file contains no data rows", self.path.display());
        }
        log::info!("loaded {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

/// JSON file reader: an array of objects, one object per wide row. Scalar
/// values are coerced to their string form so both sources feed the reshaper
/// identically.
#[derive(Debug)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for JsonSource {
    fn read(&self) -> Result<Vec<WideRow>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", self.path.display()))?;
        let Some(items) = value.as_array() else {
            bail!("{}: expected a top-level JSON array", self.path.display());
        };

        let mut rows = Vec::new();
        for item in items {
            let Some(obj) = item.as_object() else {
                bail!("{}: expected an array of objects", self.path.display());
            };
            let row: WideRow = obj
                .iter()
                .map(|(k, v)| (k.clone(), coerce_cell(v)))
                .collect();
            rows.push(row);
        }
        if rows.is_empty() {
            bail!("{}: file contains no data rows", self.path.display());
        }
        log::info!("loaded {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

fn coerce_cell(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pick a concrete source by file extension (`.csv` or `.json`).
pub fn source_for_path(path: &Path) -> Result<Box<dyn DataSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => Ok(Box::new(CsvSource::new(path))),
        Some("json") => Ok(Box::new(JsonSource::new(path))),
        Some(other) => bail!("unsupported data file extension: .{}", other),
        None => bail!("data file {} has no extension", path.display()),
    }
}
