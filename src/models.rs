use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Raw wide-format input row: one country per row, one column per year.
///
/// Keys are the source column names (`"Country Name"`, `"Continent"`, and the
/// decimal string of each calendar year); values are the raw cell contents.
pub type WideRow = HashMap<String, String>;

/// Tidy long-format observation (one row = one country-year pair).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub country: String,
    pub continent: String,
    pub year: i32,
    pub value: f64,
}

/// Inclusive year window used by the trend and contribution analyses.
///
/// Serialized as the two-element array `[start, end]`, matching the
/// `date_range` field of the JSON configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct DateRange {
    pub start: i32,
    pub end: i32,
}

impl DateRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }
}

impl From<[i32; 2]> for DateRange {
    fn from([start, end]: [i32; 2]) -> Self {
        Self { start, end }
    }
}

impl From<DateRange> for [i32; 2] {
    fn from(r: DateRange) -> Self {
        [r.start, r.end]
    }
}

fn default_date_range() -> DateRange {
    DateRange::new(2000, 2020)
}

fn default_decline_years() -> u32 {
    5
}

/// Run configuration, typically loaded from `config.json`.
///
/// `region` may name several continents joined by `&` or `,` ("Asia & Europe"
/// means the union of both). `operation` stays a free string here; it is only
/// validated when the legacy scalar path actually runs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub region: String,
    pub year: i32,
    #[serde(default = "Config::default_operation")]
    pub operation: String,
    #[serde(default = "default_date_range")]
    pub date_range: DateRange,
    #[serde(default = "default_decline_years")]
    pub decline_years: u32,
    #[serde(default)]
    pub country: Option<String>,
}

impl Config {
    fn default_operation() -> String {
        "sum".to_string()
    }

    /// Load a configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("read config {}", path.as_ref().display()))?;
        let cfg: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parse config {}", path.as_ref().display()))?;
        Ok(cfg)
    }

    /// The optional country filter, with blank strings treated as absent.
    pub fn country_filter(&self) -> Option<&str> {
        self.country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Resolved-config echo embedded in every [`crate::analytics::ResultsBundle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub region: String,
    pub year: i32,
    pub operation: String,
    pub date_range: DateRange,
    pub decline_years: u32,
    pub country: Option<String>,
}

impl From<&Config> for RunMeta {
    fn from(cfg: &Config) -> Self {
        Self {
            region: cfg.region.clone(),
            year: cfg.year,
            operation: cfg.operation.clone(),
            date_range: cfg.date_range,
            decline_years: cfg.decline_years,
            country: cfg.country_filter().map(str::to_string),
        }
    }
}
