//! Wide-to-long reshaping and record cleaning.
//!
//! The reshaper turns one wide row (one column per year) into one
//! [`LongRecord`] per year column. The cleaner is a pure filter that drops
//! structurally invalid records; skips are count-reported, never logged
//! individually.

use crate::error::PipelineError;
use crate::models::{LongRecord, WideRow};

const COUNTRY_KEY: &str = "Country Name";
/// Some exports carry a UTF-8 byte-order mark glued to the first header.
const COUNTRY_KEY_BOM: &str = "\u{feff}Country Name";
const CONTINENT_KEY: &str = "Continent";

/// Convert wide rows into long records, one per (row, year-column) pair.
///
/// - `value` is parsed from the cell; empty or absent cells become `0.0`,
///   unparseable cells become NaN and are dropped by [`clean`].
/// - `country` is read from `"Country Name"` (BOM-prefixed variant accepted);
///   a missing column yields an empty name, also dropped by [`clean`].
/// - `continent` defaults to `"Unknown"` only when the column is absent.
///
/// Fails with [`PipelineError::Format`] when no row contributes a single
/// column whose name parses as a year.
pub fn reshape(rows: &[WideRow]) -> Result<Vec<LongRecord>, PipelineError> {
    let mut out = Vec::new();
    let mut saw_year_column = false;

    for row in rows {
        let country = row
            .get(COUNTRY_KEY)
            .or_else(|| row.get(COUNTRY_KEY_BOM))
            .cloned()
            .unwrap_or_default();
        let continent = row
            .get(CONTINENT_KEY)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        for (col, cell) in row {
            let Ok(year) = col.parse::<i32>() else {
                continue;
            };
            saw_year_column = true;
            out.push(LongRecord {
                country: country.clone(),
                continent: continent.clone(),
                year,
                value: parse_cell(cell),
            });
        }
    }

    if !saw_year_column {
        return Err(PipelineError::Format);
    }
    log::debug!("reshaped {} wide rows into {} records", rows.len(), out.len());
    Ok(out)
}

fn parse_cell(cell: &str) -> f64 {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Drop invalid records: blank country or continent, non-finite or negative
/// values. Order-preserving and idempotent.
pub fn clean(records: Vec<LongRecord>) -> Vec<LongRecord> {
    let before = records.len();
    let kept: Vec<LongRecord> = records
        .into_iter()
        .filter(|r| {
            !r.country.trim().is_empty()
                && !r.continent.trim().is_empty()
                && r.value.is_finite()
                && r.value >= 0.0
        })
        .collect();

    let dropped = before - kept.len();
    if dropped > 0 {
        log::info!("cleaning dropped {} of {} records", dropped, before);
    }
    kept
}
