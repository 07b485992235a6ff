//! Region parsing and the single-year record filter.
//!
//! Multi-region semantics ("Asia & Europe" = union of both continents) live
//! entirely in [`parse_regions`]; the filter and the region-scoped analyses
//! all go through it so the splitting rule cannot drift between callers.

use crate::models::{Config, LongRecord};

/// Split a region string into lowercased, trimmed tokens.
///
/// Splitting rule, in priority order: `&` if present, else `,` if present,
/// else the whole string is the single token. Blank tokens are dropped.
pub fn parse_regions(region: &str) -> Vec<String> {
    let parts: Vec<&str> = if region.contains('&') {
        region.split('&').collect()
    } else if region.contains(',') {
        region.split(',').collect()
    } else {
        vec![region]
    };

    parts
        .into_iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Select the records matching the configured region(s), year, and optional
/// country. Continent and country comparisons are case-insensitive after
/// trimming. An empty result is a valid outcome here; the engine decides
/// whether that is an error.
pub fn filter_records(records: &[LongRecord], config: &Config) -> Vec<LongRecord> {
    let regions = parse_regions(&config.region);
    let country = config.country_filter().map(str::to_lowercase);

    records
        .iter()
        .filter(|r| {
            if r.year != config.year {
                return false;
            }
            if !regions.contains(&r.continent.trim().to_lowercase()) {
                return false;
            }
            match &country {
                Some(c) => r.country.trim().to_lowercase() == *c,
                None => true,
            }
        })
        .cloned()
        .collect()
}
