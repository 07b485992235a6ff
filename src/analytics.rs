//! The eight derived analyses plus the legacy scalar aggregate.
//!
//! Every function here is a pure function of its inputs: no shared state, no
//! reliance on call order. `all` is the cleaned, unfiltered dataset (all
//! years, all continents); `filtered` is the single-year, region-scoped
//! subset produced by [`crate::filter::filter_records`].

use crate::error::PipelineError;
use crate::filter::parse_regions;
use crate::models::{Config, DateRange, LongRecord, RunMeta};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the `top_10` / `bottom_10` rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryGdp {
    pub country: String,
    pub gdp: f64,
}

/// One point of the global GDP trend, ordered by year ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: i32,
    pub total: f64,
}

/// Winner of the continent-level growth comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentGrowth {
    pub continent: String,
    pub rate: f64,
}

/// The complete output of one analytical run: eight named outputs plus a
/// `meta` block echoing the resolved configuration. Never mutated after
/// assembly; handed once to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsBundle {
    pub top_10: Vec<CountryGdp>,
    pub bottom_10: Vec<CountryGdp>,
    pub growth_rate: BTreeMap<String, f64>,
    pub avg_by_continent: BTreeMap<String, f64>,
    pub global_gdp_trend: Vec<YearTotal>,
    pub fastest_growing: Option<ContinentGrowth>,
    pub consistent_decline: Vec<String>,
    pub continent_contribution: BTreeMap<String, f64>,
    pub meta: RunMeta,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn percent_change(start: f64, end: f64) -> f64 {
    round2((end - start) / start * 100.0)
}

/// The ten largest filtered records by value, descending. Ties are broken by
/// country name so the ranking is deterministic. Fewer than ten records are
/// returned as-is, no padding.
pub fn top_10(filtered: &[LongRecord]) -> Vec<CountryGdp> {
    let mut rows = project(filtered);
    rows.sort_by(|a, b| {
        b.gdp
            .partial_cmp(&a.gdp)
            .unwrap()
            .then_with(|| a.country.cmp(&b.country))
    });
    rows.truncate(10);
    rows
}

/// The ten smallest filtered records by value, ascending.
pub fn bottom_10(filtered: &[LongRecord]) -> Vec<CountryGdp> {
    let mut rows = project(filtered);
    rows.sort_by(|a, b| {
        a.gdp
            .partial_cmp(&b.gdp)
            .unwrap()
            .then_with(|| a.country.cmp(&b.country))
    });
    rows.truncate(10);
    rows
}

fn project(records: &[LongRecord]) -> Vec<CountryGdp> {
    records
        .iter()
        .map(|r| CountryGdp {
            country: r.country.clone(),
            gdp: r.value,
        })
        .collect()
}

/// Percentage growth between the endpoints of `range` for every country
/// whose continent matches `region`.
///
/// A country is excluded when it lacks a value at either endpoint year or
/// when its start value is zero or negative (the rate is undefined on a
/// non-positive baseline). Rates are rounded to two decimals.
pub fn growth_rate(
    all: &[LongRecord],
    region: &str,
    range: DateRange,
) -> BTreeMap<String, f64> {
    let regions = parse_regions(region);
    let mut endpoints: AHashMap<&str, (Option<f64>, Option<f64>)> = AHashMap::new();
    for r in all {
        if !regions.contains(&r.continent.trim().to_lowercase()) {
            continue;
        }
        let slot = endpoints.entry(r.country.as_str()).or_default();
        if r.year == range.start {
            slot.0 = Some(r.value);
        }
        if r.year == range.end {
            slot.1 = Some(r.value);
        }
    }

    let mut out = BTreeMap::new();
    for (country, (start, end)) in endpoints {
        let (Some(s), Some(e)) = (start, end) else {
            continue;
        };
        if s <= 0.0 {
            continue;
        }
        out.insert(country.to_string(), percent_change(s, e));
    }
    out
}

/// Mean value per continent over the records falling inside `range`,
/// rounded to two decimals. Empty in-range set yields an empty map.
pub fn avg_by_continent(all: &[LongRecord], range: DateRange) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for r in all {
        if !range.contains(r.year) {
            continue;
        }
        let slot = sums.entry(r.continent.clone()).or_insert((0.0, 0));
        slot.0 += r.value;
        slot.1 += 1;
    }
    sums.into_iter()
        .map(|(continent, (sum, n))| (continent, round2(sum / n as f64)))
        .collect()
}

/// Worldwide value summed per year inside `range`, ordered by year ascending.
pub fn global_gdp_trend(all: &[LongRecord], range: DateRange) -> Vec<YearTotal> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for r in all {
        if range.contains(r.year) {
            *by_year.entry(r.year).or_default() += r.value;
        }
    }
    by_year
        .into_iter()
        .map(|(year, total)| YearTotal { year, total })
        .collect()
}

/// The continent with the highest growth rate between the endpoints of
/// `range`, computed on per-continent sums with the same percentage-change
/// formula as [`growth_rate`].
///
/// Continents missing an endpoint year or with a zero/negative start sum do
/// not qualify; `None` when no continent qualifies. Equal rates resolve to
/// the alphabetically first continent.
pub fn fastest_growing(all: &[LongRecord], range: DateRange) -> Option<ContinentGrowth> {
    let mut start_sums: BTreeMap<&str, f64> = BTreeMap::new();
    let mut end_sums: BTreeMap<&str, f64> = BTreeMap::new();
    for r in all {
        if r.year == range.start {
            *start_sums.entry(r.continent.as_str()).or_default() += r.value;
        }
        if r.year == range.end {
            *end_sums.entry(r.continent.as_str()).or_default() += r.value;
        }
    }

    let mut best: Option<ContinentGrowth> = None;
    for (continent, s) in &start_sums {
        if *s <= 0.0 {
            continue;
        }
        let Some(e) = end_sums.get(continent) else {
            continue;
        };
        let rate = percent_change(*s, *e);
        // strictly-greater keeps the alphabetically first continent on ties
        if best.as_ref().is_none_or(|b| rate > b.rate) {
            best = Some(ContinentGrowth {
                continent: (*continent).to_string(),
                rate,
            });
        }
    }
    best
}

/// Countries whose value strictly decreased year-over-year across their most
/// recent `decline_years` consecutive years of data.
///
/// A country qualifies only when its `decline_years` newest data years form
/// an unbroken calendar run with each successive value strictly below the
/// previous one. Windows shorter than two years qualify nobody. Output is
/// alphabetical.
pub fn consistent_decline(all: &[LongRecord], decline_years: u32) -> Vec<String> {
    if decline_years < 2 {
        return Vec::new();
    }
    let window = decline_years as usize;

    let mut by_country: AHashMap<&str, BTreeMap<i32, f64>> = AHashMap::new();
    for r in all {
        by_country
            .entry(r.country.as_str())
            .or_default()
            .insert(r.year, r.value);
    }

    let mut out: Vec<String> = Vec::new();
    for (country, years) in &by_country {
        if years.len() < window {
            continue;
        }
        // newest-first
        let recent: Vec<(i32, f64)> = years.iter().rev().take(window).map(|(y, v)| (*y, *v)).collect();
        let consecutive = recent.windows(2).all(|w| w[0].0 == w[1].0 + 1);
        let declining = recent.windows(2).all(|w| w[0].1 < w[1].1);
        if consecutive && declining {
            out.push((*country).to_string());
        }
    }
    out.sort();
    out
}

/// Each continent's percentage share of the global value summed over
/// `range`, rounded to two decimals. An all-zero (or empty) in-range set
/// yields an empty map rather than dividing by zero.
pub fn continent_contribution(all: &[LongRecord], range: DateRange) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    let mut global = 0.0;
    for r in all {
        if !range.contains(r.year) {
            continue;
        }
        *sums.entry(r.continent.clone()).or_default() += r.value;
        global += r.value;
    }
    if global == 0.0 {
        return BTreeMap::new();
    }
    sums.into_iter()
        .map(|(continent, sum)| (continent, round2(sum / global * 100.0)))
        .collect()
}

/// Legacy single-value path: `sum` or `average` over the filtered records.
pub fn scalar_aggregate(records: &[LongRecord], operation: &str) -> Result<f64, PipelineError> {
    let total: f64 = records.iter().map(|r| r.value).sum();
    match operation.trim().to_lowercase().as_str() {
        "sum" => Ok(total),
        "average" => {
            if records.is_empty() {
                Ok(0.0)
            } else {
                Ok(total / records.len() as f64)
            }
        }
        _ => Err(PipelineError::InvalidOperation(operation.trim().to_string())),
    }
}

/// Assemble the full bundle. The eight outputs are mutually independent;
/// an empty sub-output is permitted and does not block the others.
pub fn run_all(all: &[LongRecord], filtered: &[LongRecord], config: &Config) -> ResultsBundle {
    let range = config.date_range;
    ResultsBundle {
        top_10: top_10(filtered),
        bottom_10: bottom_10(filtered),
        growth_rate: growth_rate(all, &config.region, range),
        avg_by_continent: avg_by_continent(all, range),
        global_gdp_trend: global_gdp_trend(all, range),
        fastest_growing: fastest_growing(all, range),
        consistent_decline: consistent_decline(all, config.decline_years),
        continent_contribution: continent_contribution(all, range),
        meta: RunMeta::from(config),
    }
}
