//! Data sink collaborators: console rendering, JSON export, and the
//! long-format CSV dump.

use crate::analytics::ResultsBundle;
use crate::engine::DataSink;
use crate::models::LongRecord;
use anyhow::Result;
use num_format::{Locale, ToFormattedString};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Render a value as dollars with thousands grouping and two decimals.
fn money(v: f64) -> String {
    let total_cents = (v * 100.0).round() as i64;
    let whole = total_cents / 100;
    let cents = (total_cents % 100).abs();
    format!("${}.{:02}", whole.to_formatted_string(&Locale::en), cents)
}

/// Prints the bundle section-by-section to stdout.
pub struct ConsoleSink;

impl DataSink for ConsoleSink {
    fn write(&mut self, results: &ResultsBundle) -> Result<()> {
        let bar = "=".repeat(70);
        let sep = "-".repeat(70);

        println!("\n{bar}\n  GDP ANALYSIS RESULTS\n{bar}");

        println!("\n{sep}\n  CONFIGURATION\n{sep}");
        let m = &results.meta;
        println!("  Region        : {}", m.region);
        println!("  Year          : {}", m.year);
        println!("  Operation     : {}", m.operation);
        println!("  Date range    : {}..={}", m.date_range.start, m.date_range.end);
        println!("  Decline years : {}", m.decline_years);
        if let Some(country) = &m.country {
            println!("  Country       : {}", country);
        }

        println!("\n{sep}\n  TOP 10 BY GDP\n{sep}");
        for (i, row) in results.top_10.iter().enumerate() {
            println!("  {:>2}. {}  {}", i + 1, row.country, money(row.gdp));
        }

        println!("\n{sep}\n  BOTTOM 10 BY GDP\n{sep}");
        for (i, row) in results.bottom_10.iter().enumerate() {
            println!("  {:>2}. {}  {}", i + 1, row.country, money(row.gdp));
        }

        println!("\n{sep}\n  GROWTH RATE ({}..={})\n{sep}", m.date_range.start, m.date_range.end);
        for (country, rate) in &results.growth_rate {
            println!("  {country}: {rate:.2}%");
        }

        println!("\n{sep}\n  AVERAGE GDP BY CONTINENT\n{sep}");
        for (continent, avg) in &results.avg_by_continent {
            println!("  {}: {}", continent, money(*avg));
        }

        println!("\n{sep}\n  GLOBAL GDP TREND\n{sep}");
        for point in &results.global_gdp_trend {
            println!("  {}: {}", point.year, money(point.total));
        }

        println!("\n{sep}\n  FASTEST GROWING CONTINENT\n{sep}");
        match &results.fastest_growing {
            Some(winner) => println!("  {} ({:.2}%)", winner.continent, winner.rate),
            None => println!("  no continent qualifies"),
        }

        println!("\n{sep}\n  CONSISTENT DECLINE ({} years)\n{sep}", m.decline_years);
        if results.consistent_decline.is_empty() {
            println!("  none");
        }
        for country in &results.consistent_decline {
            println!("  {country}");
        }

        println!("\n{sep}\n  CONTINENT CONTRIBUTION\n{sep}");
        for (continent, share) in &results.continent_contribution {
            println!("  {continent}: {share:.2}%");
        }

        println!("\n{bar}\n  ANALYSIS COMPLETE\n{bar}\n");
        Ok(())
    }
}

/// Writes the whole bundle as pretty JSON to a file.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSink for JsonFileSink {
    fn write(&mut self, results: &ResultsBundle) -> Result<()> {
        save_results_json(results, &self.path)
    }
}

/// Save a bundle as a pretty JSON document.
pub fn save_results_json<P: AsRef<Path>>(results: &ResultsBundle, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(results)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save cleaned long-format records as CSV with a header row.
pub fn save_long_csv<P: AsRef<Path>>(records: &[LongRecord], path: P) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}
