//! gdp_insights
//!
//! A lightweight Rust library for reshaping, cleaning, filtering, and
//! summarizing country-level GDP data. Pairs with the `gdpi` CLI.
//!
//! ### Features
//! - Reshape wide-format rows (one column per year) into tidy long records
//! - Clean and filter by region, year, and optional country
//! - Eight fixed analyses: rankings, growth rates, trend aggregates,
//!   decline detection, and contribution shares
//! - Console and JSON sinks, plus a long-format CSV export
//!
//! ### Example
//! ```no_run
//! use gdp_insights::{Config, Engine};
//! use gdp_insights::sink::ConsoleSink;
//! use gdp_insights::source::{DataSource, CsvSource};
//!
//! let config = Config::from_path("config.json")?;
//! let source = CsvSource::new("gdp_with_continent.csv");
//! let rows = source.read()?;
//! source.validate(&rows)?;
//! let mut engine = Engine::new(ConsoleSink, config);
//! let outcome = engine.execute(rows)?;
//! println!("{} countries in decline", outcome.bundle.consistent_decline.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analytics;
pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod reshape;
pub mod sink;
pub mod source;

pub use analytics::ResultsBundle;
pub use engine::{DataSink, Engine, RunOutcome};
pub use error::PipelineError;
pub use models::{Config, DateRange, LongRecord, WideRow};
