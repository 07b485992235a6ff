//! Pipeline orchestration: Reshape → Clean → Filter → Analyze → Deliver.
//!
//! The engine owns no analytical logic, only sequencing and fail-fast
//! guards. Each stage must produce a non-empty result before the next one
//! runs; the first empty result or error aborts the run and the sink is
//! never invoked. Once the analytics have completed, a sink failure is
//! reported but does not invalidate the computed bundle.

use crate::analytics::{self, ResultsBundle};
use crate::error::PipelineError;
use crate::filter::filter_records;
use crate::models::{Config, LongRecord, WideRow};
use crate::reshape::{clean, reshape};
use std::fmt;

/// Output collaborator that consumes a finished bundle for presentation or
/// persistence. Implementations live outside the core (console, JSON file).
pub trait DataSink {
    fn write(&mut self, results: &ResultsBundle) -> anyhow::Result<()>;
}

/// Pipeline stages, used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reshaping,
    Cleaning,
    Filtering,
    Analyzing,
    Delivering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Reshaping => "reshaping",
            Stage::Cleaning => "cleaning",
            Stage::Filtering => "filtering",
            Stage::Analyzing => "analyzing",
            Stage::Delivering => "delivering",
        };
        f.write_str(name)
    }
}

/// Result of a delivered run: the bundle is always present; `sink_error`
/// carries a sink failure that occurred after the analytics completed.
#[derive(Debug)]
pub struct RunOutcome {
    pub bundle: ResultsBundle,
    pub cleaned: Vec<LongRecord>,
    pub sink_error: Option<anyhow::Error>,
}

/// Sequences the four leaf components over one dataset and hands the result
/// bundle to the injected sink exactly once.
pub struct Engine<S: DataSink> {
    sink: S,
    config: Config,
}

impl<S: DataSink> Engine<S> {
    pub fn new(sink: S, config: Config) -> Self {
        Self { sink, config }
    }

    /// Run the full pipeline over `raw` wide rows.
    ///
    /// Guards, in order:
    /// - empty input → [`PipelineError::EmptyInput`]
    /// - no parseable year columns → [`PipelineError::Format`]
    /// - everything rejected by the cleaner → [`PipelineError::NoValidRecords`]
    /// - filter matched nothing → [`PipelineError::NoMatch`] naming the
    ///   resolved region and year
    pub fn execute(&mut self, raw: Vec<WideRow>) -> Result<RunOutcome, PipelineError> {
        if raw.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        log::info!("engine received {} raw rows", raw.len());

        let long = reshape(&raw)?;
        log::info!("stage {}: {} records", Stage::Reshaping, long.len());

        let reshaped_count = long.len();
        let cleaned = clean(long);
        log::info!("stage {}: {} records", Stage::Cleaning, cleaned.len());
        if cleaned.is_empty() {
            return Err(PipelineError::NoValidRecords {
                rejected: reshaped_count,
            });
        }

        let filtered = filter_records(&cleaned, &self.config);
        log::info!("stage {}: {} records", Stage::Filtering, filtered.len());
        if filtered.is_empty() {
            return Err(PipelineError::NoMatch {
                region: self.config.region.clone(),
                year: self.config.year,
            });
        }

        let bundle = analytics::run_all(&cleaned, &filtered, &self.config);
        log::info!("stage {}: bundle assembled", Stage::Analyzing);

        let sink_error = match self.sink.write(&bundle) {
            Ok(()) => None,
            Err(e) => {
                log::error!("stage {}: sink failed: {:#}", Stage::Delivering, e);
                Some(e)
            }
        };

        Ok(RunOutcome {
            bundle,
            cleaned,
            sink_error,
        })
    }
}
