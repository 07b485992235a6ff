use thiserror::Error;

/// Terminal failures surfaced by the pipeline core.
///
/// Every stage fails fast: a failed stage produces no results bundle and the
/// sink is never invoked. Messages carry the offending config values so a run
/// can be diagnosed from the error alone.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input rows contained no column parseable as a calendar year.
    #[error("input rows contain no recognizable year columns; expected wide format with one column per year")]
    Format,

    /// Zero raw records were handed to the pipeline.
    #[error("received empty data, nothing to process")]
    EmptyInput,

    /// Every reshaped record was rejected during cleaning.
    #[error("all {rejected} records were removed during cleaning; check data quality")]
    NoValidRecords { rejected: usize },

    /// The single-year filter matched nothing.
    #[error("no records found for region='{region}', year={year}; check region name and year in the configuration")]
    NoMatch { region: String, year: i32 },

    /// Unrecognized aggregation operator in the legacy scalar path.
    #[error("invalid operation '{0}', expected 'sum' or 'average'")]
    InvalidOperation(String),
}
