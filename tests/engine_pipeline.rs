use gdp_insights::engine::DataSink;
use gdp_insights::models::WideRow;
use gdp_insights::{Config, DateRange, Engine, PipelineError, ResultsBundle};
use std::collections::HashMap;

fn wide(country: &str, continent: &str, years: &[(&str, &str)]) -> WideRow {
    let mut row = HashMap::new();
    row.insert("Country Name".to_string(), country.to_string());
    row.insert("Continent".to_string(), continent.to_string());
    for (y, v) in years {
        row.insert((*y).to_string(), (*v).to_string());
    }
    row
}

fn config(region: &str, year: i32) -> Config {
    Config {
        region: region.into(),
        year,
        operation: "sum".into(),
        date_range: DateRange::new(2000, 2020),
        decline_years: 5,
        country: None,
    }
}

fn sample_rows() -> Vec<WideRow> {
    vec![
        wide("China", "Asia", &[("2000", "1211.0"), ("2020", "14687.0")]),
        wide("Japan", "Asia", &[("2000", "4968.0"), ("2020", "5040.0")]),
        wide("Germany", "Europe", &[("2000", "1956.0"), ("2020", "3846.0")]),
    ]
}

#[derive(Default)]
struct MemorySink {
    bundles: Vec<ResultsBundle>,
}

impl DataSink for &mut MemorySink {
    fn write(&mut self, results: &ResultsBundle) -> anyhow::Result<()> {
        self.bundles.push(results.clone());
        Ok(())
    }
}

struct FailingSink;

impl DataSink for FailingSink {
    fn write(&mut self, _results: &ResultsBundle) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}

#[test]
fn happy_path_delivers_bundle_to_sink_exactly_once() {
    let mut sink = MemorySink::default();
    let mut engine = Engine::new(&mut sink, config("Asia", 2020));
    let outcome = engine.execute(sample_rows()).unwrap();

    assert!(outcome.sink_error.is_none());
    assert_eq!(outcome.bundle.top_10.len(), 2);
    assert_eq!(outcome.bundle.top_10[0].country, "China");
    // cleaned data keeps all continents for the all-data analyses
    assert_eq!(outcome.cleaned.len(), 6);
    assert!(outcome.bundle.growth_rate.contains_key("Japan"));

    assert_eq!(sink.bundles.len(), 1);
    assert_eq!(sink.bundles[0], outcome.bundle);
}

#[test]
fn empty_input_fails_before_reshaping() {
    let mut sink = MemorySink::default();
    let mut engine = Engine::new(&mut sink, config("Asia", 2020));
    let err = engine.execute(Vec::new()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput));
    assert!(sink.bundles.is_empty());
}

#[test]
fn rows_without_year_columns_fail_with_format_error() {
    let mut row = HashMap::new();
    row.insert("Country Name".to_string(), "China".to_string());
    row.insert("Continent".to_string(), "Asia".to_string());

    let mut sink = MemorySink::default();
    let mut engine = Engine::new(&mut sink, config("Asia", 2020));
    let err = engine.execute(vec![row]).unwrap_err();
    assert!(matches!(err, PipelineError::Format));
}

#[test]
fn fully_invalid_data_fails_after_cleaning() {
    // year columns exist but every value is unparseable or negative
    let rows = vec![
        wide("China", "Asia", &[("2020", "oops")]),
        wide("Japan", "Asia", &[("2020", "-1")]),
    ];
    let mut sink = MemorySink::default();
    let mut engine = Engine::new(&mut sink, config("Asia", 2020));
    let err = engine.execute(rows).unwrap_err();
    assert!(matches!(err, PipelineError::NoValidRecords { rejected: 2 }));
    assert!(sink.bundles.is_empty());
}

#[test]
fn no_match_error_names_region_and_year() {
    let mut sink = MemorySink::default();
    let mut engine = Engine::new(&mut sink, config("Antarctica", 1999));
    let err = engine.execute(sample_rows()).unwrap_err();

    assert!(matches!(
        &err,
        PipelineError::NoMatch { region, year } if region == "Antarctica" && *year == 1999
    ));
    let msg = err.to_string();
    assert!(msg.contains("Antarctica"));
    assert!(msg.contains("1999"));
    assert!(sink.bundles.is_empty());
}

#[test]
fn sink_failure_does_not_discard_the_bundle() {
    let mut engine = Engine::new(FailingSink, config("Asia", 2020));
    let outcome = engine.execute(sample_rows()).unwrap();

    let sink_err = outcome.sink_error.expect("sink error should be reported");
    assert!(sink_err.to_string().contains("disk full"));
    assert_eq!(outcome.bundle.top_10.len(), 2);
}

#[test]
fn multi_region_run_spans_both_continents() {
    let mut sink = MemorySink::default();
    let mut engine = Engine::new(&mut sink, config("Asia & Europe", 2020));
    let outcome = engine.execute(sample_rows()).unwrap();

    assert_eq!(outcome.bundle.top_10.len(), 3);
    assert_eq!(outcome.bundle.growth_rate.len(), 3);
}
