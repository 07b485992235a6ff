use gdp_insights::models::WideRow;
use gdp_insights::reshape::{clean, reshape};
use gdp_insights::{LongRecord, PipelineError};
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

fn rec(country: &str, continent: &str, year: i32, value: f64) -> LongRecord {
    LongRecord {
        country: country.into(),
        continent: continent.into(),
        year,
        value,
    }
}

#[test]
fn reshape_emits_one_record_per_year_column() {
    let mut row = wide(
        "Germany",
        "Europe",
        &[("2000", "1956.0"), ("2010", "3423.5"), ("2020", "3846.0")],
    );
    // non-year columns are ignored
    row.insert("Country Code".to_string(), "DEU".to_string());

    let out = reshape(&[row]).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|r| r.country == "Germany" && r.continent == "Europe"));

    let v2010 = out.iter().find(|r| r.year == 2010).unwrap();
    assert_eq!(v2010.value, 3423.5);
}

#[test]
fn reshape_defaults_empty_cells_to_zero() {
    let row = wide("Chad", "Africa", &[("2000", ""), ("2001", "  ")]);
    let out = reshape(&[row]).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| r.value == 0.0));
}

#[test]
fn reshape_tolerates_bom_country_key() {
    let mut row = HashMap::new();
    row.insert("\u{feff}Country Name".to_string(), "Japan".to_string());
    row.insert("Continent".to_string(), "Asia".to_string());
    row.insert("2020".to_string(), "5040.0".to_string());

    let out = reshape(&[row]).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].country, "Japan");
}

#[test]
fn reshape_defaults_continent_only_when_column_absent() {
    let mut absent = HashMap::new();
    absent.insert("Country Name".to_string(), "Nauru".to_string());
    absent.insert("2020".to_string(), "0.1".to_string());

    let out = reshape(&[absent]).unwrap();
    assert_eq!(out[0].continent, "Unknown");

    // present but empty stays empty, and the cleaner drops it
    let empty = wide("Nauru", "", &[("2020", "0.1")]);
    let out = reshape(&[empty]).unwrap();
    assert_eq!(out[0].continent, "");
    assert!(clean(out).is_empty());
}

#[test]
fn reshape_fails_without_year_columns() {
    let mut row = HashMap::new();
    row.insert("Country Name".to_string(), "Germany".to_string());
    row.insert("Continent".to_string(), "Europe".to_string());

    let err = reshape(&[row]).unwrap_err();
    assert!(matches!(err, PipelineError::Format));
}

#[test]
fn unparseable_cells_are_dropped_by_clean() {
    let row = wide("Ghana", "Africa", &[("2019", "not a number"), ("2020", "72.4")]);
    let out = reshape(&[row]).unwrap();
    assert_eq!(out.len(), 2);

    let cleaned = clean(out);
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].year, 2020);
}

#[test]
fn clean_drops_blank_names_and_negative_values() {
    let records = vec![
        rec("France", "Europe", 2020, 2630.0),
        rec("", "Europe", 2020, 100.0),
        rec("Ghost", "  ", 2020, 100.0),
        rec("Debtland", "Europe", 2020, -5.0),
    ];
    let cleaned = clean(records);
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].country, "France");
}

#[test]
fn clean_is_idempotent_and_order_preserving() {
    let records = vec![
        rec("B", "Asia", 2020, 2.0),
        rec("", "Asia", 2020, 1.0),
        rec("A", "Asia", 2020, 1.0),
    ];
    let once = clean(records);
    let twice = clean(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once[0].country, "B");
    assert_eq!(once[1].country, "A");
}
