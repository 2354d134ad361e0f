use covidlens_core::error::{PipelineError, Result};
use covidlens_core::filters::parse_dates;
use covidlens_core::metrics::{derive_death_rate, latest_per_entity};
use covidlens_core::ranking::top_n_by;
use polars::prelude::*;

fn snapshot_input() -> Result<DataFrame> {
    let df = df![
        "location" => &["A", "A", "A", "B", "B"],
        "iso_code" => &["AAA", "AAA", "AAA", "BBB", "BBB"],
        "date" => &["2021-01-01", "2021-01-03", "2021-01-02", "2021-01-05", "2021-01-05"],
        "total_cases" => &[10.0, 30.0, 20.0, 500.0, 600.0],
        "people_vaccinated" => &[Some(1.0), Some(50.0), Some(2.0), Some(10.0), Some(20.0)],
        "population" => &[Some(100.0), Some(100.0), Some(100.0), Some(0.0), Some(0.0)],
    ]?;
    Ok(parse_dates(&df)?.dataframe)
}

#[test]
fn death_rate_is_null_not_error_for_zero_cases() -> Result<()> {
    let df = df![
        "total_deaths" => &[Some(0.0), Some(5.0), Some(2.0), None],
        "total_cases" => &[Some(0.0), Some(0.0), Some(8.0), Some(4.0)],
    ]?;

    let derived = derive_death_rate(&df)?;
    let rate: Vec<Option<f64>> = derived.column("death_rate")?.f64()?.into_iter().collect();
    assert_eq!(rate, vec![None, None, Some(0.25), None]);
    Ok(())
}

#[test]
fn latest_picks_max_date_per_entity() -> Result<()> {
    let latest = latest_per_entity(&snapshot_input()?)?;

    assert_eq!(latest.height(), 2);
    let locations: Vec<Option<&str>> = latest.column("location")?.str()?.into_iter().collect();
    assert_eq!(locations, vec![Some("A"), Some("B")]);

    let cases = latest.column("total_cases")?.f64()?;
    assert_eq!(cases.get(0), Some(30.0));
    Ok(())
}

#[test]
fn latest_tie_goes_to_later_source_row() -> Result<()> {
    let latest = latest_per_entity(&snapshot_input()?)?;
    let cases = latest.column("total_cases")?.f64()?;
    assert_eq!(cases.get(1), Some(600.0));
    Ok(())
}

#[test]
fn latest_appends_population_ratios() -> Result<()> {
    let latest = latest_per_entity(&snapshot_input()?)?;

    let pct = latest.column("pct_vaccinated")?.f64()?;
    assert_eq!(pct.get(0), Some(50.0));
    // Zero population gives an undefined share.
    assert_eq!(pct.get(1), None);

    let rate = latest.column("vaccination_rate")?.f64()?;
    assert_eq!(rate.get(0), Some(50.0));

    let per_100k = latest.column("cases_per_100k")?.f64()?;
    assert!((per_100k.get(0).unwrap() - 30_000.0).abs() < 1e-6);
    assert_eq!(per_100k.get(1), None);

    let unvaccinated = latest.column("people_unvaccinated")?.f64()?;
    assert_eq!(unvaccinated.get(0), Some(50.0));
    Ok(())
}

#[test]
fn top_n_sorts_descending() -> Result<()> {
    let df = df![
        "location" => &["A", "B", "C"],
        "total_cases" => &[50.0, 200.0, 10.0],
    ]?;

    let top = top_n_by(&df, "total_cases", 2)?;
    let cases: Vec<Option<f64>> = top.column("total_cases")?.f64()?.into_iter().collect();
    assert_eq!(cases, vec![Some(200.0), Some(50.0)]);
    let locations: Vec<Option<&str>> = top.column("location")?.str()?.into_iter().collect();
    assert_eq!(locations, vec![Some("B"), Some("A")]);
    Ok(())
}

#[test]
fn top_n_puts_nulls_last_and_keeps_ties_stable() -> Result<()> {
    let df = df![
        "location" => &["A", "B", "C", "D"],
        "total_cases" => &[None, Some(5.0), Some(7.0), Some(5.0)],
    ]?;

    let top = top_n_by(&df, "total_cases", 10)?;
    let locations: Vec<Option<&str>> = top.column("location")?.str()?.into_iter().collect();
    assert_eq!(locations, vec![Some("C"), Some("B"), Some("D"), Some("A")]);
    Ok(())
}

#[test]
fn top_n_rejects_unknown_column() -> Result<()> {
    let df = df!["total_cases" => &[1.0]]?;
    let err = top_n_by(&df, "nope", 1).unwrap_err();
    assert!(matches!(err, PipelineError::UnknownColumn(name) if name == "nope"));
    Ok(())
}

#[test]
fn death_rate_accepts_integer_counts() -> Result<()> {
    let df = df![
        "total_deaths" => &[Some(1i64), Some(3), None],
        "total_cases" => &[Some(4i64), Some(0), Some(2)],
    ]?;

    let derived = derive_death_rate(&df)?;
    let rate: Vec<Option<f64>> = derived.column("death_rate")?.f64()?.into_iter().collect();
    assert_eq!(rate, vec![Some(0.25), None, None]);
    Ok(())
}

#[test]
fn latest_accepts_integer_counts() -> Result<()> {
    let df = parse_dates(&df![
        "location" => &["A", "A"],
        "iso_code" => &["AAA", "AAA"],
        "date" => &["2021-01-01", "2021-01-02"],
        "total_cases" => &[10i64, 20],
        "people_vaccinated" => &[Some(5i64), Some(25)],
        "population" => &[Some(100i64), Some(100)],
    ]?)?
    .dataframe;

    let latest = latest_per_entity(&df)?;
    let pct = latest.column("pct_vaccinated")?.f64()?;
    assert_eq!(pct.get(0), Some(25.0));
    let unvaccinated = latest.column("people_unvaccinated")?.f64()?;
    assert_eq!(unvaccinated.get(0), Some(75.0));
    Ok(())
}

#[test]
fn latest_skips_rows_without_location_or_code() -> Result<()> {
    let df = parse_dates(&df![
        "location" => &[Some("A"), None, None],
        "iso_code" => &[Some("AAA"), None, Some("BBB")],
        "date" => &["2021-01-01", "2021-01-09", "2021-01-02"],
        "total_cases" => &[1.0, 2.0, 3.0],
        "people_vaccinated" => &[Some(1.0), None, None],
        "population" => &[Some(10.0), None, None],
    ]?)?
    .dataframe;

    let latest = latest_per_entity(&df)?;
    assert_eq!(latest.height(), 2);
    let codes: Vec<Option<&str>> = latest.column("iso_code")?.str()?.into_iter().collect();
    assert_eq!(codes, vec![Some("AAA"), Some("BBB")]);
    Ok(())
}
