use covidlens_core::error::Result;
use covidlens_core::filters::{drop_incomplete, filter_entities, parse_dates};
use polars::prelude::*;

fn mixed_table() -> DataFrame {
    df![
        "location" => &[Some("Austria"), Some("France"), None, Some("India"), Some("Angola")],
        "iso_code" => &[Some("AUT"), Some("FRA"), Some("AGO"), Some("IND"), Some("AGO")],
        "date" => &[Some("2021-01-01"), Some("2021-01-01"), Some("2021-01-02"), None, Some("2021-01-03")],
        "total_cases" => &[Some(1.0), Some(2.0), Some(3.0), Some(4.0), None],
        "new_cases" => &[None, Some(1.0), Some(1.0), Some(1.0), Some(1.0)],
    ]
    .unwrap()
}

#[test]
fn filter_keeps_only_allow_listed_entities_in_order() -> Result<()> {
    let allow = vec!["Austria".to_string(), "Angola".to_string(), "India".to_string()];
    let filtered = filter_entities(&mixed_table(), &allow)?;

    let codes: Vec<Option<&str>> = filtered.column("iso_code")?.str()?.into_iter().collect();
    assert_eq!(codes, vec![Some("AUT"), Some("IND"), Some("AGO")]);

    let locations = filtered.column("location")?.str()?;
    for location in locations.into_iter().flatten() {
        assert!(allow.iter().any(|entry| entry == location));
    }
    Ok(())
}

#[test]
fn filter_matches_iso_codes_too() -> Result<()> {
    let allow = vec!["AGO".to_string()];
    let filtered = filter_entities(&mixed_table(), &allow)?;

    assert_eq!(filtered.height(), 2);
    let locations: Vec<Option<&str>> = filtered.column("location")?.str()?.into_iter().collect();
    assert_eq!(locations, vec![None, Some("Angola")]);
    Ok(())
}

#[test]
fn filter_with_no_matches_is_empty_not_error() -> Result<()> {
    let filtered = filter_entities(&mixed_table(), &["Narnia".to_string()])?;
    assert_eq!(filtered.height(), 0);
    assert_eq!(filtered.width(), mixed_table().width());
    Ok(())
}

#[test]
fn drop_incomplete_removes_exactly_rows_missing_date_or_total_cases() -> Result<()> {
    let complete = drop_incomplete(&mixed_table())?;

    assert_eq!(complete.height(), 3);
    let codes: Vec<Option<&str>> = complete.column("iso_code")?.str()?.into_iter().collect();
    assert_eq!(codes, vec![Some("AUT"), Some("FRA"), Some("AGO")]);

    // Austria's missing new_cases does not disqualify the row.
    let new_cases = complete.column("new_cases")?.f64()?;
    assert_eq!(new_cases.get(0), None);
    Ok(())
}

#[test]
fn parse_dates_drops_unreadable_rows_and_reports_them() -> Result<()> {
    let df = df![
        "location" => &["A", "A", "A"],
        "iso_code" => &["AAA", "AAA", "AAA"],
        "date" => &["2021-01-01", "yesterday", "2021-01-03"],
        "total_cases" => &[1.0, 2.0, 3.0],
    ]?;

    let result = parse_dates(&df)?;
    assert_eq!(result.dataframe.height(), 2);
    assert_eq!(result.dataframe.column("date")?.dtype(), &DataType::Date);
    assert_eq!(result.rejected.len(), 1);
    assert_eq!(result.rejected[0].value, "yesterday");
    assert_eq!(result.rejected[0].row_index, 1);
    assert_eq!(result.rejected[0].message, "unrecognised date format");

    let cases = result.dataframe.column("total_cases")?.f64()?;
    assert_eq!(cases.get(0), Some(1.0));
    assert_eq!(cases.get(1), Some(3.0));

    let days = result.dataframe.column("date")?.cast(&DataType::Int32)?;
    let days = days.i32()?;
    assert_eq!(days.get(0), Some(18_628));
    assert_eq!(days.get(1), Some(18_630));
    Ok(())
}
