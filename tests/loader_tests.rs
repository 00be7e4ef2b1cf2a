use std::io::Write;

use chrono::{TimeZone, Utc};
use tempfile::NamedTempFile;

use tickscope::error::AppError;
use tickscope::loader::load_csv;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_and_maps_columns() {
    let file = csv_file(
        "start_date,start_time,ltp,l1_bid_vwap,l1_ask_vwap,l1_bid_vol,l1_ask_vol,volume\n\
         2023-02-01,91500,100.5,100.0,101.0,10,8,500\n\
         2023-02-01,91501,100.75,100.25,101.25,12,9,520\n",
    );
    let ticks = load_csv(file.path()).unwrap();
    assert_eq!(ticks.len(), 2);

    let first = &ticks[0];
    assert_eq!(
        first.timestamp,
        Utc.with_ymd_and_hms(2023, 2, 1, 9, 15, 0).unwrap()
    );
    assert_eq!(first.last_price, Some(100.5));
    assert_eq!(first.buy_price, Some(100.0));
    assert_eq!(first.sell_price, Some(101.0));
    assert_eq!(first.buy_quantity, Some(10.0));
    assert_eq!(first.sell_quantity, Some(8.0));
    assert_eq!(first.total_traded_volume, Some(500.0));
}

#[test]
fn missing_start_time_column_is_fatal() {
    let file = csv_file("start_date,ltp,volume\n2023-02-01,100.5,500\n");
    assert!(matches!(
        load_csv(file.path()),
        Err(AppError::MissingColumn(col)) if col == "start_time"
    ));
}

#[test]
fn all_times_unparseable_is_fatal() {
    let file = csv_file(
        "start_date,start_time,ltp\n\
         2023-02-01,not-a-time,100.5\n\
         2023-02-01,also-bad,100.6\n",
    );
    assert!(matches!(load_csv(file.path()), Err(AppError::EmptyDataset)));
}

#[test]
fn invalid_time_rows_are_dropped_not_fatal() {
    let file = csv_file(
        "start_date,start_time,ltp\n\
         2023-02-01,91500,100.5\n\
         2023-02-01,garbage,100.6\n\
         2023-02-01,91502,100.7\n",
    );
    let ticks = load_csv(file.path()).unwrap();
    assert_eq!(ticks.len(), 2);
}

#[test]
fn missing_date_column_uses_fallback() {
    let file = csv_file("start_time,ltp\n91500,100.5\n");
    let ticks = load_csv(file.path()).unwrap();
    assert_eq!(
        ticks[0].timestamp,
        Utc.with_ymd_and_hms(2023, 1, 1, 9, 15, 0).unwrap()
    );
}

#[test]
fn zero_and_empty_dates_use_fallback() {
    let file = csv_file(
        "start_date,start_time,ltp\n\
         0,91500,100.5\n\
         ,91501,100.6\n\
         2023-06-15,91502,100.7\n",
    );
    let ticks = load_csv(file.path()).unwrap();
    assert_eq!(ticks.len(), 3);
    assert_eq!(
        ticks[0].timestamp,
        Utc.with_ymd_and_hms(2023, 1, 1, 9, 15, 0).unwrap()
    );
    assert_eq!(
        ticks[1].timestamp,
        Utc.with_ymd_and_hms(2023, 1, 1, 9, 15, 1).unwrap()
    );
    assert_eq!(
        ticks[2].timestamp,
        Utc.with_ymd_and_hms(2023, 6, 15, 9, 15, 2).unwrap()
    );
}

#[test]
fn fractional_hhmmss_is_truncated() {
    let file = csv_file("start_date,start_time,ltp\n2023-02-01,91401.9999,100.5\n");
    let ticks = load_csv(file.path()).unwrap();
    assert_eq!(
        ticks[0].timestamp,
        Utc.with_ymd_and_hms(2023, 2, 1, 9, 14, 1).unwrap()
    );
}

#[test]
fn non_numeric_fields_become_missing() {
    let file = csv_file(
        "start_date,start_time,ltp,l1_bid_vwap,volume\n\
         2023-02-01,91500,abc,100.0,\n",
    );
    let ticks = load_csv(file.path()).unwrap();
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].last_price, None);
    assert_eq!(ticks[0].buy_price, Some(100.0));
    assert_eq!(ticks[0].total_traded_volume, None);
    // Columns absent from the file are missing too.
    assert_eq!(ticks[0].sell_price, None);
}

#[test]
fn non_finite_cells_become_missing() {
    // "nan" and "inf" parse as f64 but are not usable market values.
    let file = csv_file(
        "start_date,start_time,ltp,l1_bid_vwap,l1_ask_vwap\n\
         2023-02-01,91500,nan,inf,-inf\n\
         2023-02-01,91501,100.5,100.0,101.0\n",
    );
    let ticks = load_csv(file.path()).unwrap();
    assert_eq!(ticks[0].last_price, None);
    assert_eq!(ticks[0].buy_price, None);
    assert_eq!(ticks[0].sell_price, None);
    assert_eq!(ticks[1].last_price, Some(100.5));
}

#[test]
fn series_is_sorted_by_timestamp() {
    let file = csv_file(
        "start_date,start_time,ltp\n\
         2023-02-01,91502,3\n\
         2023-02-01,91500,1\n\
         2023-02-01,91501,2\n",
    );
    let ticks = load_csv(file.path()).unwrap();
    let prices: Vec<Option<f64>> = ticks.iter().map(|t| t.last_price).collect();
    assert_eq!(prices, vec![Some(1.0), Some(2.0), Some(3.0)]);
}

#[test]
fn unreadable_file_is_fatal() {
    assert!(matches!(
        load_csv(std::path::Path::new("/nonexistent/ticks.csv")),
        Err(AppError::Io(_))
    ));
}
