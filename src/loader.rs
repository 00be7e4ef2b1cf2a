use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use csv::ReaderBuilder;
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::error::AppError;
use crate::model::tick::RawTick;

/// Substituted whenever the source date field is absent, empty, "0", or
/// unparseable.
fn fallback_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("fallback date constant is valid")
}

/// Raw CSV row with the source's column names. Market fields are coerced
/// leniently: anything that does not parse as a number becomes `None` and is
/// left for the cleaner to resolve.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(rename = "ltp", default, deserialize_with = "lenient_f64")]
    last_price: Option<f64>,
    #[serde(rename = "l1_bid_vwap", default, deserialize_with = "lenient_f64")]
    buy_price: Option<f64>,
    #[serde(rename = "l1_ask_vwap", default, deserialize_with = "lenient_f64")]
    sell_price: Option<f64>,
    #[serde(rename = "l1_bid_vol", default, deserialize_with = "lenient_f64")]
    buy_quantity: Option<f64>,
    #[serde(rename = "l1_ask_vol", default, deserialize_with = "lenient_f64")]
    sell_quantity: Option<f64>,
    #[serde(rename = "volume", default, deserialize_with = "lenient_f64")]
    total_traded_volume: Option<f64>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    // "nan"/"inf" parse as f64 but are unusable market values; coerce them to
    // missing so the cleaner resolves them like any other gap.
    Ok(raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite()))
}

/// Decode a numeric `HHMMSS` value (possibly fractional, e.g. `91401.9999`)
/// into a seconds-of-day offset. Returns `None` when the value is not
/// numeric. Out-of-range minute/second digits are not rejected; they roll
/// over in the date arithmetic.
pub fn decode_hhmmss(raw: &str) -> Option<i64> {
    let v = raw.trim().parse::<f64>().ok()?;
    if !v.is_finite() {
        return None;
    }
    let v = v.trunc() as i64;
    let hours = v / 10_000;
    let minutes = (v % 10_000) / 100;
    let seconds = v % 100;
    Some(hours * 3600 + minutes * 60 + seconds)
}

fn reconstruct_date(raw: Option<&str>) -> NaiveDate {
    let Some(raw) = raw else {
        return fallback_date();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "0" {
        return fallback_date();
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").unwrap_or_else(|_| fallback_date())
}

fn reconstruct_timestamp(row: &CsvRow) -> Option<DateTime<Utc>> {
    let offset = decode_hhmmss(row.start_time.as_deref()?)?;
    let date = reconstruct_date(row.start_date.as_deref());
    let midnight = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
    Some(midnight + Duration::seconds(offset))
}

/// Load and normalize the raw dataset: reconstruct timestamps, map source
/// columns to canonical names, coerce numerics, and order the series by
/// timestamp (stable, so duplicate timestamps keep input order).
///
/// Fatal errors: unreadable file, missing `start_time` column, and a series
/// that is empty once unparseable rows are dropped.
pub fn load_csv(path: &Path) -> Result<Vec<RawTick>, AppError> {
    info!(path = %path.display(), "loading dataset");
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h.trim() == "start_time") {
        return Err(AppError::MissingColumn("start_time".to_string()));
    }

    let mut ticks: Vec<RawTick> = Vec::new();
    let mut invalid_time = 0usize;
    let mut malformed = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                malformed += 1;
                warn!(error = %err, "skipping malformed row");
                continue;
            }
        };
        let Some(timestamp) = reconstruct_timestamp(&row) else {
            invalid_time += 1;
            continue;
        };
        ticks.push(RawTick {
            timestamp,
            last_price: row.last_price,
            buy_price: row.buy_price,
            sell_price: row.sell_price,
            buy_quantity: row.buy_quantity,
            sell_quantity: row.sell_quantity,
            total_traded_volume: row.total_traded_volume,
        });
    }

    if invalid_time > 0 {
        warn!(dropped = invalid_time, "rows dropped due to invalid start_time");
    }
    if malformed > 0 {
        warn!(dropped = malformed, "rows dropped due to malformed fields");
    }
    if ticks.is_empty() {
        return Err(AppError::EmptyDataset);
    }

    ticks.sort_by_key(|t| t.timestamp);
    info!(records = ticks.len(), "dataset loaded and normalized");
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_hhmmss() {
        // 09:14:01
        assert_eq!(decode_hhmmss("91401"), Some(9 * 3600 + 14 * 60 + 1));
        // Fractional seconds are truncated.
        assert_eq!(decode_hhmmss("91401.9999"), Some(9 * 3600 + 14 * 60 + 1));
        assert_eq!(decode_hhmmss("0"), Some(0));
        // 15:30:59
        assert_eq!(decode_hhmmss("153059"), Some(15 * 3600 + 30 * 60 + 59));
    }

    #[test]
    fn decode_rejects_non_numeric() {
        assert_eq!(decode_hhmmss(""), None);
        assert_eq!(decode_hhmmss("not-a-time"), None);
        assert_eq!(decode_hhmmss("nan"), None);
        assert_eq!(decode_hhmmss("inf"), None);
    }

    #[test]
    fn decode_digit_groups_recombine() {
        for raw in [0_i64, 1, 959, 91401, 123456, 235959] {
            let secs = decode_hhmmss(&raw.to_string()).unwrap();
            let hours = secs / 3600;
            let minutes = (secs % 3600) / 60;
            let seconds = secs % 60;
            assert!((0..60).contains(&minutes));
            assert!((0..60).contains(&seconds));
            assert_eq!(hours * 10_000 + minutes * 100 + seconds, raw);
        }
    }

    #[test]
    fn date_fallback_applies() {
        let fallback = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(reconstruct_date(None), fallback);
        assert_eq!(reconstruct_date(Some("")), fallback);
        assert_eq!(reconstruct_date(Some("0")), fallback);
        assert_eq!(reconstruct_date(Some("garbage")), fallback);
        assert_eq!(
            reconstruct_date(Some("2024-03-15")),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }
}
