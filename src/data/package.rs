//! Validated PLA payload and its conversion to tide entries

use chrono::{Month, NaiveDate};
use serde_json::Value;

use super::schema::{read_table, MonthTable, RawEntry};
use super::{TideEntry, TideKind};
use crate::error::TideError;

/// One quarter of raw API data that has passed table validation
///
/// Construction is the only validation point: a `DataPackage` that exists
/// always holds a well-formed table, which is why the cache builds one
/// before writing anything to disk.
#[derive(Debug, Clone)]
pub struct DataPackage {
    raw: String,
    months: Vec<MonthTable>,
}

impl DataPackage {
    /// Parses and validates a raw JSON payload
    ///
    /// # Returns
    /// * `Ok(DataPackage)` if the payload holds a valid `table`
    /// * `Err(TideError::Schema)` if the JSON is invalid, `table` is absent,
    ///   or the table fails validation
    pub fn new(raw: impl Into<String>) -> Result<Self, TideError> {
        let raw = raw.into();
        let json: Value = serde_json::from_str(&raw)
            .map_err(|e| TideError::Schema(format!("payload is not valid JSON: {}", e)))?;
        let table = json
            .get("table")
            .ok_or_else(|| TideError::Schema("payload has no 'table' field".to_string()))?;
        let months = read_table(table).map_err(TideError::Schema)?;

        Ok(Self { raw, months })
    }

    /// The payload exactly as received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Converts the table to tide entries
    ///
    /// Entries follow document order (month, then day row, then record) and
    /// are not sorted by time.
    pub fn parse(&self) -> Result<Vec<TideEntry>, TideError> {
        let mut entries = Vec::new();

        for month in &self.months {
            let (year, month_number) = parse_month_name(&month.name)?;
            for (_, records) in &month.rows {
                for record in records {
                    entries.push(parse_entry(year, month_number, record)?);
                }
            }
        }

        Ok(entries)
    }
}

/// Splits `"January 2021"` into `(2021, 1)`
fn parse_month_name(name: &str) -> Result<(i32, u32), TideError> {
    let parts: Vec<&str> = name.split(' ').collect();
    let [month_name, year] = parts.as_slice() else {
        return Err(TideError::Parse(format!(
            "month name '{}' is not '<Month> <Year>'",
            name
        )));
    };

    let month = (1..=12u8)
        .filter_map(|n| Month::try_from(n).ok())
        .find(|m| m.name() == *month_name)
        .ok_or_else(|| TideError::Parse(format!("unrecognised month '{}'", month_name)))?;
    let year = year
        .parse::<i32>()
        .map_err(|_| TideError::Parse(format!("invalid year '{}' in '{}'", year, name)))?;

    Ok((year, month.number_from_month()))
}

fn parse_entry(year: i32, month: u32, record: &RawEntry) -> Result<TideEntry, TideError> {
    let (hour, minute) = parse_time(&record.time)?;
    let time = u32::try_from(record.day)
        .ok()
        .and_then(|day| NaiveDate::from_ymd_opt(year, month, day))
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| {
            TideError::Parse(format!(
                "invalid date {}-{:02}-{} {}",
                year, month, record.day, record.time
            ))
        })?;

    Ok(TideEntry::new(
        time,
        TideKind::from_code(record.kind),
        parse_height(&record.height)?,
    ))
}

/// Parses `HHMM` into hour and minute
fn parse_time(time: &str) -> Result<(u32, u32), TideError> {
    let invalid = || TideError::Parse(format!("invalid time '{}', expected HHMM", time));
    if time.len() != 4 || !time.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hour = time[..2].parse().map_err(|_| invalid())?;
    let minute = time[2..].parse().map_err(|_| invalid())?;
    Ok((hour, minute))
}

/// Parses `"6.41m"` or `"6.41"` into meters
fn parse_height(height: &str) -> Result<f64, TideError> {
    let trimmed = height.trim();
    let number = trimmed.strip_suffix('m').unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite())
        .ok_or_else(|| TideError::Parse(format!("invalid height '{}'", height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(table: Value) -> String {
        json!({ "table": table }).to_string()
    }

    fn month(name: &str, rows: Value) -> Value {
        json!({ "2021-01": { "name": name, "rows": rows } })
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_new_keeps_raw_payload() {
        let raw = payload(month(
            "January 2021",
            json!({ "1": [{ "Day": 1, "Time": "0412", "Height": "6.41m", "Type": 1 }] }),
        ));
        let package = DataPackage::new(raw.clone()).unwrap();
        assert_eq!(package.raw(), raw);
    }

    #[test]
    fn test_new_rejects_missing_table() {
        let err = DataPackage::new(r#"{"rows": {}}"#).unwrap_err();
        assert!(matches!(err, TideError::Schema(_)));
    }

    #[test]
    fn test_new_rejects_invalid_json_and_empty_table() {
        assert!(matches!(DataPackage::new("<html>"), Err(TideError::Schema(_))));
        assert!(matches!(DataPackage::new(payload(json!({}))), Err(TideError::Schema(_))));
    }

    #[test]
    fn test_parse_converts_fields() {
        let raw = payload(month(
            "January 2021",
            json!({
                "1": [
                    { "Day": 1, "Time": "0412", "Height": "6.41m", "Type": 1 },
                    { "Day": 1, "Time": "1057", "Height": "0.52", "Type": 0 }
                ],
                "2": [{ "Day": 2, "Time": "2359", "Height": "0m", "Type": 2 }]
            }),
        ));
        let entries = DataPackage::new(raw).unwrap().parse().unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], TideEntry::new(at(2021, 1, 1, 4, 12), TideKind::High, 6.41));
        assert_eq!(entries[1], TideEntry::new(at(2021, 1, 1, 10, 57), TideKind::Low, 0.52));
        assert_eq!(entries[2], TideEntry::new(at(2021, 1, 2, 23, 59), TideKind::High, 0.0));
    }

    #[test]
    fn test_parse_follows_document_order_without_sorting() {
        let raw = payload(json!({
            "2021-02": { "name": "February 2021", "rows": {
                "3": [{ "Day": 3, "Time": "0100", "Height": "1.0", "Type": 0 }]
            }},
            "2021-01": { "name": "January 2021", "rows": {
                "5": [{ "Day": 5, "Time": "0100", "Height": "2.0", "Type": 1 }]
            }}
        }));
        let entries = DataPackage::new(raw).unwrap().parse().unwrap();
        assert_eq!(entries[0].time, at(2021, 2, 3, 1, 0));
        assert_eq!(entries[1].time, at(2021, 1, 5, 1, 0));
    }

    #[test]
    fn test_parse_rejects_bad_month_names() {
        for name in ["Janvier 2021", "January", "January  2021", "January 2021 extra", "Jan 2021"] {
            let raw = payload(month(
                name,
                json!({ "1": [{ "Day": 1, "Time": "0412", "Height": "1.0", "Type": 1 }] }),
            ));
            let result = DataPackage::new(raw).unwrap().parse();
            assert!(matches!(result, Err(TideError::Parse(_))), "{} should fail", name);
        }
    }

    #[test]
    fn test_parse_rejects_bad_times() {
        for time in ["412", "04:12", "ab12", "2460", "04120"] {
            let raw = payload(month(
                "January 2021",
                json!({ "1": [{ "Day": 1, "Time": time, "Height": "1.0", "Type": 1 }] }),
            ));
            let result = DataPackage::new(raw).unwrap().parse();
            assert!(matches!(result, Err(TideError::Parse(_))), "{} should fail", time);
        }
    }

    #[test]
    fn test_parse_rejects_bad_heights_and_days() {
        let raw = payload(month(
            "January 2021",
            json!({ "1": [{ "Day": 1, "Time": "0412", "Height": "high", "Type": 1 }] }),
        ));
        assert!(matches!(
            DataPackage::new(raw).unwrap().parse(),
            Err(TideError::Parse(_))
        ));

        let raw = payload(month(
            "February 2021",
            json!({ "30": [{ "Day": 30, "Time": "0412", "Height": "1.0", "Type": 1 }] }),
        ));
        assert!(matches!(
            DataPackage::new(raw).unwrap().parse(),
            Err(TideError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_height_variants() {
        assert_eq!(parse_height("6.41m").unwrap(), 6.41);
        assert_eq!(parse_height(" 6.41 ").unwrap(), 6.41);
        assert_eq!(parse_height("0").unwrap(), 0.0);
        assert!(parse_height("m").is_err());
        assert!(parse_height("NaN").is_err());
    }
}
