//! Shape checks for the PLA `table` payload
//!
//! The API returns a mapping of month keys (`"2021-01"`) to month data:
//!
//! ```json
//! { "name": "January 2021",
//!   "rows": { "1": [ { "Day": 1, "Time": "0412", "Height": "6.41m", "Type": 1 } ] } }
//! ```
//!
//! Validation is strict typed deserialization: an entry record must hold
//! exactly the four keys with the listed JSON types.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One raw observation as delivered by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawEntry {
    #[serde(rename = "Day")]
    pub day: i64,
    /// `HHMM`, e.g. `"1310"` for 13:10
    #[serde(rename = "Time")]
    pub time: String,
    /// Decimal meters, optionally suffixed with `m`
    #[serde(rename = "Height")]
    pub height: String,
    /// `0` for low water, otherwise high
    #[serde(rename = "Type")]
    pub kind: i64,
}

#[derive(Debug, Deserialize)]
struct RawMonth {
    name: String,
    rows: Map<String, Value>,
}

/// A validated month of the table, rows kept in document order
#[derive(Debug, Clone)]
pub(crate) struct MonthTable {
    pub name: String,
    pub rows: Vec<(String, Vec<RawEntry>)>,
}

/// Reads a table into typed months, describing the first deviation found.
pub(crate) fn read_table(table: &Value) -> Result<Vec<MonthTable>, String> {
    let months = table
        .as_object()
        .ok_or_else(|| "table is not a mapping".to_string())?;
    if months.is_empty() {
        return Err("table should have at least one month".to_string());
    }

    months
        .iter()
        .map(|(key, month)| {
            // serde structs also accept sequences, so shape is checked first
            if !month.is_object() {
                return Err(format!("month '{}' is not a mapping", key));
            }
            let raw = RawMonth::deserialize(month)
                .map_err(|e| format!("month '{}' is malformed: {}", key, e))?;
            let rows = raw
                .rows
                .iter()
                .map(|(day, entries)| read_day(key, day, entries).map(|e| (day.clone(), e)))
                .collect::<Result<Vec<_>, String>>()?;
            Ok(MonthTable {
                name: raw.name,
                rows,
            })
        })
        .collect()
}

fn read_day(month: &str, day: &str, entries: &Value) -> Result<Vec<RawEntry>, String> {
    let records = entries
        .as_array()
        .ok_or_else(|| format!("month '{}' day '{}' is not a sequence", month, day))?;
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            if !record.is_object() {
                return Err(format!(
                    "month '{}' day '{}' entry {} is not a mapping",
                    month, day, i
                ));
            }
            RawEntry::deserialize(record).map_err(|e| {
                format!("month '{}' day '{}' entry {} is malformed: {}", month, day, i, e)
            })
        })
        .collect()
}

/// Returns true iff `table` has the shape of a PLA tide table.
///
/// Never panics on malformed input; any deviation yields `false`.
pub fn validate_table(table: &Value) -> bool {
    read_table(table).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_table() -> Value {
        json!({
            "2021-01": {
                "name": "January 2021",
                "rows": {
                    "1": [{ "Day": 1, "Time": "0412", "Height": "6.41m", "Type": 1 }]
                }
            }
        })
    }

    #[test]
    fn test_accepts_minimal_table() {
        assert!(validate_table(&minimal_table()));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(!validate_table(&json!({})));
    }

    #[test]
    fn test_rejects_non_mapping_table_and_month() {
        assert!(!validate_table(&json!([])));
        assert!(!validate_table(&json!(null)));
        assert!(!validate_table(&json!({ "2021-01": "January" })));
        assert!(!validate_table(&json!({
            "2021-01": ["January 2021", { "1": [] }]
        })));
    }

    #[test]
    fn test_rejects_entry_record_given_as_sequence() {
        let table = json!({
            "2021-01": {
                "name": "January 2021",
                "rows": { "1": [[1, "0412", "6.41m", 1]] }
            }
        });
        assert!(!validate_table(&table));
        let err = read_table(&table).unwrap_err();
        assert!(err.contains("entry 0 is not a mapping"), "{}", err);
    }

    #[test]
    fn test_rejects_month_missing_name_or_rows() {
        let mut table = minimal_table();
        table["2021-01"].as_object_mut().unwrap().remove("name");
        assert!(!validate_table(&table));

        let mut table = minimal_table();
        table["2021-01"].as_object_mut().unwrap().remove("rows");
        assert!(!validate_table(&table));
    }

    #[test]
    fn test_rejects_rows_that_are_not_sequences() {
        let table = json!({
            "2021-01": { "name": "January 2021", "rows": { "1": { "Day": 1 } } }
        });
        assert!(!validate_table(&table));
    }

    #[test]
    fn test_rejects_entry_missing_any_key() {
        for key in ["Day", "Time", "Height", "Type"] {
            let mut table = minimal_table();
            table["2021-01"]["rows"]["1"][0]
                .as_object_mut()
                .unwrap()
                .remove(key);
            assert!(!validate_table(&table), "missing {} should be rejected", key);
        }
    }

    #[test]
    fn test_rejects_wrong_field_types() {
        let cases = [
            ("Day", json!("1")),
            ("Time", json!(412)),
            ("Height", json!(6.41)),
            ("Type", json!("1")),
            ("Type", json!(1.5)),
        ];
        for (key, value) in cases {
            let mut table = minimal_table();
            table["2021-01"]["rows"]["1"][0][key] = value.clone();
            assert!(!validate_table(&table), "{} = {} should be rejected", key, value);
        }
    }

    #[test]
    fn test_rejects_extra_entry_keys() {
        let mut table = minimal_table();
        table["2021-01"]["rows"]["1"][0]["Extra"] = json!(true);
        assert!(!validate_table(&table));
    }

    #[test]
    fn test_read_table_keeps_document_order() {
        let table = json!({
            "2021-02": { "name": "February 2021", "rows": {
                "9": [{ "Day": 9, "Time": "0100", "Height": "1.0", "Type": 0 }],
                "2": [{ "Day": 2, "Time": "0200", "Height": "2.0", "Type": 1 }]
            }},
            "2021-01": { "name": "January 2021", "rows": {} }
        });
        let months = read_table(&table).unwrap();
        assert_eq!(months[0].name, "February 2021");
        assert_eq!(months[1].name, "January 2021");
        let days: Vec<&str> = months[0].rows.iter().map(|(day, _)| day.as_str()).collect();
        assert_eq!(days, ["9", "2"]);
    }

    #[test]
    fn test_read_table_describes_failure() {
        let err = read_table(&json!({})).unwrap_err();
        assert!(err.contains("at least one month"));

        let err = read_table(&json!({ "2021-01": ["January 2021"] })).unwrap_err();
        assert!(err.contains("month '2021-01' is not a mapping"), "{}", err);
    }
}
