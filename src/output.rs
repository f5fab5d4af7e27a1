//! Results formatting: `Datetime, Tidal Height (m)` rows

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::TideError;

/// Header line of the results file
pub const HEADER: &str = "Datetime, Tidal Height (m)";

/// One result row, e.g. `2014-01-01 03:00:00, 3.0`
///
/// Fractional seconds are printed only when the time has them.
pub fn format_row(time: &NaiveDateTime, height: f64) -> String {
    format!("{}, {:?}", time.format("%Y-%m-%d %H:%M:%S%.f"), height)
}

/// Writes the header and one row per result
pub fn write_results(
    path: impl AsRef<Path>,
    results: &BTreeMap<NaiveDateTime, f64>,
) -> Result<(), TideError> {
    let mut contents = String::from(HEADER);
    contents.push('\n');
    for (time, height) in results {
        contents.push_str(&format_row(time, *height));
        contents.push('\n');
    }
    fs::write(path, contents)?;
    Ok(())
}
