//! Reading query timestamps from an input file

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::TideError;

/// Accepted timestamp layouts, tried in order
const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses one timestamp such as `2021-02-12T10:01:01.000Z` or `2021-02-12 10:01:01`
///
/// A trailing `Z` is accepted and dropped; times are treated as naive.
pub fn parse_query_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    let text = text.strip_suffix('Z').unwrap_or(text);
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Reads one timestamp per non-blank line
pub fn read_query_times(path: impl AsRef<Path>) -> Result<Vec<NaiveDateTime>, TideError> {
    let contents = fs::read_to_string(path)?;
    parse_query_times(&contents)
}

/// Parses newline-separated timestamps, skipping blank lines
pub fn parse_query_times(contents: &str) -> Result<Vec<NaiveDateTime>, TideError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            parse_query_time(line).ok_or_else(|| {
                TideError::Parse(format!("line {}: invalid timestamp '{}'", i + 1, line.trim()))
            })
        })
        .collect()
}
