//! Piecewise-linear interpolation of tide heights
//!
//! Each query time is resolved independently by a single scan over the
//! entries for the closest entry strictly before the query and the closest
//! entry at or after it. Entries do not need to be sorted.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};

use super::TideEntry;
use crate::error::TideError;

/// What to do when a query time has known entries on one side only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Use the height of the nearest entry
    #[default]
    Clamp,
    /// Extend the line through the two nearest entries on the known side
    Extrapolate,
    /// Fail with `TideError::OutOfRange`
    Error,
}

impl FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clamp" => Ok(EdgePolicy::Clamp),
            "extrapolate" => Ok(EdgePolicy::Extrapolate),
            "error" => Ok(EdgePolicy::Error),
            other => Err(format!(
                "unknown edge policy '{}', expected clamp, extrapolate or error",
                other
            )),
        }
    }
}

/// Interpolates a height for every distinct query time
///
/// # Returns
/// * `Ok(map)` with one height per distinct query time
/// * `Err(TideError::NoEntries)` if `entries` is empty
/// * `Err(TideError::OutOfRange)` for an unbounded query under `EdgePolicy::Error`
pub fn interpolate(
    entries: &[TideEntry],
    query_times: &[NaiveDateTime],
    policy: EdgePolicy,
) -> Result<BTreeMap<NaiveDateTime, f64>, TideError> {
    if entries.is_empty() {
        return Err(TideError::NoEntries);
    }

    let mut results = BTreeMap::new();
    for &time in query_times {
        if results.contains_key(&time) {
            continue;
        }
        results.insert(time, height_at(entries, time, policy)?);
    }
    Ok(results)
}

/// Closest entry strictly before `time` and closest entry at or after it
fn nearest_bounds(
    entries: &[TideEntry],
    time: NaiveDateTime,
) -> (Option<&TideEntry>, Option<&TideEntry>) {
    let mut before: Option<&TideEntry> = None;
    let mut after: Option<&TideEntry> = None;

    for entry in entries {
        if entry.time < time {
            if before.map_or(true, |b| entry.time > b.time) {
                before = Some(entry);
            }
        } else if after.map_or(true, |a| entry.time < a.time) {
            after = Some(entry);
        }
    }

    (before, after)
}

fn height_at(
    entries: &[TideEntry],
    time: NaiveDateTime,
    policy: EdgePolicy,
) -> Result<f64, TideError> {
    match nearest_bounds(entries, time) {
        (_, Some(later)) if later.time == time => Ok(later.height),
        (Some(earlier), Some(later)) => Ok(linear(earlier, later, time)),
        (Some(edge), None) => {
            let neighbour = nearest_bounds(entries, edge.time).0;
            at_edge(edge, neighbour, time, policy)
        }
        (None, Some(edge)) => {
            let neighbour = entries
                .iter()
                .filter(|e| e.time > edge.time)
                .min_by_key(|e| e.time);
            at_edge(edge, neighbour, time, policy)
        }
        (None, None) => Err(TideError::NoEntries),
    }
}

fn at_edge(
    edge: &TideEntry,
    neighbour: Option<&TideEntry>,
    time: NaiveDateTime,
    policy: EdgePolicy,
) -> Result<f64, TideError> {
    match (policy, neighbour) {
        (EdgePolicy::Error, _) => Err(TideError::OutOfRange(time)),
        (EdgePolicy::Extrapolate, Some(neighbour)) => Ok(linear(neighbour, edge, time)),
        _ => Ok(edge.height),
    }
}

/// Straight line through `a` and `b` evaluated at `time`
///
/// `a` and `b` must have distinct times.
fn linear(a: &TideEntry, b: &TideEntry, time: NaiveDateTime) -> f64 {
    let span = seconds(b.time - a.time);
    let offset = seconds(time - a.time);
    a.height + (b.height - a.height) * offset / span
}

/// Signed length of `delta` in seconds, keeping sub-second precision
fn seconds(delta: Duration) -> f64 {
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}
