//! Core data models for Thames tide retrieval
//!
//! This module contains the value types shared by the cache, the PLA
//! client and the interpolation engine: calendar quarters used as cache
//! keys, and parsed tide entries.

pub mod interpolate;
pub mod package;
pub mod remote;
pub mod schema;
pub mod sites;

pub use interpolate::{interpolate, EdgePolicy};
pub use package::DataPackage;
pub use remote::PlaClient;
pub use schema::validate_table;
pub use sites::{all_sites, site_by_code, site_by_name, Site};

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// One of the four three-month buckets of a calendar year
///
/// Quarters are the unit of caching: the PLA API returns a full quarter of
/// predictions for a query made on its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarQuarter {
    year: i32,
    quarter: u8,
}

impl CalendarQuarter {
    /// Creates a quarter, returning `None` unless `quarter` is in 1..=4
    pub fn new(year: i32, quarter: u8) -> Option<Self> {
        (1..=4).contains(&quarter).then_some(Self { year, quarter })
    }

    /// Returns the quarter containing the given date
    pub fn from_date(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            quarter: ((date.month() - 1) / 3 + 1) as u8,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Month number (1-12) of the first month in this quarter
    pub fn first_month(&self) -> u32 {
        (self.quarter as u32 - 1) * 3 + 1
    }

    /// First calendar day of the quarter
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.first_month(), 1)
    }

    /// Canonical token used in cache file names, e.g. `2014_Q1`
    pub fn to_filename_token(&self) -> String {
        format!("{}_Q{}", self.year, self.quarter)
    }
}

impl fmt::Display for CalendarQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter)
    }
}

/// Whether a tide entry is a high or low water
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TideKind {
    Low,
    High,
}

impl TideKind {
    /// Maps the PLA `Type` field: `0` is low water, anything else is high.
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            TideKind::Low
        } else {
            TideKind::High
        }
    }
}

impl fmt::Display for TideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TideKind::Low => f.write_str("LOW"),
            TideKind::High => f.write_str("HIGH"),
        }
    }
}

/// A single timestamped tide prediction
#[derive(Debug, Clone, PartialEq)]
pub struct TideEntry {
    /// Time of the high or low water
    pub time: NaiveDateTime,
    /// High or low water
    pub kind: TideKind,
    /// Height in meters
    pub height: f64,
}

impl TideEntry {
    pub fn new(time: NaiveDateTime, kind: TideKind, height: f64) -> Self {
        Self { time, kind, height }
    }
}

impl fmt::Display for TideEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {:?}m", self.time, self.kind, self.height)
    }
}
