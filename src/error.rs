//! Error types shared by the cache, fetch and interpolation layers

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::data::CalendarQuarter;

/// Errors that can occur while retrieving or interpolating tide data
#[derive(Debug, Error)]
pub enum TideError {
    /// The site name is not in the gauge registry
    #[error("Site '{0}' not found in the tidal gauge registry")]
    UnknownSite(String),

    /// The site code is not in the gauge registry
    #[error("Site code '{0}' not found in the tidal gauge registry")]
    UnknownSiteCode(String),

    /// The payload does not have the expected table shape
    #[error("Data is not in the correct format: {0}")]
    Schema(String),

    /// A field in a well-formed table could not be converted
    #[error("Failed to parse tide data: {0}")]
    Parse(String),

    /// The cache index lists a file that is no longer on disk
    #[error("Cache file {} was expected to exist but was not found", .0.display())]
    CacheCorruption(PathBuf),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Cache read/write error
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required quarter is still absent after fetching
    #[error("Data for {0} not found in cache")]
    MissingQuarter(CalendarQuarter),

    /// Interpolation was requested without any known entries
    #[error("No tide entries available to interpolate")]
    NoEntries,

    /// Query time has no known entry on one side
    #[error("Query time {0} is outside the range of known tide entries")]
    OutOfRange(NaiveDateTime),
}
