//! Cache file naming: `<siteCode>_<year>_Q<quarter>.json`

use crate::data::{CalendarQuarter, Site};

/// Identifies one cached quarter of data for one gauge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub site_code: String,
    pub quarter: CalendarQuarter,
}

impl CacheKey {
    pub fn new(site: &Site, quarter: CalendarQuarter) -> Self {
        Self {
            site_code: site.code.to_string(),
            quarter,
        }
    }

    /// File name for this key, e.g. `0113A_2014_Q1.json`
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.site_code, self.quarter.to_filename_token())
    }

    /// Parses a cache file name, returning `None` for anything else
    ///
    /// The site code must be 4-5 ASCII alphanumerics, the year exactly four
    /// digits and the quarter a single digit 1-4.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(".json")?;
        let mut parts = stem.split('_');
        let (code, year, quarter) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        if !(4..=5).contains(&code.len()) || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digit = quarter.strip_prefix('Q')?;
        if digit.len() != 1 {
            return None;
        }

        let quarter = CalendarQuarter::new(year.parse().ok()?, digit.parse().ok()?)?;
        Some(Self {
            site_code: code.to_string(),
            quarter,
        })
    }
}
