//! Static registry of PLA tidal gauges
//!
//! This module contains the fixed list of Thames tidal gauges served by the
//! Port of London Authority prediction API, with lookups by name and code.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::TideError;

/// A tidal gauge identified by a display name and a short PLA code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Site {
    /// Human-readable gauge name, e.g. "Chelsea Bridge"
    pub name: &'static str,
    /// PLA gauge code used in URLs and cache file names, e.g. "0113A"
    pub code: &'static str,
}

/// Static array of all supported tidal gauges
pub static SITES: [Site; 10] = [
    Site {
        name: "Margate",
        code: "0103",
    },
    Site {
        name: "Southend",
        code: "0110",
    },
    Site {
        name: "Coryton",
        code: "0110A",
    },
    Site {
        name: "Tilbury",
        code: "0111",
    },
    Site {
        name: "North Woolwich",
        code: "0112",
    },
    Site {
        name: "London Bridge",
        code: "0113",
    },
    Site {
        name: "Chelsea Bridge",
        code: "0113A",
    },
    Site {
        name: "Richmond",
        code: "0116",
    },
    Site {
        name: "Shivering Sand",
        code: "0116A",
    },
    Site {
        name: "Walton on the Naze",
        code: "0129",
    },
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static Site>> =
    LazyLock::new(|| SITES.iter().map(|site| (site.name, site)).collect());

static BY_CODE: LazyLock<HashMap<&'static str, &'static Site>> =
    LazyLock::new(|| SITES.iter().map(|site| (site.code, site)).collect());

/// Returns all registered sites in registry order
pub fn all_sites() -> &'static [Site] {
    &SITES
}

/// Looks up a site by its display name
///
/// # Returns
/// * `Ok(&Site)` if the name is registered
/// * `Err(TideError::UnknownSite)` naming the offending value otherwise
pub fn site_by_name(name: &str) -> Result<&'static Site, TideError> {
    BY_NAME
        .get(name)
        .copied()
        .ok_or_else(|| TideError::UnknownSite(name.to_string()))
}

/// Looks up a site by its PLA gauge code
pub fn site_by_code(code: &str) -> Result<&'static Site, TideError> {
    BY_CODE
        .get(code)
        .copied()
        .ok_or_else(|| TideError::UnknownSiteCode(code.to_string()))
}
