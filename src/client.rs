//! Fetch-then-interpolate pipeline for one tidal gauge

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::data::{interpolate, CalendarQuarter, EdgePolicy, PlaClient, Site, TideEntry};
use crate::error::TideError;

/// Answers tidal height queries for a site, filling the cache as needed
#[derive(Debug)]
pub struct TideClient {
    site: &'static Site,
    cache: CacheStore,
    remote: PlaClient,
    edge: EdgePolicy,
}

impl TideClient {
    pub fn new(site: &'static Site, cache: CacheStore, remote: PlaClient) -> Self {
        Self {
            site,
            cache,
            remote,
            edge: EdgePolicy::default(),
        }
    }

    /// Set the policy for queries outside the known entries
    pub fn with_edge_policy(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    pub fn site(&self) -> &'static Site {
        self.site
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Interpolated height for each distinct query time
    pub async fn heights_at(
        &mut self,
        times: &[NaiveDateTime],
    ) -> Result<BTreeMap<NaiveDateTime, f64>, TideError> {
        let quarters = required_quarters(times);
        info!(
            site = self.site.name,
            queries = times.len(),
            quarters = quarters.len(),
            "resolving tidal heights"
        );

        let fetched = self
            .cache
            .fetch_missing(self.site, &quarters, &self.remote)
            .await?;
        debug!(fetched, "cache filled");

        let entries = self.load_entries(&quarters)?;
        interpolate(&entries, times, self.edge)
    }

    /// Loads and concatenates the entries of every quarter
    ///
    /// A quarter that is not cached, or that holds no entries, is an error.
    pub fn load_entries(&self, quarters: &[CalendarQuarter]) -> Result<Vec<TideEntry>, TideError> {
        let mut entries = Vec::new();
        for &quarter in quarters {
            let package = self
                .cache
                .get(self.site, quarter)?
                .ok_or(TideError::MissingQuarter(quarter))?;
            let parsed = package.parse()?;
            if parsed.is_empty() {
                return Err(TideError::MissingQuarter(quarter));
            }
            debug!(%quarter, entries = parsed.len(), "loaded quarter");
            entries.extend(parsed);
        }
        Ok(entries)
    }
}

/// Distinct quarters covering `times`, in first-seen order
pub fn required_quarters(times: &[NaiveDateTime]) -> Vec<CalendarQuarter> {
    let mut quarters: Vec<CalendarQuarter> = Vec::new();
    for time in times {
        let quarter = CalendarQuarter::from_date(*time);
        if !quarters.contains(&quarter) {
            quarters.push(quarter);
        }
    }
    quarters
}
