//! Quarter-keyed cache of PLA payloads on disk
//!
//! Each cached quarter is stored verbatim as `<siteCode>_<year>_Q<n>.json`
//! in the cache directory. The in-memory index is rebuilt from a directory
//! scan on construction, so it survives across runs. Entries never expire.

use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::CacheKey;
use crate::data::{CalendarQuarter, DataPackage, PlaClient, Site};
use crate::error::TideError;

/// Manages cached quarters of tide data
///
/// The index is not synchronised: one store per process, used from one
/// task at a time.
#[derive(Debug)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
    /// Keys of files known to be in the cache
    index: HashSet<CacheKey>,
}

impl CacheStore {
    /// Opens the cache at `cache_dir`, creating the directory if missing
    ///
    /// Files whose names do not match the cache naming scheme are ignored.
    pub fn open(cache_dir: impl Into<PathBuf>) -> Result<Self, TideError> {
        let cache_dir = cache_dir.into();
        let mut index = HashSet::new();

        if cache_dir.exists() {
            for entry in fs::read_dir(&cache_dir)? {
                let entry = entry?;
                let name = entry.file_name();
                match name.to_str().and_then(CacheKey::from_file_name) {
                    Some(key) => {
                        index.insert(key);
                    }
                    None => {
                        debug!(file = ?name, "ignoring non-cache file");
                    }
                }
            }
            debug!(dir = %cache_dir.display(), entries = index.len(), "loaded cache index");
        } else {
            fs::create_dir_all(&cache_dir)?;
            info!(dir = %cache_dir.display(), "created cache directory");
        }

        Ok(Self { cache_dir, index })
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Number of indexed quarters
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }

    /// Checks whether a quarter is cached
    ///
    /// # Returns
    /// * `Ok(false)` if the quarter is not indexed
    /// * `Ok(true)` if it is indexed and its file exists
    /// * `Err(TideError::CacheCorruption)` if it is indexed but the file is gone
    pub fn exists(&self, site: &Site, quarter: CalendarQuarter) -> Result<bool, TideError> {
        let key = CacheKey::new(site, quarter);
        if !self.index.contains(&key) {
            return Ok(false);
        }
        let path = self.path_for(&key);
        if path.exists() {
            Ok(true)
        } else {
            Err(TideError::CacheCorruption(path))
        }
    }

    /// Reads a cached quarter
    ///
    /// Returns `Ok(None)` on a cache miss. Content that no longer validates
    /// fails with `TideError::Schema`.
    pub fn get(
        &self,
        site: &Site,
        quarter: CalendarQuarter,
    ) -> Result<Option<DataPackage>, TideError> {
        let key = CacheKey::new(site, quarter);
        if !self.index.contains(&key) {
            return Ok(None);
        }
        let path = self.path_for(&key);
        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TideError::CacheCorruption(path.clone()),
            _ => TideError::Io(e),
        })?;
        DataPackage::new(raw).map(Some)
    }

    /// Validates and stores a raw payload for a quarter
    ///
    /// Nothing is written unless `raw` builds a valid `DataPackage`. The
    /// payload goes to a `.tmp` sibling first and is renamed into place, so
    /// an interrupted write never leaves a truncated cache file.
    pub fn put(
        &mut self,
        site: &Site,
        quarter: CalendarQuarter,
        raw: &str,
    ) -> Result<(), TideError> {
        DataPackage::new(raw)?;

        let key = CacheKey::new(site, quarter);
        let path = self.path_for(&key);
        let tmp = path.with_extension("json.tmp");
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(&tmp, raw)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(file = %path.display(), "cached quarter");
        self.index.insert(key);
        Ok(())
    }

    /// Fetches and stores every requested quarter that is not cached yet
    ///
    /// Quarters are fetched one at a time in the given order. The first
    /// failure aborts the remaining fetches.
    ///
    /// # Returns
    /// The number of quarters fetched
    pub async fn fetch_missing(
        &mut self,
        site: &Site,
        quarters: &[CalendarQuarter],
        client: &PlaClient,
    ) -> Result<usize, TideError> {
        let mut fetched = 0;
        for &quarter in quarters {
            if self.exists(site, quarter)? {
                debug!(site = site.name, %quarter, "cache hit");
                continue;
            }
            let raw = client.fetch_quarter(site, quarter).await?;
            self.put(site, quarter, &raw)?;
            fetched += 1;
        }
        Ok(fetched)
    }

    /// Interactively deletes the cache, prompting on stdin
    pub fn wipe(&mut self) -> Result<bool, TideError> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.wipe_with_prompt(&mut stdin.lock(), &mut stdout.lock())
    }

    /// Deletes every indexed file and the cache directory after confirmation
    ///
    /// Only `y` or `yes` (any case) proceeds; any other answer leaves the
    /// cache untouched. Files not created by the cache are left in place, in
    /// which case removing the directory fails.
    ///
    /// # Returns
    /// `Ok(true)` if the cache was deleted, `Ok(false)` if declined
    pub fn wipe_with_prompt<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<bool, TideError> {
        write!(
            output,
            "Are you sure you want to delete the cache at {}? (y/n) ",
            self.cache_dir.display()
        )?;
        output.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        if answer != "y" && answer != "yes" {
            info!("cache wipe declined");
            return Ok(false);
        }

        for key in self.index.drain() {
            let path = self.cache_dir.join(key.file_name());
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(file = %path.display(), "cache file already missing");
                }
                Err(e) => return Err(e.into()),
            }
        }
        if self.cache_dir.exists() {
            fs::remove_dir(&self.cache_dir)?;
        }
        info!(dir = %self.cache_dir.display(), "cache wiped");
        Ok(true)
    }
}
