use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::{DEBUG_FLAGS, PERSISTENCE, series_cache_filename};
use crate::data::source::SeriesSource;
use crate::domain::{Interval, OutputSize, PriceSeries, Symbol};
use crate::utils::time_utils::{how_many_seconds_ago, local_now_as_timestamp_ms};

/// Serialized series for one symbol and interval.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheFile {
    pub version: f64,
    pub timestamp_ms: i64,
    pub symbol: Symbol,
    pub interval: Interval,
    pub series: PriceSeries,
}

impl CacheFile {
    pub fn new(symbol: Symbol, interval: Interval, series: PriceSeries) -> Self {
        Self {
            version: PERSISTENCE.cache.version,
            timestamp_ms: local_now_as_timestamp_ms(),
            symbol,
            interval,
            series,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open cache file: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let cache: Self = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize cache: {:?}", path))?;
        if cache.version != PERSISTENCE.cache.version {
            bail!(
                "Cache version {} does not match {} in {:?}",
                cache.version,
                PERSISTENCE.cache.version,
                path
            );
        }
        Ok(cache)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize cache to: {}", path.display()))
    }

    pub fn age_secs(&self) -> i64 {
        how_many_seconds_ago(self.timestamp_ms)
    }

    pub fn is_fresh(&self, max_age_secs: i64) -> bool {
        self.age_secs() <= max_age_secs
    }

    pub fn path_in(dir: &Path, symbol: Symbol, interval: Interval) -> PathBuf {
        dir.join(series_cache_filename(symbol, interval))
    }
}

/// Wraps another source with an on-disk cache.
///
/// A fresh cache file is served without touching `inner` (unless `prefer_api`).
/// Successful fetches are written back. If `inner` fails, any cache file for the
/// symbol is used regardless of age.
pub struct CachedSource<S> {
    inner: S,
    dir: PathBuf,
    max_age_secs: i64,
    prefer_api: bool,
}

impl<S: SeriesSource> CachedSource<S> {
    pub const CACHE_SIGNATURE: &'static str = "Local series cache";

    pub fn new(inner: S, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
            max_age_secs: PERSISTENCE.cache.max_age_secs,
            prefer_api: false,
        }
    }

    pub fn with_max_age_secs(mut self, secs: i64) -> Self {
        self.max_age_secs = secs;
        self
    }

    pub fn prefer_api(mut self, prefer: bool) -> Self {
        self.prefer_api = prefer;
        self
    }

    fn read(&self, path: &Path) -> Option<CacheFile> {
        CacheFile::load_from_path(path)
            .inspect_err(|e| {
                if DEBUG_FLAGS.print_cache_events {
                    log::info!("Cache miss: {:#}", e);
                }
            })
            .ok()
    }
}

impl<S: SeriesSource> SeriesSource for CachedSource<S> {
    fn fetch_series(
        &self,
        symbol: Symbol,
        interval: Interval,
        output_size: OutputSize,
    ) -> Result<PriceSeries> {
        self.fetch_series_signed(symbol, interval, output_size)
            .map(|(series, _)| series)
    }

    fn fetch_series_signed(
        &self,
        symbol: Symbol,
        interval: Interval,
        output_size: OutputSize,
    ) -> Result<(PriceSeries, &'static str)> {
        let path = CacheFile::path_in(&self.dir, symbol, interval);
        let cached = self.read(&path);

        if !self.prefer_api
            && let Some(cache) = cached.as_ref().filter(|c| c.is_fresh(self.max_age_secs))
        {
            log::info!(
                "Using cached {} ({} bars, {}s old)",
                symbol,
                cache.series.len(),
                cache.age_secs()
            );
            return Ok((cache.series.clone(), Self::CACHE_SIGNATURE));
        }

        match self.inner.fetch_series_signed(symbol, interval, output_size) {
            Ok((series, signature)) => {
                if let Err(e) = CacheFile::new(symbol, interval, series.clone()).save_to_path(&path)
                {
                    log::warn!("Could not write cache for {}: {:#}", symbol, e);
                }
                Ok((series, signature))
            }
            Err(e) => match cached {
                Some(stale) => {
                    log::warn!(
                        "{} failed for {} ({:#}); using cache from {}s ago",
                        self.inner.signature(),
                        symbol,
                        e,
                        stale.age_secs()
                    );
                    Ok((stale.series, Self::CACHE_SIGNATURE))
                }
                None => Err(e),
            },
        }
    }

    fn signature(&self) -> &'static str {
        self.inner.signature()
    }
}
