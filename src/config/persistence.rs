//! File persistence and serialization configuration

use crate::domain::{Interval, Symbol};

pub struct CacheConfig {
    /// Directory path for storing fetched series
    pub directory: &'static str,
    /// Base filename for series cache files (without extension)
    pub filename_prefix: &'static str,
    /// Version of the cache serialization format
    pub version: f64,
    /// A cache file older than this is ignored when reading
    pub max_age_secs: i64,
}

pub struct PersistenceConfig {
    pub cache: CacheConfig,
}

/// Current version of the series cache format
pub const CACHE_VERSION: f64 = 1.0;

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    cache: CacheConfig {
        directory: "series_cache",
        filename_prefix: "series",
        version: CACHE_VERSION,
        max_age_secs: 60 * 60 * 12, // Daily bars: twice a day is plenty
    },
};

/// Generate symbol and interval specific cache filename
/// Example: "series_EURUSD_daily_v1.bin"
pub fn series_cache_filename(symbol: Symbol, interval: Interval) -> String {
    format!(
        "{}_{}_{}_v{}.bin",
        PERSISTENCE.cache.filename_prefix,
        symbol.code(),
        interval.as_str(),
        PERSISTENCE.cache.version
    )
}

// App state persistence
/// Path for saving/loading application UI state
pub const APP_STATE_PATH: &str = ".states.json";
