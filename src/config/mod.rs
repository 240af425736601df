//! Configuration module for the dashboard.

pub mod analysis;
pub mod data;

mod debug; // Private: callers go through crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use analysis::{VOLATILITY, VolatilityConfig};
pub use data::{ALPHA_VANTAGE, AlphaVantageConfig};
pub use persistence::{APP_STATE_PATH, CACHE_VERSION, PERSISTENCE, series_cache_filename};
pub use plot::PLOT_CONFIG;
