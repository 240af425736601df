// Series sources and the on-disk cache
pub mod alpha_vantage;
pub mod cache_file;
pub mod demo;
pub mod source;

// Re-export commonly used types
pub use alpha_vantage::AlphaVantageSource;
pub use cache_file::{CacheFile, CachedSource};
pub use demo::DemoSource;
pub use source::{FallbackSource, SeriesSource};
