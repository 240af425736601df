#![allow(clippy::type_complexity)]

// Core modules
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod ui;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

// Re-export commonly used types
pub use chart::{ChartController, LinkedChartPane, PlotOutcome, VolatilityRenderer};
pub use data::{AlphaVantageSource, CachedSource, DemoSource, FallbackSource, SeriesSource};
pub use domain::{ChartCommand, PriceBar, PriceSeries, Symbol};
pub use error::ChartError;
pub use ui::DashboardApp;
pub use utils::app_time;

use crate::config::PERSISTENCE;
use crate::domain::OutputSize;
use crate::ui::StartupOptions;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Plot generated demo data instead of calling Alpha Vantage
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Call the API even when a fresh cache file exists
    #[arg(long, default_value_t = false)]
    pub prefer_api: bool,

    /// Alpha Vantage API key (the public "demo" key is used when absent)
    #[arg(long, env = "ALPHAVANTAGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Number of daily returns in each volatility sample (overrides the stored setting)
    #[arg(long)]
    pub volatility_window: Option<usize>,

    /// Pair to plot on startup
    #[arg(long, value_enum)]
    pub symbol: Option<Symbol>,

    /// Where fetched series are cached
    #[arg(long, default_value = PERSISTENCE.cache.directory)]
    pub cache_dir: PathBuf,

    /// Request only the most recent 100 bars
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

impl Cli {
    /// Rejects settings that would only fail later, inside the UI.
    pub fn validate(&self) -> Result<(), ChartError> {
        if let Some(window) = self.volatility_window {
            VolatilityRenderer::new(window)?;
        }
        Ok(())
    }

    pub fn output_size(&self) -> OutputSize {
        if self.compact {
            OutputSize::Compact
        } else {
            OutputSize::Full
        }
    }

    pub fn startup_options(&self) -> StartupOptions {
        StartupOptions {
            symbol: self.symbol,
            volatility_window: self.volatility_window,
        }
    }
}

/// The series source chain for these arguments.
///
/// `--demo` plots generated data and nothing else. Live mode reads Alpha Vantage
/// through the on-disk cache, which also covers API outages with stale data.
/// When both fail the plot is reported unavailable and the chart keeps what it had.
pub fn build_source(args: &Cli) -> Result<Arc<dyn SeriesSource>> {
    if args.demo {
        return Ok(Arc::new(DemoSource::default()));
    }

    let api_key = AlphaVantageSource::resolve_api_key(args.api_key.as_deref());
    let api = AlphaVantageSource::new(api_key)?;
    Ok(live_source(api, args))
}

/// Wraps a remote source with the cache configured by `args`.
pub fn live_source<S: SeriesSource + 'static>(api: S, args: &Cli) -> Arc<dyn SeriesSource> {
    Arc::new(CachedSource::new(api, &args.cache_dir).prefer_api(args.prefer_api))
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    source: Arc<dyn SeriesSource>,
    args: &Cli,
) -> Box<dyn eframe::App> {
    let controller = ChartController::new(source, VolatilityRenderer::default())
        .with_output_size(args.output_size());

    Box::new(DashboardApp::new(cc, controller, args.startup_options()))
}
