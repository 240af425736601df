use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

use quanta_risk::config::PERSISTENCE;
use quanta_risk::data::{AlphaVantageSource, CacheFile, DemoSource, SeriesSource};
use quanta_risk::domain::{Interval, OutputSize, Symbol};

/// Fetch every known pair once and write it to the series cache.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Fill the cache with generated demo series instead of calling the API
    #[arg(long, default_value_t = false)]
    demo: bool,

    #[arg(long, env = "ALPHAVANTAGE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, default_value = PERSISTENCE.cache.directory)]
    cache_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let source: Box<dyn SeriesSource> = if args.demo {
        Box::new(DemoSource::default())
    } else {
        let key = AlphaVantageSource::resolve_api_key(args.api_key.as_deref());
        Box::new(AlphaVantageSource::new(key)?)
    };

    warm_cache(source.as_ref(), &args.cache_dir)
}

fn warm_cache(source: &dyn SeriesSource, dir: &Path) -> Result<()> {
    let interval = Interval::Daily;
    let mut failures = 0;

    for symbol in Symbol::iter() {
        match write_one(source, dir, symbol, interval) {
            Ok((path, bars)) => println!("✅ {} ({} bars) -> {:?}", symbol, bars, path),
            Err(e) => {
                failures += 1;
                eprintln!("⚠️  {}: {:#}", symbol, e);
            }
        }
    }

    if failures > 0 {
        bail!(
            "{} of {} pairs could not be cached from {}",
            failures,
            Symbol::iter().count(),
            source.signature()
        );
    }
    Ok(())
}

fn write_one(
    source: &dyn SeriesSource,
    dir: &Path,
    symbol: Symbol,
    interval: Interval,
) -> Result<(PathBuf, usize)> {
    let series = source
        .fetch_series(symbol, interval, OutputSize::Full)
        .with_context(|| format!("Failed to fetch {} from {}", symbol, source.signature()))?;
    let bars = series.len();

    let path = CacheFile::path_in(dir, symbol, interval);
    CacheFile::new(symbol, interval, series).save_to_path(&path)?;
    Ok((path, bars))
}
