use anyhow::{Result, anyhow};

use crate::domain::{Interval, OutputSize, PriceSeries, Symbol};

/// Anything that can produce a daily price series for a symbol.
///
/// Calls may block (network, disk); the chart controller only ever calls
/// `fetch_series` from a worker thread.
pub trait SeriesSource: Send + Sync {
    fn fetch_series(
        &self,
        symbol: Symbol,
        interval: Interval,
        output_size: OutputSize,
    ) -> Result<PriceSeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;

    /// `fetch_series`, plus the signature of whichever source actually produced the data.
    fn fetch_series_signed(
        &self,
        symbol: Symbol,
        interval: Interval,
        output_size: OutputSize,
    ) -> Result<(PriceSeries, &'static str)> {
        self.fetch_series(symbol, interval, output_size)
            .map(|series| (series, self.signature()))
    }
}

impl<T: SeriesSource + ?Sized> SeriesSource for Box<T> {
    fn fetch_series(
        &self,
        symbol: Symbol,
        interval: Interval,
        output_size: OutputSize,
    ) -> Result<PriceSeries> {
        (**self).fetch_series(symbol, interval, output_size)
    }

    fn signature(&self) -> &'static str {
        (**self).signature()
    }

    fn fetch_series_signed(
        &self,
        symbol: Symbol,
        interval: Interval,
        output_size: OutputSize,
    ) -> Result<(PriceSeries, &'static str)> {
        (**self).fetch_series_signed(symbol, interval, output_size)
    }
}

/// Tries each source in order and returns the first success.
pub struct FallbackSource {
    sources: Vec<Box<dyn SeriesSource>>,
}

impl FallbackSource {
    pub fn new(sources: Vec<Box<dyn SeriesSource>>) -> Self {
        Self { sources }
    }

    pub fn signatures(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.signature()).collect()
    }
}

impl SeriesSource for FallbackSource {
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
        for source in &self.sources {
            match source.fetch_series_signed(symbol, interval, output_size) {
                Ok((series, signature)) => {
                    log::info!(
                        "Fetched {} bars for {} from {}",
                        series.len(),
                        symbol,
                        signature
                    );
                    return Ok((series, signature));
                }
                Err(e) => {
                    log::info!("{} failed for {}: {:#}", source.signature(), symbol, e);
                    // Continue to the next source
                }
            }
        }
        Err(anyhow!("All series sources failed for {}", symbol))
    }

    fn signature(&self) -> &'static str {
        "Fallback chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceBar;
    use chrono::NaiveDate;

    struct Failing;
    impl SeriesSource for Failing {
        fn fetch_series(&self, _: Symbol, _: Interval, _: OutputSize) -> Result<PriceSeries> {
            Err(anyhow!("offline"))
        }
        fn signature(&self) -> &'static str {
            "failing"
        }
    }

    struct Fixed(f64);
    impl SeriesSource for Fixed {
        fn fetch_series(&self, _: Symbol, _: Interval, _: OutputSize) -> Result<PriceSeries> {
            let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            Ok(PriceSeries::new(vec![PriceBar::new(date, self.0, self.0, self.0, self.0)])?)
        }
        fn signature(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn first_successful_source_wins() {
        let chain = FallbackSource::new(vec![
            Box::new(Failing),
            Box::new(Fixed(1.0)),
            Box::new(Fixed(2.0)),
        ]);
        let (series, signature) = chain
            .fetch_series_signed(Symbol::EurUsd, Interval::Daily, OutputSize::Full)
            .unwrap();
        assert_eq!(series.bars()[0].close, 1.0);
        assert_eq!(signature, "fixed");
        assert_eq!(chain.signatures(), vec!["failing", "fixed", "fixed"]);
    }

    #[test]
    fn all_failing_is_an_error() {
        let chain = FallbackSource::new(vec![Box::new(Failing)]);
        assert!(
            chain
                .fetch_series(Symbol::EurJpy, Interval::Daily, OutputSize::Compact)
                .is_err()
        );
    }
}
