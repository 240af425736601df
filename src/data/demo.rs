use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::source::SeriesSource;
use crate::domain::{Interval, OutputSize, PriceBar, PriceSeries, Symbol};

/// Offline source: a reproducible random walk per symbol, weekdays only.
pub struct DemoSource {
    end: NaiveDate,
    bars: usize,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new(Utc::now().date_naive(), 500)
    }
}

impl DemoSource {
    pub const DAILY_STEP: f64 = 0.006;

    pub fn new(end: NaiveDate, bars: usize) -> Self {
        Self { end, bars }
    }

    fn start_price(symbol: Symbol) -> f64 {
        match symbol {
            Symbol::EurUsd => 1.08,
            Symbol::GbpJpy => 185.0,
            Symbol::EurJpy => 160.0,
        }
    }

    fn seed(symbol: Symbol) -> u64 {
        symbol
            .code()
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |acc, b| {
                (acc ^ b as u64).wrapping_mul(0x100_0000_01b3)
            })
    }

    /// The `count` most recent weekdays up to and including `end`, oldest first.
    fn trading_days(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = std::iter::successors(Some(end), NaiveDate::pred_opt)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .take(count)
            .collect();
        days.reverse();
        days
    }

    pub fn generate(&self, symbol: Symbol, count: usize) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(Self::seed(symbol));
        let mut close = Self::start_price(symbol);

        let bars = Self::trading_days(self.end, count)
            .into_iter()
            .map(|date| {
                let open = close * (1.0 + rng.random_range(-0.001..0.001));
                close = open * (1.0 + rng.random_range(-Self::DAILY_STEP..Self::DAILY_STEP));
                let high = open.max(close) * (1.0 + rng.random_range(0.0..0.003));
                let low = open.min(close) * (1.0 - rng.random_range(0.0..0.003));
                PriceBar::new(date, open, high, low, close)
            })
            .collect();

        PriceSeries::from_unsorted(bars)
    }
}

impl SeriesSource for DemoSource {
    fn fetch_series(
        &self,
        symbol: Symbol,
        _interval: Interval,
        output_size: OutputSize,
    ) -> Result<PriceSeries> {
        let count = output_size
            .max_bars()
            .map_or(self.bars, |max| max.min(self.bars));
        Ok(self.generate(symbol, count))
    }

    fn signature(&self) -> &'static str {
        "Demo random walk"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> DemoSource {
        DemoSource::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 60)
    }

    #[test]
    fn same_symbol_same_walk() {
        let a = source()
            .fetch_series(Symbol::EurUsd, Interval::Daily, OutputSize::Full)
            .unwrap();
        let b = source()
            .fetch_series(Symbol::EurUsd, Interval::Daily, OutputSize::Full)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 60);

        let other = source()
            .fetch_series(Symbol::GbpJpy, Interval::Daily, OutputSize::Full)
            .unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn bars_are_valid_weekdays_ending_at_end_date() {
        let series = source().generate(Symbol::EurJpy, 30);
        assert!(series.bars().iter().all(|b| b.is_valid()));
        assert!(
            series
                .bars()
                .iter()
                .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun))
        );
        assert_eq!(
            series.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(series.valid_bars().rejected.is_empty());
    }

    #[test]
    fn compact_caps_the_history() {
        let series = DemoSource::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 400)
            .fetch_series(Symbol::EurUsd, Interval::Daily, OutputSize::Compact)
            .unwrap();
        assert_eq!(series.len(), 100);
    }
}
