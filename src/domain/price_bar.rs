use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Whether a bar closed up or down. There is no third state: a flat bar counts as `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandleDirection {
    Up,
    Down,
}

/// One daily OHLC observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        PriceBar {
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// Checks the OHLC ordering invariant.
    pub fn validate(&self) -> Result<(), ChartError> {
        let malformed = |reason: String| ChartError::MalformedBar {
            date: self.date,
            reason,
        };

        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(malformed(format!(
                "prices must be finite and positive (o={} h={} l={} c={})",
                self.open, self.high, self.low, self.close
            )));
        }

        let (body_low, body_high) = self.body_range();
        if self.low > body_low {
            return Err(malformed(format!(
                "low {} above body bottom {}",
                self.low, body_low
            )));
        }
        if body_high > self.high {
            return Err(malformed(format!(
                "high {} below body top {}",
                self.high, body_high
            )));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn direction(&self) -> CandleDirection {
        if self.close >= self.open {
            CandleDirection::Up
        } else {
            CandleDirection::Down
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.direction() {
            CandleDirection::Up => (self.open, self.close),
            CandleDirection::Down => (self.close, self.open),
        }
    }

    /// Horizontal chart coordinate: UNIX seconds at 00:00 UTC of the bar's date.
    pub fn time_coordinate(&self) -> f64 {
        date_to_time(self.date)
    }
}

pub fn date_to_time(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64
}
