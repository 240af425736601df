use serde::{Deserialize, Serialize};

use crate::domain::price_bar::PriceBar;
use crate::error::ChartError;

/// Bars ordered by strictly increasing date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

/// The bars of a series that passed [`PriceBar::validate`], plus the rejections.
#[derive(Debug, Clone, Default)]
pub struct ValidBars {
    pub bars: Vec<PriceBar>,
    pub rejected: Vec<ChartError>,
}

impl PriceSeries {
    /// Builds a series, refusing bars whose dates do not strictly increase.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, ChartError> {
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].date <= pair[0].date)
        {
            return Err(ChartError::UnorderedSeries { index: index + 1 });
        }
        Ok(Self { bars })
    }

    /// Sorts by date and keeps the last bar seen for a duplicated date.
    /// For sources whose wire format is an unordered map.
    pub fn from_unsorted(mut bars: Vec<PriceBar>) -> Self {
        bars.reverse();
        bars.sort_by_key(|bar| bar.date); // Stable: later duplicates now come first
        bars.dedup_by_key(|bar| bar.date);
        Self { bars }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Splits the series into drawable bars and rejected (malformed) ones,
    /// preserving chronological order of the survivors.
    pub fn valid_bars(&self) -> ValidBars {
        let mut out = ValidBars::default();
        for bar in &self.bars {
            match bar.validate() {
                Ok(()) => out.bars.push(*bar),
                Err(e) => out.rejected.push(e),
            }
        }
        out
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = ChartError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(d: u32, o: f64, h: f64, l: f64, c: f64) -> PriceBar {
        PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), o, h, l, c)
    }

    #[test]
    fn new_rejects_repeated_dates() {
        let bars = vec![bar(1, 1.0, 1.1, 0.9, 1.0), bar(1, 1.0, 1.1, 0.9, 1.0)];
        assert_eq!(
            PriceSeries::new(bars),
            Err(ChartError::UnorderedSeries { index: 1 })
        );
    }

    #[test]
    fn from_unsorted_orders_and_dedups() {
        let series = PriceSeries::from_unsorted(vec![
            bar(3, 1.0, 1.1, 0.9, 1.0),
            bar(1, 1.0, 1.1, 0.9, 1.0),
            bar(2, 1.0, 1.1, 0.9, 1.0),
            bar(1, 2.0, 2.1, 1.9, 2.0),
        ]);
        let days: Vec<u32> = series
            .bars()
            .iter()
            .map(|b| chrono::Datelike::day(&b.date))
            .collect();
        assert_eq!(days, vec![1, 2, 3]);
        assert_eq!(series.bars()[0].open, 2.0, "later duplicate wins");
    }

    #[test]
    fn valid_bars_skips_malformed_and_keeps_order() {
        let series = PriceSeries::new(vec![
            bar(1, 1.10, 1.12, 1.09, 1.11),
            bar(2, 1.10, 1.15, 1.12, 1.14), // low > open
            bar(3, 1.105, 1.106, 1.08, 1.09),
        ])
        .unwrap();

        let valid = series.valid_bars();
        assert_eq!(valid.bars.len(), 2);
        assert_eq!(valid.rejected.len(), 1);
        assert!(valid.bars[0].date < valid.bars[1].date);
    }

    #[test]
    fn deserialization_enforces_ordering() {
        let json = r#"[
            {"date":"2024-01-02","open":1.0,"high":1.1,"low":0.9,"close":1.0},
            {"date":"2024-01-01","open":1.0,"high":1.1,"low":0.9,"close":1.0}
        ]"#;
        assert!(serde_json::from_str::<PriceSeries>(json).is_err());
    }
}
