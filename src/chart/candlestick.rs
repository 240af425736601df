use crate::chart::primitives::{CandlestickPrimitive, Primitive};
use crate::chart::surface::ChartSurface;
use crate::config::PLOT_CONFIG;
use crate::domain::{PriceBar, PriceSeries};
use crate::error::ChartError;

/// Candle geometry for one series, ready to be swapped into a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CandlestickLayer {
    pub candles: Vec<CandlestickPrimitive>,
    /// Bars skipped because they broke the OHLC ordering
    pub rejected: usize,
}

impl CandlestickLayer {
    pub fn into_primitives(self) -> Vec<Primitive> {
        self.candles.into_iter().map(Primitive::Candle).collect()
    }
}

/// Turns a price series into wick + body geometry.
#[derive(Debug, Clone, Copy)]
pub struct CandlestickRenderer {
    body_width_fraction: f64,
    single_bar_spacing_secs: f64,
}

impl Default for CandlestickRenderer {
    fn default() -> Self {
        Self {
            body_width_fraction: PLOT_CONFIG.body_width_fraction,
            single_bar_spacing_secs: PLOT_CONFIG.single_bar_spacing_secs,
        }
    }
}

impl CandlestickRenderer {
    /// `body_width_fraction` is the share of the bar spacing a body covers, in `(0, 1]`.
    /// `single_bar_spacing_secs` stands in for the spacing when a series has one bar.
    pub fn new(body_width_fraction: f64, single_bar_spacing_secs: f64) -> Result<Self, ChartError> {
        if !(body_width_fraction > 0.0 && body_width_fraction <= 1.0) {
            return Err(ChartError::InvalidConfig(format!(
                "candle body width must be a fraction in (0, 1], got {}",
                body_width_fraction
            )));
        }
        if !(single_bar_spacing_secs.is_finite() && single_bar_spacing_secs > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "single bar spacing must be a positive number of seconds, got {}",
                single_bar_spacing_secs
            )));
        }
        Ok(Self {
            body_width_fraction,
            single_bar_spacing_secs,
        })
    }

    /// Computes one candle per valid bar. Malformed bars are skipped and logged.
    /// An empty series, or one with no valid bars, is an error and produces nothing.
    pub fn build(&self, series: &PriceSeries) -> Result<CandlestickLayer, ChartError> {
        if series.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        let valid = series.valid_bars();
        for rejection in &valid.rejected {
            log::warn!("Skipping bar: {}", rejection);
        }
        if valid.bars.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        let spacing = average_spacing(&valid.bars).unwrap_or(self.single_bar_spacing_secs);
        let half_width = self.body_width_fraction * spacing / 2.0;

        let candles = valid
            .bars
            .iter()
            .map(|bar| {
                let (body_bottom, body_top) = bar.body_range();
                CandlestickPrimitive {
                    date: bar.date,
                    x: bar.time_coordinate(),
                    half_width,
                    wick_low: bar.low,
                    wick_high: bar.high,
                    body_bottom,
                    body_top,
                    direction: bar.direction(),
                }
            })
            .collect();

        Ok(CandlestickLayer {
            candles,
            rejected: valid.rejected.len(),
        })
    }

    /// Builds the layer and replaces the surface's data with it.
    /// On error the surface is left as it was.
    pub fn render(
        &self,
        series: &PriceSeries,
        surface: &mut impl ChartSurface,
    ) -> Result<CandlestickLayer, ChartError> {
        let layer = self.build(series)?;
        surface.replace_primitives(layer.clone().into_primitives());
        Ok(layer)
    }
}

/// Mean distance between consecutive bar times; None for fewer than two bars.
fn average_spacing(bars: &[PriceBar]) -> Option<f64> {
    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) if bars.len() > 1 => {
            Some((last.time_coordinate() - first.time_coordinate()) / (bars.len() - 1) as f64)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::axis_link::AxisLinkState;
    use crate::chart::surface::PlotSurface;
    use crate::domain::CandleDirection;
    use chrono::NaiveDate;

    fn bar(d: u32, o: f64, h: f64, l: f64, c: f64) -> PriceBar {
        PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), o, h, l, c)
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn colours_follow_close_versus_open() {
        let series = PriceSeries::new(vec![
            bar(1, 1.10, 1.12, 1.09, 1.11),
            bar(2, 1.11, 1.13, 1.10, 1.105),
            bar(3, 1.105, 1.106, 1.08, 1.09),
        ])
        .unwrap();

        let layer = CandlestickRenderer::default().build(&series).unwrap();
        let directions: Vec<CandleDirection> =
            layer.candles.iter().map(|c| c.direction).collect();
        assert_eq!(
            directions,
            vec![CandleDirection::Up, CandleDirection::Down, CandleDirection::Down]
        );
    }

    #[test]
    fn body_width_is_a_fraction_of_average_spacing() {
        // Days 1, 2 and 5: average spacing is 2 days
        let series = PriceSeries::new(vec![
            bar(1, 1.0, 1.2, 0.9, 1.1),
            bar(2, 1.1, 1.2, 1.0, 1.05),
            bar(5, 1.05, 1.3, 1.0, 1.2),
        ])
        .unwrap();
        let layer = CandlestickRenderer::new(0.7, 86_400.0)
            .unwrap()
            .build(&series).unwrap();
        let expected_half = 0.7 * 2.0 * 86_400.0 / 2.0;
        assert!(layer.candles.iter().all(|c| approx_eq(c.half_width, expected_half)));
    }

    #[test]
    fn bad_geometry_settings_are_rejected() {
        for (fraction, spacing) in [
            (0.0, 86_400.0),
            (-0.3, 86_400.0),
            (1.5, 86_400.0),
            (f64::NAN, 86_400.0),
            (0.7, 0.0),
            (0.7, f64::INFINITY),
        ] {
            assert!(matches!(
                CandlestickRenderer::new(fraction, spacing),
                Err(ChartError::InvalidConfig(_))
            ));
        }
        assert!(CandlestickRenderer::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn single_bar_uses_default_spacing() {
        let series = PriceSeries::new(vec![bar(1, 1.0, 1.2, 0.9, 1.1)]).unwrap();
        let layer = CandlestickRenderer::new(0.5, 1_000.0)
            .unwrap()
            .build(&series).unwrap();
        assert_eq!(layer.candles.len(), 1);
        assert!(approx_eq(layer.candles[0].half_width, 250.0));
        let c = layer.candles[0];
        assert_eq!((c.body_bottom, c.body_top), (1.0, 1.1));
        assert_eq!((c.wick_low, c.wick_high), (0.9, 1.2));
    }

    #[test]
    fn malformed_bar_is_excluded_and_neighbours_stay_in_order() {
        let series = PriceSeries::new(vec![
            bar(1, 1.10, 1.12, 1.09, 1.11),
            bar(2, 1.10, 1.15, 1.12, 1.14), // low > open
            bar(3, 1.105, 1.106, 1.08, 1.09),
        ])
        .unwrap();
        let layer = CandlestickRenderer::default().build(&series).unwrap();
        assert_eq!(layer.candles.len(), 2);
        assert_eq!(layer.rejected, 1);
        assert!(layer.candles[0].x < layer.candles[1].x);
        assert_eq!(layer.candles[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn empty_series_leaves_surface_untouched() {
        let link = AxisLinkState::new_shared();
        let mut surface = PlotSurface::new("price", &link);
        let renderer = CandlestickRenderer::default();

        let series = PriceSeries::new(vec![bar(1, 1.0, 1.2, 0.9, 1.1)]).unwrap();
        renderer.render(&series, &mut surface).unwrap();
        assert_eq!(surface.primitives().len(), 1);

        assert_eq!(
            renderer.render(&PriceSeries::empty(), &mut surface),
            Err(ChartError::EmptySeries)
        );
        assert_eq!(surface.primitives().len(), 1);
    }

    #[test]
    fn all_malformed_counts_as_empty() {
        let series = PriceSeries::new(vec![bar(1, 1.0, 0.5, 0.9, 1.1)]).unwrap();
        assert_eq!(
            CandlestickRenderer::default().build(&series),
            Err(ChartError::EmptySeries)
        );
    }
}
