use crate::chart::primitives::{Primitive, VolatilityCurve, VolatilityPoint};
use crate::chart::surface::ChartSurface;
use crate::config::VOLATILITY;
use crate::domain::PriceSeries;
use crate::error::ChartError;
use crate::utils::maths_utils;

/// The volatility curve for one series, plus why it may be short.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityLayer {
    pub curve: VolatilityCurve,
    /// Set when there were not enough valid bars for a single window
    pub insufficient_history: Option<ChartError>,
    pub rejected: usize,
}

impl VolatilityLayer {
    pub fn into_primitives(self) -> Vec<Primitive> {
        vec![Primitive::Volatility(self.curve)]
    }
}

/// Rolling sample standard deviation of daily log returns.
///
/// The sample at valid bar `i` (for `i >= window`) covers the `window` returns ending
/// at bar `i`, so the first sample lands on bar `window + 1` (1-based) and a series of
/// `n` valid bars yields `n - window` samples. Earlier bars get no sample at all.
#[derive(Debug, Clone, Copy)]
pub struct VolatilityRenderer {
    window: usize,
    annualisation: f64,
}

impl Default for VolatilityRenderer {
    fn default() -> Self {
        Self {
            window: VOLATILITY.window,
            annualisation: VOLATILITY.annualisation,
        }
    }
}

impl VolatilityRenderer {
    pub fn new(window: usize) -> Result<Self, ChartError> {
        if window < VOLATILITY.min_window || window > VOLATILITY.max_window {
            return Err(ChartError::InvalidConfig(format!(
                "volatility window must be between {} and {}, got {}",
                VOLATILITY.min_window, VOLATILITY.max_window, window
            )));
        }
        Ok(Self {
            window,
            annualisation: VOLATILITY.annualisation,
        })
    }

    pub fn with_annualisation(mut self, factor: f64) -> Self {
        self.annualisation = factor;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Computes the curve over the valid bars of `series`, in date order.
    pub fn build(&self, series: &PriceSeries) -> Result<VolatilityLayer, ChartError> {
        if series.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        let valid = series.valid_bars();
        if valid.bars.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        if valid.bars.len() <= self.window {
            return Ok(VolatilityLayer {
                curve: VolatilityCurve {
                    window: self.window,
                    points: Vec::new(),
                },
                insufficient_history: Some(ChartError::InsufficientHistory {
                    available: valid.bars.len(),
                    window: self.window,
                }),
                rejected: valid.rejected.len(),
            });
        }

        let closes: Vec<f64> = valid.bars.iter().map(|bar| bar.close).collect();
        let returns = maths_utils::log_returns(&closes);
        let samples = maths_utils::rolling_sample_std_dev(&returns, self.window);

        // Sample j covers returns[j..j + window], i.e. it is dated at bar j + window
        let points = samples
            .iter()
            .zip(valid.bars.iter().skip(self.window))
            .map(|(&sigma, bar)| VolatilityPoint {
                date: bar.date,
                x: bar.time_coordinate(),
                volatility: sigma * self.annualisation,
            })
            .collect();

        Ok(VolatilityLayer {
            curve: VolatilityCurve {
                window: self.window,
                points,
            },
            insufficient_history: None,
            rejected: valid.rejected.len(),
        })
    }

    /// Builds the curve and replaces the surface's data with it.
    /// Insufficient history replaces the curve with an empty one.
    pub fn render(
        &self,
        series: &PriceSeries,
        surface: &mut impl ChartSurface,
    ) -> Result<VolatilityLayer, ChartError> {
        let layer = self.build(series)?;
        if let Some(reason) = &layer.insufficient_history {
            log::info!("{}", reason);
        }
        surface.replace_primitives(layer.clone().into_primitives());
        Ok(layer)
    }
}
