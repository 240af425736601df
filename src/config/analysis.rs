//! Volatility computation configuration

/// Settings for the rolling volatility series shown in the lower pane.
#[derive(Debug, Clone, Copy)]
pub struct VolatilityConfig {
    /// Number of trailing log returns per volatility sample.
    /// Must be at least 2: a sample standard deviation needs two observations.
    pub window: usize,
    /// Multiplier applied to each sample. 1.0 keeps the raw periodic (daily) figure,
    /// 252.0_f64.sqrt() would annualise a daily series.
    pub annualisation: f64,
    /// Smallest window the CLI will accept.
    pub min_window: usize,
    /// Largest window the CLI will accept.
    pub max_window: usize,
}

pub const VOLATILITY: VolatilityConfig = VolatilityConfig {
    window: 20, // One trading month of daily bars
    annualisation: 1.0,
    min_window: 2,
    max_window: 250,
};
