use chrono::NaiveDate;
use std::fmt;

/// Error types for charting operations
///
/// Everything except [`ChartError::InvalidAxisRange`] and [`ChartError::InvalidConfig`]
/// is recovered locally: the chart keeps whatever it showed before.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Retrieval failed or returned nothing usable
    DataUnavailable(String),
    /// A bar breaks `low <= min(open, close) <= max(open, close) <= high`
    MalformedBar { date: NaiveDate, reason: String },
    /// Fewer bars than the volatility window needs
    InsufficientHistory { available: usize, window: usize },
    /// Zero (valid) bars to draw
    EmptySeries,
    /// Dates are not strictly increasing at `index`
    UnorderedSeries { index: usize },
    /// The plotting boundary was handed an unusable time range
    InvalidAxisRange { min: f64, max: f64 },
    /// Startup configuration is unusable
    InvalidConfig(String),
}

impl ChartError {
    /// Errors that must stop the dashboard rather than be absorbed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ChartError::InvalidAxisRange { .. } | ChartError::InvalidConfig(_)
        )
    }
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::DataUnavailable(msg) => write!(f, "No data available: {}", msg),
            ChartError::MalformedBar { date, reason } => {
                write!(f, "Malformed bar on {}: {}", date, reason)
            }
            ChartError::InsufficientHistory { available, window } => write!(
                f,
                "Insufficient history: {} bars available, volatility window needs more than {}",
                available, window
            ),
            ChartError::EmptySeries => write!(f, "Price series is empty"),
            ChartError::UnorderedSeries { index } => {
                write!(f, "Bar dates are not strictly increasing at index {}", index)
            }
            ChartError::InvalidAxisRange { min, max } => {
                write!(f, "Invalid time axis range [{}, {}]", min, max)
            }
            ChartError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_boundary_errors_are_fatal() {
        assert!(ChartError::InvalidAxisRange { min: 1.0, max: 0.0 }.is_fatal());
        assert!(ChartError::InvalidConfig("window".into()).is_fatal());
        assert!(!ChartError::EmptySeries.is_fatal());
        assert!(!ChartError::DataUnavailable("offline".into()).is_fatal());
    }
}
