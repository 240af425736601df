use serde::{Deserialize, Serialize};

/// Bar width requested from a series source. Only daily bars are charted today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    #[default]
    Daily,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "daily",
        }
    }
}

/// How much history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OutputSize {
    /// The latest 100 bars
    Compact,
    /// Everything the source has
    #[default]
    Full,
}

impl OutputSize {
    pub fn as_query(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }

    /// Upper bound on bars a source should return, if any.
    pub fn max_bars(&self) -> Option<usize> {
        match self {
            OutputSize::Compact => Some(100),
            OutputSize::Full => None,
        }
    }
}
