// Domain types and value objects
pub mod command;
pub mod interval;
pub mod price_bar;
pub mod price_series;
pub mod symbol;

// Re-export commonly used types
pub use command::ChartCommand;
pub use interval::{Interval, OutputSize};
pub use price_bar::{CandleDirection, PriceBar};
pub use price_series::{PriceSeries, ValidBars};
pub use symbol::Symbol;
