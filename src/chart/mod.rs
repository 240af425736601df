//! Chart model: renderers, retained surfaces, the shared time axis and the controller.
//! Nothing in here depends on egui; `crate::ui` draws what these types hold.

pub mod axis_link;
pub mod candlestick;
pub mod controller;
pub mod pane;
pub mod primitives;
pub mod surface;
pub mod volatility;

pub use axis_link::{AxisLinkState, TimeRange};
pub use candlestick::{CandlestickLayer, CandlestickRenderer};
pub use controller::{ChartController, PlotOutcome};
pub use pane::{LinkedChartPane, Pane};
pub use primitives::{
    CandlestickPrimitive, OverlayCorner, OverlayMarker, Primitive, VolatilityCurve, VolatilityPoint,
};
pub use surface::{ChartSurface, PlotSurface};
pub use volatility::{VolatilityLayer, VolatilityRenderer};
