use chrono::NaiveDate;

use crate::chart::axis_link::TimeRange;
use crate::domain::CandleDirection;

/// Drawable geometry of one candle, in chart coordinates (x = UNIX seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandlestickPrimitive {
    pub date: NaiveDate,
    pub x: f64,
    pub half_width: f64,
    pub wick_low: f64,
    pub wick_high: f64,
    pub body_bottom: f64,
    pub body_top: f64,
    pub direction: CandleDirection,
}

impl CandlestickPrimitive {
    pub fn x_extent(&self) -> (f64, f64) {
        (self.x - self.half_width, self.x + self.half_width)
    }

    /// Body corners, counter-clockwise from bottom left
    pub fn body_corners(&self) -> [[f64; 2]; 4] {
        let (left, right) = self.x_extent();
        [
            [left, self.body_bottom],
            [right, self.body_bottom],
            [right, self.body_top],
            [left, self.body_top],
        ]
    }
}

/// One defined sample of the rolling volatility series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityPoint {
    pub date: NaiveDate,
    pub x: f64,
    pub volatility: f64,
}

/// The continuous line drawn on the volatility surface.
/// Points exist only where a full window of returns was available.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VolatilityCurve {
    pub window: usize,
    pub points: Vec<VolatilityPoint>,
}

impl VolatilityCurve {
    pub fn line_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.x, p.volatility]).collect()
    }
}

/// Anything a surface can hold in its data layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Candle(CandlestickPrimitive),
    Volatility(VolatilityCurve),
}

impl Primitive {
    /// Horizontal span covered by the primitive, if it covers anything.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        match self {
            Primitive::Candle(candle) => Some(candle.x_extent()),
            Primitive::Volatility(curve) => match (curve.points.first(), curve.points.last()) {
                (Some(first), Some(last)) => Some((first.x, last.x)),
                _ => None,
            },
        }
    }

    /// Values this primitive contributes to the vertical scale, limited to `range` if given.
    pub fn y_values_within(&self, range: Option<TimeRange>) -> Vec<f64> {
        let visible = |x: f64| range.is_none_or(|r| r.contains(x));
        match self {
            Primitive::Candle(candle) => {
                let (left, right) = candle.x_extent();
                if range.is_none_or(|r| r.overlaps(left, right)) {
                    vec![candle.wick_low, candle.wick_high]
                } else {
                    Vec::new()
                }
            }
            Primitive::Volatility(curve) => curve
                .points
                .iter()
                .filter(|p| visible(p.x))
                .map(|p| p.volatility)
                .collect(),
        }
    }
}

/// Where an overlay marker is pinned inside the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCorner {
    LeftTop,
    RightTop,
}

/// A floating label above the data layer, pinned to a viewport corner.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMarker {
    /// Attachment key: a surface holds at most one marker per id.
    pub id: &'static str,
    pub text: String,
    pub corner: OverlayCorner,
}

impl OverlayMarker {
    pub fn new(id: &'static str, text: impl Into<String>, corner: OverlayCorner) -> Self {
        Self {
            id,
            text: text.into(),
            corner,
        }
    }

    /// Plot-space anchor point for the given visible bounds.
    pub fn anchor(&self, x: TimeRange, y: (f64, f64)) -> [f64; 2] {
        match self.corner {
            OverlayCorner::LeftTop => [x.min, y.1],
            OverlayCorner::RightTop => [x.max, y.1],
        }
    }
}
