use eframe::egui::{Align2, RichText, Stroke};
use egui_plot::{Line, PlotPoint, PlotPoints, PlotUi, Polygon, Text};

use crate::chart::axis_link::TimeRange;
use crate::chart::primitives::{CandlestickPrimitive, OverlayCorner, Primitive, VolatilityCurve};
use crate::chart::surface::PlotSurface;
use crate::config::PLOT_CONFIG;
use crate::domain::CandleDirection;
use crate::ui::config::UI_CONFIG;

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub surface: &'a PlotSurface,
    /// Shared time range; `None` until the first plot
    pub visible: Option<TimeRange>,
}

impl LayerContext<'_> {
    /// True when `[lo, hi]` touches the visible range (or nothing is known yet).
    fn in_view(&self, lo: f64, hi: f64) -> bool {
        self.visible.is_none_or(|r| hi >= r.min && lo <= r.max)
    }
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// CANDLES: wick line plus body rectangle per bar
// ============================================================================
pub struct CandleLayer;

impl CandleLayer {
    fn draw(plot_ui: &mut PlotUi, candle: &CandlestickPrimitive) {
        let color = match candle.direction {
            CandleDirection::Up => PLOT_CONFIG.up_color,
            CandleDirection::Down => PLOT_CONFIG.down_color,
        };

        plot_ui.line(
            Line::new(
                "wick",
                PlotPoints::new(vec![[candle.x, candle.wick_low], [candle.x, candle.wick_high]]),
            )
            .color(PLOT_CONFIG.wick_color)
            .width(PLOT_CONFIG.wick_width),
        );

        // A doji has no height; the stroke keeps it visible as a line
        plot_ui.polygon(
            Polygon::new("candle", PlotPoints::new(candle.body_corners().to_vec()))
                .fill_color(color)
                .stroke(Stroke::new(1.0, color)),
        );
    }
}

impl PlotLayer for CandleLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for primitive in ctx.surface.primitives() {
            if let Primitive::Candle(candle) = primitive {
                let (lo, hi) = candle.x_extent();
                if ctx.in_view(lo, hi) {
                    Self::draw(plot_ui, candle);
                }
            }
        }
    }
}

// ============================================================================
// VOLATILITY: filled area down to zero, line on top
// ============================================================================
pub struct VolatilityAreaLayer;

impl VolatilityAreaLayer {
    fn draw(plot_ui: &mut PlotUi, curve: &VolatilityCurve) {
        // One trapezoid per segment: always convex, so egui fills it correctly
        for pair in curve.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            plot_ui.polygon(
                Polygon::new(
                    "volatility_fill",
                    PlotPoints::new(vec![
                        [a.x, 0.0],
                        [b.x, 0.0],
                        [b.x, b.volatility],
                        [a.x, a.volatility],
                    ]),
                )
                .fill_color(UI_CONFIG.colors.volatility_fill)
                .stroke(Stroke::NONE),
            );
        }

        plot_ui.line(
            Line::new("volatility", PlotPoints::new(curve.line_points()))
                .color(PLOT_CONFIG.volatility_line_color)
                .width(PLOT_CONFIG.volatility_line_width),
        );
    }
}

impl PlotLayer for VolatilityAreaLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for primitive in ctx.surface.primitives() {
            if let Primitive::Volatility(curve) = primitive
                && !curve.points.is_empty()
            {
                Self::draw(plot_ui, curve);
            }
        }
    }
}

// ============================================================================
// OVERLAYS: text pinned to a corner of the visible viewport
// ============================================================================
pub struct OverlayLayer;

impl PlotLayer for OverlayLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for (marker, [x, y]) in ctx.surface.overlay_anchors() {
            let anchor = match marker.corner {
                OverlayCorner::LeftTop => Align2::LEFT_TOP,
                OverlayCorner::RightTop => Align2::RIGHT_TOP,
            };
            plot_ui.text(
                Text::new(
                    marker.id,
                    PlotPoint::new(x, y),
                    RichText::new(&marker.text)
                        .strong()
                        .color(PLOT_CONFIG.overlay_label_color),
                )
                .anchor(anchor),
            );
        }
    }
}

/// Back to front.
pub fn layer_stack() -> Vec<Box<dyn PlotLayer>> {
    vec![
        Box::new(VolatilityAreaLayer),
        Box::new(CandleLayer),
        Box::new(OverlayLayer),
    ]
}
