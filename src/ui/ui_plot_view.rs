use eframe::egui::{self, Id};
use egui_plot::{AxisHints, GridInput, GridMark, HPlacement, Plot, PlotResponse};

use crate::chart::axis_link::TimeRange;
use crate::chart::pane::{LinkedChartPane, Pane};
use crate::config::PLOT_CONFIG;
use crate::error::ChartError;
use crate::ui::plot_layers::{LayerContext, layer_stack};
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::{format_price, format_volatility};
use crate::utils::TimeUtils;
use crate::utils::time_utils::{chart_time_label, date_grid_step_days};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Width reserved for the y axis on both plots so their plot areas line up.
const Y_AXIS_THICKNESS: f32 = 72.0;

/// Draws the price plot above the fixed-height volatility plot.
///
/// egui_plot keeps its own bounds per plot. Each frame a plot is handed the
/// shared time range only if the link moved since that plot last synced; after
/// drawing, whatever range the plot ended up with (user drag or scroll) is
/// published back through the pane so the other plot follows.
#[derive(Default)]
pub struct LinkedPlotView {
    price_synced: Option<u64>,
    volatility_synced: Option<u64>,
}

impl LinkedPlotView {
    pub fn new() -> Self {
        Self::default()
    }

    fn synced_mut(&mut self, pane: Pane) -> &mut Option<u64> {
        match pane {
            Pane::Price => &mut self.price_synced,
            Pane::Volatility => &mut self.volatility_synced,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, pane: &mut LinkedChartPane) -> Result<(), ChartError> {
        let price_height = (ui.available_height()
            - PLOT_CONFIG.risk_plot_height
            - ui.spacing().item_spacing.y)
            .max(120.0);
        let price_shown = self.show_plot(ui, pane, Pane::Price, price_height)?;
        let volatility_shown =
            self.show_plot(ui, pane, Pane::Volatility, PLOT_CONFIG.risk_plot_height)?;

        // Input on either plot can move the link after the price plot was painted
        if pane.has_data() && diverged(pane.visible_range(), &[price_shown, volatility_shown]) {
            ui.ctx().request_discard("linked time axis moved");
            ui.ctx().request_repaint();
        }
        Ok(())
    }

    /// Draws one plot, feeds its input back into the pane and returns the x bounds it painted.
    fn show_plot(
        &mut self,
        ui: &mut egui::Ui,
        pane: &mut LinkedChartPane,
        which: Pane,
        height: f32,
    ) -> Result<(f64, f64), ChartError> {
        let visible = pane.visible_range();
        let push_x = *self.synced_mut(which) != Some(pane.revision());
        let surface = pane.surface(which);
        let y_bounds = surface.y_bounds();
        let ctx = LayerContext { surface, visible };

        let response: PlotResponse<()> = build_plot(which, surface.name(), height).show(ui, |plot_ui| {
            if push_x && let Some(range) = visible {
                plot_ui.set_plot_bounds_x(range.min..=range.max);
            }
            if let Some((lo, hi)) = y_bounds {
                plot_ui.set_plot_bounds_y(lo..=hi);
            }
            for layer in layer_stack() {
                layer.render(plot_ui, &ctx);
            }
        });

        let frame = response.transform.frame();
        pane.set_pixel_width(frame.width());
        let bounds = response.transform.bounds();
        let shown = (bounds.min()[0], bounds.max()[0]);

        if response.response.double_clicked() {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_ui_interactions {
                log::info!("Double-click on {:?} plot: resetting view", which);
            }
            pane.reset_view()?;
        } else if pane.has_data() {
            // Drag moves the plot's own bounds; publish them so the other plot follows
            if visible.is_none_or(|r| !same_range(r, shown.0, shown.1)) {
                pane.set_visible_range_clamped(which, shown.0, shown.1)?;
            }
            if let Some(pointer) = response.response.hover_pos() {
                let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta, i.zoom_delta()));
                let factor = scroll_zoom_factor(scroll.y, pinch);
                if factor != 1.0 {
                    pane.zoom_around_pixel(factor, pointer.x - frame.left())?;
                }
                if scroll.x != 0.0 {
                    pane.pan_by_pixels(scroll.x)?;
                }
            }
        }

        // Stay unsynced while the link differs from what was painted, so the next
        // frame pushes the shared range into this plot
        *self.synced_mut(which) = pane
            .visible_range()
            .filter(|r| same_range(*r, shown.0, shown.1))
            .map(|_| pane.revision());
        Ok(shown)
    }
}

/// Points of vertical wheel travel that count as one zoom step.
const SCROLL_POINTS_PER_STEP: f32 = 50.0;

/// Zoom factor for one frame of wheel and pinch input; `> 1` zooms in.
fn scroll_zoom_factor(scroll_y: f32, pinch: f32) -> f64 {
    let steps = (scroll_y / SCROLL_POINTS_PER_STEP).clamp(-10.0, 10.0) as f64;
    let pinch = if pinch.is_finite() && pinch > 0.0 {
        pinch as f64
    } else {
        1.0
    };
    PLOT_CONFIG.scroll_zoom_step.powf(steps) * pinch
}

/// True when some plot painted x bounds other than the shared range.
fn diverged(link: Option<TimeRange>, shown: &[(f64, f64)]) -> bool {
    link.is_some_and(|r| shown.iter().any(|&(min, max)| !same_range(r, min, max)))
}

fn same_range(range: TimeRange, min: f64, max: f64) -> bool {
    let tolerance = range.span() * 1e-9;
    (range.min - min).abs() <= tolerance && (range.max - max).abs() <= tolerance
}

fn build_plot(which: Pane, name: &str, height: f32) -> Plot<'static> {
    let (y_label, format_value): (&str, fn(f64) -> String) = match which {
        Pane::Price => (UI_TEXT.price_axis, format_price),
        Pane::Volatility => (UI_TEXT.volatility_axis, format_volatility),
    };

    Plot::new(format!("{}_plot", name))
        .height(height)
        .show_axes([which == Pane::Volatility, true])
        .custom_x_axes(vec![create_date_axis()])
        .custom_y_axes(vec![create_y_axis(y_label, format_value)])
        .x_grid_spacer(date_grid)
        .y_grid_spacer(even_divisions)
        .label_formatter(move |_name, value| {
            format!(
                "{}\n{}",
                chart_time_label(value.x, 0.0),
                format_value(value.y)
            )
        })
        .link_cursor(Id::new("linked_time_cursor"), [true, false])
        // Horizontal drag only: each plot owns its vertical scale, and wheel
        // zoom goes through the pane so the minimum span holds
        .allow_drag([true, false])
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
}

fn create_date_axis() -> AxisHints<'static> {
    AxisHints::new_x().formatter(|grid_mark, range| {
        chart_time_label(grid_mark.value, range.end() - range.start())
    })
}

fn create_y_axis(label: &str, format_value: fn(f64) -> String) -> AxisHints<'static> {
    AxisHints::new_y()
        .label(label.to_string())
        .formatter(move |grid_mark, _range| format_value(grid_mark.value))
        .placement(HPlacement::Left)
        .min_thickness(Y_AXIS_THICKNESS)
}

/// Grid lines on whole days, spaced so that about eight fit.
fn date_grid(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return Vec::new();
    }
    let step = date_grid_step_days(max - min, 8.0) as f64 * TimeUtils::SECS_IN_D as f64;
    let start = (min / step).ceil() as i64;
    let end = (max / step).floor() as i64;
    (start..=end)
        .map(|i| GridMark {
            value: i as f64 * step,
            step_size: step,
        })
        .collect()
}

/// Evenly spaced horizontal lines across the visible vertical range.
fn even_divisions(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return Vec::new();
    }
    let divisions = PLOT_CONFIG.y_axis_divisions.max(1);
    let step = span / divisions as f64;
    (0..=divisions)
        .map(|i| GridMark {
            value: min + step * i as f64,
            step_size: step,
        })
        .collect()
}
