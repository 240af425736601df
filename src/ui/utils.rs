use eframe::egui::{Context, Visuals};

use crate::ui::config::UI_CONFIG;

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;
    visuals.extreme_bg_color = UI_CONFIG.colors.central_panel; // Plot background
    visuals.selection.bg_fill = UI_CONFIG.colors.accent;

    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;

    ctx.set_visuals(visuals);
}

/// Formats an FX price with enough decimals to see a pip move.
/// - Large (>= 100, e.g. JPY crosses): 3 decimals (185.123)
/// - Medium (>= 1): 5 decimals (1.08412)
/// - Small: 6 decimals
pub fn format_price(price: f64) -> String {
    let abs_price = price.abs();
    if abs_price >= 100.0 {
        format!("{:.3}", price)
    } else if abs_price >= 1.0 {
        format!("{:.5}", price)
    } else {
        format!("{:.6}", price)
    }
}

/// Volatility axis labels; raw periodic values are small, so show them as percentages.
pub fn format_volatility(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_precision_follows_magnitude() {
        assert_eq!(format_price(185.12345), "185.123");
        assert_eq!(format_price(1.084123), "1.08412");
        assert_eq!(format_price(0.5), "0.500000");
    }

    #[test]
    fn volatility_reads_as_percent() {
        assert_eq!(format_volatility(0.0061), "0.61%");
    }
}
