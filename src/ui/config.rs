use std::sync::LazyLock;

use colorgrad::Gradient;
use eframe::egui::Color32;

use crate::config::PLOT_CONFIG;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// Theme colours as HTML hex strings, resolved once into [`UI_CONFIG`].
pub struct UiTheme {
    pub background: &'static str,
    pub panel: &'static str,
    pub accent: &'static str,
    pub label: &'static str,
}

pub const UI_THEME: UiTheme = UiTheme {
    background: "#151820",
    panel: "#1d2130",
    accent: "#8c4ee9",
    label: "#a0a4b8",
};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub accent: Color32,
    pub status_ok: Color32,
    pub status_warning: Color32,
    pub status_error: Color32,
    /// Area under the volatility curve: the line colour faded into the background
    pub volatility_fill: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Clone, Copy, Default)]
pub struct UiConfig {
    pub colors: UiColors,
    pub toolbar_button_min_width: f32,
    /// How often to repaint while a request is outstanding
    pub loading_repaint_ms: u64,
}

/// Global UI configuration instance
pub static UI_CONFIG: LazyLock<UiConfig> = LazyLock::new(|| {
    let central_panel = html_color(UI_THEME.background, Color32::from_rgb(21, 24, 32));
    UiConfig {
        colors: UiColors {
            label: html_color(UI_THEME.label, Color32::GRAY),
            heading: Color32::WHITE,
            central_panel,
            side_panel: html_color(UI_THEME.panel, Color32::from_rgb(29, 33, 48)),
            accent: html_color(UI_THEME.accent, PLOT_CONFIG.volatility_line_color),
            status_ok: Color32::from_rgb(100, 200, 100),
            status_warning: Color32::from_rgb(255, 215, 0),
            status_error: Color32::from_rgb(255, 100, 100),
            volatility_fill: blend(
                central_panel,
                PLOT_CONFIG.volatility_line_color,
                PLOT_CONFIG.volatility_fill_opacity_pct,
            ),
        },
        toolbar_button_min_width: 90.0,
        loading_repaint_ms: 100,
    }
});

fn to_egui_color(color: colorgrad::Color) -> Color32 {
    let [r, g, b, a] = color.to_rgba8();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn to_grad_color(color: Color32) -> colorgrad::Color {
    colorgrad::Color::from_rgba8(color.r(), color.g(), color.b(), color.a())
}

/// Parses `#rrggbb` (or any CSS colour name), falling back to `fallback`.
pub fn html_color(html: &str, fallback: Color32) -> Color32 {
    match colorgrad::Color::from_html(html) {
        Ok(color) => to_egui_color(color),
        Err(e) => {
            log::warn!("Bad theme colour '{}': {}", html, e);
            fallback
        }
    }
}

/// Colour `t` of the way from `from` to `to` (0.0 = `from`).
pub fn blend(from: Color32, to: Color32, t: f32) -> Color32 {
    colorgrad::GradientBuilder::new()
        .colors(&[to_grad_color(from), to_grad_color(to)])
        .build::<colorgrad::LinearGradient>()
        .map(|grad| to_egui_color(grad.at(t.clamp(0.0, 1.0))))
        .unwrap_or(to)
}
