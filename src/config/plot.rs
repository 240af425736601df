//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    /// Candle body when close >= open
    pub up_color: Color32,
    /// Candle body when close < open
    pub down_color: Color32,
    pub wick_color: Color32,
    pub wick_width: f32,
    /// Body width as a share of the average spacing between bars (0.0 - 1.0)
    pub body_width_fraction: f64,
    /// Spacing assumed when the series has a single bar (one day, in seconds)
    pub single_bar_spacing_secs: f64,
    pub volatility_line_color: Color32,
    pub volatility_line_width: f32,
    /// Opacity of the area under the volatility curve
    pub volatility_fill_opacity_pct: f32,
    /// Overlay label colour (the "Price" / "Volatility" markers)
    pub overlay_label_color: Color32,
    /// Share of the visible data range added above and below the y bounds
    pub y_padding_fraction: f64,
    /// Zoom never narrows the shared time axis below this span (seconds)
    pub min_visible_span_secs: f64,
    /// Zoom factor applied per scroll notch
    pub scroll_zoom_step: f64,
    /// Fixed height of the volatility (risk) plot in points
    pub risk_plot_height: f32,
    /// Number of horizontal grid divisions on the y axes
    pub y_axis_divisions: u32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    up_color: Color32::from_rgb(38, 166, 154),   // Teal
    down_color: Color32::from_rgb(239, 83, 80),  // Red
    wick_color: Color32::from_rgb(180, 180, 200),
    wick_width: 1.0,
    body_width_fraction: 0.7,
    single_bar_spacing_secs: 86_400.0,
    volatility_line_color: Color32::from_rgb(140, 78, 233), // Theme purple
    volatility_line_width: 1.5,
    volatility_fill_opacity_pct: 0.25,
    overlay_label_color: Color32::from_rgb(0, 255, 0), // Green
    y_padding_fraction: 0.05,
    min_visible_span_secs: 86_400.0 * 5.0,
    scroll_zoom_step: 1.1,
    risk_plot_height: 200.0,
    y_axis_divisions: 5,
};
