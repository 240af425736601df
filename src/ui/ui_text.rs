/// User-facing strings, kept in one place.
pub struct UiText {
    pub window_title: &'static str,
    pub toolbar_title: &'static str,
    pub volatility_window_label: &'static str,
    pub price_axis: &'static str,
    pub volatility_axis: &'static str,
    pub loading_prefix: &'static str,
    pub status_idle: &'static str,
    pub status_cleared: &'static str,
    pub status_unavailable_prefix: &'static str,
    pub status_short_history: &'static str,
    pub status_rejected_suffix: &'static str,
    pub status_source_prefix: &'static str,
    pub empty_chart_hint: &'static str,
    pub fatal_heading: &'static str,
    pub fatal_hint: &'static str,
    pub shortcuts_hint: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    window_title: "Quanta Risk - FX price and volatility",
    toolbar_title: "QUANTA RISK",
    volatility_window_label: "Vol window",
    price_axis: "Currency pair price",
    volatility_axis: "Periodic Volatility",
    loading_prefix: "Loading",
    status_idle: "Pick a pair to plot",
    status_cleared: "Plot cleared",
    status_unavailable_prefix: "Unavailable",
    status_short_history: "not enough history for volatility",
    status_rejected_suffix: "malformed bars skipped",
    status_source_prefix: "via",
    empty_chart_hint: "Choose a currency pair above to plot prices and volatility.",
    fatal_heading: "⚠ The chart stopped",
    fatal_hint: "Restart the application. Details were written to the log.",
    shortcuts_hint: "1-3: plot pair | Del: clear | Home / double-click: reset view",
};
