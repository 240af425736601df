use eframe::egui::{
    Button, CentralPanel, Context, DragValue, Frame, Key, Margin, RichText, TopBottomPanel,
};

use crate::chart::PlotOutcome;
use crate::config::{PLOT_CONFIG, VOLATILITY};
use crate::domain::ChartCommand;
use crate::error::ChartError;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;

use super::app::DashboardApp;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// One line of status text and how loudly to show it.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum StatusLine {
    Idle(String),
    Ok(String),
    Warning(String),
}

pub(super) fn status_line(outcome: Option<&PlotOutcome>) -> StatusLine {
    match outcome {
        None => StatusLine::Idle(UI_TEXT.status_idle.to_string()),
        Some(PlotOutcome::Cleared) => StatusLine::Idle(UI_TEXT.status_cleared.to_string()),
        Some(PlotOutcome::Unavailable { symbol, error }) => StatusLine::Warning(format!(
            "{} {}: {}",
            UI_TEXT.status_unavailable_prefix, symbol, error
        )),
        Some(PlotOutcome::Rendered {
            symbol,
            source,
            candles,
            rejected_bars,
            insufficient_history,
            ..
        }) => {
            let mut text = format!(
                "{} · {} bars {} {}",
                symbol, candles, UI_TEXT.status_source_prefix, source
            );
            if *rejected_bars > 0 {
                text.push_str(&format!(" · {} {}", rejected_bars, UI_TEXT.status_rejected_suffix));
            }
            if *insufficient_history {
                text.push_str(&format!(" · {}", UI_TEXT.status_short_history));
                return StatusLine::Warning(text);
            }
            StatusLine::Ok(text)
        }
    }
}

impl DashboardApp {
    pub(super) fn handle_global_shortcuts(&mut self, ctx: &Context) {
        // Ignore keys while a text field (e.g. the window DragValue) has focus
        if ctx.wants_keyboard_input() {
            return;
        }

        let toolbar = ChartCommand::toolbar();
        let number_keys = [Key::Num1, Key::Num2, Key::Num3, Key::Num4, Key::Num5];
        let mut command = None;
        let mut zoom_factor = None;
        let mut reset = false;

        ctx.input(|i| {
            for (key, cmd) in number_keys.iter().zip(&toolbar) {
                if *cmd != ChartCommand::Clear && i.key_pressed(*key) {
                    command = Some(*cmd);
                }
            }
            if i.key_pressed(Key::Delete) {
                command = Some(ChartCommand::Clear);
            }
            if i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals) {
                zoom_factor = Some(PLOT_CONFIG.scroll_zoom_step);
            }
            if i.key_pressed(Key::Minus) {
                zoom_factor = Some(1.0 / PLOT_CONFIG.scroll_zoom_step);
            }
            reset = i.key_pressed(Key::Home);
        });

        if let Some(command) = command {
            self.dispatch(command);
        }

        let pane = self.controller.pane_mut();
        let result = if reset {
            pane.reset_view()
        } else if let (Some(factor), Some(range)) = (zoom_factor, pane.visible_range()) {
            pane.zoom_around(factor, range.min + range.span() / 2.0)
        } else {
            Ok(())
        };
        if let Err(e) = result {
            self.record_fatal(e);
        }
    }

    pub(super) fn render_toolbar(&mut self, ctx: &Context) {
        let frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::symmetric(8, 6));
        TopBottomPanel::top("toolbar").frame(frame).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label_title(UI_TEXT.toolbar_title);
                ui.separator();

                for command in ChartCommand::toolbar() {
                    let selected = match command {
                        ChartCommand::Plot(symbol) => {
                            self.controller.current_symbol() == Some(symbol)
                                || self.controller.loading_symbol() == Some(symbol)
                        }
                        ChartCommand::Clear => false,
                    };
                    let button = Button::new(command.label())
                        .selected(selected)
                        .min_size([UI_CONFIG.toolbar_button_min_width, 0.0].into());
                    if ui.add(button).clicked() {
                        self.dispatch(command);
                    }
                }

                ui.separator();
                ui.label_subdued(UI_TEXT.volatility_window_label);
                let mut window = self.controller.volatility_window();
                let changed = ui
                    .add(
                        DragValue::new(&mut window)
                            .range(VOLATILITY.min_window..=VOLATILITY.max_window)
                            .speed(0.2),
                    )
                    .changed();
                if changed {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_ui_interactions {
                        log::info!("Volatility window -> {}", window);
                    }
                    self.set_volatility_window(window);
                }

                if let Some(symbol) = self.controller.loading_symbol() {
                    ui.separator();
                    ui.spinner();
                    ui.label_subdued(format!("{} {}...", UI_TEXT.loading_prefix, symbol));
                }
            });
        });
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        let status_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(Margin::symmetric(8, 4));
        TopBottomPanel::bottom("status_panel")
            .frame(status_frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    match status_line(self.controller.last_outcome()) {
                        StatusLine::Idle(text) => ui.label_subdued(text),
                        StatusLine::Ok(text) => {
                            ui.metric("Plotted", &text, UI_CONFIG.colors.status_ok)
                        }
                        StatusLine::Warning(text) => ui.label_warning(text),
                    }
                    ui.separator();
                    ui.label_subdued(format!(
                        "N={} · {}",
                        self.controller.volatility_window(),
                        self.controller.source_signature()
                    ));
                    ui.separator();
                    ui.label_subdued(UI_TEXT.shortcuts_hint);
                });
            });
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let central_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.central_panel)
            .inner_margin(Margin::same(6));
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                if !self.controller.pane().has_data() && !self.controller.is_loading() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(12.0);
                        ui.label(
                            RichText::new(UI_TEXT.empty_chart_hint).color(UI_CONFIG.colors.label),
                        );
                    });
                }

                if let Err(e) = self.plot_view.show(ui, self.controller.pane_mut()) {
                    self.record_fatal(e);
                }
            });
    }

    pub(super) fn render_fatal_panel(&mut self, ctx: &Context) {
        let message = self
            .fatal_error
            .as_ref()
            .map(ChartError::to_string)
            .unwrap_or_default();
        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading(UI_TEXT.fatal_heading);
                ui.add_space(10.0);
                ui.label_error(message);
                ui.add_space(20.0);
                ui.label(UI_TEXT.fatal_hint);
            });
        });
    }
}
