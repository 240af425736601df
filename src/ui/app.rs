use eframe::{Frame, egui};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chart::{ChartController, PlotOutcome};
use crate::config::VOLATILITY;
use crate::domain::{ChartCommand, Symbol};
use crate::error::ChartError;
use crate::ui::config::UI_CONFIG;
use crate::ui::ui_plot_view::LinkedPlotView;
use crate::ui::utils::setup_custom_visuals;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// What survives a restart (stored through `eframe::Storage`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_symbol: Option<Symbol>,
    pub volatility_window: usize,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            last_symbol: None,
            volatility_window: VOLATILITY.window,
        }
    }
}

impl PersistedState {
    /// Drops values a newer build would reject.
    fn sanitized(mut self) -> Self {
        if !(VOLATILITY.min_window..=VOLATILITY.max_window).contains(&self.volatility_window) {
            self.volatility_window = VOLATILITY.window;
        }
        self
    }
}

/// Startup choices made on the command line; each one beats the stored state.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub symbol: Option<Symbol>,
    pub volatility_window: Option<usize>,
}

pub struct DashboardApp {
    pub(super) controller: ChartController,
    pub(super) plot_view: LinkedPlotView,
    pub(super) persisted: PersistedState,
    /// Set once a fatal error is seen; the chart is no longer drawn after that
    pub(super) fatal_error: Option<ChartError>,
}

impl DashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: ChartController,
        options: StartupOptions,
    ) -> Self {
        let persisted: PersistedState = match cc.storage {
            Some(storage) => match eframe::get_value(storage, eframe::APP_KEY) {
                Some(value) => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_state_serde {
                        log::info!("Successfully loaded persisted state: {:?}", value);
                    }
                    value
                }
                None => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_state_serde {
                        log::info!("No persisted state found. Creating anew.");
                    }
                    PersistedState::default()
                }
            },
            None => PersistedState::default(),
        };

        setup_custom_visuals(&cc.egui_ctx);
        Self::with_state(controller, persisted, options)
    }

    /// Builds the app from already loaded state and kicks off the startup plot, if any.
    pub fn with_state(
        controller: ChartController,
        persisted: PersistedState,
        options: StartupOptions,
    ) -> Self {
        let mut app = Self {
            controller,
            plot_view: LinkedPlotView::new(),
            persisted: persisted.sanitized(),
            fatal_error: None,
        };

        let window = options
            .volatility_window
            .unwrap_or(app.persisted.volatility_window);
        app.set_volatility_window(window);

        if let Some(symbol) = options.symbol.or(app.persisted.last_symbol) {
            app.dispatch(ChartCommand::Plot(symbol));
        }
        app
    }

    pub(super) fn dispatch(&mut self, command: ChartCommand) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Toolbar command: {:?}", command);
        }
        if command == ChartCommand::Clear {
            self.persisted.last_symbol = None;
        }
        self.controller.dispatch(command);
    }

    pub(super) fn set_volatility_window(&mut self, window: usize) {
        match self.controller.set_volatility_window(window) {
            Ok(()) => self.persisted.volatility_window = window,
            Err(e) => self.record_fatal(e),
        }
    }

    pub(super) fn record_fatal(&mut self, error: ChartError) {
        log::error!("Fatal chart error: {}", error);
        self.fatal_error = Some(error);
    }

    fn poll_controller(&mut self, ctx: &egui::Context) {
        match self.controller.poll() {
            Ok(Some(PlotOutcome::Rendered { symbol, .. })) => {
                self.persisted.last_symbol = Some(symbol);
            }
            Ok(_) => {}
            Err(e) => self.record_fatal(e),
        }

        if self.controller.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(UI_CONFIG.loading_repaint_ms));
        }
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Drop any outstanding request before the runtime goes away
        self.controller.clear();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!("Application shutdown complete.");
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.persisted);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if self.fatal_error.is_some() {
            self.render_fatal_panel(ctx);
            return;
        }

        self.poll_controller(ctx);
        self.handle_global_shortcuts(ctx);

        self.render_toolbar(ctx);
        self.render_status_panel(ctx);
        self.render_central_panel(ctx);
    }
}
