use std::sync::Arc;

use poll_promise::Promise;

use crate::chart::candlestick::CandlestickRenderer;
use crate::chart::pane::LinkedChartPane;
use crate::chart::volatility::VolatilityRenderer;
use crate::data::SeriesSource;
use crate::domain::{ChartCommand, Interval, OutputSize, PriceSeries, Symbol};
use crate::error::ChartError;
use crate::utils::app_time::{AppInstant, now};

/// What happened to the most recent plot or clear.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotOutcome {
    Rendered {
        symbol: Symbol,
        /// Signature of the source that served the data
        source: &'static str,
        candles: usize,
        volatility_points: usize,
        rejected_bars: usize,
        insufficient_history: bool,
    },
    /// Retrieval failed or produced nothing drawable; the chart kept its previous content
    Unavailable { symbol: Symbol, error: ChartError },
    Cleared,
}

struct PendingPlot {
    id: u64,
    symbol: Symbol,
    started: AppInstant,
    promise: Promise<anyhow::Result<(PriceSeries, &'static str)>>,
}

/// Owns the linked pane and turns toolbar commands into chart updates.
///
/// Retrieval runs on a worker thread. Only the most recent request may touch
/// the chart: issuing a new plot (or a clear) drops the outstanding one, and its
/// result is never applied.
pub struct ChartController {
    pane: LinkedChartPane,
    source: Arc<dyn SeriesSource>,
    candles: CandlestickRenderer,
    volatility: VolatilityRenderer,
    interval: Interval,
    output_size: OutputSize,
    pending: Option<PendingPlot>,
    next_request_id: u64,
    discarded_requests: usize,
    current_symbol: Option<Symbol>,
    /// The series on screen, kept so a new volatility window can be applied without refetching
    shown: Option<(PriceSeries, &'static str)>,
    last_outcome: Option<PlotOutcome>,
}

impl ChartController {
    pub fn new(source: Arc<dyn SeriesSource>, volatility: VolatilityRenderer) -> Self {
        Self {
            pane: LinkedChartPane::new(),
            source,
            candles: CandlestickRenderer::default(),
            volatility,
            interval: Interval::default(),
            output_size: OutputSize::default(),
            pending: None,
            next_request_id: 0,
            discarded_requests: 0,
            current_symbol: None,
            shown: None,
            last_outcome: None,
        }
    }

    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn pane(&self) -> &LinkedChartPane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut LinkedChartPane {
        &mut self.pane
    }

    pub fn source_signature(&self) -> &'static str {
        self.source.signature()
    }

    pub fn volatility_window(&self) -> usize {
        self.volatility.window()
    }

    /// Switches the volatility window and redraws the series on screen with it.
    pub fn set_volatility_window(&mut self, window: usize) -> Result<(), ChartError> {
        if window == self.volatility.window() {
            return Ok(());
        }
        self.volatility = VolatilityRenderer::new(window)?;
        if let (Some(symbol), Some((series, source))) = (self.current_symbol, self.shown.clone()) {
            self.plot_series(symbol, &series, source)?;
        }
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Symbol of the outstanding request, if any.
    pub fn loading_symbol(&self) -> Option<Symbol> {
        self.pending.as_ref().map(|p| p.symbol)
    }

    /// Symbol whose data is on screen.
    pub fn current_symbol(&self) -> Option<Symbol> {
        self.current_symbol
    }

    pub fn last_outcome(&self) -> Option<&PlotOutcome> {
        self.last_outcome.as_ref()
    }

    /// Requests dropped because a newer plot or a clear came in first.
    pub fn discarded_requests(&self) -> usize {
        self.discarded_requests
    }

    pub fn dispatch(&mut self, command: ChartCommand) {
        match command {
            ChartCommand::Plot(symbol) => self.plot(symbol),
            ChartCommand::Clear => self.clear(),
        }
    }

    /// Starts retrieving `symbol` in the background. Any outstanding request is dropped.
    pub fn plot(&mut self, symbol: Symbol) {
        self.cancel_pending();

        self.next_request_id += 1;
        let id = self.next_request_id;
        let source = Arc::clone(&self.source);
        let (interval, output_size) = (self.interval, self.output_size);

        log::info!("Requesting {} (request #{})", symbol, id);
        let promise = Promise::spawn_thread("series_fetch", move || {
            source.fetch_series_signed(symbol, interval, output_size)
        });

        self.pending = Some(PendingPlot {
            id,
            symbol,
            started: now(),
            promise,
        });
    }

    /// Applies the outstanding request if its result has arrived.
    ///
    /// Only fatal errors are returned; everything else ends up in [`Self::last_outcome`].
    pub fn poll(&mut self) -> Result<Option<PlotOutcome>, ChartError> {
        let Some(PendingPlot {
            id,
            symbol,
            started,
            promise,
        }) = self.pending.take()
        else {
            return Ok(None);
        };

        let result = match promise.try_take() {
            Ok(result) => result,
            Err(promise) => {
                self.pending = Some(PendingPlot {
                    id,
                    symbol,
                    started,
                    promise,
                });
                return Ok(None);
            }
        };

        let outcome = match result {
            Ok((series, source)) => self.plot_series(symbol, &series, source)?,
            Err(e) => PlotOutcome::Unavailable {
                symbol,
                error: ChartError::DataUnavailable(format!("{:#}", e)),
            },
        };

        match &outcome {
            PlotOutcome::Unavailable { error, .. } => {
                log::warn!("Could not plot {}: {}", symbol, error)
            }
            _ => log::info!(
                "Request #{} for {} settled in {:.2?}",
                id,
                symbol,
                started.elapsed()
            ),
        }

        self.last_outcome = Some(outcome.clone());
        Ok(Some(outcome))
    }

    /// Waits for the outstanding request (if any) and applies it.
    pub fn block_until_settled(&mut self) -> Result<Option<PlotOutcome>, ChartError> {
        if let Some(pending) = &self.pending {
            pending.promise.block_until_ready();
        }
        self.poll()
    }

    /// Builds both layers from `series`, then swaps them into the pane together.
    ///
    /// If either layer cannot be built the pane is left exactly as it was.
    pub fn plot_series(
        &mut self,
        symbol: Symbol,
        series: &PriceSeries,
        source: &'static str,
    ) -> Result<PlotOutcome, ChartError> {
        let built = self
            .candles
            .build(series)
            .and_then(|candles| Ok((candles, self.volatility.build(series)?)));

        let (candles, volatility) = match built {
            Ok(layers) => layers,
            Err(e) if e.is_fatal() => return Err(e),
            Err(error) => {
                let outcome = PlotOutcome::Unavailable { symbol, error };
                self.last_outcome = Some(outcome.clone());
                return Ok(outcome);
            }
        };

        if let Some(reason) = &volatility.insufficient_history {
            log::info!("{}: {}", symbol, reason);
        }

        let outcome = PlotOutcome::Rendered {
            symbol,
            source,
            candles: candles.candles.len(),
            volatility_points: volatility.curve.points.len(),
            rejected_bars: candles.rejected,
            insufficient_history: volatility.insufficient_history.is_some(),
        };

        self.pane.apply(candles, volatility)?;
        self.current_symbol = Some(symbol);
        self.shown = Some((series.clone(), source));
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Empties both plots and drops any outstanding request.
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.pane.clear();
        self.current_symbol = None;
        self.shown = None;
        self.last_outcome = Some(PlotOutcome::Cleared);
    }

    fn cancel_pending(&mut self) {
        if let Some(stale) = self.pending.take() {
            self.discarded_requests += 1;
            log::info!(
                "Dropping request #{} for {} after {:.2?}",
                stale.id,
                stale.symbol,
                stale.started.elapsed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::pane::Pane;
    use crate::data::DemoSource;
    use crate::domain::PriceBar;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::mpsc::{self, Receiver, Sender};

    enum Script {
        Series(PriceSeries),
        Gated(Mutex<Option<Receiver<()>>>, PriceSeries),
        Fail,
    }

    #[derive(Default)]
    struct ScriptedSource {
        scripts: HashMap<Symbol, Script>,
    }

    impl ScriptedSource {
        fn serve(mut self, symbol: Symbol, series: PriceSeries) -> Self {
            self.scripts.insert(symbol, Script::Series(series));
            self
        }

        fn gate(mut self, symbol: Symbol, series: PriceSeries) -> (Self, Sender<()>) {
            let (tx, rx) = mpsc::channel();
            self.scripts
                .insert(symbol, Script::Gated(Mutex::new(Some(rx)), series));
            (self, tx)
        }

        fn fail(mut self, symbol: Symbol) -> Self {
            self.scripts.insert(symbol, Script::Fail);
            self
        }
    }

    impl SeriesSource for ScriptedSource {
        fn fetch_series(
            &self,
            symbol: Symbol,
            _: Interval,
            _: OutputSize,
        ) -> anyhow::Result<PriceSeries> {
            match self.scripts.get(&symbol) {
                Some(Script::Series(series)) => Ok(series.clone()),
                Some(Script::Gated(gate, series)) => {
                    let rx = gate.lock().unwrap().take();
                    if let Some(rx) = rx {
                        let _ = rx.recv();
                    }
                    Ok(series.clone())
                }
                Some(Script::Fail) | None => Err(anyhow!("no data for {}", symbol)),
            }
        }

        fn signature(&self) -> &'static str {
            "Scripted"
        }
    }

    fn demo(symbol: Symbol, bars: usize) -> PriceSeries {
        DemoSource::new(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(), bars).generate(symbol, bars)
    }

    fn controller(source: ScriptedSource) -> ChartController {
        ChartController::new(Arc::new(source), VolatilityRenderer::new(20).unwrap())
    }

    fn price_ceiling(c: &ChartController) -> f64 {
        c.pane().surface(Pane::Price).y_bounds().unwrap().1
    }

    #[test]
    fn plot_renders_both_panes_in_one_step() {
        let mut c = controller(ScriptedSource::default().serve(Symbol::EurUsd, demo(Symbol::EurUsd, 60)));
        c.dispatch(ChartCommand::Plot(Symbol::EurUsd));
        assert!(c.is_loading());

        let outcome = c.block_until_settled().unwrap().unwrap();
        assert_eq!(
            outcome,
            PlotOutcome::Rendered {
                symbol: Symbol::EurUsd,
                source: "Scripted",
                candles: 60,
                volatility_points: 40,
                rejected_bars: 0,
                insufficient_history: false,
            }
        );
        assert!(!c.is_loading());
        assert_eq!(c.current_symbol(), Some(Symbol::EurUsd));
        assert!(!c.pane().surface(Pane::Price).is_empty());
        assert!(!c.pane().surface(Pane::Volatility).is_empty());
        assert!(c.pane().visible_range().is_some());
    }

    #[test]
    fn later_request_wins_when_earlier_one_finishes_last() {
        let (source, release_eur) = ScriptedSource::default()
            .serve(Symbol::GbpJpy, demo(Symbol::GbpJpy, 40))
            .gate(Symbol::EurUsd, demo(Symbol::EurUsd, 40));
        let mut c = controller(source);

        c.plot(Symbol::EurUsd);
        c.plot(Symbol::GbpJpy);
        let outcome = c.block_until_settled().unwrap().unwrap();
        assert!(matches!(outcome, PlotOutcome::Rendered { symbol: Symbol::GbpJpy, .. }));

        release_eur.send(()).unwrap();
        assert_eq!(c.poll().unwrap(), None);
        assert_eq!(c.current_symbol(), Some(Symbol::GbpJpy));
        assert!(price_ceiling(&c) > 100.0, "GBP/JPY prices on screen");
        assert_eq!(c.discarded_requests(), 1);
    }

    #[test]
    fn later_request_wins_when_earlier_one_finishes_first() {
        let (source, release_jpy) = ScriptedSource::default()
            .serve(Symbol::EurUsd, demo(Symbol::EurUsd, 40))
            .gate(Symbol::EurJpy, demo(Symbol::EurJpy, 40));
        let mut c = controller(source);

        c.plot(Symbol::EurUsd);
        c.plot(Symbol::EurJpy);
        assert_eq!(c.poll().unwrap(), None);
        assert!(c.pane().surface(Pane::Price).is_empty());

        release_jpy.send(()).unwrap();
        c.block_until_settled().unwrap();
        assert_eq!(c.current_symbol(), Some(Symbol::EurJpy));
    }

    #[test]
    fn failed_retrieval_keeps_previous_chart() {
        let mut c = controller(
            ScriptedSource::default()
                .serve(Symbol::EurUsd, demo(Symbol::EurUsd, 30))
                .fail(Symbol::GbpJpy),
        );
        c.plot(Symbol::EurUsd);
        c.block_until_settled().unwrap();
        let range = c.pane().visible_range();
        let ceiling = price_ceiling(&c);

        c.plot(Symbol::GbpJpy);
        let outcome = c.block_until_settled().unwrap().unwrap();
        assert!(matches!(
            outcome,
            PlotOutcome::Unavailable {
                symbol: Symbol::GbpJpy,
                error: ChartError::DataUnavailable(_)
            }
        ));
        assert_eq!(c.current_symbol(), Some(Symbol::EurUsd));
        assert_eq!(c.pane().visible_range(), range);
        assert_eq!(price_ceiling(&c), ceiling);
    }

    #[test]
    fn empty_series_keeps_previous_chart() {
        let mut c = controller(
            ScriptedSource::default()
                .serve(Symbol::EurUsd, demo(Symbol::EurUsd, 30))
                .serve(Symbol::EurJpy, PriceSeries::empty()),
        );
        c.plot(Symbol::EurUsd);
        c.block_until_settled().unwrap();

        c.plot(Symbol::EurJpy);
        let outcome = c.block_until_settled().unwrap().unwrap();
        assert_eq!(
            outcome,
            PlotOutcome::Unavailable {
                symbol: Symbol::EurJpy,
                error: ChartError::EmptySeries
            }
        );
        assert_eq!(c.current_symbol(), Some(Symbol::EurUsd));
        assert!(!c.pane().surface(Pane::Volatility).is_empty());
    }

    #[test]
    fn short_history_draws_candles_without_volatility() {
        let mut c = controller(ScriptedSource::default().serve(Symbol::EurUsd, demo(Symbol::EurUsd, 8)));
        c.plot(Symbol::EurUsd);
        let outcome = c.block_until_settled().unwrap().unwrap();
        assert!(matches!(
            outcome,
            PlotOutcome::Rendered {
                candles: 8,
                volatility_points: 0,
                insufficient_history: true,
                ..
            }
        ));
        assert!(c.pane().surface(Pane::Volatility).data_extent().is_none());
    }

    #[test]
    fn malformed_bars_are_counted_not_drawn() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let series = PriceSeries::new(vec![
            PriceBar::new(d(1), 1.10, 1.12, 1.09, 1.11),
            PriceBar::new(d(2), 1.10, 1.09, 1.12, 1.11),
            PriceBar::new(d(3), 1.105, 1.106, 1.08, 1.09),
        ])
        .unwrap();
        let mut c = controller(ScriptedSource::default());
        let outcome = c.plot_series(Symbol::EurUsd, &series, "test").unwrap();
        assert!(matches!(
            outcome,
            PlotOutcome::Rendered {
                candles: 2,
                rejected_bars: 1,
                ..
            }
        ));
    }

    #[test]
    fn changing_the_window_redraws_without_refetching() {
        let mut c = controller(ScriptedSource::default().serve(Symbol::EurUsd, demo(Symbol::EurUsd, 60)));
        c.plot(Symbol::EurUsd);
        c.block_until_settled().unwrap();

        c.set_volatility_window(10).unwrap();
        assert_eq!(c.volatility_window(), 10);
        assert!(matches!(
            c.last_outcome(),
            Some(PlotOutcome::Rendered {
                volatility_points: 50,
                ..
            })
        ));
        assert!(!c.is_loading());

        let err = c.set_volatility_window(1).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(c.volatility_window(), 10);
    }

    #[test]
    fn clear_cancels_pending_request_and_empties_both_panes() {
        let (source, release) = ScriptedSource::default()
            .serve(Symbol::EurUsd, demo(Symbol::EurUsd, 30))
            .gate(Symbol::GbpJpy, demo(Symbol::GbpJpy, 30));
        let mut c = controller(source);
        c.plot(Symbol::EurUsd);
        c.block_until_settled().unwrap();

        c.plot(Symbol::GbpJpy);
        c.dispatch(ChartCommand::Clear);
        release.send(()).unwrap();

        assert!(!c.is_loading());
        assert_eq!(c.block_until_settled().unwrap(), None);
        assert!(!c.pane().has_data());
        assert_eq!(c.current_symbol(), None);
        assert_eq!(c.last_outcome(), Some(&PlotOutcome::Cleared));
        for pane in Pane::ALL {
            assert_eq!(c.pane().surface(pane).overlays().len(), 1);
        }
    }
}
