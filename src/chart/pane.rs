use crate::chart::axis_link::{AxisLinkState, SharedAxisLink, TimeRange};
use crate::chart::candlestick::CandlestickLayer;
use crate::chart::primitives::{OverlayCorner, OverlayMarker};
use crate::chart::surface::{ChartSurface, PlotSurface};
use crate::chart::volatility::VolatilityLayer;
use crate::config::PLOT_CONFIG;
use crate::error::ChartError;

/// Identifies one of the two stacked plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Price,
    Volatility,
}

impl Pane {
    pub const ALL: [Pane; 2] = [Pane::Price, Pane::Volatility];
}

/// The price and volatility surfaces, sharing one time axis.
pub struct LinkedChartPane {
    link: SharedAxisLink,
    price: PlotSurface,
    volatility: PlotSurface,
}

impl Default for LinkedChartPane {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkedChartPane {
    pub fn new() -> Self {
        let link = AxisLinkState::new_shared();
        let price = PlotSurface::new("price", &link);
        let volatility = PlotSurface::new("volatility", &link);
        let mut pane = Self {
            link,
            price,
            volatility,
        };
        pane.restore_overlays();
        pane
    }

    pub fn surface(&self, pane: Pane) -> &PlotSurface {
        match pane {
            Pane::Price => &self.price,
            Pane::Volatility => &self.volatility,
        }
    }

    fn surface_mut(&mut self, pane: Pane) -> &mut PlotSurface {
        match pane {
            Pane::Price => &mut self.price,
            Pane::Volatility => &mut self.volatility,
        }
    }

    /// Revision of the shared axis; bumps on every range change.
    pub fn revision(&self) -> u64 {
        self.link.borrow().revision()
    }

    pub fn visible_range(&self) -> Option<TimeRange> {
        self.link.borrow().range()
    }

    pub fn has_data(&self) -> bool {
        !self.price.is_empty() || !self.volatility.is_empty()
    }

    pub fn set_pixel_width(&mut self, width: f32) {
        self.link.borrow_mut().set_pixel_width(width);
    }

    /// Sets the time range through one surface; the other follows before this returns.
    pub fn set_visible_range(&mut self, pane: Pane, range: TimeRange) -> Result<(), ChartError> {
        self.surface_mut(pane).set_visible_range(range)
    }

    /// Takes a range reported by the plotting widget after a drag or scroll.
    ///
    /// Unlike [`Self::set_visible_range`] this never fails on user input: a span
    /// narrower than `min_visible_span_secs` (zero included) is widened around its
    /// centre, and non-finite or inverted bounds are dropped with a warning.
    pub fn set_visible_range_clamped(
        &mut self,
        pane: Pane,
        min: f64,
        max: f64,
    ) -> Result<(), ChartError> {
        if !min.is_finite() || !max.is_finite() || max < min {
            log::warn!("Ignoring unusable plot range [{}, {}]", min, max);
            return Ok(());
        }
        let span = (max - min).max(PLOT_CONFIG.min_visible_span_secs);
        let centre = min + (max - min) / 2.0;
        self.set_visible_range(pane, TimeRange::new(centre - span / 2.0, centre + span / 2.0)?)
    }

    pub fn pan_by(&mut self, delta_secs: f64) -> Result<(), ChartError> {
        let Some(range) = self.visible_range() else {
            return Ok(());
        };
        let shifted = range.shifted(delta_secs)?;
        self.price.set_visible_range(shifted)
    }

    /// `factor > 1` zooms in around `anchor` (a time), `factor < 1` zooms out.
    pub fn zoom_around(&mut self, factor: f64, anchor: f64) -> Result<(), ChartError> {
        let Some(range) = self.visible_range() else {
            return Ok(());
        };
        let zoomed = range.zoomed(factor, anchor, PLOT_CONFIG.min_visible_span_secs)?;
        self.price.set_visible_range(zoomed)
    }

    /// Same as [`Self::zoom_around`] with the anchor given as a pixel offset in the plot area.
    pub fn zoom_around_pixel(&mut self, factor: f64, px: f32) -> Result<(), ChartError> {
        let anchor = self.link.borrow().pixel_to_time(px);
        match anchor {
            Some(anchor) => self.zoom_around(factor, anchor),
            None => Ok(()),
        }
    }

    /// Pans by a horizontal distance in screen points; positive moves the view earlier.
    pub fn pan_by_pixels(&mut self, dx: f32) -> Result<(), ChartError> {
        let delta = {
            let link = self.link.borrow();
            match (link.pixel_to_time(0.0), link.pixel_to_time(dx)) {
                (Some(origin), Some(moved)) => moved - origin,
                _ => return Ok(()),
            }
        };
        self.pan_by(-delta)
    }

    /// Fits the shared time axis to the union of both surfaces' data.
    /// With no data the view is left alone.
    pub fn reset_view(&mut self) -> Result<(), ChartError> {
        let extent = match (self.price.data_extent(), self.volatility.data_extent()) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        };
        match extent {
            Some(range) => self.price.set_visible_range(range),
            None => Ok(()),
        }
    }

    /// Swaps both data layers in one step, then fits the view to the new data.
    pub fn apply(
        &mut self,
        candles: CandlestickLayer,
        volatility: VolatilityLayer,
    ) -> Result<(), ChartError> {
        self.price.replace_primitives(candles.into_primitives());
        self.volatility
            .replace_primitives(volatility.into_primitives());
        self.reset_view()
    }

    /// Removes candles and the volatility curve from both surfaces.
    /// The time axis stays where it is and the overlay labels are reattached.
    pub fn clear(&mut self) {
        for pane in Pane::ALL {
            self.surface_mut(pane).clear_primitives();
        }
        self.restore_overlays();
    }

    /// Attaches the "Price" and "Volatility" labels; safe to call any number of times.
    pub fn restore_overlays(&mut self) {
        self.price.attach_overlay(OverlayMarker::new(
            "price_label",
            "Price",
            OverlayCorner::RightTop,
        ));
        self.volatility.attach_overlay(OverlayMarker::new(
            "volatility_label",
            "Volatility",
            OverlayCorner::RightTop,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::candlestick::CandlestickRenderer;
    use crate::chart::volatility::VolatilityRenderer;
    use crate::domain::{PriceBar, PriceSeries};
    use chrono::{Days, NaiveDate};

    fn series(n: u64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 1.2 + 0.003 * ((i % 7) as f64) - 0.001 * ((i % 3) as f64);
                PriceBar::new(start + Days::new(i), c - 0.001, c + 0.004, c - 0.004, c)
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn plotted_pane(n: u64) -> LinkedChartPane {
        let s = series(n);
        let candles = CandlestickRenderer::default().build(&s).unwrap();
        let vol = VolatilityRenderer::new(5).unwrap().build(&s).unwrap();
        let mut pane = LinkedChartPane::new();
        pane.apply(candles, vol).unwrap();
        pane
    }

    #[test]
    fn either_surface_drives_the_shared_range() {
        let mut pane = plotted_pane(40);
        for driver in Pane::ALL {
            let current = pane.visible_range().unwrap();
            let range = TimeRange::new(current.min + 86_400.0, current.max - 86_400.0).unwrap();
            pane.set_visible_range(driver, range).unwrap();
            assert_eq!(pane.surface(Pane::Price).visible_range(), Some(range));
            assert_eq!(pane.surface(Pane::Volatility).visible_range(), Some(range));
        }
    }

    #[test]
    fn pan_and_zoom_move_both_surfaces() {
        let mut pane = plotted_pane(40);
        let before = pane.visible_range().unwrap();

        pane.pan_by(86_400.0 * 3.0).unwrap();
        let panned = pane.visible_range().unwrap();
        assert!((panned.min - before.min - 86_400.0 * 3.0).abs() < 1e-6);

        pane.zoom_around(2.0, panned.min + panned.span() / 2.0).unwrap();
        let zoomed = pane.surface(Pane::Volatility).visible_range().unwrap();
        assert!((zoomed.span() - panned.span() / 2.0).abs() < 1e-6);
        assert_eq!(pane.surface(Pane::Price).visible_range(), Some(zoomed));
    }

    #[test]
    fn widget_ranges_narrower_than_the_minimum_are_widened() {
        let mut pane = plotted_pane(40);
        let t = pane.visible_range().unwrap().min + 86_400.0 * 10.0;

        pane.set_visible_range_clamped(Pane::Volatility, t, t + 1.0)
            .unwrap();
        let range = pane.visible_range().unwrap();
        assert!((range.span() - PLOT_CONFIG.min_visible_span_secs).abs() < 1e-6);
        assert!((range.min + range.span() / 2.0 - (t + 0.5)).abs() < 1e-6);
        assert_eq!(pane.surface(Pane::Price).visible_range(), Some(range));
    }

    #[test]
    fn collapsed_widget_range_is_not_fatal() {
        let mut pane = plotted_pane(40);
        let t = pane.visible_range().unwrap().min;

        pane.set_visible_range_clamped(Pane::Price, t, t).unwrap();
        let range = pane.visible_range().unwrap();
        assert!((range.span() - PLOT_CONFIG.min_visible_span_secs).abs() < 1e-6);

        pane.set_visible_range_clamped(Pane::Price, f64::NAN, t)
            .unwrap();
        pane.set_visible_range_clamped(Pane::Price, t + 5.0, t)
            .unwrap();
        assert_eq!(pane.visible_range(), Some(range));
    }

    #[test]
    fn pixel_pan_moves_by_the_matching_time() {
        let mut pane = plotted_pane(40);
        let before = pane.visible_range().unwrap();
        assert!(pane.pan_by_pixels(50.0).is_ok());
        assert_eq!(pane.visible_range(), Some(before), "no width known yet");

        pane.set_pixel_width(100.0);
        pane.pan_by_pixels(50.0).unwrap();
        let after = pane.visible_range().unwrap();
        assert!((before.min - after.min - before.span() / 2.0).abs() < 1e-6);
        assert!((after.span() - before.span()).abs() < 1e-6);
    }

    #[test]
    fn zoom_by_pixel_needs_a_known_width() {
        let mut pane = plotted_pane(40);
        let before = pane.visible_range();
        pane.zoom_around_pixel(2.0, 100.0).unwrap();
        assert_eq!(pane.visible_range(), before);

        pane.set_pixel_width(400.0);
        pane.zoom_around_pixel(2.0, 0.0).unwrap();
        let after = pane.visible_range().unwrap();
        assert!((after.min - before.unwrap().min).abs() < 1e-6, "left edge anchored");
    }

    #[test]
    fn invalid_range_is_fatal_and_changes_nothing() {
        let mut pane = plotted_pane(10);
        let before = pane.visible_range();
        let err = pane
            .set_visible_range(Pane::Volatility, TimeRange { min: 2.0, max: 2.0 })
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(pane.visible_range(), before);
    }

    #[test]
    fn vertical_axes_scale_independently() {
        let pane = plotted_pane(40);
        let (price_lo, _) = pane.surface(Pane::Price).y_bounds().unwrap();
        let (vol_lo, vol_hi) = pane.surface(Pane::Volatility).y_bounds().unwrap();
        assert!(price_lo > 1.0);
        assert!(vol_lo <= 0.0 && vol_hi < 0.1);
    }

    #[test]
    fn clearing_twice_keeps_exactly_one_overlay_per_surface() {
        let mut pane = plotted_pane(20);
        let range = pane.visible_range();

        pane.clear();
        pane.clear();

        for p in Pane::ALL {
            assert!(pane.surface(p).is_empty());
            assert_eq!(pane.surface(p).overlays().len(), 1);
        }
        assert_eq!(pane.visible_range(), range, "axis survives a clear");
    }

    #[test]
    fn overlays_pin_to_the_visible_right_top_corner() {
        let mut pane = plotted_pane(30);
        let range = TimeRange::new(
            pane.visible_range().unwrap().min,
            pane.visible_range().unwrap().min + 86_400.0 * 10.0,
        )
        .unwrap();
        pane.set_visible_range(Pane::Price, range).unwrap();

        let anchors = pane.surface(Pane::Price).overlay_anchors();
        assert_eq!(anchors.len(), 1);
        let (marker, [x, y]) = anchors[0];
        assert_eq!(marker.text, "Price");
        assert_eq!(x, range.max);
        assert_eq!(y, pane.surface(Pane::Price).y_bounds().unwrap().1);
    }

    #[test]
    fn apply_fits_the_view_to_the_data() {
        let pane = plotted_pane(15);
        let extent = pane.surface(Pane::Price).data_extent().unwrap();
        assert_eq!(pane.visible_range(), Some(extent));
    }
}
