use std::cell::RefCell;
use std::rc::Rc;

use crate::chart::axis_link::{SharedAxisLink, SharedViewport, TimeRange, Viewport};
use crate::chart::primitives::{OverlayMarker, Primitive};
use crate::config::PLOT_CONFIG;
use crate::error::ChartError;
use crate::utils::maths_utils;

/// What a renderer needs from a chart surface.
pub trait ChartSurface {
    fn add_primitive(&mut self, primitive: Primitive);

    /// Drops every data primitive. Overlays and the viewport are untouched.
    fn clear_primitives(&mut self);

    fn visible_range(&self) -> Option<TimeRange>;

    fn set_visible_range(&mut self, range: TimeRange) -> Result<(), ChartError>;

    /// Swaps in a complete data layer in one step.
    fn replace_primitives(&mut self, primitives: Vec<Primitive>) {
        self.clear_primitives();
        for primitive in primitives {
            self.add_primitive(primitive);
        }
    }
}

/// Retained chart surface: a data layer, an overlay layer and a linked viewport.
/// The UI reads it every frame; nothing here knows about egui.
#[derive(Debug)]
pub struct PlotSurface {
    name: &'static str,
    primitives: Vec<Primitive>,
    overlays: Vec<OverlayMarker>,
    viewport: SharedViewport,
    link: SharedAxisLink,
}

impl PlotSurface {
    pub fn new(name: &'static str, link: &SharedAxisLink) -> Self {
        let viewport: SharedViewport = Rc::new(RefCell::new(Viewport::default()));
        link.borrow_mut().register(&viewport);
        Self {
            name,
            primitives: Vec::new(),
            overlays: Vec::new(),
            viewport,
            link: Rc::clone(link),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn overlays(&self) -> &[OverlayMarker] {
        &self.overlays
    }

    /// Attaches a marker, replacing any marker with the same id.
    pub fn attach_overlay(&mut self, marker: OverlayMarker) {
        match self.overlays.iter_mut().find(|m| m.id == marker.id) {
            Some(existing) => *existing = marker,
            None => self.overlays.push(marker),
        }
    }

    /// Horizontal span of all data on this surface.
    pub fn data_extent(&self) -> Option<TimeRange> {
        self.primitives
            .iter()
            .filter_map(Primitive::x_extent)
            .fold(None, |acc: Option<(f64, f64)>, (lo, hi)| match acc {
                Some((a, b)) => Some((a.min(lo), b.max(hi))),
                None => Some((lo, hi)),
            })
            .and_then(|(lo, hi)| TimeRange::new(lo, hi).ok())
    }

    /// Vertical bounds for the current view: the data visible in the shared time
    /// range, or all data when nothing is visible. Padded on both sides.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let visible = self.visible_range();
        let mut values: Vec<f64> = self
            .primitives
            .iter()
            .flat_map(|p| p.y_values_within(visible))
            .collect();
        if values.is_empty() {
            values = self
                .primitives
                .iter()
                .flat_map(|p| p.y_values_within(None))
                .collect();
        }
        let includes_zero = self
            .primitives
            .iter()
            .any(|p| matches!(p, Primitive::Volatility(_)));
        if includes_zero {
            // The volatility fill runs down to 0
            values.push(0.0);
        }
        let (min, max) = maths_utils::get_min_max(&values)?;
        Some(maths_utils::pad_bounds(
            min,
            max,
            PLOT_CONFIG.y_padding_fraction,
        ))
    }

    /// Overlay markers with their plot-space anchors for the current view.
    pub fn overlay_anchors(&self) -> Vec<(&OverlayMarker, [f64; 2])> {
        let (Some(x), Some(y)) = (self.visible_range(), self.y_bounds()) else {
            return Vec::new();
        };
        self.overlays.iter().map(|m| (m, m.anchor(x, y))).collect()
    }
}

impl ChartSurface for PlotSurface {
    fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    fn clear_primitives(&mut self) {
        self.primitives.clear();
    }

    fn visible_range(&self) -> Option<TimeRange> {
        self.viewport.borrow().x
    }

    fn set_visible_range(&mut self, range: TimeRange) -> Result<(), ChartError> {
        // Re-validate: a TimeRange built with a struct literal skips `new`
        let range = TimeRange::new(range.min, range.max)?;
        self.link.borrow_mut().publish(range);
        Ok(())
    }

    fn replace_primitives(&mut self, primitives: Vec<Primitive>) {
        self.primitives = primitives;
    }
}
