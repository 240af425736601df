//! Shared horizontal viewport for the two chart surfaces.
//!
//! Each surface owns a [`Viewport`] and registers it with one [`AxisLinkState`].
//! Every change goes through [`AxisLinkState::publish`], which writes the new
//! range into every registered viewport before returning, so no caller can
//! observe the surfaces with different time ranges.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::error::ChartError;

/// A closed time interval in chart units (UNIX seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ChartError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ChartError::InvalidAxisRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.min && t <= self.max
    }

    pub fn overlaps(&self, lo: f64, hi: f64) -> bool {
        hi >= self.min && lo <= self.max
    }

    pub fn union(&self, other: &TimeRange) -> TimeRange {
        TimeRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn shifted(&self, delta: f64) -> Result<TimeRange, ChartError> {
        TimeRange::new(self.min + delta, self.max + delta)
    }

    /// Scales the span by `1 / factor` keeping `anchor` at the same relative position.
    /// `factor > 1` zooms in. The span never drops below `min_span`.
    pub fn zoomed(&self, factor: f64, anchor: f64, min_span: f64) -> Result<TimeRange, ChartError> {
        if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
            return Err(ChartError::InvalidAxisRange {
                min: self.min,
                max: self.max,
            });
        }
        let new_span = (self.span() / factor).max(min_span);
        let rel = ((anchor - self.min) / self.span()).clamp(0.0, 1.0);
        let min = anchor - rel * new_span;
        TimeRange::new(min, min + new_span)
    }
}

/// One surface's copy of the horizontal viewport.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    pub x: Option<TimeRange>,
    /// Link revision this viewport was last written at
    pub revision: u64,
}

pub type SharedViewport = Rc<RefCell<Viewport>>;
pub type SharedAxisLink = Rc<RefCell<AxisLinkState>>;

/// The horizontal viewport shared by every surface of one pane.
#[derive(Debug, Default)]
pub struct AxisLinkState {
    range: Option<TimeRange>,
    /// Width of the plot area in screen points (both panes share the column)
    pixel_width: f32,
    revision: u64,
    observers: Vec<Weak<RefCell<Viewport>>>,
}

impl AxisLinkState {
    pub fn new_shared() -> SharedAxisLink {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Registers a viewport and brings it up to date with the current range.
    pub fn register(&mut self, viewport: &SharedViewport) {
        {
            let mut vp = viewport.borrow_mut();
            vp.x = self.range;
            vp.revision = self.revision;
        }
        self.observers.push(Rc::downgrade(viewport));
    }

    /// Sets the shared range and broadcasts it to every registered viewport.
    pub fn publish(&mut self, range: TimeRange) {
        self.range = Some(range);
        self.revision += 1;
        let revision = self.revision;

        self.observers.retain(|weak| match weak.upgrade() {
            Some(viewport) => {
                let mut vp = viewport.borrow_mut();
                vp.x = Some(range);
                vp.revision = revision;
                true
            }
            None => false,
        });

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_axis_link_updates {
            log::info!(
                "axis link r{} -> [{:.0}, {:.0}] ({} observers)",
                revision,
                range.min,
                range.max,
                self.observers.len()
            );
        }
    }

    pub fn range(&self) -> Option<TimeRange> {
        self.range
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn observer_count(&self) -> usize {
        self.observers.iter().filter(|w| w.strong_count() > 0).count()
    }

    pub fn set_pixel_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.pixel_width = width;
        }
    }

    pub fn pixel_width(&self) -> f32 {
        self.pixel_width
    }

    /// Time under horizontal pixel `px`, measured from the left edge of the plot area.
    pub fn pixel_to_time(&self, px: f32) -> Option<f64> {
        let range = self.range?;
        if self.pixel_width <= 0.0 {
            return None;
        }
        Some(range.min + (px as f64 / self.pixel_width as f64) * range.span())
    }
}
