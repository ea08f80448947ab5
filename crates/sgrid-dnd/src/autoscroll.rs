#![forbid(unsafe_code)]

//! Edge auto-scroll during a drag.
//!
//! While the pointer is within `threshold` pixels of the container's top or
//! bottom edge, the container scrolls every frame. Speed grows with a power
//! curve as the pointer approaches the edge, plus a constant floor so the
//! scroll never crawls at the zone boundary:
//!
//! ```text
//! proximity = min((threshold - distance) / threshold, 1)
//! speed     = max_speed · proximity^power + offset · max_speed
//! ```
//!
//! The sign is negative toward the top. Speed is zero outside both zones and
//! when the container already sits at the extreme it would scroll toward.

use sgrid_core::{Point, SortableOptions};

use crate::surface::ContainerGeometry;

/// Pixels per frame at `scroll_speed = 1`.
pub const BASE_MAX_SPEED: f64 = 50.0;

/// Auto-scroll tuning, derived from [`SortableOptions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScrollParams {
    pub max_speed: f64,
    pub threshold: f64,
    pub power: f64,
    pub min_offset_multiplier: f64,
}

impl From<&SortableOptions> for AutoScrollParams {
    fn from(o: &SortableOptions) -> Self {
        Self {
            max_speed: BASE_MAX_SPEED * o.scroll_speed,
            threshold: o.scroll_threshold,
            power: o.auto_scroll_proximity_power,
            min_offset_multiplier: o.auto_scroll_min_speed_offset_multiplier,
        }
    }
}

impl AutoScrollParams {
    fn edge_speed(&self, distance: f64) -> f64 {
        let proximity = ((self.threshold - distance) / self.threshold).min(1.0);
        self.max_speed * proximity.powf(self.power) + self.min_offset_multiplier * self.max_speed
    }
}

/// Scroll velocity (px/frame) for a pointer at `pointer` over `geometry`.
#[must_use]
pub fn scroll_speed(params: &AutoScrollParams, pointer: Point, geometry: &ContainerGeometry) -> f64 {
    if !(params.threshold > 0.0) {
        return 0.0;
    }
    let to_top = pointer.y - geometry.rect.top();
    if to_top <= params.threshold && !geometry.at_top() {
        return -params.edge_speed(to_top);
    }
    let to_bottom = geometry.rect.bottom() - pointer.y;
    if to_bottom <= params.threshold && !geometry.at_bottom() {
        return params.edge_speed(to_bottom);
    }
    0.0
}

/// Per-frame auto-scroll loop.
///
/// [`AutoScroller::update`] recomputes the speed from the latest pointer;
/// [`AutoScroller::on_frame`] yields the delta to apply this frame. The loop
/// starts when the speed becomes non-zero and stops itself on the first
/// frame that sees zero.
#[derive(Debug, Clone)]
pub struct AutoScroller {
    params: AutoScrollParams,
    speed: f64,
    running: bool,
}

impl AutoScroller {
    #[must_use]
    pub fn new(params: AutoScrollParams) -> Self {
        Self {
            params,
            speed: 0.0,
            running: false,
        }
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn update(&mut self, pointer: Point, geometry: &ContainerGeometry) {
        self.speed = scroll_speed(&self.params, pointer, geometry);
        if self.speed != 0.0 && !self.running {
            self.running = true;
            tracing::debug!(message = "autoscroll.start", speed = self.speed);
        }
    }

    pub fn stop(&mut self) {
        self.speed = 0.0;
        self.running = false;
    }

    /// Delta to scroll by this frame, or `None` once the loop has stopped.
    pub fn on_frame(&mut self) -> Option<f64> {
        if !self.running {
            return None;
        }
        if self.speed == 0.0 {
            self.running = false;
            tracing::debug!(message = "autoscroll.stop");
            return None;
        }
        Some(self.speed)
    }
}
