#![forbid(unsafe_code)]

//! Long-press detection.
//!
//! A press on a sortable item arms a timer. The timer is polled from the
//! host tick; if it elapses while the pointer stayed within tolerance of the
//! press origin, the press fires once and the caller starts a drag.
//!
//! # Invariants
//!
//! 1. A press fires at most once.
//! 2. Movement beyond tolerance before firing cancels the press for good;
//!    movement after firing is ignored here (the drag owns it).
//! 3. A new press replaces the previous one, cancelling its timer.
//! 4. Release always clears the press and reports whether it had fired, so
//!    the caller can tell a click from the end of a drag.

use std::time::Duration;

use sgrid_core::{ItemKey, Point};
use web_time::Instant;

/// An in-flight press.
#[derive(Debug, Clone, PartialEq)]
pub struct Press {
    pub key: ItemKey,
    pub origin: Point,
    pub started_at: Instant,
    /// False when the press may only become a click (not sortable, or the
    /// target missed the drag handle).
    pub can_drag: bool,
    pub cancelled: bool,
    pub fired: bool,
}

/// Stateful long-press detector.
#[derive(Debug, Clone)]
pub struct LongPress {
    delay: Duration,
    tolerance: f64,
    press: Option<Press>,
}

impl LongPress {
    #[must_use]
    pub fn new(delay: Duration, tolerance: f64) -> Self {
        Self {
            delay,
            tolerance,
            press: None,
        }
    }

    /// Arm a new press.
    pub fn begin(&mut self, key: ItemKey, origin: Point, now: Instant, can_drag: bool) {
        if let Some(prev) = self.press.as_ref()
            && !prev.fired
        {
            tracing::trace!(message = "press.replaced", key = %prev.key);
        }
        self.press = Some(Press {
            key,
            origin,
            started_at: now,
            can_drag,
            cancelled: false,
            fired: false,
        });
    }

    /// Observe pointer movement. Returns `true` if this move cancelled the press.
    pub fn track(&mut self, point: Point) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        if press.fired || press.cancelled {
            return false;
        }
        let dx = (point.x - press.origin.x).abs();
        let dy = (point.y - press.origin.y).abs();
        if dx > self.tolerance || dy > self.tolerance {
            press.cancelled = true;
            tracing::debug!(message = "press.cancelled", key = %press.key, dx, dy);
            return true;
        }
        false
    }

    /// Fire the press if its delay has elapsed. Returns the key and the
    /// press origin exactly once.
    pub fn poll(&mut self, now: Instant) -> Option<(ItemKey, Point)> {
        let press = self.press.as_mut()?;
        if press.fired || press.cancelled || !press.can_drag {
            return None;
        }
        if now.duration_since(press.started_at) < self.delay {
            return None;
        }
        press.fired = true;
        Some((press.key.clone(), press.origin))
    }

    /// Clear and return the press.
    pub fn release(&mut self) -> Option<Press> {
        self.press.take()
    }

    /// Drop any press without reporting it.
    pub fn reset(&mut self) {
        self.press = None;
    }

    #[must_use]
    pub fn pending(&self) -> Option<&Press> {
        self.press.as_ref()
    }
}
