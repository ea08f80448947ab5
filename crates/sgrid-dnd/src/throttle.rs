#![forbid(unsafe_code)]

//! One-sample-per-frame pointer throttle.
//!
//! Pointer moves arrive faster than frames. The throttle holds at most one
//! pending sample; a newer move overwrites it, so the frame always sees the
//! latest pointer position and never a backlog.

use sgrid_core::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameThrottle {
    pending: Option<Point>,
    dropped: u64,
}

impl FrameThrottle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a sample. Returns `true` when this request opened a new frame
    /// slot, `false` when it replaced a sample already waiting.
    pub fn offer(&mut self, point: Point) -> bool {
        let opened = self.pending.is_none();
        if !opened {
            self.dropped += 1;
        }
        self.pending = Some(point);
        opened
    }

    /// Take the sample for this frame.
    pub fn take(&mut self) -> Option<Point> {
        self.pending.take()
    }

    /// Drop any pending sample.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Samples overwritten before their frame ran.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
