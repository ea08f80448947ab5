#![forbid(unsafe_code)]

//! Virtual window calculation.
//!
//! Given a scroll offset, a viewport height and the (possibly partial)
//! position table, [`compute_window`] returns the half-open index range that
//! must be rendered. [`VirtualWindow`] wraps it with scroll debouncing.
//!
//! # Search keys
//!
//! Tops never decrease with the index: shortest-column placement never
//! lowers the minimum column height. Bottoms do not share that property in
//! grid mode (a tall item in one column precedes many short items in
//! another), so the start search runs over the running maximum of bottoms
//! instead of the bottoms themselves.
//!
//! # Partial tables
//!
//! Span lookups are by key index and may be `None` (item not yet
//! positioned). A missing entry before the last known one takes the top of
//! the nearest known entry before it and adds nothing to the running bottom.
//! Missing entries past the last known one are treated as lying below the
//! viewport.
//!
//! # Invariants
//!
//! 1. `0 <= start <= end <= item_count`.
//! 2. In list and grid mode alike, every item whose span intersects
//!    `[scroll_top, scroll_top + viewport_height)` is inside the returned
//!    range.
//! 3. At scroll offset zero, `start == 0`.

use std::ops::Range;
use std::time::Duration;

use web_time::Instant;

use crate::position::Span;

/// Inputs to one window computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowQuery {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub item_count: usize,
    pub buffer: usize,
}

/// Compute the render range for `query` over `spans` (indexed by item index).
#[must_use]
pub fn compute_window(query: &WindowQuery, spans: &[Option<Span>]) -> Range<usize> {
    let n = query.item_count;
    if n == 0 {
        return 0..0;
    }
    let view_top = query.scroll_top;
    let view_bottom = query.scroll_top + query.viewport_height.max(0.0);
    let table = SearchKeys::new(spans, n);

    // First index whose running bottom reaches into the viewport.
    let first = table.reach.partition_point(|&bottom| bottom <= view_top);
    // First index entirely below the viewport.
    let end_visible = table.tops.partition_point(|&top| top < view_bottom).max(first);

    let mut start = first.saturating_sub(query.buffer);
    let end = end_visible.saturating_add(query.buffer).min(n);
    if query.scroll_top <= 0.0 {
        start = 0;
    }
    start.min(end)..end
}

/// Monotone search keys derived from a partial span table.
struct SearchKeys {
    /// Top edge per index, non-decreasing.
    tops: Vec<f64>,
    /// Largest bottom edge among indices `0..=i`.
    reach: Vec<f64>,
}

impl SearchKeys {
    fn new(spans: &[Option<Span>], n: usize) -> Self {
        let spans = &spans[..spans.len().min(n)];
        let last_known = spans.iter().rposition(Option::is_some);
        let mut tops = Vec::with_capacity(n);
        let mut reach = Vec::with_capacity(n);
        let mut top = 0.0_f64;
        let mut bottom = 0.0_f64;
        for i in 0..n {
            match spans.get(i).copied().flatten() {
                Some(span) => {
                    top = span.top;
                    bottom = bottom.max(span.bottom);
                }
                None if last_known.is_some_and(|last| i < last) => {}
                None => {
                    top = f64::INFINITY;
                    bottom = f64::INFINITY;
                }
            }
            tops.push(top);
            reach.push(bottom);
        }
        Self { tops, reach }
    }
}

/// Debounced virtual window state of one container.
///
/// The first scroll event after a quiet period recomputes immediately; further
/// scroll and resize events are suppressed while the debounce window is open,
/// and exactly one recomputation fires when it closes.
#[derive(Debug, Clone)]
pub struct VirtualWindow {
    buffer: usize,
    debounce: Duration,
    scroll_top: f64,
    viewport_height: f64,
    scrolling_until: Option<Instant>,
    range: Range<usize>,
}

impl VirtualWindow {
    #[must_use]
    pub fn new(buffer: usize, debounce: Duration) -> Self {
        Self {
            buffer,
            debounce,
            scroll_top: 0.0,
            viewport_height: 0.0,
            scrolling_until: None,
            range: 0..0,
        }
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scrolling_until.is_some()
    }

    /// Record a scroll. Returns whether the window should recompute now.
    pub fn note_scroll(&mut self, now: Instant, scroll_top: f64) -> bool {
        self.scroll_top = scroll_top;
        let was_scrolling = self.is_scrolling();
        self.scrolling_until = Some(now + self.debounce);
        !was_scrolling
    }

    /// Record a viewport resize. Returns whether the window should recompute now.
    pub fn note_resize(&mut self, viewport_height: f64) -> bool {
        let changed = (viewport_height - self.viewport_height).abs() > f64::EPSILON;
        self.viewport_height = viewport_height;
        changed && !self.is_scrolling()
    }

    /// Close the debounce window if it has elapsed. Returns `true` exactly
    /// once per closed window, signalling the trailing recomputation.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.scrolling_until {
            Some(deadline) if now >= deadline => {
                self.scrolling_until = None;
                true
            }
            _ => false,
        }
    }

    /// Recompute and store the range.
    pub fn update(&mut self, spans: &[Option<Span>], item_count: usize) -> Range<usize> {
        let query = WindowQuery {
            scroll_top: self.scroll_top,
            viewport_height: self.viewport_height,
            item_count,
            buffer: self.buffer,
        };
        self.range = compute_window(&query, spans);
        tracing::trace!(
            message = "window.update",
            start = self.range.start,
            end = self.range.end,
            item_count
        );
        self.range.clone()
    }
}
