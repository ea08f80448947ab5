#![forbid(unsafe_code)]

//! Position table entries and size cache records.

use serde::{Deserialize, Serialize};
use sgrid_core::ItemKey;

/// Lifecycle of an item's placement.
///
/// `Unknown` items have never been measured; at most one is emitted per
/// layout pass. `Measured` and `Moved` are transitional stages the renderer
/// uses to fade/slide an item into its slot; `Placed` is at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Unknown,
    Measured,
    Moved,
    Placed,
}

impl Stage {
    /// Stage emitted for an item whose size was just confirmed with `self`.
    #[must_use]
    pub const fn promoted(self) -> Stage {
        match self {
            Stage::Measured => Stage::Moved,
            _ => Stage::Placed,
        }
    }
}

/// One entry of the position table.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPosition {
    pub key: ItemKey,
    pub stage: Stage,
    /// Index in the ordered key list.
    pub index: usize,
    pub left: f64,
    pub top: f64,
    /// Absent until the item has been measured.
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ItemPosition {
    /// Height used for vertical extent, substituting `default` for unmeasured items.
    #[must_use]
    pub fn extent(&self, default: f64) -> f64 {
        self.height.unwrap_or(default)
    }
}

/// Cached measurement of an item, keyed by its [`ItemKey`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeEntry {
    pub width: f64,
    pub height: f64,
    pub stage: Stage,
}

/// Vertical span of one item, for virtual windowing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    /// Exclusive bottom edge.
    pub bottom: f64,
}

impl Span {
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Whether the span overlaps the half-open range `[from, to)`.
    #[must_use]
    pub fn intersects(&self, from: f64, to: f64) -> bool {
        self.top < to && self.bottom > from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_rules() {
        assert_eq!(Stage::Measured.promoted(), Stage::Moved);
        assert_eq!(Stage::Moved.promoted(), Stage::Placed);
        assert_eq!(Stage::Placed.promoted(), Stage::Placed);
        assert_eq!(Stage::Unknown.promoted(), Stage::Placed);
    }

    #[test]
    fn span_intersection_is_half_open() {
        let s = Span::new(100.0, 150.0);
        assert!(s.intersects(0.0, 101.0));
        assert!(!s.intersects(0.0, 100.0));
        assert!(!s.intersects(150.0, 300.0));
        assert!(s.intersects(149.0, 300.0));
    }
}
