#![forbid(unsafe_code)]

//! Sequential layout engine.
//!
//! [`SequentialLayout`] owns the ordered key list, the size cache and the
//! position table of one container. Positions are derived: every mutation
//! (reorder, resize confirmation, order reset, container resize) rebuilds the
//! table synchronously from keys + cache.
//!
//! # Invariants
//!
//! 1. At most one entry of the table has stage [`Stage::Unknown`].
//! 2. Table entries appear in key order and their keys are unique.
//! 3. For fixed keys, cache and width, [`SequentialLayout::compute_layout`]
//!    produces the same table every time (it never writes to the cache).
//!
//! # Unknown probing
//!
//! An item without a cached size is emitted as an `Unknown` probe so the
//! renderer can mount and measure it. Only the first such item per pass is
//! emitted; later unmeasured keys are skipped until the probe resolves.
//! Measured items after the probe are still placed.
//!
//! # Ownership
//!
//! Readers borrow the table through [`SequentialLayout::positions`] for the
//! duration of a frame. Mutations go through [`LayoutRequest`]s or the
//! dedicated methods; nothing outside this type edits positions in place.

use rustc_hash::FxHashMap;
use sgrid_core::{ItemKey, LayoutMode, SortableOptions};

use crate::columns::{ColumnPlacer, column_count};
use crate::position::{ItemPosition, SizeEntry, Span, Stage};

/// Geometry parameters of a layout engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub mode: LayoutMode,
    pub gutter: f64,
    pub default_item_width: f64,
    pub default_item_height: f64,
    pub container_fallback_width: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::new(LayoutMode::List, &SortableOptions::default())
    }
}

impl LayoutParams {
    #[must_use]
    pub fn new(mode: LayoutMode, options: &SortableOptions) -> Self {
        Self {
            mode,
            gutter: options.gutter,
            default_item_width: options.default_item_width,
            default_item_height: options.default_item_height,
            container_fallback_width: options.container_fallback_width,
        }
    }
}

/// A mutation submitted to the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutRequest {
    /// Move `from` into `to`'s current slot.
    Shift { from: ItemKey, to: ItemKey },
    /// Replace the ordered key list.
    Reset(Vec<ItemKey>),
}

/// Masonry layout over an ordered key list.
#[derive(Debug, Clone)]
pub struct SequentialLayout {
    params: LayoutParams,
    container_width: f64,
    keys: Vec<ItemKey>,
    index: FxHashMap<ItemKey, usize>,
    positions: Vec<ItemPosition>,
    sizes: FxHashMap<ItemKey, SizeEntry>,
    columns: usize,
    content_height: f64,
}

impl Default for SequentialLayout {
    fn default() -> Self {
        Self::new(LayoutParams::default())
    }
}

impl SequentialLayout {
    #[must_use]
    pub fn new(params: LayoutParams) -> Self {
        Self {
            params,
            container_width: 0.0,
            keys: Vec::new(),
            index: FxHashMap::default(),
            positions: Vec::new(),
            sizes: FxHashMap::default(),
            columns: 1,
            content_height: 0.0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Ordered key list.
    #[must_use]
    pub fn keys(&self) -> &[ItemKey] {
        &self.keys
    }

    /// Current position table, in key order.
    #[must_use]
    pub fn positions(&self) -> &[ItemPosition] {
        &self.positions
    }

    #[must_use]
    pub fn position(&self, key: &ItemKey) -> Option<&ItemPosition> {
        self.positions.iter().find(|p| &p.key == key)
    }

    #[must_use]
    pub fn index_of(&self, key: &ItemKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    #[must_use]
    pub fn size_of(&self, key: &ItemKey) -> Option<&SizeEntry> {
        self.sizes.get(key)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Height of the tallest column.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Width used for column computation.
    #[must_use]
    pub fn effective_width(&self) -> f64 {
        if self.container_width > 0.0 {
            self.container_width
        } else {
            self.params.container_fallback_width
        }
    }

    /// Vertical spans indexed by key index; `None` where no position exists.
    #[must_use]
    pub fn spans(&self) -> Vec<Option<Span>> {
        let mut spans = vec![None; self.keys.len()];
        for p in &self.positions {
            if let Some(slot) = spans.get_mut(p.index) {
                let bottom = p.top + p.extent(self.params.default_item_height);
                *slot = Some(Span::new(p.top, bottom));
            }
        }
        spans
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Apply a submitted mutation. Returns `false` for a no-op request.
    pub fn apply(&mut self, request: LayoutRequest) -> bool {
        match request {
            LayoutRequest::Shift { from, to } => self.shift_positions(&from, &to),
            LayoutRequest::Reset(keys) => {
                self.reset_layout(keys);
                true
            }
        }
    }

    /// Update the container width. Recomputes when the value changes.
    pub fn set_container_width(&mut self, width: f64) -> bool {
        if (width - self.container_width).abs() < f64::EPSILON {
            return false;
        }
        self.container_width = width;
        self.compute_layout(None);
        true
    }

    /// Replace the ordered key list, drop cache entries for keys that left,
    /// and recompute.
    pub fn reset_layout<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = ItemKey>,
    {
        self.keys = keys.into_iter().collect();
        self.reindex();
        let index = &self.index;
        self.sizes.retain(|key, _| index.contains_key(key));
        tracing::debug!(message = "layout.reset", items = self.keys.len());
        self.compute_layout(None);
    }

    /// Record a measurement and recompute.
    ///
    /// Returns the key's new position, or `None` when the key is no longer
    /// tracked (removed by a concurrent reorder); that case is not an error.
    pub fn confirm_item_size(
        &mut self,
        width: f64,
        height: f64,
        key: &ItemKey,
        stage: Stage,
    ) -> Option<&ItemPosition> {
        if !self.index.contains_key(key) {
            tracing::trace!(message = "layout.confirm.untracked", key = %key);
            return None;
        }
        self.sizes.insert(
            key.clone(),
            SizeEntry {
                width,
                height,
                stage,
            },
        );
        self.compute_layout(Some(key));
        self.position(key)
    }

    /// Move `from` into the slot currently held by `to`, then recompute.
    ///
    /// Items between the two slots shift by one toward `from`'s old slot.
    /// Logs and returns `false` if either key is absent.
    pub fn shift_positions(&mut self, from: &ItemKey, to: &ItemKey) -> bool {
        let (Some(from_idx), Some(to_idx)) = (self.index_of(from), self.index_of(to)) else {
            tracing::warn!(
                message = "layout.shift.missing_key",
                from = %from,
                to = %to
            );
            return false;
        };
        if from_idx == to_idx {
            return false;
        }
        let key = self.keys.remove(from_idx);
        self.keys.insert(to_idx, key);

        if let Some(pos_from) = self.positions.iter().position(|p| &p.key == from) {
            let entry = self.positions.remove(pos_from);
            let pos_to = self
                .positions
                .iter()
                .position(|p| &p.key == to)
                .map(|i| if from_idx < to_idx { i + 1 } else { i })
                .unwrap_or(self.positions.len());
            self.positions.insert(pos_to, entry);
        }

        self.reindex();
        tracing::debug!(message = "layout.shift", from = %from, to = %to, from_idx, to_idx);
        self.compute_layout(None);
        true
    }

    /// Rebuild the position table from keys and the size cache.
    ///
    /// `just_measured` names the key whose size was confirmed in this call;
    /// it is the only key whose stage may be `Measured`/`Moved` on output.
    pub fn compute_layout(&mut self, just_measured: Option<&ItemKey>) {
        let p = self.params;
        let item_width = match p.mode {
            LayoutMode::List => self.effective_width(),
            LayoutMode::Grid => self
                .keys
                .iter()
                .find_map(|k| self.sizes.get(k))
                .map_or(p.default_item_width, |s| s.width),
        };
        self.columns = match p.mode {
            LayoutMode::List => 1,
            LayoutMode::Grid => column_count(self.effective_width(), item_width, p.gutter),
        };

        let mut placer = ColumnPlacer::new(self.columns, item_width, p.gutter);
        let mut positions = Vec::with_capacity(self.keys.len());
        let mut probe_emitted = false;

        for (index, key) in self.keys.iter().enumerate() {
            match self.sizes.get(key) {
                Some(size) => {
                    let stage = if just_measured == Some(key) {
                        size.stage.promoted()
                    } else {
                        Stage::Placed
                    };
                    let (left, top) = placer.place(size.height);
                    positions.push(ItemPosition {
                        key: key.clone(),
                        stage,
                        index,
                        left,
                        top,
                        width: Some(size.width),
                        height: Some(size.height),
                    });
                }
                None if !probe_emitted => {
                    probe_emitted = true;
                    let (left, top) = placer.place(p.default_item_height);
                    positions.push(ItemPosition {
                        key: key.clone(),
                        stage: Stage::Unknown,
                        index,
                        left,
                        top,
                        width: None,
                        height: None,
                    });
                }
                None => {}
            }
        }

        self.content_height = placer.content_height();
        self.positions = positions;
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.index.reserve(self.keys.len());
        for (i, key) in self.keys.iter().enumerate() {
            self.index.insert(key.clone(), i);
        }
    }
}
