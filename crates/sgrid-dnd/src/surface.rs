#![forbid(unsafe_code)]

//! Contracts with the host rendering layer.
//!
//! - [`ContainerGeometry`]: where a container sits on the page and how far it
//!   is scrolled.
//! - [`ElementRegistry`]: which item keys currently have a mounted element.
//! - [`PointerSource`]: the input surface the board drains pointer events
//!   from. Moves and releases are document-scoped so a drag keeps tracking
//!   the pointer outside its origin container.

use std::collections::VecDeque;

use ahash::AHashSet;
use sgrid_core::{InputEvent, ItemKey, Rect};

/// Page placement and scroll state of one container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerGeometry {
    /// Visible box of the container in page coordinates.
    pub rect: Rect,
    pub scroll_top: f64,
    /// Full scrollable content height.
    pub scroll_height: f64,
    /// Visible content height.
    pub client_height: f64,
}

impl ContainerGeometry {
    /// Geometry for a container at `rect` whose content fits without scrolling.
    #[must_use]
    pub fn fixed(rect: Rect) -> Self {
        Self {
            rect,
            scroll_top: 0.0,
            scroll_height: rect.height,
            client_height: rect.height,
        }
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll_top: f64, scroll_height: f64) -> Self {
        self.scroll_top = scroll_top;
        self.scroll_height = scroll_height;
        self
    }

    /// Height of the visible viewport, falling back to the box height.
    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        if self.client_height > 0.0 {
            self.client_height
        } else {
            self.rect.height
        }
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.viewport_height()).max(0.0)
    }

    #[must_use]
    pub fn at_top(&self) -> bool {
        self.scroll_top <= 0.0
    }

    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.scroll_top >= self.max_scroll()
    }
}

/// Keys with a mounted element.
///
/// Written by the rendering layer, read by the drag engine. Lookups for
/// keys that are not (yet) mounted are expected and must be tolerated.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    mounted: AHashSet<ItemKey>,
}

impl ElementRegistry {
    pub fn mount(&mut self, key: ItemKey) -> bool {
        self.mounted.insert(key)
    }

    pub fn unmount(&mut self, key: &ItemKey) -> bool {
        self.mounted.remove(key)
    }

    #[must_use]
    pub fn is_mounted(&self, key: &ItemKey) -> bool {
        self.mounted.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }
}

/// One event from the input surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// Pointer pressed on an item of a container (item-scoped listener).
    ItemDown {
        container: String,
        key: ItemKey,
        event: InputEvent,
    },
    /// Pointer moved anywhere on the surface.
    Move(InputEvent),
    /// Pointer released anywhere on the surface.
    Up(InputEvent),
}

/// Source of surface events.
pub trait PointerSource {
    /// Next queued event, or `None` when drained.
    fn next_event(&mut self) -> Option<SurfaceEvent>;
}

/// In-memory event queue, for tests and replay.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPointerSource {
    queue: VecDeque<SurfaceEvent>,
}

impl ScriptedPointerSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SurfaceEvent) {
        self.queue.push_back(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl FromIterator<SurfaceEvent> for ScriptedPointerSource {
    fn from_iter<I: IntoIterator<Item = SurfaceEvent>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

impl PointerSource for ScriptedPointerSource {
    fn next_event(&mut self) -> Option<SurfaceEvent> {
        self.queue.pop_front()
    }
}
