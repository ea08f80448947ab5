#![forbid(unsafe_code)]

//! The drag clone: a fixed-position proxy of the dragged item.
//!
//! There is one clone per board at most, held by [`DragLayer`]. Its tag is
//! how containers agree on ownership: `container_id` names the container
//! currently claiming the item and is re-read every frame, while
//! `origin_container`/`origin_index` stay fixed for the commit report.
//!
//! # Lifecycle
//!
//! ```text
//! New ──follow──▶ Active ──release──▶ Settling ──rest | timeout──▶ (removed)
//! ```
//!
//! Only an `Active` clone can be adopted by a sibling container.

use std::time::Duration;

use sgrid_core::animation::{Spring, SpringPoint};
use sgrid_core::{AnimationConfig, ItemKey, Point, Rect, Size};
use web_time::Instant;

use crate::order::SortableItem;

/// Clone lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloneLifecycle {
    New,
    Active,
    Settling,
}

#[derive(Debug, Clone)]
struct Settle {
    motion: SpringPoint,
    scale: Spring,
    last: Instant,
    deadline: Instant,
}

/// The dragged item's proxy and ownership tag.
#[derive(Debug, Clone)]
pub struct DragClone<T> {
    /// Container currently claiming the item.
    pub container_id: String,
    pub group_id: Option<String>,
    pub key: ItemKey,
    pub origin_container: String,
    pub origin_index: usize,
    /// Pointer offset within the item at drag start.
    pub offset: Point,
    pub lifecycle: CloneLifecycle,
    /// Renderable payload, carried for insertion into another container.
    pub item: SortableItem<T>,
    position: Point,
    size: Size,
    scale: f64,
    settle: Option<Settle>,
}

impl<T> DragClone<T> {
    /// Create a clone over `rect` for a drag that started in `container_id`.
    #[must_use]
    pub fn new(
        container_id: impl Into<String>,
        group_id: Option<String>,
        origin_index: usize,
        offset: Point,
        rect: Rect,
        scale: f64,
        item: SortableItem<T>,
    ) -> Self {
        let container_id = container_id.into();
        Self {
            origin_container: container_id.clone(),
            container_id,
            group_id,
            key: item.key.clone(),
            origin_index,
            offset,
            lifecycle: CloneLifecycle::New,
            item,
            position: rect.origin(),
            size: rect.size(),
            scale,
            settle: None,
        }
    }

    /// Top-left corner in page coordinates.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle == CloneLifecycle::Active
    }

    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.lifecycle == CloneLifecycle::Settling
    }

    /// Whether this clone and a container with `group_id` can exchange items.
    #[must_use]
    pub fn shares_group(&self, group_id: Option<&str>) -> bool {
        matches!((self.group_id.as_deref(), group_id), (Some(a), Some(b)) if a == b)
    }

    /// Track the pointer. A `New` clone becomes `Active`; a settling clone
    /// ignores the pointer.
    pub fn follow(&mut self, pointer: Point) {
        if self.is_settling() {
            return;
        }
        self.lifecycle = CloneLifecycle::Active;
        self.position = pointer.offset_from(self.offset);
    }

    /// Hand the claim over to `container_id`.
    pub fn retag(&mut self, container_id: &str) {
        self.container_id = container_id.to_owned();
    }

    /// Start the settle animation toward `target`. The animation is forced
    /// complete once `fallback` has elapsed.
    pub fn begin_settle(
        &mut self,
        target: Point,
        animation: &AnimationConfig,
        now: Instant,
        fallback: Duration,
    ) {
        self.lifecycle = CloneLifecycle::Settling;
        self.settle = Some(Settle {
            motion: SpringPoint::new(self.position, target, animation.tension, animation.friction),
            scale: Spring::new(self.scale, 1.0)
                .with_tension(animation.tension)
                .with_friction(animation.friction)
                .with_rest_threshold(0.001),
            last: now,
            deadline: now + fallback,
        });
    }

    /// Advance the settle animation to `now`. Returns `true` once the clone
    /// has come to rest or the fallback deadline has passed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(settle) = self.settle.as_mut() else {
            return false;
        };
        let dt = now.saturating_duration_since(settle.last);
        settle.last = now;
        settle.motion.advance(dt);
        settle.scale.advance(dt);
        self.position = settle.motion.position();
        self.scale = settle.scale.position();
        if settle.motion.is_at_rest() && settle.scale.is_at_rest() {
            tracing::trace!(message = "clone.settle.rest", key = %self.key);
            return true;
        }
        if now >= settle.deadline {
            tracing::debug!(message = "clone.settle.timeout", key = %self.key);
            return true;
        }
        false
    }
}

/// Overlay slot holding the board's single drag clone.
#[derive(Debug, Clone)]
pub struct DragLayer<T> {
    clone: Option<DragClone<T>>,
}

impl<T> Default for DragLayer<T> {
    fn default() -> Self {
        Self { clone: None }
    }
}

impl<T> DragLayer<T> {
    #[must_use]
    pub fn get(&self) -> Option<&DragClone<T>> {
        self.clone.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut DragClone<T>> {
        self.clone.as_mut()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clone.is_none()
    }

    /// Put `clone` in the slot, replacing any previous one.
    pub fn insert(&mut self, clone: DragClone<T>) -> &mut DragClone<T> {
        self.clone.insert(clone)
    }

    pub fn clear(&mut self) -> Option<DragClone<T>> {
        self.clone.take()
    }
}
