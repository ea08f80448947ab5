#![forbid(unsafe_code)]

//! The board: sibling containers sharing one drag layer and one pointer.
//!
//! The host drives the board from its event loop:
//!
//! | Host event                | Board call                      |
//! |---------------------------|---------------------------------|
//! | item pointer-down         | [`SortableBoard::pointer_down`] |
//! | document pointer-move     | [`SortableBoard::pointer_move`] |
//! | document pointer-up       | [`SortableBoard::pointer_up`]   |
//! | timer / idle callback     | [`SortableBoard::tick`]         |
//! | animation frame           | [`SortableBoard::frame`]        |
//!
//! or drains an injected [`PointerSource`] with [`SortableBoard::pump`].
//!
//! # Frame order
//!
//! 1. Each container processes its latest pointer sample. Right after each
//!    one, every container reconciles against the clone's tag, so a handoff
//!    completes within the frame it happened in.
//! 2. Auto-scroll steps.
//! 3. The settle animation advances; when it completes the clone is removed
//!    and the owning container ends its drag.

use sgrid_core::{InputEvent, ItemKey, extract_coordinates};
use web_time::Instant;

use crate::clone::{DragClone, DragLayer};
use crate::container::SortableContainer;
use crate::error::DndError;
use crate::surface::{PointerSource, SurfaceEvent};

/// Containers plus the shared drag layer.
#[derive(Debug)]
pub struct SortableBoard<T> {
    containers: Vec<SortableContainer<T>>,
    layer: DragLayer<T>,
}

impl<T> Default for SortableBoard<T> {
    fn default() -> Self {
        Self {
            containers: Vec::new(),
            layer: DragLayer::default(),
        }
    }
}

impl<T: Clone> SortableBoard<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container. Ids must be unique on the board.
    pub fn add(&mut self, container: SortableContainer<T>) -> Result<&mut SortableContainer<T>, DndError> {
        if self.position(container.id()).is_some() {
            return Err(DndError::DuplicateContainer(container.id().to_owned()));
        }
        let index = self.containers.len();
        self.containers.push(container);
        Ok(&mut self.containers[index])
    }

    #[must_use]
    pub fn container(&self, id: &str) -> Option<&SortableContainer<T>> {
        self.containers.iter().find(|c| c.id() == id)
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut SortableContainer<T>> {
        self.containers.iter_mut().find(|c| c.id() == id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &SortableContainer<T>> {
        self.containers.iter()
    }

    /// The drag clone, if a drag or settle is in progress.
    #[must_use]
    pub fn drag_clone(&self) -> Option<&DragClone<T>> {
        self.layer.get()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.containers.iter().position(|c| c.id() == id)
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Pointer-down on item `key` of `container`. Ignored while a clone
    /// exists.
    pub fn pointer_down(&mut self, container: &str, key: &ItemKey, event: &InputEvent, now: Instant) -> bool {
        if !self.layer.is_empty() {
            tracing::trace!(message = "press.ignored.busy", container, key = %key);
            return false;
        }
        let Some(index) = self.position(container) else {
            tracing::warn!(message = "press.unknown_container", container, key = %key);
            return false;
        };
        self.containers[index].pointer_down(key, event, now)
    }

    pub fn pointer_move(&mut self, event: &InputEvent) {
        let Some(point) = extract_coordinates(event) else {
            return;
        };
        for c in &mut self.containers {
            c.pointer_moved(point);
        }
    }

    /// Release. The drop lands wherever the clone currently sits; the
    /// release coordinates are not consulted.
    pub fn pointer_up(&mut self, event: &InputEvent, now: Instant) {
        tracing::trace!(message = "pointer.up", phase = ?event.phase());
        for c in &mut self.containers {
            c.release(now, &mut self.layer);
        }
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Timers: long-press confirmation, window debounce, settle fallback.
    pub fn tick(&mut self, now: Instant) {
        for c in &mut self.containers {
            c.tick(now, &mut self.layer);
        }
        self.advance_settle(now);
    }

    /// One animation frame.
    pub fn frame(&mut self, now: Instant) {
        for i in 0..self.containers.len() {
            self.containers[i].frame_move(&mut self.layer);
            for c in &mut self.containers {
                c.reconcile(&self.layer);
            }
        }
        for c in &mut self.containers {
            c.autoscroll_frame(now);
        }
        self.advance_settle(now);
    }

    fn advance_settle(&mut self, now: Instant) {
        let Some(clone) = self.layer.get_mut() else {
            return;
        };
        if !clone.is_settling() || !clone.advance(now) {
            return;
        }
        let Some(clone) = self.layer.clear() else {
            return;
        };
        let finished = self
            .containers
            .iter_mut()
            .any(|c| c.finish_settle(&clone.key));
        tracing::debug!(
            message = "drag.end",
            key = %clone.key,
            container = %clone.container_id,
            finished
        );
    }

    /// Drain `source`, routing each event, then run one tick.
    pub fn pump<S: PointerSource + ?Sized>(&mut self, source: &mut S, now: Instant) -> usize {
        let mut routed = 0;
        while let Some(event) = source.next_event() {
            match event {
                SurfaceEvent::ItemDown { container, key, event } => {
                    self.pointer_down(&container, &key, &event, now);
                }
                SurfaceEvent::Move(event) => self.pointer_move(&event),
                SurfaceEvent::Up(event) => self.pointer_up(&event, now),
            }
            routed += 1;
        }
        self.tick(now);
        routed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgrid_core::{PointerPhase, Rect, SortableConfig};
    use sgrid_layout::Stage;

    use crate::order::SortableItem;
    use crate::surface::ContainerGeometry;

    fn container(id: &str, keys: &[&str]) -> SortableContainer<()> {
        let items = keys.iter().map(|k| SortableItem::new(*k, ())).collect();
        let mut c = SortableContainer::new(id, SortableConfig::list().with_group("g"), items).expect("valid");
        c.set_geometry(Instant::now(), ContainerGeometry::fixed(Rect::new(0.0, 0.0, 100.0, 100.0)));
        for k in keys {
            c.confirm_item_size(&ItemKey::from(*k), Stage::Measured, 100.0, 10.0);
            c.mount(ItemKey::from(*k));
        }
        c
    }

    #[test]
    fn duplicate_container_is_rejected() {
        let mut board = SortableBoard::new();
        board.add(container("A", &["a"])).expect("first");
        let err = board.add(container("A", &["b"])).expect_err("dup");
        assert_eq!(err, DndError::DuplicateContainer("A".into()));
    }

    #[test]
    fn press_on_unknown_container_is_ignored() {
        let mut board = SortableBoard::<()>::new();
        let ev = InputEvent::mouse(PointerPhase::Down, 1.0, 1.0);
        assert!(!board.pointer_down("nope", &ItemKey::from("a"), &ev, Instant::now()));
    }

    #[test]
    fn second_press_ignored_while_clone_exists() {
        let mut board = SortableBoard::new();
        board.add(container("A", &["a", "b"])).expect("add");
        let t0 = Instant::now();
        let ev = InputEvent::mouse(PointerPhase::Down, 5.0, 5.0);
        assert!(board.pointer_down("A", &ItemKey::from("a"), &ev, t0));
        board.tick(t0 + std::time::Duration::from_millis(100));
        assert!(board.drag_clone().is_some());
        assert!(!board.pointer_down("A", &ItemKey::from("b"), &ev, t0));
    }
}
