#![forbid(unsafe_code)]

//! A sortable container: one ordered collection, its layout, its virtual
//! window and its side of the drag protocol.
//!
//! Containers never talk to each other directly. Everything they share goes
//! through the board's [`DragLayer`]: the clone's `container_id` tag is read
//! fresh on every frame, and a container that still claims the dragged key
//! after the tag moved elsewhere gives the item up (see
//! [`SortableContainer::reconcile`]).
//!
//! # Invariants
//!
//! 1. `order.keys() == layout.keys()` after every public call.
//! 2. The key named by `drag.dragging_id` is present in `order`.
//! 3. Every committed move reports a resolved destination index; otherwise
//!    the move callback is skipped and `drag.commit.invalid` is logged.

use std::fmt;

use sgrid_core::event::EventTarget;
use sgrid_core::{InputEvent, ItemKey, Point, Rect, SortableConfig, extract_coordinates};
use sgrid_layout::{ItemPosition, LayoutParams, LayoutRequest, SequentialLayout, Stage, VirtualWindow};
use web_time::Instant;

use crate::autoscroll::{AutoScrollParams, AutoScroller};
use crate::clone::{DragClone, DragLayer};
use crate::error::DndError;
use crate::long_press::LongPress;
use crate::order::{OrderError, OrderManager, SortableItem};
use crate::selector::HandleSelector;
use crate::state::{DragAction, DragState};
use crate::surface::{ContainerGeometry, ElementRegistry};
use crate::throttle::FrameThrottle;

/// A committed move, reported once per drop that changed container or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEvent {
    pub key: ItemKey,
    pub from_container: String,
    pub from_index: usize,
    pub to_container: String,
    pub to_index: usize,
}

/// One item the host should render this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem {
    pub key: ItemKey,
    pub index: usize,
    pub stage: Stage,
    /// Offset from the container's content origin.
    pub left: f64,
    pub top: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Render for measurement only: an unmeasured probe, or the item whose
    /// clone is currently shown in its place.
    pub hidden: bool,
}

type MovedFn = Box<dyn FnMut(&MoveEvent)>;
type ClickFn = Box<dyn FnMut(&ItemKey)>;

/// Consumer callbacks.
#[derive(Default)]
pub struct SortableCallbacks {
    on_moved: Option<MovedFn>,
    on_item_click: Option<ClickFn>,
}

impl fmt::Debug for SortableCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableCallbacks")
            .field("on_moved", &self.on_moved.is_some())
            .field("on_item_click", &self.on_item_click.is_some())
            .finish()
    }
}

/// A sortable list or grid.
#[derive(Debug)]
pub struct SortableContainer<T> {
    id: String,
    config: SortableConfig,
    handle: Option<HandleSelector>,
    order: OrderManager<T>,
    layout: SequentialLayout,
    window: VirtualWindow,
    geometry: ContainerGeometry,
    registry: ElementRegistry,
    drag: DragState,
    press: LongPress,
    throttle: FrameThrottle,
    autoscroll: AutoScroller,
    last_pointer: Option<Point>,
    /// Last item a reorder was performed against during this drag.
    last_target: Option<ItemKey>,
    /// Key whose clone is animating into its slot in this container.
    settling: Option<ItemKey>,
    callbacks: SortableCallbacks,
}

impl<T: Clone> SortableContainer<T> {
    /// Create a container. Fails on an empty id, an unparsable handle
    /// selector, or an invalid item collection.
    pub fn new(
        id: impl Into<String>,
        config: SortableConfig,
        items: Vec<SortableItem<T>>,
    ) -> Result<Self, DndError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DndError::EmptyContainerId);
        }
        let handle = config
            .drag_handle_selector
            .as_deref()
            .map(HandleSelector::parse)
            .transpose()?;
        let order = OrderManager::from_items(items)?;
        let options = &config.options;
        let layout = SequentialLayout::new(LayoutParams::new(config.mode, options));
        let window = VirtualWindow::new(options.virtual_scroll_buffer, options.scroll_debounce_delay());
        let press = LongPress::new(options.long_press_delay(), options.long_press_move_tolerance_px);
        let autoscroll = AutoScroller::new(AutoScrollParams::from(options));

        let mut container = Self {
            id,
            config,
            handle,
            order,
            layout,
            window,
            geometry: ContainerGeometry::default(),
            registry: ElementRegistry::default(),
            drag: DragState::default(),
            press,
            throttle: FrameThrottle::new(),
            autoscroll,
            last_pointer: None,
            last_target: None,
            settling: None,
            callbacks: SortableCallbacks::default(),
        };
        container.sync_layout();
        Ok(container)
    }

    /// Register the move callback.
    #[must_use]
    pub fn on_moved(mut self, f: impl FnMut(&MoveEvent) + 'static) -> Self {
        self.callbacks.on_moved = Some(Box::new(f));
        self
    }

    /// Register the click callback.
    #[must_use]
    pub fn on_item_click(mut self, f: impl FnMut(&ItemKey) + 'static) -> Self {
        self.callbacks.on_item_click = Some(Box::new(f));
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &SortableConfig {
        &self.config
    }

    #[must_use]
    pub fn items(&self) -> &[SortableItem<T>] {
        self.order.items()
    }

    #[must_use]
    pub fn keys(&self) -> &[ItemKey] {
        self.order.keys()
    }

    #[must_use]
    pub fn layout(&self) -> &SequentialLayout {
        &self.layout
    }

    #[must_use]
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    #[must_use]
    pub fn geometry(&self) -> &ContainerGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn window_range(&self) -> std::ops::Range<usize> {
        self.window.range()
    }

    /// Height of the tallest column, for sizing the scroll area.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.layout.content_height()
    }

    #[must_use]
    pub fn is_auto_scrolling(&self) -> bool {
        self.autoscroll.is_running()
    }

    #[must_use]
    pub fn settling(&self) -> Option<&ItemKey> {
        self.settling.as_ref()
    }

    // -----------------------------------------------------------------------
    // Host interface
    // -----------------------------------------------------------------------

    /// Replace the item collection. Leaves everything untouched on error.
    pub fn update_items(&mut self, items: Vec<SortableItem<T>>) -> Result<(), OrderError> {
        self.order.update(items)?;
        self.sync_layout();
        Ok(())
    }

    /// Size notification from the renderer.
    pub fn confirm_item_size(
        &mut self,
        key: &ItemKey,
        stage: Stage,
        width: f64,
        height: f64,
    ) -> Option<ItemPosition> {
        let position = self.layout.confirm_item_size(width, height, key, stage).cloned();
        self.refresh_window();
        position
    }

    /// Update page placement. A changed scroll offset is treated as a scroll
    /// and obeys the window debounce; a changed width or viewport height
    /// recomputes right away.
    pub fn set_geometry(&mut self, now: Instant, geometry: ContainerGeometry) {
        let scrolled = (geometry.scroll_top - self.geometry.scroll_top).abs() > f64::EPSILON;
        let resized = (geometry.viewport_height() - self.geometry.viewport_height()).abs() > f64::EPSILON;
        self.geometry = geometry;
        let relaid = self.layout.set_container_width(geometry.rect.width);
        let scroll_now = scrolled && self.window.note_scroll(now, geometry.scroll_top);
        if scroll_now || resized || relaid {
            self.refresh_window();
        }
    }

    /// Host-reported scroll. Returns the clamped offset.
    pub fn scroll_to(&mut self, now: Instant, scroll_top: f64) -> f64 {
        let top = scroll_top.clamp(0.0, self.geometry.max_scroll());
        self.geometry.scroll_top = top;
        if self.window.note_scroll(now, top) {
            self.refresh_window();
        }
        top
    }

    pub fn scroll_by(&mut self, now: Instant, dy: f64) -> f64 {
        self.scroll_to(now, self.geometry.scroll_top + dy)
    }

    pub fn mount(&mut self, key: ItemKey) -> bool {
        self.registry.mount(key)
    }

    pub fn unmount(&mut self, key: &ItemKey) -> bool {
        self.registry.unmount(key)
    }

    /// Items inside the virtual window, in key order.
    #[must_use]
    pub fn render_plan(&self) -> Vec<RenderedItem> {
        let range = self.window.range();
        self.layout
            .positions()
            .iter()
            .filter(|p| range.contains(&p.index))
            .map(|p| RenderedItem {
                key: p.key.clone(),
                index: p.index,
                stage: p.stage,
                left: p.left,
                top: p.top,
                width: p.width,
                height: p.height,
                hidden: p.stage == Stage::Unknown
                    || self.drag.is_dragging_key(&p.key)
                    || self.settling.as_ref() == Some(&p.key),
            })
            .collect()
    }

    /// Page rectangle of a measured item.
    #[must_use]
    pub fn item_page_rect(&self, key: &ItemKey) -> Option<Rect> {
        self.layout.position(key).and_then(|p| self.page_rect(p))
    }

    /// Measured item under `point`, if the point is inside this container.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&ItemPosition> {
        if !self.geometry.rect.contains(point) {
            return None;
        }
        self.layout
            .positions()
            .iter()
            .find(|p| self.page_rect(p).is_some_and(|r| r.contains(point)))
    }

    // -----------------------------------------------------------------------
    // Pointer protocol (driven by the board)
    // -----------------------------------------------------------------------

    /// Item-level pointer-down.
    pub(crate) fn pointer_down(&mut self, key: &ItemKey, event: &InputEvent, now: Instant) -> bool {
        if !self.order.contains(key) {
            tracing::warn!(message = "press.unknown_key", container = %self.id, key = %key);
            return false;
        }
        let Some(point) = extract_coordinates(event) else {
            return false;
        };
        let can_drag = self.config.is_sortable && self.handle_matches(event.target());
        self.press.begin(key.clone(), point, now, can_drag);
        self.last_pointer = Some(point);
        true
    }

    fn handle_matches(&self, target: &EventTarget) -> bool {
        self.handle.as_ref().is_none_or(|h| h.matches(target))
    }

    /// Document-level pointer move.
    pub(crate) fn pointer_moved(&mut self, point: Point) {
        self.press.track(point);
        self.last_pointer = Some(point);
        self.throttle.offer(point);
    }

    /// Timers: window debounce and long-press confirmation.
    pub(crate) fn tick(&mut self, now: Instant, layer: &mut DragLayer<T>) {
        if self.window.tick(now) {
            self.refresh_window();
        }
        if !layer.is_empty() {
            return;
        }
        if let Some((key, origin)) = self.press.poll(now) {
            self.start_drag(key, origin, layer);
        }
    }

    fn start_drag(&mut self, key: ItemKey, origin: Point, layer: &mut DragLayer<T>) {
        if !self.registry.is_mounted(&key) {
            tracing::warn!(message = "drag.start.unmounted", container = %self.id, key = %key);
            return;
        }
        let Some(rect) = self.item_page_rect(&key) else {
            tracing::warn!(message = "drag.start.unmeasured", container = %self.id, key = %key);
            return;
        };
        let (Some(index), Some(item)) = (self.order.index_of(&key), self.order.get(&key).cloned()) else {
            tracing::warn!(message = "drag.start.missing_key", container = %self.id, key = %key);
            return;
        };
        let offset = origin.offset_from(rect.origin());
        layer.insert(DragClone::new(
            self.id.clone(),
            self.config.group_id.clone(),
            index,
            offset,
            rect,
            self.config.options.animation.scale,
            item,
        ));
        self.last_target = None;
        self.drag.dispatch(DragAction::StartDrag {
            dragging_id: key.clone(),
            drag_offset: offset,
        });
        tracing::debug!(message = "drag.start", container = %self.id, key = %key, index);
    }

    /// Give up the dragged item if the clone's tag has moved to another
    /// container. Safe to call any number of times.
    pub(crate) fn reconcile(&mut self, layer: &DragLayer<T>) {
        let Some(clone) = layer.get() else {
            return;
        };
        if clone.container_id == self.id || !self.drag.is_dragging_key(&clone.key) {
            return;
        }
        let key = clone.key.clone();
        self.order.remove(&key);
        self.sync_layout();
        self.end_drag();
        tracing::debug!(
            message = "drag.left",
            container = %self.id,
            key = %key,
            to = %clone.container_id
        );
    }

    /// Process this frame's pointer sample.
    pub(crate) fn frame_move(&mut self, layer: &mut DragLayer<T>) {
        let Some(point) = self.throttle.take() else {
            return;
        };
        self.reconcile(layer);
        let Some(clone) = layer.get_mut() else {
            return;
        };
        if clone.is_settling() {
            return;
        }
        if clone.container_id == self.id {
            if self.drag.is_dragging_key(&clone.key) {
                self.drag_over(point, clone);
            }
        } else if self.can_adopt(clone, point) {
            self.adopt(point, clone);
        }
    }

    fn drag_over(&mut self, point: Point, clone: &mut DragClone<T>) {
        clone.follow(point);
        self.autoscroll.update(point, &self.geometry);

        let Some(hovered) = self.hit_test(point).map(|p| p.key.clone()) else {
            return;
        };
        if hovered == clone.key || self.last_target.as_ref() == Some(&hovered) {
            return;
        }
        tracing::trace!(message = "drag.hover", container = %self.id, over = %hovered);
        if self.order.move_key(&clone.key, &hovered) {
            self.layout.apply(LayoutRequest::Shift {
                from: clone.key.clone(),
                to: hovered.clone(),
            });
            self.refresh_window();
        }
        self.last_target = Some(hovered.clone());
        self.drag.dispatch(DragAction::UpdateDrag {
            dragging_id: clone.key.clone(),
            drag_over_id: Some(hovered),
        });
    }

    fn can_adopt(&self, clone: &DragClone<T>, point: Point) -> bool {
        let sources = &self.config.drag_sources;
        self.config.is_sortable
            && clone.is_active()
            && clone.shares_group(self.config.group_id.as_deref())
            && (sources.is_empty() || sources.iter().any(|s| *s == self.id))
            && self.geometry.rect.contains(point)
    }

    fn adopt(&mut self, point: Point, clone: &mut DragClone<T>) {
        let hovered = self.hit_test(point).map(|p| p.key.clone());
        let index = hovered
            .as_ref()
            .and_then(|k| self.order.index_of(k))
            .unwrap_or(self.order.len());
        let from = std::mem::replace(&mut clone.container_id, self.id.clone());
        clone.follow(point);

        let key = clone.key.clone();
        if !self.order.contains(&key) {
            self.order.insert(index, clone.item.clone());
        }
        self.sync_layout();
        let size = clone.size();
        self.layout
            .confirm_item_size(size.width, size.height, &key, Stage::Measured);
        self.refresh_window();

        self.last_target = hovered;
        self.drag.dispatch(DragAction::CrossDrag {
            dragging_id: key.clone(),
            drag_offset: clone.offset,
        });
        self.autoscroll.update(point, &self.geometry);
        tracing::debug!(message = "drag.cross", container = %self.id, key = %key, from = %from, index);
    }

    /// Document-level release. A drop outside every container settles the
    /// item back into its slot in the container holding the clone; it is
    /// never removed without a destination.
    pub(crate) fn release(&mut self, now: Instant, layer: &mut DragLayer<T>) {
        let press = self.press.release();
        self.throttle.cancel();
        if let Some(press) = press
            && !press.fired
        {
            tracing::debug!(message = "press.click", container = %self.id, key = %press.key);
            if let Some(on_click) = self.callbacks.on_item_click.as_mut() {
                on_click(&press.key);
            }
            return;
        }
        if !self.drag.is_dragging() {
            return;
        }
        self.autoscroll.stop();
        let Some(clone) = layer.get_mut() else {
            self.end_drag();
            return;
        };
        self.drag.dispatch(DragAction::SettleDrag);
        let key = clone.key.clone();

        if clone.container_id != self.id {
            self.order.remove(&key);
            self.sync_layout();
            self.end_drag();
            return;
        }

        let target = self
            .item_page_rect(&key)
            .map_or_else(|| clone.position(), |r| r.origin());
        let options = &self.config.options;
        clone.begin_settle(target, &options.animation, now, options.clone_cleanup_fallback_timeout());
        self.commit(clone);
        self.settling = Some(key);
    }

    fn commit(&mut self, clone: &DragClone<T>) {
        let to_index = match self.order.index_of(&clone.key) {
            Some(index) if !clone.origin_container.is_empty() => index,
            _ => {
                tracing::warn!(
                    message = "drag.commit.invalid",
                    container = %self.id,
                    key = %clone.key,
                    origin = %clone.origin_container
                );
                return;
            }
        };
        if clone.origin_container == self.id && clone.origin_index == to_index {
            tracing::debug!(message = "drag.commit.unchanged", container = %self.id, key = %clone.key);
            return;
        }
        let event = MoveEvent {
            key: clone.key.clone(),
            from_container: clone.origin_container.clone(),
            from_index: clone.origin_index,
            to_container: self.id.clone(),
            to_index,
        };
        tracing::debug!(
            message = "drag.commit",
            key = %event.key,
            from = %event.from_container,
            from_index = event.from_index,
            to = %event.to_container,
            to_index = event.to_index
        );
        if let Some(on_moved) = self.callbacks.on_moved.as_mut() {
            on_moved(&event);
        }
    }

    /// Clear the settle marker once the clone is gone.
    pub(crate) fn finish_settle(&mut self, key: &ItemKey) -> bool {
        if self.settling.as_ref() != Some(key) {
            return false;
        }
        self.settling = None;
        self.end_drag();
        true
    }

    /// Apply one auto-scroll step.
    pub(crate) fn autoscroll_frame(&mut self, now: Instant) {
        let Some(dy) = self.autoscroll.on_frame() else {
            return;
        };
        self.scroll_by(now, dy);
        if let Some(point) = self.last_pointer {
            self.autoscroll.update(point, &self.geometry);
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn end_drag(&mut self) {
        self.drag.dispatch(DragAction::EndDrag);
        self.autoscroll.stop();
        self.throttle.cancel();
        self.last_target = None;
    }

    fn page_rect(&self, p: &ItemPosition) -> Option<Rect> {
        let origin = self.geometry.rect.origin();
        Some(Rect::new(
            origin.x + p.left,
            origin.y + p.top - self.geometry.scroll_top,
            p.width?,
            p.height?,
        ))
    }

    fn sync_layout(&mut self) {
        self.layout.reset_layout(self.order.keys().iter().cloned());
        self.refresh_window();
    }

    fn refresh_window(&mut self) {
        self.window.note_resize(self.geometry.viewport_height());
        self.window.update(&self.layout.spans(), self.layout.keys().len());
    }
}
