#![forbid(unsafe_code)]

//! Drag state and its five transitions.
//!
//! [`DragState`] is owned by a single container and only changes through
//! [`DragState::dispatch`]. The reducer is total: every action is valid in
//! every state.
//!
//! | Action        | dragging_id | drag_over_id | drag_offset |
//! |---------------|-------------|--------------|-------------|
//! | `StartDrag`   | set         | cleared      | set         |
//! | `CrossDrag`   | set         | cleared      | set         |
//! | `UpdateDrag`  | set         | set          | kept        |
//! | `SettleDrag`  | cleared     | kept         | kept        |
//! | `EndDrag`     | cleared     | cleared      | zeroed      |

use sgrid_core::{ItemKey, Point};

/// Per-container drag state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragState {
    pub dragging_id: Option<ItemKey>,
    /// Hover target; only meaningful while `dragging_id` is set, or during
    /// the settle phase that follows.
    pub drag_over_id: Option<ItemKey>,
    /// Pointer offset within the dragged item.
    pub drag_offset: Point,
}

/// A drag state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DragAction {
    /// A long press was confirmed on an item of this container.
    StartDrag {
        dragging_id: ItemKey,
        drag_offset: Point,
    },
    /// An item dragged from a sibling container entered this one.
    CrossDrag {
        dragging_id: ItemKey,
        drag_offset: Point,
    },
    /// The hover target changed during a move.
    UpdateDrag {
        dragging_id: ItemKey,
        drag_over_id: Option<ItemKey>,
    },
    /// Release: the clone is settling into place.
    SettleDrag,
    /// Drag fully finished; back to the initial state.
    EndDrag,
}

impl DragAction {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartDrag { .. } => "START_DRAG",
            Self::CrossDrag { .. } => "CROSS_DRAG",
            Self::UpdateDrag { .. } => "UPDATE_DRAG",
            Self::SettleDrag => "SETTLE_DRAG",
            Self::EndDrag => "END_DRAG",
        }
    }
}

impl DragState {
    /// Pure transition function.
    #[must_use]
    pub fn reduce(&self, action: DragAction) -> DragState {
        match action {
            DragAction::StartDrag {
                dragging_id,
                drag_offset,
            }
            | DragAction::CrossDrag {
                dragging_id,
                drag_offset,
            } => DragState {
                dragging_id: Some(dragging_id),
                drag_over_id: None,
                drag_offset,
            },
            DragAction::UpdateDrag {
                dragging_id,
                drag_over_id,
            } => DragState {
                dragging_id: Some(dragging_id),
                drag_over_id,
                drag_offset: self.drag_offset,
            },
            DragAction::SettleDrag => DragState {
                dragging_id: None,
                ..self.clone()
            },
            DragAction::EndDrag => DragState::default(),
        }
    }

    /// Apply `action` in place.
    pub fn dispatch(&mut self, action: DragAction) {
        tracing::trace!(message = "drag.dispatch", action = action.name());
        *self = self.reduce(action);
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging_id.is_some()
    }

    /// Whether `key` is the item being dragged.
    #[must_use]
    pub fn is_dragging_key(&self, key: &ItemKey) -> bool {
        self.dragging_id.as_ref() == Some(key)
    }
}
