#![forbid(unsafe_code)]

//! Drag engine: sortable containers, long-press drag, cross-container
//! transfer and edge auto-scroll.
//!
//! # Role in sgrid
//! `sgrid-dnd` sits on top of `sgrid-layout`. A [`SortableContainer`] owns
//! one ordered collection ([`OrderManager`]) and its layout; a
//! [`SortableBoard`] groups containers that share a single drag clone and
//! routes pointer input to them.
//!
//! # Primary responsibilities
//! - **DragState**: the per-container five-action state machine.
//! - **LongPress**: drag-intent detection with movement tolerance.
//! - **AutoScroller**: edge scrolling with a power-curve speed profile.
//! - **DragClone**: the ownership tag and settle animation of the dragged item.
//! - **Surface**: host contracts (geometry, element registry, pointer source).

pub mod autoscroll;
pub mod board;
pub mod clone;
pub mod container;
pub mod error;
pub mod long_press;
pub mod order;
pub mod selector;
pub mod state;
pub mod surface;
pub mod throttle;

pub use autoscroll::{AutoScrollParams, AutoScroller, scroll_speed};
pub use board::SortableBoard;
pub use clone::{CloneLifecycle, DragClone, DragLayer};
pub use container::{MoveEvent, RenderedItem, SortableCallbacks, SortableContainer};
pub use error::DndError;
pub use long_press::{LongPress, Press};
pub use order::{OrderError, OrderManager, SortableItem, validate};
pub use selector::{HandleSelector, SelectorError};
pub use state::{DragAction, DragState};
pub use surface::{ContainerGeometry, ElementRegistry, PointerSource, ScriptedPointerSource, SurfaceEvent};
pub use throttle::FrameThrottle;
