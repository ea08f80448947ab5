#![forbid(unsafe_code)]

//! sgrid public facade crate.
//!
//! Re-exports the types most hosts need from `sgrid-core`, `sgrid-layout`
//! and (with the default `dnd` feature) `sgrid-dnd`, plus a prelude and a
//! single error type.
//!
//! ```ignore
//! use sgrid::prelude::*;
//!
//! let config = sgrid::load_config("board.toml")?;
//! let mut board = SortableBoard::new();
//! board.add(SortableContainer::new("todo", config, items)?)?;
//! ```

use std::path::Path;

// --- Core re-exports -------------------------------------------------------

pub use sgrid_core::animation::{Spring, SpringPoint};
pub use sgrid_core::event::{
    ElementDescriptor, EventTarget, MouseEvent, TouchEvent, TouchPhase, TouchPoint,
};
pub use sgrid_core::{
    AnimationConfig, ConfigError, InputEvent, ItemKey, LayoutMode, Point, PointerPhase, Rect,
    Size, SortableConfig, SortableOptions, extract_coordinates,
};

// --- Layout re-exports -----------------------------------------------------

pub use sgrid_layout::{
    ItemPosition, LayoutParams, LayoutRequest, SequentialLayout, Span, Stage, VirtualWindow,
    WindowQuery, compute_window,
};

// --- Drag re-exports -------------------------------------------------------

#[cfg(feature = "dnd")]
pub use sgrid_dnd::{
    ContainerGeometry, DndError, DragAction, DragClone, DragState, HandleSelector, MoveEvent,
    OrderError, OrderManager, PointerSource, RenderedItem, ScriptedPointerSource, SortableBoard,
    SortableContainer, SortableItem, SurfaceEvent,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[cfg(feature = "dnd")]
    #[error(transparent)]
    Order(#[from] OrderError),
    #[cfg(feature = "dnd")]
    #[error(transparent)]
    Dnd(#[from] DndError),
}

/// Standard result type for sgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load and validate a config file, choosing the format by extension
/// (`.json` is JSON, anything else is TOML).
pub fn load_config(path: impl AsRef<Path>) -> Result<SortableConfig> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        SortableConfig::from_json_file(path)?
    } else {
        SortableConfig::from_toml_file(path)?
    };
    Ok(config.validated()?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    //! Common imports for hosts.

    pub use crate::{Error, Result};
    pub use crate::{InputEvent, ItemKey, LayoutMode, Point, PointerPhase, Rect, SortableConfig, Stage};

    #[cfg(feature = "dnd")]
    pub use crate::{ContainerGeometry, MoveEvent, SortableBoard, SortableContainer, SortableItem};

    pub use sgrid_core as core;
    pub use sgrid_layout as layout;
    #[cfg(feature = "dnd")]
    pub use sgrid_dnd as dnd;
}
