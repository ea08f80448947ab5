#![forbid(unsafe_code)]

//! Core: geometry, pointer input, animation, identity and configuration.
//!
//! # Role in sgrid
//! `sgrid-core` holds the vocabulary shared by the layout engine
//! (`sgrid-layout`) and the drag engine (`sgrid-dnd`). It has no notion of
//! containers or drag state; it only defines the values those crates pass
//! around.
//!
//! # Primary responsibilities
//! - **Geometry**: `Point`, `Size`, `Rect` in page pixels.
//! - **InputEvent**: normalized mouse/touch input and coordinate extraction.
//! - **Spring**: pixel-space spring used by the drag clone settle animation.
//! - **ItemKey**: stable item identity.
//! - **SortableConfig**: every tunable, loadable from TOML or JSON.

pub mod animation;
pub mod config;
pub mod event;
pub mod geometry;
pub mod key;

pub use config::{AnimationConfig, ConfigError, LayoutMode, SortableConfig, SortableOptions};
pub use event::{InputEvent, PointerPhase, extract_coordinates};
pub use geometry::{Point, Rect, Size};
pub use key::ItemKey;
