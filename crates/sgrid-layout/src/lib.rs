#![forbid(unsafe_code)]

//! Layout: sequential masonry placement and virtual windowing.
//!
//! # Role in sgrid
//! `sgrid-layout` turns an ordered key list plus measured sizes into absolute
//! item coordinates ([`SequentialLayout`]) and decides which of those items
//! need rendering for a given scroll position ([`compute_window`],
//! [`VirtualWindow`]). It knows nothing about pointers or drags; the drag
//! engine in `sgrid-dnd` submits [`LayoutRequest`]s and reads the table back.

pub mod columns;
pub mod position;
pub mod sequential;
pub mod window;

pub use columns::{ColumnPlacer, column_count};
pub use position::{ItemPosition, SizeEntry, Span, Stage};
pub use sequential::{LayoutParams, LayoutRequest, SequentialLayout};
pub use window::{VirtualWindow, WindowQuery, compute_window};
