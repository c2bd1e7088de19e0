//! Marginalia — highlight overlay engine and selection observer
//!
//! The core behind an annotation workflow for ordinary HTML pages,
//! EPUB content frames and rasterized PDF viewers: it turns a logical
//! text range into persistent, reversible highlight markup over a
//! host-owned document tree, and it watches raw selection gestures to
//! report one settled selection per gesture.
//!
//! # Modules
//!
//! - `dom`: explicit document-tree substrate (ranges, selections,
//!   node-path selectors, layout seam)
//! - `highlight`: range splitting, span wrapping, vector overlays for
//!   raster pages, and registry operations over created highlights
//! - `observer`: debounced, gesture-aware selection state machine
//! - `config`: class/attribute markers and debounce tuning
//!
//! The crate persists nothing and decides nothing about annotations:
//! it reports selections and manages visual artifacts, and all state is
//! reconstructible from the document plus an externally supplied list
//! of annotated ranges.

pub mod config;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod observer;

pub use config::{HighlightConfig, ObserverConfig};
pub use dom::layout::{LayoutProvider, StaticLayout};
pub use dom::path::{NodePath, RangePath};
pub use dom::{Anchor, Direction, Document, DocumentRange, NodeId, Selection, TextQuote};
pub use error::{HighlightError, Result};
pub use geometry::Rect;
pub use highlight::{HighlightId, Highlighter};
pub use observer::{ObserverState, SelectionEvent, SelectionObserver};
