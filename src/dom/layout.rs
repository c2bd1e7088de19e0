//! Host-supplied layout measurement
//!
//! The core never computes layout itself. Whoever embeds it supplies a
//! [`LayoutProvider`] mapping nodes to their on-screen rectangles; the
//! engine batches all reads before mutating the tree so a real host can
//! avoid redundant forced layout passes.

use std::collections::HashMap;

use crate::geometry::Rect;

use super::{Document, NodeId};

/// Provides screen-space rectangles for document nodes
pub trait LayoutProvider {
    /// Bounding rectangle of a node, or `None` when the node has no
    /// geometry (detached, display:none, unmeasured)
    fn node_rect(&self, doc: &Document, node: NodeId) -> Option<Rect>;
}

/// A map-backed layout for tests and snapshot-driven hosts
#[derive(Debug, Default, Clone)]
pub struct StaticLayout {
    rects: HashMap<NodeId, Rect>,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rectangle reported for a node
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.rects.insert(node, rect);
    }
}

impl LayoutProvider for StaticLayout {
    fn node_rect(&self, _doc: &Document, node: NodeId) -> Option<Rect> {
        self.rects.get(&node).copied()
    }
}
