//! Highlight overlay engine
//!
//! Converts a logical [`DocumentRange`] into persistent markup: the
//! range is split into whole text nodes, adjacent nodes are grouped
//! into spans, and each span is wrapped in a container element carrying
//! class/attribute markers an external stylesheet interprets. Pages
//! rendered as raster images additionally get a vector overlay (see
//! [`overlay`]). Created highlights are addressed by opaque
//! [`HighlightId`] handles; all registry operations tolerate stale
//! handles as no-ops.

pub mod overlay;
pub mod registry;
pub mod splitter;
pub mod wrapper;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::HighlightConfig;
use crate::dom::{Document, DocumentRange, NodeId};
use crate::error::Result;

/// Opaque handle to one created highlight span
///
/// One annotation may own several handles when its target range crosses
/// element boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightId(Uuid);

impl HighlightId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HighlightId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Book-keeping for one live highlight
///
/// The overlay rectangle lives in a side table here rather than as a
/// property on the foreign tree node.
#[derive(Debug)]
struct HighlightRecord {
    container: NodeId,
    overlay_rect: Option<NodeId>,
    style_tag: Option<String>,
    focused: bool,
}

/// The highlight engine: creates, restyles and removes highlights over
/// a host document tree
#[derive(Debug)]
pub struct Highlighter {
    config: HighlightConfig,
    records: HashMap<HighlightId, HighlightRecord>,
}

impl Highlighter {
    /// Create an engine with the given marker configuration
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
        }
    }

    /// The marker configuration in use
    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Wrap every text span of `range` in a highlight container
    ///
    /// Returns the created handles in document order. A collapsed range
    /// or one whose common ancestor cannot be resolved to an element
    /// returns an empty list and performs no mutation. Total visible
    /// text is unchanged; containers default to invisible until
    /// [`Highlighter::set_visible`] enables rendering on an enclosing
    /// subtree root.
    pub fn create_highlights(
        &mut self,
        doc: &mut Document,
        range: &DocumentRange,
        style_tag: Option<&str>,
    ) -> Result<Vec<HighlightId>> {
        if range.is_collapsed(doc) {
            return Ok(Vec::new());
        }
        if range.common_ancestor(doc).is_none() {
            debug!("range has no element ancestor; nothing to attach highlights to");
            return Ok(Vec::new());
        }

        let nodes = splitter::contained_text_nodes(doc, range)?;
        let nodes: Vec<NodeId> = nodes
            .into_iter()
            .filter(|&n| !splitter::is_whitespace_only(doc.text(n).unwrap_or("")))
            .collect();

        let mut ids = Vec::new();
        for span in wrapper::group_adjacent(doc, &nodes) {
            let Some(&first) = span.first() else {
                continue;
            };
            let Some(parent) = doc.parent(first) else {
                continue;
            };
            let depth = self.find_containing(doc, first).len() as u32 + 1;
            let id = HighlightId::new();
            let container = wrapper::wrap_span(
                doc,
                parent,
                &span,
                &self.config,
                &id.to_string(),
                style_tag,
                depth,
            )?;
            self.records.insert(
                id,
                HighlightRecord {
                    container,
                    overlay_rect: None,
                    style_tag: style_tag.map(|s| s.to_string()),
                    focused: false,
                },
            );
            ids.push(id);
        }
        debug!(count = ids.len(), "created highlights");
        Ok(ids)
    }

    /// Container element of a live highlight
    pub fn container(&self, id: HighlightId) -> Option<NodeId> {
        self.records.get(&id).map(|r| r.container)
    }

    /// Every highlight whose container encloses `node`, innermost first
    pub fn find_containing(&self, doc: &Document, node: NodeId) -> Vec<HighlightId> {
        let mut out = Vec::new();
        let mut cur = Some(node);
        while let Some(id) = cur {
            if let Some(value) = doc.attribute(id, &self.config.id_attribute) {
                if let Ok(handle) = value.parse::<HighlightId>() {
                    if self.records.contains_key(&handle) {
                        out.push(handle);
                    }
                }
            }
            cur = doc.parent(id);
        }
        out
    }
}
