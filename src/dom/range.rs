//! Logical text ranges over the document tree
//!
//! A [`DocumentRange`] is the normalized form consumed by the highlight
//! engine: an ordered pair of anchors with the start at or before the
//! end in document order. Construction reorders swapped endpoints, so
//! the invariant holds regardless of drag direction.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::selection::Anchor;
use super::{byte_offset, Document, NodeId};

/// An ordered pair of anchors marking a span of document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRange {
    pub start: Anchor,
    pub end: Anchor,
}

/// The exact text of a range with surrounding context, for consumers
/// building text-quote selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextQuote {
    pub exact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl DocumentRange {
    /// Create a range from two anchors, ordering them in document order
    pub fn new(doc: &Document, a: Anchor, b: Anchor) -> Self {
        match doc.compare_positions(&a, &b) {
            Ordering::Greater => Self { start: b, end: a },
            _ => Self { start: a, end: b },
        }
    }

    /// Whether start and end mark the same position
    ///
    /// A collapsed range carries no highlight semantics.
    pub fn is_collapsed(&self, doc: &Document) -> bool {
        doc.compare_positions(&self.start, &self.end) == Ordering::Equal
    }

    /// Nearest element containing both endpoints
    ///
    /// `None` when an endpoint cannot be resolved to an element, e.g. a
    /// lone text node with no parent; there is nothing to attach
    /// highlights to in that case.
    pub fn common_ancestor(&self, doc: &Document) -> Option<NodeId> {
        let chain_a = element_chain(doc, self.start.node)?;
        let chain_b = element_chain(doc, self.end.node)?;
        chain_b.into_iter().find(|el| chain_a.contains(el))
    }

    /// The text covered by this range, in document order
    pub fn text(&self, doc: &Document) -> String {
        let mut out = String::new();
        for (node, from, to) in overlapped_text_nodes(doc, self) {
            if let Some(text) = doc.text(node) {
                let from_b = byte_offset(text, from);
                let to_b = byte_offset(text, to);
                out.push_str(&text[from_b..to_b]);
            }
        }
        out
    }

    /// The covered text plus up to `context_chars` of prefix and suffix
    /// drawn from the boundary text nodes
    pub fn context_quote(&self, doc: &Document, context_chars: usize) -> TextQuote {
        let prefix = doc.text(self.start.node).and_then(|text| {
            let end_b = byte_offset(text, self.start.offset);
            let from = self.start.offset.saturating_sub(context_chars);
            let from_b = byte_offset(text, from);
            let slice = &text[from_b..end_b];
            (!slice.is_empty()).then(|| slice.to_string())
        });
        let suffix = doc.text(self.end.node).and_then(|text| {
            let from_b = byte_offset(text, self.end.offset);
            let to_b = byte_offset(text, self.end.offset + context_chars);
            let slice = &text[from_b..to_b];
            (!slice.is_empty()).then(|| slice.to_string())
        });
        TextQuote {
            exact: self.text(doc),
            prefix,
            suffix,
        }
    }
}

/// Elements from a node upward: the node itself when it is an element,
/// then every ancestor. `None` when the chain is empty.
fn element_chain(doc: &Document, node: NodeId) -> Option<Vec<NodeId>> {
    let mut chain = Vec::new();
    if doc.is_element(node) {
        chain.push(node);
    }
    chain.extend(doc.ancestors(node));
    if chain.is_empty() {
        None
    } else {
        Some(chain)
    }
}

/// Text nodes overlapped by a range, in document order, each with the
/// covered character interval `[from, to)`
pub(crate) fn overlapped_text_nodes(
    doc: &Document,
    range: &DocumentRange,
) -> Vec<(NodeId, usize, usize)> {
    let mut out = Vec::new();
    if range.is_collapsed(doc) {
        return out;
    }
    for node in doc.text_nodes_under(doc.root()) {
        let len = doc.text_len(node).unwrap_or(0);
        let node_start = Anchor::new(node, 0);
        let node_end = Anchor::new(node, len);

        let from = if range.start.node == node {
            range.start.offset.min(len)
        } else if doc.compare_positions(&node_start, &range.start) != Ordering::Less {
            0
        } else {
            continue;
        };
        let to = if range.end.node == node {
            range.end.offset.min(len)
        } else if doc.compare_positions(&node_end, &range.end) != Ordering::Greater {
            len
        } else {
            continue;
        };
        if from < to {
            out.push((node, from, to));
        }
    }
    out
}
