//! Range-to-text-node splitting
//!
//! Reduces a [`DocumentRange`] to the ordered sequence of whole text
//! nodes it fully contains, splitting the boundary nodes so the covered
//! portion becomes its own node. Collapsed ranges are a defined no-op:
//! splitting at the exact start boundary of an empty range would leave
//! the range referencing the wrong side of the split.

use std::sync::OnceLock;

use regex::Regex;

use crate::dom::range::overlapped_text_nodes;
use crate::dom::{Document, DocumentRange, DomError, NodeId};

static WHITESPACE_ONLY: OnceLock<Regex> = OnceLock::new();

/// Whether a text node's content is whitespace only
///
/// Such nodes are excluded from span grouping: wrapping whitespace runs
/// inside elements that restrict children (list and table structures)
/// would produce invalid markup.
pub(crate) fn is_whitespace_only(text: &str) -> bool {
    WHITESPACE_ONLY
        .get_or_init(|| Regex::new(r"^\s*$").expect("static pattern"))
        .is_match(text)
}

/// Split boundary nodes and return every text node fully contained in
/// the range, in document order
///
/// The start node is split when the anchor falls mid-node (offset > 0);
/// the end node is split when the anchor falls before the node's end.
/// A collapsed range returns an empty sequence without touching the
/// tree.
pub(crate) fn contained_text_nodes(
    doc: &mut Document,
    range: &DocumentRange,
) -> Result<Vec<NodeId>, DomError> {
    if range.is_collapsed(doc) {
        return Ok(Vec::new());
    }
    let overlapped = overlapped_text_nodes(doc, range);
    let mut out = Vec::new();
    for (node, from, to) in overlapped {
        let covered = to - from;
        let mut target = node;
        if from > 0 {
            target = doc.split_text(node, from)?;
        }
        let len = doc.text_len(target).unwrap_or(0);
        if covered < len {
            doc.split_text(target, covered)?;
        }
        out.push(target);
    }
    Ok(out)
}
