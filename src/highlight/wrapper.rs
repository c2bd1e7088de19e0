//! Span grouping and container wrapping
//!
//! Adjacent text nodes from one range collapse into a single container
//! so a highlight spanning several split nodes renders as one visual
//! unit. A new span starts whenever the next node is not the immediate
//! next sibling of the previous one, which keeps every container's
//! children inside a single parent and the markup valid.

use tracing::trace;

use crate::config::HighlightConfig;
use crate::dom::{Document, DomError, NodeId};

/// Group an ordered node sequence into spans of adjacent siblings
pub(crate) fn group_adjacent(doc: &Document, nodes: &[NodeId]) -> Vec<Vec<NodeId>> {
    let mut spans: Vec<Vec<NodeId>> = Vec::new();
    let mut current: Vec<NodeId> = Vec::new();
    for &node in nodes {
        if let Some(&prev) = current.last() {
            if doc.next_sibling(prev) != Some(node) {
                spans.push(std::mem::take(&mut current));
            }
        }
        current.push(node);
    }
    if !current.is_empty() {
        spans.push(current);
    }
    spans
}

/// Wrap one span of adjacent text nodes in a new container element
///
/// The container is inserted at the position of the span's first node,
/// then every node of the span is moved under it in original order.
/// Markers applied: base class, optional tint class, capped depth
/// class, and the handle id attribute.
pub(crate) fn wrap_span(
    doc: &mut Document,
    parent: NodeId,
    span: &[NodeId],
    config: &HighlightConfig,
    id_value: &str,
    style_tag: Option<&str>,
    depth: u32,
) -> Result<NodeId, DomError> {
    let first = span[0];
    let container = doc.create_element("span");
    doc.add_class(container, &config.base_class())?;
    if let Some(tag) = style_tag {
        doc.add_class(container, &config.tint_class(tag))?;
    }
    doc.add_class(container, &config.depth_class(depth))?;
    doc.set_attribute(container, &config.id_attribute, id_value)?;
    doc.insert_before(parent, container, Some(first))?;
    for &node in span {
        doc.append_child(container, node)?;
    }
    trace!(nodes = span.len(), depth, "wrapped highlight span");
    Ok(container)
}
