//! In-memory document tree
//!
//! The host page owns the real document; this module models it as an
//! explicit arena tree passed to every component, so a fake tree is
//! first-class in tests and embedders can mirror whatever DOM they sit
//! on. All mutations performed by the highlight engine (wrapping,
//! unwrapping, overlay insertion) are reversible, leaving the host tree
//! in its original shape once highlights are removed.
//!
//! Character offsets throughout are counted in Unicode scalar values,
//! not bytes.

pub mod layout;
pub mod path;
pub mod range;
pub mod selection;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use range::{DocumentRange, TextQuote};
pub use selection::{Anchor, Direction, Selection};

/// Errors raised by document tree operations
#[derive(Error, Debug)]
pub enum DomError {
    #[error("node {0:?} is not a text node")]
    NotAText(NodeId),

    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("offset {offset} is out of range for node {node:?} of length {len}")]
    OffsetOutOfRange {
        node: NodeId,
        offset: usize,
        len: usize,
    },

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}

/// Handle to a node in a [`Document`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

/// Payload of a single node
#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

/// An arena-backed document tree
///
/// Also owns the current text [`Selection`], making the document the
/// single source of truth the selection observer reads fresh on every
/// notification cycle.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    selection: Option<Selection>,
}

impl Document {
    /// Create a document with a single root element
    pub fn new(root_tag: &str) -> Self {
        let root_node = Node {
            parent: None,
            data: NodeData::Element(ElementData {
                tag: root_tag.to_string(),
                attributes: BTreeMap::new(),
                children: Vec::new(),
            }),
        };
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
            selection: None,
        }
    }

    /// The root element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element(ElementData {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: None, data });
        id
    }

    /// Whether the node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Element(_))
    }

    /// Whether the node is a text node
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Text(_))
    }

    /// Tag name of an element node
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(&el.tag),
            NodeData::Text(_) => None,
        }
    }

    /// Content of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(t) => Some(t),
            NodeData::Element(_) => None,
        }
    }

    /// Length of a text node in characters
    pub fn text_len(&self, id: NodeId) -> Option<usize> {
        self.text(id).map(|t| t.chars().count())
    }

    /// Parent of a node, if attached to one
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of a node (empty for text nodes)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => &el.children,
            NodeData::Text(_) => &[],
        }
    }

    /// Position of a node among its parent's children
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Next sibling in the parent's child list
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;
        self.children(parent).get(idx + 1).copied()
    }

    /// Previous sibling in the parent's child list
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let idx = self.index_in_parent(id)?;
        if idx == 0 {
            None
        } else {
            self.children(parent).get(idx - 1).copied()
        }
    }

    /// Ancestor chain of a node, nearest first, excluding the node itself
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent(p);
        }
        out
    }

    /// Whether the node is reachable from the document root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if cur == self.root {
                return true;
            }
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Document-order successor of a node
    pub fn next_in_document(&self, id: NodeId) -> Option<NodeId> {
        if let Some(&first) = self.children(id).first() {
            return Some(first);
        }
        let mut cur = id;
        loop {
            if let Some(next) = self.next_sibling(cur) {
                return Some(next);
            }
            cur = self.parent(cur)?;
        }
    }

    /// All text nodes under `root`, in document order
    pub fn text_nodes_under(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.is_text(id) {
                out.push(id);
            }
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Concatenated text of a node and all its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            match &self.nodes[cur.0].data {
                NodeData::Text(t) => out.push_str(t),
                NodeData::Element(el) => {
                    for &child in el.children.iter().rev() {
                        stack.push(child);
                    }
                }
            }
        }
        out
    }

    /// Insert `node` into `parent` before `reference`, appending when
    /// `reference` is `None`. An already-attached node is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        if !self.is_element(parent) {
            return Err(DomError::NotAnElement(parent));
        }
        // detach first so a move within the same parent lands at the
        // index valid after removal
        self.detach(node);
        let idx = match reference {
            Some(r) => self
                .children(parent)
                .iter()
                .position(|&c| c == r)
                .ok_or(DomError::NotAChild { parent, child: r })?,
            None => self.children(parent).len(),
        };
        if let NodeData::Element(el) = &mut self.nodes[parent.0].data {
            el.children.insert(idx, node);
        }
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    /// Append `node` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, node, None)
    }

    /// Detach a node from its parent; a no-op when already detached
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            if let NodeData::Element(el) = &mut self.nodes[parent.0].data {
                el.children.retain(|&c| c != id);
            }
        }
    }

    /// Split a text node at a character offset
    ///
    /// The original node keeps the head; a new sibling text node holding
    /// the tail is inserted immediately after it and returned.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let text = match &self.nodes[id.0].data {
            NodeData::Text(t) => t.clone(),
            NodeData::Element(_) => return Err(DomError::NotAText(id)),
        };
        let len = text.chars().count();
        if offset > len {
            return Err(DomError::OffsetOutOfRange {
                node: id,
                offset,
                len,
            });
        }
        let byte = byte_offset(&text, offset);
        let tail = text[byte..].to_string();
        if let NodeData::Text(t) = &mut self.nodes[id.0].data {
            t.truncate(byte);
        }
        let new_id = self.create_text(&tail);
        if let Some(parent) = self.parent(id) {
            let after = self.next_sibling(id);
            self.insert_before(parent, new_id, after)?;
        }
        Ok(new_id)
    }

    /// Replace an element with its children in their current order,
    /// undoing a wrap. Returns the promoted children. A detached node is
    /// left untouched and returns an empty list.
    pub fn replace_with_children(&mut self, id: NodeId) -> Result<Vec<NodeId>, DomError> {
        if !self.is_element(id) {
            return Err(DomError::NotAnElement(id));
        }
        let Some(parent) = self.parent(id) else {
            return Ok(Vec::new());
        };
        let children: Vec<NodeId> = self.children(id).to_vec();
        for &child in &children {
            self.insert_before(parent, child, Some(id))?;
        }
        self.detach(id);
        Ok(children)
    }

    /// Attribute value on an element
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => el.attributes.get(name).map(|v| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => {
                el.attributes.insert(name.to_string(), value.to_string());
                Ok(())
            }
            NodeData::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    /// Remove an attribute from an element
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => {
                el.attributes.remove(name);
                Ok(())
            }
            NodeData::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    /// Whether an element's class list contains `class`
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attribute(id, "class")
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Add a class to an element's class list
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let current = self.attribute(id, "class").unwrap_or("").to_string();
        let updated = if current.is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current, class)
        };
        self.set_attribute(id, "class", &updated)
    }

    /// Remove a class from an element's class list
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        let Some(current) = self.attribute(id, "class") else {
            return if self.is_element(id) {
                Ok(())
            } else {
                Err(DomError::NotAnElement(id))
            };
        };
        let updated: Vec<&str> = current
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        self.set_attribute(id, "class", &updated.join(" "))
    }

    /// Child-index steps from the root down to a node
    ///
    /// Empty for the root itself; the first step is an index into the
    /// root's children. A detached node yields steps from its highest
    /// ancestor.
    pub fn node_steps(&self, id: NodeId) -> Vec<usize> {
        let mut steps = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            if let Some(idx) = self.children(parent).iter().position(|&c| c == cur) {
                steps.push(idx);
            }
            cur = parent;
        }
        steps.reverse();
        steps
    }

    /// Compare two anchors in document order
    pub fn compare_positions(&self, a: &Anchor, b: &Anchor) -> Ordering {
        let mut sa = self.node_steps(a.node);
        sa.push(a.offset);
        let mut sb = self.node_steps(b.node);
        sb.push(b.offset);
        compare_steps(&sa, &sb)
    }

    /// The current selection, if any
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Replace the current selection
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }
}

/// Compare two step sequences lexicographically; a longer path that
/// extends a shorter one orders after it
pub(crate) fn compare_steps(a: &[usize], b: &[usize]) -> Ordering {
    for (step_a, step_b) in a.iter().zip(b.iter()) {
        let cmp = step_a.cmp(step_b);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    a.len().cmp(&b.len())
}

/// Byte index of a character offset within a string
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_doc(text: &str) -> (Document, NodeId, NodeId) {
        let mut doc = Document::new("body");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), p).unwrap();
        let t = doc.create_text(text);
        doc.append_child(p, t).unwrap();
        (doc, p, t)
    }

    #[test]
    fn test_split_text_mid_node() {
        let (mut doc, p, t) = paragraph_doc("Hello world");

        let tail = doc.split_text(t, 5).unwrap();

        assert_eq!(doc.text(t), Some("Hello"));
        assert_eq!(doc.text(tail), Some(" world"));
        assert_eq!(doc.children(p), &[t, tail]);
        assert_eq!(doc.next_sibling(t), Some(tail));
    }

    #[test]
    fn test_split_text_multibyte() {
        let (mut doc, _, t) = paragraph_doc("héllo wörld");

        let tail = doc.split_text(t, 5).unwrap();

        assert_eq!(doc.text(t), Some("héllo"));
        assert_eq!(doc.text(tail), Some(" wörld"));
    }

    #[test]
    fn test_split_text_out_of_range() {
        let (mut doc, _, t) = paragraph_doc("abc");

        assert!(matches!(
            doc.split_text(t, 4),
            Err(DomError::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn test_replace_with_children_restores_order() {
        let (mut doc, p, t) = paragraph_doc("abc");
        let wrapper = doc.create_element("span");
        doc.insert_before(p, wrapper, Some(t)).unwrap();
        doc.append_child(wrapper, t).unwrap();
        let extra = doc.create_text("def");
        doc.append_child(wrapper, extra).unwrap();

        let children = doc.replace_with_children(wrapper).unwrap();

        assert_eq!(children, vec![t, extra]);
        assert_eq!(doc.children(p), &[t, extra]);
        assert!(!doc.is_attached(wrapper));
        assert_eq!(doc.text_content(p), "abcdef");
    }

    #[test]
    fn test_replace_with_children_detached_is_noop() {
        let mut doc = Document::new("body");
        let orphan = doc.create_element("span");

        let children = doc.replace_with_children(orphan).unwrap();
        assert!(children.is_empty());
    }

    #[test]
    fn test_document_order_traversal() {
        let mut doc = Document::new("body");
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        doc.append_child(doc.root(), a).unwrap();
        doc.append_child(doc.root(), b).unwrap();
        let t1 = doc.create_text("one");
        let t2 = doc.create_text("two");
        doc.append_child(a, t1).unwrap();
        doc.append_child(b, t2).unwrap();

        assert_eq!(doc.next_in_document(doc.root()), Some(a));
        assert_eq!(doc.next_in_document(a), Some(t1));
        assert_eq!(doc.next_in_document(t1), Some(b));
        assert_eq!(doc.next_in_document(t2), None);
        assert_eq!(doc.text_nodes_under(doc.root()), vec![t1, t2]);
    }

    #[test]
    fn test_compare_positions() {
        let mut doc = Document::new("body");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), p).unwrap();
        let t1 = doc.create_text("one");
        let t2 = doc.create_text("two");
        doc.append_child(p, t1).unwrap();
        doc.append_child(p, t2).unwrap();

        let early = Anchor::new(t1, 1);
        let late = Anchor::new(t1, 3);
        let other = Anchor::new(t2, 0);

        assert_eq!(doc.compare_positions(&early, &late), Ordering::Less);
        assert_eq!(doc.compare_positions(&late, &other), Ordering::Less);
        assert_eq!(doc.compare_positions(&other, &other), Ordering::Equal);
    }

    #[test]
    fn test_class_list_helpers() {
        let mut doc = Document::new("body");
        let el = doc.create_element("span");

        doc.add_class(el, "one").unwrap();
        doc.add_class(el, "two").unwrap();
        doc.add_class(el, "one").unwrap();

        assert_eq!(doc.attribute(el, "class"), Some("one two"));
        assert!(doc.has_class(el, "two"));

        doc.remove_class(el, "one").unwrap();
        assert!(!doc.has_class(el, "one"));
        assert!(doc.has_class(el, "two"));
    }

    #[test]
    fn test_insert_before_moves_attached_node() {
        let mut doc = Document::new("body");
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        doc.append_child(doc.root(), a).unwrap();
        doc.append_child(doc.root(), b).unwrap();
        let t = doc.create_text("x");
        doc.append_child(a, t).unwrap();

        doc.append_child(b, t).unwrap();

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[t]);
        assert_eq!(doc.parent(t), Some(b));
    }
}
