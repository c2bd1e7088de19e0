//! Raw selection state: an anchor/focus pair preserving drag direction
//!
//! The anchor is where the gesture started; the focus is where it
//! currently ends. A backward drag has its focus before its anchor in
//! document order. Normalized [`DocumentRange`]s always run forward, so
//! the direction is carried separately to keep extension gestures
//! working from the correct end.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::range::DocumentRange;
use super::{Document, NodeId};

/// One endpoint of a selection or range: a container node and a
/// character offset within it
///
/// For a text node the offset counts characters; for an element it is a
/// child index, as in DOM ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub node: NodeId,
    pub offset: usize,
}

impl Anchor {
    /// Create an anchor at the given node and offset
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Direction of the drag gesture that produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// A live selection as the host reports it: anchor and focus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Anchor,
    pub focus: Anchor,
}

impl Selection {
    /// Create a selection from its anchor and focus endpoints
    pub fn new(anchor: Anchor, focus: Anchor) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed selection (caret) at a single position
    pub fn caret(at: Anchor) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// Whether anchor and focus mark the same position
    pub fn is_collapsed(&self, doc: &Document) -> bool {
        doc.compare_positions(&self.anchor, &self.focus) == Ordering::Equal
    }

    /// Drag direction; a collapsed selection reads as forward
    pub fn direction(&self, doc: &Document) -> Direction {
        match doc.compare_positions(&self.anchor, &self.focus) {
            Ordering::Greater => Direction::Backward,
            _ => Direction::Forward,
        }
    }

    /// Normalize to a forward-running range
    pub fn to_range(&self, doc: &Document) -> DocumentRange {
        DocumentRange::new(doc, self.anchor, self.focus)
    }

    /// Rebuild a selection from a range and the original drag direction
    pub fn from_range(range: &DocumentRange, direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self {
                anchor: range.start,
                focus: range.end,
            },
            Direction::Backward => Self {
                anchor: range.end,
                focus: range.start,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_word_doc() -> (Document, NodeId) {
        let mut doc = Document::new("body");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), p).unwrap();
        let t = doc.create_text("Hello world");
        doc.append_child(p, t).unwrap();
        (doc, t)
    }

    #[test]
    fn test_forward_selection_direction() {
        let (doc, t) = two_word_doc();
        let sel = Selection::new(Anchor::new(t, 0), Anchor::new(t, 5));

        assert_eq!(sel.direction(&doc), Direction::Forward);
        assert!(!sel.is_collapsed(&doc));
    }

    #[test]
    fn test_backward_selection_direction() {
        let (doc, t) = two_word_doc();
        let sel = Selection::new(Anchor::new(t, 5), Anchor::new(t, 0));

        assert_eq!(sel.direction(&doc), Direction::Backward);

        let range = sel.to_range(&doc);
        assert_eq!(range.start.offset, 0);
        assert_eq!(range.end.offset, 5);
    }

    #[test]
    fn test_range_round_trip_preserves_direction() {
        let (doc, t) = two_word_doc();
        let sel = Selection::new(Anchor::new(t, 8), Anchor::new(t, 2));

        let range = sel.to_range(&doc);
        let rebuilt = Selection::from_range(&range, sel.direction(&doc));

        assert_eq!(rebuilt, sel);
    }

    #[test]
    fn test_caret_is_collapsed() {
        let (doc, t) = two_word_doc();
        let sel = Selection::caret(Anchor::new(t, 3));

        assert!(sel.is_collapsed(&doc));
        assert_eq!(sel.direction(&doc), Direction::Forward);
    }
}
