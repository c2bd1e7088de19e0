//! Word snapping for settled selections
//!
//! Extends a non-collapsed selection outward to the nearest
//! whitespace-delimited word boundaries. An endpoint resting on
//! whitespace is first trimmed inward to the edge of the covered word,
//! so a grab of `"llo "` in `"Hello world"` settles on `"Hello"`.
//! Snapping never crosses a text-node boundary, and the original drag
//! direction is preserved so later extension gestures continue from the
//! correct end.

use crate::dom::{Anchor, Document, DomError, Selection};

/// Snap both ends of a selection to word boundaries
///
/// Element-container endpoints are left untouched; only text-node
/// endpoints snap. Errors surface when an endpoint's offset lies
/// outside its node, which callers treat as an unreadable selection.
pub(crate) fn snap_to_words(doc: &Document, selection: &Selection) -> Result<Selection, DomError> {
    if selection.is_collapsed(doc) {
        return Ok(selection.clone());
    }
    let direction = selection.direction(doc);
    let range = selection.to_range(doc);

    let start = snap_start(doc, &range.start)?;
    let end = snap_end(doc, &range.end)?;
    let snapped = crate::dom::DocumentRange::new(doc, start, end);
    Ok(Selection::from_range(&snapped, direction))
}

/// Move a start anchor to the opening boundary of its word
fn snap_start(doc: &Document, anchor: &Anchor) -> Result<Anchor, DomError> {
    let Some(chars) = text_chars(doc, anchor)? else {
        return Ok(*anchor);
    };
    let mut offset = anchor.offset;
    // trim forward off leading whitespace, then extend to the word start
    while offset < chars.len() && chars[offset].is_whitespace() {
        offset += 1;
    }
    while offset > 0 && !chars[offset - 1].is_whitespace() {
        offset -= 1;
    }
    Ok(Anchor::new(anchor.node, offset))
}

/// Move an end anchor to the closing boundary of its word
fn snap_end(doc: &Document, anchor: &Anchor) -> Result<Anchor, DomError> {
    let Some(chars) = text_chars(doc, anchor)? else {
        return Ok(*anchor);
    };
    let mut offset = anchor.offset;
    // trim backward off trailing whitespace, then extend to the word end
    while offset > 0 && chars[offset - 1].is_whitespace() {
        offset -= 1;
    }
    while offset < chars.len() && !chars[offset].is_whitespace() {
        offset += 1;
    }
    Ok(Anchor::new(anchor.node, offset))
}

/// Characters of the anchor's text node, or `None` for element anchors
fn text_chars(doc: &Document, anchor: &Anchor) -> Result<Option<Vec<char>>, DomError> {
    let Some(text) = doc.text(anchor.node) else {
        return Ok(None);
    };
    let chars: Vec<char> = text.chars().collect();
    if anchor.offset > chars.len() {
        return Err(DomError::OffsetOutOfRange {
            node: anchor.node,
            offset: anchor.offset,
            len: chars.len(),
        });
    }
    Ok(Some(chars))
}
