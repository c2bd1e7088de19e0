//! Registry operations over previously created highlights
//!
//! All operations tolerate stale handles: an external consumer may keep
//! a handle long after an unrelated DOM change removed the element, so
//! removal and focus of missing or detached highlights are no-ops.

use tracing::{trace, warn};

use crate::dom::layout::LayoutProvider;
use crate::dom::{Document, NodeId};
use crate::error::{HighlightError, Result};
use crate::geometry::Rect;

use super::{HighlightId, Highlighter};

impl Highlighter {
    /// Remove highlights, restoring the wrapped text nodes to their
    /// original position and relative order
    ///
    /// Deletes each highlight's vector-overlay rectangle if present.
    /// Idempotent: removing an already-removed or stale handle is a
    /// no-op.
    pub fn remove_highlights(&mut self, doc: &mut Document, ids: &[HighlightId]) {
        for id in ids {
            let Some(record) = self.records.remove(id) else {
                trace!(%id, "stale highlight handle; nothing to remove");
                continue;
            };
            if let Some(rect) = record.overlay_rect {
                doc.detach(rect);
            }
            if doc.is_attached(record.container) {
                if let Err(err) = doc.replace_with_children(record.container) {
                    warn!(%id, error = %err, "failed to unwrap highlight container");
                }
            }
        }
    }

    /// Toggle the focused state of highlights
    ///
    /// When a vector-overlay rectangle exists, focusing also re-appends
    /// it as the last-drawn sibling in its canvas so focused highlights
    /// paint above unfocused ones on the same page.
    pub fn set_focused(&mut self, doc: &mut Document, ids: &[HighlightId], focused: bool) {
        let focused_class = self.config.focused_class();
        for id in ids {
            let Some(record) = self.records.get_mut(id) else {
                trace!(%id, "stale highlight handle; cannot focus");
                continue;
            };
            record.focused = focused;
            let container = record.container;
            let overlay_rect = record.overlay_rect;

            let result = if focused {
                doc.add_class(container, &focused_class)
            } else {
                doc.remove_class(container, &focused_class)
            };
            if let Err(err) = result {
                trace!(%id, error = %err, "focus toggle on detached container");
                continue;
            }
            if let Some(rect) = overlay_rect {
                let toggle = if focused {
                    doc.add_class(rect, &focused_class)
                } else {
                    doc.remove_class(rect, &focused_class)
                };
                if let Err(err) = toggle {
                    trace!(%id, error = %err, "focus toggle on overlay rect");
                }
                if focused {
                    if let Some(canvas) = doc.parent(rect) {
                        // last-drawn wins under same-origin painting order
                        if let Err(err) = doc.append_child(canvas, rect) {
                            trace!(%id, error = %err, "failed to raise overlay rect");
                        }
                    }
                }
            }
        }
    }

    /// Toggle the display mode for every highlight under `root`
    ///
    /// Highlights default to invisible so annotation ranges can exist
    /// without cluttering the page until the consumer renders them.
    pub fn set_visible(&self, doc: &mut Document, root: NodeId, visible: bool) -> Result<()> {
        if visible {
            doc.add_class(root, &self.config.visible_class)?;
        } else {
            doc.remove_class(root, &self.config.visible_class)?;
        }
        Ok(())
    }

    /// Smallest axis-aligned rectangle covering every listed highlight
    ///
    /// An empty handle list is a caller contract violation. Handles
    /// without measurable geometry are skipped; when none measure,
    /// [`HighlightError::NoGeometry`] is returned.
    pub fn bounding_box(
        &self,
        doc: &Document,
        layout: &dyn LayoutProvider,
        ids: &[HighlightId],
    ) -> Result<Rect> {
        if ids.is_empty() {
            return Err(HighlightError::EmptyBatch);
        }
        let mut acc: Option<Rect> = None;
        for id in ids {
            let Some(record) = self.records.get(id) else {
                trace!(%id, "stale highlight handle; skipping in bounding box");
                continue;
            };
            let Some(rect) = layout.node_rect(doc, record.container) else {
                continue;
            };
            acc = Some(match acc {
                Some(existing) => existing.union(&rect),
                None => rect,
            });
        }
        acc.ok_or(HighlightError::NoGeometry)
    }
}
