//! Vector overlays for rasterized pages
//!
//! PDF-style viewers draw each page as an image or canvas and lay an
//! invisible text layer above it for selection and accessibility.
//! Background-coloring that transparent text is invisible, and the
//! raster cannot be restyled, so the visible highlight is a rectangle
//! in a vector canvas positioned exactly over the raster surface. The
//! text DOM stays in place as the hit-testing layer; a multiply-style
//! blend makes overlapping rectangles darken dark-on-light page content
//! instead of washing it out.

use tracing::{debug, trace, warn};

use crate::config::HighlightConfig;
use crate::dom::layout::LayoutProvider;
use crate::dom::{Document, DomError, NodeId};
use crate::error::Result;
use crate::geometry::Rect;

use super::{HighlightId, Highlighter};

impl Highlighter {
    /// Render vector overlay rectangles for a batch of highlights that
    /// all sit on the same rasterized page
    ///
    /// The caller batches per page. Highlights without a raster surface
    /// below them, stale handles, and already-rendered highlights are
    /// skipped. The page's vector canvas is created lazily once and
    /// reused across batches; every layout read happens before the
    /// first mutation.
    pub fn render_page_overlays(
        &mut self,
        doc: &mut Document,
        layout: &dyn LayoutProvider,
        ids: &[HighlightId],
    ) -> Result<()> {
        let mut surface = None;
        for id in ids {
            if let Some(record) = self.records.get(id) {
                surface = find_raster_surface(doc, record.container, &self.config);
                if surface.is_some() {
                    break;
                }
            }
        }
        let Some(surface) = surface else {
            debug!("no raster surface below batch; nothing to overlay");
            return Ok(());
        };
        let Some(parent) = doc.parent(surface) else {
            return Ok(());
        };
        let Some(surface_rect) = layout.node_rect(doc, surface) else {
            debug!("raster surface has no geometry; nothing to overlay");
            return Ok(());
        };
        let parent_rect = layout.node_rect(doc, parent);

        // read phase: measure everything before mutating the tree
        let mut measured: Vec<(HighlightId, Rect)> = Vec::new();
        for &id in ids {
            let Some(record) = self.records.get(&id) else {
                trace!(%id, "stale highlight handle; skipping overlay");
                continue;
            };
            if record.overlay_rect.is_some() {
                continue;
            }
            match layout.node_rect(doc, record.container) {
                Some(rect) => measured.push((id, rect)),
                None => warn!(%id, "highlight has no geometry; skipping overlay"),
            }
        }

        // write phase
        let canvas = ensure_overlay_canvas(
            doc,
            parent,
            surface,
            &surface_rect,
            parent_rect.as_ref(),
            &self.config,
        )?;
        let id_attribute = self.config.id_attribute.clone();
        let class_prefix = self.config.class_prefix.clone();
        let shape_class = self.config.shape_class();
        let transparent_class = self.config.transparent_class();
        let focused_class = self.config.focused_class();
        for (id, rect) in measured {
            let local = rect.translate(-surface_rect.x, -surface_rect.y);
            let shape = doc.create_element("rect");
            doc.set_attribute(shape, "x", &local.x.to_string())?;
            doc.set_attribute(shape, "y", &local.y.to_string())?;
            doc.set_attribute(shape, "width", &local.width.to_string())?;
            doc.set_attribute(shape, "height", &local.height.to_string())?;
            doc.set_attribute(shape, &id_attribute, &id.to_string())?;
            doc.add_class(shape, &shape_class)?;

            let Some(record) = self.records.get_mut(&id) else {
                continue;
            };
            if let Some(tag) = &record.style_tag {
                let tint = format!("{}-{}", class_prefix, tag);
                doc.add_class(shape, &tint)?;
            }
            if record.focused {
                doc.add_class(shape, &focused_class)?;
            }
            doc.append_child(canvas, shape)?;
            record.overlay_rect = Some(shape);
            // the text layer is now purely a hit-testing surface
            doc.add_class(record.container, &transparent_class)?;
        }
        Ok(())
    }

    /// Overlay rectangle node of a highlight, if one was rendered
    pub fn overlay_rect(&self, id: HighlightId) -> Option<NodeId> {
        self.records.get(&id).and_then(|r| r.overlay_rect)
    }
}

/// Nearest ancestor matching the configured text-layer boundary whose
/// parent also holds a rasterized img/canvas sibling
fn find_raster_surface(doc: &Document, node: NodeId, config: &HighlightConfig) -> Option<NodeId> {
    let mut cur = Some(node);
    while let Some(id) = cur {
        if doc.is_element(id) && doc.has_class(id, &config.text_layer_class) {
            let parent = doc.parent(id)?;
            return doc
                .children(parent)
                .iter()
                .copied()
                .find(|&sibling| {
                    sibling != id && matches!(doc.tag(sibling), Some("img") | Some("canvas"))
                });
        }
        cur = doc.parent(id);
    }
    None
}

/// Find or create the page's vector canvas, positioned over the raster
/// surface
///
/// Lookup-before-create keeps the canvas unique per surface parent even
/// though separate highlight batches target the same page.
fn ensure_overlay_canvas(
    doc: &mut Document,
    parent: NodeId,
    surface: NodeId,
    surface_rect: &Rect,
    parent_rect: Option<&Rect>,
    config: &HighlightConfig,
) -> std::result::Result<NodeId, DomError> {
    if let Some(existing) = doc
        .children(parent)
        .iter()
        .copied()
        .find(|&child| doc.is_element(child) && doc.has_class(child, &config.overlay_class))
    {
        return Ok(existing);
    }
    let canvas = doc.create_element("svg");
    doc.add_class(canvas, &config.overlay_class)?;
    let (left, top) = match parent_rect {
        Some(p) => (surface_rect.x - p.x, surface_rect.y - p.y),
        None => (0.0, 0.0),
    };
    let style = format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;\
         mix-blend-mode:multiply;pointer-events:none",
        left, top, surface_rect.width, surface_rect.height
    );
    doc.set_attribute(canvas, "style", &style)?;
    let after = doc.next_sibling(surface);
    doc.insert_before(parent, canvas, after)?;
    debug!("created overlay canvas for raster surface");
    Ok(canvas)
}
