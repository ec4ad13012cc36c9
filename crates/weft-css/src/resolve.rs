//! Style resolution: per-node cascade into the computed style record.

use crate::parse_declarations;
use weft_dom::{Document, NodeId};

/// Recomputes `computed_style` for every dirty node, depth-first. Order per
/// node: kind default record, then the active override iff the node holds
/// focus, then inline `style` declarations. Later sources overwrite same-named
/// fields; fields absent everywhere keep the empty-string sentinel. The pass
/// is idempotent on an unchanged node.
pub fn resolve_styles(doc: &mut Document) {
    resolve_node(doc, doc.root);
}

fn resolve_node(doc: &mut Document, id: NodeId) {
    if !doc.node(id).dirty {
        return;
    }

    let mut style = doc.node(id).style_default.clone();
    if doc.active == Some(id) {
        let active = doc.node(id).style_active.clone();
        style.merge_from(&active);
    }
    if let Some(inline) = doc.node(id).attribute("style") {
        // Unrecognized property names fall out of the closed set and are
        // dropped by StyleMap::set.
        for (name, value) in parse_declarations(inline) {
            style.set(&name, &value);
        }
    }
    doc.node_mut(id).computed_style = style;

    for child in doc.node(id).children.clone() {
        resolve_node(doc, child);
    }
}
