//! Render-tree filter: marks nodes to skip during paint without pruning.

use weft_dom::{Document, NodeId};

/// Sets `ignore_render` for every dirty node based on its computed display
/// value. Traversal recurses into children regardless of the parent's own
/// filter result: a hidden parent may still contain nodes whose state must
/// stay current even though they are not painted this frame.
pub fn apply_render_filter(doc: &mut Document) {
    filter_node(doc, doc.root);
}

fn filter_node(doc: &mut Document, id: NodeId) {
    if !doc.node(id).dirty {
        return;
    }

    doc.node_mut(id).ignore_render = doc.node(id).computed_style.display == "none";

    for child in doc.node(id).children.clone() {
        filter_node(doc, child);
    }
}
