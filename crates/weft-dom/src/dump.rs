//! Indented debug dump of the document tree.

use crate::{Document, NodeId};

/// Geometry supplier for the dump: `(top, left, width, height)` relative to
/// the node's parent, or None when layout has not touched the node yet. The
/// layout adapter owns geometry, so the dump takes it as a seam.
pub type GeometryLookup<'a> = &'a dyn Fn(NodeId) -> Option<(i32, i32, u32, u32)>;

impl Document {
    /// Dumps the tree with kinds and non-empty computed style entries.
    pub fn dump(&self) -> String {
        self.dump_with_geometry(&|_| None, false)
    }

    /// Dumps the tree, optionally skipping `ignore_render` subtrees
    /// (`render_tree = true`) and annotating nodes with geometry.
    pub fn dump_with_geometry(&self, geometry: GeometryLookup<'_>, render_tree: bool) -> String {
        let mut out = String::new();
        self.dump_node(self.root, geometry, render_tree, 0, &mut out);
        out
    }

    fn dump_node(
        &self,
        id: NodeId,
        geometry: GeometryLookup<'_>,
        render_tree: bool,
        depth: usize,
        out: &mut String,
    ) {
        let offset = "    ".repeat(depth);
        let node = self.node(id);
        out.push_str(&format!("{offset}{}\n", node.kind.as_str()));

        let styles = node.computed_style.entries();
        if !styles.is_empty() {
            out.push_str(&format!("{offset}  #style:\n"));
            for (name, value) in styles {
                out.push_str(&format!("{offset}    {name}: {value}\n"));
            }
        }

        if let Some((top, left, width, height)) = geometry(id) {
            out.push_str(&format!("{offset}  #layout:\n"));
            out.push_str(&format!("{offset}    width: {width}\n"));
            out.push_str(&format!("{offset}    height: {height}\n"));
            out.push_str(&format!("{offset}    top: {top}\n"));
            out.push_str(&format!("{offset}    left: {left}\n"));
        }

        if !node.children.is_empty() {
            out.push_str(&format!("{offset}  #children:\n"));
            for child in &node.children {
                if render_tree && self.node(*child).ignore_render {
                    continue;
                }
                self.dump_node(*child, geometry, render_tree, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Descriptor, Document};

    #[test]
    fn dump_lists_kinds_in_tree_order() {
        let doc = Document::from_descriptors(&[Descriptor::element(
            "box",
            vec![Descriptor::element("text", vec![Descriptor::text("hi")])],
        )])
        .unwrap_or_else(|_| unreachable!());

        let dump = doc.dump();
        let root_pos = dump.find("root").unwrap_or_else(|| unreachable!());
        let box_pos = dump.find("box").unwrap_or_else(|| unreachable!());
        let text_pos = dump.find("text").unwrap_or_else(|| unreachable!());
        assert!(root_pos < box_pos);
        assert!(box_pos < text_pos);
    }

    #[test]
    fn render_tree_dump_skips_ignored_subtrees() {
        let mut doc = Document::from_descriptors(&[
            Descriptor::element("box", vec![]),
            Descriptor::element("button", vec![]),
        ])
        .unwrap_or_else(|_| unreachable!());

        let hidden = doc.node(doc.root).children[0];
        doc.node_mut(hidden).ignore_render = true;

        let dump = doc.dump_with_geometry(&|_| None, true);
        assert!(!dump.contains("box\n"));
        assert!(dump.contains("button"));
    }
}
