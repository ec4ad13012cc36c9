//! Document tree: typed nodes, cascading style state, dirty propagation.

mod build;
mod dump;
mod focus;
mod style;

pub use build::Descriptor;
pub use dump::GeometryLookup;
pub use style::{STYLE_PROPERTIES, StyleMap};

use std::collections::BTreeMap;

/// ID used to address nodes in the document arena.
pub type NodeId = usize;

/// Closed set of node kinds. Fixed and enumerable; kind-specific behavior
/// lives in small per-kind tables rather than virtual dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Box,
    TextElement,
    TextContent,
    Input,
    Button,
    Style,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Box => "box",
            NodeKind::TextElement => "text",
            NodeKind::TextContent => "#text",
            NodeKind::Input => "input",
            NodeKind::Button => "button",
            NodeKind::Style => "style",
        }
    }

    /// Kinds that participate in the focus chain.
    pub fn is_focusable(self) -> bool {
        matches!(self, NodeKind::Input | NodeKind::Button)
    }

    /// Per-kind default style record.
    pub fn default_style(self) -> StyleMap {
        let mut style = StyleMap::default();
        match self {
            NodeKind::Root | NodeKind::Box => {
                style.display = "flex".to_owned();
                style.flex_direction = "column".to_owned();
                style.align_items = "flex-start".to_owned();
            }
            NodeKind::TextElement => {
                style.display = "flex".to_owned();
                style.flex_direction = "row".to_owned();
                style.align_items = "flex-start".to_owned();
            }
            NodeKind::Button => {
                style.display = "flex".to_owned();
                style.flex_direction = "row".to_owned();
                style.align_items = "flex-start".to_owned();
                style.border_top = "yes".to_owned();
                style.border_right = "yes".to_owned();
                style.border_bottom = "yes".to_owned();
                style.border_left = "yes".to_owned();
            }
            NodeKind::Input => {
                style.background_color = "green".to_owned();
                style.border_top = "yes".to_owned();
                style.border_right = "yes".to_owned();
                style.border_bottom = "yes".to_owned();
                style.border_left = "yes".to_owned();
            }
            NodeKind::Style => {
                // Stylesheet subtrees are data, not content; they must never
                // reach layout or paint.
                style.display = "none".to_owned();
            }
            NodeKind::TextContent => {}
        }
        style
    }

    /// Per-kind active-state override, merged over the default while the node
    /// holds focus. Focusable kinds swap to a thick border as the focus ring.
    pub fn active_style(self) -> StyleMap {
        let mut style = StyleMap::default();
        if self.is_focusable() {
            style.border_width = "thick".to_owned();
        }
        style
    }
}

/// One vertex of the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub attributes: BTreeMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub style_default: StyleMap,
    pub style_active: StyleMap,
    pub computed_style: StyleMap,
    pub dirty: bool,
    pub ignore_render: bool,
    /// Opaque handle into the layout adapter; absent until first layout pass.
    pub layout_handle: Option<u64>,
    /// -1 when not focusable, else the rank in the focus chain.
    pub tab_index: i32,
    pub focus_prev: Option<NodeId>,
    pub focus_next: Option<NodeId>,
    /// Literal payload; TextContent only.
    pub text: String,
    /// Current field contents; Input only.
    pub value: String,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>, attributes: BTreeMap<String, String>) -> Self {
        Self {
            kind,
            attributes,
            parent,
            children: Vec::new(),
            style_default: kind.default_style(),
            style_active: kind.active_style(),
            computed_style: StyleMap::default(),
            dirty: true,
            ignore_render: false,
            layout_handle: None,
            tab_index: -1,
            focus_prev: None,
            focus_next: None,
            text: String::new(),
            value: String::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// The document: an arena of nodes plus document-wide state gathered during
/// construction (stylesheet text, focus chain endpoints, active node).
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    pub root: NodeId,
    /// `<style>` text accumulated during construction; cascade application is
    /// an explicit stub and the source is carried through unchanged.
    pub stylesheet_source: String,
    /// The focused node. At most one node is active at a time.
    pub active: Option<NodeId>,
    /// Head of the focus chain; the interaction entry point.
    pub focus_first: Option<NodeId>,
    focus_last: Option<NodeId>,
    next_tab_index: i32,
}

impl Document {
    pub(crate) fn with_root() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root, None, BTreeMap::new())],
            root: 0,
            stylesheet_source: String::new(),
            active: None,
            focus_first: None,
            focus_last: None,
            next_tab_index: 0,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Concatenated text of `id`'s direct TextContent children.
    pub fn inner_text(&self, id: NodeId) -> String {
        self.nodes[id]
            .children
            .iter()
            .map(|child| &self.nodes[*child])
            .filter(|child| child.kind == NodeKind::TextContent)
            .map(|child| child.text.as_str())
            .collect()
    }

    pub(crate) fn append_node(
        &mut self,
        kind: NodeKind,
        parent: NodeId,
        attributes: BTreeMap<String, String>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(kind, Some(parent), attributes));
        self.nodes[parent].children.push(id);

        if kind.is_focusable() {
            self.link_into_focus_chain(id);
        }

        id
    }

    fn link_into_focus_chain(&mut self, id: NodeId) {
        self.nodes[id].tab_index = self.next_tab_index;
        self.next_tab_index += 1;

        if let Some(last) = self.focus_last {
            self.nodes[last].focus_next = Some(id);
            self.nodes[id].focus_prev = Some(last);
        } else {
            self.focus_first = Some(id);
        }
        self.focus_last = Some(id);
    }

    /// Marks `id` and its whole subtree dirty, then walks upward marking
    /// ancestors until one is found already dirty.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.mark_subtree_dirty(id);

        let mut current = self.nodes[id].parent;
        while let Some(ancestor) = current {
            if self.nodes[ancestor].dirty {
                break;
            }
            self.nodes[ancestor].dirty = true;
            current = self.nodes[ancestor].parent;
        }
    }

    fn mark_subtree_dirty(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            self.nodes[next].dirty = true;
            stack.extend(self.nodes[next].children.iter().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, NodeKind};
    use std::collections::BTreeMap;

    fn attrs() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn append_preserves_child_order_and_parent() {
        let mut doc = Document::with_root();
        let first = doc.append_node(NodeKind::Box, doc.root, attrs());
        let second = doc.append_node(NodeKind::Box, doc.root, attrs());

        assert_eq!(doc.node(doc.root).children, vec![first, second]);
        assert_eq!(doc.node(first).parent, Some(doc.root));
        assert_eq!(doc.node(second).parent, Some(doc.root));
    }

    #[test]
    fn focusable_nodes_get_sequential_tab_ranks() {
        let mut doc = Document::with_root();
        let button = doc.append_node(NodeKind::Button, doc.root, attrs());
        let plain = doc.append_node(NodeKind::Box, doc.root, attrs());
        let input = doc.append_node(NodeKind::Input, doc.root, attrs());

        assert_eq!(doc.node(button).tab_index, 0);
        assert_eq!(doc.node(plain).tab_index, -1);
        assert_eq!(doc.node(input).tab_index, 1);
        assert_eq!(doc.focus_first, Some(button));
        assert_eq!(doc.node(button).focus_next, Some(input));
        assert_eq!(doc.node(input).focus_prev, Some(button));
    }

    #[test]
    fn marking_internal_node_dirties_descendants() {
        let mut doc = Document::with_root();
        let middle = doc.append_node(NodeKind::Box, doc.root, attrs());
        let leaf = doc.append_node(NodeKind::Box, middle, attrs());

        for id in [doc.root, middle, leaf] {
            doc.node_mut(id).dirty = false;
        }

        doc.mark_dirty(middle);
        assert!(doc.node(middle).dirty);
        assert!(doc.node(leaf).dirty);
        assert!(doc.node(doc.root).dirty);
    }

    #[test]
    fn ancestor_walk_stops_at_already_dirty_ancestor() {
        let mut doc = Document::with_root();
        let top = doc.append_node(NodeKind::Box, doc.root, attrs());
        let middle = doc.append_node(NodeKind::Box, top, attrs());
        let leaf = doc.append_node(NodeKind::Box, middle, attrs());

        for id in [doc.root, top, middle, leaf] {
            doc.node_mut(id).dirty = false;
        }
        doc.node_mut(top).dirty = true;

        doc.mark_dirty(leaf);
        assert!(doc.node(leaf).dirty);
        assert!(doc.node(middle).dirty);
        // The walk stops at `top`, leaving the root untouched.
        assert!(!doc.node(doc.root).dirty);
    }

    #[test]
    fn style_kind_defaults_to_display_none() {
        assert_eq!(NodeKind::Style.default_style().display, "none");
    }

    #[test]
    fn inner_text_joins_text_children() {
        let mut doc = Document::with_root();
        let text = doc.append_node(NodeKind::TextElement, doc.root, attrs());
        let run = doc.append_node(NodeKind::TextContent, text, attrs());
        doc.node_mut(run).text = "hello".to_owned();

        assert_eq!(doc.inner_text(text), "hello");
        assert_eq!(doc.inner_text(doc.root), "");
    }
}
