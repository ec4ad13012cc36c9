//! Layout adapter: pushes computed style into the taffy flex engine and
//! reads back box geometry.
//!
//! The adapter owns the engine tree and the mapping between the document's
//! string style vocabulary and taffy's enums. Style values with no table
//! entry are left unmapped so the engine default applies; this is accepted
//! behavior, logged at debug level rather than raised.

use taffy::{
    AlignItems, AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, Size, Style,
    TaffyTree,
};
use weft_dom::{Document, NodeId, NodeKind};

/// Computed box geometry, relative to the node's positioned parent. Absolute
/// terminal coordinates are obtained by accumulating offsets during paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGeometry {
    pub top: i32,
    pub left: i32,
    pub width: u32,
    pub height: u32,
}

/// Owns the engine-side tree. Each document node holds an opaque handle into
/// it; handles are created once and never shared across nodes.
#[derive(Debug)]
pub struct LayoutEngine {
    tree: TaffyTree<()>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
        }
    }

    /// Prepares every dirty node depth-first (handle creation, style push,
    /// kind-specific overrides), then runs one whole-tree layout computation
    /// at the viewport size.
    pub fn compute(&mut self, doc: &mut Document, width: u32, height: u32) {
        let root = doc.root;
        self.prepare_node(doc, root);

        let Some(handle) = doc.node(root).layout_handle else {
            return;
        };
        let viewport = Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::Definite(height as f32),
        };
        if let Err(error) = self.tree.compute_layout(handle.into(), viewport) {
            tracing::debug!(?error, "layout computation failed");
        }
    }

    /// Reads back a node's geometry, relative to its parent. None until the
    /// first layout pass has touched the node.
    pub fn geometry(&self, doc: &Document, id: NodeId) -> Option<BoxGeometry> {
        let handle = doc.node(id).layout_handle?;
        let layout = self.tree.layout(handle.into()).ok()?;
        Some(BoxGeometry {
            top: layout.location.y.round() as i32,
            left: layout.location.x.round() as i32,
            width: layout.size.width.max(0.0).round() as u32,
            height: layout.size.height.max(0.0).round() as u32,
        })
    }

    fn prepare_node(&mut self, doc: &mut Document, id: NodeId) {
        if !doc.node(id).dirty {
            return;
        }

        self.ensure_handle(doc, id);
        self.push_style(doc, id);

        for child in doc.node(id).children.clone() {
            self.prepare_node(doc, child);
        }
    }

    /// Creates the engine-side handle on first visit, inserting it into the
    /// parent's child list at the node's sibling index. Index stability
    /// matters: the engine positions children by insertion order.
    fn ensure_handle(&mut self, doc: &mut Document, id: NodeId) {
        if doc.node(id).layout_handle.is_some() {
            return;
        }

        let handle = match self.tree.new_leaf(Style::default()) {
            Ok(handle) => handle,
            Err(error) => {
                tracing::debug!(?error, "failed to create layout handle");
                return;
            }
        };
        doc.node_mut(id).layout_handle = Some(handle.into());

        let Some(parent) = doc.node(id).parent else {
            return;
        };
        let Some(parent_handle) = doc.node(parent).layout_handle else {
            return;
        };
        let index = doc
            .node(parent)
            .children
            .iter()
            .position(|child| *child == id)
            .unwrap_or(0);
        if let Err(error) = self
            .tree
            .insert_child_at_index(parent_handle.into(), index, handle)
        {
            tracing::debug!(?error, "failed to attach layout handle");
        }
    }

    fn push_style(&mut self, doc: &Document, id: NodeId) {
        let node = doc.node(id);
        let computed = &node.computed_style;
        let mut style = Style::default();

        if let Some(display) = map_display(&computed.display) {
            style.display = display;
        } else {
            log_unmapped("display", &computed.display);
        }
        if let Some(direction) = map_flex_direction(&computed.flex_direction) {
            style.flex_direction = direction;
        } else {
            log_unmapped("flexDirection", &computed.flex_direction);
        }
        if let Some(align) = map_align_items(&computed.align_items) {
            style.align_items = Some(align);
        } else {
            log_unmapped("alignItems", &computed.align_items);
        }

        apply_kind_override(node.kind, node, &mut style);

        let Some(handle) = node.layout_handle else {
            return;
        };
        if let Err(error) = self.tree.set_style(handle.into(), style) {
            tracing::debug!(?error, "failed to push style");
        }
    }
}

/// Kind-specific geometry overrides applied after the generic style push.
/// Input draws its border at paint time without reserving edge space here.
fn apply_kind_override(kind: NodeKind, node: &weft_dom::Node, style: &mut Style) {
    match kind {
        NodeKind::TextContent => {
            style.size.width = Dimension::Length(node.text.chars().count() as f32);
            style.size.height = Dimension::Length(1.0);
        }
        NodeKind::TextElement => {
            style.size.height = Dimension::Length(1.0);
        }
        NodeKind::Button => {
            let computed = &node.computed_style;
            style.border.top = border_edge(&computed.border_top);
            style.border.right = border_edge(&computed.border_right);
            style.border.bottom = border_edge(&computed.border_bottom);
            style.border.left = border_edge(&computed.border_left);
        }
        NodeKind::Input => {
            style.size.width = Dimension::Length(20.0);
            style.size.height = Dimension::Length(3.0);
        }
        NodeKind::Root | NodeKind::Box | NodeKind::Style => {}
    }
}

fn border_edge(flag: &str) -> LengthPercentage {
    if flag == "yes" {
        LengthPercentage::Length(1.0)
    } else {
        LengthPercentage::Length(0.0)
    }
}

fn map_display(value: &str) -> Option<Display> {
    match value {
        "flex" => Some(Display::Flex),
        "none" => Some(Display::None),
        _ => None,
    }
}

fn map_flex_direction(value: &str) -> Option<FlexDirection> {
    match value {
        "row" => Some(FlexDirection::Row),
        "column" => Some(FlexDirection::Column),
        // `row-revers` is the accepted spelling in the style vocabulary;
        // `row-reverse` has no entry and falls back to the engine default.
        "row-revers" => Some(FlexDirection::RowReverse),
        "column-reverse" => Some(FlexDirection::ColumnReverse),
        _ => None,
    }
}

fn map_align_items(value: &str) -> Option<AlignItems> {
    match value {
        "flex-start" => Some(AlignItems::FlexStart),
        "flex-end" => Some(AlignItems::FlexEnd),
        "center" => Some(AlignItems::Center),
        _ => None,
    }
}

fn log_unmapped(property: &str, value: &str) {
    if !value.is_empty() {
        tracing::debug!(property, value, "style value has no engine mapping");
    }
}
