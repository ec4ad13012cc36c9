//! Focus chain: Tab navigation and active-style swap.
//!
//! The chain is built once during tree construction and never changes shape.
//! Exactly one node holds focus at a time; focusing swaps the node's computed
//! style to default-merged-with-active, blurring resets it to default-only.

use crate::{Document, NodeId};

impl Document {
    /// Focuses `id`: recomputes its style as default merged with the active
    /// override and marks it dirty.
    pub fn focus(&mut self, id: NodeId) {
        let merged = {
            let node = self.node(id);
            let mut style = node.style_default.clone();
            style.merge_from(&node.style_active);
            style
        };
        self.node_mut(id).computed_style = merged;
        self.active = Some(id);
        self.mark_dirty(id);
    }

    /// Blurs `id`: resets its computed style to the default record and marks
    /// it dirty.
    pub fn blur(&mut self, id: NodeId) {
        let default = self.node(id).style_default.clone();
        self.node_mut(id).computed_style = default;
        if self.active == Some(id) {
            self.active = None;
        }
        self.mark_dirty(id);
    }

    /// Tab navigation: blurs the active node, then focuses its successor,
    /// wrapping to the chain head. With no previously active node the chain
    /// head is focused. Returns the newly focused node, or None when the
    /// document has no focusable nodes.
    pub fn advance_focus(&mut self) -> Option<NodeId> {
        let next = match self.active {
            Some(current) => {
                let next = self.node(current).focus_next.or(self.focus_first);
                self.blur(current);
                next
            }
            None => self.focus_first,
        };

        if let Some(id) = next {
            self.focus(id);
        }
        next
    }
}
