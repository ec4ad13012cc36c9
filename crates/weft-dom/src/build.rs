//! Tree construction from parsed markup descriptors.

use crate::{Document, NodeId, NodeKind};
use std::collections::BTreeMap;
use weft_core::{WeftError, WeftResult};

/// One parsed markup node as produced by the markup parser: either an element
/// with a tag, attribute map, and same-shaped children, or a literal text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<Descriptor>,
    },
    Text(String),
}

impl Descriptor {
    /// Convenience constructor for an element without attributes.
    pub fn element(tag: &str, children: Vec<Descriptor>) -> Self {
        Descriptor::Element {
            tag: tag.to_owned(),
            attributes: BTreeMap::new(),
            children,
        }
    }

    /// Convenience constructor for an element with attributes.
    pub fn element_with_attrs(
        tag: &str,
        attributes: &[(&str, &str)],
        children: Vec<Descriptor>,
    ) -> Self {
        Descriptor::Element {
            tag: tag.to_owned(),
            attributes: attributes
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                .collect(),
            children,
        }
    }

    pub fn text(content: &str) -> Self {
        Descriptor::Text(content.to_owned())
    }
}

impl Document {
    /// Builds the document tree from an ordered descriptor sequence,
    /// synthesizing the root node. Descriptor order is preserved at every
    /// level; focusable nodes are linked into the focus chain in document
    /// order during the same traversal. An unrecognized tag aborts
    /// construction — the document is malformed.
    pub fn from_descriptors(descriptors: &[Descriptor]) -> WeftResult<Self> {
        let mut doc = Document::with_root();
        let root = doc.root;
        doc.append_descriptors(descriptors, root)?;
        Ok(doc)
    }

    fn append_descriptors(
        &mut self,
        descriptors: &[Descriptor],
        parent: NodeId,
    ) -> WeftResult<()> {
        for descriptor in descriptors {
            match descriptor {
                Descriptor::Text(content) => {
                    let id = self.append_node(NodeKind::TextContent, parent, BTreeMap::new());
                    self.node_mut(id).text = content.clone();

                    // Literal text under <style> feeds the stylesheet buffer.
                    if self.node(parent).kind == NodeKind::Style {
                        if !self.stylesheet_source.is_empty() {
                            self.stylesheet_source.push('\n');
                        }
                        self.stylesheet_source.push_str(content);
                    }
                }
                Descriptor::Element {
                    tag,
                    attributes,
                    children,
                } => {
                    let kind = kind_for_tag(tag).ok_or_else(|| WeftError::UnknownElement {
                        tag: tag.clone(),
                        parent_kind: self.node(parent).kind.as_str().to_owned(),
                    })?;
                    let id = self.append_node(kind, parent, attributes.clone());
                    self.append_descriptors(children, id)?;
                }
            }
        }

        Ok(())
    }
}

fn kind_for_tag(tag: &str) -> Option<NodeKind> {
    match tag {
        "box" => Some(NodeKind::Box),
        "text" => Some(NodeKind::TextElement),
        "#text" => Some(NodeKind::TextContent),
        "input" => Some(NodeKind::Input),
        "button" => Some(NodeKind::Button),
        "style" => Some(NodeKind::Style),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::Descriptor;
    use crate::{Document, NodeKind};

    #[test]
    fn builds_nested_tree_in_descriptor_order() {
        let doc = Document::from_descriptors(&[Descriptor::element(
            "box",
            vec![
                Descriptor::element("text", vec![Descriptor::text("hi")]),
                Descriptor::element("button", vec![]),
            ],
        )]);

        let doc = doc.unwrap_or_else(|_| unreachable!());
        let root_children = &doc.node(doc.root).children;
        assert_eq!(root_children.len(), 1);

        let outer = root_children[0];
        assert_eq!(doc.node(outer).kind, NodeKind::Box);

        let inner = &doc.node(outer).children;
        assert_eq!(inner.len(), 2);
        assert_eq!(doc.node(inner[0]).kind, NodeKind::TextElement);
        assert_eq!(doc.node(inner[1]).kind, NodeKind::Button);
        assert_eq!(doc.inner_text(inner[0]), "hi");
    }

    #[test]
    fn unknown_tag_fails_with_tag_and_parent_kind() {
        let result = Document::from_descriptors(&[Descriptor::element(
            "box",
            vec![Descriptor::element("marquee", vec![])],
        )]);

        match result {
            Err(weft_core::WeftError::UnknownElement { tag, parent_kind }) => {
                assert_eq!(tag, "marquee");
                assert_eq!(parent_kind, "box");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn style_text_accumulates_into_stylesheet_source() {
        let doc = Document::from_descriptors(&[
            Descriptor::element("style", vec![Descriptor::text("box { color: red; }")]),
            Descriptor::element("style", vec![Descriptor::text("text { color: blue; }")]),
        ]);

        let doc = doc.unwrap_or_else(|_| unreachable!());
        assert_eq!(
            doc.stylesheet_source,
            "box { color: red; }\ntext { color: blue; }"
        );
    }

    #[test]
    fn focus_chain_follows_document_order() {
        let doc = Document::from_descriptors(&[Descriptor::element(
            "box",
            vec![
                Descriptor::element("input", vec![]),
                Descriptor::element("box", vec![Descriptor::element("button", vec![])]),
                Descriptor::element("input", vec![]),
            ],
        )]);

        let doc = doc.unwrap_or_else(|_| unreachable!());
        let first = doc.focus_first.unwrap_or_else(|| unreachable!());
        assert_eq!(doc.node(first).kind, NodeKind::Input);
        assert_eq!(doc.node(first).tab_index, 0);

        let second = doc.node(first).focus_next.unwrap_or_else(|| unreachable!());
        assert_eq!(doc.node(second).kind, NodeKind::Button);

        let third = doc
            .node(second)
            .focus_next
            .unwrap_or_else(|| unreachable!());
        assert_eq!(doc.node(third).kind, NodeKind::Input);
        assert_eq!(doc.node(third).focus_next, None);
    }
}
