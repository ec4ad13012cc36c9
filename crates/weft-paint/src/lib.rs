//! Paint engine: turns computed geometry into a terminal character buffer.

mod canvas;

pub use canvas::Canvas;

use weft_dom::{Document, NodeId, NodeKind, StyleMap};
use weft_layout::LayoutEngine;

/// Box-drawing glyphs for one border weight.
#[derive(Debug, Clone, Copy)]
struct GlyphSet {
    horizontal: char,
    vertical: char,
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
}

const THIN: GlyphSet = GlyphSet {
    horizontal: '\u{2500}',
    vertical: '\u{2502}',
    top_left: '\u{250C}',
    top_right: '\u{2510}',
    bottom_left: '\u{2514}',
    bottom_right: '\u{2518}',
};

const THICK: GlyphSet = GlyphSet {
    horizontal: '\u{2501}',
    vertical: '\u{2503}',
    top_left: '\u{250F}',
    top_right: '\u{2513}',
    bottom_left: '\u{2517}',
    bottom_right: '\u{251B}',
};

/// Which border edges are present and which glyph weight they use.
#[derive(Debug, Clone, Copy)]
struct BorderSpec {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
    thick: bool,
}

impl BorderSpec {
    fn from_style(style: &StyleMap) -> Self {
        Self {
            top: style.border_top == "yes",
            right: style.border_right == "yes",
            bottom: style.border_bottom == "yes",
            left: style.border_left == "yes",
            thick: style.border_width == "thick",
        }
    }

    fn glyphs(&self) -> GlyphSet {
        if self.thick { THICK } else { THIN }
    }
}

/// Paints the document into a fresh `width` × `height` buffer and serializes
/// it row-major as newline-joined text. Children paint strictly after their
/// own node, so an overlapping child overwrites the parent's cells. Every
/// painted node has its dirty flag cleared.
pub fn paint(doc: &mut Document, engine: &LayoutEngine, width: u32, height: u32) -> String {
    let mut canvas = Canvas::new(width, height);
    paint_node(&mut canvas, doc, engine, doc.root, 0, 0);
    canvas.to_text()
}

fn paint_node(
    canvas: &mut Canvas,
    doc: &mut Document,
    engine: &LayoutEngine,
    id: NodeId,
    offset_top: i32,
    offset_left: i32,
) {
    if doc.node(id).ignore_render {
        // The earlier passes already recomputed this subtree; a stale dirty
        // flag here would stop the ancestor walk early on the next mutation.
        clear_dirty_subtree(doc, id);
        return;
    }
    doc.node_mut(id).dirty = false;

    let Some(geometry) = engine.geometry(doc, id) else {
        return;
    };
    let top = geometry.top + offset_top;
    let left = geometry.left + offset_left;

    let border = BorderSpec::from_style(&doc.node(id).computed_style);
    paint_border(canvas, border, top, left, geometry.width, geometry.height);

    match doc.node(id).kind {
        NodeKind::TextContent => {
            let text = doc.node(id).text.clone();
            canvas.put_text(top, left, &text);
        }
        NodeKind::Input => {
            if let Some(placeholder) = doc.node(id).attribute("placeholder") {
                let placeholder = placeholder.to_owned();
                let content_top = top + i32::from(border.top);
                let content_left = left + i32::from(border.left);
                canvas.put_text(content_top, content_left, &placeholder);
            }
        }
        _ => {}
    }

    for child in doc.node(id).children.clone() {
        paint_node(canvas, doc, engine, child, top, left);
    }
}

fn clear_dirty_subtree(doc: &mut Document, id: NodeId) {
    let mut stack = vec![id];
    while let Some(next) = stack.pop() {
        doc.node_mut(next).dirty = false;
        stack.extend(doc.node(next).children.iter().copied());
    }
}

fn paint_border(canvas: &mut Canvas, border: BorderSpec, top: i32, left: i32, width: u32, height: u32) {
    if width == 0 || height == 0 {
        return;
    }

    let glyphs = border.glyphs();
    let width = width as i32;
    let height = height as i32;
    let run_width = width - i32::from(border.left) - i32::from(border.right);
    let run_height = height - i32::from(border.top) - i32::from(border.bottom);

    if border.top {
        for col in 0..run_width {
            canvas.put(top, left + i32::from(border.left) + col, glyphs.horizontal);
        }
    }
    if border.bottom {
        for col in 0..run_width {
            canvas.put(
                top + height - 1,
                left + i32::from(border.left) + col,
                glyphs.horizontal,
            );
        }
    }
    if border.left {
        for row in 0..run_height {
            canvas.put(top + i32::from(border.top) + row, left, glyphs.vertical);
        }
    }
    if border.right {
        for row in 0..run_height {
            canvas.put(
                top + i32::from(border.top) + row,
                left + width - 1,
                glyphs.vertical,
            );
        }
    }

    // Corners only where both adjacent edges are present.
    if border.top && border.left {
        canvas.put(top, left, glyphs.top_left);
    }
    if border.top && border.right {
        canvas.put(top, left + width - 1, glyphs.top_right);
    }
    if border.right && border.bottom {
        canvas.put(top + height - 1, left + width - 1, glyphs.bottom_right);
    }
    if border.left && border.bottom {
        canvas.put(top + height - 1, left, glyphs.bottom_left);
    }
}

#[cfg(test)]
mod tests {
    use super::paint;
    use weft_css::{apply_render_filter, resolve_styles};
    use weft_dom::{Descriptor, Document};
    use weft_layout::LayoutEngine;

    fn run_pipeline(doc: &mut Document, width: u32, height: u32) -> String {
        let mut engine = LayoutEngine::new();
        resolve_styles(doc);
        apply_render_filter(doc);
        engine.compute(doc, width, height);
        paint(doc, &engine, width, height)
    }

    fn rows(frame: &str) -> Vec<&str> {
        frame.split('\n').collect()
    }

    #[test]
    fn button_paints_thin_border_box() {
        let mut doc = Document::from_descriptors(&[Descriptor::element(
            "button",
            vec![Descriptor::text("ok")],
        )])
        .unwrap_or_else(|_| unreachable!());

        let frame = run_pipeline(&mut doc, 10, 3);
        let rows = rows(&frame);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], "\u{250C}\u{2500}\u{2500}\u{2510}      ");
        assert_eq!(rows[1], "\u{2502}ok\u{2502}      ");
        assert_eq!(rows[2], "\u{2514}\u{2500}\u{2500}\u{2518}      ");
    }

    #[test]
    fn focused_input_switches_to_thick_glyphs_without_touching_siblings() {
        let mut doc = Document::from_descriptors(&[
            Descriptor::element_with_attrs("input", &[("placeholder", "name")], vec![]),
            Descriptor::element("button", vec![Descriptor::text("ok")]),
        ])
        .unwrap_or_else(|_| unreachable!());

        let input = doc.node(doc.root).children[0];
        doc.focus(input);

        let frame = run_pipeline(&mut doc, 30, 8);
        let rows = rows(&frame);
        // Input corners are thick, placeholder sits inside the border.
        assert!(rows[0].starts_with('\u{250F}'));
        assert!(rows[1].contains("name"));
        assert_eq!(rows[2].chars().next(), Some('\u{2517}'));
        // Button below keeps its thin glyph set.
        assert!(rows[3].starts_with('\u{250C}'));
    }

    #[test]
    fn partial_border_draws_only_shared_corner() {
        let mut doc = Document::from_descriptors(&[Descriptor::element_with_attrs(
            "button",
            &[(
                "style",
                "border-bottom: no; border-right: no",
            )],
            vec![Descriptor::text("hi")],
        )])
        .unwrap_or_else(|_| unreachable!());

        let frame = run_pipeline(&mut doc, 10, 4);
        let corner_count = frame
            .chars()
            .filter(|ch| matches!(ch, '\u{250C}' | '\u{2510}' | '\u{2514}' | '\u{2518}'))
            .count();
        assert_eq!(corner_count, 1);
        assert!(frame.contains('\u{250C}'));
    }

    #[test]
    fn paint_is_deterministic_and_clears_dirty() {
        let mut doc = Document::from_descriptors(&[Descriptor::element(
            "box",
            vec![Descriptor::element("text", vec![Descriptor::text("weft")])],
        )])
        .unwrap_or_else(|_| unreachable!());

        let mut engine = LayoutEngine::new();
        resolve_styles(&mut doc);
        apply_render_filter(&mut doc);
        engine.compute(&mut doc, 12, 4);

        let first = paint(&mut doc, &engine, 12, 4);
        let second = paint(&mut doc, &engine, 12, 4);
        assert_eq!(first, second);
        for id in 0..doc.node_count() {
            assert!(!doc.node(id).dirty);
        }
    }

    #[test]
    fn hidden_nodes_are_skipped() {
        let mut doc = Document::from_descriptors(&[Descriptor::element_with_attrs(
            "text",
            &[("style", "display: none")],
            vec![Descriptor::text("secret")],
        )])
        .unwrap_or_else(|_| unreachable!());

        let frame = run_pipeline(&mut doc, 12, 3);
        assert!(!frame.contains("secret"));
    }

    #[test]
    fn skipped_subtrees_do_not_trap_later_dirty_walks() {
        let mut doc = Document::from_descriptors(&[Descriptor::element_with_attrs(
            "box",
            &[("style", "display: none")],
            vec![Descriptor::element("button", vec![Descriptor::text("hi")])],
        )])
        .unwrap_or_else(|_| unreachable!());

        run_pipeline(&mut doc, 10, 4);
        let hidden = doc.node(doc.root).children[0];
        let button = doc.node(hidden).children[0];
        assert!(!doc.node(hidden).dirty);
        assert!(!doc.node(button).dirty);

        // A mutation inside the skipped subtree must still re-dirty the root.
        doc.mark_dirty(button);
        assert!(doc.node(hidden).dirty);
        assert!(doc.node(doc.root).dirty);
    }

    #[test]
    fn text_longer_than_the_viewport_truncates() {
        let mut doc = Document::from_descriptors(&[Descriptor::element(
            "text",
            vec![Descriptor::text("overflowing text run")],
        )])
        .unwrap_or_else(|_| unreachable!());

        let frame = run_pipeline(&mut doc, 8, 2);
        let rows = rows(&frame);
        assert_eq!(rows[0], "overflow");
        assert_eq!(rows[1], "        ");
    }
}
