//! The render pipeline: coalescing scheduler and strict phase ordering.
//!
//! A UI-event source mutates the document (marking nodes dirty), calls
//! [`Pipeline::schedule`], and once per turn of its event loop drains the
//! single pending slot with [`Pipeline::run_pending`]. Each drained run
//! executes the four phases in strict sequence — style resolution, render
//! filter, layout, paint — and emits the finished frame to the registered
//! listener. Scheduling while a run is already pending is a no-op, so a burst
//! of mutations costs one repaint.

use tracing::debug_span;
use weft_core::{WeftError, WeftResult};
use weft_css::{apply_render_filter, resolve_styles};
use weft_dom::Document;
use weft_layout::LayoutEngine;
use weft_paint::paint;

/// Frame listener invoked once per completed run. Only the latest frame
/// matters; there is no buffering of multiple pending frames.
pub type FrameListener = Box<dyn FnMut(&str)>;

/// Owns the document, the layout engine, and the single-slot pending flag.
/// All work runs on the caller's thread; the pending slot is the only
/// suspension point.
pub struct Pipeline {
    doc: Option<Document>,
    layout: LayoutEngine,
    width: u32,
    height: u32,
    pending: bool,
    listener: Option<FrameListener>,
}

impl Pipeline {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            doc: None,
            layout: LayoutEngine::new(),
            width,
            height,
            pending: false,
            listener: None,
        }
    }

    /// One-time wiring of the document to paint.
    pub fn set_root(&mut self, doc: Document) {
        self.doc = Some(doc);
    }

    pub fn document(&self) -> Option<&Document> {
        self.doc.as_ref()
    }

    /// Mutable access for event sources (focus changes, script dispatch).
    /// Mutations mark nodes dirty; call [`Pipeline::schedule`] afterwards.
    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.doc.as_mut()
    }

    /// Registers the single frame listener, replacing any previous one.
    pub fn on_frame(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Requests a repaint. Idempotent while a run is already pending.
    pub fn schedule(&mut self) -> WeftResult<()> {
        if self.doc.is_none() {
            return Err(WeftError::PipelineNotReady);
        }
        self.pending = true;
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Drains the pending slot: runs the full pipeline once and emits the
    /// frame. Returns None when nothing was pending. Once started, a run
    /// always completes; there is no cancellation.
    pub fn run_pending(&mut self) -> Option<String> {
        if !self.pending {
            return None;
        }
        self.pending = false;

        let doc = self.doc.as_mut()?;

        {
            let _span = debug_span!("pipeline.style").entered();
            resolve_styles(doc);
        }
        {
            let _span = debug_span!("pipeline.filter").entered();
            apply_render_filter(doc);
        }
        {
            let _span = debug_span!("pipeline.layout").entered();
            self.layout.compute(doc, self.width, self.height);
        }
        let frame = {
            let _span = debug_span!("pipeline.paint").entered();
            paint(doc, &self.layout, self.width, self.height)
        };

        if let Some(listener) = self.listener.as_mut() {
            listener(&frame);
        }
        Some(frame)
    }

    /// Geometry supplier for tree dumps, relative to each node's parent.
    pub fn geometry(&self, id: weft_dom::NodeId) -> Option<(i32, i32, u32, u32)> {
        let doc = self.doc.as_ref()?;
        self.layout
            .geometry(doc, id)
            .map(|geometry| (geometry.top, geometry.left, geometry.width, geometry.height))
    }
}

#[cfg(test)]
mod tests {
    use super::Pipeline;
    use std::cell::RefCell;
    use std::rc::Rc;
    use weft_core::WeftError;
    use weft_dom::Document;
    use weft_markup::parse_markup;

    fn document(source: &str) -> Document {
        Document::from_descriptors(&parse_markup(source)).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn schedule_before_set_root_fails() {
        let mut pipeline = Pipeline::new(10, 4);
        assert_eq!(pipeline.schedule(), Err(WeftError::PipelineNotReady));
    }

    #[test]
    fn schedule_coalesces_into_one_run() {
        let mut pipeline = Pipeline::new(12, 4);
        pipeline.set_root(document("<text>hi</text>"));

        assert!(pipeline.schedule().is_ok());
        assert!(pipeline.schedule().is_ok());
        assert!(pipeline.is_pending());

        assert!(pipeline.run_pending().is_some());
        assert!(!pipeline.is_pending());
        assert!(pipeline.run_pending().is_none());
    }

    #[test]
    fn run_emits_frame_to_listener() {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&frames);

        let mut pipeline = Pipeline::new(12, 3);
        pipeline.set_root(document("<text>hello</text>"));
        pipeline.on_frame(move |frame| sink.borrow_mut().push(frame.to_owned()));

        let _ = pipeline.schedule();
        pipeline.run_pending();

        let frames = frames.borrow();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].starts_with("hello"));
    }

    #[test]
    fn stylesheet_text_never_reaches_the_frame() {
        let mut pipeline = Pipeline::new(24, 4);
        pipeline.set_root(document(
            "<style>box { color: white; }</style><box><text>hi</text></box>",
        ));

        let _ = pipeline.schedule();
        let frame = pipeline.run_pending().unwrap_or_else(|| unreachable!());
        assert!(!frame.contains("color"));
        assert!(frame.starts_with("hi"));
    }

    #[test]
    fn geometry_feeds_the_tree_dump() {
        let mut pipeline = Pipeline::new(30, 6);
        pipeline.set_root(document("<input placeholder='name'></input>"));
        let _ = pipeline.schedule();
        pipeline.run_pending();

        let doc = pipeline.document().unwrap_or_else(|| unreachable!());
        let dump = doc.dump_with_geometry(&|id| pipeline.geometry(id), true);
        assert!(dump.contains("#layout:"));
        assert!(dump.contains("width: 20"));
        assert!(dump.contains("height: 3"));
    }

    #[test]
    fn tab_then_repaint_changes_the_focused_border() {
        let mut pipeline = Pipeline::new(30, 6);
        pipeline.set_root(document("<input placeholder='name'></input>"));

        let _ = pipeline.schedule();
        let before = pipeline.run_pending().unwrap_or_else(|| unreachable!());
        assert!(before.starts_with('\u{250C}'));

        if let Some(doc) = pipeline.document_mut() {
            doc.advance_focus();
        }
        let _ = pipeline.schedule();
        let after = pipeline.run_pending().unwrap_or_else(|| unreachable!());
        assert!(after.starts_with('\u{250F}'));
    }

    #[test]
    fn frame_has_exactly_viewport_rows() {
        let mut pipeline = Pipeline::new(8, 5);
        pipeline.set_root(document("<box></box>"));

        let _ = pipeline.schedule();
        let frame = pipeline.run_pending().unwrap_or_else(|| unreachable!());
        let rows: Vec<_> = frame.split('\n').collect();
        assert_eq!(rows.len(), 5);
        for row in rows {
            assert_eq!(row.chars().count(), 8);
        }
    }
}
