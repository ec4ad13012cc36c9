//! Script sandbox: executes inline handler code with the owning node bound.
//!
//! The only event kind the core dispatches is "click", and dispatch is always
//! node-local: a node's `onclick` attribute is looked up and run here with
//! the node's state bound as `node` and the triggering event as `event`.
//! Scripts may rewrite the bound attributes and input value; those writes are
//! copied back to the document after the script finishes. Script failures are
//! reported, never fatal.

use boa_engine::Context;
use boa_engine::Source;
use weft_dom::{Document, NodeId, NodeKind};

/// Sandbox hardening knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    pub recursion_limit: usize,
    pub stack_size_limit: usize,
    pub loop_iteration_limit: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            recursion_limit: 64,
            stack_size_limit: 1024,
            loop_iteration_limit: 100_000,
        }
    }
}

/// Per-script execution error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub origin: String,
    pub message: String,
}

/// Script engine facade.
#[derive(Debug, Clone, Default)]
pub struct ScriptSandbox {
    config: SandboxConfig,
}

impl ScriptSandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// Looks up the node's `onclick` attribute and executes it with the
    /// event bound. Absent attribute is a no-op. Returns the script error,
    /// if any.
    pub fn dispatch_click(
        &self,
        doc: &mut Document,
        id: NodeId,
        event_json: &str,
    ) -> Option<ScriptError> {
        let Some(handler) = doc.node(id).attribute("onclick").map(str::to_owned) else {
            return None;
        };
        self.execute_on_node(doc, id, &handler, event_json).err()
    }

    /// Executes `source` with `id`'s state bound as the implicit subject,
    /// then copies attribute and value writes back to the document. The node
    /// is marked dirty when the script changed anything.
    pub fn execute_on_node(
        &self,
        doc: &mut Document,
        id: NodeId,
        source: &str,
        event_json: &str,
    ) -> Result<(), ScriptError> {
        let mut context = Context::default();
        context
            .runtime_limits_mut()
            .set_recursion_limit(self.config.recursion_limit);
        context
            .runtime_limits_mut()
            .set_stack_size_limit(self.config.stack_size_limit);
        context
            .runtime_limits_mut()
            .set_loop_iteration_limit(self.config.loop_iteration_limit);

        let binding = build_node_binding(doc, id, event_json);
        context
            .eval(Source::from_bytes(binding.as_bytes()))
            .map_err(|error| ScriptError {
                origin: "binding".to_owned(),
                message: error.to_string(),
            })?;

        context
            .eval(Source::from_bytes(source.as_bytes()))
            .map_err(|error| ScriptError {
                origin: "handler".to_owned(),
                message: error.to_string(),
            })?;

        self.copy_back(&mut context, doc, id);
        Ok(())
    }

    /// Reads the bound node object back out of the context and applies any
    /// attribute/value rewrites. Only keys the node already carries are
    /// consulted; the attribute set itself is fixed at construction.
    fn copy_back(&self, context: &mut Context, doc: &mut Document, id: NodeId) {
        let mut changed = false;

        let names: Vec<String> = doc.node(id).attributes.keys().cloned().collect();
        for name in names {
            let expr = format!("String(node.attributes[{}])", js_string_literal(&name));
            let Some(value) = eval_to_string(context, &expr) else {
                continue;
            };
            if doc.node(id).attribute(&name) != Some(value.as_str()) {
                doc.node_mut(id).attributes.insert(name, value);
                changed = true;
            }
        }

        if doc.node(id).kind == NodeKind::Input {
            if let Some(value) = eval_to_string(context, "String(node.value)") {
                if doc.node(id).value != value {
                    doc.node_mut(id).value = value;
                    changed = true;
                }
            }
        }

        if changed {
            doc.mark_dirty(id);
        }
    }
}

fn eval_to_string(context: &mut Context, expr: &str) -> Option<String> {
    let value = context.eval(Source::from_bytes(expr.as_bytes())).ok()?;
    let string = value.to_string(context).ok()?;
    Some(string.to_std_string_escaped())
}

fn build_node_binding(doc: &Document, id: NodeId, event_json: &str) -> String {
    let node = doc.node(id);
    let mut out = String::new();

    out.push_str("var event = ");
    if event_json.trim().is_empty() {
        out.push_str("null");
    } else {
        out.push_str(event_json);
    }
    out.push_str(";\n");

    out.push_str("var node = { kind: ");
    out.push_str(&js_string_literal(node.kind.as_str()));
    out.push_str(", value: ");
    out.push_str(&js_string_literal(&node.value));
    out.push_str(", attributes: {");
    for (index, (name, value)) in node.attributes.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(&js_string_literal(name));
        out.push_str(": ");
        out.push_str(&js_string_literal(value));
    }
    out.push_str("} };\n");
    out
}

fn js_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => out.push_str(&format!("\\u{{{:04x}}}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}
