//! Single-pass HCL renderer.
//!
//! Layout rules, applied the same way at every nesting level:
//!
//! - two-space indentation
//! - `=` signs aligned across a run of consecutive single-line attributes
//! - one blank line between neighbours when either of them is a block
//! - lists of scalars stay on one line while they fit in 80 columns
//! - non-empty maps always span several lines

use std::fmt::Write;

use super::escape::{escape_string, quote, render_key, sanitize_comment};
use super::value::{Block, Body, BodyItem, Template, TemplatePart, Value};

const INDENT: &str = "  ";
const MAX_INLINE_WIDTH: usize = 80;

fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

/// Render a value as it appears to the right of `=` at the given depth.
pub fn render_value(value: &Value, level: usize) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Number(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Reference(r) => r.to_string(),
        Value::Variable(name) => format!("var.{}", name),
        Value::VariableKey(name, key) => format!("var.{}[{}]", name, quote(key)),
        Value::Template(t) => render_template(t),
        Value::TypeConstraint(t) => (*t).to_string(),
        Value::List(items) => render_list(items, level),
        Value::Map(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let entries: Vec<(String, String)> = map
                .iter()
                .map(|(k, v)| (render_key(k), render_value(v, level + 1)))
                .collect();
            let mut out = String::from("{\n");
            write_aligned(&mut out, &entries, level + 1);
            out.push_str(&indent(level));
            out.push('}');
            out
        }
    }
}

fn render_template(template: &Template) -> String {
    let mut out = String::from("\"");
    for part in template.parts() {
        match part {
            TemplatePart::Literal(text) => out.push_str(&escape_string(text)),
            TemplatePart::Variable(name) => {
                let _ = write!(out, "${{var.{}}}", name);
            }
        }
    }
    out.push('"');
    out
}

fn render_list(items: &[Value], level: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }

    if items.iter().all(Value::is_scalar) {
        let inline = format!(
            "[{}]",
            items
                .iter()
                .map(|v| render_value(v, level))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if indent(level).len() + inline.len() <= MAX_INLINE_WIDTH && !inline.contains('\n') {
            return inline;
        }
    }

    let mut out = String::from("[\n");
    for item in items {
        let _ = writeln!(out, "{}{},", indent(level + 1), render_value(item, level + 1));
    }
    out.push_str(&indent(level));
    out.push(']');
    out
}

/// Write `key = value` lines, aligning `=` within runs of single-line values.
fn write_aligned(out: &mut String, entries: &[(String, String)], level: usize) {
    let pad = indent(level);
    let mut start = 0;

    while start < entries.len() {
        // A run ends right after the first multi-line value.
        let end = entries[start..]
            .iter()
            .position(|(_, v)| v.contains('\n'))
            .map(|i| start + i + 1)
            .unwrap_or(entries.len());

        let width = entries[start..end]
            .iter()
            .map(|(k, _)| k.chars().count())
            .max()
            .unwrap_or(0);

        for (key, value) in &entries[start..end] {
            let _ = writeln!(out, "{}{:<width$} = {}", pad, key, value, width = width);
        }
        start = end;
    }
}

/// Render the contents of a body at the given depth.
pub fn render_body(body: &Body, level: usize, out: &mut String) {
    let items = body.items();
    let mut i = 0;

    while i < items.len() {
        if i > 0 {
            let prev_is_block = matches!(items[i - 1], BodyItem::Block(_));
            let this_is_block = matches!(items[i], BodyItem::Block(_));
            if prev_is_block || this_is_block {
                out.push('\n');
            }
        }

        match &items[i] {
            BodyItem::Block(block) => {
                render_block_into(block, level, out);
                i += 1;
            }
            BodyItem::Attribute { .. } => {
                let mut entries = Vec::new();
                while let Some(BodyItem::Attribute { key, value }) = items.get(i) {
                    entries.push((render_key(key), render_value(value, level)));
                    i += 1;
                }
                write_aligned(out, &entries, level);
            }
        }
    }
}

fn render_block_into(block: &Block, level: usize, out: &mut String) {
    out.push_str(&indent(level));
    out.push_str(&block.keyword);
    for label in &block.labels {
        out.push(' ');
        out.push_str(&quote(label));
    }

    if block.body.is_empty() {
        out.push_str(" {}\n");
        return;
    }

    out.push_str(" {\n");
    render_body(&block.body, level + 1, out);
    out.push_str(&indent(level));
    out.push_str("}\n");
}

/// Render a single block at top level.
pub fn render_block(block: &Block) -> String {
    let mut out = String::new();
    render_block_into(block, 0, &mut out);
    out
}

/// Top-level entry of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentItem {
    /// `# text` line, attached to whatever follows it
    Comment(String),
    Block(Block),
}

/// A whole HCL file: comments and top-level blocks in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    items: Vec<DocumentItem>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: impl AsRef<str>) {
        self.items
            .push(DocumentItem::Comment(sanitize_comment(text.as_ref())));
    }

    pub fn block(&mut self, block: Block) {
        self.items.push(DocumentItem::Block(block));
    }

    pub fn items(&self) -> &[DocumentItem] {
        &self.items
    }

    /// Render the document. Blocks are separated by one blank line; a comment
    /// sits directly above the item that follows it.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut previous_was_comment = false;

        for (i, item) in self.items.iter().enumerate() {
            if i > 0 && !previous_was_comment {
                out.push('\n');
            }
            match item {
                DocumentItem::Comment(text) => {
                    if text.is_empty() {
                        out.push_str("#\n");
                    } else {
                        let _ = writeln!(out, "# {}", text);
                    }
                    previous_was_comment = true;
                }
                DocumentItem::Block(block) => {
                    render_block_into(block, 0, &mut out);
                    previous_was_comment = false;
                }
            }
        }

        out
    }
}
