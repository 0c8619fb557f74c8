//! YAML codec: event-driven decoding into [`Node`] trees and deterministic
//! re-emission.
//!
//! Decoding runs on the raw parser event stream rather than a typed YAML
//! value so scalars keep their exact source text (`0x1F` stays `0x1F`, `True`
//! stays `True`); typed interpretation happens later, at the accessor. Only
//! the first document of a stream is read, and anchors/aliases are rejected.
//!
//! Emission is deterministic: block style near the root, flow style once a
//! collection sits at depth [`FLOW_DEPTH`] or deeper, literal blocks for
//! multi-line scalars, and double quotes for any scalar that is not plainly
//! word-like. Map entries holding `Null` are dropped on output; list slots
//! holding `Null` are kept as `~` so sibling indices survive the round trip.

use std::collections::BTreeMap;

use saphyr_parser::{Event, Parser, ScalarStyle};

use crate::node::Node;
use crate::{Error, Result};

/// Collections at this depth or deeper are emitted in flow style. The root
/// is depth 0, its children depth 1.
pub const FLOW_DEPTH: usize = 3;

const INDENT: &str = "  ";

// ===== Decoding =====

/// Parses the first YAML document in `text` into a tree.
///
/// Empty input (or a lone null document) decodes to [`Node::Null`]. Plain
/// scalars spelled `""`, `~`, `null`, `Null` or `NULL` decode to `Null`;
/// quoted ones stay scalars. Aliases and non-scalar mapping keys are
/// reported as [`Error::Parse`].
pub fn decode_str(text: &str) -> Result<Node> {
    let mut parser = Parser::new_from_str(text);
    let mut builder = TreeBuilder::default();
    for item in &mut parser {
        let (event, _span) = item.map_err(|err| Error::Parse { reason: err.to_string() })?;
        if builder.feed(event)? {
            break;
        }
    }
    Ok(builder.finish())
}

enum Frame {
    List(Vec<Node>),
    Map {
        entries: BTreeMap<String, Node>,
        pending_key: Option<String>,
    },
}

/// Folds parser events into a tree, one document's worth.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Node>,
}

impl TreeBuilder {
    /// Feeds one event; returns `true` once the document is complete.
    fn feed(&mut self, event: Event<'_>) -> Result<bool> {
        match event {
            Event::Alias(..) => {
                return Err(Error::Parse { reason: "aliases are not supported".to_string() });
            }
            Event::Scalar(value, style, ..) => {
                let node = scalar_node(&value, style);
                self.place(node, Some(value.into_owned()))?;
            }
            Event::SequenceStart(..) => self.stack.push(Frame::List(Vec::new())),
            Event::SequenceEnd => {
                let Some(Frame::List(items)) = self.stack.pop() else {
                    return Err(Error::Parse { reason: "unbalanced sequence end".to_string() });
                };
                self.place(Node::List(items), None)?;
            }
            Event::MappingStart(..) => {
                self.stack.push(Frame::Map { entries: BTreeMap::new(), pending_key: None });
            }
            Event::MappingEnd => {
                let Some(Frame::Map { entries, .. }) = self.stack.pop() else {
                    return Err(Error::Parse { reason: "unbalanced mapping end".to_string() });
                };
                self.place(Node::Map(entries), None)?;
            }
            Event::DocumentEnd | Event::StreamEnd => return Ok(true),
            // StreamStart, DocumentStart and friends carry no structure
            _ => {}
        }
        Ok(false)
    }

    /// Hands a finished node to the innermost open container, or makes it
    /// the document root. Scalars pass their raw text along so they can
    /// serve as mapping keys.
    fn place(&mut self, node: Node, raw: Option<String>) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::List(items)) => items.push(node),
            Some(Frame::Map { entries, pending_key }) => match pending_key.take() {
                Some(key) => {
                    entries.insert(key, node);
                }
                None => {
                    let Some(text) = raw else {
                        return Err(Error::Parse {
                            reason: "mapping keys must be scalars".to_string(),
                        });
                    };
                    *pending_key = Some(text);
                }
            },
            None => self.root = Some(node),
        }
        Ok(())
    }

    fn finish(self) -> Node {
        self.root.unwrap_or(Node::Null)
    }
}

/// Null detection applies to plain-style scalars only; `"null"` quoted in
/// the source stays a scalar.
fn scalar_node(value: &str, style: ScalarStyle) -> Node {
    if style == ScalarStyle::Plain && matches!(value, "" | "~" | "null" | "Null" | "NULL") {
        Node::Null
    } else {
        Node::Scalar(value.to_string())
    }
}

// ===== Emission =====

/// Emits `root` as a YAML document.
///
/// A `Null` root emits nothing. The output always re-parses to a tree equal
/// to the input modulo dropped `Null` map entries.
pub fn encode(root: &Node) -> String {
    let mut out = String::new();
    match root {
        Node::Null => {}
        Node::Scalar(text) => {
            if let Style::Literal = scalar_style(text) {
                push_literal(text, &mut out, 1);
            } else {
                push_inline_scalar(text, &mut out);
                out.push('\n');
            }
        }
        Node::List(items) if items.is_empty() => out.push_str("[]\n"),
        Node::List(items) => push_list_block(items, &mut out, 0, 0),
        Node::Map(entries) if live_entries(entries).is_empty() => out.push_str("{}\n"),
        Node::Map(entries) => push_map_block(entries, &mut out, 0, 0),
    }
    out
}

fn live_entries(entries: &BTreeMap<String, Node>) -> Vec<(&String, &Node)> {
    entries.iter().filter(|(_, value)| !value.is_null()).collect()
}

/// Block-style mapping at `depth` (its own depth), lines padded to `indent`.
fn push_map_block(entries: &BTreeMap<String, Node>, out: &mut String, depth: usize, indent: usize) {
    for (key, value) in live_entries(entries) {
        pad(out, indent);
        push_inline_scalar(key, out);
        out.push(':');
        push_value(value, out, depth + 1, indent);
    }
}

/// Block-style sequence at `depth`, lines padded to `indent`.
fn push_list_block(items: &[Node], out: &mut String, depth: usize, indent: usize) {
    for item in items {
        pad(out, indent);
        out.push('-');
        if item.is_null() {
            out.push_str(" ~\n");
        } else {
            push_value(item, out, depth + 1, indent);
        }
    }
}

/// Emits a non-null value right after a `key:` or `-` introducer, choosing
/// between same-line scalar/flow output and a nested block.
fn push_value(value: &Node, out: &mut String, depth: usize, indent: usize) {
    match value {
        Node::Null => unreachable!("null values are handled by the caller"),
        Node::Scalar(text) => {
            out.push(' ');
            if let Style::Literal = scalar_style(text) {
                push_literal(text, out, indent + 1);
            } else {
                push_inline_scalar(text, out);
                out.push('\n');
            }
        }
        Node::List(items) => {
            if items.is_empty() {
                out.push_str(" []\n");
            } else if depth >= FLOW_DEPTH {
                out.push(' ');
                push_flow(value, out);
                out.push('\n');
            } else {
                out.push('\n');
                push_list_block(items, out, depth, indent + 1);
            }
        }
        Node::Map(entries) => {
            if live_entries(entries).is_empty() {
                out.push_str(" {}\n");
            } else if depth >= FLOW_DEPTH {
                out.push(' ');
                push_flow(value, out);
                out.push('\n');
            } else {
                out.push('\n');
                push_map_block(entries, out, depth, indent + 1);
            }
        }
    }
}

/// Flow-style emission, used for deep collections. Everything below a flow
/// collection stays in flow.
fn push_flow(node: &Node, out: &mut String) {
    match node {
        Node::Null => out.push('~'),
        Node::Scalar(text) => push_inline_scalar(text, out),
        Node::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_flow(item, out);
            }
            out.push(']');
        }
        Node::Map(entries) => {
            out.push('{');
            for (i, (key, value)) in live_entries(entries).into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_inline_scalar(key, out);
                out.push_str(": ");
                push_flow(value, out);
            }
            out.push('}');
        }
    }
}

enum Style {
    Plain,
    Quoted,
    Literal,
}

/// Picks the emission style for a scalar's text.
///
/// Multi-line text gets a literal block unless it contains carriage returns
/// or starts with blank space (neither survives a literal block verbatim);
/// those fall back to double quotes. Single-line text is plain only when it
/// is non-empty and strictly word-like.
fn scalar_style(text: &str) -> Style {
    if text.contains('\n') {
        let first = text.split('\n').next().unwrap_or("");
        if text.contains('\r') || first.starts_with([' ', '\t']) {
            Style::Quoted
        } else {
            Style::Literal
        }
    } else if text.is_empty() || !text.bytes().all(plain_safe) {
        Style::Quoted
    } else {
        Style::Plain
    }
}

fn plain_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.'
}

/// Emits a scalar on the current line: plain when word-like, double-quoted
/// otherwise. Used for mapping keys and all flow scalars, so it must never
/// produce a line break.
fn push_inline_scalar(text: &str, out: &mut String) {
    match scalar_style(text) {
        Style::Plain => out.push_str(text),
        Style::Quoted | Style::Literal => push_quoted(text, out),
    }
}

fn push_quoted(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Emits a literal block scalar: header with the chomping indicator implied
/// by the text's trailing newlines, then one source line per output line at
/// `indent`.
fn push_literal(text: &str, out: &mut String, indent: usize) {
    let header = if !text.ends_with('\n') {
        "|-"
    } else if text.ends_with("\n\n") {
        "|+"
    } else {
        "|"
    };
    out.push_str(header);
    out.push('\n');
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    for line in lines {
        if line.is_empty() {
            out.push('\n');
        } else {
            pad(out, indent);
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}
