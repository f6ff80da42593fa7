//! Deterministic line-based rendering of a subtree for test comparisons.
//!
//! Not a stable format. One node per line, two spaces of indent per level,
//! attributes in attribute-list order, text and comment data escaped.

use std::fmt::{self, Write};

use crate::document::Document;
use crate::node::{NodeData, NodeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(doc: &Document, root: NodeId) -> Self {
        let mut lines = Vec::new();
        walk(doc, root, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn walk(doc: &Document, node: NodeId, depth: usize, out: &mut Vec<String>) {
    let mut line = " ".repeat(depth * 2);
    write_node(doc, node, &mut line);
    out.push(line);
    for child in doc.children(node) {
        walk(doc, child, depth + 1, out);
    }
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.data(node) {
        NodeData::Document => out.push_str("#document"),
        NodeData::Doctype(doctype) => {
            let _ = write!(out, "<!DOCTYPE {}", doctype.name);
            if !doctype.public_id.is_empty() || !doctype.system_id.is_empty() {
                out.push_str(" \"");
                escape_into(out, &doctype.public_id);
                out.push_str("\" \"");
                escape_into(out, &doctype.system_id);
                out.push('"');
            }
            out.push('>');
        }
        NodeData::Element(_) => {
            out.push('<');
            out.push_str(&doc.node_name(node));
            for &attr in doc.attribute_nodes(node) {
                if let Some(data) = doc.attr(attr) {
                    let _ = write!(out, " {}=\"", doc.node_name(attr));
                    escape_into(out, &data.value);
                    out.push('"');
                }
            }
            out.push('>');
        }
        NodeData::Attr(attr) => {
            let _ = write!(out, "@{}=\"", doc.node_name(node));
            escape_into(out, &attr.value);
            out.push('"');
        }
        NodeData::Text(text) => {
            out.push('"');
            escape_into(out, text);
            out.push('"');
        }
        NodeData::Comment(text) => {
            out.push_str("<!-- ");
            escape_into(out, text);
            out.push_str(" -->");
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                let _ = write!(out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
}
