//! DOM subtrees as `serde_json::Value`, for `json!` comparisons.
//!
//! Elements become `{"name": ..., "attrs": {...}, "children": [...]}` with
//! `attrs` and `children` omitted when empty. Text is a bare string,
//! comments are `{"comment": ...}` and doctypes `{"doctype": ...}`.

use dom::{Document, NodeData, NodeId};
use serde_json::{Map, Value, json};

pub fn tree_json(doc: &Document, node: NodeId) -> Value {
    match doc.data(node) {
        NodeData::Document => json!({ "document": children_json(doc, node) }),
        NodeData::Doctype(doctype) => json!({ "doctype": doctype.name }),
        NodeData::Text(text) => Value::String(text.clone()),
        NodeData::Comment(text) => json!({ "comment": text }),
        NodeData::Attr(attr) => json!({ "attr": doc.node_name(node), "value": attr.value }),
        NodeData::Element(_) => {
            let mut object = Map::new();
            object.insert("name".to_string(), Value::String(doc.node_name(node)));
            let attrs: Map<String, Value> = doc
                .attribute_nodes(node)
                .iter()
                .filter_map(|&attr| {
                    doc.attr(attr)
                        .map(|data| (doc.node_name(attr), Value::String(data.value.clone())))
                })
                .collect();
            if !attrs.is_empty() {
                object.insert("attrs".to_string(), Value::Object(attrs));
            }
            let children = children_json(doc, node);
            if !children.is_empty() {
                object.insert("children".to_string(), Value::Array(children));
            }
            Value::Object(object)
        }
    }
}

/// The document element as JSON, or `null` for an empty document.
pub fn document_element_json(doc: &Document) -> Value {
    doc.document_element()
        .map(|root| tree_json(doc, root))
        .unwrap_or(Value::Null)
}

fn children_json(doc: &Document, node: NodeId) -> Vec<Value> {
    doc.children(node)
        .map(|child| tree_json(doc, child))
        .collect()
}
