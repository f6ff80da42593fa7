//! Arena node records.

use core_types::{LocalName, NamespaceName, PrefixName};

/// Stable handle into a [`crate::Document`] arena.
///
/// Invariant: ids are never reused, so the numeric value is also the node's
/// creation sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Doctype,
    Element,
    Attr,
    Text,
    Comment,
}

impl NodeKind {
    pub(crate) fn can_have_children(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element)
    }
}

#[derive(Debug)]
pub struct DoctypeData {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

#[derive(Debug)]
pub struct ElementData {
    pub local: LocalName,
    pub prefix: PrefixName,
    pub namespace: NamespaceName,
    pub(crate) attributes: Vec<NodeId>,
    pub(crate) classes: Vec<Box<str>>,
}

impl ElementData {
    pub fn attributes(&self) -> &[NodeId] {
        &self.attributes
    }

    /// Class tokens of the `class` attribute, in order and without duplicates.
    pub fn classes(&self) -> &[Box<str>] {
        &self.classes
    }
}

#[derive(Debug)]
pub struct AttrData {
    pub local: LocalName,
    pub prefix: PrefixName,
    pub namespace: NamespaceName,
    pub value: String,
    pub(crate) owner: Option<NodeId>,
}

impl AttrData {
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }
}

#[derive(Debug)]
pub enum NodeData {
    Document,
    Doctype(DoctypeData),
    Element(ElementData),
    Attr(AttrData),
    Text(String),
    Comment(String),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Doctype(_) => NodeKind::Doctype,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Attr(_) => NodeKind::Attr,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Split an attribute value into class tokens (ASCII whitespace separated),
/// dropping duplicates while keeping first occurrence order.
pub(crate) fn parse_classes(value: &str) -> Vec<Box<str>> {
    let mut out: Vec<Box<str>> = Vec::new();
    for token in value.split_ascii_whitespace() {
        if !out.iter().any(|existing| &**existing == token) {
            out.push(token.into());
        }
    }
    out
}
