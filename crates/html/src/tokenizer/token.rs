//! Tokens handed from the tokenizer to the tree builder.

use core_types::{LocalName, NamespaceName};

/// One attribute of a start tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub local: LocalName,
    pub namespace: NamespaceName,
    pub value: String,
}

/// Attributes of a start tag in source order, keyed by `(namespace, local)`.
///
/// Invariant: no two entries share a key. The first value written for a key
/// is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<Attribute>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is already present. Returns whether the
    /// attribute was stored.
    pub fn insert(&mut self, attr: Attribute) -> bool {
        if self.contains(attr.namespace.id(), attr.local.id()) {
            return false;
        }
        self.entries.push(attr);
        true
    }

    pub fn contains(&self, namespace_id: u16, local_id: u16) -> bool {
        self.entries
            .iter()
            .any(|a| a.namespace.id() == namespace_id && a.local.id() == local_id)
    }

    /// Value of a null-namespace attribute.
    pub fn get(&self, local_id: u16) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.namespace.is_empty() && a.local.id() == local_id)
            .map(|a| a.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for AttributeMap {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoctypeToken {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
    pub internal_subset: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagToken {
    pub name: LocalName,
    pub attrs: AttributeMap,
    /// Kept only for void elements and `script`.
    pub self_closing: bool,
    /// Source line of the `<` that opened the tag, counted from 1.
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndTagToken {
    pub name: LocalName,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Doctype(DoctypeToken),
    StartTag(TagToken),
    EndTag(EndTagToken),
    Comment(String),
    Text(String),
    Eof,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }
}
