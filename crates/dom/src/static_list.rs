//! Snapshot node lists with lazily applied normalization.

use crate::document::Document;
use crate::node::NodeId;

/// How much is known about the order of a [`StaticNodeList`].
///
/// Variants are ordered by strength; `DocumentOrder` implies `AxisOrder`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Normalization {
    Unnormalized,
    AxisOrder,
    DocumentOrder,
}

/// An owned sequence of node handles built by a query and then read.
///
/// Invariant: when `known_normalization()` is `DocumentOrder`, the nodes are
/// strictly increasing in document order (sorted, no duplicates).
#[derive(Clone, Debug)]
pub struct StaticNodeList {
    nodes: Vec<NodeId>,
    known: Normalization,
}

impl StaticNodeList {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            known: Normalization::DocumentOrder,
        }
    }

    /// Append without ordering information.
    pub fn append(&mut self, node: NodeId) {
        self.nodes.push(node);
        self.known = Normalization::Unnormalized;
    }

    /// Append, keeping `DocumentOrder` when `node` strictly follows the last
    /// element (the common case for callers walking in document order).
    pub fn append_ordered(&mut self, doc: &Document, node: NodeId) {
        let keeps_order = self.known == Normalization::DocumentOrder
            && self
                .nodes
                .last()
                .is_none_or(|&last| doc.cmp_document_order(last, node).is_lt());
        self.nodes.push(node);
        if !keeps_order {
            self.known = Normalization::Unnormalized;
        }
    }

    /// Record ordering the caller established itself (e.g. an axis walk).
    pub fn set_known_normalization(&mut self, known: Normalization) {
        self.known = known;
    }

    pub fn known_normalization(&self) -> Normalization {
        self.known
    }

    /// Ensure at least `wanted` holds. Any real work produces `DocumentOrder`:
    /// a stable sort by document position followed by adjacent de-duplication.
    pub fn normalize_upto(&mut self, doc: &Document, wanted: Normalization) {
        if wanted == Normalization::Unnormalized
            || self.known == wanted
            || self.known == Normalization::DocumentOrder
        {
            return;
        }
        self.nodes.sort_by(|&a, &b| doc.cmp_document_order(a, b));
        self.nodes.dedup();
        self.known = Normalization::DocumentOrder;
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl Default for StaticNodeList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<NodeId> for StaticNodeList {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut list = Self::new();
        for node in iter {
            list.append(node);
        }
        list
    }
}
