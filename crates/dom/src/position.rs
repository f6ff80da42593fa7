//! `compareDocumentPosition` and the document-order total order built on it.
//!
//! Ordering contract:
//! - Within one tree: pre-order, with an element's attributes placed after the
//!   element itself and before its children, in attribute-list order.
//! - Across disconnected trees: trees are ordered by the creation sequence of
//!   their roots. The result carries `DISCONNECTED | IMPLEMENTATION_SPECIFIC`
//!   and is stable for the life of the document.

use std::cmp::Ordering;
use std::fmt;
use std::ops::BitOr;

use crate::document::Document;
use crate::node::NodeId;

/// Bit set returned by [`Document::compare_document_position`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DocumentPosition(u16);

impl DocumentPosition {
    pub const DISCONNECTED: Self = Self(0x01);
    pub const PRECEDING: Self = Self(0x02);
    pub const FOLLOWING: Self = Self(0x04);
    pub const CONTAINS: Self = Self(0x08);
    pub const CONTAINED_BY: Self = Self(0x10);
    pub const IMPLEMENTATION_SPECIFIC: Self = Self(0x20);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, flag: DocumentPosition) -> bool {
        self.0 & flag.0 == flag.0 && flag.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for DocumentPosition {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for DocumentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(DocumentPosition, &str); 6] = [
            (DocumentPosition::DISCONNECTED, "DISCONNECTED"),
            (DocumentPosition::PRECEDING, "PRECEDING"),
            (DocumentPosition::FOLLOWING, "FOLLOWING"),
            (DocumentPosition::CONTAINS, "CONTAINS"),
            (DocumentPosition::CONTAINED_BY, "CONTAINED_BY"),
            (DocumentPosition::IMPLEMENTATION_SPECIFIC, "IMPLEMENTATION_SPECIFIC"),
        ];
        if self.is_empty() {
            return f.write_str("DocumentPosition(SAME)");
        }
        f.write_str("DocumentPosition(")?;
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        f.write_str(")")
    }
}

impl Document {
    /// Position of `other` relative to `reference`, as DOM Level 3 defines it.
    pub fn compare_document_position(
        &self,
        reference: NodeId,
        other: NodeId,
    ) -> DocumentPosition {
        if reference == other {
            return DocumentPosition::default();
        }

        let ref_attr = self.attr(reference).map(|attr| (reference, attr.owner()));
        let other_attr = self.attr(other).map(|attr| (other, attr.owner()));

        // Attributes are positioned through their owner element.
        let ref_node = match ref_attr {
            Some((_, owner)) => owner,
            None => Some(reference),
        };
        let other_node = match other_attr {
            Some((_, owner)) => owner,
            None => Some(other),
        };

        let (Some(ref_node), Some(other_node)) = (ref_node, other_node) else {
            // At least one unowned attribute: it is its own tree.
            return self.disconnected(reference, other);
        };

        if let (Some((ref_attr, _)), Some((other_attr, _))) = (ref_attr, other_attr) {
            if ref_node == other_node {
                let attrs = self.attribute_nodes(ref_node);
                let ref_index = attrs.iter().position(|&a| a == ref_attr);
                let other_index = attrs.iter().position(|&a| a == other_attr);
                return if other_index < ref_index {
                    DocumentPosition::IMPLEMENTATION_SPECIFIC | DocumentPosition::PRECEDING
                } else {
                    DocumentPosition::IMPLEMENTATION_SPECIFIC | DocumentPosition::FOLLOWING
                };
            }
        }

        let ref_path = self.ancestor_path(ref_node);
        let other_path = self.ancestor_path(other_node);
        if ref_path[0] != other_path[0] {
            return self.disconnected_roots(ref_path[0], other_path[0]);
        }

        if ref_node == other_node {
            // One of the two is an attribute of the other.
            return if other_attr.is_none() {
                DocumentPosition::CONTAINS | DocumentPosition::PRECEDING
            } else {
                DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING
            };
        }

        let common = ref_path
            .iter()
            .zip(other_path.iter())
            .take_while(|(a, b)| a == b)
            .count();

        if common == other_path.len() && other_attr.is_none() {
            return DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        }
        if common == ref_path.len() && ref_attr.is_none() {
            return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        }
        if common == other_path.len() {
            // `other` is an attribute of an ancestor of `reference`.
            return DocumentPosition::PRECEDING;
        }
        if common == ref_path.len() {
            // `reference` is an attribute of an ancestor of `other`.
            return DocumentPosition::FOLLOWING;
        }

        let ref_branch = ref_path[common];
        let other_branch = other_path[common];
        if self.sibling_precedes(other_branch, ref_branch) {
            DocumentPosition::PRECEDING
        } else {
            DocumentPosition::FOLLOWING
        }
    }

    /// Total document order: `Less` when `a` comes first.
    pub fn cmp_document_order(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        if self
            .compare_document_position(a, b)
            .contains(DocumentPosition::FOLLOWING)
        {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    fn disconnected(&self, reference: NodeId, other: NodeId) -> DocumentPosition {
        self.disconnected_roots(self.tree_root(reference), self.tree_root(other))
    }

    fn disconnected_roots(&self, ref_root: NodeId, other_root: NodeId) -> DocumentPosition {
        let direction = if other_root < ref_root {
            DocumentPosition::PRECEDING
        } else {
            DocumentPosition::FOLLOWING
        };
        DocumentPosition::DISCONNECTED | DocumentPosition::IMPLEMENTATION_SPECIFIC | direction
    }

    fn tree_root(&self, node: NodeId) -> NodeId {
        let start = match self.attr(node) {
            Some(attr) => match attr.owner() {
                Some(owner) => owner,
                None => return node,
            },
            None => node,
        };
        let mut current = start;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Root-first chain of inclusive ancestors.
    fn ancestor_path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    fn sibling_precedes(&self, first: NodeId, second: NodeId) -> bool {
        let mut current = self.next_sibling(first);
        while let Some(node) = current {
            if node == second {
                return true;
            }
            current = self.next_sibling(node);
        }
        false
    }
}
