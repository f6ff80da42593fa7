//! Live node collections backed by a position cache.
//!
//! A list is a root, a [`NodeMatcher`] and a [`ListCache`]. Nothing is
//! precomputed: `item` and `length` walk the subtree on demand and memoize the
//! last visited match and the length.
//!
//! Invariants:
//! - A cache is only used while its snapshot of the Structural counter (and
//!   the matcher's secondary counter, if any) equals the document's current
//!   value; otherwise it is cleared first. Invalidation is lazy.
//! - Caches are shared between lists exactly when the matcher carries no
//!   per-instance parameters ([`ListType::ChildNodes`]); every other list owns
//!   a private cache.
//! - The cached node is always the match at the cached position, so a walk
//!   that starts there begins at offset zero.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::document::Document;
use crate::node::NodeId;
use crate::version::TreeVersion;

mod matchers;
#[cfg(test)]
mod tests;

pub use matchers::{ChildNodes, ClassMatcher, NameMatcher, TagMatcher};

/// Result of testing one node during a walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub matches: bool,
    /// Whether the walk descends into this node's children.
    pub recurse: bool,
}

impl Match {
    pub const fn new(matches: bool, recurse: bool) -> Self {
        Self { matches, recurse }
    }
}

/// Cache-sharing class of a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListType {
    ChildNodes,
    Uncacheable,
}

/// Predicate deciding membership of a live list.
pub trait NodeMatcher {
    fn matches(&self, doc: &Document, node: NodeId) -> Match;

    fn list_type(&self) -> ListType {
        ListType::Uncacheable
    }

    /// Counter besides Structural whose changes can alter membership.
    fn secondary_version(&self) -> Option<TreeVersion> {
        None
    }
}

/// Memoized iteration state of one list (or one shared list kind).
#[derive(Debug, Default)]
pub struct ListCache {
    current: Option<NodeId>,
    position: usize,
    length: usize,
    has_length: bool,
    version: u64,
    secondary_version: u64,
}

impl ListCache {
    fn clear(&mut self, doc: &Document, secondary: Option<TreeVersion>) {
        self.current = None;
        self.position = 0;
        self.length = 0;
        self.has_length = false;
        self.version = doc.version(TreeVersion::Structural);
        self.secondary_version = secondary.map(|which| doc.version(which)).unwrap_or(0);
    }

    fn validate(&mut self, doc: &Document, secondary: Option<TreeVersion>) {
        let stale = self.version != doc.version(TreeVersion::Structural)
            || secondary.is_some_and(|which| self.secondary_version != doc.version(which));
        if stale {
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(target: "dom.node_list", "cache stale; clearing");
            self.clear(doc, secondary);
        }
    }
}

/// Weak registry of shared caches keyed by `(root, list type)`.
#[derive(Debug, Default)]
pub(crate) struct ListRegistry {
    shared: HashMap<(NodeId, ListType), Weak<RefCell<ListCache>>>,
}

impl ListRegistry {
    fn acquire(&mut self, doc: &Document, root: NodeId, list_type: ListType) -> Rc<RefCell<ListCache>> {
        if list_type == ListType::Uncacheable {
            return Rc::new(RefCell::new(Self::fresh(doc)));
        }
        let key = (root, list_type);
        if let Some(cache) = self.shared.get(&key).and_then(Weak::upgrade) {
            return cache;
        }
        self.shared.retain(|_, cache| cache.strong_count() > 0);
        let cache = Rc::new(RefCell::new(Self::fresh(doc)));
        self.shared.insert(key, Rc::downgrade(&cache));
        cache
    }

    fn fresh(doc: &Document) -> ListCache {
        let mut cache = ListCache::default();
        cache.clear(doc, None);
        cache
    }

    fn live_count(&self) -> usize {
        self.shared
            .values()
            .filter(|cache| cache.strong_count() > 0)
            .count()
    }
}

/// A live view over the nodes below `root` accepted by `M`.
pub struct DynamicNodeList<M: NodeMatcher> {
    root: NodeId,
    matcher: M,
    cache: Rc<RefCell<ListCache>>,
}

impl<M: NodeMatcher> DynamicNodeList<M> {
    pub fn new(doc: &Document, root: NodeId, matcher: M) -> Self {
        let cache = doc
            .lists
            .borrow_mut()
            .acquire(doc, root, matcher.list_type());
        Self {
            root,
            matcher,
            cache,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Whether this list and `other` use the same cache object.
    pub fn shares_cache_with<N: NodeMatcher>(&self, other: &DynamicNodeList<N>) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }

    pub fn item(&self, doc: &Document, index: usize) -> Option<NodeId> {
        let mut cache = self.cache.borrow_mut();
        cache.validate(doc, self.matcher.secondary_version());
        if cache.has_length && index >= cache.length {
            return None;
        }

        let found = match cache.current {
            Some(current) if index.abs_diff(cache.position) < index => {
                if index >= cache.position {
                    self.walk_forward(doc, Some(current), index - cache.position)
                } else {
                    self.walk_backward(doc, current, cache.position - index)
                }
            }
            _ => self.walk_forward(doc, doc.first_child(self.root), index),
        };

        cache.current = found;
        cache.position = index;
        found
    }

    pub fn length(&self, doc: &Document) -> usize {
        let mut cache = self.cache.borrow_mut();
        cache.validate(doc, self.matcher.secondary_version());
        if !cache.has_length {
            cache.length = self.count(doc);
            cache.has_length = true;
        }
        cache.length
    }

    pub fn is_empty(&self, doc: &Document) -> bool {
        self.item(doc, 0).is_none()
    }

    /// Items in order; sequential access is served from the position cache.
    pub fn iter<'a>(&'a self, doc: &'a Document) -> impl Iterator<Item = NodeId> + 'a {
        (0..).map_while(move |index| self.item(doc, index))
    }

    pub fn to_vec(&self, doc: &Document) -> Vec<NodeId> {
        self.iter(doc).collect()
    }

    fn walk_forward(&self, doc: &Document, start: Option<NodeId>, mut offset: usize) -> Option<NodeId> {
        let mut node = start;
        while let Some(current) = node {
            let result = self.matcher.matches(doc, current);
            if result.matches {
                if offset == 0 {
                    return Some(current);
                }
                offset -= 1;
            }
            node = doc.next_in_subtree(self.root, current, result.recurse);
        }
        None
    }

    fn walk_backward(&self, doc: &Document, start: NodeId, mut offset: usize) -> Option<NodeId> {
        let mut node = start;
        loop {
            if self.matcher.matches(doc, node).matches {
                if offset == 0 {
                    return Some(node);
                }
                offset -= 1;
            }
            node = match doc.previous_sibling(node) {
                Some(prev) => self.deepest_last(doc, prev),
                None => {
                    let parent = doc.parent(node)?;
                    if parent == self.root {
                        return None;
                    }
                    parent
                }
            };
        }
    }

    /// Last node in document order of `node`'s subtree, descending only
    /// where the matcher allows recursion.
    fn deepest_last(&self, doc: &Document, mut node: NodeId) -> NodeId {
        while self.matcher.matches(doc, node).recurse {
            match doc.last_child(node) {
                Some(last) => node = last,
                None => break,
            }
        }
        node
    }

    fn count(&self, doc: &Document) -> usize {
        let mut total = 0usize;
        let mut node = doc.first_child(self.root);
        while let Some(current) = node {
            let result = self.matcher.matches(doc, current);
            if result.matches {
                total += 1;
            }
            node = doc.next_in_subtree(self.root, current, result.recurse);
        }
        total
    }
}

impl Document {
    /// `childNodes`: every direct child; shares one cache per parent node.
    pub fn child_nodes(&self, node: NodeId) -> DynamicNodeList<ChildNodes> {
        DynamicNodeList::new(self, node, ChildNodes)
    }

    /// `getElementsByTagName`; `"*"` matches any element.
    pub fn elements_by_tag_name(&self, root: NodeId, qualified_name: &str) -> DynamicNodeList<TagMatcher> {
        let matcher = TagMatcher::by_qualified_name(self.names(), qualified_name);
        DynamicNodeList::new(self, root, matcher)
    }

    /// `getElementsByTagNameNS`; either part may be `"*"`.
    pub fn elements_by_tag_name_ns(
        &self,
        root: NodeId,
        namespace_uri: &str,
        local_name: &str,
    ) -> DynamicNodeList<TagMatcher> {
        let matcher = TagMatcher::by_namespace(self.names(), namespace_uri, local_name);
        DynamicNodeList::new(self, root, matcher)
    }

    /// `getElementsByClassName`; `classes` is a whitespace-separated set.
    pub fn elements_by_class_name(&self, root: NodeId, classes: &str) -> DynamicNodeList<ClassMatcher> {
        DynamicNodeList::new(self, root, ClassMatcher::new(classes))
    }

    /// `getElementsByName`, rooted at the document.
    pub fn elements_by_name(&self, name: &str) -> DynamicNodeList<NameMatcher> {
        DynamicNodeList::new(self, self.root(), NameMatcher::new(name))
    }

    /// Number of shared list caches currently alive.
    pub fn live_shared_list_caches(&self) -> usize {
        self.lists.borrow().live_count()
    }
}
