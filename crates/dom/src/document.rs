//! Arena-backed document tree.
//!
//! Invariants:
//! - `NodeId`s are indices into the arena and are never reused; detached nodes
//!   stay allocated for the life of the document.
//! - Every successful tree mutation bumps [`TreeVersion::Structural`]; `id`,
//!   `name` and `href` attribute changes bump [`TreeVersion::IdNameHref`];
//!   `class` changes bump [`TreeVersion::Class`].
//! - Attribute nodes are never linked into the child tree; they hang off their
//!   owner's attribute list.

use std::cell::RefCell;

use core_types::{CaseMode, LocalName, NameTables, NamespaceName, PrefixName, local, namespace};

use crate::error::DomError;
use crate::node::{
    AttrData, DoctypeData, ElementData, Node, NodeData, NodeId, NodeKind, parse_classes,
};
use crate::node_list::ListRegistry;
use crate::version::{TreeVersion, TreeVersions};

/// Compatibility mode; quirks mode compares class names ASCII case-insensitively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuirksMode {
    #[default]
    Quirks,
    NoQuirks,
}

pub struct Document {
    names: NameTables,
    nodes: Vec<Node>,
    versions: TreeVersions,
    pub(crate) lists: RefCell<ListRegistry>,
    quirks: QuirksMode,
}

impl Document {
    pub fn new() -> Self {
        Self::with_names(NameTables::with_well_known())
    }

    /// A document drawing its names from shared tables.
    ///
    /// The tables must have been created by [`NameTables::with_well_known`].
    pub fn with_names(names: NameTables) -> Self {
        assert!(
            names.local().borrow().name_of(local::ANY).is_some(),
            "document name tables must be seeded with the well-known names"
        );
        Self {
            names,
            nodes: vec![Node::new(NodeData::Document)],
            versions: TreeVersions::default(),
            lists: RefCell::new(ListRegistry::default()),
            quirks: QuirksMode::default(),
        }
    }

    pub fn names(&self) -> &NameTables {
        &self.names
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn version(&self, which: TreeVersion) -> u64 {
        self.versions.get(which)
    }

    pub fn versions(&self) -> TreeVersions {
        self.versions
    }

    pub fn quirks_mode(&self) -> QuirksMode {
        self.quirks
    }

    pub fn set_quirks_mode(&mut self, mode: QuirksMode) {
        if self.quirks != mode {
            self.quirks = mode;
            self.versions.bump(TreeVersion::Class);
        }
    }

    // ---- creation ----

    /// Create an HTML element; the name is ASCII-lowercased.
    pub fn create_element(&mut self, name: &str) -> Result<NodeId, DomError> {
        validate_name(name)?;
        let local = LocalName::from_string(&self.names, name, CaseMode::NormalizeLower);
        let prefix = PrefixName::empty(&self.names);
        let ns = NamespaceName::from_id(&self.names, namespace::XHTML);
        Ok(self.create_element_with(local, prefix, ns))
    }

    /// Create an element in `namespace_uri` from a `prefix:local` name.
    pub fn create_element_ns(
        &mut self,
        namespace_uri: &str,
        qualified_name: &str,
    ) -> Result<NodeId, DomError> {
        validate_name(qualified_name)?;
        let (prefix, local) = split_qualified(qualified_name)?;
        let local = LocalName::from_string(&self.names, local, CaseMode::CaseSensitive);
        let prefix = PrefixName::from_string(&self.names, prefix, CaseMode::CaseSensitive);
        let ns = NamespaceName::from_string(&self.names, namespace_uri, CaseMode::CaseSensitive);
        Ok(self.create_element_with(local, prefix, ns))
    }

    pub fn create_element_with(
        &mut self,
        local: LocalName,
        prefix: PrefixName,
        namespace: NamespaceName,
    ) -> NodeId {
        self.push(NodeData::Element(ElementData {
            local,
            prefix,
            namespace,
            attributes: Vec::new(),
            classes: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Text(data.to_string()))
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Comment(data.to_string()))
    }

    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(NodeData::Doctype(DoctypeData {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let Ok(raw) = u32::try_from(self.nodes.len()) else {
            panic!("document arena exhausted");
        };
        self.nodes.push(Node::new(data));
        NodeId(raw)
    }

    // ---- inspection ----

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).data.kind()
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId) -> Option<&AttrData> {
        match &self.node(id).data {
            NodeData::Attr(attr) => Some(attr),
            _ => None,
        }
    }

    pub fn local_name(&self, id: NodeId) -> Option<&LocalName> {
        match &self.node(id).data {
            NodeData::Element(element) => Some(&element.local),
            NodeData::Attr(attr) => Some(&attr.local),
            _ => None,
        }
    }

    pub fn is_html_element(&self, id: NodeId) -> bool {
        self.element(id)
            .is_some_and(|element| element.namespace.id() == namespace::XHTML)
    }

    pub fn node_name(&self, id: NodeId) -> String {
        match &self.node(id).data {
            NodeData::Document => "#document".to_string(),
            NodeData::Doctype(doctype) => doctype.name.clone(),
            NodeData::Element(element) => {
                qualified(&element.prefix, &element.local)
            }
            NodeData::Attr(attr) => qualified(&attr.prefix, &attr.local),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
        }
    }

    /// Character data of a text or comment node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(data) | NodeData::Comment(data) => Some(data),
            _ => None,
        }
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.node(id).data {
            NodeData::Text(data) | NodeData::Comment(data) => data.clone(),
            NodeData::Attr(attr) => attr.value.clone(),
            NodeData::Doctype(_) => String::new(),
            NodeData::Document | NodeData::Element(_) => {
                let mut out = String::new();
                for node in self.descendants(id) {
                    if let NodeData::Text(data) = &self.node(node).data {
                        out.push_str(data);
                    }
                }
                out
            }
        }
    }

    pub fn set_text(&mut self, id: NodeId, data: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id).data {
            NodeData::Text(text) | NodeData::Comment(text) => {
                text.clear();
                text.push_str(data);
                Ok(())
            }
            other => Err(DomError::InvalidNodeType(other.kind())),
        }
    }

    pub fn append_text(&mut self, id: NodeId, data: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id).data {
            NodeData::Text(text) | NodeData::Comment(text) => {
                text.push_str(data);
                Ok(())
            }
            other => Err(DomError::InvalidNodeType(other.kind())),
        }
    }

    // ---- navigation ----

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Pre-order walk of everything below `root` (excluding `root`).
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root,
            next: self.first_child(root),
        }
    }

    /// Next node in document order inside `root`'s subtree, optionally
    /// skipping `node`'s children.
    pub(crate) fn next_in_subtree(
        &self,
        root: NodeId,
        node: NodeId,
        descend: bool,
    ) -> Option<NodeId> {
        if descend {
            if let Some(child) = self.first_child(node) {
                return Some(child);
            }
        }
        let mut current = node;
        loop {
            if current == root {
                return None;
            }
            if let Some(sibling) = self.next_sibling(current) {
                return Some(sibling);
            }
            current = self.parent(current)?;
        }
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .find(|&child| self.kind(child) == NodeKind::Element)
    }

    pub fn doctype(&self) -> Option<NodeId> {
        self.children(self.root())
            .find(|&child| self.kind(child) == NodeKind::Doctype)
    }

    /// First element in document order whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        if value.is_empty() {
            return None;
        }
        self.descendants(self.root())
            .find(|&node| self.attribute_value(node, local::ID) == Some(value))
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ---- tree mutation ----

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insertion(parent, child, None)?;
        let mut reference = reference;
        if let Some(node) = reference {
            if self.parent(node) != Some(parent) {
                return Err(DomError::NotFound { parent, node });
            }
            if node == child {
                reference = self.next_sibling(child);
            }
        }
        self.detach(child);
        self.link(parent, child, reference);
        self.versions.bump(TreeVersion::Structural);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotFound {
                parent,
                node: child,
            });
        }
        self.detach(child);
        self.versions.bump(TreeVersion::Structural);
        Ok(())
    }

    /// Replace `old` (a child of `parent`) with `new`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        if self.parent(old) != Some(parent) {
            return Err(DomError::NotFound { parent, node: old });
        }
        self.check_insertion(parent, new, Some(old))?;
        if new == old {
            return Ok(());
        }
        let mut reference = self.next_sibling(old);
        if reference == Some(new) {
            reference = self.next_sibling(new);
        }
        self.detach(old);
        self.detach(new);
        self.link(parent, new, reference);
        self.versions.bump(TreeVersion::Structural);
        Ok(())
    }

    fn check_insertion(
        &self,
        parent: NodeId,
        child: NodeId,
        replacing: Option<NodeId>,
    ) -> Result<(), DomError> {
        let parent_kind = self.kind(parent);
        if !parent_kind.can_have_children() {
            return Err(DomError::HierarchyRequest("parent cannot have children"));
        }
        let child_kind = self.kind(child);
        if matches!(child_kind, NodeKind::Document | NodeKind::Attr) {
            return Err(DomError::HierarchyRequest("node cannot be inserted into a tree"));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest("insertion would create a cycle"));
        }
        if parent_kind == NodeKind::Document {
            match child_kind {
                NodeKind::Text => {
                    return Err(DomError::HierarchyRequest(
                        "text cannot be a child of the document",
                    ));
                }
                NodeKind::Element | NodeKind::Doctype => {
                    let clash = self.children(parent).any(|existing| {
                        existing != child
                            && Some(existing) != replacing
                            && self.kind(existing) == child_kind
                    });
                    if clash {
                        return Err(DomError::HierarchyRequest(
                            "document already has a child of that kind",
                        ));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        let prev = self.node(child).prev_sibling;
        let next = self.node(child).next_sibling;
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }
        let node = self.node_mut(child);
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    fn link(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        let prev = match before {
            Some(before) => self.node(before).prev_sibling,
            None => self.node(parent).last_child,
        };
        {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = before;
        }
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(child),
            None => self.node_mut(parent).first_child = Some(child),
        }
        match before {
            Some(before) => self.node_mut(before).prev_sibling = Some(child),
            None => self.node_mut(parent).last_child = Some(child),
        }
    }

    // ---- attributes ----

    pub fn attribute_nodes(&self, element: NodeId) -> &[NodeId] {
        self.element(element)
            .map(ElementData::attributes)
            .unwrap_or(&[])
    }

    /// Value of a null-namespace attribute identified by local name id.
    pub fn attribute_value(&self, element: NodeId, local_id: u16) -> Option<&str> {
        self.find_attribute(element, local_id, namespace::EMPTY)
            .and_then(|attr| self.attr(attr))
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attribute_name(&self, element: NodeId, local: &LocalName, ns: &NamespaceName) -> bool {
        self.find_attribute(element, local.id(), ns.id()).is_some()
    }

    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        let mode = self.attribute_case(element);
        let local_id = self.names.local().borrow().lookup(name, mode)?;
        self.attribute_value(element, local_id)
    }

    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let kind = self.kind(element);
        if kind != NodeKind::Element {
            return Err(DomError::InvalidNodeType(kind));
        }
        validate_name(name)?;
        let local = LocalName::from_string(&self.names, name, self.attribute_case(element));
        let ns = NamespaceName::empty(&self.names);
        self.set_attribute_name(element, local, ns, value.to_string())
    }

    /// Set an attribute from already-interned names, replacing any existing value.
    pub fn set_attribute_name(
        &mut self,
        element: NodeId,
        local: LocalName,
        ns: NamespaceName,
        value: String,
    ) -> Result<(), DomError> {
        let kind = self.kind(element);
        if kind != NodeKind::Element {
            return Err(DomError::InvalidNodeType(kind));
        }
        let (local_id, ns_id) = (local.id(), ns.id());
        match self.find_attribute(element, local_id, ns_id) {
            Some(existing) => {
                if let NodeData::Attr(attr) = &mut self.node_mut(existing).data {
                    if attr.value == value {
                        return Ok(());
                    }
                    attr.value = value;
                }
            }
            None => {
                let prefix = PrefixName::empty(&self.names);
                let attr = self.push(NodeData::Attr(AttrData {
                    local,
                    prefix,
                    namespace: ns,
                    value,
                    owner: Some(element),
                }));
                if let NodeData::Element(data) = &mut self.node_mut(element).data {
                    data.attributes.push(attr);
                }
            }
        }
        self.attribute_changed(element, local_id, ns_id);
        Ok(())
    }

    /// Remove a null-namespace attribute. Returns whether one was present.
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> Result<bool, DomError> {
        let kind = self.kind(element);
        if kind != NodeKind::Element {
            return Err(DomError::InvalidNodeType(kind));
        }
        let mode = self.attribute_case(element);
        let Some(local_id) = self.names.local().borrow().lookup(name, mode) else {
            return Ok(false);
        };
        let Some(attr) = self.find_attribute(element, local_id, namespace::EMPTY) else {
            return Ok(false);
        };
        if let NodeData::Element(data) = &mut self.node_mut(element).data {
            data.attributes.retain(|&existing| existing != attr);
        }
        if let NodeData::Attr(data) = &mut self.node_mut(attr).data {
            data.owner = None;
        }
        self.attribute_changed(element, local_id, namespace::EMPTY);
        Ok(true)
    }

    fn find_attribute(&self, element: NodeId, local_id: u16, ns_id: u16) -> Option<NodeId> {
        self.attribute_nodes(element).iter().copied().find(|&attr| {
            self.attr(attr)
                .is_some_and(|data| data.local.id() == local_id && data.namespace.id() == ns_id)
        })
    }

    fn attribute_case(&self, element: NodeId) -> CaseMode {
        if self.is_html_element(element) {
            CaseMode::NormalizeLower
        } else {
            CaseMode::CaseSensitive
        }
    }

    fn attribute_changed(&mut self, element: NodeId, local_id: u16, ns_id: u16) {
        if ns_id != namespace::EMPTY {
            return;
        }
        match local_id {
            local::ID | local::NAME | local::HREF => {
                self.versions.bump(TreeVersion::IdNameHref);
            }
            local::CLASS => {
                let classes = parse_classes(self.attribute_value(element, local::CLASS).unwrap_or(""));
                if let NodeData::Element(data) = &mut self.node_mut(element).data {
                    data.classes = classes;
                }
                self.versions.bump(TreeVersion::Class);
            }
            _ => {}
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_in_subtree(self.root, current, true);
        Some(current)
    }
}

fn qualified(prefix: &PrefixName, local: &LocalName) -> String {
    if prefix.is_empty() {
        local.name().to_string()
    } else {
        format!("{}:{}", prefix.name(), local.name())
    }
}

fn validate_name(name: &str) -> Result<(), DomError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|first| !(first.is_ascii_digit() || first == '-' || first == '.'));
    let valid_rest = name.chars().all(|ch| {
        !(ch.is_whitespace() || ch.is_control() || matches!(ch, '<' | '>' | '/' | '=' | '"' | '\'' | '&'))
    });
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(DomError::InvalidCharacter(name.to_string()))
    }
}

fn split_qualified(name: &str) -> Result<(&str, &str), DomError> {
    match name.split_once(':') {
        None => Ok(("", name)),
        Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() && !local.contains(':') => {
            Ok((prefix, local))
        }
        Some(_) => Err(DomError::InvalidCharacter(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_body() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let html = doc.create_element("html").unwrap();
        let body = doc.create_element("BODY").unwrap();
        doc.append_child(doc.root(), html).unwrap();
        doc.append_child(html, body).unwrap();
        (doc, html, body)
    }

    #[test]
    fn insert_before_links_siblings() {
        let (mut doc, _, body) = doc_with_body();
        let a = doc.create_element("a").unwrap();
        let b = doc.create_element("b").unwrap();
        let c = doc.create_element("i").unwrap();
        doc.append_child(body, a).unwrap();
        doc.append_child(body, c).unwrap();
        doc.insert_before(body, b, Some(c)).unwrap();

        let children: Vec<_> = doc.children(body).collect();
        assert_eq!(children, vec![a, b, c]);
        assert_eq!(doc.previous_sibling(c), Some(b));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.last_child(body), Some(c));
    }

    #[test]
    fn reinserting_moves_the_node() {
        let (mut doc, _, body) = doc_with_body();
        let a = doc.create_element("a").unwrap();
        let b = doc.create_element("b").unwrap();
        doc.append_child(body, a).unwrap();
        doc.append_child(body, b).unwrap();
        doc.append_child(body, a).unwrap();
        assert_eq!(doc.children(body).collect::<Vec<_>>(), vec![b, a]);

        // Inserting a node before itself is a no-op move.
        doc.insert_before(body, b, Some(b)).unwrap();
        assert_eq!(doc.children(body).collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn structural_version_moves_on_every_tree_mutation() {
        let (mut doc, _, body) = doc_with_body();
        let before = doc.version(TreeVersion::Structural);
        let span = doc.create_element("span").unwrap();
        assert_eq!(doc.version(TreeVersion::Structural), before, "creation is not a mutation");
        doc.append_child(body, span).unwrap();
        doc.remove_child(body, span).unwrap();
        assert_eq!(doc.version(TreeVersion::Structural), before + 2);
    }

    #[test]
    fn hierarchy_violations_are_rejected() {
        let (mut doc, html, body) = doc_with_body();
        assert_eq!(
            doc.append_child(body, html),
            Err(DomError::HierarchyRequest("insertion would create a cycle"))
        );
        let text = doc.create_text("x");
        let other = doc.create_element("div").unwrap();
        assert!(matches!(
            doc.append_child(text, other),
            Err(DomError::HierarchyRequest(_))
        ));
        assert!(matches!(
            doc.append_child(doc.root(), other),
            Err(DomError::HierarchyRequest(_))
        ));
        assert!(matches!(
            doc.append_child(doc.root(), text),
            Err(DomError::HierarchyRequest(_))
        ));
        let stray = doc.create_element("p").unwrap();
        assert_eq!(
            doc.remove_child(body, stray),
            Err(DomError::NotFound {
                parent: body,
                node: stray
            })
        );
    }

    #[test]
    fn replace_child_swaps_in_place() {
        let (mut doc, _, body) = doc_with_body();
        let a = doc.create_element("a").unwrap();
        let b = doc.create_element("b").unwrap();
        let c = doc.create_element("i").unwrap();
        doc.append_child(body, a).unwrap();
        doc.append_child(body, b).unwrap();
        doc.replace_child(body, c, a).unwrap();
        assert_eq!(doc.children(body).collect::<Vec<_>>(), vec![c, b]);
        assert_eq!(doc.parent(a), None);

        // Replacing with the old node's next sibling.
        doc.replace_child(body, b, c).unwrap();
        assert_eq!(doc.children(body).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn document_element_may_be_replaced() {
        let (mut doc, html, _) = doc_with_body();
        let other = doc.create_element("html").unwrap();
        doc.replace_child(doc.root(), other, html).unwrap();
        assert_eq!(doc.document_element(), Some(other));
    }

    #[test]
    fn attribute_versions_follow_the_attribute_category() {
        let (mut doc, _, body) = doc_with_body();
        let v = doc.versions();
        doc.set_attribute(body, "ID", "main").unwrap();
        doc.set_attribute(body, "class", "a b a").unwrap();
        doc.set_attribute(body, "title", "x").unwrap();

        assert_eq!(doc.version(TreeVersion::IdNameHref), v.get(TreeVersion::IdNameHref) + 1);
        assert_eq!(doc.version(TreeVersion::Class), v.get(TreeVersion::Class) + 1);
        assert_eq!(doc.version(TreeVersion::Structural), v.get(TreeVersion::Structural));
        assert_eq!(doc.get_attribute(body, "id"), Some("main"));
        let classes: Vec<&str> = doc.element(body).unwrap().classes().iter().map(|c| &**c).collect();
        assert_eq!(classes, vec!["a", "b"]);
        assert_eq!(doc.element_by_id("main"), Some(body));

        assert_eq!(doc.remove_attribute(body, "class"), Ok(true));
        assert_eq!(doc.remove_attribute(body, "class"), Ok(false));
        assert!(doc.element(body).unwrap().classes().is_empty());
        assert_eq!(doc.version(TreeVersion::Class), v.get(TreeVersion::Class) + 2);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut doc = Document::new();
        assert_eq!(
            doc.create_element("1abc"),
            Err(DomError::InvalidCharacter("1abc".to_string()))
        );
        let div = doc.create_element("div").unwrap();
        assert!(matches!(
            doc.set_attribute(div, "a b", "x"),
            Err(DomError::InvalidCharacter(_))
        ));
        let text = doc.create_text("t");
        assert_eq!(
            doc.set_attribute(text, "id", "x"),
            Err(DomError::InvalidNodeType(NodeKind::Text))
        );
        assert!(matches!(
            doc.create_element_ns("urn:x", "a:b:c"),
            Err(DomError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn text_content_concatenates_descendant_text() {
        let (mut doc, _, body) = doc_with_body();
        let p = doc.create_element("p").unwrap();
        let t1 = doc.create_text("Hi ");
        let b = doc.create_element("b").unwrap();
        let t2 = doc.create_text("there");
        let comment = doc.create_comment("ignored");
        doc.append_child(body, p).unwrap();
        doc.append_child(p, t1).unwrap();
        doc.append_child(p, b).unwrap();
        doc.append_child(b, t2).unwrap();
        doc.append_child(p, comment).unwrap();
        assert_eq!(doc.text_content(body), "Hi there");
        assert_eq!(doc.node_name(p), "p");
        assert_eq!(doc.node_name(t1), "#text");
    }
}
