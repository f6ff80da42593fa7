//! Stack of open elements.

use dom::NodeId;

/// Entry in the stack of open elements: the node and its local name id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpenElement {
    node: NodeId,
    name: u16,
}

impl OpenElement {
    pub(crate) fn new(node: NodeId, name: u16) -> Self {
        Self { node, name }
    }

    pub(crate) fn node(self) -> NodeId {
        self.node
    }

    pub(crate) fn name(self) -> u16 {
        self.name
    }
}

/// Which elements stop a search down the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    /// Closing an implied `p`.
    Paragraph,
    /// Closing an implied `li`.
    ListItem,
    /// Matching an explicit end tag; only the root stops it.
    EndTag,
}

fn is_scope_boundary(name: u16, kind: ScopeKind) -> bool {
    use core_types::local;
    match kind {
        ScopeKind::Paragraph => matches!(
            name,
            local::HTML | local::TABLE | local::BUTTON | local::TD | local::TH | local::CAPTION
        ),
        ScopeKind::ListItem => {
            is_scope_boundary(name, ScopeKind::Paragraph) || matches!(name, local::UL | local::OL)
        }
        ScopeKind::EndTag => name == local::HTML,
    }
}

/// Open elements, bottom to top. The implicit root is not on the stack.
#[derive(Clone, Debug, Default)]
pub(crate) struct OpenElementsStack {
    items: Vec<OpenElement>,
    max_depth: u32,
}

impl OpenElementsStack {
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn push(&mut self, entry: OpenElement) {
        self.items.push(entry);
        self.max_depth = self.max_depth.max(self.items.len() as u32);
    }

    pub(crate) fn current(&self) -> Option<OpenElement> {
        self.items.last().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub(crate) fn iter_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().map(|entry| entry.node())
    }

    pub(crate) fn has_in_scope(&self, target: u16, kind: ScopeKind) -> bool {
        self.find_in_scope_match_index(target, kind).is_some()
    }

    /// Removes elements from the top down to and including `target` when it is
    /// visible in the requested scope, and returns the matched element.
    pub(crate) fn pop_until_including_in_scope(
        &mut self,
        target: u16,
        kind: ScopeKind,
    ) -> Option<OpenElement> {
        let match_index = self.find_in_scope_match_index(target, kind)?;
        self.items.truncate(match_index + 1);
        self.items.pop()
    }

    fn find_in_scope_match_index(&self, target: u16, kind: ScopeKind) -> Option<usize> {
        for index in (0..self.items.len()).rev() {
            let name = self.items[index].name();
            if name == target {
                return Some(index);
            }
            if is_scope_boundary(name, kind) {
                return None;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use core_types::local;
    use dom::Document;

    use super::{OpenElement, OpenElementsStack, ScopeKind};

    fn element(doc: &mut Document, name: &str) -> OpenElement {
        let node = doc.create_element(name).expect("valid name");
        let id = doc.local_name(node).expect("element").id();
        OpenElement::new(node, id)
    }

    #[test]
    fn push_pop_and_current_are_deterministic() {
        let mut doc = Document::new();
        let div = element(&mut doc, "div");
        let span = element(&mut doc, "span");
        let mut stack = OpenElementsStack::default();

        assert!(stack.current().is_none());
        stack.push(div);
        stack.push(span);
        assert_eq!(stack.current(), Some(span));
        assert_eq!(
            stack.pop_until_including_in_scope(local::SPAN, ScopeKind::EndTag),
            Some(span)
        );
        assert_eq!(stack.current(), Some(div));
        assert_eq!(stack.max_depth(), 2);
    }

    #[test]
    fn table_hides_paragraph_from_implied_close() {
        let mut doc = Document::new();
        let mut stack = OpenElementsStack::default();
        stack.push(element(&mut doc, "p"));
        assert!(stack.has_in_scope(local::P, ScopeKind::Paragraph));

        stack.push(element(&mut doc, "table"));
        assert!(!stack.has_in_scope(local::P, ScopeKind::Paragraph));
        assert!(stack.has_in_scope(local::P, ScopeKind::EndTag));
    }

    #[test]
    fn list_boundary_stops_item_search() {
        let mut doc = Document::new();
        let mut stack = OpenElementsStack::default();
        stack.push(element(&mut doc, "li"));
        stack.push(element(&mut doc, "ul"));
        assert!(!stack.has_in_scope(local::LI, ScopeKind::ListItem));
        assert!(
            stack
                .pop_until_including_in_scope(local::LI, ScopeKind::ListItem)
                .is_none()
        );
        assert_eq!(stack.len(), 2);
    }
}
