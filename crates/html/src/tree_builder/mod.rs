//! Tree builder.
//!
//! Consumes tokens and mutates a [`Document`] directly. Construction is
//! deliberately shallow: no insertion modes, no foster parenting and no
//! formatting reconstruction. Nodes go under the current open element.
//!
//! The builder suspends after `</script>` so the driver can run the script
//! before any further token is pulled.

use core_types::{NamespaceName, PrefixName, local, namespace};
use dom::{Document, DomError, NodeId, NodeKind, QuirksMode};

use crate::elements::{closes_paragraph, is_void};
use crate::tokenizer::{DoctypeToken, EndTagToken, TagToken, Token};
use stack::{OpenElement, OpenElementsStack, ScopeKind};

mod stack;

#[derive(Clone, Debug)]
pub struct TreeBuilderConfig {
    /// Merge a text token into a preceding sibling text node.
    pub coalesce_text: bool,
    /// Report `</script>` to the driver. Off for fragment-style parsing.
    pub scripting: bool,
}

impl Default for TreeBuilderConfig {
    fn default() -> Self {
        Self {
            coalesce_text: true,
            scripting: true,
        }
    }
}

/// Tree builder step result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeBuilderStepResult {
    Continue,
    Suspend(SuspendReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuspendReason {
    /// A script element was closed and should run before parsing resumes.
    Script(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeBuilderError {
    #[error("dom mutation failed: {0}")]
    Dom(#[from] DomError),
}

pub struct TreeBuilder {
    config: TreeBuilderConfig,
    stack: OpenElementsStack,
    root: Option<NodeId>,
    /// Any token other than a doctype has been seen.
    seen_content: bool,
    frameset: bool,
    finished: bool,
}

impl TreeBuilder {
    pub fn new(config: TreeBuilderConfig) -> Self {
        Self {
            config,
            stack: OpenElementsStack::default(),
            root: None,
            seen_content: false,
            frameset: false,
            finished: false,
        }
    }

    pub fn config(&self) -> &TreeBuilderConfig {
        &self.config
    }

    /// Push a token into the tree builder.
    ///
    /// The token's names must come from `doc`'s name tables.
    pub fn push_token(
        &mut self,
        doc: &mut Document,
        token: Token,
    ) -> Result<TreeBuilderStepResult, TreeBuilderError> {
        if self.finished {
            return Ok(TreeBuilderStepResult::Continue);
        }
        match token {
            Token::Doctype(doctype) => self.insert_doctype(doc, doctype)?,
            Token::StartTag(tag) => self.insert_element(doc, tag)?,
            Token::EndTag(tag) => return Ok(self.close_element(tag)),
            Token::Comment(text) => self.insert_comment(doc, &text)?,
            Token::Text(text) => self.insert_text(doc, &text)?,
            Token::Eof => {
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(
                    target: "html.tree_builder",
                    "eof with {} open elements, max depth {}",
                    self.stack.len(),
                    self.stack.max_depth()
                );
                self.stack.clear();
                self.finished = true;
            }
        }
        Ok(TreeBuilderStepResult::Continue)
    }

    /// Where the next node goes.
    pub fn current_node(&self, doc: &Document) -> NodeId {
        self.stack
            .current()
            .map(OpenElement::node)
            .or(self.root)
            .unwrap_or_else(|| doc.root())
    }

    /// Open elements, outermost first. The root element is not included.
    pub fn open_elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.stack.iter_nodes()
    }

    pub fn max_depth(&self) -> u32 {
        self.stack.max_depth()
    }

    /// A `frameset` start tag was seen.
    pub fn has_frameset(&self) -> bool {
        self.frameset
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn insert_doctype(
        &mut self,
        doc: &mut Document,
        doctype: DoctypeToken,
    ) -> Result<(), TreeBuilderError> {
        if self.seen_content || doc.doctype().is_some() {
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(target: "html.tree_builder", "ignoring late doctype {:?}", doctype.name);
            return Ok(());
        }
        let node = doc.create_doctype(&doctype.name, &doctype.public_id, &doctype.system_id);
        doc.append_child(doc.root(), node)?;
        doc.set_quirks_mode(QuirksMode::NoQuirks);
        Ok(())
    }

    fn ensure_root(&mut self, doc: &mut Document) -> Result<NodeId, TreeBuilderError> {
        self.seen_content = true;
        if let Some(root) = self.root {
            return Ok(root);
        }
        let root = self.create_html_element(doc, local::HTML);
        doc.append_child(doc.root(), root)?;
        self.root = Some(root);
        Ok(root)
    }

    fn create_html_element(&self, doc: &mut Document, local_id: u16) -> NodeId {
        let names = doc.names();
        let local = core_types::LocalName::from_id(names, local_id);
        let prefix = PrefixName::empty(names);
        let ns = NamespaceName::from_id(names, namespace::XHTML);
        doc.create_element_with(local, prefix, ns)
    }

    fn insert_element(&mut self, doc: &mut Document, tag: TagToken) -> Result<(), TreeBuilderError> {
        let name_id = tag.name.id();
        if name_id == local::HTML {
            return self.merge_root_attributes(doc, tag);
        }
        self.ensure_root(doc)?;

        let name = tag.name.name();
        if closes_paragraph(&name) && self.stack.has_in_scope(local::P, ScopeKind::Paragraph) {
            self.stack
                .pop_until_including_in_scope(local::P, ScopeKind::Paragraph);
        }
        if name_id == local::LI {
            self.stack
                .pop_until_including_in_scope(local::LI, ScopeKind::ListItem);
        }
        if name_id == local::FRAMESET {
            self.frameset = true;
        }

        let parent = self.current_node(doc);
        let names = doc.names().clone();
        let element = doc.create_element_with(
            tag.name,
            PrefixName::empty(&names),
            NamespaceName::from_id(&names, namespace::XHTML),
        );
        for attr in tag.attrs {
            doc.set_attribute_name(element, attr.local, attr.namespace, attr.value)?;
        }
        doc.append_child(parent, element)?;

        let leaf = is_void(&name) || (tag.self_closing && name_id != local::SCRIPT);
        if !leaf {
            self.stack.push(OpenElement::new(element, name_id));
        }
        Ok(())
    }

    /// `<html>` creates the root, or adds missing attributes to it.
    fn merge_root_attributes(
        &mut self,
        doc: &mut Document,
        tag: TagToken,
    ) -> Result<(), TreeBuilderError> {
        let root = self.ensure_root(doc)?;
        for attr in tag.attrs {
            if !doc.has_attribute_name(root, &attr.local, &attr.namespace) {
                doc.set_attribute_name(root, attr.local, attr.namespace, attr.value)?;
            }
        }
        Ok(())
    }

    fn close_element(&mut self, tag: EndTagToken) -> TreeBuilderStepResult {
        let name_id = tag.name.id();
        if name_id == local::HTML {
            return TreeBuilderStepResult::Continue;
        }
        let Some(closed) = self
            .stack
            .pop_until_including_in_scope(name_id, ScopeKind::EndTag)
        else {
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(
                target: "html.tree_builder",
                "ignoring unmatched end tag {:?} at line {}",
                tag.name.name(),
                tag.line
            );
            return TreeBuilderStepResult::Continue;
        };
        if name_id == local::SCRIPT && self.config.scripting && !self.frameset {
            return TreeBuilderStepResult::Suspend(SuspendReason::Script(closed.node()));
        }
        TreeBuilderStepResult::Continue
    }

    fn insert_comment(&mut self, doc: &mut Document, text: &str) -> Result<(), TreeBuilderError> {
        let parent = self.current_node(doc);
        let comment = doc.create_comment(text);
        doc.append_child(parent, comment)?;
        Ok(())
    }

    fn insert_text(&mut self, doc: &mut Document, text: &str) -> Result<(), TreeBuilderError> {
        let text = if self.root.is_none() {
            let trimmed = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
            if trimmed.is_empty() {
                return Ok(());
            }
            trimmed
        } else {
            text
        };
        self.ensure_root(doc)?;
        let parent = self.current_node(doc);
        if self.config.coalesce_text {
            if let Some(last) = doc.last_child(parent) {
                if doc.kind(last) == NodeKind::Text {
                    doc.append_text(last, text)?;
                    return Ok(());
                }
            }
        }
        let node = doc.create_text(text);
        doc.append_child(parent, node)?;
        Ok(())
    }
}
