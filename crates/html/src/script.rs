//! Seam between the parser and whatever runs scripts.
//!
//! The session hands each closed `<script>` to a [`ScriptHost`]. Output the
//! script produces through `document.write` is gathered in the
//! [`ScriptContext`] and tokenized ahead of any buffered network input once
//! the script returns.

use dom::{Document, NodeId};

/// A script ready to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptSource {
    pub text: String,
    /// `src` of an external script; `None` for inline content.
    pub url: Option<String>,
    /// Line of the `<script>` start tag.
    pub base_line: u32,
}

/// Outcome of asking the host for an external script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptFetch {
    /// The text is available now.
    Ready(String),
    /// Parsing blocks until [`ParseSession::script_fetched`](crate::ParseSession::script_fetched).
    Pending,
    /// Nothing to run; parsing continues.
    Unavailable,
}

pub trait ScriptHost {
    fn fetch(&mut self, url: &str) -> ScriptFetch;

    fn execute(&mut self, source: &ScriptSource, cx: &mut ScriptContext<'_>);
}

/// What a running script sees of the parse.
pub struct ScriptContext<'a> {
    doc: &'a mut Document,
    element: NodeId,
    written: String,
}

impl<'a> ScriptContext<'a> {
    pub(crate) fn new(doc: &'a mut Document, element: NodeId) -> Self {
        Self {
            doc,
            element,
            written: String::new(),
        }
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.doc
    }

    /// The `<script>` element being run.
    pub fn script_element(&self) -> NodeId {
        self.element
    }

    pub fn document_write(&mut self, markup: &str) {
        self.written.push_str(markup);
    }

    pub fn document_writeln(&mut self, markup: &str) {
        self.written.push_str(markup);
        self.written.push('\n');
    }

    /// Everything written so far, in call order.
    pub fn written(&self) -> &str {
        &self.written
    }

    pub(crate) fn into_written(self) -> String {
        self.written
    }
}

/// A host with scripting unavailable: nothing is fetched or run.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScripts;

impl ScriptHost for NoScripts {
    fn fetch(&mut self, _url: &str) -> ScriptFetch {
        ScriptFetch::Unavailable
    }

    fn execute(&mut self, _source: &ScriptSource, _cx: &mut ScriptContext<'_>) {}
}

impl<H: ScriptHost + ?Sized> ScriptHost for &mut H {
    fn fetch(&mut self, url: &str) -> ScriptFetch {
        (**self).fetch(url)
    }

    fn execute(&mut self, source: &ScriptSource, cx: &mut ScriptContext<'_>) {
        (**self).execute(source, cx)
    }
}
