//! Parse session: decoder, tokenizer, tree builder and script host driven
//! together.
//!
//! Network input is appended to the tokenizer; tokens are pulled one at a
//! time and handed to the builder. When the builder reports a closed script,
//! the script runs before the next token is pulled, and whatever it writes is
//! tokenized ahead of the remaining network input.

use dom::{Document, NodeId};
use tools::Utf8Decoder;

use crate::script::{NoScripts, ScriptContext, ScriptFetch, ScriptHost, ScriptSource};
use crate::tokenizer::{Token, Tokenizer, TokenizerConfig, TokenizerStats, WriteMode};
use crate::tree_builder::{
    SuspendReason, TreeBuilder, TreeBuilderConfig, TreeBuilderError, TreeBuilderStepResult,
};

/// Why [`ParseSession::pump`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PumpStatus {
    /// Every buffered character was tokenized.
    NeedMoreInput,
    /// An external script is being fetched.
    BlockedOnScript,
    OnHold,
    Aborted,
    /// End of input was reached and the document is complete.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    TreeBuilder(#[from] TreeBuilderError),
    #[error("input written to an aborted parse session")]
    Aborted,
    #[error("input written after finish()")]
    Finished,
}

#[derive(Debug)]
struct PendingScript {
    element: NodeId,
    url: String,
    base_line: u32,
}

pub struct ParseSession<H: ScriptHost> {
    doc: Document,
    decoder: Utf8Decoder,
    tokenizer: Tokenizer,
    builder: TreeBuilder,
    host: H,
    blocked: Option<PendingScript>,
    /// Network input that arrived while a script was blocking.
    deferred: String,
    finish_requested: bool,
    aborted: bool,
    /// Line of the most recent `<script>` start tag.
    script_line: u32,
    scripts_run: u64,
}

impl<H: ScriptHost> ParseSession<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(TokenizerConfig::default(), TreeBuilderConfig::default(), host)
    }

    pub fn with_config(
        tokenizer_config: TokenizerConfig,
        builder_config: TreeBuilderConfig,
        host: H,
    ) -> Self {
        let doc = Document::new();
        let tokenizer = Tokenizer::new(tokenizer_config, doc.names().clone());
        Self {
            doc,
            decoder: Utf8Decoder::new(),
            tokenizer,
            builder: TreeBuilder::new(builder_config),
            host,
            blocked: None,
            deferred: String::new(),
            finish_requested: false,
            aborted: false,
            script_line: 0,
            scripts_run: 0,
        }
    }

    /// Decode and append network bytes, then pump.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<PumpStatus, SessionError> {
        self.check_writable()?;
        let text = self.decoder.decode(bytes);
        self.write(&text)
    }

    /// Append network text, then pump.
    pub fn write(&mut self, text: &str) -> Result<PumpStatus, SessionError> {
        self.check_writable()?;
        if self.blocked.is_some() {
            self.deferred.push_str(text);
            return Ok(PumpStatus::BlockedOnScript);
        }
        self.tokenizer.write(text, WriteMode::Append);
        self.pump()
    }

    /// Declare the end of network input. While a script is pending, the
    /// tokenizer is told once the script has run.
    pub fn finish(&mut self) -> Result<PumpStatus, SessionError> {
        if self.aborted {
            return Ok(PumpStatus::Aborted);
        }
        if !self.finish_requested {
            let mut tail = String::new();
            self.decoder.finish(&mut tail);
            if !tail.is_empty() {
                self.write(&tail)?;
            }
            self.finish_requested = true;
            if self.blocked.is_none() {
                self.tokenizer.finish();
            }
        }
        self.pump()
    }

    /// Run tokens through the builder until input runs out or something
    /// blocks.
    pub fn pump(&mut self) -> Result<PumpStatus, SessionError> {
        if self.aborted {
            self.drain_after_abort()?;
            return Ok(PumpStatus::Aborted);
        }
        loop {
            if self.blocked.is_some() {
                return Ok(PumpStatus::BlockedOnScript);
            }
            let Some(token) = self.tokenizer.next_token() else {
                return Ok(self.idle_status());
            };
            if let Token::StartTag(tag) = &token {
                if tag.name.id() == core_types::local::SCRIPT {
                    self.script_line = tag.line;
                }
            }
            match self.builder.push_token(&mut self.doc, token)? {
                TreeBuilderStepResult::Continue => {}
                TreeBuilderStepResult::Suspend(SuspendReason::Script(element)) => {
                    self.start_script(element);
                }
            }
        }
    }

    /// Complete the external script the session is blocked on. `None` means
    /// the fetch failed and the script is skipped.
    pub fn script_fetched(&mut self, text: Option<String>) -> Result<PumpStatus, SessionError> {
        let Some(pending) = self.blocked.take() else {
            log::warn!(target: "html.session", "script_fetched() with no pending script");
            return self.pump();
        };
        match text {
            Some(text) => {
                let source = ScriptSource {
                    text,
                    url: Some(pending.url),
                    base_line: pending.base_line,
                };
                self.execute(pending.element, &source);
            }
            None => {
                log::debug!(target: "html.session", "external script {:?} failed to load", pending.url);
            }
        }
        self.release_deferred();
        self.pump()
    }

    pub fn set_on_hold(&mut self, hold: bool) {
        self.tokenizer.set_on_hold(hold);
    }

    /// Stop parsing. Input up to the next safe point is still built; the rest
    /// is dropped.
    /// A completed session stays completed.
    pub fn abort(&mut self) {
        if self.aborted || self.tokenizer.is_finished() {
            return;
        }
        if let Some(pending) = &self.blocked {
            log::warn!(
                target: "html.session",
                "abort while script {:?} is pending; {} deferred bytes dropped",
                pending.url,
                self.deferred.len()
            );
        }
        self.aborted = true;
        self.blocked = None;
        self.deferred.clear();
        self.tokenizer.abort();
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.is_some()
    }

    /// The whole input was parsed. An aborted session never finishes.
    pub fn is_finished(&self) -> bool {
        !self.aborted && self.tokenizer.is_finished()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tokenizer_stats(&self) -> TokenizerStats {
        self.tokenizer.stats()
    }

    pub fn scripts_run(&self) -> u64 {
        self.scripts_run
    }

    fn check_writable(&self) -> Result<(), SessionError> {
        if self.aborted {
            return Err(SessionError::Aborted);
        }
        if self.finish_requested {
            return Err(SessionError::Finished);
        }
        Ok(())
    }

    fn idle_status(&self) -> PumpStatus {
        if self.aborted || self.tokenizer.is_aborted() {
            PumpStatus::Aborted
        } else if self.tokenizer.is_finished() {
            PumpStatus::Finished
        } else if self.tokenizer.is_on_hold() {
            PumpStatus::OnHold
        } else {
            PumpStatus::NeedMoreInput
        }
    }

    fn start_script(&mut self, element: NodeId) {
        let base_line = self.script_line;
        let Some(url) = self
            .doc
            .attribute_value(element, core_types::local::SRC)
            .map(str::to_string)
        else {
            let source = ScriptSource {
                text: self.doc.text_content(element),
                url: None,
                base_line,
            };
            self.execute(element, &source);
            return;
        };
        match self.host.fetch(&url) {
            ScriptFetch::Ready(text) => {
                let source = ScriptSource {
                    text,
                    url: Some(url),
                    base_line,
                };
                self.execute(element, &source);
            }
            ScriptFetch::Pending => {
                log::debug!(target: "html.session", "blocked on external script {url:?}");
                self.blocked = Some(PendingScript {
                    element,
                    url,
                    base_line,
                });
            }
            ScriptFetch::Unavailable => {
                log::debug!(target: "html.session", "external script {url:?} unavailable");
            }
        }
    }

    fn execute(&mut self, element: NodeId, source: &ScriptSource) {
        let mut cx = ScriptContext::new(&mut self.doc, element);
        self.host.execute(source, &mut cx);
        let written = cx.into_written();
        self.scripts_run += 1;
        log::debug!(
            target: "html.session",
            "ran script from line {} ({} bytes written)",
            source.base_line,
            written.len()
        );
        self.tokenizer.write(&written, WriteMode::Insert);
    }

    fn release_deferred(&mut self) {
        let deferred = std::mem::take(&mut self.deferred);
        if !deferred.is_empty() {
            self.tokenizer.write(&deferred, WriteMode::Append);
        }
        if self.finish_requested && !self.tokenizer.is_finishing() {
            self.tokenizer.finish();
        }
    }

    /// Build whatever the tokenizer still yields before it stops. Scripts
    /// are not run.
    fn drain_after_abort(&mut self) -> Result<(), SessionError> {
        while let Some(token) = self.tokenizer.next_token() {
            self.builder.push_token(&mut self.doc, token)?;
        }
        Ok(())
    }
}

/// Parse a complete document without running scripts.
pub fn parse_document(input: &str) -> Document {
    let mut session = ParseSession::new(NoScripts);
    if let Err(err) = session.write(input).and_then(|_| session.finish()) {
        log::warn!(target: "html.session", "parse stopped early: {err}");
    }
    session.into_document()
}

#[cfg(test)]
mod tests;
