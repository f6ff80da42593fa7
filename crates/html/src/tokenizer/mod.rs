//! Streaming HTML tokenizer.
//!
//! Input arrives through [`Tokenizer::write`] in arbitrary chunks and tokens
//! are pulled one at a time with [`Tokenizer::next_token`]. The tokenizer is
//! an explicit state machine and resumable at any chunk boundary.
//!
//! Invariants:
//! - Chunk-equivalence: feeding input in one chunk or many chunks yields the
//!   same token sequence.
//! - Pull-driven: the tokenizer stops as soon as one token is available, so
//!   input inserted by the consumer after a token is read ahead of anything
//!   still buffered.
//! - `Token::Eof` is produced at most once, after `finish()`.

use std::collections::VecDeque;

use core_types::NameTables;

use crate::elements::RawKind;
use entity::EntityState;
use markup::{DoctypeBuilder, MarkupScratch};
use raw::RawState;
use source::SourceStack;
use states::{Flow, Mode};
use tag::TagBuilder;

mod emit;
mod entity;
mod markup;
mod raw;
mod source;
mod states;
mod tag;
mod token;
mod token_fmt;

pub use token::{Attribute, AttributeMap, DoctypeToken, EndTagToken, TagToken, Token};
pub use token_fmt::{TokenFmt, TokenFmtError, TokenTestFormatExt};

/// Configuration for the tokenizer.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// A pending text run is emitted once it reaches this many bytes.
    pub max_text_run: usize,
    /// Emit a `Token::Eof` once input is finished.
    pub emit_eof: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_text_run: 64 * 1024,
            emit_eof: true,
        }
    }
}

/// Where written characters go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Network data: appended after everything already buffered.
    Append,
    /// Script output: read before anything already buffered.
    Insert,
}

/// Minimal tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
    pub frames_pushed: u64,
}

pub struct Tokenizer {
    config: TokenizerConfig,
    names: NameTables,
    source: SourceStack,
    mode: Mode,
    queue: VecDeque<Token>,
    /// Pending character data for the next `Text` token.
    text: String,
    tag: TagBuilder,
    entity: Option<EntityState>,
    raw: RawState,
    scratch: MarkupScratch,
    doctype: DoctypeBuilder,
    /// Line of the most recent `<`.
    markup_line: u32,
    discard_lf: bool,
    /// Comments end at the first `>` and scripts stop hiding `<!-- -->`.
    broken_comments: bool,
    on_hold: bool,
    aborted: bool,
    /// Buffered input was dropped after an abort; nothing more is produced.
    stopped: bool,
    finishing: bool,
    eof_emitted: bool,
    stats: TokenizerStats,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig, names: NameTables) -> Self {
        assert!(config.max_text_run > 0, "max_text_run must be positive");
        Self {
            config,
            names,
            source: SourceStack::new(),
            mode: Mode::Data,
            queue: VecDeque::new(),
            text: String::new(),
            tag: TagBuilder::default(),
            entity: None,
            raw: RawState::default(),
            scratch: MarkupScratch::default(),
            doctype: DoctypeBuilder::default(),
            markup_line: 1,
            discard_lf: false,
            broken_comments: false,
            on_hold: false,
            aborted: false,
            stopped: false,
            finishing: false,
            eof_emitted: false,
            stats: TokenizerStats::default(),
        }
    }

    /// Tokenize a complete string.
    pub fn tokenize(names: &NameTables, input: &str) -> Vec<Token> {
        let mut tokenizer = Self::new(TokenizerConfig::default(), names.clone());
        tokenizer.write(input, WriteMode::Append);
        tokenizer.finish();
        tokenizer.drain()
    }

    /// Buffer input. Nothing is tokenized until tokens are pulled.
    ///
    /// Panics if network input arrives after [`finish`](Self::finish).
    pub fn write(&mut self, chunk: &str, mode: WriteMode) {
        if self.aborted {
            return;
        }
        match mode {
            WriteMode::Append => {
                assert!(!self.finishing, "network input written after finish()");
                self.source.append(chunk);
            }
            WriteMode::Insert => {
                if chunk.is_empty() {
                    return;
                }
                self.stats.frames_pushed = self.stats.frames_pushed.saturating_add(1);
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(
                    target: "html.tokenizer",
                    "insert frame depth={} len={}",
                    self.source.depth() + 1,
                    chunk.len()
                );
                self.source.insert(chunk.to_string());
            }
        }
    }

    /// Declare the end of network input.
    pub fn finish(&mut self) {
        self.finishing = true;
    }

    /// Produce the next token, or `None` if more input (or a release from
    /// hold) is needed first.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.queue.is_empty() {
            self.pump();
        }
        self.queue.pop_front()
    }

    /// Pull every token currently available.
    pub fn drain(&mut self) -> Vec<Token> {
        std::iter::from_fn(|| self.next_token()).collect()
    }

    /// While held, tokenization pauses at the next safe boundary.
    pub fn set_on_hold(&mut self, hold: bool) {
        self.on_hold = hold;
    }

    pub fn is_on_hold(&self) -> bool {
        self.on_hold
    }

    /// Stop for good at the next safe boundary, dropping buffered input.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// `finish()` was called and every token including EOF was produced.
    /// Never true for an aborted tokenizer.
    pub fn is_finished(&self) -> bool {
        self.eof_emitted && !self.stopped && self.queue.is_empty()
    }

    /// Aborted and every token up to the stop point was produced.
    pub fn is_stopped(&self) -> bool {
        self.stopped && self.queue.is_empty()
    }

    pub fn is_finishing(&self) -> bool {
        self.finishing
    }

    /// Input is buffered that has not been tokenized yet.
    pub fn has_pending_input(&self) -> bool {
        !self.source.is_empty()
    }

    /// Line of the next unread base-input character.
    pub fn line(&self) -> u32 {
        self.source.line()
    }

    pub fn names(&self) -> &NameTables {
        &self.names
    }

    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    /// Data mode with no partial entity: the only place holds and aborts
    /// take effect.
    fn at_safe_boundary(&self) -> bool {
        self.mode == Mode::Data && self.entity.is_none()
    }

    fn pump(&mut self) {
        while self.queue.is_empty() && !self.eof_emitted && !self.stopped {
            if self.at_safe_boundary() {
                if self.aborted {
                    self.discard_input();
                    return;
                }
                if self.on_hold {
                    return;
                }
            }
            let Some(ch) = self.source.peek() else {
                if self.finishing {
                    self.end_of_input();
                    continue;
                }
                return;
            };
            self.stats.steps = self.stats.steps.saturating_add(1);
            let recording = matches!(self.mode, Mode::RawText(_));
            match self.step(ch) {
                Flow::Consume => {
                    self.source.advance();
                    if recording && matches!(self.mode, Mode::RawText(_)) {
                        self.raw.record_source(ch);
                    }
                }
                Flow::Reprocess | Flow::Advanced => {}
            }
        }
    }

    fn step(&mut self, ch: char) -> Flow {
        if self.discard_lf {
            self.discard_lf = false;
            if ch == '\n' {
                return Flow::Consume;
            }
        }
        if self.entity.is_some() {
            return self.step_entity(ch);
        }
        match self.mode {
            Mode::Data => self.step_data(ch),
            Mode::TagOpen => self.step_tag_open(ch),
            Mode::Tag(state) => self.step_tag(state, ch),
            Mode::MarkupDeclaration => self.step_markup_declaration(ch),
            Mode::Comment => self.step_comment(ch),
            Mode::Doctype(state) => self.step_doctype(state, ch),
            Mode::ProcessingInstruction => self.step_processing_instruction(ch),
            Mode::Cdata => self.step_cdata(ch),
            Mode::BogusDeclaration => self.step_bogus_declaration(ch),
            Mode::RawText(kind) => self.step_raw(kind, ch),
            Mode::Plaintext => {
                self.push_text(ch);
                Flow::Consume
            }
        }
    }

    fn step_data(&mut self, ch: char) -> Flow {
        match ch {
            '<' => {
                self.markup_line = self.source.line();
                self.transition_to(Mode::TagOpen);
                Flow::Consume
            }
            '&' => {
                self.begin_entity(states::EntityContext::Text);
                Flow::Consume
            }
            _ => {
                let room = self.config.max_text_run.saturating_sub(self.text.len());
                if self.source.take_text_run(room, &mut self.text) == 0 {
                    self.push_text(ch);
                    return Flow::Consume;
                }
                self.check_text_threshold();
                Flow::Advanced
            }
        }
    }

    fn transition_to(&mut self, next: Mode) {
        if self.mode == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        {
            log::trace!(
                target: "html.tokenizer",
                "state {:?} -> {:?} @line {}",
                self.mode,
                next,
                self.source.line()
            );
        }
        self.mode = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    /// Text already consumed is still emitted, so the stop point does not
    /// depend on how input was chunked.
    fn discard_input(&mut self) {
        log::debug!(target: "html.tokenizer", "aborted; dropping buffered input");
        self.flush_text();
        self.source.clear();
        self.stopped = true;
    }

    /// Recover from whatever construct is open at the end of input. Each call
    /// either closes the open construct or emits EOF.
    fn end_of_input(&mut self) {
        if self.entity.is_some() {
            self.finish_entity(None);
            return;
        }
        match self.mode {
            Mode::Data => {
                self.flush_text();
                if self.config.emit_eof {
                    self.emit_token(Token::Eof);
                }
                self.eof_emitted = true;
                log::debug!(target: "html.tokenizer", "end of input; {:?}", self.stats);
            }
            Mode::TagOpen => {
                self.push_text('<');
                self.transition_to(Mode::Data);
            }
            Mode::Tag(_) => {
                self.tag.reset(false, 0);
                self.transition_to(Mode::Data);
            }
            Mode::MarkupDeclaration
            | Mode::Doctype(_)
            | Mode::ProcessingInstruction
            | Mode::BogusDeclaration => {
                self.transition_to(Mode::Data);
            }
            Mode::Comment => self.unterminated_comment(),
            Mode::Cdata => {
                let content = std::mem::take(&mut self.scratch.buf);
                self.text.push_str(&content);
                self.transition_to(Mode::Data);
            }
            Mode::RawText(kind) => self.unterminated_raw(kind),
            Mode::Plaintext => self.transition_to(Mode::Data),
        }
    }

    /// Re-tokenize `text` ahead of anything still buffered.
    fn refeed(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.stats.frames_pushed = self.stats.frames_pushed.saturating_add(1);
        self.source.insert(text);
    }

    fn enter_raw(&mut self, kind: RawKind) {
        self.raw = RawState::default();
        self.transition_to(Mode::RawText(kind));
    }
}
