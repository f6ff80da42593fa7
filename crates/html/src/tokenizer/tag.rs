//! Tag open, tag name and attribute states.

use core_types::{CaseMode, LocalName, NamespaceName};

use super::states::{EntityContext, Flow, Mode, TagState};
use super::{Attribute, AttributeMap, EndTagToken, TagToken, Token, Tokenizer};
use crate::elements::{RawKind, drops_leading_newline, is_void};

/// Tag names longer than this are truncated.
const MAX_TAG_NAME: usize = 1024;

#[derive(Debug, Default)]
pub(crate) struct TagBuilder {
    is_end: bool,
    name: String,
    name_chars: usize,
    attrs: AttributeMap,
    attr_name: String,
    pub(super) attr_value: String,
    /// A `/` was the last thing seen; `>` next makes the tag self-closing.
    slash_pending: bool,
    self_closing: bool,
    line: u32,
}

impl TagBuilder {
    pub(super) fn reset(&mut self, is_end: bool, line: u32) {
        self.is_end = is_end;
        self.name.clear();
        self.name_chars = 0;
        self.attrs = AttributeMap::new();
        self.attr_name.clear();
        self.attr_value.clear();
        self.slash_pending = false;
        self.self_closing = false;
        self.line = line;
    }

    fn push_name(&mut self, ch: char) {
        if self.name_chars < MAX_TAG_NAME {
            self.name.push(ch.to_ascii_lowercase());
            self.name_chars += 1;
        }
    }
}

fn is_space(ch: char) -> bool {
    ch <= ' '
}

impl Tokenizer {
    pub(super) fn step_tag_open(&mut self, ch: char) -> Flow {
        match ch {
            c if c.is_ascii_alphabetic() => {
                self.flush_text();
                self.tag.reset(false, self.markup_line);
                self.transition_to(Mode::Tag(TagState::TagName));
                Flow::Reprocess
            }
            '/' => {
                self.flush_text();
                self.tag.reset(true, self.markup_line);
                self.transition_to(Mode::Tag(TagState::TagName));
                Flow::Consume
            }
            '!' => {
                self.scratch.clear();
                self.transition_to(Mode::MarkupDeclaration);
                Flow::Consume
            }
            '?' => {
                self.flush_text();
                self.scratch.clear();
                self.transition_to(Mode::ProcessingInstruction);
                Flow::Consume
            }
            _ => {
                self.push_text('<');
                self.transition_to(Mode::Data);
                Flow::Reprocess
            }
        }
    }

    pub(super) fn step_tag(&mut self, state: TagState, ch: char) -> Flow {
        match state {
            TagState::TagName => match ch {
                '>' => {
                    self.emit_tag();
                    Flow::Consume
                }
                '/' => {
                    self.tag.slash_pending = true;
                    self.transition_to(Mode::Tag(TagState::SearchAttribute));
                    Flow::Consume
                }
                '<' => {
                    self.transition_to(Mode::Tag(TagState::SearchEnd));
                    Flow::Reprocess
                }
                c if is_space(c) => {
                    self.transition_to(Mode::Tag(TagState::SearchAttribute));
                    Flow::Consume
                }
                c => {
                    self.tag.push_name(c);
                    Flow::Consume
                }
            },
            TagState::SearchAttribute => match ch {
                '>' => {
                    self.emit_tag();
                    Flow::Consume
                }
                '/' => {
                    self.tag.slash_pending = true;
                    Flow::Consume
                }
                '<' => {
                    self.transition_to(Mode::Tag(TagState::SearchEnd));
                    Flow::Reprocess
                }
                '"' | '\'' => {
                    // Value without a name; dropped when it closes.
                    self.tag.slash_pending = false;
                    self.tag.attr_name.clear();
                    self.tag.attr_value.clear();
                    self.transition_to(Mode::Tag(TagState::QuotedValue(ch)));
                    Flow::Consume
                }
                c if is_space(c) => {
                    self.tag.slash_pending = false;
                    Flow::Consume
                }
                _ => {
                    self.tag.slash_pending = false;
                    self.tag.attr_name.clear();
                    self.tag.attr_value.clear();
                    self.transition_to(Mode::Tag(TagState::AttributeName));
                    Flow::Reprocess
                }
            },
            TagState::AttributeName => match ch {
                '=' => {
                    self.transition_to(Mode::Tag(TagState::SearchValue));
                    Flow::Consume
                }
                '>' => {
                    self.commit_attribute();
                    self.emit_tag();
                    Flow::Consume
                }
                '/' => {
                    self.commit_attribute();
                    self.tag.slash_pending = true;
                    self.transition_to(Mode::Tag(TagState::SearchAttribute));
                    Flow::Consume
                }
                c if is_space(c) => {
                    self.transition_to(Mode::Tag(TagState::SearchEqual));
                    Flow::Consume
                }
                c => {
                    self.tag.attr_name.push(c.to_ascii_lowercase());
                    Flow::Consume
                }
            },
            TagState::SearchEqual => match ch {
                '=' => {
                    self.transition_to(Mode::Tag(TagState::SearchValue));
                    Flow::Consume
                }
                c if is_space(c) => Flow::Consume,
                _ => {
                    self.commit_attribute();
                    self.transition_to(Mode::Tag(TagState::SearchAttribute));
                    Flow::Reprocess
                }
            },
            TagState::SearchValue => match ch {
                '"' | '\'' => {
                    self.transition_to(Mode::Tag(TagState::QuotedValue(ch)));
                    Flow::Consume
                }
                '>' => {
                    self.commit_attribute();
                    self.emit_tag();
                    Flow::Consume
                }
                c if is_space(c) => Flow::Consume,
                _ => {
                    self.transition_to(Mode::Tag(TagState::Value));
                    Flow::Reprocess
                }
            },
            TagState::QuotedValue(quote) => match ch {
                c if c == quote => {
                    let trimmed = self.tag.attr_value.trim_end_matches('\n').len();
                    self.tag.attr_value.truncate(trimmed);
                    self.commit_attribute();
                    self.transition_to(Mode::Tag(TagState::SearchAttribute));
                    Flow::Consume
                }
                '&' => {
                    self.begin_entity(EntityContext::Attribute);
                    Flow::Consume
                }
                c => {
                    self.tag.attr_value.push(c);
                    Flow::Consume
                }
            },
            TagState::Value => match ch {
                '>' => {
                    self.commit_attribute();
                    self.emit_tag();
                    Flow::Consume
                }
                '<' => {
                    self.commit_attribute();
                    self.transition_to(Mode::Tag(TagState::SearchEnd));
                    Flow::Reprocess
                }
                '"' | '\'' => {
                    self.commit_attribute();
                    self.transition_to(Mode::Tag(TagState::SearchAttribute));
                    Flow::Reprocess
                }
                '`' => {
                    self.commit_attribute();
                    self.transition_to(Mode::Tag(TagState::SearchAttribute));
                    Flow::Consume
                }
                '&' => {
                    self.begin_entity(EntityContext::Attribute);
                    Flow::Consume
                }
                c if is_space(c) => {
                    self.commit_attribute();
                    self.transition_to(Mode::Tag(TagState::SearchAttribute));
                    Flow::Consume
                }
                c => {
                    self.tag.attr_value.push(c);
                    Flow::Consume
                }
            },
            TagState::SearchEnd => match ch {
                '>' => {
                    self.emit_tag();
                    Flow::Consume
                }
                '<' => {
                    self.tag.slash_pending = false;
                    self.emit_tag();
                    Flow::Reprocess
                }
                '/' => {
                    self.tag.self_closing = true;
                    Flow::Consume
                }
                _ => Flow::Consume,
            },
        }
    }

    fn commit_attribute(&mut self) {
        let value = std::mem::take(&mut self.tag.attr_value);
        if self.tag.attr_name.is_empty() {
            return;
        }
        let name = std::mem::take(&mut self.tag.attr_name);
        let attr = Attribute {
            local: LocalName::from_string(&self.names, &name, CaseMode::NormalizeLower),
            namespace: NamespaceName::empty(&self.names),
            value,
        };
        if !self.tag.attrs.insert(attr) {
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(target: "html.tokenizer", "duplicate attribute {name:?} dropped");
        }
    }

    /// Close the current tag. Invalid names produce no token.
    fn emit_tag(&mut self) {
        self.transition_to(Mode::Data);
        if self.tag.slash_pending {
            self.tag.self_closing = true;
        }
        if !self
            .tag
            .name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
        {
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(target: "html.tokenizer", "dropping tag with name {:?}", self.tag.name);
            return;
        }

        let name = LocalName::from_string(&self.names, &self.tag.name, CaseMode::NormalizeLower);
        let line = self.tag.line;
        if self.tag.is_end {
            self.emit_token(Token::EndTag(EndTagToken { name, line }));
            return;
        }

        let raw_name = std::mem::take(&mut self.tag.name);
        let is_script = raw_name == "script";
        let self_closing = self.tag.self_closing && (is_void(&raw_name) || is_script);
        let attrs = std::mem::take(&mut self.tag.attrs);
        self.emit_token(Token::StartTag(TagToken {
            name: name.clone(),
            attrs,
            self_closing,
            line,
        }));

        if is_script && self_closing {
            self.emit_token(Token::EndTag(EndTagToken { name, line }));
            return;
        }
        if drops_leading_newline(&raw_name) {
            self.discard_lf = true;
        }
        if raw_name == "plaintext" {
            self.transition_to(Mode::Plaintext);
        } else if let Some(kind) = RawKind::for_element(&raw_name) {
            self.enter_raw(kind);
        }
    }
}
