//! Raw text content: `script`, `style`, `textarea`, `title` and `xmp`.
//!
//! Content is collected until `</name` followed by whitespace, `/` or `>`.
//! A closing tag that does not end in `>` is skipped to the next unquoted
//! `>` before the end tag is emitted.

use core_types::{CaseMode, LocalName};

use super::states::{EntityContext, Flow, Mode};
use super::{EndTagToken, Token, Tokenizer};
use crate::elements::RawKind;

#[derive(Debug, Default)]
pub(crate) struct RawState {
    /// Content as it will be emitted, with entities decoded where the
    /// element decodes them.
    pub(super) buf: String,
    /// Consumed source characters, for re-tokenizing at end of input.
    source: String,
    /// Characters before this offset came from entity decoding and never
    /// form part of a closing tag.
    pub(super) decoded_barrier: usize,
    /// Offset just past an open `<!--`.
    comment_start: Option<usize>,
    resync: Option<Resync>,
}

impl RawState {
    pub(super) fn record_source(&mut self, ch: char) {
        self.source.push(ch);
    }
}

/// Skipping the tail of a closing tag.
#[derive(Clone, Copy, Debug)]
struct Resync {
    content_len: usize,
    quote: Option<char>,
}

impl Tokenizer {
    pub(super) fn step_raw(&mut self, kind: RawKind, ch: char) -> Flow {
        if let Some(resync) = self.raw.resync.as_mut() {
            match (resync.quote, ch) {
                (Some(q), c) if c == q => resync.quote = None,
                (Some(_), '\n') => resync.quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => resync.quote = Some(ch),
                (None, '>') => {
                    let content_len = resync.content_len;
                    self.close_raw(kind, content_len);
                }
                (None, _) => {}
            }
            return Flow::Consume;
        }

        if ch == '&' && kind.decodes_entities() {
            self.begin_entity(EntityContext::Raw);
            return Flow::Consume;
        }

        if ch == '>' || ch == '/' || ch <= ' ' {
            if let Some(start) = self.closing_tag_start(kind) {
                if ch == '>' {
                    self.close_raw(kind, start);
                } else {
                    self.raw.resync = Some(Resync {
                        content_len: start,
                        quote: None,
                    });
                }
                return Flow::Consume;
            }
        }

        let raw = &mut self.raw;
        raw.buf.push(ch);
        if kind.hides_comments() && !self.broken_comments {
            match raw.comment_start {
                None if raw.buf.ends_with("<!--") => raw.comment_start = Some(raw.buf.len()),
                Some(open) if raw.buf.ends_with("-->") && raw.buf.len() - 3 >= open => {
                    raw.comment_start = None;
                }
                _ => {}
            }
        }
        Flow::Consume
    }

    /// Offset of a `</name` that ends the buffer and may close the element.
    fn closing_tag_start(&self, kind: RawKind) -> Option<usize> {
        let raw = &self.raw;
        if raw.comment_start.is_some() {
            return None;
        }
        let name = kind.tag_name();
        let start = raw.buf.len().checked_sub(name.len() + 2)?;
        if start < raw.decoded_barrier {
            return None;
        }
        let tail = raw.buf.get(start..)?;
        let matched = tail.starts_with("</") && tail[2..].eq_ignore_ascii_case(name);
        (matched && !raw.buf[..start].ends_with('\\')).then_some(start)
    }

    fn close_raw(&mut self, kind: RawKind, content_len: usize) {
        let mut content = std::mem::take(&mut self.raw.buf);
        content.truncate(content_len);
        self.raw = Default::default();
        if !content.is_empty() {
            self.emit_token(Token::Text(content));
        }
        let name = LocalName::from_string(&self.names, kind.tag_name(), CaseMode::NormalizeLower);
        let line = self.source.line();
        self.emit_token(Token::EndTag(EndTagToken { name, line }));
        self.transition_to(Mode::Data);
    }

    /// End of input inside raw text.
    pub(super) fn unterminated_raw(&mut self, kind: RawKind) {
        if let Some(resync) = self.raw.resync {
            self.close_raw(kind, resync.content_len);
            return;
        }
        if kind.hides_comments() && self.raw.comment_start.is_some() && !self.broken_comments {
            // Tokenize again without hiding, so a closing tag inside the
            // unterminated comment ends the element.
            self.broken_comments = true;
            let source = std::mem::take(&mut self.raw.source);
            self.raw = Default::default();
            self.refeed(source);
            return;
        }
        if kind == RawKind::Title {
            let source = std::mem::take(&mut self.raw.source);
            self.raw = Default::default();
            self.transition_to(Mode::Data);
            self.refeed(source);
            return;
        }
        let content = std::mem::take(&mut self.raw.buf);
        self.raw = Default::default();
        if !content.is_empty() {
            self.emit_token(Token::Text(content));
        }
        self.transition_to(Mode::Data);
    }
}
