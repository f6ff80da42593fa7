//! `<!` declarations, comments, doctypes, CDATA and processing instructions.

use super::states::{DoctypeState, Flow, Mode};
use super::{DoctypeToken, Token, Tokenizer};

/// Shared buffer for the declaration keyword, comment, CDATA and PI bodies.
#[derive(Debug, Default)]
pub(crate) struct MarkupScratch {
    pub(super) buf: String,
    quote: Option<char>,
}

impl MarkupScratch {
    pub(super) fn clear(&mut self) {
        self.buf.clear();
        self.quote = None;
    }
}

/// `--` inside a doctype; the whole comment counts as whitespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DoctypeComment {
    /// One `-` seen.
    Open,
    /// Inside; the count of trailing dashes.
    Body(u8),
}

#[derive(Debug, Default)]
pub(crate) struct DoctypeBuilder {
    token: DoctypeToken,
    keyword: String,
    comment: Option<DoctypeComment>,
}

const DECLARATION_KEYWORDS: [&str; 3] = ["--", "doctype", "[CDATA["];

/// `doctype` is matched ignoring ASCII case; the other keywords exactly.
fn same_text(keyword: &str, expected: &str, scratch: &str) -> bool {
    if keyword == "doctype" {
        expected.eq_ignore_ascii_case(scratch)
    } else {
        expected == scratch
    }
}

fn keyword_matches(keyword: &str, scratch: &str) -> bool {
    same_text(keyword, keyword, scratch)
}

fn keyword_has_prefix(keyword: &str, scratch: &str) -> bool {
    keyword
        .get(..scratch.len())
        .is_some_and(|prefix| same_text(keyword, prefix, scratch))
}

/// Collapse whitespace runs to one space and trim the ends.
fn simplify_whitespace(value: &str) -> String {
    value.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_space(ch: char) -> bool {
    ch <= ' '
}

impl Tokenizer {
    pub(super) fn step_markup_declaration(&mut self, ch: char) -> Flow {
        self.scratch.buf.push(ch);
        let scratch = self.scratch.buf.as_str();
        if let Some(&keyword) = DECLARATION_KEYWORDS
            .iter()
            .find(|k| keyword_matches(k, scratch))
        {
            match keyword {
                "--" => {
                    self.flush_text();
                    self.scratch.clear();
                    self.transition_to(Mode::Comment);
                }
                "doctype" => {
                    self.flush_text();
                    self.doctype = DoctypeBuilder::default();
                    self.transition_to(Mode::Doctype(DoctypeState::Begin));
                }
                _ => {
                    self.scratch.clear();
                    self.transition_to(Mode::Cdata);
                }
            }
            return Flow::Consume;
        }
        if DECLARATION_KEYWORDS
            .iter()
            .any(|k| keyword_has_prefix(k, scratch))
        {
            return Flow::Consume;
        }
        self.flush_text();
        self.transition_to(Mode::BogusDeclaration);
        Flow::Reprocess
    }

    pub(super) fn step_bogus_declaration(&mut self, ch: char) -> Flow {
        if ch == '>' {
            self.transition_to(Mode::Data);
        }
        Flow::Consume
    }

    pub(super) fn step_comment(&mut self, ch: char) -> Flow {
        if ch != '>' {
            self.scratch.buf.push(ch);
            return Flow::Consume;
        }
        let body = &self.scratch.buf;
        if body.ends_with("--") {
            let text = body[..body.len() - 2].to_string();
            self.close_comment(text);
        } else if self.broken_comments {
            let text = std::mem::take(&mut self.scratch.buf);
            self.close_comment(text);
        } else {
            self.scratch.buf.push(ch);
        }
        Flow::Consume
    }

    fn close_comment(&mut self, text: String) {
        self.scratch.clear();
        self.emit_token(Token::Comment(text));
        self.transition_to(Mode::Data);
    }

    /// End of input inside a comment: the comment stops at its first `>`
    /// and the remainder is tokenized again with comments treated as broken.
    pub(super) fn unterminated_comment(&mut self) {
        let body = std::mem::take(&mut self.scratch.buf);
        self.broken_comments = true;
        self.transition_to(Mode::Data);
        match body.find('>') {
            Some(end) => {
                self.emit_token(Token::Comment(body[..end].to_string()));
                self.refeed(body[end + 1..].to_string());
            }
            None => self.refeed(body),
        }
    }

    pub(super) fn step_cdata(&mut self, ch: char) -> Flow {
        if ch == '>' && self.scratch.buf.ends_with("]]") {
            let len = self.scratch.buf.len() - 2;
            let content = std::mem::take(&mut self.scratch.buf);
            self.push_text_str(&content[..len]);
            self.transition_to(Mode::Data);
        } else {
            self.scratch.buf.push(ch);
        }
        Flow::Consume
    }

    /// Skipped up to the first `>` outside quotes.
    pub(super) fn step_processing_instruction(&mut self, ch: char) -> Flow {
        match (self.scratch.quote, ch) {
            (Some(q), c) if c == q => self.scratch.quote = None,
            (Some(_), '\n') => self.scratch.quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => self.scratch.quote = Some(ch),
            (None, '>') => self.transition_to(Mode::Data),
            (None, _) => {}
        }
        Flow::Consume
    }

    pub(super) fn step_doctype(&mut self, state: DoctypeState, ch: char) -> Flow {
        if let Some(comment) = self.doctype.comment {
            return self.step_doctype_comment(comment, ch);
        }
        let doctype = &mut self.doctype;
        match state {
            DoctypeState::Begin => match ch {
                '>' => self.drop_doctype(),
                c if is_space(c) => {
                    self.transition_to(Mode::Doctype(DoctypeState::BeforeName));
                    Flow::Consume
                }
                _ => {
                    self.transition_to(Mode::Doctype(DoctypeState::BeforeName));
                    Flow::Reprocess
                }
            },
            DoctypeState::BeforeName => match ch {
                '>' => self.drop_doctype(),
                '-' => self.open_doctype_comment(),
                c if is_space(c) => Flow::Consume,
                _ => {
                    self.transition_to(Mode::Doctype(DoctypeState::Name));
                    Flow::Reprocess
                }
            },
            DoctypeState::Name => match ch {
                '>' => self.emit_doctype(),
                c if is_space(c) => {
                    self.transition_to(Mode::Doctype(DoctypeState::AfterName));
                    Flow::Consume
                }
                c => {
                    doctype.token.name.push(c.to_ascii_lowercase());
                    Flow::Consume
                }
            },
            DoctypeState::AfterName => {
                if ch.is_ascii_alphabetic() {
                    doctype.keyword.push(ch.to_ascii_lowercase());
                    if doctype.keyword.len() > "public".len() {
                        return self.bogus_doctype();
                    }
                    return Flow::Consume;
                }
                if !doctype.keyword.is_empty() {
                    let keyword = std::mem::take(&mut doctype.keyword);
                    let next = match keyword.as_str() {
                        "public" => DoctypeState::BeforePublicId,
                        "system" => DoctypeState::BeforeSystemId,
                        _ => return self.bogus_doctype(),
                    };
                    self.transition_to(Mode::Doctype(next));
                    return Flow::Reprocess;
                }
                match ch {
                    '>' => self.emit_doctype(),
                    '[' => self.enter_internal_subset(),
                    '-' => self.open_doctype_comment(),
                    c if is_space(c) => Flow::Consume,
                    _ => self.bogus_doctype(),
                }
            }
            DoctypeState::BeforePublicId | DoctypeState::BeforeSystemId => match ch {
                '"' | '\'' => {
                    let next = if state == DoctypeState::BeforePublicId {
                        DoctypeState::PublicId(ch)
                    } else {
                        DoctypeState::SystemId(ch)
                    };
                    self.transition_to(Mode::Doctype(next));
                    Flow::Consume
                }
                '>' => self.emit_doctype(),
                '-' => self.open_doctype_comment(),
                c if is_space(c) => Flow::Consume,
                _ => self.bogus_doctype(),
            },
            DoctypeState::PublicId(quote) | DoctypeState::SystemId(quote) => {
                let is_public = matches!(state, DoctypeState::PublicId(_));
                match ch {
                    c if c == quote => {
                        let next = if is_public {
                            DoctypeState::AfterPublicId
                        } else {
                            DoctypeState::AfterSystemId
                        };
                        self.transition_to(Mode::Doctype(next));
                        Flow::Consume
                    }
                    '>' => self.drop_doctype(),
                    c => {
                        let target = if is_public {
                            &mut doctype.token.public_id
                        } else {
                            &mut doctype.token.system_id
                        };
                        target.push(c);
                        Flow::Consume
                    }
                }
            }
            DoctypeState::AfterPublicId => match ch {
                '"' | '\'' => {
                    self.transition_to(Mode::Doctype(DoctypeState::SystemId(ch)));
                    Flow::Consume
                }
                '[' => self.enter_internal_subset(),
                '>' => self.emit_doctype(),
                '-' => self.open_doctype_comment(),
                c if is_space(c) => Flow::Consume,
                _ => self.bogus_doctype(),
            },
            DoctypeState::AfterSystemId => match ch {
                '[' => self.enter_internal_subset(),
                '>' => self.emit_doctype(),
                '-' => self.open_doctype_comment(),
                c if is_space(c) => Flow::Consume,
                _ => self.bogus_doctype(),
            },
            DoctypeState::InternalSubset => {
                if ch == ']' {
                    self.transition_to(Mode::Doctype(DoctypeState::AfterInternalSubset));
                } else {
                    doctype.token.internal_subset.push(ch);
                }
                Flow::Consume
            }
            DoctypeState::AfterInternalSubset => match ch {
                '>' => self.emit_doctype(),
                c if is_space(c) => Flow::Consume,
                _ => self.bogus_doctype(),
            },
            DoctypeState::Bogus => {
                if ch == '>' {
                    self.transition_to(Mode::Data);
                }
                Flow::Consume
            }
        }
    }

    fn step_doctype_comment(&mut self, comment: DoctypeComment, ch: char) -> Flow {
        self.doctype.comment = match (comment, ch) {
            (DoctypeComment::Open, '-') => Some(DoctypeComment::Body(0)),
            (DoctypeComment::Open, _) => {
                self.doctype.comment = None;
                return self.bogus_doctype();
            }
            (DoctypeComment::Body(1), '-') => None,
            (DoctypeComment::Body(dashes), '-') => Some(DoctypeComment::Body(dashes + 1)),
            (DoctypeComment::Body(_), _) => Some(DoctypeComment::Body(0)),
        };
        Flow::Consume
    }

    fn open_doctype_comment(&mut self) -> Flow {
        self.doctype.comment = Some(DoctypeComment::Open);
        Flow::Consume
    }

    fn enter_internal_subset(&mut self) -> Flow {
        self.transition_to(Mode::Doctype(DoctypeState::InternalSubset));
        Flow::Consume
    }

    /// Malformed doctypes are skipped to the next `>` without a token.
    fn bogus_doctype(&mut self) -> Flow {
        self.transition_to(Mode::Doctype(DoctypeState::Bogus));
        Flow::Reprocess
    }

    fn drop_doctype(&mut self) -> Flow {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html.tokenizer", "dropping doctype {:?}", self.doctype.token);
        self.transition_to(Mode::Data);
        Flow::Consume
    }

    fn emit_doctype(&mut self) -> Flow {
        let mut token = std::mem::take(&mut self.doctype).token;
        token.public_id = simplify_whitespace(&token.public_id);
        token.system_id = simplify_whitespace(&token.system_id);
        self.emit_token(Token::Doctype(token));
        self.transition_to(Mode::Data);
        Flow::Consume
    }
}
