//! Deterministic token formatting for golden tests.
//!
//! One line per token. Attributes keep source order.

use core_types::NameTables;

use super::{Attribute, Token};

#[derive(Debug)]
pub enum TokenFmtError {
    UnknownNameId { id: u16 },
}

impl std::fmt::Display for TokenFmtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenFmtError::UnknownNameId { id } => write!(f, "unknown local name id: {id}"),
        }
    }
}

impl std::error::Error for TokenFmtError {}

/// Formatter context; names resolve through the tables the tokens came from.
pub struct TokenFmt<'a> {
    names: &'a NameTables,
}

impl<'a> TokenFmt<'a> {
    pub fn new(names: &'a NameTables) -> Self {
        Self { names }
    }

    pub fn format_token(&self, token: &Token) -> Result<String, TokenFmtError> {
        token.to_test_string(self)
    }

    pub fn format_all<'t>(
        &self,
        tokens: impl IntoIterator<Item = &'t Token>,
    ) -> Result<Vec<String>, TokenFmtError> {
        tokens.into_iter().map(|t| self.format_token(t)).collect()
    }

    pub fn resolve_local(&self, id: u16) -> Result<String, TokenFmtError> {
        self.names
            .local()
            .borrow()
            .name_of(id)
            .map(|name| name.to_string())
            .ok_or(TokenFmtError::UnknownNameId { id })
    }
}

/// Extension trait for deterministic token snapshot formatting.
pub trait TokenTestFormatExt {
    fn to_test_string(&self, fmt: &TokenFmt<'_>) -> Result<String, TokenFmtError>;
}

impl TokenTestFormatExt for Token {
    fn to_test_string(&self, fmt: &TokenFmt<'_>) -> Result<String, TokenFmtError> {
        match self {
            Token::Doctype(doctype) => Ok(format!(
                "DOCTYPE name={} public_id=\"{}\" system_id=\"{}\" internal_subset=\"{}\"",
                doctype.name,
                escape_text(&doctype.public_id),
                escape_text(&doctype.system_id),
                escape_text(&doctype.internal_subset),
            )),
            Token::StartTag(tag) => {
                let mut out = String::new();
                out.push_str("START name=");
                out.push_str(&fmt.resolve_local(tag.name.id())?);
                out.push_str(" attrs=[");
                for (i, attr) in tag.attrs.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&format_attr(attr, fmt)?);
                }
                out.push_str("] self_closing=");
                out.push_str(if tag.self_closing { "true" } else { "false" });
                Ok(out)
            }
            Token::EndTag(tag) => Ok(format!("END name={}", fmt.resolve_local(tag.name.id())?)),
            Token::Comment(text) => Ok(format!("COMMENT text=\"{}\"", escape_text(text))),
            Token::Text(text) => Ok(format!("CHAR text=\"{}\"", escape_text(text))),
            Token::Eof => Ok("EOF".to_string()),
        }
    }
}

fn format_attr(attr: &Attribute, fmt: &TokenFmt<'_>) -> Result<String, TokenFmtError> {
    let name = fmt.resolve_local(attr.local.id())?;
    Ok(format!("{name}=\"{}\"", escape_text(&attr.value)))
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}
