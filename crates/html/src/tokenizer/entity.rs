//! Character reference sub-machine.
//!
//! Runs on top of the current mode: while an entity is open every character
//! goes here first. Output is routed by [`EntityContext`].
//!
//! Termination is lenient: a reference ends at `;` (consumed) or at the first
//! character that cannot continue it (reprocessed by the surrounding mode).

use super::Tokenizer;
use super::states::{EntityContext, EntityPhase, Flow};
use crate::entities::{
    MAX_ENTITY_NAME, MAX_NUMERIC_DIGITS, longest_latin1_prefix, lookup_entity,
    numeric_reference_char,
};

#[derive(Debug)]
pub(crate) struct EntityState {
    phase: EntityPhase,
    context: EntityContext,
    /// Source characters after `&`, replayed literally when nothing decodes.
    buf: String,
    value: u32,
    digits: usize,
    hex: bool,
}

impl Tokenizer {
    pub(super) fn begin_entity(&mut self, context: EntityContext) {
        self.entity = Some(EntityState {
            phase: EntityPhase::SearchEntity,
            context,
            buf: String::new(),
            value: 0,
            digits: 0,
            hex: false,
        });
    }

    pub(super) fn step_entity(&mut self, ch: char) -> Flow {
        let Some(entity) = self.entity.as_mut() else {
            return Flow::Reprocess;
        };
        match entity.phase {
            EntityPhase::SearchEntity => match ch {
                '#' => {
                    entity.buf.push(ch);
                    entity.phase = EntityPhase::NumericSearch;
                    Flow::Consume
                }
                c if c.is_ascii_alphanumeric() => {
                    entity.phase = EntityPhase::EntityName;
                    Flow::Reprocess
                }
                _ => {
                    self.finish_entity(Some(ch));
                    Flow::Reprocess
                }
            },
            EntityPhase::NumericSearch => match ch {
                'x' | 'X' => {
                    entity.buf.push(ch);
                    entity.hex = true;
                    entity.phase = EntityPhase::Hexadecimal;
                    Flow::Consume
                }
                c if c.is_ascii_digit() => {
                    entity.phase = EntityPhase::Decimal;
                    Flow::Reprocess
                }
                _ => {
                    self.finish_entity(Some(ch));
                    Flow::Reprocess
                }
            },
            EntityPhase::Hexadecimal | EntityPhase::Decimal => {
                let radix = if entity.hex { 16 } else { 10 };
                match ch.to_digit(radix) {
                    Some(digit) => {
                        entity.buf.push(ch);
                        entity.value = entity.value * radix + digit;
                        entity.digits += 1;
                        if entity.digits == MAX_NUMERIC_DIGITS {
                            entity.phase = EntityPhase::SearchSemicolon;
                        }
                        Flow::Consume
                    }
                    None => self.end_entity_at(ch),
                }
            }
            EntityPhase::EntityName => {
                if ch.is_ascii_alphanumeric() {
                    entity.buf.push(ch);
                    if entity.buf.len() == MAX_ENTITY_NAME {
                        entity.phase = EntityPhase::SearchSemicolon;
                    }
                    Flow::Consume
                } else {
                    self.end_entity_at(ch)
                }
            }
            EntityPhase::SearchSemicolon => self.end_entity_at(ch),
        }
    }

    /// Close the reference in front of `ch`, consuming `ch` when it is a `;`
    /// that the decoded form absorbed.
    fn end_entity_at(&mut self, ch: char) -> Flow {
        if self.finish_entity(Some(ch)) {
            Flow::Consume
        } else {
            Flow::Reprocess
        }
    }

    /// Resolve the open reference. `next` is the character after it, or
    /// `None` at end of input. Returns whether `next` was absorbed.
    pub(super) fn finish_entity(&mut self, next: Option<char>) -> bool {
        let Some(entity) = self.entity.take() else {
            return false;
        };
        let semicolon = next == Some(';');
        let is_numeric = entity.buf.starts_with('#');

        if is_numeric {
            if entity.digits == 0 {
                self.entity_literal(entity.context, &entity.buf);
                return false;
            }
            let ch = numeric_reference_char(entity.value);
            self.entity_decoded(entity.context, ch, "");
            return semicolon;
        }

        let name = entity.buf.as_str();
        if let Some(code) = lookup_entity(name) {
            let accept = entity.context != EntityContext::Attribute || code < 256 || semicolon;
            if accept {
                let ch = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                self.entity_decoded(entity.context, ch, "");
                return semicolon;
            }
        } else if entity.context != EntityContext::Attribute {
            if let Some((len, code)) = longest_latin1_prefix(name) {
                let ch = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                self.entity_decoded(entity.context, ch, &name[len..]);
                return false;
            }
        }
        self.entity_literal(entity.context, name);
        false
    }

    /// `&` plus the unmatched source characters.
    fn entity_literal(&mut self, context: EntityContext, rest: &str) {
        match context {
            EntityContext::Text => {
                self.push_text('&');
                self.push_text_str(rest);
            }
            EntityContext::Attribute => {
                self.tag.attr_value.push('&');
                self.tag.attr_value.push_str(rest);
            }
            EntityContext::Raw => {
                self.raw.buf.push('&');
                self.raw.buf.push_str(rest);
            }
        }
    }

    /// A decoded character followed by literal leftovers.
    fn entity_decoded(&mut self, context: EntityContext, ch: char, rest: &str) {
        match context {
            EntityContext::Text => {
                self.push_text(ch);
                self.push_text_str(rest);
            }
            EntityContext::Attribute => {
                self.tag.attr_value.push(ch);
                self.tag.attr_value.push_str(rest);
            }
            EntityContext::Raw => {
                self.raw.buf.push(ch);
                self.raw.decoded_barrier = self.raw.buf.len();
                self.raw.buf.push_str(rest);
            }
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html.tokenizer", "entity -> {ch:?} in {:?}", self.mode);
    }
}
