//! Token emission helpers.

use super::{Token, Tokenizer};

impl Tokenizer {
    pub(super) fn emit_token(&mut self, token: Token) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html.tokenizer", "emit token: {token:?}");
        self.queue.push_back(token);
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
    }

    /// Emit pending character data as one `Text` token.
    pub(super) fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.emit_token(Token::Text(text));
        }
    }

    pub(super) fn push_text(&mut self, ch: char) {
        self.text.push(ch);
        self.check_text_threshold();
    }

    pub(super) fn push_text_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.check_text_threshold();
    }

    pub(super) fn check_text_threshold(&mut self) {
        if self.text.len() >= self.config.max_text_run {
            self.flush_text();
        }
    }
}
