//! Incremental UTF-8 decoding for byte streams delivered in arbitrary chunks.
//!
//! Invariants:
//! - A multi-byte sequence split across chunks decodes exactly as if it had
//!   arrived in one piece.
//! - Invalid bytes never stall the decoder; each maximal invalid subpart becomes
//!   one U+FFFD.

/// Streaming decoder that carries an incomplete UTF-8 suffix between calls.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held back because they may begin a sequence completed by the next
    /// chunk. Never more than 3.
    pub fn pending(&self) -> &[u8] {
        &self.carry
    }

    /// Decode `bytes`, appending everything that is complete to `out`.
    pub fn push(&mut self, bytes: &[u8], out: &mut String) {
        if bytes.is_empty() {
            return;
        }
        if self.carry.is_empty() {
            decode_into(out, &mut self.carry, bytes);
            return;
        }

        // Complete the carried prefix by borrowing at most 3 bytes from this chunk.
        let mut remaining = bytes;
        while !self.carry.is_empty() && !remaining.is_empty() {
            let expected = seq_len(self.carry[0]);
            if expected == 0 {
                out.push('\u{FFFD}');
                self.carry.clear();
                break;
            }
            let needed = expected.saturating_sub(self.carry.len());
            if remaining.len() < needed {
                self.carry.extend_from_slice(remaining);
                return;
            }
            let mut scratch = [0u8; 4];
            let held = self.carry.len();
            scratch[..held].copy_from_slice(&self.carry);
            scratch[held..held + needed].copy_from_slice(&remaining[..needed]);
            self.carry.clear();
            let consumed = decode_prefix(out, &mut self.carry, &scratch[..held + needed]);
            // A sequence that turned out invalid may hand back bytes from this chunk.
            let used = consumed.saturating_sub(held).min(needed);
            remaining = &remaining[used..];
        }
        if !remaining.is_empty() {
            decode_into(out, &mut self.carry, remaining);
        }
    }

    /// Decode a chunk into a fresh string.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        self.push(bytes, &mut out);
        out
    }

    /// Flush a trailing incomplete sequence as U+FFFD so the stream is never
    /// silently truncated.
    pub fn finish(&mut self, out: &mut String) {
        if self.carry.is_empty() {
            return;
        }
        out.push_str(&String::from_utf8_lossy(&self.carry));
        self.carry.clear();
    }
}

fn seq_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Decode the scratch sequence assembled from carry + new bytes. Returns how
/// many bytes of `bytes` were consumed; the rest must be re-read by the caller.
fn decode_prefix(out: &mut String, carry: &mut Vec<u8>, bytes: &[u8]) -> usize {
    match std::str::from_utf8(bytes) {
        Ok(s) => {
            out.push_str(s);
            bytes.len()
        }
        Err(e) => {
            let valid = e.valid_up_to();
            if valid > 0 {
                push_valid(out, &bytes[..valid]);
            }
            match e.error_len() {
                Some(len) => {
                    out.push('\u{FFFD}');
                    valid + len
                }
                None => {
                    carry.extend_from_slice(&bytes[valid..]);
                    bytes.len()
                }
            }
        }
    }
}

fn decode_into(out: &mut String, carry: &mut Vec<u8>, mut bytes: &[u8]) {
    while !bytes.is_empty() {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                out.push_str(s);
                break;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                if valid > 0 {
                    push_valid(out, &bytes[..valid]);
                }
                match e.error_len() {
                    Some(len) => {
                        out.push('\u{FFFD}');
                        bytes = &bytes[valid + len..];
                    }
                    None => {
                        carry.extend_from_slice(&bytes[valid..]);
                        break;
                    }
                }
            }
        }
    }
}

fn push_valid(out: &mut String, bytes: &[u8]) {
    // `valid_up_to` guarantees this prefix is UTF-8.
    if let Ok(s) = std::str::from_utf8(bytes) {
        out.push_str(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_multibyte_across_chunks() {
        let mut decoder = Utf8Decoder::new();
        let mut text = String::new();

        decoder.push(&[0xC3], &mut text);
        assert_eq!(text, "");
        assert_eq!(decoder.pending(), &[0xC3]);

        decoder.push(&[0x97], &mut text);
        assert_eq!(text, "\u{00D7}");
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn carry_resolves_then_rest_of_chunk_decodes() {
        let mut decoder = Utf8Decoder::new();
        let mut text = String::new();

        // First two bytes of U+1F600 (F0 9F 98 80).
        decoder.push(&[0xF0, 0x9F], &mut text);
        assert_eq!(text, "");

        decoder.push(&[0x98, 0x80, b'!'], &mut text);
        assert_eq!(text, "\u{1F600}!");
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn broken_carry_does_not_swallow_following_ascii() {
        let mut decoder = Utf8Decoder::new();
        let mut text = String::new();

        // E2 starts a 3-byte sequence, but 'a' cannot continue it.
        decoder.push(&[0xE2], &mut text);
        decoder.push(b"ab", &mut text);
        assert_eq!(text, "\u{FFFD}ab");
    }

    #[test]
    fn invalid_bytes_make_progress() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(&[0xFF, b'f']), "\u{FFFD}f");
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn incomplete_suffix_is_flushed_on_finish() {
        let mut decoder = Utf8Decoder::new();
        let mut text = String::new();
        decoder.push(&[0xE2, 0x82], &mut text);
        assert_eq!(text, "");

        decoder.finish(&mut text);
        assert_eq!(text, "\u{FFFD}");
        assert!(decoder.pending().is_empty());
    }
}
