//! Stack of pending input frames.
//!
//! The bottom frame holds network input and is only ever appended to. Script
//! output is pushed as a new frame on top and is read before anything below
//! it. Characters come out with CR and CRLF folded to LF.

use memchr::{memchr_iter, memchr3};

/// Bytes of consumed prefix the base frame keeps before compacting.
const COMPACT_THRESHOLD: usize = 4096;

#[derive(Debug)]
struct Frame {
    buf: String,
    pos: usize,
    /// The last character read was CR; a following LF is dropped.
    skip_lf: bool,
}

impl Frame {
    fn new(buf: String) -> Self {
        Self {
            buf,
            pos: 0,
            skip_lf: false,
        }
    }

    fn remaining(&self) -> &str {
        &self.buf[self.pos..]
    }
}

#[derive(Debug)]
pub(crate) struct SourceStack {
    base: Frame,
    /// Inserted frames, innermost last.
    inserted: Vec<Frame>,
    line: u32,
}

impl SourceStack {
    pub(crate) fn new() -> Self {
        Self {
            base: Frame::new(String::new()),
            inserted: Vec::new(),
            line: 1,
        }
    }

    /// Current line of the base frame, counted from 1.
    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    pub(crate) fn append(&mut self, chunk: &str) {
        let base = &mut self.base;
        if base.pos >= COMPACT_THRESHOLD && base.pos * 2 >= base.buf.len() {
            base.buf.drain(..base.pos);
            base.pos = 0;
        }
        base.buf.push_str(chunk);
    }

    pub(crate) fn insert(&mut self, text: String) {
        if !text.is_empty() {
            self.inserted.push(Frame::new(text));
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.inserted.len() + 1
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inserted.iter().all(|f| f.remaining().is_empty()) && self.base.remaining().is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.inserted.clear();
        self.base = Frame::new(String::new());
    }

    fn top(&mut self) -> Option<&mut Frame> {
        while self.inserted.last().is_some_and(|f| f.pos >= f.buf.len()) {
            self.inserted.pop();
        }
        match self.inserted.last_mut() {
            Some(frame) => Some(frame),
            None if self.base.pos < self.base.buf.len() => Some(&mut self.base),
            None => None,
        }
    }

    fn reading_base(&self) -> bool {
        self.inserted.is_empty()
    }

    /// Next character without consuming it. A CR reads as LF.
    pub(crate) fn peek(&mut self) -> Option<char> {
        loop {
            let frame = self.top()?;
            let ch = frame.remaining().chars().next()?;
            if frame.skip_lf {
                frame.skip_lf = false;
                if ch == '\n' {
                    frame.pos += 1;
                    continue;
                }
            }
            return Some(if ch == '\r' { '\n' } else { ch });
        }
    }

    /// Consume the character last returned by [`peek`](Self::peek).
    pub(crate) fn advance(&mut self) {
        let on_base = self.reading_base();
        let Some(frame) = self.top() else {
            return;
        };
        let Some(ch) = frame.remaining().chars().next() else {
            return;
        };
        frame.pos += ch.len_utf8();
        frame.skip_lf = ch == '\r';
        if on_base && matches!(ch, '\r' | '\n') {
            self.line += 1;
        }
    }

    /// Copy a run of plain text characters into `out`, stopping before `<`,
    /// `&`, CR, at the end of the current frame, or once `max` bytes are
    /// taken. Returns the number of bytes copied.
    pub(crate) fn take_text_run(&mut self, max: usize, out: &mut String) -> usize {
        let on_base = self.reading_base();
        let Some(frame) = self.top() else {
            return 0;
        };
        if frame.skip_lf {
            return 0;
        }
        let rest = frame.remaining();
        let mut end = memchr3(b'<', b'&', b'\r', rest.as_bytes()).unwrap_or(rest.len());
        if end > max {
            end = max;
            while !rest.is_char_boundary(end) {
                end -= 1;
            }
        }
        let run = &rest[..end];
        out.push_str(run);
        let newlines = if on_base {
            memchr_iter(b'\n', run.as_bytes()).count() as u32
        } else {
            0
        };
        frame.pos += end;
        self.line += newlines;
        end
    }
}
