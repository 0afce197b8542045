//! Line cursor over a patch stream.
//!
//! Header parsers never buffer the whole input. The cursor keeps a small
//! lookahead window of lines (each with its terminator) and only ever moves
//! forward one line at a time.
//!
//! Lines are read as bytes. A line that is not valid UTF-8 is decoded
//! lossily and flagged, so text the parsers never inspect (hunk bodies in
//! the lookahead) cannot fail a header parse.

use crate::error::{HeaderError, Result};
use std::collections::VecDeque;
use std::io::BufRead;

/// Number of lines visible through [`LineCursor::line`].
pub const LOOKAHEAD: usize = 3;

#[derive(Debug)]
struct Line {
    text: String,
    /// False if `text` was decoded lossily.
    utf8: bool,
}

impl Line {
    fn decode(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self { text, utf8: true },
            Err(err) => Self {
                text: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                utf8: false,
            },
        }
    }
}

/// Forward-only cursor with bounded lookahead.
#[derive(Debug)]
pub struct LineCursor<R> {
    reader: R,
    window: VecDeque<Line>,
    /// 0-based index of the current line in the stream.
    position: usize,
    exhausted: bool,
}

impl<'a> LineCursor<&'a [u8]> {
    /// Create a cursor over in-memory patch text.
    pub fn from_text(text: &'a str) -> Result<Self> {
        Self::new(text.as_bytes())
    }
}

impl<R: BufRead> LineCursor<R> {
    /// Create a cursor positioned at the first line of `reader`.
    ///
    /// Fails only if the reader fails while filling the lookahead window.
    pub fn new(reader: R) -> Result<Self> {
        let mut cursor = Self {
            reader,
            window: VecDeque::with_capacity(LOOKAHEAD),
            position: 0,
            exhausted: false,
        };
        cursor.fill()?;
        Ok(cursor)
    }

    /// Peek at the line `offset` lines ahead of the current one.
    ///
    /// Returns an empty string past the end of input or beyond the
    /// lookahead window. Undecodable bytes appear as U+FFFD.
    pub fn line(&self, offset: usize) -> &str {
        self.window
            .get(offset)
            .map(|line| line.text.as_str())
            .unwrap_or("")
    }

    /// True unless the line `offset` lines ahead contained bytes that are not
    /// valid UTF-8. Lines past the end of input count as valid.
    pub fn is_utf8(&self, offset: usize) -> bool {
        self.window.get(offset).is_none_or(|line| line.utf8)
    }

    /// Advance by one line.
    ///
    /// Returns [`HeaderError::Eof`] when no line exists at the new position,
    /// or [`HeaderError::Io`] if the reader fails.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        if self.window.pop_front().is_none() {
            return Err(HeaderError::Eof);
        }
        self.position += 1;
        self.fill()?;

        if self.window.is_empty() {
            return Err(HeaderError::Eof);
        }
        Ok(())
    }

    /// 1-based line number of the line `offset` lines ahead.
    pub fn line_number(&self, offset: usize) -> usize {
        self.position + offset + 1
    }

    /// True once the cursor has moved past the last line.
    pub fn at_end(&self) -> bool {
        self.window.is_empty()
    }

    /// Build a located parse error for the line `offset` lines ahead.
    pub fn error(&self, offset: usize, message: impl Into<String>) -> HeaderError {
        HeaderError::Parse {
            line: self.line_number(offset),
            message: message.into(),
        }
    }

    fn fill(&mut self) -> Result<()> {
        while !self.exhausted && self.window.len() < LOOKAHEAD {
            let mut bytes = Vec::new();
            if self.reader.read_until(b'\n', &mut bytes)? == 0 {
                self.exhausted = true;
            } else {
                self.window.push_back(Line::decode(bytes));
            }
        }
        Ok(())
    }
}
