//! The fixed-capacity lookahead buffer and its refill contract.
//!
//! `pos` is the next unread character, `limit` is one past the last valid
//! character; the invariant `0 <= pos <= limit <= buf.len()` holds at every
//! call boundary. Nothing below allocates per character.

use crate::error::{Error, Result};
use crate::source::CharSource;

/// Outcome of trying to make `n` characters available at `pos`.
pub(super) enum Ensure {
    /// At least the requested count is now buffered at `pos`.
    Ready,
    /// The source is exhausted before the requested count was reached.
    Eof,
    /// The requested count exceeds the buffer's total capacity; it can
    /// never be satisfied no matter how much we refill.
    Full,
}

impl<S: CharSource> super::JsonReader<S> {
    /// Ensure at least `n` characters are available starting at `pos`,
    /// refilling from the source as needed.
    pub(super) fn ensure_buffered(&mut self, n: usize) -> Result<Ensure> {
        if self.limit - self.pos >= n {
            return Ok(Ensure::Ready);
        }
        if n > self.buf.len() {
            return Ok(Ensure::Full);
        }
        if self.fill_buffer(n)? {
            Ok(Ensure::Ready)
        } else {
            Ok(Ensure::Eof)
        }
    }

    /// Shift the unread region to the front of the buffer, then read from
    /// the source until at least `min` characters are available or the
    /// source is exhausted. Returns `true` on success, `false` on EOF.
    ///
    /// Any method that calls this must reload cached copies of `pos`/
    /// `limit` afterwards (both are reset here).
    pub(super) fn fill_buffer(&mut self, min: usize) -> Result<bool> {
        debug_assert!(min <= self.buf.len());

        if self.pos > 0 {
            self.line_start = self.line_start.saturating_sub(self.pos);
            self.buf.copy_within(self.pos..self.limit, 0);
            self.limit -= self.pos;
            self.pos = 0;
        }

        let source = self
            .source
            .as_mut()
            .ok_or_else(|| Error::state("JsonReader is closed"))?;

        while self.limit < min {
            let n = source.read(&mut self.buf[self.limit..])?;
            log::trace!("buffer: refilled {} characters", n);
            if n == 0 {
                return Ok(false);
            }
            self.limit += n;
        }

        Ok(true)
    }

    /// The character `offset` positions past `pos`. Caller must have
    /// already ensured it is buffered.
    pub(super) fn buf_char(&self, offset: usize) -> char {
        self.buf[self.pos + offset]
    }

    /// Copy out `len` characters starting at `pos` without advancing.
    pub(super) fn buf_slice(&self, len: usize) -> String {
        self.buf[self.pos..self.pos + len].iter().collect()
    }

    /// Advance `pos` by `n` characters already known to be buffered,
    /// tracking newlines for line/column diagnostics.
    pub(super) fn advance(&mut self, n: usize) {
        for i in 0..n {
            if self.buf[self.pos + i] == '\n' {
                self.line_number += 1;
                self.line_start = self.pos + i + 1;
            }
        }
        self.pos += n;
    }

    /// Pull and consume the next character, refilling as needed. `None` at
    /// end of input.
    pub(super) fn read_char(&mut self) -> Result<Option<char>> {
        match self.ensure_buffered(1)? {
            Ensure::Ready => {
                let c = self.buf_char(0);
                self.advance(1);
                Ok(Some(c))
            }
            Ensure::Eof | Ensure::Full => Ok(None),
        }
    }

    /// Look at the next character without consuming it.
    pub(super) fn peek_char(&mut self) -> Result<Option<char>> {
        match self.ensure_buffered(1)? {
            Ensure::Ready => Ok(Some(self.buf_char(0))),
            Ensure::Eof | Ensure::Full => Ok(None),
        }
    }

    /// Un-read the last consumed character (single-character pushback).
    ///
    /// # Panics
    ///
    /// Panics if `pos` is already `0`; callers only ever call this
    /// immediately after consuming at least one character.
    pub(super) fn unread(&mut self) {
        assert!(self.pos > 0, "nothing to unread");
        self.pos -= 1;
        if self.buf[self.pos] == '\n' {
            self.line_number -= 1;
        }
    }

    pub(super) fn current_line(&self) -> usize {
        self.line_number + 1
    }

    pub(super) fn current_column(&self) -> usize {
        self.pos - self.line_start + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::JsonReader;
    use crate::source::StrSource;

    #[test]
    fn fill_buffer_shifts_unread_region() {
        let mut r = JsonReader::new(StrSource::new("abcdef"));
        assert_eq!(r.read_char().unwrap(), Some('a'));
        assert_eq!(r.read_char().unwrap(), Some('b'));
        // force a refill with pos > 0 already
        r.fill_buffer(1).unwrap();
        assert_eq!(r.pos, 0);
        assert_eq!(r.buf_char(0), 'c');
    }

    #[test]
    fn unread_restores_line_number() {
        let mut r = JsonReader::new(StrSource::new("a\nb"));
        r.read_char().unwrap();
        r.read_char().unwrap();
        assert_eq!(r.line_number, 1);
        r.unread();
        assert_eq!(r.line_number, 0);
    }
}
