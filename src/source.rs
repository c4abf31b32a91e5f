//! A character-producing source, the only I/O boundary [`crate::reader`]
//! depends on.
//!
//! The tokenizer never reasons about bytes, encodings, or files directly; it
//! pulls `char`s from whatever implements [`CharSource`]. This keeps the
//! state machine in `reader/` free of I/O concerns and lets tests feed it
//! straight from a `&str` with no allocation at all.

use std::io::{self, Read};

/// A blocking, character-producing input.
///
/// `read` fills as much of `buf` as is available and returns the number of
/// `char`s written, or `0` for end of input, the same convention
/// [`std::io::Read`] uses for bytes, rather than a `-1` sentinel.
pub trait CharSource {
    /// Fill `buf` with the next characters, returning how many were
    /// written. Returns `Ok(0)` only at end of input; a source that merely
    /// has nothing ready yet should block until it does.
    fn read(&mut self, buf: &mut [char]) -> io::Result<usize>;
}

/// An in-memory, zero-I/O source over a `&str`.
pub struct StrSource<'a> {
    chars: std::str::Chars<'a>,
}

impl<'a> StrSource<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        StrSource {
            chars: input.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn read(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.chars.next() {
                Some(c) => {
                    *slot = c;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }
}

/// A UTF-8 decoding adapter over any [`std::io::Read`] byte stream.
///
/// Bytes are buffered internally and decoded incrementally; a byte sequence
/// that is invalid UTF-8 surfaces as an [`io::Error`] of kind
/// [`io::ErrorKind::InvalidData`].
pub struct ReadSource<R> {
    inner: R,
    // Leftover bytes that did not yet form a complete `char`.
    pending: Vec<u8>,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        ReadSource {
            inner,
            pending: Vec::new(),
        }
    }

    fn utf8_len(first_byte: u8) -> usize {
        if first_byte & 0x80 == 0 {
            1
        } else if first_byte & 0xE0 == 0xC0 {
            2
        } else if first_byte & 0xF0 == 0xE0 {
            3
        } else {
            4
        }
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn read(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut count = 0;
        let mut raw = [0u8; 1];

        while count < buf.len() {
            // Pull bytes one at a time until `pending` holds a full sequence.
            loop {
                if !self.pending.is_empty() && self.pending.len() >= Self::utf8_len(self.pending[0]) {
                    break;
                }
                let read = self.inner.read(&mut raw)?;
                if read == 0 {
                    if self.pending.is_empty() {
                        return Ok(count);
                    }
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "truncated UTF-8 sequence",
                    ));
                }
                self.pending.push(raw[0]);
            }

            match std::str::from_utf8(&self.pending) {
                Ok(s) => {
                    buf[count] = s.chars().next().expect("non-empty decode");
                    count += 1;
                    self.pending.clear();
                }
                Err(_) => {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, "invalid UTF-8"));
                }
            }
        }

        Ok(count)
    }
}
