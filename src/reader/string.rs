//! Quoted and unquoted literal decoding.
//!
//! Both scanners take a fast path: as long as no escape is seen, the
//! decoded value is a single slice of the lookahead buffer and no `String`
//! is allocated beyond the final copy. An escape (or a run longer than the
//! buffer) switches to an accumulating `String`.

use crate::error::Result;
use crate::source::CharSource;

use super::buffer::Ensure;

/// Characters that end an unquoted literal or a bare number, in both
/// strict and lenient mode.
pub(super) fn terminates_literal(c: char) -> bool {
    matches!(
        c,
        '/' | '\\' | ';' | '#' | '=' | '{' | '}' | '[' | ']' | ':' | ',' | ' ' | '\t' | '\x0c' | '\r' | '\n'
    )
}

impl<S: CharSource> super::JsonReader<S> {
    /// Decode a `"`- or `'`-quoted string, consuming through the closing
    /// quote.
    pub(super) fn read_quoted_string(&mut self, quote: char) -> Result<String> {
        let mut builder = String::new();
        let mut has_builder = false;
        let mut p = 0usize;

        loop {
            match self.ensure_buffered(p + 1)? {
                Ensure::Ready => {}
                Ensure::Eof => return Err(self.eof_err("unterminated string")),
                Ensure::Full => {
                    let avail = self.buffered_len();
                    let chunk = self.buf_slice(avail);
                    self.advance(avail);
                    builder.push_str(&chunk);
                    has_builder = true;
                    p = 0;
                    continue;
                }
            }

            let c = self.buf_char(p);
            if c == quote {
                let chunk = self.buf_slice(p);
                self.advance(p + 1);
                return Ok(if has_builder {
                    builder.push_str(&chunk);
                    builder
                } else {
                    chunk
                });
            }
            if c == '\\' {
                let chunk = self.buf_slice(p);
                self.advance(p + 1);
                builder.push_str(&chunk);
                has_builder = true;
                let escaped = self.read_escape_char()?;
                builder.push(escaped);
                p = 0;
                continue;
            }
            if !self.is_lenient() && (c as u32) < 0x20 {
                return Err(self.syntax_err(format!(
                    "unescaped control character {} in string",
                    crate::util::char::format(c)
                )));
            }
            p += 1;
        }
    }

    /// Decode a bare (unquoted) literal up to the next terminator
    /// character, per [`terminates_literal`].
    pub(super) fn read_unquoted_literal(&mut self) -> Result<String> {
        let mut builder = String::new();
        let mut has_builder = false;
        let mut p = 0usize;

        loop {
            match self.ensure_buffered(p + 1)? {
                Ensure::Ready => {}
                Ensure::Eof => {
                    let chunk = self.buf_slice(p);
                    self.advance(p);
                    return Ok(if has_builder {
                        builder.push_str(&chunk);
                        builder
                    } else {
                        chunk
                    });
                }
                Ensure::Full => {
                    let avail = self.buffered_len();
                    let chunk = self.buf_slice(avail);
                    self.advance(avail);
                    builder.push_str(&chunk);
                    has_builder = true;
                    p = 0;
                    continue;
                }
            }

            let c = self.buf_char(p);
            if terminates_literal(c) {
                let chunk = self.buf_slice(p);
                self.advance(p);
                return Ok(if has_builder {
                    builder.push_str(&chunk);
                    builder
                } else {
                    chunk
                });
            }
            p += 1;
        }
    }

    /// Decode the character (or surrogate pair) following a consumed `\`.
    fn read_escape_char(&mut self) -> Result<char> {
        let c = self
            .read_char()?
            .ok_or_else(|| self.eof_err("unterminated escape sequence"))?;
        match c {
            'u' => self.read_unicode_escape(),
            't' => Ok('\t'),
            'b' => Ok('\u{8}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            'f' => Ok('\u{c}'),
            '\n' => Ok('\n'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            other if self.is_lenient() => Ok(other),
            other => Err(self.syntax_err(format!(
                "invalid escape sequence \\{}",
                crate::util::char::format(other)
            ))),
        }
    }

    /// Decode a `\uXXXX` escape, combining it with a following `\uXXXX`
    /// low surrogate when the first unit is a high surrogate.
    fn read_unicode_escape(&mut self) -> Result<char> {
        let high = self.read_hex4()?;
        if !(0xd800..=0xdbff).contains(&high) {
            return char::from_u32(high)
                .ok_or_else(|| self.syntax_err(format!("invalid unicode escape \\u{high:04x}")));
        }

        let has_pair = match self.ensure_buffered(2)? {
            Ensure::Ready => self.buf_char(0) == '\\' && self.buf_char(1) == 'u',
            Ensure::Eof | Ensure::Full => false,
        };
        if has_pair {
            self.advance(2);
            let low = self.read_hex4()?;
            if (0xdc00..=0xdfff).contains(&low) {
                let combined = 0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00);
                return char::from_u32(combined)
                    .ok_or_else(|| self.syntax_err("invalid surrogate pair"));
            }
        }

        if self.is_lenient() {
            Ok('\u{fffd}')
        } else {
            Err(self.syntax_err(format!("unpaired surrogate \\u{high:04x}")))
        }
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            let c = self
                .read_char()?
                .ok_or_else(|| self.eof_err("unterminated unicode escape"))?;
            let digit = c.to_digit(16).ok_or_else(|| {
                self.syntax_err(format!(
                    "invalid hex digit {} in unicode escape",
                    crate::util::char::format(c)
                ))
            })?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn buffered_len(&self) -> usize {
        self.limit - self.pos
    }
}

#[cfg(test)]
mod tests {
    use crate::reader::JsonReader;
    use crate::source::StrSource;

    #[test]
    fn plain_string_takes_fast_path() {
        let mut r = JsonReader::new(StrSource::new(r#""hello""#));
        assert_eq!(r.next_string().unwrap(), "hello");
    }

    #[test]
    fn escapes_decode_common_sequences() {
        let mut r = JsonReader::new(StrSource::new(r#""a\tb\nc\"d""#));
        assert_eq!(r.next_string().unwrap(), "a\tb\nc\"d");
    }

    #[test]
    fn unicode_escape_decodes_bmp_codepoint() {
        let mut r = JsonReader::new(StrSource::new(r#""é""#));
        assert_eq!(r.next_string().unwrap(), "\u{e9}");
    }

    #[test]
    fn surrogate_pair_combines_into_supplementary_codepoint() {
        let mut r = JsonReader::new(StrSource::new(r#""😀""#));
        assert_eq!(r.next_string().unwrap(), "\u{1f600}");
    }

    #[test]
    fn single_quoted_string_is_lenient_only() {
        let mut r = JsonReader::new(StrSource::new("'abc'"));
        r.set_lenient(true);
        assert_eq!(r.next_string().unwrap(), "abc");
    }

    #[test]
    fn unescaped_control_character_is_rejected_in_strict_mode() {
        let mut r = JsonReader::new(StrSource::new("\"a\u{1}b\""));
        assert!(r.next_string().is_err());
    }
}
