//! The value-dispatch state machine: `do_peek()` turns the current scope
//! and the next non-whitespace character(s) into a [`TokenKind`], plus the
//! whitespace/comment skipper and keyword matcher it depends on.

use crate::error::{Error, Result};
use crate::source::CharSource;
use crate::token::{ScopeState, TokenKind};

use super::buffer::Ensure;
use super::number::NumberPeek;
use super::string::terminates_literal;

/// A character that may continue an unquoted literal or name.
fn is_literal(c: char) -> bool {
    !terminates_literal(c)
}

impl<S: CharSource> super::JsonReader<S> {
    pub(super) fn check_lenient(&self) -> Result<()> {
        if self.is_lenient() {
            Ok(())
        } else {
            Err(self.syntax_err("use set_lenient(true) to accept malformed JSON"))
        }
    }

    /// Classify the next token. Mirrors the per-scope dispatch described in
    /// the module documentation: a setup step that consumes any
    /// separator/colon/prefix the current scope expects, followed by a
    /// shared value dispatch.
    pub(super) fn do_peek(&mut self) -> Result<TokenKind> {
        let scope_state = self.scope.top();

        match scope_state {
            ScopeState::Closed => return Err(Error::state("JsonReader is closed")),
            ScopeState::EmptyArray => {
                self.scope.set_top(ScopeState::NonemptyArray);
            }
            ScopeState::NonemptyArray => match self.next_non_whitespace()? {
                Some(']') => return self.set_peeked(TokenKind::EndArray),
                Some(';') => self.check_lenient()?,
                Some(',') => {}
                _ => return Err(self.syntax_err("unterminated array")),
            },
            ScopeState::EmptyObject | ScopeState::NonemptyObject => {
                let was_nonempty = scope_state == ScopeState::NonemptyObject;
                self.scope.set_top(ScopeState::DanglingName);
                if was_nonempty {
                    match self.next_non_whitespace()? {
                        Some('}') => return self.set_peeked(TokenKind::EndObject),
                        Some(';') => self.check_lenient()?,
                        Some(',') => {}
                        _ => return Err(self.syntax_err("unterminated object")),
                    }
                }
                match self.next_non_whitespace()? {
                    Some('"') => return self.set_peeked(TokenKind::DoubleQuotedName),
                    Some('\'') => {
                        self.check_lenient()?;
                        return self.set_peeked(TokenKind::SingleQuotedName);
                    }
                    Some('}') => {
                        if !was_nonempty {
                            return self.set_peeked(TokenKind::EndObject);
                        }
                        return Err(self.syntax_err("expected a name"));
                    }
                    Some(c) => {
                        self.check_lenient()?;
                        self.unread();
                        if is_literal(c) {
                            return self.set_peeked(TokenKind::UnquotedName);
                        }
                        return Err(self.syntax_err("expected a name"));
                    }
                    None => return Err(self.eof_err("expected a name")),
                }
            }
            ScopeState::DanglingName => {
                self.scope.set_top(ScopeState::NonemptyObject);
                match self.next_non_whitespace()? {
                    Some(':') => {}
                    Some('=') => {
                        self.check_lenient()?;
                        if self.peek_char()? == Some('>') {
                            self.read_char()?;
                        }
                    }
                    _ => return Err(self.syntax_err("expected ':'")),
                }
            }
            ScopeState::EmptyDocument => {
                self.skip_bom()?;
                if self.is_lenient() {
                    self.consume_non_execute_prefix()?;
                }
                self.scope.set_top(ScopeState::NonemptyDocument);
            }
            ScopeState::NonemptyDocument => match self.next_non_whitespace()? {
                None => return self.set_peeked(TokenKind::Eof),
                Some(_) => {
                    self.check_lenient()?;
                    self.unread();
                }
            },
        }

        match self.next_non_whitespace()? {
            Some(']') if scope_state == ScopeState::EmptyArray => {
                return self.set_peeked(TokenKind::EndArray);
            }
            Some(']') | Some(';') | Some(',') => {
                if matches!(scope_state, ScopeState::EmptyArray | ScopeState::NonemptyArray) {
                    self.check_lenient()?;
                    self.unread();
                    return self.set_peeked(TokenKind::Null);
                }
                return Err(self.syntax_err("unexpected value"));
            }
            Some('\'') => {
                self.check_lenient()?;
                return self.set_peeked(TokenKind::SingleQuoted);
            }
            Some('"') => return self.set_peeked(TokenKind::DoubleQuoted),
            Some('[') => return self.set_peeked(TokenKind::BeginArray),
            Some('{') => return self.set_peeked(TokenKind::BeginObject),
            Some(_) => self.unread(),
            None => {}
        }

        if let Some(kind) = self.peek_keyword()? {
            return self.set_peeked(kind);
        }
        match self.peek_number()? {
            NumberPeek::Long(value, len) => {
                self.advance(len);
                self.peeked_long = value;
                return self.set_peeked(TokenKind::Long);
            }
            NumberPeek::Number(len) => {
                self.peeked_number_length = len;
                return self.set_peeked(TokenKind::Number);
            }
            NumberPeek::None => {}
        }

        match self.peek_char()? {
            Some(c) if is_literal(c) => {
                self.check_lenient()?;
                self.set_peeked(TokenKind::Unquoted)
            }
            other => {
                let message = format!(
                    "expected a value but found {}",
                    crate::util::char::format_opt(other)
                );
                if other.is_none() {
                    Err(self.eof_err(message))
                } else {
                    Err(self.syntax_err(message))
                }
            }
        }
    }

    /// Consume and discard whitespace and (lenient-only) comments, then
    /// return the next real character, or `None` at end of input.
    fn next_non_whitespace(&mut self) -> Result<Option<char>> {
        loop {
            let c = match self.read_char()? {
                None => return Ok(None),
                Some(c) => c,
            };
            match c {
                ' ' | '\t' | '\r' | '\n' | '\x0c' => continue,
                '/' if self.is_lenient() => match self.peek_char()? {
                    Some('*') => {
                        self.read_char()?;
                        self.skip_block_comment()?;
                    }
                    Some('/') => {
                        self.read_char()?;
                        self.skip_line_comment()?;
                    }
                    _ => return Ok(Some(c)),
                },
                '#' if self.is_lenient() => {
                    self.skip_line_comment()?;
                }
                other => return Ok(Some(other)),
            }
        }
    }

    fn skip_line_comment(&mut self) -> Result<()> {
        loop {
            match self.read_char()? {
                None | Some('\n') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        loop {
            match self.read_char()? {
                None => return Err(self.eof_err("unterminated comment")),
                Some('*') if self.peek_char()? == Some('/') => {
                    self.read_char()?;
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    /// Silently strip a leading byte-order mark. Runs once, at the very
    /// start of the document, in both strict and lenient mode.
    fn skip_bom(&mut self) -> Result<()> {
        if let Ensure::Ready = self.ensure_buffered(1)? {
            if self.buf_char(0) == '\u{feff}' {
                self.advance(1);
            }
        }
        Ok(())
    }

    /// Silently strip the `)]}'\n` prefix some services prepend to JSON
    /// responses to defeat `<script>` inclusion. Lenient-only, and only at
    /// the very start of the document.
    fn consume_non_execute_prefix(&mut self) -> Result<()> {
        const PREFIX: [char; 5] = [')', ']', '}', '\'', '\n'];
        if !self.at_start {
            return Ok(());
        }
        self.at_start = false;
        if let Ensure::Ready = self.ensure_buffered(PREFIX.len())? {
            if (0..PREFIX.len()).all(|i| self.buf_char(i) == PREFIX[i]) {
                self.advance(PREFIX.len());
            }
        }
        Ok(())
    }

    /// Match `true`/`false`/`null` (any-case variant, lenient-only unless
    /// the casing is exact), rejecting a prefix match that's actually the
    /// start of a longer unquoted literal.
    fn peek_keyword(&mut self) -> Result<Option<TokenKind>> {
        let c0 = match self.peek_char()? {
            Some(c) => c,
            None => return Ok(None),
        };
        let (keyword, kind) = match c0.to_ascii_lowercase() {
            't' => ("true", TokenKind::True),
            'f' => ("false", TokenKind::False),
            'n' => ("null", TokenKind::Null),
            _ => return Ok(None),
        };

        let len = keyword.len();
        match self.ensure_buffered(len)? {
            Ensure::Ready => {}
            Ensure::Eof | Ensure::Full => return Ok(None),
        }

        let mut exact = true;
        for (i, expected) in keyword.chars().enumerate() {
            let c = self.buf_char(i);
            if c == expected {
                continue;
            }
            if c.to_ascii_lowercase() == expected {
                exact = false;
                continue;
            }
            return Ok(None);
        }

        let follows_literal = match self.ensure_buffered(len + 1)? {
            Ensure::Ready => is_literal(self.buf_char(len)),
            Ensure::Eof | Ensure::Full => false,
        };
        if follows_literal {
            return Ok(None);
        }

        if !exact {
            self.check_lenient()?;
        }
        self.advance(len);
        Ok(Some(kind))
    }
}

#[cfg(test)]
mod tests {
    use crate::reader::JsonReader;
    use crate::source::StrSource;
    use crate::token::TokenKind;

    #[test]
    fn strict_mode_rejects_unquoted_literal() {
        let mut r = JsonReader::new(StrSource::new("abc"));
        assert!(r.peek().is_err());
    }

    #[test]
    fn lenient_mode_accepts_comments_and_trailing_comma() {
        let mut r = JsonReader::new(StrSource::new("[1, 2, /* trailing */]"));
        r.set_lenient(true);
        r.begin_array().unwrap();
        assert_eq!(r.next_i32().unwrap(), 1);
        assert_eq!(r.next_i32().unwrap(), 2);
        r.end_array().unwrap();
    }

    #[test]
    fn lenient_mode_skips_non_execute_prefix() {
        let mut r = JsonReader::new(StrSource::new(")]}'\n[1]"));
        r.set_lenient(true);
        r.begin_array().unwrap();
        assert_eq!(r.next_i32().unwrap(), 1);
        r.end_array().unwrap();
    }

    #[test]
    fn object_with_unquoted_lenient_name() {
        let mut r = JsonReader::new(StrSource::new("{a:1}"));
        r.set_lenient(true);
        r.begin_object().unwrap();
        assert_eq!(r.next_name().unwrap(), "a");
        assert_eq!(r.next_i32().unwrap(), 1);
        r.end_object().unwrap();
    }

    #[test]
    fn lenient_bare_comma_is_null() {
        let mut r = JsonReader::new(StrSource::new("[1,,3]"));
        r.set_lenient(true);
        r.begin_array().unwrap();
        assert_eq!(r.next_i32().unwrap(), 1);
        assert_eq!(r.peek().unwrap(), TokenKind::Null);
        r.next_null().unwrap();
        assert_eq!(r.next_i32().unwrap(), 3);
        r.end_array().unwrap();
    }

    #[test]
    fn uppercase_keyword_requires_lenient() {
        let mut r = JsonReader::new(StrSource::new("TRUE"));
        assert!(r.peek().is_err());
        let mut r2 = JsonReader::new(StrSource::new("TRUE"));
        r2.set_lenient(true);
        assert_eq!(r2.peek().unwrap(), TokenKind::True);
    }

    #[test]
    fn bom_is_silently_consumed_even_in_strict_mode() {
        let mut r = JsonReader::new(StrSource::new("\u{feff}[1]"));
        r.begin_array().unwrap();
        assert_eq!(r.next_i32().unwrap(), 1);
        r.end_array().unwrap();
    }

    #[test]
    fn keyword_prefix_of_longer_literal_is_not_a_keyword() {
        let mut r = JsonReader::new(StrSource::new("nullable"));
        r.set_lenient(true);
        assert_eq!(r.peek().unwrap(), TokenKind::Unquoted);
        assert_eq!(r.next_string().unwrap(), "nullable");
    }
}
