//! A pull-based streaming JSON tokenizer.
//!
//! [`JsonReader`] pulls [`char`]s from a [`CharSource`][crate::source::CharSource]
//! through a fixed-capacity lookahead buffer. It never allocates per
//! character; the only allocations it performs are the occasional owned
//! `String` for a decoded field name or string value, and the path string
//! returned by [`JsonReader::path`].
//!
//! The public surface splits into two halves, mirroring how a cursor works:
//! *peek*, which classifies the next token without consuming it, and
//! *consume* (`begin_array`, `next_string`, …), which asserts the peeked
//! kind and advances past it. `peek()` is idempotent: calling it twice in a
//! row without an intervening consume returns the same [`TokenKind`].

mod buffer;
mod lexical;
mod number;
mod scope;
mod string;

use crate::error::{Error, Result};
use crate::source::CharSource;
use crate::token::{ScopeState, TokenKind};
use scope::ScopeStack;

/// Smallest permitted lookahead buffer: large enough to hold the longest
/// number literal reportable without falling back to a growing string.
pub const MIN_BUFFER_SIZE: usize = 1024;

/// A pull-based, peekable JSON token stream over a [`CharSource`].
pub struct JsonReader<S> {
    source: Option<S>,
    buf: Box<[char]>,
    pos: usize,
    limit: usize,
    lenient: bool,
    line_number: usize,
    line_start: usize,
    at_start: bool,
    peeked: TokenKind,
    peeked_long: i64,
    peeked_number_length: usize,
    scope: ScopeStack,
}

impl<S: CharSource> JsonReader<S> {
    /// Create a reader with the default (1024-character) lookahead buffer.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, MIN_BUFFER_SIZE)
    }

    /// Create a reader whose lookahead buffer holds `capacity` characters.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is smaller than [`MIN_BUFFER_SIZE`].
    #[must_use]
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        assert!(
            capacity >= MIN_BUFFER_SIZE,
            "JsonReader buffer capacity must be at least {MIN_BUFFER_SIZE}"
        );
        JsonReader {
            source: Some(source),
            buf: vec!['\0'; capacity].into_boxed_slice(),
            pos: 0,
            limit: 0,
            lenient: false,
            line_number: 0,
            line_start: 0,
            at_start: true,
            peeked: TokenKind::None,
            peeked_long: 0,
            peeked_number_length: 0,
            scope: ScopeStack::new(),
        }
    }

    /// Toggle the lenient superset described in the crate documentation.
    pub fn set_lenient(&mut self, lenient: bool) {
        self.lenient = lenient;
    }

    #[must_use]
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// The JSONPath-like trace of the current location, e.g. `$.a.b[1]`.
    #[must_use]
    pub fn path(&self) -> String {
        self.scope.path()
    }

    /// Force the reader closed. Any later operation fails with
    /// [`Error::State`].
    pub fn close(&mut self) -> Result<()> {
        self.peeked = TokenKind::None;
        self.scope.close();
        self.source = None;
        Ok(())
    }

    fn check_open(&self) -> Result<()> {
        if self.scope.top() == ScopeState::Closed {
            Err(Error::state("JsonReader is closed"))
        } else {
            Ok(())
        }
    }

    /// A syntax error at the reader's current position.
    pub(super) fn syntax_err(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.current_line(), self.current_column(), self.path())
    }

    /// Like [`Self::syntax_err`], flagged as an unexpected end of input.
    pub(super) fn eof_err(&self, message: impl Into<String>) -> Error {
        Error::syntax_eof(message, self.current_line(), self.current_column(), self.path())
    }

    /// Classify the next token without consuming it. Idempotent.
    pub fn peek(&mut self) -> Result<TokenKind> {
        self.check_open()?;
        if self.peeked != TokenKind::None {
            return Ok(self.peeked);
        }
        self.do_peek()
    }

    fn set_peeked(&mut self, kind: TokenKind) -> Result<TokenKind> {
        self.peeked = kind;
        Ok(kind)
    }

    fn require(&mut self, expected: TokenKind, what: &str) -> Result<()> {
        let actual = self.peek()?;
        if actual == expected {
            Ok(())
        } else {
            Err(Error::state(format!(
                "expected {what} but was {actual:?} at {}",
                self.path()
            )))
        }
    }

    pub fn begin_array(&mut self) -> Result<()> {
        self.require(TokenKind::BeginArray, "BEGIN_ARRAY")?;
        self.scope.push(ScopeState::EmptyArray);
        self.scope.init_array_index();
        self.peeked = TokenKind::None;
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.require(TokenKind::EndArray, "END_ARRAY")?;
        self.scope.pop();
        self.peeked = TokenKind::None;
        Ok(())
    }

    pub fn begin_object(&mut self) -> Result<()> {
        self.require(TokenKind::BeginObject, "BEGIN_OBJECT")?;
        self.scope.push(ScopeState::EmptyObject);
        self.peeked = TokenKind::None;
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.require(TokenKind::EndObject, "END_OBJECT")?;
        self.scope.pop();
        self.peeked = TokenKind::None;
        Ok(())
    }

    /// True iff the next token is not the terminating `]`/`}` of the
    /// current container.
    pub fn has_next(&mut self) -> Result<bool> {
        let kind = self.peek()?;
        Ok(kind != TokenKind::EndArray && kind != TokenKind::EndObject)
    }

    /// Consume an object field name.
    pub fn next_name(&mut self) -> Result<String> {
        let kind = self.peek()?;
        let name = match kind {
            TokenKind::DoubleQuotedName => self.read_quoted_string('"')?,
            TokenKind::SingleQuotedName => self.read_quoted_string('\'')?,
            TokenKind::UnquotedName => self.read_unquoted_literal()?,
            other => {
                return Err(Error::state(format!(
                    "expected a name but was {other:?} at {}",
                    self.path()
                )))
            }
        };
        self.peeked = TokenKind::None;
        self.scope.set_name(name.clone());
        Ok(name)
    }

    /// Return the textual form of whatever scalar is peeked, without
    /// touching bookkeeping (`peeked`/scope index); callers finish up.
    fn consume_scalar_text(&mut self, kind: TokenKind) -> Result<String> {
        match kind {
            TokenKind::DoubleQuoted => self.read_quoted_string('"'),
            TokenKind::SingleQuoted => self.read_quoted_string('\''),
            TokenKind::Unquoted => self.read_unquoted_literal(),
            TokenKind::Long => Ok(self.peeked_long.to_string()),
            TokenKind::Number => {
                let len = self.peeked_number_length;
                let text: String = self.buf_slice(len);
                self.advance(len);
                Ok(text)
            }
            other => Err(Error::state(format!(
                "expected a value but was {other:?} at {}",
                self.path()
            ))),
        }
    }

    /// Consume a string value, or the textual form of a number.
    pub fn next_string(&mut self) -> Result<String> {
        let kind = self.peek()?;
        match kind {
            TokenKind::DoubleQuoted
            | TokenKind::SingleQuoted
            | TokenKind::Unquoted
            | TokenKind::Long
            | TokenKind::Number => {
                let text = self.consume_scalar_text(kind)?;
                self.peeked = TokenKind::None;
                self.scope.advance_index();
                Ok(text)
            }
            other => Err(Error::state(format!(
                "expected a string but was {other:?} at {}",
                self.path()
            ))),
        }
    }

    pub fn next_bool(&mut self) -> Result<bool> {
        let kind = self.peek()?;
        let value = match kind {
            TokenKind::True => true,
            TokenKind::False => false,
            other => {
                return Err(Error::state(format!(
                    "expected a boolean but was {other:?} at {}",
                    self.path()
                )))
            }
        };
        self.peeked = TokenKind::None;
        self.scope.advance_index();
        Ok(value)
    }

    pub fn next_null(&mut self) -> Result<()> {
        self.require(TokenKind::Null, "NULL")?;
        self.peeked = TokenKind::None;
        self.scope.advance_index();
        Ok(())
    }

    pub fn next_long(&mut self) -> Result<i64> {
        let kind = self.peek()?;
        let result = match kind {
            TokenKind::Long => {
                let v = self.peeked_long;
                self.peeked = TokenKind::None;
                Ok(v)
            }
            TokenKind::Number
            | TokenKind::DoubleQuoted
            | TokenKind::SingleQuoted
            | TokenKind::Unquoted => {
                let text = self.consume_scalar_text(kind)?;
                self.peeked = TokenKind::None;
                parse_long(&text)
            }
            other => Err(Error::state(format!(
                "expected a long but was {other:?} at {}",
                self.path()
            ))),
        };
        if result.is_ok() {
            self.scope.advance_index();
        }
        result
    }

    pub fn next_i32(&mut self) -> Result<i32> {
        let value = self.peek_numeric_text()?;
        match value {
            NumericSource::CachedLong(v) => {
                self.peeked = TokenKind::None;
                let result = i32::try_from(v).map_err(|_| {
                    Error::numeric(format!("{v} does not fit in a 32-bit integer"))
                });
                if result.is_ok() {
                    self.scope.advance_index();
                }
                result
            }
            NumericSource::Text(text) => {
                self.peeked = TokenKind::None;
                let result = parse_i32(&text);
                if result.is_ok() {
                    self.scope.advance_index();
                }
                result
            }
        }
    }

    pub fn next_f64(&mut self) -> Result<f64> {
        let value = self.peek_numeric_text()?;
        let (text, cached) = match value {
            NumericSource::CachedLong(v) => (v.to_string(), Some(v)),
            NumericSource::Text(t) => (t, None),
        };
        self.peeked = TokenKind::None;
        let parsed: f64 = text
            .parse()
            .map_err(|_| Error::numeric(format!("not a double: {text}")))?;
        if cached.is_none() && !self.lenient && (parsed.is_nan() || parsed.is_infinite()) {
            return Err(Error::numeric(format!(
                "JSON forbids NaN and infinities: {text}"
            )));
        }
        self.scope.advance_index();
        Ok(parsed)
    }

    fn peek_numeric_text(&mut self) -> Result<NumericSource> {
        let kind = self.peek()?;
        match kind {
            TokenKind::Long => Ok(NumericSource::CachedLong(self.peeked_long)),
            TokenKind::Number
            | TokenKind::DoubleQuoted
            | TokenKind::SingleQuoted
            | TokenKind::Unquoted => Ok(NumericSource::Text(self.consume_scalar_text(kind)?)),
            other => Err(Error::state(format!(
                "expected a number but was {other:?} at {}",
                self.path()
            ))),
        }
    }

    /// Consume the next value, recursively descending into arrays and
    /// objects. Leaves the path name at the current depth overwritten with
    /// the literal string `"null"` and its index incremented, per the
    /// original implementation's documented behavior.
    pub fn skip_value(&mut self) -> Result<()> {
        let mut depth: i32 = 0;
        loop {
            match self.peek()? {
                TokenKind::BeginArray => {
                    self.begin_array()?;
                    depth += 1;
                }
                TokenKind::BeginObject => {
                    self.begin_object()?;
                    depth += 1;
                }
                TokenKind::EndArray => {
                    self.end_array()?;
                    depth -= 1;
                }
                TokenKind::EndObject => {
                    self.end_object()?;
                    depth -= 1;
                }
                TokenKind::Eof => {
                    return Err(Error::syntax_eof(
                        "unexpected end of input while skipping a value",
                        self.current_line(),
                        self.current_column(),
                        self.path(),
                    ));
                }
                TokenKind::DoubleQuotedName | TokenKind::SingleQuotedName | TokenKind::UnquotedName => {
                    self.next_name()?;
                }
                TokenKind::True | TokenKind::False => {
                    self.next_bool()?;
                }
                TokenKind::Null => {
                    self.next_null()?;
                }
                TokenKind::DoubleQuoted
                | TokenKind::SingleQuoted
                | TokenKind::Unquoted
                | TokenKind::Long
                | TokenKind::Number => {
                    self.next_string()?;
                }
                TokenKind::None => unreachable!("peek() never leaves peeked as None"),
            }
            if depth == 0 {
                break;
            }
        }
        self.scope.mark_skipped();
        Ok(())
    }

}

enum NumericSource {
    CachedLong(i64),
    Text(String),
}

fn parse_long(text: &str) -> Result<i64> {
    if let Ok(v) = text.parse::<i64>() {
        return Ok(v);
    }
    let d: f64 = text
        .parse()
        .map_err(|_| Error::numeric(format!("not a long: {text}")))?;
    let v = d as i64;
    #[allow(clippy::float_cmp)]
    if (v as f64) == d {
        Ok(v)
    } else {
        Err(Error::numeric(format!("{text} is not losslessly a long")))
    }
}

fn parse_i32(text: &str) -> Result<i32> {
    if let Ok(v) = text.parse::<i32>() {
        return Ok(v);
    }
    let d: f64 = text
        .parse()
        .map_err(|_| Error::numeric(format!("not an int: {text}")))?;
    let v = d as i32;
    #[allow(clippy::float_cmp)]
    if (v as f64) == d {
        Ok(v)
    } else {
        Err(Error::numeric(format!("{text} is not losslessly an int")))
    }
}
