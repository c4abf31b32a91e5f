//! The error taxonomy shared by [`crate::reader`] and [`crate::ordered_map`].

use std::fmt;

/// Everything that can go wrong while tokenizing or walking a map.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input violates the grammar, strict or lenient as configured.
    ///
    /// Carries the location the tokenizer had reached, rendered by
    /// [`Display`][fmt::Display] as `"{message} at line {line} column
    /// {column} path {path}"`.
    #[error("{}", SyntaxDisplay(.message, *.line, *.column, .path, *.eof))]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        path: String,
        /// Set when the malformed input was an unexpected end of input,
        /// so callers can distinguish a truncated document from other
        /// grammar violations.
        eof: bool,
    },
    /// The caller asked for something the reader isn't in a position to
    /// give: `begin_array` when the next token isn't `[`, or any operation
    /// after [`close`][crate::reader::JsonReader::close].
    #[error("{0}")]
    State(String),
    /// A numeric literal does not parse as the requested type, or the
    /// requested conversion would be lossy.
    #[error("{0}")]
    Numeric(String),
    /// Propagated unchanged from the character source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

struct SyntaxDisplay<'a>(&'a str, usize, usize, &'a str, bool);

impl fmt::Display for SyntaxDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {} column {} path {}",
            self.0, self.1, self.2, self.3
        )?;
        if self.4 {
            write!(f, " (end of input)")?;
        }
        Ok(())
    }
}

impl Error {
    /// Build a [`Error::Syntax`] at the given position.
    pub(crate) fn syntax(message: impl Into<String>, line: usize, column: usize, path: impl Into<String>) -> Self {
        Error::Syntax {
            message: message.into(),
            line,
            column,
            path: path.into(),
            eof: false,
        }
    }

    /// Like [`Error::syntax`], but flagged as an unexpected end of input.
    pub(crate) fn syntax_eof(message: impl Into<String>, line: usize, column: usize, path: impl Into<String>) -> Self {
        Error::Syntax {
            message: message.into(),
            line,
            column,
            path: path.into(),
            eof: true,
        }
    }

    /// True for [`Error::Syntax`] raised while expecting more input.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Syntax { eof: true, .. })
    }

    pub(crate) fn state(message: impl Into<String>) -> Self {
        Error::State(message.into())
    }

    pub(crate) fn numeric(message: impl Into<String>) -> Self {
        Error::Numeric(message.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_display_includes_position_and_path() {
        let err = Error::syntax("unterminated string", 3, 7, "$.a[2]");
        assert_eq!(
            err.to_string(),
            "unterminated string at line 3 column 7 path $.a[2]"
        );
        assert!(!err.is_eof());
    }

    #[test]
    fn syntax_eof_display_flags_truncation() {
        let err = Error::syntax_eof("end of input", 1, 1, "$");
        assert!(err.to_string().ends_with("(end of input)"));
        assert!(err.is_eof());
    }
}
