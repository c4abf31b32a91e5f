//! The number-peek DFA: scans forward from `pos` without advancing it,
//! classifying the upcoming literal as a cacheable [`i64`] or a plain
//! character span, while never allocating.

use crate::error::Result;
use crate::reader::buffer::Ensure;
use crate::source::CharSource;

use super::string::terminates_literal;

/// The smallest `value` a running negative accumulator can hold before the
/// next digit would push it past `i64::MIN`.
const MIN_INCOMPLETE_INTEGER: i64 = i64::MIN / 10;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Sign,
    Digit,
    Decimal,
    FractionDigit,
    ExpE,
    ExpSign,
    ExpDigit,
}

/// Result of scanning a candidate number literal.
pub(super) enum NumberPeek {
    /// Fits in the buffer and in an `i64`; already converted. The caller
    /// advances past its `usize` character length immediately, since
    /// nothing is left to re-scan later.
    Long(i64, usize),
    /// Fits in the buffer but needs external parsing (too big for `i64`,
    /// or has a fraction/exponent); `usize` is its length in characters.
    /// Left unconsumed in the buffer until the value is actually read.
    Number(usize),
    /// Not a number at all, or longer than the buffer can hold in one
    /// window. The caller falls back to the lenient unquoted-literal path.
    None,
}

impl<S: CharSource> super::JsonReader<S> {
    /// Scan a candidate number starting at `pos`, without consuming.
    pub(super) fn peek_number(&mut self) -> Result<NumberPeek> {
        let mut state = State::None;
        // A running *negative* total: admits `i64::MIN` without a special
        // case, since its magnitude has no positive counterpart.
        let mut value: i64 = 0;
        let mut negative = false;
        let mut fits_in_long = true;
        let mut leading_zero = false;
        let mut i: usize = 0;

        loop {
            let c = match self.ensure_buffered(i + 1)? {
                Ensure::Ready => self.buf_char(i),
                Ensure::Eof => return Ok(self.finish(state, i, value, negative, fits_in_long)),
                Ensure::Full => return Ok(NumberPeek::None),
            };

            match state {
                State::None => match c {
                    '-' => {
                        negative = true;
                        state = State::Sign;
                    }
                    '0' => {
                        leading_zero = true;
                        state = State::Digit;
                    }
                    '1'..='9' => {
                        value = -digit(c);
                        state = State::Digit;
                    }
                    _ => return Ok(NumberPeek::None),
                },
                State::Sign => match c {
                    '0' => {
                        leading_zero = true;
                        state = State::Digit;
                    }
                    '1'..='9' => {
                        value = -digit(c);
                        state = State::Digit;
                    }
                    _ => return Ok(NumberPeek::None),
                },
                State::Digit => match c {
                    '0'..='9' => {
                        if leading_zero {
                            return Ok(NumberPeek::None);
                        }
                        if fits_in_long {
                            if value < MIN_INCOMPLETE_INTEGER {
                                fits_in_long = false;
                            } else {
                                let next = value.wrapping_mul(10).wrapping_sub(digit(c));
                                if next > value {
                                    fits_in_long = false;
                                } else {
                                    value = next;
                                }
                            }
                        }
                    }
                    '.' => state = State::Decimal,
                    'e' | 'E' => state = State::ExpE,
                    _ if terminates_literal(c) => {
                        return Ok(self.finish(state, i, value, negative, fits_in_long))
                    }
                    _ => return Ok(NumberPeek::None),
                },
                State::Decimal => match c {
                    '0'..='9' => state = State::FractionDigit,
                    _ => return Ok(NumberPeek::None),
                },
                State::FractionDigit => match c {
                    '0'..='9' => {}
                    'e' | 'E' => state = State::ExpE,
                    _ if terminates_literal(c) => {
                        return Ok(self.finish(state, i, value, negative, fits_in_long))
                    }
                    _ => return Ok(NumberPeek::None),
                },
                State::ExpE => match c {
                    '+' | '-' => state = State::ExpSign,
                    '0'..='9' => state = State::ExpDigit,
                    _ => return Ok(NumberPeek::None),
                },
                State::ExpSign => match c {
                    '0'..='9' => state = State::ExpDigit,
                    _ => return Ok(NumberPeek::None),
                },
                State::ExpDigit => match c {
                    '0'..='9' => {}
                    _ if terminates_literal(c) => {
                        return Ok(self.finish(state, i, value, negative, fits_in_long))
                    }
                    _ => return Ok(NumberPeek::None),
                },
            }

            i += 1;
        }
    }

    fn finish(
        &self,
        state: State,
        len: usize,
        value: i64,
        negative: bool,
        fits_in_long: bool,
    ) -> NumberPeek {
        match state {
            State::Digit if fits_in_long => {
                // Forbid `-0` as a cached Long so `next_f64` still sees the
                // sign via the textual `Number` fallback.
                if value != 0 || !negative {
                    NumberPeek::Long(if negative { value } else { -value }, len)
                } else {
                    NumberPeek::Number(len)
                }
            }
            State::Digit | State::FractionDigit | State::ExpDigit => NumberPeek::Number(len),
            _ => NumberPeek::None,
        }
    }
}

fn digit(c: char) -> i64 {
    i64::from(c as u32 - '0' as u32)
}
