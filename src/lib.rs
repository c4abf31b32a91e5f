//! A pull-based streaming JSON tokenizer, and an insertion-ordered,
//! self-balancing associative container.
//!
//! *   [`JsonReader`] pulls one token at a time from a [`CharSource`],
//!     strictly per RFC 7159 by default, or over a documented lenient
//!     superset when [`JsonReader::set_lenient`] is turned on.
//! *   [`OrderedMap`] keeps entries in insertion order while still offering
//!     logarithmic lookup, backed by an AVL tree per hash bucket.
#![deny(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

pub mod error;
pub mod ordered_map;
pub mod reader;
pub mod source;
pub mod token;
mod util;

pub use error::{Error, Result};
pub use ordered_map::OrderedMap;
pub use reader::{JsonReader, MIN_BUFFER_SIZE};
pub use source::{CharSource, ReadSource, StrSource};
pub use token::{ScopeState, TokenKind};
