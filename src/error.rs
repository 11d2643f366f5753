//! Parse error reporting
//!
//! Streams and folds cannot fail; all failures funnel through the parser
//! step protocol as `Error(message)` results, which the [driver][crate::driver]
//! pairs with the absolute input offset to form a [`ParseError`].
//!
//! Messages are human-readable and prefixed with the name of the failing
//! combinator (`"take_eq: expecting exactly 4 elements, input terminated on
//! 3"`). Match on the prefix if you need to dispatch on the failure source;
//! the remainder of the message is advisory and may change.

use crate::lib::std::fmt;
use crate::lib::std::string::String;

/// The error returned by [`parse`][crate::stream::Stream::parse] and yielded
/// by [`parse_many`][crate::stream::Stream::parse_many].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    position: u64,
}

impl ParseError {
    /// Pairs a parser failure message with the absolute element offset at
    /// which the parser gave up.
    #[inline]
    pub fn new(message: impl Into<String>, position: u64) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// The failure message, prefixed with the failing combinator's name.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Absolute offset, in elements, of the driver when the parser failed.
    ///
    /// For errors raised at end of input this is the total number of
    /// elements consumed.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.position)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
