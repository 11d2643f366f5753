//! Fusible pull streams with incremental folds and backtracking stream parsers
//!
//! `thresh` is built out of three small state machines that share one design:
//! every stage is a `(state, step)` pair whose step result is a flat tagged
//! sum, so composed pipelines monomorphize into a single loop with no
//! allocation between stages.
//!
//! - [`stream`]: a pull-based sequence driven by [`stream::Step`]
//!   (`Yield`/`Skip`/`Stop`), with the usual transformer zoo.
//! - [`fold`]: left-to-right reducers with early termination
//!   ([`fold::FoldStep`]: `Partial`/`Done`), usable standalone or as sinks.
//! - [`parser`]: incremental, failable consumers whose step results carry a
//!   *backtrack count* ([`parser::ParseStep`]), letting the driver re-feed
//!   recently consumed input from a bounded rewind buffer.
//!
//! ## Example
//!
//! Streams fuse like iterators:
//!
//! ```rust
//! use thresh::prelude::*;
//! use thresh::stream;
//!
//! let out: Vec<_> = stream::iter(1..=10)
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * n)
//!     .take(3)
//!     .to_vec();
//! assert_eq!(out, vec![4, 16, 36]);
//! ```
//!
//! Parsers run over streams and can split them into structured pieces:
//!
//! ```rust
//! use thresh::prelude::*;
//! use thresh::{fold, stream, token};
//!
//! // Split into maximal runs where each element is above the run's head.
//! let runs: Vec<_> = stream::iter([3, 5, 4, 1, 2, 0])
//!     .parse_many(token::group_by(|a, b| a < b, fold::to_vec()))
//!     .to_vec();
//! assert_eq!(
//!     runs,
//!     vec![Ok(vec![3, 5, 4]), Ok(vec![1, 2]), Ok(vec![0])],
//! );
//! ```
//!
//! ## Feature flags
//!
//! - `std` (default): implies `alloc`; `std::error::Error` for
//!   [`ParseError`].
//! - `alloc`: parsers, folds that collect, and the [`driver`]; error
//!   messages allocate.
//! - `debug`: step-level parser tracing to stderr via
//!   [`Parser::traced`][parser::Parser::traced].

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
#[macro_use]
extern crate alloc;

/// Re-exports from `std` or `core`/`alloc`, so modules build on either.
#[doc(hidden)]
pub(crate) mod lib {
    #[cfg(not(feature = "std"))]
    pub(crate) mod std {
        #[cfg(feature = "alloc")]
        pub(crate) use alloc::{collections, string, vec};

        pub(crate) use core::{fmt, mem};
    }

    #[cfg(feature = "std")]
    pub(crate) mod std {
        pub(crate) use std::{collections, fmt, mem, string, vec};
    }
}

#[cfg(feature = "alloc")]
pub mod combinator;
#[cfg(feature = "alloc")]
pub mod driver;
#[cfg(feature = "alloc")]
pub mod error;
pub mod fold;
#[cfg(feature = "alloc")]
pub mod parser;
pub mod stream;
#[cfg(feature = "alloc")]
pub mod token;
#[cfg(feature = "alloc")]
pub mod trace;

#[cfg(feature = "alloc")]
pub use self::error::ParseError;

/// A value of one of two possible shapes.
///
/// Used wherever a combinator routes values to one of two places:
/// `deintercalate` tags which side produced an output before feeding the
/// sink, and `group_by_rolling_either` reports which of its two folds ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<L, R> {
    /// The left shape.
    Left(L),
    /// The right shape.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` for [`Either::Left`].
    #[inline]
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    /// Returns `true` for [`Either::Right`].
    #[inline]
    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }
}

/// Core traits available for glob import
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::stream;
///
/// let total: i64 = stream::iter(1..=4).fold(thresh::fold::sum());
/// assert_eq!(total, 10);
/// ```
pub mod prelude {
    pub use crate::fold::Fold as _;
    #[cfg(feature = "alloc")]
    pub use crate::parser::Parser as _;
    pub use crate::stream::Stream as _;
}
