//! Parsers over individual elements and uniform runs
//!
//! Everything here tokenizes: single-element parsers ([`any`], [`satisfy`],
//! [`one_of`], …), counted and predicate-bounded runs ([`take_eq`],
//! [`take_while`], …), literal sequences ([`list_eq`], [`stream_eq_by`]),
//! and run grouping ([`group_by`] and friends). The separator- and
//! frame-delimited family lives in the [`frame`] submodule and is
//! re-exported here.
//!
//! Run-level parsers collect into a [`Fold`], so the same parser can build
//! a `Vec`, count, or anything else a fold can do:
//!
//! ```rust
//! use thresh::prelude::*;
//! use thresh::{fold, stream, token};
//!
//! let n = stream::iter("aaab".chars())
//!     .parse(token::take_while(|c| *c == 'a', fold::length()));
//! assert_eq!(n, Ok(3));
//! ```

use core::marker::PhantomData;

use crate::fold::{Fold, FoldStep};
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use crate::parser::{ParseStep, Parser, Start};
use crate::stream::{Iter, Step, Stream};
use crate::Either;

mod frame;
pub use frame::{
    take_end_by, take_end_by_drop, take_end_by_esc, take_framed_by, take_framed_by_esc,
    take_framed_by_generic, take_start_by, take_start_by_drop, word_by, word_framed_by,
    word_quoted_by, TakeEndBy, TakeEndByDrop, TakeEndByEsc, TakeFramedByGeneric, TakeStartBy,
    WordBy, WordFramedBy, WordQuotedBy,
};

#[cfg(test)]
mod tests;

/// A set of tokens, for [`one_of`] and [`none_of`].
///
/// Implemented for slices and arrays of comparable tokens and for
/// predicates.
pub trait TokenSet<T> {
    /// Whether `token` belongs to the set.
    fn contains(&self, token: &T) -> bool;
}

impl<T, F: Fn(&T) -> bool> TokenSet<T> for F {
    #[inline]
    fn contains(&self, token: &T) -> bool {
        self(token)
    }
}

impl<T: PartialEq> TokenSet<T> for &'_ [T] {
    #[inline]
    fn contains(&self, token: &T) -> bool {
        <[T]>::contains(self, token)
    }
}

impl<T: PartialEq, const N: usize> TokenSet<T> for [T; N] {
    #[inline]
    fn contains(&self, token: &T) -> bool {
        self.as_slice().contains(token)
    }
}

/// See [`any`].
#[derive(Debug, Clone)]
pub struct Any<A> {
    marker: PhantomData<A>,
}

impl<A> Parser for Any<A> {
    type Input = A;
    type State = ();
    type Output = A;

    #[inline]
    fn initial(&mut self) -> Start<(), A> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), A> {
        ParseStep::Done(0, input)
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), A> {
        ParseStep::Error(String::from("any: unexpected end of input"))
    }
}

/// Consumes and returns the next element; fails on end of input.
#[doc(alias = "one")]
#[inline]
pub fn any<A>() -> Any<A> {
    Any {
        marker: PhantomData,
    }
}

/// See [`peek`].
#[derive(Debug, Clone)]
pub struct Peek<A> {
    marker: PhantomData<A>,
}

impl<A> Parser for Peek<A> {
    type Input = A;
    type State = ();
    type Output = A;

    #[inline]
    fn initial(&mut self) -> Start<(), A> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), A> {
        // Rewind the element just looked at; whoever parses next sees it.
        ParseStep::Done(1, input)
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), A> {
        ParseStep::Error(String::from("peek: unexpected end of input"))
    }
}

/// Returns the next element without consuming it; fails on end of input.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{driver::Driver, stream, token};
///
/// let mut driver = Driver::new(stream::iter([7, 8]));
/// assert_eq!(driver.parse(&mut token::peek()), Ok(7));
/// assert_eq!(driver.parse(&mut token::any()), Ok(7));
/// ```
#[inline]
pub fn peek<A>() -> Peek<A> {
    Peek {
        marker: PhantomData,
    }
}

/// See [`eof`].
#[derive(Debug, Clone)]
pub struct Eof<A> {
    marker: PhantomData<A>,
}

impl<A> Parser for Eof<A> {
    type Input = A;
    type State = ();
    type Output = ();

    #[inline]
    fn initial(&mut self) -> Start<(), ()> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), _input: A) -> ParseStep<(), ()> {
        ParseStep::Error(String::from("eof: expected end of input"))
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), ()> {
        ParseStep::Done(0, ())
    }
}

/// Succeeds with `()` exactly when the input is exhausted.
#[inline]
pub fn eof<A>() -> Eof<A> {
    Eof {
        marker: PhantomData,
    }
}

/// See [`satisfy`].
#[derive(Debug, Clone)]
pub struct Satisfy<A, P> {
    pred: P,
    marker: PhantomData<A>,
}

impl<A, P: FnMut(&A) -> bool> Parser for Satisfy<A, P> {
    type Input = A;
    type State = ();
    type Output = A;

    #[inline]
    fn initial(&mut self) -> Start<(), A> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), A> {
        if (self.pred)(&input) {
            ParseStep::Done(0, input)
        } else {
            ParseStep::Error(String::from("satisfy: predicate failed"))
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), A> {
        ParseStep::Error(String::from("satisfy: unexpected end of input"))
    }
}

/// Consumes one element satisfying `pred`.
#[inline]
pub fn satisfy<A, P: FnMut(&A) -> bool>(pred: P) -> Satisfy<A, P> {
    Satisfy {
        pred,
        marker: PhantomData,
    }
}

/// See [`satisfy_map`].
#[derive(Debug, Clone)]
pub struct SatisfyMap<A, B, G> {
    f: G,
    marker: PhantomData<(A, B)>,
}

impl<A, B, G: FnMut(&A) -> Option<B>> Parser for SatisfyMap<A, B, G> {
    type Input = A;
    type State = ();
    type Output = B;

    #[inline]
    fn initial(&mut self) -> Start<(), B> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), B> {
        match (self.f)(&input) {
            Some(b) => ParseStep::Done(0, b),
            None => ParseStep::Error(String::from("satisfy_map: no match")),
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), B> {
        ParseStep::Error(String::from("satisfy_map: unexpected end of input"))
    }
}

/// Consumes one element and maps it; `None` fails the parse.
///
/// For a custom failure message, use
/// [`any().try_map(..)`][crate::parser::Parser::try_map] instead.
#[inline]
pub fn satisfy_map<A, B, G: FnMut(&A) -> Option<B>>(f: G) -> SatisfyMap<A, B, G> {
    SatisfyMap {
        f,
        marker: PhantomData,
    }
}

/// See [`one_eq`].
#[derive(Debug, Clone)]
pub struct OneEq<A> {
    expected: A,
}

impl<A: PartialEq> Parser for OneEq<A> {
    type Input = A;
    type State = ();
    type Output = A;

    #[inline]
    fn initial(&mut self) -> Start<(), A> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), A> {
        if input == self.expected {
            ParseStep::Done(0, input)
        } else {
            ParseStep::Error(String::from("one_eq: unexpected element"))
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), A> {
        ParseStep::Error(String::from("one_eq: unexpected end of input"))
    }
}

/// Consumes one element equal to `expected`.
#[inline]
pub fn one_eq<A: PartialEq>(expected: A) -> OneEq<A> {
    OneEq { expected }
}

/// See [`one_not_eq`].
#[derive(Debug, Clone)]
pub struct OneNotEq<A> {
    rejected: A,
}

impl<A: PartialEq> Parser for OneNotEq<A> {
    type Input = A;
    type State = ();
    type Output = A;

    #[inline]
    fn initial(&mut self) -> Start<(), A> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), A> {
        if input == self.rejected {
            ParseStep::Error(String::from("one_not_eq: rejected element"))
        } else {
            ParseStep::Done(0, input)
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), A> {
        ParseStep::Error(String::from("one_not_eq: unexpected end of input"))
    }
}

/// Consumes one element different from `rejected`.
#[inline]
pub fn one_not_eq<A: PartialEq>(rejected: A) -> OneNotEq<A> {
    OneNotEq { rejected }
}

/// See [`one_of`].
#[derive(Debug, Clone)]
pub struct OneOf<A, S> {
    set: S,
    marker: PhantomData<A>,
}

impl<A, S: TokenSet<A>> Parser for OneOf<A, S> {
    type Input = A;
    type State = ();
    type Output = A;

    #[inline]
    fn initial(&mut self) -> Start<(), A> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), A> {
        if self.set.contains(&input) {
            ParseStep::Done(0, input)
        } else {
            ParseStep::Error(String::from("one_of: no match"))
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), A> {
        ParseStep::Error(String::from("one_of: unexpected end of input"))
    }
}

/// Consumes one element belonging to `set`.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{stream, token};
///
/// let sign = stream::iter("+1".chars()).parse(token::one_of(['+', '-']));
/// assert_eq!(sign, Ok('+'));
/// ```
#[inline]
pub fn one_of<A, S: TokenSet<A>>(set: S) -> OneOf<A, S> {
    OneOf {
        set,
        marker: PhantomData,
    }
}

/// See [`none_of`].
#[derive(Debug, Clone)]
pub struct NoneOf<A, S> {
    set: S,
    marker: PhantomData<A>,
}

impl<A, S: TokenSet<A>> Parser for NoneOf<A, S> {
    type Input = A;
    type State = ();
    type Output = A;

    #[inline]
    fn initial(&mut self) -> Start<(), A> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), A> {
        if self.set.contains(&input) {
            ParseStep::Error(String::from("none_of: rejected element"))
        } else {
            ParseStep::Done(0, input)
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), A> {
        ParseStep::Error(String::from("none_of: unexpected end of input"))
    }
}

/// Consumes one element not belonging to `set`.
#[inline]
pub fn none_of<A, S: TokenSet<A>>(set: S) -> NoneOf<A, S> {
    NoneOf {
        set,
        marker: PhantomData,
    }
}

/// See [`stream_eq_by`].
pub struct StreamEqBy<A, S, C> {
    reference: S,
    cmp: C,
    marker: PhantomData<A>,
}

impl<S, A, C> Parser for StreamEqBy<A, S, C>
where
    S: Stream + Clone,
    C: FnMut(&S::Item, &A) -> bool,
{
    type Input = A;
    // The cloned reference stream plus the expected element pulled ahead.
    type State = (S, S::Item);
    type Output = ();

    fn initial(&mut self) -> Start<(S, S::Item), ()> {
        let mut reference = self.reference.clone();
        loop {
            match reference.step() {
                Step::Yield(expected) => return Start::Pending((reference, expected)),
                Step::Skip => {}
                Step::Stop => return Start::Done(()),
            }
        }
    }

    fn step(&mut self, (mut reference, expected): (S, S::Item), input: A) -> ParseStep<(S, S::Item), ()> {
        if !(self.cmp)(&expected, &input) {
            return ParseStep::Error(String::from("stream_eq_by: mismatch occurred"));
        }
        loop {
            match reference.step() {
                Step::Yield(next) => return ParseStep::Continue(0, (reference, next)),
                Step::Skip => {}
                Step::Stop => return ParseStep::Done(0, ()),
            }
        }
    }

    fn extract(&mut self, _state: (S, S::Item)) -> ParseStep<(S, S::Item), ()> {
        ParseStep::Error(String::from("stream_eq_by: unexpected end of input"))
    }
}

/// Matches the input against a reference stream, element by element.
///
/// The reference stream is cloned per run, so one parser value can be run
/// many times.
#[inline]
pub fn stream_eq_by<S, A, C>(cmp: C, reference: S) -> StreamEqBy<S, C>
where
    S: Stream + Clone,
    C: FnMut(&S::Item, &A) -> bool,
{
    StreamEqBy { reference, cmp }
}

/// See [`list_eq_by`].
pub struct ListEqBy<A, C> {
    expected: Vec<A>,
    inner: StreamEqBy<Iter<crate::lib::std::vec::IntoIter<A>>, C>,
}

impl<A, C> Parser for ListEqBy<A, C>
where
    A: Clone,
    C: FnMut(&A, &A) -> bool,
{
    type Input = A;
    type State = <StreamEqBy<Iter<crate::lib::std::vec::IntoIter<A>>, C> as Parser>::State;
    type Output = Vec<A>;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, Vec<A>> {
        match self.inner.initial() {
            Start::Pending(s) => Start::Pending(s),
            Start::Done(()) => Start::Done(self.expected.clone()),
            Start::Error(msg) => Start::Error(msg),
        }
    }

    #[inline]
    fn step(&mut self, state: Self::State, input: A) -> ParseStep<Self::State, Vec<A>> {
        match self.inner.step(state, input) {
            ParseStep::Partial(n, s) => ParseStep::Partial(n, s),
            ParseStep::Continue(n, s) => ParseStep::Continue(n, s),
            ParseStep::Done(n, ()) => ParseStep::Done(n, self.expected.clone()),
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }

    #[inline]
    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, Vec<A>> {
        match self.inner.extract(state) {
            ParseStep::Partial(n, s) => ParseStep::Partial(n, s),
            ParseStep::Continue(n, s) => ParseStep::Continue(n, s),
            ParseStep::Done(n, ()) => ParseStep::Done(n, self.expected.clone()),
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }
}

/// Matches the elements of `expected` in order under `cmp` and returns
/// them.
///
/// This runs the [`stream_eq_by`] machinery over the expected elements, so
/// a mismatch reports as `stream_eq_by: mismatch occurred`.
#[inline]
pub fn list_eq_by<A, C>(cmp: C, expected: Vec<A>) -> ListEqBy<A, C>
where
    A: Clone,
    C: FnMut(&A, &A) -> bool,
{
    let inner = stream_eq_by(cmp, crate::stream::iter(expected.clone()));
    ListEqBy { expected, inner }
}

/// Matches the elements of `expected` in order and returns them.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{stream, token};
///
/// let hit = stream::iter("string".chars()).parse(token::list_eq("string".chars().collect()));
/// assert_eq!(hit, Ok("string".chars().collect::<Vec<_>>()));
/// ```
#[inline]
pub fn list_eq<A>(expected: Vec<A>) -> ListEqBy<A, fn(&A, &A) -> bool>
where
    A: Clone + PartialEq,
{
    list_eq_by(|a, b| a == b, expected)
}

/// State of the counting parsers while the fold is live or already
/// finished.
#[derive(Debug, Clone)]
pub enum Counted<S, B> {
    /// The fold is still consuming.
    Feeding(S, usize),
    /// The fold finished early; remaining elements are consumed and
    /// discarded.
    Draining(B, usize),
}

/// See [`take_eq`].
pub struct TakeEq<F> {
    n: usize,
    fold: F,
}

impl<F: Fold> Parser for TakeEq<F> {
    type Input = F::Input;
    type State = Counted<F::State, F::Output>;
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => {
                if self.n == 0 {
                    Start::Done(self.fold.extract(s))
                } else {
                    Start::Pending(Counted::Feeding(s, 0))
                }
            }
            FoldStep::Done(b) => {
                if self.n == 0 {
                    Start::Done(b)
                } else {
                    Start::Pending(Counted::Draining(b, 0))
                }
            }
        }
    }

    fn step(&mut self, state: Self::State, input: F::Input) -> ParseStep<Self::State, F::Output> {
        match state {
            Counted::Feeding(s, count) => {
                let count = count + 1;
                match self.fold.step(s, input) {
                    FoldStep::Partial(s) => {
                        if count == self.n {
                            ParseStep::Done(0, self.fold.extract(s))
                        } else {
                            ParseStep::Partial(0, Counted::Feeding(s, count))
                        }
                    }
                    FoldStep::Done(b) => {
                        if count == self.n {
                            ParseStep::Done(0, b)
                        } else {
                            ParseStep::Partial(0, Counted::Draining(b, count))
                        }
                    }
                }
            }
            Counted::Draining(b, count) => {
                let count = count + 1;
                if count == self.n {
                    ParseStep::Done(0, b)
                } else {
                    ParseStep::Partial(0, Counted::Draining(b, count))
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        let count = match state {
            Counted::Feeding(_, count) | Counted::Draining(_, count) => count,
        };
        ParseStep::Error(format!(
            "take_eq: expecting exactly {} elements, input terminated on {count}",
            self.n
        ))
    }
}

/// Consumes exactly `n` elements into `fold`; fewer is an error.
///
/// The fold may finish early; the remaining elements up to `n` are still
/// consumed.
#[inline]
pub fn take_eq<F: Fold>(n: usize, fold: F) -> TakeEq<F> {
    TakeEq { n, fold }
}

/// See [`take_ge`].
pub struct TakeGe<F> {
    n: usize,
    fold: F,
}

impl<F: Fold> Parser for TakeGe<F> {
    type Input = F::Input;
    type State = Counted<F::State, F::Output>;
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(Counted::Feeding(s, 0)),
            FoldStep::Done(b) => {
                if self.n == 0 {
                    Start::Done(b)
                } else {
                    Start::Pending(Counted::Draining(b, 0))
                }
            }
        }
    }

    fn step(&mut self, state: Self::State, input: F::Input) -> ParseStep<Self::State, F::Output> {
        match state {
            Counted::Feeding(s, count) => {
                let count = count + 1;
                match self.fold.step(s, input) {
                    FoldStep::Partial(s) => ParseStep::Partial(0, Counted::Feeding(s, count)),
                    FoldStep::Done(b) => {
                        if count >= self.n {
                            ParseStep::Done(0, b)
                        } else {
                            ParseStep::Partial(0, Counted::Draining(b, count))
                        }
                    }
                }
            }
            Counted::Draining(b, count) => {
                let count = count + 1;
                if count >= self.n {
                    ParseStep::Done(0, b)
                } else {
                    ParseStep::Partial(0, Counted::Draining(b, count))
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            Counted::Feeding(s, count) => {
                if count >= self.n {
                    ParseStep::Done(0, self.fold.extract(s))
                } else {
                    ParseStep::Error(format!(
                        "take_ge: expecting at least {} elements, input terminated on {count}",
                        self.n
                    ))
                }
            }
            Counted::Draining(b, count) => {
                if count >= self.n {
                    ParseStep::Done(0, b)
                } else {
                    ParseStep::Error(format!(
                        "take_ge: expecting at least {} elements, input terminated on {count}",
                        self.n
                    ))
                }
            }
        }
    }
}

/// Consumes at least `n` elements into `fold`, then keeps feeding until the
/// fold finishes or input ends.
#[inline]
pub fn take_ge<F: Fold>(n: usize, fold: F) -> TakeGe<F> {
    TakeGe { n, fold }
}

/// See [`take_between`].
pub struct TakeBetween<F> {
    lo: usize,
    hi: usize,
    fold: F,
}

impl<F: Fold> Parser for TakeBetween<F> {
    type Input = F::Input;
    type State = (F::State, usize);
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        if self.lo > self.hi {
            return Start::Error(format!(
                "take_between: lower bound {} exceeds upper bound {}",
                self.lo, self.hi
            ));
        }
        match self.fold.initial() {
            FoldStep::Partial(s) => {
                if self.hi == 0 {
                    Start::Done(self.fold.extract(s))
                } else {
                    Start::Pending((s, 0))
                }
            }
            FoldStep::Done(b) => {
                if self.lo == 0 {
                    Start::Done(b)
                } else {
                    Start::Error(format!(
                        "take_between: fold terminated without input, expecting at least {} elements",
                        self.lo
                    ))
                }
            }
        }
    }

    fn step(&mut self, (s, count): Self::State, input: F::Input) -> ParseStep<Self::State, F::Output> {
        let count = count + 1;
        match self.fold.step(s, input) {
            FoldStep::Partial(s) => {
                if count == self.hi {
                    ParseStep::Done(0, self.fold.extract(s))
                } else {
                    ParseStep::Partial(0, (s, count))
                }
            }
            FoldStep::Done(b) => {
                if count < self.lo {
                    ParseStep::Error(format!(
                        "take_between: fold terminated on {count} elements, expecting at least {}",
                        self.lo
                    ))
                } else {
                    ParseStep::Done(0, b)
                }
            }
        }
    }

    fn extract(&mut self, (s, count): Self::State) -> ParseStep<Self::State, F::Output> {
        if count >= self.lo {
            ParseStep::Done(0, self.fold.extract(s))
        } else {
            ParseStep::Error(format!(
                "take_between: expecting at least {} elements, input terminated on {count}",
                self.lo
            ))
        }
    }
}

/// Consumes between `lo` and `hi` elements into `fold`.
///
/// Stops at `hi`, or earlier if the fold finishes (an error if that happens
/// before `lo`). Input ending between the bounds is a success.
#[inline]
pub fn take_between<F: Fold>(lo: usize, hi: usize, fold: F) -> TakeBetween<F> {
    TakeBetween { lo, hi, fold }
}

/// See [`take_while`].
pub struct TakeWhile<P, F> {
    pred: P,
    fold: F,
}

impl<P, F> Parser for TakeWhile<P, F>
where
    F: Fold,
    P: FnMut(&F::Input) -> bool,
{
    type Input = F::Input;
    type State = F::State;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> Start<F::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(s),
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    #[inline]
    fn step(&mut self, state: F::State, input: F::Input) -> ParseStep<F::State, F::Output> {
        if (self.pred)(&input) {
            match self.fold.step(state, input) {
                FoldStep::Partial(s) => ParseStep::Partial(0, s),
                FoldStep::Done(b) => ParseStep::Done(0, b),
            }
        } else {
            // The offending element is rewound for the next parser.
            ParseStep::Done(1, self.fold.extract(state))
        }
    }

    #[inline]
    fn extract(&mut self, state: F::State) -> ParseStep<F::State, F::Output> {
        ParseStep::Done(0, self.fold.extract(state))
    }
}

/// Consumes the longest prefix satisfying `pred` into `fold`. Never fails.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{fold, stream, token};
///
/// let zeros = stream::iter([0, 0, 1, 0, 1]).parse(token::take_while(|x| *x == 0, fold::to_vec()));
/// assert_eq!(zeros, Ok(vec![0, 0]));
/// ```
#[inline]
pub fn take_while<P, F>(pred: P, fold: F) -> TakeWhile<P, F>
where
    F: Fold,
    P: FnMut(&F::Input) -> bool,
{
    TakeWhile { pred, fold }
}

/// See [`take_while1`].
pub struct TakeWhile1<P, F> {
    pred: P,
    fold: F,
}

/// State of [`take_while1`]: whether the mandatory first element arrived.
#[derive(Debug, Clone)]
pub enum TakeWhile1State<S> {
    /// No input yet.
    First(S),
    /// At least one matching element consumed.
    Rest(S),
}

impl<P, F> Parser for TakeWhile1<P, F>
where
    F: Fold,
    P: FnMut(&F::Input) -> bool,
{
    type Input = F::Input;
    type State = TakeWhile1State<F::State>;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(TakeWhile1State::First(s)),
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    fn step(&mut self, state: Self::State, input: F::Input) -> ParseStep<Self::State, F::Output> {
        match state {
            TakeWhile1State::First(s) => {
                if (self.pred)(&input) {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => {
                            ParseStep::Partial(0, TakeWhile1State::Rest(s))
                        }
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                } else {
                    ParseStep::Error(String::from(
                        "take_while1: predicate failed on first element",
                    ))
                }
            }
            TakeWhile1State::Rest(s) => {
                if (self.pred)(&input) {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => {
                            ParseStep::Partial(0, TakeWhile1State::Rest(s))
                        }
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                } else {
                    ParseStep::Done(1, self.fold.extract(s))
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            TakeWhile1State::First(_) => {
                ParseStep::Error(String::from("take_while1: unexpected end of input"))
            }
            TakeWhile1State::Rest(s) => ParseStep::Done(0, self.fold.extract(s)),
        }
    }
}

/// Like [`take_while`] but the first element must match.
#[inline]
pub fn take_while1<P, F>(pred: P, fold: F) -> TakeWhile1<P, F>
where
    F: Fold,
    P: FnMut(&F::Input) -> bool,
{
    TakeWhile1 { pred, fold }
}

/// See [`take_while_p`].
pub struct TakeWhileP<C, P> {
    pred: C,
    parser: P,
}

impl<C, P> Parser for TakeWhileP<C, P>
where
    P: Parser,
    C: FnMut(&P::Input) -> bool,
{
    type Input = P::Input;
    type State = P::State;
    type Output = P::Output;

    #[inline]
    fn initial(&mut self) -> Start<P::State, P::Output> {
        self.parser.initial()
    }

    fn step(&mut self, state: P::State, input: P::Input) -> ParseStep<P::State, P::Output> {
        if (self.pred)(&input) {
            self.parser.step(state, input)
        } else {
            // Boundary: the inner parser must wrap up on what it has.
            match self.parser.extract(state) {
                ParseStep::Done(n, b) => ParseStep::Done(n + 1, b),
                ParseStep::Error(msg) => ParseStep::Error(msg),
                ParseStep::Continue(..) | ParseStep::Partial(..) => ParseStep::Error(
                    String::from("take_while_p: parser needs input beyond the matching run"),
                ),
            }
        }
    }

    #[inline]
    fn extract(&mut self, state: P::State) -> ParseStep<P::State, P::Output> {
        self.parser.extract(state)
    }
}

/// Feeds the inner parser only while `pred` holds; at the boundary the
/// inner parser is finalized and the offending element rewound.
#[inline]
pub fn take_while_p<C, P>(pred: C, parser: P) -> TakeWhileP<C, P>
where
    P: Parser,
    C: FnMut(&P::Input) -> bool,
{
    TakeWhileP { pred, parser }
}

/// See [`drop_while`].
#[derive(Debug, Clone)]
pub struct DropWhile<P> {
    pred: P,
}

impl<A, P: FnMut(&A) -> bool> Parser for DropWhile<P> {
    type Input = A;
    type State = ();
    type Output = ();

    #[inline]
    fn initial(&mut self) -> Start<(), ()> {
        Start::Pending(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> ParseStep<(), ()> {
        if (self.pred)(&input) {
            ParseStep::Partial(0, ())
        } else {
            ParseStep::Done(1, ())
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> ParseStep<(), ()> {
        ParseStep::Done(0, ())
    }
}

/// Consumes and discards the longest prefix satisfying `pred`. Never fails.
#[inline]
pub fn drop_while<A, P: FnMut(&A) -> bool>(pred: P) -> DropWhile<P> {
    DropWhile { pred }
}

/// State of [`group_by`]: before or after the group's head element.
#[derive(Debug, Clone)]
pub enum GroupState<A, S> {
    /// No element seen yet.
    Empty(S),
    /// Comparing against the held element.
    Head(A, S),
}

/// See [`group_by`].
pub struct GroupBy<E, F> {
    eq: E,
    fold: F,
}

impl<E, F> Parser for GroupBy<E, F>
where
    F: Fold,
    F::Input: Clone,
    E: FnMut(&F::Input, &F::Input) -> bool,
{
    type Input = F::Input;
    type State = GroupState<F::Input, F::State>;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(GroupState::Empty(s)),
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    fn step(&mut self, state: Self::State, input: F::Input) -> ParseStep<Self::State, F::Output> {
        match state {
            GroupState::Empty(s) => {
                let head = input.clone();
                match self.fold.step(s, input) {
                    FoldStep::Partial(s) => ParseStep::Partial(0, GroupState::Head(head, s)),
                    FoldStep::Done(b) => ParseStep::Done(0, b),
                }
            }
            GroupState::Head(head, s) => {
                if (self.eq)(&head, &input) {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => {
                            ParseStep::Partial(0, GroupState::Head(head, s))
                        }
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                } else {
                    ParseStep::Done(1, self.fold.extract(s))
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            GroupState::Empty(s) | GroupState::Head(_, s) => {
                ParseStep::Done(0, self.fold.extract(s))
            }
        }
    }
}

/// Collects a run of elements all related to the *first* element of the run
/// by `eq`. The element breaking the run is rewound. Never fails.
#[inline]
pub fn group_by<E, F>(eq: E, fold: F) -> GroupBy<E, F>
where
    F: Fold,
    F::Input: Clone,
    E: FnMut(&F::Input, &F::Input) -> bool,
{
    GroupBy { eq, fold }
}

/// See [`group_by_rolling`].
pub struct GroupByRolling<E, F> {
    eq: E,
    fold: F,
}

impl<E, F> Parser for GroupByRolling<E, F>
where
    F: Fold,
    F::Input: Clone,
    E: FnMut(&F::Input, &F::Input) -> bool,
{
    type Input = F::Input;
    type State = GroupState<F::Input, F::State>;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(GroupState::Empty(s)),
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    fn step(&mut self, state: Self::State, input: F::Input) -> ParseStep<Self::State, F::Output> {
        match state {
            GroupState::Empty(s) => {
                let prev = input.clone();
                match self.fold.step(s, input) {
                    FoldStep::Partial(s) => ParseStep::Partial(0, GroupState::Head(prev, s)),
                    FoldStep::Done(b) => ParseStep::Done(0, b),
                }
            }
            GroupState::Head(prev, s) => {
                if (self.eq)(&prev, &input) {
                    let prev = input.clone();
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => {
                            ParseStep::Partial(0, GroupState::Head(prev, s))
                        }
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                } else {
                    ParseStep::Done(1, self.fold.extract(s))
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            GroupState::Empty(s) | GroupState::Head(_, s) => {
                ParseStep::Done(0, self.fold.extract(s))
            }
        }
    }
}

/// Like [`group_by`] but each element is compared to its immediate
/// predecessor rather than the run's head.
#[inline]
pub fn group_by_rolling<E, F>(eq: E, fold: F) -> GroupByRolling<E, F>
where
    F: Fold,
    F::Input: Clone,
    E: FnMut(&F::Input, &F::Input) -> bool,
{
    GroupByRolling { eq, fold }
}

/// State of [`group_by_rolling_either`].
#[derive(Debug, Clone)]
pub enum RollingEitherState<A, SL, SR> {
    /// Nothing seen.
    Fresh,
    /// One element held; the second decides the direction.
    Undecided(A),
    /// Collecting a run where `eq` holds between neighbors.
    GoingLeft(A, SL),
    /// Collecting a run where `eq` fails between neighbors.
    GoingRight(A, SR),
}

/// See [`group_by_rolling_either`].
pub struct GroupByRollingEither<E, FL, FR> {
    eq: E,
    left: FL,
    right: FR,
}

impl<E, FL, FR> GroupByRollingEither<E, FL, FR>
where
    FL: Fold,
    FL::Input: Clone,
    FR: Fold<Input = FL::Input>,
    E: FnMut(&FL::Input, &FL::Input) -> bool,
{
    /// Feeds the two deferred elements into a fresh left run.
    fn open_left(
        &mut self,
        prev: FL::Input,
        input: FL::Input,
    ) -> ParseStep<RollingEitherState<FL::Input, FL::State, FR::State>, Either<FL::Output, FR::Output>>
    {
        let s = match self.left.initial() {
            FoldStep::Partial(s) => s,
            FoldStep::Done(b) => return ParseStep::Done(2, Either::Left(b)),
        };
        let s = match self.left.step(s, prev) {
            FoldStep::Partial(s) => s,
            FoldStep::Done(b) => return ParseStep::Done(1, Either::Left(b)),
        };
        let held = input.clone();
        match self.left.step(s, input) {
            FoldStep::Partial(s) => {
                ParseStep::Partial(0, RollingEitherState::GoingLeft(held, s))
            }
            FoldStep::Done(b) => ParseStep::Done(0, Either::Left(b)),
        }
    }

    /// Feeds the two deferred elements into a fresh right run.
    fn open_right(
        &mut self,
        prev: FR::Input,
        input: FR::Input,
    ) -> ParseStep<RollingEitherState<FL::Input, FL::State, FR::State>, Either<FL::Output, FR::Output>>
    {
        let s = match self.right.initial() {
            FoldStep::Partial(s) => s,
            FoldStep::Done(b) => return ParseStep::Done(2, Either::Right(b)),
        };
        let s = match self.right.step(s, prev) {
            FoldStep::Partial(s) => s,
            FoldStep::Done(b) => return ParseStep::Done(1, Either::Right(b)),
        };
        let held = input.clone();
        match self.right.step(s, input) {
            FoldStep::Partial(s) => {
                ParseStep::Partial(0, RollingEitherState::GoingRight(held, s))
            }
            FoldStep::Done(b) => ParseStep::Done(0, Either::Right(b)),
        }
    }
}

impl<E, FL, FR> Parser for GroupByRollingEither<E, FL, FR>
where
    FL: Fold,
    FL::Input: Clone,
    FR: Fold<Input = FL::Input>,
    E: FnMut(&FL::Input, &FL::Input) -> bool,
{
    type Input = FL::Input;
    type State = RollingEitherState<FL::Input, FL::State, FR::State>;
    type Output = Either<FL::Output, FR::Output>;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, Self::Output> {
        Start::Pending(RollingEitherState::Fresh)
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, Self::Output> {
        match state {
            RollingEitherState::Fresh => {
                // Direction is unknown until a second element shows up, so
                // hold off feeding either fold.
                ParseStep::Continue(0, RollingEitherState::Undecided(input))
            }
            RollingEitherState::Undecided(prev) => {
                if (self.eq)(&prev, &input) {
                    self.open_left(prev, input)
                } else {
                    self.open_right(prev, input)
                }
            }
            RollingEitherState::GoingLeft(prev, s) => {
                if (self.eq)(&prev, &input) {
                    let prev = input.clone();
                    match self.left.step(s, input) {
                        FoldStep::Partial(s) => {
                            ParseStep::Partial(0, RollingEitherState::GoingLeft(prev, s))
                        }
                        FoldStep::Done(b) => ParseStep::Done(0, Either::Left(b)),
                    }
                } else {
                    ParseStep::Done(1, Either::Left(self.left.extract(s)))
                }
            }
            RollingEitherState::GoingRight(prev, s) => {
                if !(self.eq)(&prev, &input) {
                    let prev = input.clone();
                    match self.right.step(s, input) {
                        FoldStep::Partial(s) => {
                            ParseStep::Partial(0, RollingEitherState::GoingRight(prev, s))
                        }
                        FoldStep::Done(b) => ParseStep::Done(0, Either::Right(b)),
                    }
                } else {
                    ParseStep::Done(1, Either::Right(self.right.extract(s)))
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, Self::Output> {
        match state {
            RollingEitherState::Fresh => match self.left.initial() {
                FoldStep::Partial(s) => ParseStep::Done(0, Either::Left(self.left.extract(s))),
                FoldStep::Done(b) => ParseStep::Done(0, Either::Left(b)),
            },
            // A lone trailing element groups left.
            RollingEitherState::Undecided(prev) => match self.left.initial() {
                FoldStep::Partial(s) => match self.left.step(s, prev) {
                    FoldStep::Partial(s) => {
                        ParseStep::Done(0, Either::Left(self.left.extract(s)))
                    }
                    FoldStep::Done(b) => ParseStep::Done(0, Either::Left(b)),
                },
                FoldStep::Done(b) => ParseStep::Done(0, Either::Left(b)),
            },
            RollingEitherState::GoingLeft(_, s) => {
                ParseStep::Done(0, Either::Left(self.left.extract(s)))
            }
            RollingEitherState::GoingRight(_, s) => {
                ParseStep::Done(0, Either::Right(self.right.extract(s)))
            }
        }
    }
}

/// Splits off a run of neighbor-related elements, reporting which way the
/// first comparison went.
///
/// The first two elements pick a side: if `eq` holds between them the run
/// feeds `left` and continues while `eq` keeps holding between neighbors;
/// otherwise it feeds `right` and continues while `eq` keeps failing.
#[inline]
pub fn group_by_rolling_either<E, FL, FR>(
    eq: E,
    left: FL,
    right: FR,
) -> GroupByRollingEither<E, FL, FR>
where
    FL: Fold,
    FL::Input: Clone,
    FR: Fold<Input = FL::Input>,
    E: FnMut(&FL::Input, &FL::Input) -> bool,
{
    GroupByRollingEither { eq, left, right }
}

/// Which phase a [`span`] run is in.
#[derive(Debug, Clone)]
pub enum SpanState<SL, BL, SR> {
    /// Still in the matching prefix.
    Prefix(SpanSide<SL, BL>),
    /// Feeding the remainder.
    Suffix(BL, SR),
}

/// One side of a [`span`], live or finished early.
#[derive(Debug, Clone)]
pub enum SpanSide<S, B> {
    /// The fold is consuming.
    Live(S),
    /// The fold finished early; further prefix elements are discarded.
    Settled(B),
}

/// See [`span`].
pub struct Span<P, FL, FR> {
    pred: P,
    left: FL,
    right: FR,
}

impl<P, FL, FR> Span<P, FL, FR>
where
    FL: Fold,
    FR: Fold<Input = FL::Input>,
    P: FnMut(&FL::Input) -> bool,
{
    fn settle_left(&mut self, side: SpanSide<FL::State, FL::Output>) -> FL::Output {
        match side {
            SpanSide::Live(s) => self.left.extract(s),
            SpanSide::Settled(b) => b,
        }
    }
}

impl<P, FL, FR> Parser for Span<P, FL, FR>
where
    FL: Fold,
    FR: Fold<Input = FL::Input>,
    P: FnMut(&FL::Input) -> bool,
{
    type Input = FL::Input;
    type State = SpanState<FL::State, FL::Output, FR::State>;
    type Output = (FL::Output, FR::Output);

    #[inline]
    fn initial(&mut self) -> Start<Self::State, Self::Output> {
        match self.left.initial() {
            FoldStep::Partial(s) => Start::Pending(SpanState::Prefix(SpanSide::Live(s))),
            FoldStep::Done(b) => Start::Pending(SpanState::Prefix(SpanSide::Settled(b))),
        }
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, Self::Output> {
        match state {
            SpanState::Prefix(side) => {
                if (self.pred)(&input) {
                    let side = match side {
                        SpanSide::Live(s) => match self.left.step(s, input) {
                            FoldStep::Partial(s) => SpanSide::Live(s),
                            FoldStep::Done(b) => SpanSide::Settled(b),
                        },
                        settled => settled,
                    };
                    ParseStep::Partial(0, SpanState::Prefix(side))
                } else {
                    let left = self.settle_left(side);
                    match self.right.initial() {
                        FoldStep::Partial(s) => match self.right.step(s, input) {
                            FoldStep::Partial(s) => {
                                ParseStep::Partial(0, SpanState::Suffix(left, s))
                            }
                            FoldStep::Done(b) => ParseStep::Done(0, (left, b)),
                        },
                        FoldStep::Done(b) => ParseStep::Done(1, (left, b)),
                    }
                }
            }
            SpanState::Suffix(left, s) => match self.right.step(s, input) {
                FoldStep::Partial(s) => ParseStep::Partial(0, SpanState::Suffix(left, s)),
                FoldStep::Done(b) => ParseStep::Done(0, (left, b)),
            },
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, Self::Output> {
        match state {
            SpanState::Prefix(side) => {
                let left = self.settle_left(side);
                match self.right.initial() {
                    FoldStep::Partial(s) => {
                        let right = self.right.extract(s);
                        ParseStep::Done(0, (left, right))
                    }
                    FoldStep::Done(b) => ParseStep::Done(0, (left, b)),
                }
            }
            SpanState::Suffix(left, s) => ParseStep::Done(0, (left, self.right.extract(s))),
        }
    }
}

/// Splits the input at the first element failing `pred`: the prefix feeds
/// `left`, everything from that element on feeds `right`, and the outputs
/// are paired. Never fails.
#[inline]
pub fn span<P, FL, FR>(pred: P, left: FL, right: FR) -> Span<P, FL, FR>
where
    FL: Fold,
    FR: Fold<Input = FL::Input>,
    P: FnMut(&FL::Input) -> bool,
{
    Span { pred, left, right }
}
