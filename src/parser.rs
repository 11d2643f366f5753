//! The parser step protocol
//!
//! A [`Parser`] is shaped like a [`Fold`][crate::fold::Fold] — open, step,
//! finalize, with owned state — but its step results carry two extra
//! capabilities: failure, and a *backtrack count* telling the
//! [driver][crate::driver] how many of the most recently consumed elements
//! to feed again.
//!
//! For every fed element the driver interprets the returned [`ParseStep`]:
//!
//! | result | driver action |
//! |---|---|
//! | `Partial(n, s)` | commit everything except the last `n` fed elements; those are rewound and fed again |
//! | `Continue(n, s)` | rewind by `n`; nothing is committed |
//! | `Done(n, b)` | rewind by `n` and finish with `Ok(b)` |
//! | `Error(msg)` | finish with `Err` at the current offset |
//!
//! The backtrack count means the same thing in every variant: the `n` most
//! recently consumed elements will be fed again. `Partial` additionally
//! commits everything older than them.
//!
//! `Partial` is a *commit*: once a parser has emitted one, wrappers like
//! [`alt`][crate::combinator::alt] no longer try alternatives, and buffered
//! input behind the commit point is gone for good.
//!
//! [`extract`][Parser::extract] is called when input runs out while the
//! parser is still going. It must resolve to `Done`, `Continue`, or
//! `Error` — returning `Partial` from `extract` is a bug and panics the
//! driver.
//!
//! Concrete parsers live in [`token`][crate::token] (element- and
//! run-level) and [`combinator`][crate::combinator] (higher-order).

use core::marker::PhantomData;

use crate::lib::std::fmt;
use crate::lib::std::string::String;

use crate::trace::Trace;

/// The result of opening a [`Parser`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Start<S, B> {
    /// Ready to consume input from this state.
    Pending(S),
    /// The parser needs no input at all.
    Done(B),
    /// The parser can never succeed (for example, a misconfigured
    /// combinator).
    Error(String),
}

/// The result of feeding one element to a [`Parser`], or of
/// [`extract`][Parser::extract]ing it at end of input.
///
/// The `usize` in the first three variants is the backtrack count: how many
/// of the most recently consumed elements the driver must re-feed. It never
/// exceeds the number of elements fed since the last `Partial`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStep<S, B> {
    /// Progress, committing consumed input up to `n` elements back.
    Partial(usize, S),
    /// Progress without commitment; `n` elements are rewound.
    Continue(usize, S),
    /// Success, rewinding the last `n` elements for whoever parses next.
    Done(usize, B),
    /// Failure. Wrapping combinators may still rewind and try something
    /// else if nothing was committed.
    Error(String),
}

/// An incremental, failable, backtracking consumer of stream elements.
///
/// Like a fold, a parser value is a reusable recipe;
/// [`initial`][Parser::initial] opens an independent run. Run one with
/// [`Stream::parse`][crate::stream::Stream::parse] or a
/// [`Driver`][crate::driver::Driver].
pub trait Parser {
    /// The element type consumed.
    type Input;
    /// The run's internal state, owned by the driver and threaded through
    /// each call.
    type State;
    /// The result type.
    type Output;

    /// Opens a run.
    fn initial(&mut self) -> Start<Self::State, Self::Output>;

    /// Consumes one element.
    fn step(&mut self, state: Self::State, input: Self::Input)
        -> ParseStep<Self::State, Self::Output>;

    /// Resolves a run whose input ended while still pending.
    ///
    /// Must not return [`ParseStep::Partial`].
    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, Self::Output>;

    /// Applies a closure to the parsed value.
    #[inline]
    fn map<B, G>(self, f: G) -> Map<Self, G>
    where
        Self: Sized,
        G: FnMut(Self::Output) -> B,
    {
        Map { inner: self, f }
    }

    /// Applies a closure to each input element before this parser sees it.
    #[inline]
    fn pre_map<A, G>(self, f: G) -> PreMap<A, Self, G>
    where
        Self: Sized,
        G: FnMut(A) -> Self::Input,
    {
        PreMap {
            inner: self,
            f,
            marker: PhantomData,
        }
    }

    /// Applies a fallible closure to the parsed value; an `Err` becomes a
    /// parse failure.
    ///
    /// ```rust
    /// use thresh::prelude::*;
    /// use thresh::{stream, token};
    ///
    /// let parser = token::any().try_map(|c: char| c.to_digit(10).ok_or("not a digit"));
    /// assert_eq!(stream::iter("7".chars()).parse(parser), Ok(7));
    /// ```
    #[inline]
    fn try_map<B, E, G>(self, f: G) -> TryMap<Self, G>
    where
        Self: Sized,
        G: FnMut(Self::Output) -> Result<B, E>,
        E: fmt::Display,
    {
        TryMap { inner: self, f }
    }

    /// Feeds only the input elements satisfying `pred`; the rest are
    /// consumed and ignored.
    ///
    /// Skipped elements are consumed without being committed, so an
    /// enclosing [`alt`][crate::combinator::alt] can still rewind across
    /// them.
    #[inline]
    fn filter<P>(self, pred: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Input) -> bool,
    {
        Filter { inner: self, pred }
    }

    /// Logs every `initial`/`step`/`extract` result to stderr under the
    /// `debug` feature; free otherwise.
    #[inline]
    fn traced(self, name: &'static str) -> Trace<Self>
    where
        Self: Sized,
    {
        Trace::new(self, name)
    }
}

/// Implementation of [`Parser::map`].
pub struct Map<P, G> {
    inner: P,
    f: G,
}

impl<B, P, G> Parser for Map<P, G>
where
    P: Parser,
    G: FnMut(P::Output) -> B,
{
    type Input = P::Input;
    type State = P::State;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> Start<P::State, B> {
        match self.inner.initial() {
            Start::Pending(s) => Start::Pending(s),
            Start::Done(b) => Start::Done((self.f)(b)),
            Start::Error(msg) => Start::Error(msg),
        }
    }

    #[inline]
    fn step(&mut self, state: P::State, input: P::Input) -> ParseStep<P::State, B> {
        match self.inner.step(state, input) {
            ParseStep::Partial(n, s) => ParseStep::Partial(n, s),
            ParseStep::Continue(n, s) => ParseStep::Continue(n, s),
            ParseStep::Done(n, b) => ParseStep::Done(n, (self.f)(b)),
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }

    #[inline]
    fn extract(&mut self, state: P::State) -> ParseStep<P::State, B> {
        match self.inner.extract(state) {
            ParseStep::Partial(n, s) => ParseStep::Partial(n, s),
            ParseStep::Continue(n, s) => ParseStep::Continue(n, s),
            ParseStep::Done(n, b) => ParseStep::Done(n, (self.f)(b)),
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }
}

/// Implementation of [`Parser::pre_map`].
pub struct PreMap<A, P, G> {
    inner: P,
    f: G,
    marker: PhantomData<A>,
}

impl<A, P, G> Parser for PreMap<A, P, G>
where
    P: Parser,
    G: FnMut(A) -> P::Input,
{
    type Input = A;
    type State = P::State;
    type Output = P::Output;

    #[inline]
    fn initial(&mut self) -> Start<P::State, P::Output> {
        self.inner.initial()
    }

    #[inline]
    fn step(&mut self, state: P::State, input: A) -> ParseStep<P::State, P::Output> {
        self.inner.step(state, (self.f)(input))
    }

    #[inline]
    fn extract(&mut self, state: P::State) -> ParseStep<P::State, P::Output> {
        self.inner.extract(state)
    }
}

/// Implementation of [`Parser::try_map`].
pub struct TryMap<P, G> {
    inner: P,
    f: G,
}

impl<B, E, P, G> TryMap<P, G>
where
    P: Parser,
    G: FnMut(P::Output) -> Result<B, E>,
    E: fmt::Display,
{
    fn convert(&mut self, step: ParseStep<P::State, P::Output>) -> ParseStep<P::State, B> {
        match step {
            ParseStep::Partial(n, s) => ParseStep::Partial(n, s),
            ParseStep::Continue(n, s) => ParseStep::Continue(n, s),
            ParseStep::Done(n, b) => match (self.f)(b) {
                Ok(b) => ParseStep::Done(n, b),
                Err(e) => ParseStep::Error(format!("try_map: {e}")),
            },
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }
}

impl<B, E, P, G> Parser for TryMap<P, G>
where
    P: Parser,
    G: FnMut(P::Output) -> Result<B, E>,
    E: fmt::Display,
{
    type Input = P::Input;
    type State = P::State;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> Start<P::State, B> {
        match self.inner.initial() {
            Start::Pending(s) => Start::Pending(s),
            Start::Done(b) => match (self.f)(b) {
                Ok(b) => Start::Done(b),
                Err(e) => Start::Error(format!("try_map: {e}")),
            },
            Start::Error(msg) => Start::Error(msg),
        }
    }

    #[inline]
    fn step(&mut self, state: P::State, input: P::Input) -> ParseStep<P::State, B> {
        let step = self.inner.step(state, input);
        self.convert(step)
    }

    #[inline]
    fn extract(&mut self, state: P::State) -> ParseStep<P::State, B> {
        let step = self.inner.extract(state);
        self.convert(step)
    }
}

/// Implementation of [`Parser::filter`].
pub struct Filter<P, F> {
    inner: P,
    pred: F,
}

impl<P, F> Parser for Filter<P, F>
where
    P: Parser,
    F: FnMut(&P::Input) -> bool,
{
    type Input = P::Input;
    type State = P::State;
    type Output = P::Output;

    #[inline]
    fn initial(&mut self) -> Start<P::State, P::Output> {
        self.inner.initial()
    }

    #[inline]
    fn step(&mut self, state: P::State, input: P::Input) -> ParseStep<P::State, P::Output> {
        if (self.pred)(&input) {
            self.inner.step(state, input)
        } else {
            ParseStep::Continue(0, state)
        }
    }

    #[inline]
    fn extract(&mut self, state: P::State) -> ParseStep<P::State, P::Output> {
        self.inner.extract(state)
    }
}
