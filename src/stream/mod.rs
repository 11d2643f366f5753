//! Pull-based streams with a three-way step protocol
//!
//! A [`Stream`] produces values on demand: each call to
//! [`step`][Stream::step] returns a [`Step`] that either yields a value,
//! skips (the stream advanced internal state without producing), or stops.
//! `Skip` is what lets transformers like [`filter`][Stream::filter] and
//! [`flat_map`][Stream::flat_map] stay non-recursive: they can make progress
//! without having an element to hand back.
//!
//! Transformers wrap a stream and are themselves streams, so pipelines
//! monomorphize into a single flat state machine:
//!
//! ```rust
//! use thresh::prelude::*;
//! use thresh::stream;
//!
//! let out: Vec<_> = stream::iter(0..6)
//!     .filter(|n| n % 2 == 0)
//!     .zip(stream::iter("abc".chars()))
//!     .to_vec();
//! assert_eq!(out, vec![(0, 'a'), (2, 'b'), (4, 'c')]);
//! ```
//!
//! Streams cannot fail. Side effects live in the closures handed to
//! combinators; anything fallible belongs in a [parser][crate::parser] run
//! with [`parse`][Stream::parse].

use core::marker::PhantomData;

use crate::fold::{Fold, FoldStep};

mod transform;
#[allow(clippy::module_name_repetitions)]
pub use transform::{
    Chain, Dedup, DedupBy, Enumerate, Filter, FilterMap, FlatMap, Intersperse, IntersperseSuffix,
    IntersperseSuffixWith, IntersperseWith, Map, Postscan, RollingMap, Scan, Skip, SkipWhile,
    Take, TakeWhile, Zip,
};

#[cfg(feature = "alloc")]
use crate::driver::{Driver, ParseMany};
#[cfg(feature = "alloc")]
use crate::error::ParseError;
#[cfg(feature = "alloc")]
use crate::lib::std::vec::Vec;
#[cfg(feature = "alloc")]
use crate::parser::Parser;

#[cfg(test)]
mod tests;

/// The result of pulling on a [`Stream`] once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    /// An element was produced.
    Yield(T),
    /// The stream advanced without producing; pull again.
    Skip,
    /// The stream is exhausted. Callers must not pull again.
    Stop,
}

/// A lazy sequence of values, driven by repeated [`step`][Stream::step]
/// calls.
///
/// The stream's state is the implementing value itself; `step` advances it
/// in place. All provided combinators return concrete adapter types so that
/// composed pipelines inline into one loop.
pub trait Stream {
    /// The element type.
    type Item;

    /// Pull once.
    fn step(&mut self) -> Step<Self::Item>;

    /// Applies a closure to every element.
    ///
    /// The closure may be effectful; it runs once per yielded element, in
    /// order.
    #[inline]
    fn map<B, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> B,
    {
        Map::new(self, f)
    }

    /// Keeps only the elements satisfying `pred`.
    ///
    /// ```rust
    /// use thresh::prelude::*;
    /// use thresh::stream;
    ///
    /// let evens: Vec<_> = stream::iter(0..5).filter(|n| n % 2 == 0).to_vec();
    /// assert_eq!(evens, vec![0, 2, 4]);
    /// ```
    #[inline]
    fn filter<F>(self, pred: F) -> Filter<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> bool,
    {
        Filter::new(self, pred)
    }

    /// Maps and filters in one pass; `None` results are dropped.
    ///
    /// `filter_map(|x| x)` flattens a stream of `Option`s.
    #[inline]
    fn filter_map<B, F>(self, f: F) -> FilterMap<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> Option<B>,
    {
        FilterMap::new(self, f)
    }

    /// Ends the stream after `n` elements.
    #[inline]
    fn take(self, n: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(self, n)
    }

    /// Ends the stream at the first element failing `pred`.
    #[inline]
    fn take_while<F>(self, pred: F) -> TakeWhile<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> bool,
    {
        TakeWhile::new(self, pred)
    }

    /// Discards the first `n` elements.
    #[doc(alias = "drop")]
    #[inline]
    fn skip(self, n: usize) -> Skip<Self>
    where
        Self: Sized,
    {
        Skip::new(self, n)
    }

    /// Discards the leading elements satisfying `pred`.
    #[doc(alias = "drop_while")]
    #[inline]
    fn skip_while<F>(self, pred: F) -> SkipWhile<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> bool,
    {
        SkipWhile::new(self, pred)
    }

    /// Runs a [`Fold`] over the stream, emitting every intermediate
    /// accumulator, starting with the initial one.
    ///
    /// The output has one more element than the input (unless the fold
    /// terminates early). Requires the fold's state to be `Clone` so the
    /// running accumulator can be observed without ending the fold.
    ///
    /// ```rust
    /// use thresh::prelude::*;
    /// use thresh::{fold, stream};
    ///
    /// let sums: Vec<i32> = stream::iter([1, 2, 3]).scan(fold::sum()).to_vec();
    /// assert_eq!(sums, vec![0, 1, 3, 6]);
    /// ```
    #[inline]
    fn scan<F>(self, fold: F) -> Scan<Self, F>
    where
        Self: Sized,
        F: Fold<Input = Self::Item>,
        F::State: Clone,
    {
        Scan::new(self, fold)
    }

    /// Like [`scan`][Stream::scan] but without the leading initial
    /// accumulator: one output per input.
    #[inline]
    fn postscan<F>(self, fold: F) -> Postscan<Self, F>
    where
        Self: Sized,
        F: Fold<Input = Self::Item>,
        F::State: Clone,
    {
        Postscan::new(self, fold)
    }

    /// Maps each element together with a reference to its predecessor.
    ///
    /// The first element is passed with `None`.
    #[inline]
    fn rolling_map<B, F>(self, f: F) -> RollingMap<Self, F>
    where
        Self: Sized,
        F: FnMut(Option<&Self::Item>, &Self::Item) -> B,
    {
        RollingMap::new(self, f)
    }

    /// Pairs each element with its index.
    #[doc(alias = "indexed")]
    #[inline]
    fn enumerate(self) -> Enumerate<Self>
    where
        Self: Sized,
    {
        Enumerate::new(self)
    }

    /// Yields `sep` between consecutive elements.
    #[inline]
    fn intersperse(self, sep: Self::Item) -> Intersperse<Self>
    where
        Self: Sized,
        Self::Item: Clone,
    {
        Intersperse::new(self, sep)
    }

    /// Yields `f()` between consecutive elements.
    #[inline]
    fn intersperse_with<F>(self, f: F) -> IntersperseWith<Self, F>
    where
        Self: Sized,
        F: FnMut() -> Self::Item,
    {
        IntersperseWith::new(self, f)
    }

    /// Yields `sep` after every element, including the last.
    #[inline]
    fn intersperse_suffix(self, sep: Self::Item) -> IntersperseSuffix<Self>
    where
        Self: Sized,
        Self::Item: Clone,
    {
        IntersperseSuffix::new(self, sep)
    }

    /// Yields `f()` after every element, including the last.
    #[inline]
    fn intersperse_suffix_with<F>(self, f: F) -> IntersperseSuffixWith<Self, F>
    where
        Self: Sized,
        F: FnMut() -> Self::Item,
    {
        IntersperseSuffixWith::new(self, f)
    }

    /// Drops consecutive equal elements, keeping the first of each run.
    #[doc(alias = "uniq")]
    #[inline]
    fn dedup(self) -> Dedup<Self>
    where
        Self: Sized,
        Self::Item: Clone + PartialEq,
    {
        Dedup::new(self)
    }

    /// Drops consecutive elements equal under `eq`, keeping the first of
    /// each run.
    #[inline]
    fn dedup_by<F>(self, eq: F) -> DedupBy<Self, F>
    where
        Self: Sized,
        Self::Item: Clone,
        F: FnMut(&Self::Item, &Self::Item) -> bool,
    {
        DedupBy::new(self, eq)
    }

    /// Yields all of `self`, then all of `other`.
    #[doc(alias = "append")]
    #[inline]
    fn chain<S>(self, other: S) -> Chain<Self, S>
    where
        Self: Sized,
        S: Stream<Item = Self::Item>,
    {
        Chain::new(self, other)
    }

    /// Maps each element to a stream and flattens the results in order.
    ///
    /// ```rust
    /// use thresh::prelude::*;
    /// use thresh::stream;
    ///
    /// let out: Vec<_> = stream::iter([1, 2, 3])
    ///     .flat_map(|n| stream::replicate(n, n))
    ///     .to_vec();
    /// assert_eq!(out, vec![1, 2, 2, 3, 3, 3]);
    /// ```
    #[doc(alias = "concat_map")]
    #[inline]
    fn flat_map<S, F>(self, f: F) -> FlatMap<Self, S, F>
    where
        Self: Sized,
        S: Stream,
        F: FnMut(Self::Item) -> S,
    {
        FlatMap::new(self, f)
    }

    /// Advances two streams in lockstep, yielding pairs; ends when either
    /// stops.
    #[inline]
    fn zip<S>(self, other: S) -> Zip<Self, S>
    where
        Self: Sized,
        S: Stream,
    {
        Zip::new(self, other)
    }

    /// Pulls the stream to completion, discarding every element.
    #[inline]
    fn drain(mut self)
    where
        Self: Sized,
    {
        loop {
            if let Step::Stop = self.step() {
                return;
            }
        }
    }

    /// Collects the stream into a `Vec`.
    #[cfg(feature = "alloc")]
    #[inline]
    fn to_vec(mut self) -> Vec<Self::Item>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        loop {
            match self.step() {
                Step::Yield(a) => out.push(a),
                Step::Skip => {}
                Step::Stop => return out,
            }
        }
    }

    /// Runs a [`Fold`] over the stream and returns its output.
    ///
    /// The fold may terminate early; remaining input is left unpulled.
    fn fold<F>(mut self, mut fold: F) -> F::Output
    where
        Self: Sized,
        F: Fold<Input = Self::Item>,
    {
        let mut state = match fold.initial() {
            FoldStep::Partial(s) => s,
            FoldStep::Done(b) => return b,
        };
        loop {
            match self.step() {
                Step::Yield(a) => match fold.step(state, a) {
                    FoldStep::Partial(s) => state = s,
                    FoldStep::Done(b) => return b,
                },
                Step::Skip => {}
                Step::Stop => return fold.extract(state),
            }
        }
    }

    /// Runs a [`Parser`] over the stream.
    ///
    /// One-shot form of [`Driver::parse`][crate::driver::Driver::parse];
    /// input past what the parser consumed is discarded.
    ///
    /// ```rust
    /// use thresh::prelude::*;
    /// use thresh::{fold, stream, token};
    ///
    /// let head = stream::iter([0, 0, 1, 0]).parse(token::take_while(|n| *n == 0, fold::to_vec()));
    /// assert_eq!(head, Ok(vec![0, 0]));
    /// ```
    #[cfg(feature = "alloc")]
    #[inline]
    fn parse<P>(self, mut parser: P) -> Result<P::Output, ParseError>
    where
        Self: Sized,
        Self::Item: Clone,
        P: Parser<Input = Self::Item>,
    {
        Driver::new(self).parse(&mut parser)
    }

    /// Applies a parser repeatedly, yielding one `Result` per parse.
    ///
    /// Each round resumes from the input the previous round left behind.
    /// The returned stream ends when the input is exhausted, or after
    /// yielding the first `Err`.
    #[cfg(feature = "alloc")]
    #[inline]
    fn parse_many<P>(self, parser: P) -> ParseMany<Self, P>
    where
        Self: Sized,
        Self::Item: Clone,
        P: Parser<Input = Self::Item>,
    {
        ParseMany::new(self, parser)
    }
}

/// A stream pulling from any [`IntoIterator`].
///
/// This is the bridge from ordinary Rust collections and ranges:
/// `iter(vec![1, 2, 3])`, `iter(0..10)`, `iter("abc".chars())`.
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Iter<I> {
    iter: I,
}

impl<I: Iterator> Stream for Iter<I> {
    type Item = I::Item;

    #[inline]
    fn step(&mut self) -> Step<I::Item> {
        match self.iter.next() {
            Some(a) => Step::Yield(a),
            None => Step::Stop,
        }
    }
}

/// Converts an [`IntoIterator`] into a stream.
#[doc(alias = "from_list")]
#[inline]
pub fn iter<I: IntoIterator>(i: I) -> Iter<I::IntoIter> {
    Iter {
        iter: i.into_iter(),
    }
}

/// See [`unfold`].
#[must_use = "streams do nothing unless pulled"]
pub struct Unfold<S, F> {
    state: Option<S>,
    f: F,
}

impl<S, T, F> Stream for Unfold<S, F>
where
    F: FnMut(S) -> Option<(T, S)>,
{
    type Item = T;

    #[inline]
    fn step(&mut self) -> Step<T> {
        match self.state.take() {
            None => Step::Stop,
            Some(s) => match (self.f)(s) {
                Some((a, next)) => {
                    self.state = Some(next);
                    Step::Yield(a)
                }
                None => Step::Stop,
            },
        }
    }
}

/// Builds a stream from a seed and a closure producing the next element and
/// seed, ending on `None`.
///
#[doc(alias = "unfoldr")]
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::stream;
///
/// let powers: Vec<u32> = stream::unfold(1u32, |n| (n < 100).then(|| (n, n * 2))).to_vec();
/// assert_eq!(powers, vec![1, 2, 4, 8, 16, 32, 64]);
/// ```
#[inline]
pub fn unfold<S, T, F>(seed: S, f: F) -> Unfold<S, F>
where
    F: FnMut(S) -> Option<(T, S)>,
{
    Unfold {
        state: Some(seed),
        f,
    }
}

/// See [`generate`].
#[must_use = "streams do nothing unless pulled"]
pub struct Generate<S, F> {
    seed: S,
    f: F,
    done: bool,
}

impl<S, T, F> Stream for Generate<S, F>
where
    F: FnMut(&mut S) -> Step<T>,
{
    type Item = T;

    #[inline]
    fn step(&mut self) -> Step<T> {
        if self.done {
            return Step::Stop;
        }
        let step = (self.f)(&mut self.seed);
        if let Step::Stop = step {
            self.done = true;
        }
        step
    }
}

/// The minimal stream constructor: a seed plus a full step function.
///
/// Unlike [`unfold`], the closure has access to the whole [`Step`] protocol
/// and may `Skip`. The stream is fused: after the closure returns `Stop` it
/// is not called again.
#[inline]
pub fn generate<S, T, F>(seed: S, f: F) -> Generate<S, F>
where
    F: FnMut(&mut S) -> Step<T>,
{
    Generate {
        seed,
        f,
        done: false,
    }
}

/// See [`empty`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Empty<T> {
    marker: PhantomData<T>,
}

impl<T> Stream for Empty<T> {
    type Item = T;

    #[inline]
    fn step(&mut self) -> Step<T> {
        Step::Stop
    }
}

/// A stream with no elements.
#[inline]
pub fn empty<T>() -> Empty<T> {
    Empty {
        marker: PhantomData,
    }
}

/// See [`once`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Once<T> {
    item: Option<T>,
}

impl<T> Stream for Once<T> {
    type Item = T;

    #[inline]
    fn step(&mut self) -> Step<T> {
        match self.item.take() {
            Some(a) => Step::Yield(a),
            None => Step::Stop,
        }
    }
}

/// A stream of exactly one element.
#[inline]
pub fn once<T>(item: T) -> Once<T> {
    Once { item: Some(item) }
}

/// See [`repeat`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Repeat<T> {
    item: T,
}

impl<T: Clone> Stream for Repeat<T> {
    type Item = T;

    #[inline]
    fn step(&mut self) -> Step<T> {
        Step::Yield(self.item.clone())
    }
}

/// An endless stream of clones of `item`. Bound it with
/// [`take`][Stream::take].
#[inline]
pub fn repeat<T: Clone>(item: T) -> Repeat<T> {
    Repeat { item }
}

/// See [`repeat_with`].
#[must_use = "streams do nothing unless pulled"]
pub struct RepeatWith<F> {
    f: F,
}

impl<T, F: FnMut() -> T> Stream for RepeatWith<F> {
    type Item = T;

    #[inline]
    fn step(&mut self) -> Step<T> {
        Step::Yield((self.f)())
    }
}

/// An endless stream produced by running an action once per pull.
#[inline]
pub fn repeat_with<T, F: FnMut() -> T>(f: F) -> RepeatWith<F> {
    RepeatWith { f }
}

/// See [`replicate`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Replicate<T> {
    item: T,
    remaining: usize,
}

impl<T: Clone> Stream for Replicate<T> {
    type Item = T;

    #[inline]
    fn step(&mut self) -> Step<T> {
        if self.remaining == 0 {
            return Step::Stop;
        }
        self.remaining -= 1;
        Step::Yield(self.item.clone())
    }
}

/// A stream of `n` clones of `item`.
#[inline]
pub fn replicate<T: Clone>(n: usize, item: T) -> Replicate<T> {
    Replicate { item, remaining: n }
}
