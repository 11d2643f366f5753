//! Incremental left folds with early termination
//!
//! A [`Fold`] is a reusable reduction recipe: [`initial`][Fold::initial]
//! opens a fresh run, [`step`][Fold::step] consumes one element, and
//! [`extract`][Fold::extract] finalizes whatever state is left. `step` may
//! finish the run early by returning [`FoldStep::Done`]; after that, neither
//! `step` nor `extract` is called again for that run.
//!
//! Folds are the universal sink of the crate: streams run them directly
//! ([`Stream::fold`][crate::stream::Stream::fold]), parsers wrap them
//! ([`from_fold`][crate::combinator::from_fold]) and the repetition
//! combinators collect into them.
//!
//! ```rust
//! use thresh::prelude::*;
//! use thresh::{fold, stream};
//!
//! let first_negative = stream::iter([3, 1, -2, 5]).fold(fold::one().filter(|n| *n < 0));
//! assert_eq!(first_negative, Some(-2));
//! ```
//!
//! Folds cannot fail. If a reduction needs to reject input, it belongs in a
//! parser.

use core::marker::PhantomData;
use core::ops::Add;

use crate::lib::std::mem;

#[cfg(feature = "alloc")]
use crate::lib::std::vec::Vec;

#[cfg(test)]
mod tests;

/// The result of opening or advancing a [`Fold`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldStep<S, B> {
    /// The run continues with this state.
    Partial(S),
    /// The run finished early with this output.
    Done(B),
}

/// A left-to-right reduction with owned state and early termination.
///
/// A fold value describes the reduction; calling
/// [`initial`][Fold::initial] again starts an independent run, which is how
/// the repetition combinators reuse one sink for many rounds.
pub trait Fold {
    /// The element type consumed.
    type Input;
    /// The run's internal state, owned by the caller and threaded through
    /// each call.
    type State;
    /// The result type.
    type Output;

    /// Opens a run. `Done` here means the fold needs no input at all.
    fn initial(&mut self) -> FoldStep<Self::State, Self::Output>;

    /// Consumes one element.
    fn step(&mut self, state: Self::State, input: Self::Input)
        -> FoldStep<Self::State, Self::Output>;

    /// Finalizes a run whose input ended while still partial.
    fn extract(&mut self, state: Self::State) -> Self::Output;

    /// Applies a closure to each input before it reaches this fold.
    #[doc(alias = "lmap")]
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

    /// Applies a closure to the output.
    #[doc(alias = "rmap")]
    #[inline]
    fn post_map<B, G>(self, f: G) -> PostMap<Self, G>
    where
        Self: Sized,
        G: FnMut(Self::Output) -> B,
    {
        PostMap { inner: self, f }
    }

    /// Feeds only the inputs satisfying `pred`.
    #[inline]
    fn filter<P>(self, pred: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Input) -> bool,
    {
        Filter { inner: self, pred }
    }

    /// Ends the run after at most `n` inputs.
    #[inline]
    fn take(self, n: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take { inner: self, n }
    }

    /// Runs `self` and `other` over every input, producing both outputs.
    ///
    /// The combined run finishes early only once both sides have; a side
    /// that finishes first keeps its output while the other continues.
    #[inline]
    fn tee<F>(self, other: F) -> Tee<Self, F>
    where
        Self: Sized,
        F: Fold<Input = Self::Input>,
        Self::Input: Clone,
    {
        Tee {
            left: self,
            right: other,
        }
    }

    /// Opens a run and hands back a [`Running`] handle for element-at-a-time
    /// use.
    #[inline]
    fn start(self) -> Running<Self>
    where
        Self: Sized,
    {
        Running::new(self)
    }
}

/// A fold built from three closures: open, step, finalize.
///
/// This is the primitive constructor; the named folds in this module are
/// usually more direct.
pub struct FromFn<A, FI, FS, FE> {
    initial: FI,
    step: FS,
    extract: FE,
    marker: PhantomData<A>,
}

impl<S, A, B, FI, FS, FE> Fold for FromFn<A, FI, FS, FE>
where
    FI: FnMut() -> FoldStep<S, B>,
    FS: FnMut(S, A) -> FoldStep<S, B>,
    FE: FnMut(S) -> B,
{
    type Input = A;
    type State = S;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> FoldStep<S, B> {
        (self.initial)()
    }

    #[inline]
    fn step(&mut self, state: S, input: A) -> FoldStep<S, B> {
        (self.step)(state, input)
    }

    #[inline]
    fn extract(&mut self, state: S) -> B {
        (self.extract)(state)
    }
}

/// Builds a fold from `initial`, `step`, and `extract` closures.
#[inline]
pub fn from_fn<S, A, B, FI, FS, FE>(initial: FI, step: FS, extract: FE) -> FromFn<A, FI, FS, FE>
where
    FI: FnMut() -> FoldStep<S, B>,
    FS: FnMut(S, A) -> FoldStep<S, B>,
    FE: FnMut(S) -> B,
{
    FromFn {
        initial,
        step,
        extract,
        marker: PhantomData,
    }
}

/// See [`foldl`].
#[derive(Debug, Clone)]
pub struct Foldl<A, B, F> {
    init: B,
    f: F,
    marker: PhantomData<A>,
}

impl<A, B: Clone, F: FnMut(B, A) -> B> Fold for Foldl<A, B, F> {
    type Input = A;
    type State = B;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> FoldStep<B, B> {
        FoldStep::Partial(self.init.clone())
    }

    #[inline]
    fn step(&mut self, acc: B, input: A) -> FoldStep<B, B> {
        FoldStep::Partial((self.f)(acc, input))
    }

    #[inline]
    fn extract(&mut self, acc: B) -> B {
        acc
    }
}

/// A classic strict left fold from an initial accumulator and a step
/// closure. Never terminates early.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{fold, stream};
///
/// let len = stream::iter("abc".chars()).fold(fold::foldl(0, |n, _| n + 1));
/// assert_eq!(len, 3);
/// ```
#[inline]
pub fn foldl<A, B: Clone, F: FnMut(B, A) -> B>(init: B, f: F) -> Foldl<A, B, F> {
    Foldl {
        init,
        f,
        marker: PhantomData,
    }
}

/// See [`drain`].
#[derive(Debug, Clone)]
pub struct Drain<A> {
    marker: PhantomData<A>,
}

impl<A> Fold for Drain<A> {
    type Input = A;
    type State = ();
    type Output = ();

    #[inline]
    fn initial(&mut self) -> FoldStep<(), ()> {
        FoldStep::Partial(())
    }

    #[inline]
    fn step(&mut self, (): (), _input: A) -> FoldStep<(), ()> {
        FoldStep::Partial(())
    }

    #[inline]
    fn extract(&mut self, (): ()) {}
}

/// Consumes and discards every input.
#[inline]
pub fn drain<A>() -> Drain<A> {
    Drain {
        marker: PhantomData,
    }
}

/// See [`to_vec`].
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct ToVec<A> {
    marker: PhantomData<A>,
}

#[cfg(feature = "alloc")]
impl<A> Fold for ToVec<A> {
    type Input = A;
    type State = Vec<A>;
    type Output = Vec<A>;

    #[inline]
    fn initial(&mut self) -> FoldStep<Vec<A>, Vec<A>> {
        FoldStep::Partial(Vec::new())
    }

    #[inline]
    fn step(&mut self, mut acc: Vec<A>, input: A) -> FoldStep<Vec<A>, Vec<A>> {
        acc.push(input);
        FoldStep::Partial(acc)
    }

    #[inline]
    fn extract(&mut self, acc: Vec<A>) -> Vec<A> {
        acc
    }
}

/// Collects every input into a `Vec`.
#[cfg(feature = "alloc")]
#[inline]
pub fn to_vec<A>() -> ToVec<A> {
    ToVec {
        marker: PhantomData,
    }
}

/// See [`length`].
#[derive(Debug, Clone)]
pub struct Length<A> {
    marker: PhantomData<A>,
}

impl<A> Fold for Length<A> {
    type Input = A;
    type State = usize;
    type Output = usize;

    #[inline]
    fn initial(&mut self) -> FoldStep<usize, usize> {
        FoldStep::Partial(0)
    }

    #[inline]
    fn step(&mut self, n: usize, _input: A) -> FoldStep<usize, usize> {
        FoldStep::Partial(n + 1)
    }

    #[inline]
    fn extract(&mut self, n: usize) -> usize {
        n
    }
}

/// Counts the inputs.
#[inline]
pub fn length<A>() -> Length<A> {
    Length {
        marker: PhantomData,
    }
}

/// See [`sum`].
#[derive(Debug, Clone)]
pub struct Sum<T> {
    marker: PhantomData<T>,
}

impl<T: Default + Add<Output = T>> Fold for Sum<T> {
    type Input = T;
    type State = T;
    type Output = T;

    #[inline]
    fn initial(&mut self) -> FoldStep<T, T> {
        FoldStep::Partial(T::default())
    }

    #[inline]
    fn step(&mut self, acc: T, input: T) -> FoldStep<T, T> {
        FoldStep::Partial(acc + input)
    }

    #[inline]
    fn extract(&mut self, acc: T) -> T {
        acc
    }
}

/// Adds the inputs onto `T::default()`.
#[inline]
pub fn sum<T: Default + Add<Output = T>>() -> Sum<T> {
    Sum {
        marker: PhantomData,
    }
}

/// See [`last`].
#[derive(Debug, Clone)]
pub struct Last<A> {
    marker: PhantomData<A>,
}

impl<A> Fold for Last<A> {
    type Input = A;
    type State = Option<A>;
    type Output = Option<A>;

    #[inline]
    fn initial(&mut self) -> FoldStep<Option<A>, Option<A>> {
        FoldStep::Partial(None)
    }

    #[inline]
    fn step(&mut self, _prev: Option<A>, input: A) -> FoldStep<Option<A>, Option<A>> {
        FoldStep::Partial(Some(input))
    }

    #[inline]
    fn extract(&mut self, acc: Option<A>) -> Option<A> {
        acc
    }
}

/// Keeps only the final input, if any.
#[inline]
pub fn last<A>() -> Last<A> {
    Last {
        marker: PhantomData,
    }
}

/// See [`one`].
#[derive(Debug, Clone)]
pub struct One<A> {
    marker: PhantomData<A>,
}

impl<A> Fold for One<A> {
    type Input = A;
    type State = ();
    type Output = Option<A>;

    #[inline]
    fn initial(&mut self) -> FoldStep<(), Option<A>> {
        FoldStep::Partial(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> FoldStep<(), Option<A>> {
        FoldStep::Done(Some(input))
    }

    #[inline]
    fn extract(&mut self, (): ()) -> Option<A> {
        None
    }
}

/// Takes the first input and finishes; `None` on empty input.
#[inline]
pub fn one<A>() -> One<A> {
    One {
        marker: PhantomData,
    }
}

/// See [`any`].
#[derive(Debug, Clone)]
pub struct Any<A, P> {
    pred: P,
    marker: PhantomData<A>,
}

impl<A, P: FnMut(&A) -> bool> Fold for Any<A, P> {
    type Input = A;
    type State = ();
    type Output = bool;

    #[inline]
    fn initial(&mut self) -> FoldStep<(), bool> {
        FoldStep::Partial(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> FoldStep<(), bool> {
        if (self.pred)(&input) {
            FoldStep::Done(true)
        } else {
            FoldStep::Partial(())
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> bool {
        false
    }
}

/// `true` as soon as any input satisfies `pred`; short-circuits.
#[inline]
pub fn any<A, P: FnMut(&A) -> bool>(pred: P) -> Any<A, P> {
    Any {
        pred,
        marker: PhantomData,
    }
}

/// See [`all`].
#[derive(Debug, Clone)]
pub struct All<A, P> {
    pred: P,
    marker: PhantomData<A>,
}

impl<A, P: FnMut(&A) -> bool> Fold for All<A, P> {
    type Input = A;
    type State = ();
    type Output = bool;

    #[inline]
    fn initial(&mut self) -> FoldStep<(), bool> {
        FoldStep::Partial(())
    }

    #[inline]
    fn step(&mut self, (): (), input: A) -> FoldStep<(), bool> {
        if (self.pred)(&input) {
            FoldStep::Partial(())
        } else {
            FoldStep::Done(false)
        }
    }

    #[inline]
    fn extract(&mut self, (): ()) -> bool {
        true
    }
}

/// `false` as soon as any input fails `pred`; short-circuits.
#[inline]
pub fn all<A, P: FnMut(&A) -> bool>(pred: P) -> All<A, P> {
    All {
        pred,
        marker: PhantomData,
    }
}

/// Implementation of [`Fold::pre_map`].
pub struct PreMap<A, F, G> {
    inner: F,
    f: G,
    marker: PhantomData<A>,
}

impl<A, F, G> Fold for PreMap<A, F, G>
where
    F: Fold,
    G: FnMut(A) -> F::Input,
{
    type Input = A;
    type State = F::State;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> FoldStep<F::State, F::Output> {
        self.inner.initial()
    }

    #[inline]
    fn step(&mut self, state: F::State, input: A) -> FoldStep<F::State, F::Output> {
        self.inner.step(state, (self.f)(input))
    }

    #[inline]
    fn extract(&mut self, state: F::State) -> F::Output {
        self.inner.extract(state)
    }
}

/// Implementation of [`Fold::post_map`].
pub struct PostMap<F, G> {
    inner: F,
    f: G,
}

impl<B, F, G> Fold for PostMap<F, G>
where
    F: Fold,
    G: FnMut(F::Output) -> B,
{
    type Input = F::Input;
    type State = F::State;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> FoldStep<F::State, B> {
        match self.inner.initial() {
            FoldStep::Partial(s) => FoldStep::Partial(s),
            FoldStep::Done(b) => FoldStep::Done((self.f)(b)),
        }
    }

    #[inline]
    fn step(&mut self, state: F::State, input: F::Input) -> FoldStep<F::State, B> {
        match self.inner.step(state, input) {
            FoldStep::Partial(s) => FoldStep::Partial(s),
            FoldStep::Done(b) => FoldStep::Done((self.f)(b)),
        }
    }

    #[inline]
    fn extract(&mut self, state: F::State) -> B {
        (self.f)(self.inner.extract(state))
    }
}

/// Implementation of [`Fold::filter`].
pub struct Filter<F, P> {
    inner: F,
    pred: P,
}

impl<F, P> Fold for Filter<F, P>
where
    F: Fold,
    P: FnMut(&F::Input) -> bool,
{
    type Input = F::Input;
    type State = F::State;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> FoldStep<F::State, F::Output> {
        self.inner.initial()
    }

    #[inline]
    fn step(&mut self, state: F::State, input: F::Input) -> FoldStep<F::State, F::Output> {
        if (self.pred)(&input) {
            self.inner.step(state, input)
        } else {
            FoldStep::Partial(state)
        }
    }

    #[inline]
    fn extract(&mut self, state: F::State) -> F::Output {
        self.inner.extract(state)
    }
}

/// Implementation of [`Fold::take`].
pub struct Take<F> {
    inner: F,
    n: usize,
}

impl<F: Fold> Fold for Take<F> {
    type Input = F::Input;
    type State = (usize, F::State);
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> FoldStep<(usize, F::State), F::Output> {
        match self.inner.initial() {
            FoldStep::Partial(s) => {
                if self.n == 0 {
                    FoldStep::Done(self.inner.extract(s))
                } else {
                    FoldStep::Partial((self.n, s))
                }
            }
            FoldStep::Done(b) => FoldStep::Done(b),
        }
    }

    #[inline]
    fn step(
        &mut self,
        (remaining, state): (usize, F::State),
        input: F::Input,
    ) -> FoldStep<(usize, F::State), F::Output> {
        match self.inner.step(state, input) {
            FoldStep::Partial(s) => {
                if remaining == 1 {
                    FoldStep::Done(self.inner.extract(s))
                } else {
                    FoldStep::Partial((remaining - 1, s))
                }
            }
            FoldStep::Done(b) => FoldStep::Done(b),
        }
    }

    #[inline]
    fn extract(&mut self, (_, state): (usize, F::State)) -> F::Output {
        self.inner.extract(state)
    }
}

/// One side of a [`Tee`] run.
#[derive(Debug, Clone)]
pub enum TeeSide<S, B> {
    /// Still consuming.
    Running(S),
    /// Finished early with this output.
    Finished(B),
}

/// Implementation of [`Fold::tee`].
pub struct Tee<F1, F2> {
    left: F1,
    right: F2,
}

impl<F1, F2> Fold for Tee<F1, F2>
where
    F1: Fold,
    F2: Fold<Input = F1::Input>,
    F1::Input: Clone,
{
    type Input = F1::Input;
    type State = (
        TeeSide<F1::State, F1::Output>,
        TeeSide<F2::State, F2::Output>,
    );
    type Output = (F1::Output, F2::Output);

    fn initial(&mut self) -> FoldStep<Self::State, Self::Output> {
        let left = match self.left.initial() {
            FoldStep::Partial(s) => TeeSide::Running(s),
            FoldStep::Done(b) => TeeSide::Finished(b),
        };
        let right = match self.right.initial() {
            FoldStep::Partial(s) => TeeSide::Running(s),
            FoldStep::Done(b) => TeeSide::Finished(b),
        };
        match (left, right) {
            (TeeSide::Finished(l), TeeSide::Finished(r)) => FoldStep::Done((l, r)),
            (left, right) => FoldStep::Partial((left, right)),
        }
    }

    fn step(&mut self, (left, right): Self::State, input: Self::Input) -> FoldStep<Self::State, Self::Output> {
        let left = match left {
            TeeSide::Running(s) => match self.left.step(s, input.clone()) {
                FoldStep::Partial(s) => TeeSide::Running(s),
                FoldStep::Done(b) => TeeSide::Finished(b),
            },
            finished => finished,
        };
        let right = match right {
            TeeSide::Running(s) => match self.right.step(s, input) {
                FoldStep::Partial(s) => TeeSide::Running(s),
                FoldStep::Done(b) => TeeSide::Finished(b),
            },
            finished => finished,
        };
        match (left, right) {
            (TeeSide::Finished(l), TeeSide::Finished(r)) => FoldStep::Done((l, r)),
            (left, right) => FoldStep::Partial((left, right)),
        }
    }

    fn extract(&mut self, (left, right): Self::State) -> Self::Output {
        let l = match left {
            TeeSide::Running(s) => self.left.extract(s),
            TeeSide::Finished(b) => b,
        };
        let r = match right {
            TeeSide::Running(s) => self.right.extract(s),
            TeeSide::Finished(b) => b,
        };
        (l, r)
    }
}

/// See [`postscan`].
pub struct Postscan<F1, F2> {
    scanner: F1,
    collector: F2,
}

impl<F1, F2> Fold for Postscan<F1, F2>
where
    F1: Fold,
    F1::State: Clone,
    F2: Fold<Input = F1::Output>,
{
    type Input = F1::Input;
    type State = (F1::State, F2::State);
    type Output = F2::Output;

    fn initial(&mut self) -> FoldStep<Self::State, Self::Output> {
        let collector = match self.collector.initial() {
            FoldStep::Partial(s) => s,
            FoldStep::Done(c) => return FoldStep::Done(c),
        };
        match self.scanner.initial() {
            FoldStep::Partial(s) => FoldStep::Partial((s, collector)),
            FoldStep::Done(b) => match self.collector.step(collector, b) {
                FoldStep::Partial(s2) => FoldStep::Done(self.collector.extract(s2)),
                FoldStep::Done(c) => FoldStep::Done(c),
            },
        }
    }

    fn step(&mut self, (scan, collect): Self::State, input: Self::Input) -> FoldStep<Self::State, Self::Output> {
        match self.scanner.step(scan, input) {
            FoldStep::Partial(s) => {
                let out = self.scanner.extract(s.clone());
                match self.collector.step(collect, out) {
                    FoldStep::Partial(c) => FoldStep::Partial((s, c)),
                    FoldStep::Done(c) => FoldStep::Done(c),
                }
            }
            FoldStep::Done(b) => match self.collector.step(collect, b) {
                FoldStep::Partial(c) => FoldStep::Done(self.collector.extract(c)),
                FoldStep::Done(c) => FoldStep::Done(c),
            },
        }
    }

    fn extract(&mut self, (_, collect): Self::State) -> Self::Output {
        self.collector.extract(collect)
    }
}

/// Folds the running outputs of `scanner` with `collector`.
///
/// Each input advances `scanner`; its intermediate accumulator (one per
/// input) is fed to `collector`. Requires the scanner's state to be `Clone`
/// so intermediates can be observed.
#[inline]
pub fn postscan<F1, F2>(scanner: F1, collector: F2) -> Postscan<F1, F2>
where
    F1: Fold,
    F1::State: Clone,
    F2: Fold<Input = F1::Output>,
{
    Postscan { scanner, collector }
}

enum RunState<S, B> {
    Going(S),
    Finished(B),
    Poisoned,
}

/// An opened fold run, pushed one element at a time.
///
/// Obtained from [`Fold::start`]. Elements pushed after the fold finished
/// early are discarded, honoring the protocol's promise that `step` is
/// never called after `Done`.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::fold;
///
/// let mut run = fold::sum().start();
/// for n in [1, 2, 3] {
///     run.push(n);
/// }
/// assert_eq!(run.finish(), 6);
/// ```
pub struct Running<F: Fold> {
    fold: F,
    state: RunState<F::State, F::Output>,
}

impl<F: Fold> Running<F> {
    fn new(mut fold: F) -> Self {
        let state = match fold.initial() {
            FoldStep::Partial(s) => RunState::Going(s),
            FoldStep::Done(b) => RunState::Finished(b),
        };
        Self { fold, state }
    }

    /// Feeds one element; a no-op once the fold has finished.
    pub fn push(&mut self, input: F::Input) {
        match mem::replace(&mut self.state, RunState::Poisoned) {
            RunState::Going(s) => {
                self.state = match self.fold.step(s, input) {
                    FoldStep::Partial(s) => RunState::Going(s),
                    FoldStep::Done(b) => RunState::Finished(b),
                };
            }
            finished => self.state = finished,
        }
    }

    /// Whether the fold terminated early.
    pub fn is_done(&self) -> bool {
        matches!(self.state, RunState::Finished(_))
    }

    /// Closes the run and returns the output.
    pub fn finish(self) -> F::Output {
        let Self { mut fold, state } = self;
        match state {
            RunState::Going(s) => fold.extract(s),
            RunState::Finished(b) => b,
            RunState::Poisoned => unreachable!("fold run poisoned by a panic in push"),
        }
    }
}
