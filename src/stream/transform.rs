//! Adapter types returned by the [`Stream`] combinator methods
//!
//! Each adapter owns its inner stream plus whatever extra state the
//! transformation needs, so a composed pipeline is one flat struct.

use crate::fold::{Fold, FoldStep};
use crate::lib::std::mem;
use crate::stream::{Step, Stream};

/// Implementation of [`Stream::map`].
#[must_use = "streams do nothing unless pulled"]
pub struct Map<S, F> {
    stream: S,
    f: F,
}

impl<S, F> Map<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        Self { stream, f }
    }
}

impl<S, B, F> Stream for Map<S, F>
where
    S: Stream,
    F: FnMut(S::Item) -> B,
{
    type Item = B;

    #[inline]
    fn step(&mut self) -> Step<B> {
        match self.stream.step() {
            Step::Yield(a) => Step::Yield((self.f)(a)),
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::filter`].
#[must_use = "streams do nothing unless pulled"]
pub struct Filter<S, F> {
    stream: S,
    pred: F,
}

impl<S, F> Filter<S, F> {
    pub(crate) fn new(stream: S, pred: F) -> Self {
        Self { stream, pred }
    }
}

impl<S, F> Stream for Filter<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        match self.stream.step() {
            Step::Yield(a) => {
                if (self.pred)(&a) {
                    Step::Yield(a)
                } else {
                    Step::Skip
                }
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::filter_map`].
#[must_use = "streams do nothing unless pulled"]
pub struct FilterMap<S, F> {
    stream: S,
    f: F,
}

impl<S, F> FilterMap<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        Self { stream, f }
    }
}

impl<S, B, F> Stream for FilterMap<S, F>
where
    S: Stream,
    F: FnMut(S::Item) -> Option<B>,
{
    type Item = B;

    #[inline]
    fn step(&mut self) -> Step<B> {
        match self.stream.step() {
            Step::Yield(a) => match (self.f)(a) {
                Some(b) => Step::Yield(b),
                None => Step::Skip,
            },
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::take`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Take<S> {
    stream: S,
    remaining: usize,
}

impl<S> Take<S> {
    pub(crate) fn new(stream: S, n: usize) -> Self {
        Self {
            stream,
            remaining: n,
        }
    }
}

impl<S: Stream> Stream for Take<S> {
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        if self.remaining == 0 {
            return Step::Stop;
        }
        match self.stream.step() {
            Step::Yield(a) => {
                self.remaining -= 1;
                Step::Yield(a)
            }
            Step::Skip => Step::Skip,
            Step::Stop => {
                self.remaining = 0;
                Step::Stop
            }
        }
    }
}

/// Implementation of [`Stream::take_while`].
#[must_use = "streams do nothing unless pulled"]
pub struct TakeWhile<S, F> {
    stream: S,
    pred: F,
    done: bool,
}

impl<S, F> TakeWhile<S, F> {
    pub(crate) fn new(stream: S, pred: F) -> Self {
        Self {
            stream,
            pred,
            done: false,
        }
    }
}

impl<S, F> Stream for TakeWhile<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        if self.done {
            return Step::Stop;
        }
        match self.stream.step() {
            Step::Yield(a) => {
                if (self.pred)(&a) {
                    Step::Yield(a)
                } else {
                    self.done = true;
                    Step::Stop
                }
            }
            Step::Skip => Step::Skip,
            Step::Stop => {
                self.done = true;
                Step::Stop
            }
        }
    }
}

/// Implementation of [`Stream::skip`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Skip<S> {
    stream: S,
    remaining: usize,
}

impl<S> Skip<S> {
    pub(crate) fn new(stream: S, n: usize) -> Self {
        Self {
            stream,
            remaining: n,
        }
    }
}

impl<S: Stream> Stream for Skip<S> {
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        match self.stream.step() {
            Step::Yield(a) => {
                if self.remaining == 0 {
                    Step::Yield(a)
                } else {
                    self.remaining -= 1;
                    Step::Skip
                }
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::skip_while`].
#[must_use = "streams do nothing unless pulled"]
pub struct SkipWhile<S, F> {
    stream: S,
    pred: F,
    dropping: bool,
}

impl<S, F> SkipWhile<S, F> {
    pub(crate) fn new(stream: S, pred: F) -> Self {
        Self {
            stream,
            pred,
            dropping: true,
        }
    }
}

impl<S, F> Stream for SkipWhile<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        match self.stream.step() {
            Step::Yield(a) => {
                if self.dropping {
                    if (self.pred)(&a) {
                        return Step::Skip;
                    }
                    self.dropping = false;
                }
                Step::Yield(a)
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

enum ScanPhase<St> {
    Init,
    Running(St),
    Finished,
}

/// Implementation of [`Stream::scan`].
#[must_use = "streams do nothing unless pulled"]
pub struct Scan<S, F: Fold> {
    stream: S,
    fold: F,
    phase: ScanPhase<F::State>,
}

impl<S, F: Fold> Scan<S, F> {
    pub(crate) fn new(stream: S, fold: F) -> Self {
        Self {
            stream,
            fold,
            phase: ScanPhase::Init,
        }
    }
}

impl<S, F> Stream for Scan<S, F>
where
    S: Stream,
    F: Fold<Input = S::Item>,
    F::State: Clone,
{
    type Item = F::Output;

    fn step(&mut self) -> Step<F::Output> {
        match mem::replace(&mut self.phase, ScanPhase::Finished) {
            ScanPhase::Init => match self.fold.initial() {
                FoldStep::Partial(s) => {
                    let out = self.fold.extract(s.clone());
                    self.phase = ScanPhase::Running(s);
                    Step::Yield(out)
                }
                FoldStep::Done(b) => Step::Yield(b),
            },
            ScanPhase::Running(s) => match self.stream.step() {
                Step::Yield(a) => match self.fold.step(s, a) {
                    FoldStep::Partial(next) => {
                        let out = self.fold.extract(next.clone());
                        self.phase = ScanPhase::Running(next);
                        Step::Yield(out)
                    }
                    FoldStep::Done(b) => Step::Yield(b),
                },
                Step::Skip => {
                    self.phase = ScanPhase::Running(s);
                    Step::Skip
                }
                Step::Stop => Step::Stop,
            },
            ScanPhase::Finished => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::postscan`].
#[must_use = "streams do nothing unless pulled"]
pub struct Postscan<S, F: Fold> {
    stream: S,
    fold: F,
    phase: ScanPhase<F::State>,
}

impl<S, F: Fold> Postscan<S, F> {
    pub(crate) fn new(stream: S, fold: F) -> Self {
        Self {
            stream,
            fold,
            phase: ScanPhase::Init,
        }
    }
}

impl<S, F> Stream for Postscan<S, F>
where
    S: Stream,
    F: Fold<Input = S::Item>,
    F::State: Clone,
{
    type Item = F::Output;

    fn step(&mut self) -> Step<F::Output> {
        match mem::replace(&mut self.phase, ScanPhase::Finished) {
            ScanPhase::Init => match self.fold.initial() {
                FoldStep::Partial(s) => {
                    self.phase = ScanPhase::Running(s);
                    Step::Skip
                }
                FoldStep::Done(b) => Step::Yield(b),
            },
            ScanPhase::Running(s) => match self.stream.step() {
                Step::Yield(a) => match self.fold.step(s, a) {
                    FoldStep::Partial(next) => {
                        let out = self.fold.extract(next.clone());
                        self.phase = ScanPhase::Running(next);
                        Step::Yield(out)
                    }
                    FoldStep::Done(b) => Step::Yield(b),
                },
                Step::Skip => {
                    self.phase = ScanPhase::Running(s);
                    Step::Skip
                }
                Step::Stop => Step::Stop,
            },
            ScanPhase::Finished => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::rolling_map`].
#[must_use = "streams do nothing unless pulled"]
pub struct RollingMap<S: Stream, F> {
    stream: S,
    f: F,
    prev: Option<S::Item>,
}

impl<S: Stream, F> RollingMap<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        Self {
            stream,
            f,
            prev: None,
        }
    }
}

impl<S, B, F> Stream for RollingMap<S, F>
where
    S: Stream,
    F: FnMut(Option<&S::Item>, &S::Item) -> B,
{
    type Item = B;

    #[inline]
    fn step(&mut self) -> Step<B> {
        match self.stream.step() {
            Step::Yield(a) => {
                let out = (self.f)(self.prev.as_ref(), &a);
                self.prev = Some(a);
                Step::Yield(out)
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::enumerate`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Enumerate<S> {
    stream: S,
    index: usize,
}

impl<S> Enumerate<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self { stream, index: 0 }
    }
}

impl<S: Stream> Stream for Enumerate<S> {
    type Item = (usize, S::Item);

    #[inline]
    fn step(&mut self) -> Step<(usize, S::Item)> {
        match self.stream.step() {
            Step::Yield(a) => {
                let i = self.index;
                self.index += 1;
                Step::Yield((i, a))
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::intersperse`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Intersperse<S: Stream> {
    stream: S,
    sep: S::Item,
    pending: Option<S::Item>,
    started: bool,
}

impl<S: Stream> Intersperse<S> {
    pub(crate) fn new(stream: S, sep: S::Item) -> Self {
        Self {
            stream,
            sep,
            pending: None,
            started: false,
        }
    }
}

impl<S> Stream for Intersperse<S>
where
    S: Stream,
    S::Item: Clone,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        if let Some(a) = self.pending.take() {
            return Step::Yield(a);
        }
        match self.stream.step() {
            Step::Yield(a) => {
                if self.started {
                    self.pending = Some(a);
                    Step::Yield(self.sep.clone())
                } else {
                    self.started = true;
                    Step::Yield(a)
                }
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::intersperse_with`].
#[must_use = "streams do nothing unless pulled"]
pub struct IntersperseWith<S: Stream, F> {
    stream: S,
    f: F,
    pending: Option<S::Item>,
    started: bool,
}

impl<S: Stream, F> IntersperseWith<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        Self {
            stream,
            f,
            pending: None,
            started: false,
        }
    }
}

impl<S, F> Stream for IntersperseWith<S, F>
where
    S: Stream,
    F: FnMut() -> S::Item,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        if let Some(a) = self.pending.take() {
            return Step::Yield(a);
        }
        match self.stream.step() {
            Step::Yield(a) => {
                if self.started {
                    self.pending = Some(a);
                    Step::Yield((self.f)())
                } else {
                    self.started = true;
                    Step::Yield(a)
                }
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::intersperse_suffix`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct IntersperseSuffix<S: Stream> {
    stream: S,
    sep: S::Item,
    emit_sep: bool,
}

impl<S: Stream> IntersperseSuffix<S> {
    pub(crate) fn new(stream: S, sep: S::Item) -> Self {
        Self {
            stream,
            sep,
            emit_sep: false,
        }
    }
}

impl<S> Stream for IntersperseSuffix<S>
where
    S: Stream,
    S::Item: Clone,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        if self.emit_sep {
            self.emit_sep = false;
            return Step::Yield(self.sep.clone());
        }
        match self.stream.step() {
            Step::Yield(a) => {
                self.emit_sep = true;
                Step::Yield(a)
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::intersperse_suffix_with`].
#[must_use = "streams do nothing unless pulled"]
pub struct IntersperseSuffixWith<S, F> {
    stream: S,
    f: F,
    emit_sep: bool,
}

impl<S, F> IntersperseSuffixWith<S, F> {
    pub(crate) fn new(stream: S, f: F) -> Self {
        Self {
            stream,
            f,
            emit_sep: false,
        }
    }
}

impl<S, F> Stream for IntersperseSuffixWith<S, F>
where
    S: Stream,
    F: FnMut() -> S::Item,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        if self.emit_sep {
            self.emit_sep = false;
            return Step::Yield((self.f)());
        }
        match self.stream.step() {
            Step::Yield(a) => {
                self.emit_sep = true;
                Step::Yield(a)
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::dedup`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Dedup<S: Stream> {
    stream: S,
    last: Option<S::Item>,
}

impl<S: Stream> Dedup<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self { stream, last: None }
    }
}

impl<S> Stream for Dedup<S>
where
    S: Stream,
    S::Item: Clone + PartialEq,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        match self.stream.step() {
            Step::Yield(a) => match &self.last {
                Some(prev) if *prev == a => Step::Skip,
                _ => {
                    self.last = Some(a.clone());
                    Step::Yield(a)
                }
            },
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::dedup_by`].
#[must_use = "streams do nothing unless pulled"]
pub struct DedupBy<S: Stream, F> {
    stream: S,
    eq: F,
    last: Option<S::Item>,
}

impl<S: Stream, F> DedupBy<S, F> {
    pub(crate) fn new(stream: S, eq: F) -> Self {
        Self {
            stream,
            eq,
            last: None,
        }
    }
}

impl<S, F> Stream for DedupBy<S, F>
where
    S: Stream,
    S::Item: Clone,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    type Item = S::Item;

    #[inline]
    fn step(&mut self) -> Step<S::Item> {
        match self.stream.step() {
            Step::Yield(a) => match &self.last {
                Some(prev) if (self.eq)(prev, &a) => Step::Skip,
                _ => {
                    self.last = Some(a.clone());
                    Step::Yield(a)
                }
            },
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::chain`].
#[must_use = "streams do nothing unless pulled"]
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: Option<A>,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Self {
            first: Some(first),
            second,
        }
    }
}

impl<A, B> Stream for Chain<A, B>
where
    A: Stream,
    B: Stream<Item = A::Item>,
{
    type Item = A::Item;

    #[inline]
    fn step(&mut self) -> Step<A::Item> {
        if let Some(first) = &mut self.first {
            match first.step() {
                Step::Yield(a) => return Step::Yield(a),
                Step::Skip => return Step::Skip,
                Step::Stop => self.first = None,
            }
        }
        self.second.step()
    }
}

/// Implementation of [`Stream::flat_map`].
#[must_use = "streams do nothing unless pulled"]
pub struct FlatMap<S, Inner, F> {
    outer: S,
    f: F,
    inner: Option<Inner>,
}

impl<S, Inner, F> FlatMap<S, Inner, F> {
    pub(crate) fn new(outer: S, f: F) -> Self {
        Self {
            outer,
            f,
            inner: None,
        }
    }
}

impl<S, Inner, F> Stream for FlatMap<S, Inner, F>
where
    S: Stream,
    Inner: Stream,
    F: FnMut(S::Item) -> Inner,
{
    type Item = Inner::Item;

    #[inline]
    fn step(&mut self) -> Step<Inner::Item> {
        if let Some(inner) = &mut self.inner {
            match inner.step() {
                Step::Yield(b) => return Step::Yield(b),
                Step::Skip => return Step::Skip,
                Step::Stop => self.inner = None,
            }
        }
        match self.outer.step() {
            Step::Yield(a) => {
                self.inner = Some((self.f)(a));
                Step::Skip
            }
            Step::Skip => Step::Skip,
            Step::Stop => Step::Stop,
        }
    }
}

/// Implementation of [`Stream::zip`].
#[must_use = "streams do nothing unless pulled"]
pub struct Zip<A: Stream, B> {
    left: A,
    right: B,
    pending: Option<A::Item>,
}

impl<A: Stream, B> Zip<A, B> {
    pub(crate) fn new(left: A, right: B) -> Self {
        Self {
            left,
            right,
            pending: None,
        }
    }
}

impl<A, B> Stream for Zip<A, B>
where
    A: Stream,
    B: Stream,
{
    type Item = (A::Item, B::Item);

    #[inline]
    fn step(&mut self) -> Step<(A::Item, B::Item)> {
        let a = match self.pending.take() {
            Some(a) => a,
            None => match self.left.step() {
                Step::Yield(a) => a,
                Step::Skip => return Step::Skip,
                Step::Stop => return Step::Stop,
            },
        };
        match self.right.step() {
            Step::Yield(b) => Step::Yield((a, b)),
            Step::Skip => {
                self.pending = Some(a);
                Step::Skip
            }
            Step::Stop => Step::Stop,
        }
    }
}
