//! Leaf parsers and single-wrapper combinators

use core::convert::Infallible;
use core::marker::PhantomData;

use crate::fold::{Fold, FoldStep};
use crate::lib::std::string::String;
use crate::parser::{ParseStep, Parser, Start};

/// See [`from_fold`].
pub struct FromFold<F> {
    fold: F,
}

impl<F: Fold> Parser for FromFold<F> {
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
        match self.fold.step(state, input) {
            FoldStep::Partial(s) => ParseStep::Partial(0, s),
            FoldStep::Done(b) => ParseStep::Done(0, b),
        }
    }

    #[inline]
    fn extract(&mut self, state: F::State) -> ParseStep<F::State, F::Output> {
        ParseStep::Done(0, self.fold.extract(state))
    }
}

/// Promotes a [`Fold`] to a parser that never fails and never backtracks.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{combinator, fold, stream};
///
/// let all = stream::iter([1, 2, 3]).parse(combinator::from_fold(fold::to_vec()));
/// assert_eq!(all, Ok(vec![1, 2, 3]));
/// ```
#[inline]
pub fn from_fold<F: Fold>(fold: F) -> FromFold<F> {
    FromFold { fold }
}

/// See [`success`].
#[derive(Debug, Clone)]
pub struct Success<A, B> {
    value: B,
    marker: PhantomData<A>,
}

impl<A, B: Clone> Parser for Success<A, B> {
    type Input = A;
    type State = Infallible;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> Start<Infallible, B> {
        Start::Done(self.value.clone())
    }

    #[inline]
    fn step(&mut self, state: Infallible, _input: A) -> ParseStep<Infallible, B> {
        match state {}
    }

    #[inline]
    fn extract(&mut self, state: Infallible) -> ParseStep<Infallible, B> {
        match state {}
    }
}

/// Succeeds with `value` without consuming anything.
#[doc(alias = "pure")]
#[inline]
pub fn success<A, B: Clone>(value: B) -> Success<A, B> {
    Success {
        value,
        marker: PhantomData,
    }
}

/// See [`success_with`].
#[derive(Debug, Clone)]
pub struct SuccessWith<A, G> {
    f: G,
    marker: PhantomData<A>,
}

impl<A, B, G: FnMut() -> B> Parser for SuccessWith<A, G> {
    type Input = A;
    type State = Infallible;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> Start<Infallible, B> {
        Start::Done((self.f)())
    }

    #[inline]
    fn step(&mut self, state: Infallible, _input: A) -> ParseStep<Infallible, B> {
        match state {}
    }

    #[inline]
    fn extract(&mut self, state: Infallible) -> ParseStep<Infallible, B> {
        match state {}
    }
}

/// Succeeds with the result of running `f`, consuming nothing.
#[inline]
pub fn success_with<A, B, G: FnMut() -> B>(f: G) -> SuccessWith<A, G> {
    SuccessWith {
        f,
        marker: PhantomData,
    }
}

/// See [`fail`].
#[derive(Debug, Clone)]
pub struct Fail<A, B> {
    message: String,
    marker: PhantomData<(A, B)>,
}

impl<A, B> Parser for Fail<A, B> {
    type Input = A;
    type State = Infallible;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> Start<Infallible, B> {
        Start::Error(self.message.clone())
    }

    #[inline]
    fn step(&mut self, state: Infallible, _input: A) -> ParseStep<Infallible, B> {
        match state {}
    }

    #[inline]
    fn extract(&mut self, state: Infallible) -> ParseStep<Infallible, B> {
        match state {}
    }
}

/// Fails with `message` without consuming anything.
#[inline]
pub fn fail<A, B>(message: impl Into<String>) -> Fail<A, B> {
    Fail {
        message: message.into(),
        marker: PhantomData,
    }
}

/// See [`fail_with`].
#[derive(Debug, Clone)]
pub struct FailWith<A, B, G> {
    f: G,
    marker: PhantomData<(A, B)>,
}

impl<A, B, G: FnMut() -> String> Parser for FailWith<A, B, G> {
    type Input = A;
    type State = Infallible;
    type Output = B;

    #[inline]
    fn initial(&mut self) -> Start<Infallible, B> {
        Start::Error((self.f)())
    }

    #[inline]
    fn step(&mut self, state: Infallible, _input: A) -> ParseStep<Infallible, B> {
        match state {}
    }

    #[inline]
    fn extract(&mut self, state: Infallible) -> ParseStep<Infallible, B> {
        match state {}
    }
}

/// Fails with the message produced by `f`, consuming nothing.
#[inline]
pub fn fail_with<A, B, G: FnMut() -> String>(f: G) -> FailWith<A, B, G> {
    FailWith {
        f,
        marker: PhantomData,
    }
}

/// See [`look_ahead`].
pub struct LookAhead<P> {
    parser: P,
}

impl<P: Parser> Parser for LookAhead<P> {
    type Input = P::Input;
    // Net elements consumed so far, plus the inner state.
    type State = (usize, P::State);
    type Output = P::Output;

    #[inline]
    fn initial(&mut self) -> Start<(usize, P::State), P::Output> {
        match self.parser.initial() {
            Start::Pending(s) => Start::Pending((0, s)),
            Start::Done(b) => Start::Done(b),
            Start::Error(msg) => Start::Error(msg),
        }
    }

    fn step(&mut self, (count, state): (usize, P::State), input: P::Input) -> ParseStep<(usize, P::State), P::Output> {
        let count = count + 1;
        match self.parser.step(state, input) {
            // Commits are downgraded so the whole run stays rewindable.
            ParseStep::Partial(n, s) | ParseStep::Continue(n, s) => {
                ParseStep::Continue(n, (count - n, s))
            }
            // Hand back everything the inner parser consumed; `count`
            // already covers whatever it wanted rewound.
            ParseStep::Done(_, b) => ParseStep::Done(count, b),
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }

    fn extract(&mut self, _state: (usize, P::State)) -> ParseStep<(usize, P::State), P::Output> {
        ParseStep::Error(String::from("look_ahead: unexpected end of input"))
    }
}

/// Runs `parser` and rewinds all the input it consumed, so a success peeks
/// without consuming. Inner commits are suppressed. Strict about input:
/// reaching end of input mid-parse fails even if the inner parser could
/// finish.
#[inline]
pub fn look_ahead<P: Parser>(parser: P) -> LookAhead<P> {
    LookAhead { parser }
}

/// See [`take_p`].
pub struct TakeP<P> {
    limit: usize,
    parser: P,
}

impl<P: Parser> TakeP<P> {
    /// The inner parser hit the element budget and must settle for what it
    /// has, unless it frees budget by rewinding.
    fn force(
        &mut self,
        count: usize,
        state: P::State,
    ) -> ParseStep<(usize, P::State), P::Output> {
        match self.parser.extract(state) {
            ParseStep::Done(n, b) => ParseStep::Done(n, b),
            ParseStep::Continue(n, s) => {
                if n == 0 {
                    ParseStep::Error(format!(
                        "take_p: parser needs more than {} elements",
                        self.limit
                    ))
                } else {
                    ParseStep::Continue(n, (count - n, s))
                }
            }
            ParseStep::Error(msg) => ParseStep::Error(msg),
            ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
        }
    }
}

impl<P: Parser> Parser for TakeP<P> {
    type Input = P::Input;
    // Net elements consumed by the inner parser, plus its state.
    type State = (usize, P::State);
    type Output = P::Output;

    fn initial(&mut self) -> Start<(usize, P::State), P::Output> {
        match self.parser.initial() {
            Start::Pending(s) => {
                if self.limit == 0 {
                    match self.parser.extract(s) {
                        ParseStep::Done(_, b) => Start::Done(b),
                        ParseStep::Error(msg) => Start::Error(msg),
                        ParseStep::Continue(..) => Start::Error(String::from(
                            "take_p: parser needs more than 0 elements",
                        )),
                        ParseStep::Partial(..) => {
                            panic!("parser returned Partial from extract")
                        }
                    }
                } else {
                    Start::Pending((0, s))
                }
            }
            Start::Done(b) => Start::Done(b),
            Start::Error(msg) => Start::Error(msg),
        }
    }

    fn step(&mut self, (count, state): (usize, P::State), input: P::Input) -> ParseStep<(usize, P::State), P::Output> {
        let count = count + 1;
        match self.parser.step(state, input) {
            ParseStep::Partial(n, s) => {
                let count = count - n;
                if count == self.limit {
                    self.force(count, s)
                } else {
                    ParseStep::Partial(n, (count, s))
                }
            }
            ParseStep::Continue(n, s) => {
                let count = count - n;
                if count == self.limit {
                    self.force(count, s)
                } else {
                    ParseStep::Continue(n, (count, s))
                }
            }
            ParseStep::Done(n, b) => ParseStep::Done(n, b),
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }

    fn extract(&mut self, (count, state): (usize, P::State)) -> ParseStep<(usize, P::State), P::Output> {
        match self.parser.extract(state) {
            ParseStep::Done(n, b) => ParseStep::Done(n, b),
            ParseStep::Continue(n, s) => ParseStep::Continue(n, (count - n, s)),
            ParseStep::Error(msg) => ParseStep::Error(msg),
            ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
        }
    }
}

/// Caps `parser` to at most `limit` consumed elements; at the cap the
/// parser is finalized on what it has (it may still rewind to free
/// budget).
#[inline]
pub fn take_p<P: Parser>(limit: usize, parser: P) -> TakeP<P> {
    TakeP { limit, parser }
}

/// State of [`split_with`]: which of the two parsers is running.
pub enum SplitState<S1, B1, S2> {
    /// The first parser is running.
    First(S1),
    /// The first output is banked; the second parser is running.
    Second(B1, S2),
}

/// See [`split_with`].
pub struct SplitWith<G, P1, P2> {
    f: G,
    first: P1,
    second: P2,
}

impl<B, G, P1, P2> SplitWith<G, P1, P2>
where
    P1: Parser,
    P2: Parser<Input = P1::Input>,
    G: FnMut(P1::Output, P2::Output) -> B,
{
    /// The first parser finished with `n` to rewind; line up the second.
    fn hand_over(
        &mut self,
        n: usize,
        a: P1::Output,
    ) -> ParseStep<SplitState<P1::State, P1::Output, P2::State>, B> {
        match self.second.initial() {
            Start::Pending(s2) => ParseStep::Continue(n, SplitState::Second(a, s2)),
            Start::Done(b) => ParseStep::Done(n, (self.f)(a, b)),
            Start::Error(msg) => ParseStep::Error(msg),
        }
    }
}

impl<B, G, P1, P2> Parser for SplitWith<G, P1, P2>
where
    P1: Parser,
    P2: Parser<Input = P1::Input>,
    G: FnMut(P1::Output, P2::Output) -> B,
{
    type Input = P1::Input;
    type State = SplitState<P1::State, P1::Output, P2::State>;
    type Output = B;

    fn initial(&mut self) -> Start<Self::State, B> {
        match self.first.initial() {
            Start::Pending(s) => Start::Pending(SplitState::First(s)),
            Start::Done(a) => match self.second.initial() {
                Start::Pending(s2) => Start::Pending(SplitState::Second(a, s2)),
                Start::Done(b) => Start::Done((self.f)(a, b)),
                Start::Error(msg) => Start::Error(msg),
            },
            Start::Error(msg) => Start::Error(msg),
        }
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, B> {
        match state {
            SplitState::First(s) => match self.first.step(s, input) {
                ParseStep::Partial(n, s) => ParseStep::Partial(n, SplitState::First(s)),
                ParseStep::Continue(n, s) => ParseStep::Continue(n, SplitState::First(s)),
                ParseStep::Done(n, a) => self.hand_over(n, a),
                ParseStep::Error(msg) => ParseStep::Error(msg),
            },
            SplitState::Second(a, s) => match self.second.step(s, input) {
                ParseStep::Partial(n, s) => ParseStep::Partial(n, SplitState::Second(a, s)),
                ParseStep::Continue(n, s) => ParseStep::Continue(n, SplitState::Second(a, s)),
                ParseStep::Done(n, b) => ParseStep::Done(n, (self.f)(a, b)),
                ParseStep::Error(msg) => ParseStep::Error(msg),
            },
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, B> {
        match state {
            SplitState::First(s) => match self.first.extract(s) {
                ParseStep::Done(n, a) => {
                    if n > 0 {
                        // The rewound elements belong to the second parser;
                        // resume feeding them through it.
                        self.hand_over(n, a)
                    } else {
                        match self.second.initial() {
                            Start::Pending(s2) => match self.second.extract(s2) {
                                ParseStep::Done(m, b) => ParseStep::Done(m, (self.f)(a, b)),
                                ParseStep::Continue(m, s2) => {
                                    ParseStep::Continue(m, SplitState::Second(a, s2))
                                }
                                ParseStep::Error(msg) => ParseStep::Error(msg),
                                ParseStep::Partial(..) => {
                                    panic!("parser returned Partial from extract")
                                }
                            },
                            Start::Done(b) => ParseStep::Done(0, (self.f)(a, b)),
                            Start::Error(msg) => ParseStep::Error(msg),
                        }
                    }
                }
                ParseStep::Continue(n, s) => ParseStep::Continue(n, SplitState::First(s)),
                ParseStep::Error(msg) => ParseStep::Error(msg),
                ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
            },
            SplitState::Second(a, s) => match self.second.extract(s) {
                ParseStep::Partial(n, s) => ParseStep::Partial(n, SplitState::Second(a, s)),
                ParseStep::Continue(n, s) => ParseStep::Continue(n, SplitState::Second(a, s)),
                ParseStep::Done(n, b) => ParseStep::Done(n, (self.f)(a, b)),
                ParseStep::Error(msg) => ParseStep::Error(msg),
            },
        }
    }
}

/// Runs `first` then `second` over consecutive input and combines their
/// outputs with `f`.
#[inline]
pub fn split_with<B, G, P1, P2>(f: G, first: P1, second: P2) -> SplitWith<G, P1, P2>
where
    P1: Parser,
    P2: Parser<Input = P1::Input>,
    G: FnMut(P1::Output, P2::Output) -> B,
{
    SplitWith { f, first, second }
}

/// State of [`alt`].
pub enum AltState<S1, S2> {
    /// Trying the first branch.
    First {
        /// Inner state.
        state: S1,
        /// Net elements the first branch has consumed.
        consumed: usize,
        /// Whether the first branch has committed; if so, no fallback.
        committed: bool,
    },
    /// The first branch failed cleanly; running the second.
    Second(S2),
}

/// See [`alt`].
pub struct Alt<P1, P2> {
    first: P1,
    second: P2,
}

impl<P1, P2> Alt<P1, P2>
where
    P1: Parser,
    P2: Parser<Input = P1::Input, Output = P1::Output>,
{
    /// The first branch failed without committing; rewind everything it
    /// consumed and bring up the second.
    fn fall_back(
        &mut self,
        consumed: usize,
    ) -> ParseStep<AltState<P1::State, P2::State>, P1::Output> {
        match self.second.initial() {
            Start::Pending(s2) => ParseStep::Continue(consumed, AltState::Second(s2)),
            Start::Done(b) => ParseStep::Done(consumed, b),
            Start::Error(msg) => ParseStep::Error(msg),
        }
    }
}

impl<P1, P2> Parser for Alt<P1, P2>
where
    P1: Parser,
    P2: Parser<Input = P1::Input, Output = P1::Output>,
{
    type Input = P1::Input;
    type State = AltState<P1::State, P2::State>;
    type Output = P1::Output;

    fn initial(&mut self) -> Start<Self::State, Self::Output> {
        match self.first.initial() {
            Start::Pending(state) => Start::Pending(AltState::First {
                state,
                consumed: 0,
                committed: false,
            }),
            Start::Done(b) => Start::Done(b),
            Start::Error(_) => match self.second.initial() {
                Start::Pending(s2) => Start::Pending(AltState::Second(s2)),
                Start::Done(b) => Start::Done(b),
                Start::Error(msg) => Start::Error(msg),
            },
        }
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, Self::Output> {
        match state {
            AltState::First {
                state,
                consumed,
                committed,
            } => {
                let consumed = consumed + 1;
                match self.first.step(state, input) {
                    ParseStep::Partial(n, state) => ParseStep::Partial(
                        n,
                        AltState::First {
                            state,
                            consumed: consumed - n,
                            committed: true,
                        },
                    ),
                    ParseStep::Continue(n, state) => ParseStep::Continue(
                        n,
                        AltState::First {
                            state,
                            consumed: consumed - n,
                            committed,
                        },
                    ),
                    ParseStep::Done(n, b) => ParseStep::Done(n, b),
                    ParseStep::Error(msg) => {
                        if committed {
                            ParseStep::Error(msg)
                        } else {
                            self.fall_back(consumed)
                        }
                    }
                }
            }
            AltState::Second(s) => match self.second.step(s, input) {
                ParseStep::Partial(n, s) => ParseStep::Partial(n, AltState::Second(s)),
                ParseStep::Continue(n, s) => ParseStep::Continue(n, AltState::Second(s)),
                ParseStep::Done(n, b) => ParseStep::Done(n, b),
                ParseStep::Error(msg) => ParseStep::Error(msg),
            },
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, Self::Output> {
        match state {
            AltState::First {
                state,
                consumed,
                committed,
            } => match self.first.extract(state) {
                ParseStep::Done(n, b) => ParseStep::Done(n, b),
                ParseStep::Continue(n, state) => ParseStep::Continue(
                    n,
                    AltState::First {
                        state,
                        consumed: consumed - n,
                        committed,
                    },
                ),
                ParseStep::Error(msg) => {
                    if committed {
                        ParseStep::Error(msg)
                    } else if consumed > 0 {
                        self.fall_back(consumed)
                    } else {
                        match self.second.initial() {
                            Start::Pending(s2) => match self.second.extract(s2) {
                                ParseStep::Partial(n, s) => {
                                    ParseStep::Partial(n, AltState::Second(s))
                                }
                                ParseStep::Continue(n, s) => {
                                    ParseStep::Continue(n, AltState::Second(s))
                                }
                                ParseStep::Done(n, b) => ParseStep::Done(n, b),
                                ParseStep::Error(msg) => ParseStep::Error(msg),
                            },
                            Start::Done(b) => ParseStep::Done(0, b),
                            Start::Error(msg) => ParseStep::Error(msg),
                        }
                    }
                }
                ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
            },
            AltState::Second(s) => match self.second.extract(s) {
                ParseStep::Partial(n, s) => ParseStep::Partial(n, AltState::Second(s)),
                ParseStep::Continue(n, s) => ParseStep::Continue(n, AltState::Second(s)),
                ParseStep::Done(n, b) => ParseStep::Done(n, b),
                ParseStep::Error(msg) => ParseStep::Error(msg),
            },
        }
    }
}

/// Committed choice: runs `first`; if it fails *without having committed*
/// (no `Partial` emitted), rewinds everything it consumed and runs
/// `second`. After a commit, a failure of `first` is final.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{combinator::alt, stream, token};
///
/// let p = alt(token::one_eq(9), token::any());
/// assert_eq!(stream::iter([1]).parse(p), Ok(1));
/// ```
#[inline]
pub fn alt<P1, P2>(first: P1, second: P2) -> Alt<P1, P2>
where
    P1: Parser,
    P2: Parser<Input = P1::Input, Output = P1::Output>,
{
    Alt { first, second }
}
