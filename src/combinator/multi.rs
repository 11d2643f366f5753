//! Combinators applying parsers repeatedly
//!
//! Every combinator here collects iteration outputs into a [`Fold`] sink
//! and shares the same bookkeeping discipline:
//!
//! - `consumed` tracks the net uncommitted elements of the current
//!   iteration, so a clean failure can rewind the whole attempt.
//! - A `committed` flag latches once the inner parser emits `Partial`;
//!   after that, failures are final (committed choice).
//! - Completed iterations commit, keeping the driver's rewind buffer
//!   bounded by a single iteration.
//! - An iteration that consumes no input would loop forever, so it panics;
//!   repetition parsers must always consume.

use crate::fold::{Fold, FoldStep};
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use crate::parser::{ParseStep, Parser, Start};
use crate::Either;

/// State of [`many`] and [`some`].
pub struct ManyState<PS, FS> {
    sink: FS,
    inner: PS,
    taken: usize,
    consumed: usize,
    committed: bool,
}

/// See [`many`] and [`some`].
pub struct Many<P, F> {
    parser: P,
    sink: F,
    require_one: bool,
    name: &'static str,
}

impl<P, F> Parser for Many<P, F>
where
    P: Parser,
    F: Fold<Input = P::Output>,
{
    type Input = P::Input;
    type State = ManyState<P::State, F::State>;
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        let sink = match self.sink.initial() {
            FoldStep::Partial(fs) => fs,
            FoldStep::Done(c) => return Start::Done(c),
        };
        match self.parser.initial() {
            Start::Pending(inner) => Start::Pending(ManyState {
                sink,
                inner,
                taken: 0,
                consumed: 0,
                committed: false,
            }),
            Start::Done(_) => panic!("{}: parser must consume input", self.name),
            Start::Error(msg) => {
                if self.require_one {
                    Start::Error(msg)
                } else {
                    Start::Done(self.sink.extract(sink))
                }
            }
        }
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, F::Output> {
        let ManyState {
            sink,
            inner,
            taken,
            consumed,
            committed,
        } = state;
        let consumed = consumed + 1;
        match self.parser.step(inner, input) {
            ParseStep::Partial(n, inner) => ParseStep::Partial(
                n,
                ManyState {
                    sink,
                    inner,
                    taken,
                    consumed: consumed - n,
                    committed: true,
                },
            ),
            ParseStep::Continue(n, inner) => ParseStep::Continue(
                n,
                ManyState {
                    sink,
                    inner,
                    taken,
                    consumed: consumed - n,
                    committed,
                },
            ),
            ParseStep::Done(n, value) => {
                assert!(
                    consumed - n > 0,
                    "{}: parser must consume input",
                    self.name
                );
                match self.sink.step(sink, value) {
                    FoldStep::Done(c) => ParseStep::Done(n, c),
                    FoldStep::Partial(sink) => match self.parser.initial() {
                        Start::Pending(inner) => ParseStep::Partial(
                            n,
                            ManyState {
                                sink,
                                inner,
                                taken: taken + 1,
                                consumed: 0,
                                committed: false,
                            },
                        ),
                        Start::Done(_) => {
                            panic!("{}: parser must consume input", self.name)
                        }
                        Start::Error(_) => ParseStep::Done(n, self.sink.extract(sink)),
                    },
                }
            }
            ParseStep::Error(msg) => {
                if committed || (self.require_one && taken == 0) {
                    ParseStep::Error(msg)
                } else {
                    ParseStep::Done(consumed, self.sink.extract(sink))
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        let ManyState {
            sink,
            inner,
            taken,
            consumed,
            committed,
        } = state;
        match self.parser.extract(inner) {
            ParseStep::Done(n, value) => {
                let net = consumed - n;
                if net == 0 && !(self.require_one && taken == 0) {
                    // A zero-width success at end of input is not another
                    // iteration.
                    ParseStep::Done(n, self.sink.extract(sink))
                } else {
                    match self.sink.step(sink, value) {
                        FoldStep::Done(c) => ParseStep::Done(n, c),
                        FoldStep::Partial(sink) => {
                            ParseStep::Done(n, self.sink.extract(sink))
                        }
                    }
                }
            }
            ParseStep::Continue(n, inner) => ParseStep::Continue(
                n,
                ManyState {
                    sink,
                    inner,
                    taken,
                    consumed: consumed - n,
                    committed,
                },
            ),
            ParseStep::Error(msg) => {
                if committed || (self.require_one && taken == 0) {
                    ParseStep::Error(msg)
                } else {
                    ParseStep::Done(consumed, self.sink.extract(sink))
                }
            }
            ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
        }
    }
}

/// Applies `parser` zero or more times, folding each output into `sink`.
///
/// Stops at the first clean (uncommitted) failure, rewinding that attempt's
/// input. A committed failure is final. Completed iterations commit.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{combinator, fold, stream, token};
///
/// let all = stream::iter([1, 2, 3]).parse(combinator::many(token::any(), fold::to_vec()));
/// assert_eq!(all, Ok(vec![1, 2, 3]));
/// ```
#[inline]
pub fn many<P, F>(parser: P, sink: F) -> Many<P, F>
where
    P: Parser,
    F: Fold<Input = P::Output>,
{
    Many {
        parser,
        sink,
        require_one: false,
        name: "many",
    }
}

/// Like [`many`] but at least one iteration must succeed.
#[inline]
pub fn some<P, F>(parser: P, sink: F) -> Many<P, F>
where
    P: Parser,
    F: Fold<Input = P::Output>,
{
    Many {
        parser,
        sink,
        require_one: true,
        name: "some",
    }
}

/// Which parser a [`many_till`] is currently running.
pub enum TillPhase<QS, PS> {
    /// Probing for the stop parser.
    Stop(QS),
    /// The stop probe failed cleanly; collecting one item.
    Collect(PS),
}

/// State of [`many_till`].
pub struct ManyTillState<FS, QS, PS> {
    sink: FS,
    phase: TillPhase<QS, PS>,
    consumed: usize,
    committed: bool,
}

/// See [`many_till`].
pub struct ManyTill<P, Q, F> {
    parser: P,
    stop: Q,
    sink: F,
}

impl<P, Q, F> Parser for ManyTill<P, Q, F>
where
    P: Parser,
    Q: Parser<Input = P::Input>,
    F: Fold<Input = P::Output>,
{
    type Input = P::Input;
    type State = ManyTillState<F::State, Q::State, P::State>;
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        let sink = match self.sink.initial() {
            FoldStep::Partial(fs) => fs,
            FoldStep::Done(c) => return Start::Done(c),
        };
        match self.stop.initial() {
            Start::Pending(qs) => Start::Pending(ManyTillState {
                sink,
                phase: TillPhase::Stop(qs),
                consumed: 0,
                committed: false,
            }),
            Start::Done(_) => Start::Done(self.sink.extract(sink)),
            Start::Error(_) => match self.parser.initial() {
                Start::Pending(ps) => Start::Pending(ManyTillState {
                    sink,
                    phase: TillPhase::Collect(ps),
                    consumed: 0,
                    committed: false,
                }),
                Start::Done(_) => panic!("many_till: parser must consume input"),
                Start::Error(msg) => Start::Error(msg),
            },
        }
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, F::Output> {
        let ManyTillState {
            sink,
            phase,
            consumed,
            committed,
        } = state;
        let consumed = consumed + 1;
        match phase {
            TillPhase::Stop(qs) => match self.stop.step(qs, input) {
                ParseStep::Partial(n, qs) => ParseStep::Partial(
                    n,
                    ManyTillState {
                        sink,
                        phase: TillPhase::Stop(qs),
                        consumed: consumed - n,
                        committed: true,
                    },
                ),
                ParseStep::Continue(n, qs) => ParseStep::Continue(
                    n,
                    ManyTillState {
                        sink,
                        phase: TillPhase::Stop(qs),
                        consumed: consumed - n,
                        committed,
                    },
                ),
                // The stop value is discarded.
                ParseStep::Done(n, _) => ParseStep::Done(n, self.sink.extract(sink)),
                ParseStep::Error(msg) => {
                    if committed {
                        ParseStep::Error(msg)
                    } else {
                        match self.parser.initial() {
                            Start::Pending(ps) => ParseStep::Continue(
                                consumed,
                                ManyTillState {
                                    sink,
                                    phase: TillPhase::Collect(ps),
                                    consumed: 0,
                                    committed: false,
                                },
                            ),
                            Start::Done(_) => {
                                panic!("many_till: parser must consume input")
                            }
                            Start::Error(msg) => ParseStep::Error(msg),
                        }
                    }
                }
            },
            TillPhase::Collect(ps) => match self.parser.step(ps, input) {
                ParseStep::Partial(n, ps) => ParseStep::Partial(
                    n,
                    ManyTillState {
                        sink,
                        phase: TillPhase::Collect(ps),
                        consumed: consumed - n,
                        committed: true,
                    },
                ),
                ParseStep::Continue(n, ps) => ParseStep::Continue(
                    n,
                    ManyTillState {
                        sink,
                        phase: TillPhase::Collect(ps),
                        consumed: consumed - n,
                        committed,
                    },
                ),
                ParseStep::Done(n, value) => {
                    assert!(consumed - n > 0, "many_till: parser must consume input");
                    match self.sink.step(sink, value) {
                        FoldStep::Done(c) => ParseStep::Done(n, c),
                        FoldStep::Partial(sink) => match self.stop.initial() {
                            Start::Pending(qs) => ParseStep::Partial(
                                n,
                                ManyTillState {
                                    sink,
                                    phase: TillPhase::Stop(qs),
                                    consumed: 0,
                                    committed: false,
                                },
                            ),
                            Start::Done(_) => {
                                ParseStep::Done(n, self.sink.extract(sink))
                            }
                            Start::Error(_) => match self.parser.initial() {
                                Start::Pending(ps) => ParseStep::Partial(
                                    n,
                                    ManyTillState {
                                        sink,
                                        phase: TillPhase::Collect(ps),
                                        consumed: 0,
                                        committed: false,
                                    },
                                ),
                                Start::Done(_) => {
                                    panic!("many_till: parser must consume input")
                                }
                                Start::Error(msg) => ParseStep::Error(msg),
                            },
                        },
                    }
                }
                ParseStep::Error(msg) => ParseStep::Error(msg),
            },
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        let ManyTillState {
            sink,
            phase,
            consumed,
            committed,
        } = state;
        match phase {
            TillPhase::Stop(qs) => match self.stop.extract(qs) {
                ParseStep::Done(n, _) => ParseStep::Done(n, self.sink.extract(sink)),
                ParseStep::Continue(n, qs) => ParseStep::Continue(
                    n,
                    ManyTillState {
                        sink,
                        phase: TillPhase::Stop(qs),
                        consumed: consumed - n,
                        committed,
                    },
                ),
                ParseStep::Error(msg) => {
                    if committed {
                        ParseStep::Error(msg)
                    } else if consumed > 0 {
                        match self.parser.initial() {
                            Start::Pending(ps) => ParseStep::Continue(
                                consumed,
                                ManyTillState {
                                    sink,
                                    phase: TillPhase::Collect(ps),
                                    consumed: 0,
                                    committed: false,
                                },
                            ),
                            Start::Done(_) => {
                                panic!("many_till: parser must consume input")
                            }
                            Start::Error(msg) => ParseStep::Error(msg),
                        }
                    } else {
                        ParseStep::Error(String::from(
                            "many_till: unexpected end of input",
                        ))
                    }
                }
                ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
            },
            TillPhase::Collect(_) => {
                ParseStep::Error(String::from("many_till: unexpected end of input"))
            }
        }
    }
}

/// Collects `parser` outputs into `sink` until `stop` matches; the stop
/// match is consumed and its value discarded.
///
/// Before each item the stop parser is probed; on its clean failure the
/// probe's input is rewound and `parser` runs. A failure of `parser` itself
/// is final.
#[inline]
pub fn many_till<P, Q, F>(parser: P, stop: Q, sink: F) -> ManyTill<P, Q, F>
where
    P: Parser,
    Q: Parser<Input = P::Input>,
    F: Fold<Input = P::Output>,
{
    ManyTill { parser, stop, sink }
}

/// Which parser a [`sep_by`] is currently running.
pub enum SepPhase<PS, QS> {
    /// Parsing content; `sep_carry` holds the uncommitted element count of
    /// the separator that preceded it, so a clean content failure rewinds
    /// the separator too.
    Content {
        /// Content parser state.
        state: PS,
        /// Uncommitted elements consumed by the preceding separator.
        sep_carry: usize,
        /// Net uncommitted elements of this content attempt.
        consumed: usize,
        /// Whether this content attempt committed.
        committed: bool,
    },
    /// Parsing a separator.
    Sep {
        /// Separator parser state.
        state: QS,
        /// Net uncommitted elements of this separator attempt.
        consumed: usize,
        /// Whether this separator attempt committed.
        committed: bool,
    },
}

/// State of [`sep_by`].
pub struct SepByState<FS, PS, QS> {
    sink: FS,
    phase: SepPhase<PS, QS>,
    taken: usize,
}

/// See [`sep_by`] and [`sep_by1`].
pub struct SepBy<P, Q, F> {
    content: P,
    sep: Q,
    sink: F,
    require_one: bool,
    name: &'static str,
}

impl<P, Q, F> SepBy<P, Q, F>
where
    P: Parser,
    Q: Parser<Input = P::Input>,
    F: Fold<Input = P::Output>,
{
    /// Content completed; bank it and line up a separator.
    fn after_content(
        &mut self,
        n: usize,
        value: P::Output,
        sink: F::State,
        taken: usize,
    ) -> ParseStep<SepByState<F::State, P::State, Q::State>, F::Output> {
        match self.sink.step(sink, value) {
            FoldStep::Done(c) => ParseStep::Done(n, c),
            FoldStep::Partial(sink) => match self.sep.initial() {
                Start::Pending(qs) => ParseStep::Partial(
                    n,
                    SepByState {
                        sink,
                        phase: SepPhase::Sep {
                            state: qs,
                            consumed: 0,
                            committed: false,
                        },
                        taken: taken + 1,
                    },
                ),
                Start::Done(_) => match self.content.initial() {
                    Start::Pending(ps) => ParseStep::Partial(
                        n,
                        SepByState {
                            sink,
                            phase: SepPhase::Content {
                                state: ps,
                                sep_carry: 0,
                                consumed: 0,
                                committed: false,
                            },
                            taken: taken + 1,
                        },
                    ),
                    Start::Done(_) => {
                        panic!("{}: parsers must consume input", self.name)
                    }
                    Start::Error(_) => ParseStep::Done(n, self.sink.extract(sink)),
                },
                Start::Error(_) => ParseStep::Done(n, self.sink.extract(sink)),
            },
        }
    }
}

impl<P, Q, F> Parser for SepBy<P, Q, F>
where
    P: Parser,
    Q: Parser<Input = P::Input>,
    F: Fold<Input = P::Output>,
{
    type Input = P::Input;
    type State = SepByState<F::State, P::State, Q::State>;
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        let sink = match self.sink.initial() {
            FoldStep::Partial(fs) => fs,
            FoldStep::Done(c) => return Start::Done(c),
        };
        match self.content.initial() {
            Start::Pending(ps) => Start::Pending(SepByState {
                sink,
                phase: SepPhase::Content {
                    state: ps,
                    sep_carry: 0,
                    consumed: 0,
                    committed: false,
                },
                taken: 0,
            }),
            Start::Done(value) => match self.sink.step(sink, value) {
                FoldStep::Done(c) => Start::Done(c),
                FoldStep::Partial(sink) => match self.sep.initial() {
                    Start::Pending(qs) => Start::Pending(SepByState {
                        sink,
                        phase: SepPhase::Sep {
                            state: qs,
                            consumed: 0,
                            committed: false,
                        },
                        taken: 1,
                    }),
                    Start::Done(_) => panic!("{}: parsers must consume input", self.name),
                    Start::Error(_) => Start::Done(self.sink.extract(sink)),
                },
            },
            Start::Error(msg) => {
                if self.require_one {
                    Start::Error(msg)
                } else {
                    Start::Done(self.sink.extract(sink))
                }
            }
        }
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, F::Output> {
        let SepByState { sink, phase, taken } = state;
        match phase {
            SepPhase::Content {
                state,
                sep_carry,
                consumed,
                committed,
            } => {
                let consumed = consumed + 1;
                match self.content.step(state, input) {
                    ParseStep::Partial(n, state) => ParseStep::Partial(
                        n,
                        SepByState {
                            sink,
                            phase: SepPhase::Content {
                                state,
                                sep_carry: 0,
                                consumed: consumed - n,
                                committed: true,
                            },
                            taken,
                        },
                    ),
                    ParseStep::Continue(n, state) => ParseStep::Continue(
                        n,
                        SepByState {
                            sink,
                            phase: SepPhase::Content {
                                state,
                                sep_carry,
                                consumed: consumed - n,
                                committed,
                            },
                            taken,
                        },
                    ),
                    ParseStep::Done(n, value) => {
                        assert!(
                            consumed - n > 0 || sep_carry > 0 || taken == 0,
                            "{}: parsers must consume input",
                            self.name
                        );
                        self.after_content(n, value, sink, taken)
                    }
                    ParseStep::Error(msg) => {
                        if committed || (self.require_one && taken == 0) {
                            ParseStep::Error(msg)
                        } else {
                            // Rewind this attempt and any separator before
                            // it; a trailing separator is not consumed.
                            ParseStep::Done(
                                consumed + sep_carry,
                                self.sink.extract(sink),
                            )
                        }
                    }
                }
            }
            SepPhase::Sep {
                state,
                consumed,
                committed,
            } => {
                let consumed = consumed + 1;
                match self.sep.step(state, input) {
                    ParseStep::Partial(n, state) => ParseStep::Partial(
                        n,
                        SepByState {
                            sink,
                            phase: SepPhase::Sep {
                                state,
                                consumed: consumed - n,
                                committed: true,
                            },
                            taken,
                        },
                    ),
                    ParseStep::Continue(n, state) => ParseStep::Continue(
                        n,
                        SepByState {
                            sink,
                            phase: SepPhase::Sep {
                                state,
                                consumed: consumed - n,
                                committed,
                            },
                            taken,
                        },
                    ),
                    ParseStep::Done(n, _) => {
                        let sep_net = consumed - n;
                        match self.content.initial() {
                            Start::Pending(ps) => ParseStep::Continue(
                                n,
                                SepByState {
                                    sink,
                                    phase: SepPhase::Content {
                                        state: ps,
                                        sep_carry: sep_net,
                                        consumed: 0,
                                        committed: false,
                                    },
                                    taken,
                                },
                            ),
                            Start::Done(value) => {
                                assert!(
                                    sep_net > 0,
                                    "{}: parsers must consume input",
                                    self.name
                                );
                                self.after_content(n, value, sink, taken)
                            }
                            Start::Error(_) => {
                                // Trailing separator: rewind it entirely.
                                ParseStep::Done(consumed, self.sink.extract(sink))
                            }
                        }
                    }
                    ParseStep::Error(msg) => {
                        if committed {
                            ParseStep::Error(msg)
                        } else {
                            ParseStep::Done(consumed, self.sink.extract(sink))
                        }
                    }
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        let SepByState { sink, phase, taken } = state;
        match phase {
            SepPhase::Content {
                state,
                sep_carry,
                consumed,
                committed,
            } => match self.content.extract(state) {
                ParseStep::Done(n, value) => {
                    let net = consumed - n;
                    if net == 0 && !(self.require_one && taken == 0) {
                        // Zero-width content at end of input: not an item;
                        // rewind the separator that led here.
                        ParseStep::Done(n + sep_carry, self.sink.extract(sink))
                    } else {
                        match self.sink.step(sink, value) {
                            FoldStep::Done(c) => ParseStep::Done(n, c),
                            FoldStep::Partial(sink) => {
                                ParseStep::Done(n, self.sink.extract(sink))
                            }
                        }
                    }
                }
                ParseStep::Continue(n, state) => ParseStep::Continue(
                    n,
                    SepByState {
                        sink,
                        phase: SepPhase::Content {
                            state,
                            sep_carry,
                            consumed: consumed - n,
                            committed,
                        },
                        taken,
                    },
                ),
                ParseStep::Error(msg) => {
                    if committed || (self.require_one && taken == 0) {
                        ParseStep::Error(msg)
                    } else {
                        ParseStep::Done(consumed + sep_carry, self.sink.extract(sink))
                    }
                }
                ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
            },
            SepPhase::Sep {
                state,
                consumed,
                committed,
            } => match self.sep.extract(state) {
                ParseStep::Continue(n, state) => ParseStep::Continue(
                    n,
                    SepByState {
                        sink,
                        phase: SepPhase::Sep {
                            state,
                            consumed: consumed - n,
                            committed,
                        },
                        taken,
                    },
                ),
                ParseStep::Done(n, _) => {
                    if committed {
                        ParseStep::Done(n, self.sink.extract(sink))
                    } else {
                        // Trailing separator at end of input: rewind it.
                        ParseStep::Done(consumed, self.sink.extract(sink))
                    }
                }
                ParseStep::Error(msg) => {
                    if committed {
                        ParseStep::Error(msg)
                    } else {
                        ParseStep::Done(consumed, self.sink.extract(sink))
                    }
                }
                ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
            },
        }
    }
}

/// Parses `content` items separated by `sep`, folding the content outputs
/// into `sink`; separator outputs are discarded.
///
/// A trailing separator is rewound, not consumed. Empty input (or an
/// immediate clean content failure) yields the sink's identity.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{combinator, fold, stream, token};
///
/// let digits = combinator::sep_by(
///     token::satisfy(char::is_ascii_digit),
///     token::one_eq(','),
///     fold::to_vec(),
/// );
/// assert_eq!(stream::iter("1,2,3".chars()).parse(digits), Ok(vec!['1', '2', '3']));
/// ```
#[inline]
pub fn sep_by<P, Q, F>(content: P, sep: Q, sink: F) -> SepBy<P, Q, F>
where
    P: Parser,
    Q: Parser<Input = P::Input>,
    F: Fold<Input = P::Output>,
{
    SepBy {
        content,
        sep,
        sink,
        require_one: false,
        name: "sep_by",
    }
}

/// Like [`sep_by`] but at least one content item is required.
#[inline]
pub fn sep_by1<P, Q, F>(content: P, sep: Q, sink: F) -> SepBy<P, Q, F>
where
    P: Parser,
    Q: Parser<Input = P::Input>,
    F: Fold<Input = P::Output>,
{
    SepBy {
        content,
        sep,
        sink,
        require_one: true,
        name: "sep_by1",
    }
}

/// Which parser a [`deintercalate`] is currently running.
pub enum DeintPhase<LS, RS, RV> {
    /// Parsing a left item. `pending` holds the output of the separator
    /// (right) parser that preceded it; it reaches the sink only once this
    /// left item completes, so a trailing right match can still be
    /// rewound.
    Left {
        /// Left parser state.
        state: LS,
        /// Uncommitted elements consumed by the pending right match.
        carry: usize,
        /// Output of the preceding right match, not yet in the sink.
        pending: Option<RV>,
        /// Net uncommitted elements of this left attempt.
        consumed: usize,
        /// Whether this left attempt committed.
        committed: bool,
    },
    /// Parsing a right item.
    Right {
        /// Right parser state.
        state: RS,
        /// Net uncommitted elements of this right attempt.
        consumed: usize,
        /// Whether this right attempt committed.
        committed: bool,
    },
}

/// State of [`deintercalate`].
pub struct DeintState<FS, LS, RS, RV> {
    sink: FS,
    phase: DeintPhase<LS, RS, RV>,
    taken: usize,
}

/// See [`deintercalate`].
pub struct Deintercalate<L, R, F> {
    left: L,
    right: R,
    sink: F,
}

impl<L, R, F> Parser for Deintercalate<L, R, F>
where
    L: Parser,
    R: Parser<Input = L::Input>,
    F: Fold<Input = Either<L::Output, R::Output>>,
{
    type Input = L::Input;
    type State = DeintState<F::State, L::State, R::State, R::Output>;
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        let sink = match self.sink.initial() {
            FoldStep::Partial(fs) => fs,
            FoldStep::Done(c) => return Start::Done(c),
        };
        match self.left.initial() {
            Start::Pending(ls) => Start::Pending(DeintState {
                sink,
                phase: DeintPhase::Left {
                    state: ls,
                    carry: 0,
                    pending: None,
                    consumed: 0,
                    committed: false,
                },
                taken: 0,
            }),
            Start::Done(_) => panic!("deintercalate: parser must consume input"),
            Start::Error(_) => Start::Done(self.sink.extract(sink)),
        }
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, F::Output> {
        let DeintState { sink, phase, taken } = state;
        match phase {
            DeintPhase::Left {
                state,
                carry,
                pending,
                consumed,
                committed,
            } => {
                let consumed = consumed + 1;
                match self.left.step(state, input) {
                    ParseStep::Partial(n, state) => {
                        // Committing strands the pending right output on
                        // this side of the commit, so flush it now.
                        let sink = match pending {
                            Some(rv) => match self.sink.step(sink, Either::Right(rv)) {
                                FoldStep::Done(c) => return ParseStep::Done(n, c),
                                FoldStep::Partial(fs) => fs,
                            },
                            None => sink,
                        };
                        ParseStep::Partial(
                            n,
                            DeintState {
                                sink,
                                phase: DeintPhase::Left {
                                    state,
                                    carry: 0,
                                    pending: None,
                                    consumed: consumed - n,
                                    committed: true,
                                },
                                taken,
                            },
                        )
                    }
                    ParseStep::Continue(n, state) => ParseStep::Continue(
                        n,
                        DeintState {
                            sink,
                            phase: DeintPhase::Left {
                                state,
                                carry,
                                pending,
                                consumed: consumed - n,
                                committed,
                            },
                            taken,
                        },
                    ),
                    ParseStep::Done(n, value) => {
                        assert!(
                            consumed - n > 0 || carry > 0 || taken == 0,
                            "deintercalate: parsers must consume input"
                        );
                        let sink = match pending {
                            Some(rv) => match self.sink.step(sink, Either::Right(rv)) {
                                FoldStep::Done(c) => return ParseStep::Done(n, c),
                                FoldStep::Partial(fs) => fs,
                            },
                            None => sink,
                        };
                        match self.sink.step(sink, Either::Left(value)) {
                            FoldStep::Done(c) => ParseStep::Done(n, c),
                            FoldStep::Partial(sink) => match self.right.initial() {
                                Start::Pending(rs) => ParseStep::Partial(
                                    n,
                                    DeintState {
                                        sink,
                                        phase: DeintPhase::Right {
                                            state: rs,
                                            consumed: 0,
                                            committed: false,
                                        },
                                        taken: taken + 1,
                                    },
                                ),
                                Start::Done(_) => {
                                    panic!("deintercalate: parser must consume input")
                                }
                                Start::Error(_) => {
                                    ParseStep::Done(n, self.sink.extract(sink))
                                }
                            },
                        }
                    }
                    ParseStep::Error(msg) => {
                        if committed {
                            ParseStep::Error(msg)
                        } else {
                            // Drop the pending right output and rewind both
                            // the right match and this left attempt.
                            ParseStep::Done(consumed + carry, self.sink.extract(sink))
                        }
                    }
                }
            }
            DeintPhase::Right {
                state,
                consumed,
                committed,
            } => {
                let consumed = consumed + 1;
                match self.right.step(state, input) {
                    ParseStep::Partial(n, state) => ParseStep::Partial(
                        n,
                        DeintState {
                            sink,
                            phase: DeintPhase::Right {
                                state,
                                consumed: consumed - n,
                                committed: true,
                            },
                            taken,
                        },
                    ),
                    ParseStep::Continue(n, state) => ParseStep::Continue(
                        n,
                        DeintState {
                            sink,
                            phase: DeintPhase::Right {
                                state,
                                consumed: consumed - n,
                                committed,
                            },
                            taken,
                        },
                    ),
                    ParseStep::Done(n, value) => {
                        let net = consumed - n;
                        assert!(net > 0, "deintercalate: parsers must consume input");
                        if committed {
                            // Already committed: the output is final, feed
                            // it through now.
                            match self.sink.step(sink, Either::Right(value)) {
                                FoldStep::Done(c) => ParseStep::Done(n, c),
                                FoldStep::Partial(sink) => match self.left.initial() {
                                    Start::Pending(ls) => ParseStep::Partial(
                                        n,
                                        DeintState {
                                            sink,
                                            phase: DeintPhase::Left {
                                                state: ls,
                                                carry: 0,
                                                pending: None,
                                                consumed: 0,
                                                committed: false,
                                            },
                                            taken: taken + 1,
                                        },
                                    ),
                                    Start::Done(_) => panic!(
                                        "deintercalate: parser must consume input"
                                    ),
                                    Start::Error(_) => {
                                        ParseStep::Done(n, self.sink.extract(sink))
                                    }
                                },
                            }
                        } else {
                            match self.left.initial() {
                                Start::Pending(ls) => ParseStep::Continue(
                                    n,
                                    DeintState {
                                        sink,
                                        phase: DeintPhase::Left {
                                            state: ls,
                                            carry: net,
                                            pending: Some(value),
                                            consumed: 0,
                                            committed: false,
                                        },
                                        taken,
                                    },
                                ),
                                Start::Done(_) => {
                                    panic!("deintercalate: parser must consume input")
                                }
                                Start::Error(_) => {
                                    // No left can follow: the right match
                                    // is trailing, rewind it.
                                    ParseStep::Done(consumed, self.sink.extract(sink))
                                }
                            }
                        }
                    }
                    ParseStep::Error(msg) => {
                        if committed {
                            ParseStep::Error(msg)
                        } else {
                            ParseStep::Done(consumed, self.sink.extract(sink))
                        }
                    }
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        let DeintState { sink, phase, taken } = state;
        match phase {
            DeintPhase::Left {
                state,
                carry,
                pending,
                consumed,
                committed,
            } => match self.left.extract(state) {
                ParseStep::Done(n, value) => {
                    let net = consumed - n;
                    if net == 0 && taken > 0 {
                        ParseStep::Done(n + carry, self.sink.extract(sink))
                    } else {
                        let sink = match pending {
                            Some(rv) => match self.sink.step(sink, Either::Right(rv)) {
                                FoldStep::Done(c) => return ParseStep::Done(n, c),
                                FoldStep::Partial(fs) => fs,
                            },
                            None => sink,
                        };
                        match self.sink.step(sink, Either::Left(value)) {
                            FoldStep::Done(c) => ParseStep::Done(n, c),
                            FoldStep::Partial(sink) => {
                                ParseStep::Done(n, self.sink.extract(sink))
                            }
                        }
                    }
                }
                ParseStep::Continue(n, state) => ParseStep::Continue(
                    n,
                    DeintState {
                        sink,
                        phase: DeintPhase::Left {
                            state,
                            carry,
                            pending,
                            consumed: consumed - n,
                            committed,
                        },
                        taken,
                    },
                ),
                ParseStep::Error(msg) => {
                    if committed {
                        ParseStep::Error(msg)
                    } else {
                        ParseStep::Done(consumed + carry, self.sink.extract(sink))
                    }
                }
                ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
            },
            DeintPhase::Right {
                state,
                consumed,
                committed,
            } => match self.right.extract(state) {
                ParseStep::Continue(n, state) => ParseStep::Continue(
                    n,
                    DeintState {
                        sink,
                        phase: DeintPhase::Right {
                            state,
                            consumed: consumed - n,
                            committed,
                        },
                        taken,
                    },
                ),
                ParseStep::Done(n, value) => {
                    if committed {
                        match self.sink.step(sink, Either::Right(value)) {
                            FoldStep::Done(c) => ParseStep::Done(n, c),
                            FoldStep::Partial(sink) => {
                                ParseStep::Done(n, self.sink.extract(sink))
                            }
                        }
                    } else {
                        // Trailing right match at end of input: rewind it.
                        ParseStep::Done(consumed, self.sink.extract(sink))
                    }
                }
                ParseStep::Error(msg) => {
                    if committed {
                        ParseStep::Error(msg)
                    } else {
                        ParseStep::Done(consumed, self.sink.extract(sink))
                    }
                }
                ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
            },
        }
    }
}

/// Alternates the `left` and `right` parsers, feeding each completed output
/// into `sink` tagged [`Either::Left`] or [`Either::Right`], in input
/// order.
///
/// The sequence must start and end with a left item; a right match not
/// followed by a left item is rewound (its output never reaches the sink).
/// Each full cycle must consume input; a zero-width cycle panics.
#[inline]
pub fn deintercalate<L, R, F>(left: L, right: R, sink: F) -> Deintercalate<L, R, F>
where
    L: Parser,
    R: Parser<Input = L::Input>,
    F: Fold<Input = Either<L::Output, R::Output>>,
{
    Deintercalate { left, right, sink }
}

/// State of [`sequence`].
pub struct SequenceState<PS, FS> {
    index: usize,
    state: PS,
    sink: FS,
}

/// See [`sequence`].
pub struct Sequence<P, F> {
    parsers: Vec<P>,
    sink: F,
}

impl<P, F> Sequence<P, F>
where
    P: Parser,
    F: Fold<Input = P::Output>,
{
    /// Brings up the parser at `index`, running any zero-input parsers to
    /// completion along the way.
    fn advance(
        &mut self,
        mut index: usize,
        mut sink: F::State,
    ) -> Result<Start<SequenceState<P::State, F::State>, F::Output>, String> {
        loop {
            if index == self.parsers.len() {
                return Ok(Start::Done(self.sink.extract(sink)));
            }
            match self.parsers[index].initial() {
                Start::Pending(state) => {
                    return Ok(Start::Pending(SequenceState { index, state, sink }))
                }
                Start::Done(value) => match self.sink.step(sink, value) {
                    FoldStep::Done(c) => return Ok(Start::Done(c)),
                    FoldStep::Partial(fs) => {
                        sink = fs;
                        index += 1;
                    }
                },
                Start::Error(msg) => return Err(msg),
            }
        }
    }
}

impl<P, F> Parser for Sequence<P, F>
where
    P: Parser,
    F: Fold<Input = P::Output>,
{
    type Input = P::Input;
    type State = SequenceState<P::State, F::State>;
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        let sink = match self.sink.initial() {
            FoldStep::Partial(fs) => fs,
            FoldStep::Done(c) => return Start::Done(c),
        };
        match self.advance(0, sink) {
            Ok(start) => start,
            Err(msg) => Start::Error(msg),
        }
    }

    fn step(&mut self, state: Self::State, input: Self::Input) -> ParseStep<Self::State, F::Output> {
        let SequenceState { index, state, sink } = state;
        match self.parsers[index].step(state, input) {
            ParseStep::Partial(n, state) => {
                ParseStep::Partial(n, SequenceState { index, state, sink })
            }
            ParseStep::Continue(n, state) => {
                ParseStep::Continue(n, SequenceState { index, state, sink })
            }
            ParseStep::Done(n, value) => match self.sink.step(sink, value) {
                FoldStep::Done(c) => ParseStep::Done(n, c),
                FoldStep::Partial(sink) => match self.advance(index + 1, sink) {
                    Ok(Start::Pending(state)) => ParseStep::Continue(n, state),
                    Ok(Start::Done(c)) => ParseStep::Done(n, c),
                    Ok(Start::Error(msg)) | Err(msg) => ParseStep::Error(msg),
                },
            },
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        let SequenceState {
            mut index,
            state,
            sink,
        } = state;
        let mut result = self.parsers[index].extract(state);
        let mut sink = sink;
        loop {
            match result {
                ParseStep::Done(n, value) => {
                    sink = match self.sink.step(sink, value) {
                        FoldStep::Done(c) => return ParseStep::Done(n, c),
                        FoldStep::Partial(fs) => fs,
                    };
                    index += 1;
                    if index == self.parsers.len() {
                        return ParseStep::Done(n, self.sink.extract(sink));
                    }
                    // The remaining parsers see no input; each must settle
                    // on nothing.
                    match self.parsers[index].initial() {
                        Start::Pending(s) => {
                            result = match self.parsers[index].extract(s) {
                                ParseStep::Done(_, v) => ParseStep::Done(n, v),
                                ParseStep::Continue(..) => ParseStep::Error(String::from(
                                    "sequence: unexpected end of input",
                                )),
                                ParseStep::Error(msg) => ParseStep::Error(msg),
                                ParseStep::Partial(..) => {
                                    panic!("parser returned Partial from extract")
                                }
                            };
                        }
                        Start::Done(v) => result = ParseStep::Done(n, v),
                        Start::Error(msg) => return ParseStep::Error(msg),
                    }
                }
                ParseStep::Continue(n, state) => {
                    return ParseStep::Continue(n, SequenceState { index, state, sink })
                }
                ParseStep::Error(msg) => return ParseStep::Error(msg),
                ParseStep::Partial(..) => panic!("parser returned Partial from extract"),
            }
        }
    }
}

/// Runs each parser in `parsers` over consecutive input, folding every
/// output into `sink` in order.
#[inline]
pub fn sequence<P, F>(parsers: Vec<P>, sink: F) -> Sequence<P, F>
where
    P: Parser,
    F: Fold<Input = P::Output>,
{
    Sequence { parsers, sink }
}
