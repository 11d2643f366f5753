//! Separator- and frame-delimited tokenizers
//!
//! Three families, in increasing structure:
//!
//! - `take_end_by*`: run an inner parser up to a separator element.
//! - `take_start_by` / `take_framed_by*`: content delimited by frame
//!   markers, with optional nesting (depth-counted) and escape elements
//!   that strip the next element of any special role.
//! - `word_by` / `word_framed_by` / `word_quoted_by`: separator-split
//!   words for `parse_many`-style tokenization loops; leading separators
//!   are skipped and trailing separators are drained, so consecutive
//!   separators never produce empty words.
//!
//! Frame conventions, shared by the whole family: the outermost begin/end
//! (or quote) pair is consumed but not handed to the fold, nested delimiter
//! elements are kept as content, and escape elements are dropped while the
//! element they protect is kept verbatim.

use crate::fold::{Fold, FoldStep};
use crate::lib::std::string::String;
use crate::parser::{ParseStep, Parser, Start};

/// See [`take_end_by`].
pub struct TakeEndBy<C, P> {
    cond: C,
    parser: P,
}

impl<C, P> Parser for TakeEndBy<C, P>
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
        let is_sep = (self.cond)(&input);
        let step = self.parser.step(state, input);
        if !is_sep {
            return step;
        }
        match step {
            ParseStep::Partial(n, s) | ParseStep::Continue(n, s) => {
                match self.parser.extract(s) {
                    ParseStep::Done(m, b) => ParseStep::Done(n + m, b),
                    ParseStep::Error(msg) => ParseStep::Error(msg),
                    ParseStep::Continue(..) | ParseStep::Partial(..) => ParseStep::Error(
                        String::from("take_end_by: parser incomplete at separator"),
                    ),
                }
            }
            finished => finished,
        }
    }

    #[inline]
    fn extract(&mut self, state: P::State) -> ParseStep<P::State, P::Output> {
        self.parser.extract(state)
    }
}

/// Runs `parser` until an element satisfies `cond`; the separator is fed to
/// the parser and then the parser is finalized.
#[inline]
pub fn take_end_by<C, P>(cond: C, parser: P) -> TakeEndBy<C, P>
where
    P: Parser,
    C: FnMut(&P::Input) -> bool,
{
    TakeEndBy { cond, parser }
}

/// See [`take_end_by_drop`].
pub struct TakeEndByDrop<C, P> {
    cond: C,
    parser: P,
}

impl<C, P> Parser for TakeEndByDrop<C, P>
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
        if (self.cond)(&input) {
            // The separator is consumed here but never reaches the parser.
            // A rewinding inner parser would re-read across it, so this
            // combinator is meant for fold-backed parsers that finalize in
            // place.
            match self.parser.extract(state) {
                ParseStep::Done(n, b) => ParseStep::Done(n, b),
                ParseStep::Error(msg) => ParseStep::Error(msg),
                ParseStep::Continue(..) | ParseStep::Partial(..) => ParseStep::Error(
                    String::from("take_end_by_drop: parser incomplete at separator"),
                ),
            }
        } else {
            self.parser.step(state, input)
        }
    }

    #[inline]
    fn extract(&mut self, state: P::State) -> ParseStep<P::State, P::Output> {
        self.parser.extract(state)
    }
}

/// Like [`take_end_by`] but the separator is consumed and dropped instead
/// of being fed to the parser.
#[inline]
pub fn take_end_by_drop<C, P>(cond: C, parser: P) -> TakeEndByDrop<C, P>
where
    P: Parser,
    C: FnMut(&P::Input) -> bool,
{
    TakeEndByDrop { cond, parser }
}

/// See [`take_end_by_esc`].
pub struct TakeEndByEsc<E, C, P> {
    is_esc: E,
    is_sep: C,
    parser: P,
}

impl<E, C, P> TakeEndByEsc<E, C, P>
where
    P: Parser,
{
    fn relay(
        step: ParseStep<P::State, P::Output>,
        escaped: bool,
    ) -> ParseStep<(bool, P::State), P::Output> {
        match step {
            ParseStep::Partial(n, s) => ParseStep::Partial(n, (escaped, s)),
            ParseStep::Continue(n, s) => ParseStep::Continue(n, (escaped, s)),
            ParseStep::Done(n, b) => ParseStep::Done(n, b),
            ParseStep::Error(msg) => ParseStep::Error(msg),
        }
    }
}

impl<E, C, P> Parser for TakeEndByEsc<E, C, P>
where
    P: Parser,
    E: FnMut(&P::Input) -> bool,
    C: FnMut(&P::Input) -> bool,
{
    type Input = P::Input;
    type State = (bool, P::State);
    type Output = P::Output;

    #[inline]
    fn initial(&mut self) -> Start<(bool, P::State), P::Output> {
        match self.parser.initial() {
            Start::Pending(s) => Start::Pending((false, s)),
            Start::Done(b) => Start::Done(b),
            Start::Error(msg) => Start::Error(msg),
        }
    }

    fn step(
        &mut self,
        (escaped, state): (bool, P::State),
        input: P::Input,
    ) -> ParseStep<(bool, P::State), P::Output> {
        if escaped {
            return Self::relay(self.parser.step(state, input), false);
        }
        if (self.is_esc)(&input) {
            return Self::relay(self.parser.step(state, input), true);
        }
        let is_sep = (self.is_sep)(&input);
        let step = self.parser.step(state, input);
        if !is_sep {
            return Self::relay(step, false);
        }
        match step {
            ParseStep::Partial(n, s) | ParseStep::Continue(n, s) => {
                match self.parser.extract(s) {
                    ParseStep::Done(m, b) => ParseStep::Done(n + m, b),
                    ParseStep::Error(msg) => ParseStep::Error(msg),
                    ParseStep::Continue(..) | ParseStep::Partial(..) => ParseStep::Error(
                        String::from("take_end_by_esc: parser incomplete at separator"),
                    ),
                }
            }
            finished => Self::relay(finished, false),
        }
    }

    fn extract(&mut self, (escaped, state): (bool, P::State)) -> ParseStep<(bool, P::State), P::Output> {
        if escaped {
            return ParseStep::Error(String::from("take_end_by_esc: trailing escape"));
        }
        Self::relay(self.parser.extract(state), false)
    }
}

/// Like [`take_end_by`], but an element satisfying `is_esc` suppresses the
/// separator role of the element after it. Escape and escaped elements are
/// both fed to the parser.
#[inline]
pub fn take_end_by_esc<E, C, P>(is_esc: E, is_sep: C, parser: P) -> TakeEndByEsc<E, C, P>
where
    P: Parser,
    E: FnMut(&P::Input) -> bool,
    C: FnMut(&P::Input) -> bool,
{
    TakeEndByEsc {
        is_esc,
        is_sep,
        parser,
    }
}

/// State of [`take_start_by`]: before or inside the frame.
#[derive(Debug, Clone)]
pub enum StartFrame<S> {
    /// Waiting for the frame-start element.
    Init(S),
    /// Collecting until the next frame start.
    Inside(S),
}

/// See [`take_start_by`].
pub struct TakeStartBy<C, F> {
    cond: C,
    fold: F,
    keep: bool,
    name: &'static str,
}

impl<C, F> Parser for TakeStartBy<C, F>
where
    F: Fold,
    C: FnMut(&F::Input) -> bool,
{
    type Input = F::Input;
    type State = StartFrame<F::State>;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(StartFrame::Init(s)),
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    fn step(&mut self, state: Self::State, input: F::Input) -> ParseStep<Self::State, F::Output> {
        match state {
            StartFrame::Init(s) => {
                if !(self.cond)(&input) {
                    return ParseStep::Error(format!("{}: frame start missing", self.name));
                }
                if self.keep {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => ParseStep::Partial(0, StartFrame::Inside(s)),
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                } else {
                    ParseStep::Partial(0, StartFrame::Inside(s))
                }
            }
            StartFrame::Inside(s) => {
                if (self.cond)(&input) {
                    // The next frame's start element is rewound for the
                    // next parse.
                    ParseStep::Done(1, self.fold.extract(s))
                } else {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => ParseStep::Partial(0, StartFrame::Inside(s)),
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            StartFrame::Init(_) => {
                ParseStep::Error(format!("{}: unexpected end of input", self.name))
            }
            StartFrame::Inside(s) => ParseStep::Done(0, self.fold.extract(s)),
        }
    }
}

/// Collects a frame opened by an element satisfying `cond` and ended by the
/// next such element, which is rewound. The opening element is kept in the
/// output.
#[inline]
pub fn take_start_by<C, F>(cond: C, fold: F) -> TakeStartBy<C, F>
where
    F: Fold,
    C: FnMut(&F::Input) -> bool,
{
    TakeStartBy {
        cond,
        fold,
        keep: true,
        name: "take_start_by",
    }
}

/// Like [`take_start_by`] but the opening element is dropped.
#[inline]
pub fn take_start_by_drop<C, F>(cond: C, fold: F) -> TakeStartBy<C, F>
where
    F: Fold,
    C: FnMut(&F::Input) -> bool,
{
    TakeStartBy {
        cond,
        fold,
        keep: false,
        name: "take_start_by_drop",
    }
}

/// State of the framed-by family.
#[derive(Debug, Clone)]
pub enum FrameState<S> {
    /// Waiting for the opening element.
    Opening(S),
    /// Inside the frame at this nesting depth.
    Inside(usize, S),
    /// The previous element was an escape; the next is taken verbatim.
    Escaped(usize, S),
}

/// See [`take_framed_by_generic`].
pub struct TakeFramedByGeneric<FE, FB, FN, F> {
    esc: Option<FE>,
    begin: Option<FB>,
    end: Option<FN>,
    fold: F,
    name: &'static str,
}

impl<A, FE, FB, FN, F> TakeFramedByGeneric<FE, FB, FN, F>
where
    F: Fold<Input = A>,
    FE: FnMut(&A) -> bool,
    FB: FnMut(&A) -> bool,
    FN: FnMut(&A) -> bool,
{
    fn feed(
        &mut self,
        depth: usize,
        state: F::State,
        input: A,
    ) -> ParseStep<FrameState<F::State>, F::Output> {
        match self.fold.step(state, input) {
            FoldStep::Partial(s) => ParseStep::Partial(0, FrameState::Inside(depth, s)),
            FoldStep::Done(b) => ParseStep::Done(0, b),
        }
    }
}

impl<A, FE, FB, FN, F> Parser for TakeFramedByGeneric<FE, FB, FN, F>
where
    F: Fold<Input = A>,
    FE: FnMut(&A) -> bool,
    FB: FnMut(&A) -> bool,
    FN: FnMut(&A) -> bool,
{
    type Input = A;
    type State = FrameState<F::State>;
    type Output = F::Output;

    fn initial(&mut self) -> Start<Self::State, F::Output> {
        if self.begin.is_none() && self.end.is_none() {
            return Start::Error(format!(
                "{}: at least one of a begin or end predicate is required",
                self.name
            ));
        }
        match self.fold.initial() {
            FoldStep::Partial(s) => {
                if self.begin.is_some() {
                    Start::Pending(FrameState::Opening(s))
                } else {
                    Start::Pending(FrameState::Inside(1, s))
                }
            }
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    fn step(&mut self, state: Self::State, input: A) -> ParseStep<Self::State, F::Output> {
        match state {
            FrameState::Opening(s) => {
                let is_begin = match &mut self.begin {
                    Some(begin) => begin(&input),
                    None => false,
                };
                if is_begin {
                    ParseStep::Partial(0, FrameState::Inside(1, s))
                } else {
                    ParseStep::Error(format!("{}: missing frame start", self.name))
                }
            }
            FrameState::Inside(depth, s) => {
                if let Some(esc) = &mut self.esc {
                    if esc(&input) {
                        return ParseStep::Partial(0, FrameState::Escaped(depth, s));
                    }
                }
                if let Some(end) = &mut self.end {
                    if end(&input) {
                        return if depth == 1 {
                            ParseStep::Done(0, self.fold.extract(s))
                        } else {
                            // A nested closing delimiter stays in the
                            // output.
                            self.feed(depth - 1, s, input)
                        };
                    }
                }
                if let Some(begin) = &mut self.begin {
                    if begin(&input) {
                        return if self.end.is_some() {
                            self.feed(depth + 1, s, input)
                        } else {
                            // Begin-only framing: the next start element
                            // closes this frame and opens the next.
                            ParseStep::Done(1, self.fold.extract(s))
                        };
                    }
                }
                self.feed(depth, s, input)
            }
            FrameState::Escaped(depth, s) => self.feed(depth, s, input),
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            FrameState::Opening(_) => {
                ParseStep::Error(format!("{}: unexpected end of input", self.name))
            }
            FrameState::Inside(_, s) => {
                if self.begin.is_some() && self.end.is_some() {
                    ParseStep::Error(format!("{}: missing frame end", self.name))
                } else {
                    ParseStep::Done(0, self.fold.extract(s))
                }
            }
            FrameState::Escaped(..) => {
                ParseStep::Error(format!("{}: trailing escape", self.name))
            }
        }
    }
}

/// Frame-delimited content with every knob exposed.
///
/// Each predicate is optional, but at least a begin or an end predicate is
/// required; a parser built with neither fails on first use. With both,
/// frames nest: depth is tracked and only the outermost pair is dropped.
/// With only `end`, content runs to the first unescaped end element (or end
/// of input). With only `begin`, the frame ends right before the next begin
/// element, which is rewound.
#[inline]
pub fn take_framed_by_generic<A, FE, FB, FN, F>(
    esc: Option<FE>,
    begin: Option<FB>,
    end: Option<FN>,
    fold: F,
) -> TakeFramedByGeneric<FE, FB, FN, F>
where
    F: Fold<Input = A>,
    FE: FnMut(&A) -> bool,
    FB: FnMut(&A) -> bool,
    FN: FnMut(&A) -> bool,
{
    TakeFramedByGeneric {
        esc,
        begin,
        end,
        fold,
        name: "take_framed_by_generic",
    }
}

/// Collects content between balanced begin/end elements; nested frames keep
/// their delimiters, the outermost pair is dropped.
#[inline]
pub fn take_framed_by<A, FB, FN, F>(
    is_begin: FB,
    is_end: FN,
    fold: F,
) -> TakeFramedByGeneric<fn(&A) -> bool, FB, FN, F>
where
    F: Fold<Input = A>,
    FB: FnMut(&A) -> bool,
    FN: FnMut(&A) -> bool,
{
    TakeFramedByGeneric {
        esc: None,
        begin: Some(is_begin),
        end: Some(is_end),
        fold,
        name: "take_framed_by",
    }
}

/// [`take_framed_by`] with an escape element that strips the next element
/// of any framing role. The escape element is dropped from the output.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{fold, stream, token};
///
/// let body = stream::iter("{hello {world}}".chars()).parse(token::take_framed_by_esc(
///     |c| *c == '\\',
///     |c| *c == '{',
///     |c| *c == '}',
///     fold::to_vec(),
/// ));
/// assert_eq!(body, Ok("hello {world}".chars().collect::<Vec<_>>()));
/// ```
#[inline]
pub fn take_framed_by_esc<A, FE, FB, FN, F>(
    is_esc: FE,
    is_begin: FB,
    is_end: FN,
    fold: F,
) -> TakeFramedByGeneric<FE, FB, FN, F>
where
    F: Fold<Input = A>,
    FE: FnMut(&A) -> bool,
    FB: FnMut(&A) -> bool,
    FN: FnMut(&A) -> bool,
{
    TakeFramedByGeneric {
        esc: Some(is_esc),
        begin: Some(is_begin),
        end: Some(is_end),
        fold,
        name: "take_framed_by_esc",
    }
}

/// State of [`word_by`].
#[derive(Debug, Clone)]
pub enum WordState<S, B> {
    /// Draining leading separators.
    SkipPre(S),
    /// Collecting word elements.
    InWord(S),
    /// Word done; draining trailing separators.
    SkipPost(B),
}

/// See [`word_by`].
pub struct WordBy<C, F> {
    is_sep: C,
    fold: F,
}

impl<C, F> Parser for WordBy<C, F>
where
    F: Fold,
    C: FnMut(&F::Input) -> bool,
{
    type Input = F::Input;
    type State = WordState<F::State, F::Output>;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(WordState::SkipPre(s)),
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    fn step(&mut self, state: Self::State, input: F::Input) -> ParseStep<Self::State, F::Output> {
        match state {
            WordState::SkipPre(s) => {
                if (self.is_sep)(&input) {
                    ParseStep::Partial(0, WordState::SkipPre(s))
                } else {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => ParseStep::Partial(0, WordState::InWord(s)),
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                }
            }
            WordState::InWord(s) => {
                if (self.is_sep)(&input) {
                    // Word complete; keep consuming the separator run.
                    ParseStep::Partial(0, WordState::SkipPost(self.fold.extract(s)))
                } else {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => ParseStep::Partial(0, WordState::InWord(s)),
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                }
            }
            WordState::SkipPost(b) => {
                if (self.is_sep)(&input) {
                    ParseStep::Partial(0, WordState::SkipPost(b))
                } else {
                    ParseStep::Done(1, b)
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            WordState::SkipPre(s) | WordState::InWord(s) => {
                ParseStep::Done(0, self.fold.extract(s))
            }
            WordState::SkipPost(b) => ParseStep::Done(0, b),
        }
    }
}

/// Collects one separator-delimited word, skipping leading separators and
/// draining trailing ones, so repeated runs never see empty words.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{fold, stream, token};
///
/// let words: Vec<_> = stream::iter("  to the  mill ".chars())
///     .parse_many(token::word_by(|c| *c == ' ', fold::to_vec()))
///     .to_vec();
/// let words: Vec<String> = words
///     .into_iter()
///     .map(|w| w.unwrap().into_iter().collect())
///     .collect();
/// assert_eq!(words, vec!["to", "the", "mill"]);
/// ```
#[inline]
pub fn word_by<C, F>(is_sep: C, fold: F) -> WordBy<C, F>
where
    F: Fold,
    C: FnMut(&F::Input) -> bool,
{
    WordBy { is_sep, fold }
}

/// State of [`word_framed_by`].
#[derive(Debug, Clone)]
pub enum WordFrameState<S, B> {
    /// Draining leading separators.
    SkipPre(S),
    /// Collecting at this frame depth; separators split only at depth 0.
    InWord(usize, S),
    /// The previous element was an escape.
    Escaped(usize, S),
    /// Word done; draining trailing separators.
    SkipPost(B),
}

/// See [`word_framed_by`].
pub struct WordFramedBy<FE, FB, FN, C, F> {
    is_esc: FE,
    is_begin: FB,
    is_end: FN,
    is_sep: C,
    fold: F,
}

impl<A, FE, FB, FN, C, F> WordFramedBy<FE, FB, FN, C, F>
where
    F: Fold<Input = A>,
{
    fn feed(
        &mut self,
        depth: usize,
        state: F::State,
        input: A,
    ) -> ParseStep<WordFrameState<F::State, F::Output>, F::Output> {
        match self.fold.step(state, input) {
            FoldStep::Partial(s) => ParseStep::Partial(0, WordFrameState::InWord(depth, s)),
            FoldStep::Done(b) => ParseStep::Done(0, b),
        }
    }
}

impl<A, FE, FB, FN, C, F> Parser for WordFramedBy<FE, FB, FN, C, F>
where
    F: Fold<Input = A>,
    FE: FnMut(&A) -> bool,
    FB: FnMut(&A) -> bool,
    FN: FnMut(&A) -> bool,
    C: FnMut(&A) -> bool,
{
    type Input = A;
    type State = WordFrameState<F::State, F::Output>;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(WordFrameState::SkipPre(s)),
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    fn step(&mut self, state: Self::State, input: A) -> ParseStep<Self::State, F::Output> {
        match state {
            WordFrameState::SkipPre(s) => {
                if (self.is_esc)(&input) {
                    ParseStep::Partial(0, WordFrameState::Escaped(0, s))
                } else if (self.is_begin)(&input) {
                    ParseStep::Partial(0, WordFrameState::InWord(1, s))
                } else if (self.is_end)(&input) {
                    ParseStep::Error(String::from("word_framed_by: missing frame begin"))
                } else if (self.is_sep)(&input) {
                    ParseStep::Partial(0, WordFrameState::SkipPre(s))
                } else {
                    self.feed(0, s, input)
                }
            }
            WordFrameState::InWord(0, s) => {
                if (self.is_esc)(&input) {
                    ParseStep::Partial(0, WordFrameState::Escaped(0, s))
                } else if (self.is_begin)(&input) {
                    ParseStep::Partial(0, WordFrameState::InWord(1, s))
                } else if (self.is_end)(&input) {
                    ParseStep::Error(String::from("word_framed_by: missing frame begin"))
                } else if (self.is_sep)(&input) {
                    ParseStep::Partial(0, WordFrameState::SkipPost(self.fold.extract(s)))
                } else {
                    self.feed(0, s, input)
                }
            }
            WordFrameState::InWord(depth, s) => {
                if (self.is_esc)(&input) {
                    ParseStep::Partial(0, WordFrameState::Escaped(depth, s))
                } else if (self.is_end)(&input) {
                    if depth == 1 {
                        ParseStep::Partial(0, WordFrameState::InWord(0, s))
                    } else {
                        self.feed(depth - 1, s, input)
                    }
                } else if (self.is_begin)(&input) {
                    self.feed(depth + 1, s, input)
                } else {
                    // Separators inside a frame are ordinary content.
                    self.feed(depth, s, input)
                }
            }
            WordFrameState::Escaped(depth, s) => self.feed(depth, s, input),
            WordFrameState::SkipPost(b) => {
                if (self.is_sep)(&input) {
                    ParseStep::Partial(0, WordFrameState::SkipPost(b))
                } else {
                    ParseStep::Done(1, b)
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            WordFrameState::SkipPre(s) | WordFrameState::InWord(0, s) => {
                ParseStep::Done(0, self.fold.extract(s))
            }
            WordFrameState::InWord(..) => {
                ParseStep::Error(String::from("word_framed_by: missing frame end"))
            }
            WordFrameState::Escaped(..) => {
                ParseStep::Error(String::from("word_framed_by: trailing escape"))
            }
            WordFrameState::SkipPost(b) => ParseStep::Done(0, b),
        }
    }
}

/// [`word_by`] with begin/end frames: separators inside a frame do not
/// split the word. Frames nest; outermost delimiters are dropped, nested
/// ones kept; escapes neutralize the next element everywhere.
#[inline]
pub fn word_framed_by<A, FE, FB, FN, C, F>(
    is_esc: FE,
    is_begin: FB,
    is_end: FN,
    is_sep: C,
    fold: F,
) -> WordFramedBy<FE, FB, FN, C, F>
where
    F: Fold<Input = A>,
    FE: FnMut(&A) -> bool,
    FB: FnMut(&A) -> bool,
    FN: FnMut(&A) -> bool,
    C: FnMut(&A) -> bool,
{
    WordFramedBy {
        is_esc,
        is_begin,
        is_end,
        is_sep,
        fold,
    }
}

/// State of [`word_quoted_by`].
#[derive(Debug, Clone)]
pub enum WordQuoteState<A, S, B> {
    /// Draining leading separators.
    SkipPre(S),
    /// Collecting outside any quote.
    Unquoted(S),
    /// Inside a quote: nesting depth, the opening element, and its
    /// matching closer.
    Quoted(usize, A, A, S),
    /// The previous element was an escape, inside a quote.
    Escaped(usize, A, A, S),
    /// Word done; draining trailing separators.
    SkipPost(B),
}

/// See [`word_quoted_by`].
pub struct WordQuotedBy<FE, Q, R, C, F> {
    keep_quotes: bool,
    is_esc: FE,
    is_quote: Q,
    to_right: R,
    is_sep: C,
    fold: F,
}

impl<A, FE, Q, R, C, F> WordQuotedBy<FE, Q, R, C, F>
where
    A: Clone + PartialEq,
    F: Fold<Input = A>,
    R: FnMut(&A) -> A,
{
    fn open_quote(
        &mut self,
        state: F::State,
        input: A,
    ) -> ParseStep<WordQuoteState<A, F::State, F::Output>, F::Output> {
        let closer = (self.to_right)(&input);
        let opener = input.clone();
        if self.keep_quotes {
            match self.fold.step(state, input) {
                FoldStep::Partial(s) => {
                    ParseStep::Partial(0, WordQuoteState::Quoted(1, opener, closer, s))
                }
                FoldStep::Done(b) => ParseStep::Done(0, b),
            }
        } else {
            ParseStep::Partial(0, WordQuoteState::Quoted(1, opener, closer, state))
        }
    }

    fn feed_quoted(
        &mut self,
        depth: usize,
        opener: A,
        closer: A,
        state: F::State,
        input: A,
    ) -> ParseStep<WordQuoteState<A, F::State, F::Output>, F::Output> {
        match self.fold.step(state, input) {
            FoldStep::Partial(s) => {
                ParseStep::Partial(0, WordQuoteState::Quoted(depth, opener, closer, s))
            }
            FoldStep::Done(b) => ParseStep::Done(0, b),
        }
    }
}

impl<A, FE, Q, R, C, F> Parser for WordQuotedBy<FE, Q, R, C, F>
where
    A: Clone + PartialEq,
    F: Fold<Input = A>,
    FE: FnMut(&A) -> bool,
    Q: FnMut(&A) -> bool,
    R: FnMut(&A) -> A,
    C: FnMut(&A) -> bool,
{
    type Input = A;
    type State = WordQuoteState<A, F::State, F::Output>;
    type Output = F::Output;

    #[inline]
    fn initial(&mut self) -> Start<Self::State, F::Output> {
        match self.fold.initial() {
            FoldStep::Partial(s) => Start::Pending(WordQuoteState::SkipPre(s)),
            FoldStep::Done(b) => Start::Done(b),
        }
    }

    fn step(&mut self, state: Self::State, input: A) -> ParseStep<Self::State, F::Output> {
        match state {
            WordQuoteState::SkipPre(s) => {
                if (self.is_sep)(&input) {
                    ParseStep::Partial(0, WordQuoteState::SkipPre(s))
                } else if (self.is_quote)(&input) {
                    self.open_quote(s, input)
                } else {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => {
                            ParseStep::Partial(0, WordQuoteState::Unquoted(s))
                        }
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                }
            }
            WordQuoteState::Unquoted(s) => {
                if (self.is_sep)(&input) {
                    ParseStep::Partial(0, WordQuoteState::SkipPost(self.fold.extract(s)))
                } else if (self.is_quote)(&input) {
                    self.open_quote(s, input)
                } else {
                    match self.fold.step(s, input) {
                        FoldStep::Partial(s) => {
                            ParseStep::Partial(0, WordQuoteState::Unquoted(s))
                        }
                        FoldStep::Done(b) => ParseStep::Done(0, b),
                    }
                }
            }
            WordQuoteState::Quoted(depth, opener, closer, s) => {
                if (self.is_esc)(&input) {
                    if self.keep_quotes {
                        match self.fold.step(s, input) {
                            FoldStep::Partial(s) => ParseStep::Partial(
                                0,
                                WordQuoteState::Escaped(depth, opener, closer, s),
                            ),
                            FoldStep::Done(b) => ParseStep::Done(0, b),
                        }
                    } else {
                        ParseStep::Partial(0, WordQuoteState::Escaped(depth, opener, closer, s))
                    }
                } else if input == closer {
                    if depth == 1 {
                        if self.keep_quotes {
                            match self.fold.step(s, input) {
                                FoldStep::Partial(s) => {
                                    ParseStep::Partial(0, WordQuoteState::Unquoted(s))
                                }
                                FoldStep::Done(b) => ParseStep::Done(0, b),
                            }
                        } else {
                            ParseStep::Partial(0, WordQuoteState::Unquoted(s))
                        }
                    } else {
                        self.feed_quoted(depth - 1, opener, closer, s, input)
                    }
                } else if input == opener {
                    // Distinct open/close quotes nest; the inner pair stays
                    // in the output.
                    self.feed_quoted(depth + 1, opener, closer, s, input)
                } else {
                    self.feed_quoted(depth, opener, closer, s, input)
                }
            }
            WordQuoteState::Escaped(depth, opener, closer, s) => {
                self.feed_quoted(depth, opener, closer, s, input)
            }
            WordQuoteState::SkipPost(b) => {
                if (self.is_sep)(&input) {
                    ParseStep::Partial(0, WordQuoteState::SkipPost(b))
                } else {
                    ParseStep::Done(1, b)
                }
            }
        }
    }

    fn extract(&mut self, state: Self::State) -> ParseStep<Self::State, F::Output> {
        match state {
            WordQuoteState::SkipPre(s) | WordQuoteState::Unquoted(s) => {
                ParseStep::Done(0, self.fold.extract(s))
            }
            WordQuoteState::Quoted(..) => {
                ParseStep::Error(String::from("word_quoted_by: missing quote end"))
            }
            WordQuoteState::Escaped(..) => {
                ParseStep::Error(String::from("word_quoted_by: trailing escape"))
            }
            WordQuoteState::SkipPost(b) => ParseStep::Done(0, b),
        }
    }
}

/// [`word_by`] with quoting: a quote element opens a span in which
/// separators are content, closed by `to_right` of the opener. Other quote
/// elements inside are ordinary content; a distinct opener/closer pair
/// nests.
///
/// With `keep_quotes` the quotes and escapes are kept verbatim; otherwise
/// the outermost quote pair and escapes are dropped. Escapes are recognized
/// only inside quotes.
///
/// ```rust
/// use thresh::prelude::*;
/// use thresh::{fold, stream, token};
///
/// let quote = |c: &char| *c == '"' || *c == '\'';
/// let word = stream::iter("a\"b'c\";'d\"e'f ghi".chars()).parse(token::word_quoted_by(
///     false,
///     |c| *c == '\\',
///     quote,
///     |q| *q,
///     |c| *c == ' ',
///     fold::to_vec(),
/// ));
/// assert_eq!(word, Ok("ab'c;d\"ef".chars().collect::<Vec<_>>()));
/// ```
#[inline]
pub fn word_quoted_by<A, FE, Q, R, C, F>(
    keep_quotes: bool,
    is_esc: FE,
    is_quote: Q,
    to_right: R,
    is_sep: C,
    fold: F,
) -> WordQuotedBy<FE, Q, R, C, F>
where
    A: Clone + PartialEq,
    F: Fold<Input = A>,
    FE: FnMut(&A) -> bool,
    Q: FnMut(&A) -> bool,
    R: FnMut(&A) -> A,
    C: FnMut(&A) -> bool,
{
    WordQuotedBy {
        keep_quotes,
        is_esc,
        is_quote,
        to_right,
        is_sep,
        fold,
    }
}
