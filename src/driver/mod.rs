//! Running parsers over streams
//!
//! The driver pulls elements from a [`Stream`] and feeds them to a
//! [`Parser`], interpreting each [`ParseStep`] per the protocol table in
//! [`parser`][crate::parser]. Backtracking is serviced from a rewind
//! buffer: every element fed since the parser's last commit is retained and
//! can be fed again. The buffer grows on demand and is truncated at every
//! commit, so its size is bounded by the longest uncommitted span the
//! parser ever holds open.
//!
//! A [`Driver`] outlives individual parses. Input a parser rewound but did
//! not consume stays buffered, and the next parse starts from it:
//!
//! ```rust
//! use thresh::prelude::*;
//! use thresh::{driver::Driver, stream, token};
//!
//! let mut driver = Driver::new(stream::iter([1, 2, 3]));
//! assert_eq!(driver.parse(&mut token::peek()), Ok(1));
//! assert_eq!(driver.parse(&mut token::any()), Ok(1));
//! assert_eq!(driver.parse(&mut token::any()), Ok(2));
//! ```

use crate::error::ParseError;
use crate::lib::std::collections::VecDeque;
use crate::parser::{ParseStep, Parser, Start};
use crate::stream::{Step, Stream};

#[cfg(test)]
mod tests;

/// Feeds a [`Stream`] to parsers, servicing backtracks from a rewind
/// buffer.
///
/// Elements must be `Clone`: a rewound element is fed again from the
/// buffer.
pub struct Driver<S: Stream> {
    source: S,
    /// Elements read from the source and not yet committed by the parser.
    /// `buf[..cursor]` have been fed; `buf[cursor..]` are rewound input
    /// waiting to be fed again.
    buf: VecDeque<S::Item>,
    cursor: usize,
    /// Absolute offset of `buf[0]` in the overall input.
    base: u64,
    at_eof: bool,
}

impl<S> Driver<S>
where
    S: Stream,
    S::Item: Clone,
{
    /// Wraps a stream. Nothing is pulled until the first parse.
    pub fn new(source: S) -> Self {
        Self {
            source,
            buf: VecDeque::new(),
            cursor: 0,
            base: 0,
            at_eof: false,
        }
    }

    /// Absolute offset, in elements, of the next element the parser will
    /// see.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.base + self.cursor as u64
    }

    /// Runs one parser to completion over the buffered and remaining
    /// input.
    ///
    /// On success, input consumed by the parser is gone and rewound input
    /// remains for the next parse. On failure, the driver is left at the
    /// offset where the parser gave up.
    pub fn parse<P>(&mut self, parser: &mut P) -> Result<P::Output, ParseError>
    where
        P: Parser<Input = S::Item>,
    {
        let mut state = match parser.initial() {
            Start::Pending(s) => s,
            Start::Done(b) => return Ok(b),
            Start::Error(msg) => return Err(ParseError::new(msg, self.offset())),
        };
        // Bounds the extract/rewind/extract cycles a parser may run at end
        // of input; a parser that keeps asking for the same elements back
        // is broken.
        let mut eof_rounds = 0usize;
        loop {
            let item = if self.cursor < self.buf.len() {
                self.buf[self.cursor].clone()
            } else if self.at_eof {
                match parser.extract(state) {
                    ParseStep::Done(n, b) => {
                        self.rewind(n);
                        self.commit_consumed();
                        return Ok(b);
                    }
                    ParseStep::Continue(n, s) => {
                        if n == 0 {
                            return Err(ParseError::new(
                                "unexpected end of input",
                                self.offset(),
                            ));
                        }
                        // Each round is one alternative giving up and
                        // rereading; the count is structural, not
                        // input-sized, so the slack is generous.
                        eof_rounds += 1;
                        assert!(
                            eof_rounds <= self.buf.len() + 64,
                            "parser made no progress re-reading buffered input at end of input"
                        );
                        self.rewind(n);
                        state = s;
                        continue;
                    }
                    ParseStep::Error(msg) => {
                        return Err(ParseError::new(msg, self.offset()))
                    }
                    ParseStep::Partial(..) => {
                        panic!("parser returned Partial from extract")
                    }
                }
            } else {
                match self.pull() {
                    Some(a) => {
                        self.buf.push_back(a);
                        self.buf[self.cursor].clone()
                    }
                    None => continue,
                }
            };
            self.cursor += 1;
            match parser.step(state, item) {
                ParseStep::Partial(n, s) => {
                    self.commit_to(n);
                    state = s;
                }
                ParseStep::Continue(n, s) => {
                    self.rewind(n);
                    state = s;
                }
                ParseStep::Done(n, b) => {
                    self.rewind(n);
                    self.commit_consumed();
                    return Ok(b);
                }
                ParseStep::Error(msg) => return Err(ParseError::new(msg, self.offset())),
            }
        }
    }

    /// Pulls the next element from the source, resolving `Skip`s.
    fn pull(&mut self) -> Option<S::Item> {
        loop {
            match self.source.step() {
                Step::Yield(a) => return Some(a),
                Step::Skip => {}
                Step::Stop => {
                    self.at_eof = true;
                    return None;
                }
            }
        }
    }

    /// Moves the cursor back `n` fed elements.
    fn rewind(&mut self, n: usize) {
        assert!(
            n <= self.cursor,
            "backtrack count {n} exceeds the {} uncommitted elements fed",
            self.cursor
        );
        self.cursor -= n;
    }

    /// Commits everything fed except the trailing `n` elements. The
    /// committed prefix leaves the buffer for good; the retained `n` are
    /// rewound and will be fed again.
    fn commit_to(&mut self, n: usize) {
        assert!(
            n <= self.cursor,
            "backtrack count {n} exceeds the {} uncommitted elements fed",
            self.cursor
        );
        let committed = self.cursor - n;
        self.buf.drain(..committed);
        self.base += committed as u64;
        self.cursor = 0;
    }

    /// Commits everything still counted as fed, keeping rewound input.
    fn commit_consumed(&mut self) {
        self.buf.drain(..self.cursor);
        self.base += self.cursor as u64;
        self.cursor = 0;
    }

    /// Whether any input remains, pulling one element if that is the only
    /// way to know.
    fn has_input(&mut self) -> bool {
        if self.cursor < self.buf.len() {
            return true;
        }
        if self.at_eof {
            return false;
        }
        match self.pull() {
            Some(a) => {
                self.buf.push_back(a);
                true
            }
            None => false,
        }
    }
}

/// Implementation of
/// [`Stream::parse_many`][crate::stream::Stream::parse_many]: a stream of
/// parse results.
#[must_use = "streams do nothing unless pulled"]
pub struct ParseMany<S: Stream, P> {
    driver: Driver<S>,
    parser: P,
    done: bool,
}

impl<S, P> ParseMany<S, P>
where
    S: Stream,
    S::Item: Clone,
{
    pub(crate) fn new(source: S, parser: P) -> Self {
        Self {
            driver: Driver::new(source),
            parser,
            done: false,
        }
    }
}

impl<S, P> Stream for ParseMany<S, P>
where
    S: Stream,
    S::Item: Clone,
    P: Parser<Input = S::Item>,
{
    type Item = Result<P::Output, ParseError>;

    fn step(&mut self) -> Step<Self::Item> {
        if self.done {
            return Step::Stop;
        }
        if !self.driver.has_input() {
            self.done = true;
            return Step::Stop;
        }
        let before = self.driver.offset();
        match self.driver.parse(&mut self.parser) {
            Ok(b) => {
                assert!(
                    self.driver.offset() != before,
                    "parse_many requires the parser to consume input each round"
                );
                Step::Yield(Ok(b))
            }
            Err(e) => {
                // The next round would fail at the same offset forever;
                // surface the error and end the stream.
                self.done = true;
                Step::Yield(Err(e))
            }
        }
    }
}
