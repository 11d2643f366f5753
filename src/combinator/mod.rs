//! Higher-order parser combinators
//!
//! | combinator | behavior |
//! |---|---|
//! | [`from_fold`] | promote a fold: never fails, never backtracks |
//! | [`success`] / [`success_with`] | succeed without consuming |
//! | [`fail`] / [`fail_with`] | fail without consuming |
//! | [`look_ahead`] | run a parser, then rewind everything it consumed |
//! | [`take_p`] | cap a parser to at most `n` elements |
//! | [`split_with`] | run two parsers in sequence, combine the outputs |
//! | [`alt`] | committed choice between two parsers |
//! | [`many`] / [`some`] | repeat a parser, folding outputs into a sink |
//! | [`many_till`] | repeat until a stop parser matches |
//! | [`sep_by`] / [`sep_by1`] | separated items, trailing separator rewound |
//! | [`deintercalate`] | alternate two parsers, outputs tagged `Either` |
//! | [`sequence`] | run a list of parsers in order |
//!
//! The choice and repetition combinators here are *committed choice*: once
//! an inner parser emits `Partial`, its consumed input is committed and no
//! alternative or rewind is attempted. See the protocol notes in
//! [`parser`][crate::parser].

mod core;
mod multi;

#[cfg(test)]
mod tests;

pub use self::core::{
    alt, fail, fail_with, from_fold, look_ahead, split_with, success, success_with, take_p, Alt,
    AltState, Fail, FailWith, FromFold, LookAhead, SplitState, SplitWith, Success, SuccessWith,
    TakeP,
};
pub use self::multi::{
    deintercalate, many, many_till, sep_by, sep_by1, sequence, some, DeintPhase, DeintState,
    Deintercalate, Many, ManyState, ManyTill, ManyTillState, SepBy, SepByState, SepPhase, Sequence,
    SequenceState, TillPhase,
};
