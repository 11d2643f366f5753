//! Parser execution tracing
//!
//! [`Parser::traced`][crate::parser::Parser::traced] wraps a parser so that
//! every `initial`/`step`/`extract` result is logged to stderr, with
//! nesting depth and a severity color per step variant. Logging is compiled
//! in only under the `debug` feature; without it the wrapper is free.

#[cfg(feature = "debug")]
mod internals;

use crate::parser::{ParseStep, Parser, Start};

#[cfg(all(feature = "debug", not(feature = "std")))]
compile_error!("`debug` requires `std`");

/// Implementation of [`Parser::traced`][crate::parser::Parser::traced].
pub struct Trace<P> {
    parser: P,
    #[cfg_attr(not(feature = "debug"), allow(dead_code))]
    name: &'static str,
}

impl<P> Trace<P> {
    pub(crate) fn new(parser: P, name: &'static str) -> Self {
        Self { parser, name }
    }
}

impl<P: Parser> Parser for Trace<P> {
    type Input = P::Input;
    type State = P::State;
    type Output = P::Output;

    #[cfg_attr(not(feature = "debug"), inline(always))]
    fn initial(&mut self) -> Start<P::State, P::Output> {
        let res = self.parser.initial();
        #[cfg(feature = "debug")]
        {
            let depth = internals::Depth::new();
            internals::start(*depth, self.name, &res);
        }
        res
    }

    #[cfg_attr(not(feature = "debug"), inline(always))]
    fn step(&mut self, state: P::State, input: P::Input) -> ParseStep<P::State, P::Output> {
        #[cfg(feature = "debug")]
        let depth = internals::Depth::new();
        let res = self.parser.step(state, input);
        #[cfg(feature = "debug")]
        internals::step(*depth, self.name, "step", &res);
        res
    }

    #[cfg_attr(not(feature = "debug"), inline(always))]
    fn extract(&mut self, state: P::State) -> ParseStep<P::State, P::Output> {
        #[cfg(feature = "debug")]
        let depth = internals::Depth::new();
        let res = self.parser.extract(state);
        #[cfg(feature = "debug")]
        internals::step(*depth, self.name, "extract", &res);
        res
    }
}
