//! `burlap` is a grammar-driven command line input parser and value-binding engine.
//!
//! The caller declares a grammar of commands, options, and positional
//! arguments, then hands `burlap` a pre-split token list.
//! In one synchronous pass, the engine distributes every token to a grammar
//! symbol, converts the claimed tokens to typed values, and exposes the whole
//! run as a read-only result tree.
//! `burlap` prioritizes the following design concerns:
//! * *Parsing never fails as a call*:
//! End-user input problems (bad arity, unknown tokens, failed conversions)
//! accumulate as data on the outcome's error list, all discovered in a single
//! pass.
//! Panics are reserved for grammar authoring and API contract violations.
//! * *Every token is accounted for*:
//! Each input token ends the run claimed by exactly one symbol, recorded as a
//! directive or separator, or listed as unmatched.
//! * *Type safe value binding*:
//! Converted values are read through [`std::str::FromStr`], or through custom
//! converters which may partially consume a claim and pass the remainder on
//! to the next positional argument.
//! * *Completion from the same grammar*:
//! [`Grammar::complete`] enumerates and ranks candidates for a partially
//! typed token list, deterministically, without a separate declaration.
//!
//! # Usage
//! ```
//! use burlap::{Arity, GrammarBuilder, Token};
//!
//! let mut builder = GrammarBuilder::new("greet").unwrap();
//! let root = builder.root();
//! let verbose = builder.flag(root, &["-v", "--verbose"]).unwrap();
//! let name = builder.argument(root, "name", Arity::exactly(1)).unwrap();
//! let grammar = builder.build();
//!
//! let outcome = grammar.parse(vec![Token::option("--verbose"), Token::value("World")]);
//! assert!(outcome.errors().is_empty());
//! assert_eq!(outcome.value::<bool>(verbose), Ok(true));
//! assert_eq!(outcome.value::<String>(name), Ok("World".to_string()));
//! ```
//!
//! `burlap` does not tokenize raw process arguments, render help text, or
//! emit shell completion scripts; it operates strictly between a token list
//! and a typed result tree.
#![deny(missing_docs)]
mod complete;
mod convert;
mod distribute;
mod grammar;
mod model;
mod parse;
mod token;
mod tree;

pub use complete::Candidate;
pub use convert::{ArgumentConversionResult, Value};
pub use grammar::{ConvertFn, DefaultFn, Grammar, GrammarBuilder, GrammarError, SymbolId};
pub use model::Arity;
pub use parse::ParseOutcome;
pub use token::{Token, TokenKind};
pub use tree::{
    ArgumentResult, CommandResult, OptionResult, ParseError, ParseErrorKind, SymbolResult,
    SymbolResultTree,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
