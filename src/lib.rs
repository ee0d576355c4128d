//! A shift-reduce parsing engine driven by declared rules.
//!
//! A [`Grammar`] is a list of symbols and the rules that combine them. An [`Engine`]
//! is fed tokens one at a time and reduces the stack with those rules, using the
//! precedence of the most recent token to decide whether to reduce now or wait.
//! Ready-made grammars for arithmetic and JSON live in [`grammars`].

#![forbid(unsafe_code)]
#![warn(explicit_outlives_requirements)]
#![warn(missing_debug_implementations)]
#![warn(clippy::pedantic)]
#![warn(missing_copy_implementations)]
#![warn(redundant_lifetimes)]
//#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_qualifications)]
#![allow(clippy::must_use_candidate)]

mod debug;
mod error;
mod grammar;
pub mod grammars;
pub mod key;
mod parser;
mod proptesting;
mod rule;
mod stack;
mod symbol;
mod token;
mod trace;

pub use error::{GrammarError, KeyError, NoSolution, ParseError, UnknownSymbol};
pub use grammar::{Grammar, GrammarBuilder};
pub use parser::{Engine, ScanOrder};
pub use rule::{Pattern, ReduceFn, Rule, RuleDecl, RuleTable};
pub use stack::TokenStack;
pub use symbol::{Symbol, SymbolDecl, SymbolRole, Symbols};
pub use token::Token;
pub use trace::{Event, EventKind, Observer};
