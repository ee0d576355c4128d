use thiserror::Error;

use crate::symbol::SymbolRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("{0} cannot be encoded as a key, only 0..=0x10FFFF is supported")]
    InvalidInput(i64),
    #[error("not a valid key (at byte {offset})")]
    InvalidEncoding { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no such symbol '{0}'")]
pub struct UnknownSymbol(pub String);

/// Problems with a grammar declaration. These only occur while a [`Grammar`](crate::Grammar) is being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("there can be only one root symbol, found {0}")]
    RootCount(usize),
    #[error("at least one input symbol is needed")]
    NoInput,
    #[error("symbol '{0}' is declared more than once")]
    DuplicateSymbol(String),
    #[error("too many symbols: {0}")]
    Key(#[from] KeyError),
    #[error("rule pattern is empty")]
    EmptyPattern,
    #[error("in rule '{pattern}': {source}")]
    UnknownSymbol {
        pattern: String,
        source: UnknownSymbol,
    },
    #[error("rule '{pattern}' has the same symbols as rule '{existing}'")]
    DuplicateRule { pattern: String, existing: String },
}

/// Why the remaining tokens at the end of input are not a solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoSolution {
    #[error("token count is not 1 but {0}")]
    TokenCount(usize),
    #[error("remaining token '{0}' is not root")]
    NotRoot(String),
}

/// Failures while feeding an [`Engine`](crate::Engine).
///
/// `E` is the error type of the grammar's reduction functions, which is passed
/// through untouched in [`ParseError::Reduction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError<E> {
    #[error(transparent)]
    UnknownSymbol(#[from] UnknownSymbol),
    #[error("cannot push '{symbol}', it is a {role} symbol")]
    InvalidPush { symbol: String, role: SymbolRole },
    #[error("no tokens pushed")]
    EmptyInput,
    #[error("end of tokens reached, but no valid solution: {0}")]
    NoSolution(NoSolution),
    #[error("the parse has already failed, the parser needs a reset")]
    Ended,
    #[error("{0}")]
    Reduction(E),
}

impl<E> ParseError<E> {
    /// The reduction function's own error, if that is what failed.
    pub fn into_reduction(self) -> Option<E> {
        match self {
            ParseError::Reduction(e) => Some(e),
            _ => None,
        }
    }
}
