//! Integer arithmetic: `+ - * / \` (the last is remainder), unary minus and brackets.

use std::sync::Arc;

use logos::Logos;
use strum::EnumProperty;
use thiserror::Error;

use super::{SourceError, run};
use crate::{
    Engine, Grammar, Token,
    error::{GrammarError, UnknownSymbol},
    symbol::Symbols,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    #[error(transparent)]
    Symbol(#[from] UnknownSymbol),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos, EnumProperty)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum CalcToken {
    #[strum(props(symbol = "number"))]
    #[regex("[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Number(i64),
    #[strum(props(symbol = "+"))]
    #[token("+")]
    Plus,
    #[strum(props(symbol = "-"))]
    #[token("-")]
    Minus,
    #[strum(props(symbol = "*"))]
    #[token("*")]
    Times,
    #[strum(props(symbol = "/"))]
    #[token("/")]
    Divide,
    #[strum(props(symbol = "\\"))]
    #[token("\\")]
    Remainder,
    #[strum(props(symbol = "("))]
    #[token("(")]
    OpenGroup,
    #[strum(props(symbol = ")"))]
    #[token(")")]
    CloseGroup,
}

type Reduction = Result<Token<i64>, CalcError>;

fn binary(
    f: fn(i64, i64) -> Result<i64, CalcError>,
) -> impl Fn(&Symbols, Vec<Token<i64>>) -> Reduction + Send + Sync + 'static {
    move |symbols: &Symbols, tokens: Vec<Token<i64>>| {
        let [lhs, _, rhs] = tokens.as_slice() else {
            unreachable!("binary rules have three symbols")
        };
        Ok(symbols.token("number", f(lhs.value, rhs.value)?)?)
    }
}

fn checked(value: Option<i64>) -> Result<i64, CalcError> {
    value.ok_or(CalcError::Overflow)
}

fn divisor(rhs: i64) -> Result<i64, CalcError> {
    if rhs == 0 {
        Err(CalcError::DivisionByZero)
    } else {
        Ok(rhs)
    }
}

/// The arithmetic grammar. `number` is both the input and the result.
///
/// # Errors
/// Never, in practice; the declarations are fixed.
pub fn grammar() -> Result<Grammar<i64, CalcError>, GrammarError> {
    Grammar::builder()
        .input_output("number")
        .leaf("+")
        .leaf("-")
        .leaf_with_precedence("*", 1)
        .leaf_with_precedence("/", 1)
        .leaf_with_precedence("\\", 2)
        .leaf("(")
        .leaf(")")
        .rule("number + number", binary(|a, b| checked(a.checked_add(b))))
        .rule("number - number", binary(|a, b| checked(a.checked_sub(b))))
        .rule("- number", |symbols: &Symbols, tokens: Vec<Token<i64>>| {
            let value = checked(tokens[1].value.checked_neg())?;
            Ok(symbols.token("number", value)?)
        })
        .rule("number * number", binary(|a, b| checked(a.checked_mul(b))))
        .rule(
            "number / number",
            binary(|a, b| checked(a.checked_div(divisor(b)?))),
        )
        .rule(
            "number \\ number",
            binary(|a, b| checked(a.checked_rem(divisor(b)?))),
        )
        .rule("( number ) 3", |_: &Symbols, mut tokens: Vec<Token<i64>>| {
            Ok(tokens.swap_remove(1))
        })
        .build()
}

/// Evaluates arithmetic expressions.
#[derive(Debug)]
pub struct Calculator {
    engine: Engine<i64, CalcError>,
}

impl Calculator {
    /// # Errors
    /// See [`grammar`].
    pub fn new() -> Result<Calculator, GrammarError> {
        Ok(Calculator::with_grammar(Arc::new(grammar()?)))
    }

    /// A calculator sharing an already built grammar.
    pub fn with_grammar(grammar: Arc<Grammar<i64, CalcError>>) -> Calculator {
        Calculator {
            engine: Engine::new(grammar),
        }
    }

    /// A calculator driving a pre-configured engine, for example one with an observer.
    pub fn with_engine(engine: Engine<i64, CalcError>) -> Calculator {
        Calculator { engine }
    }

    /// # Errors
    /// If `source` does not scan, is not a complete expression, or divides by zero
    /// or overflows.
    pub fn evaluate(&mut self, source: &str) -> Result<i64, SourceError<CalcError>> {
        run(&mut self.engine, source, |token: CalcToken| match token {
            CalcToken::Number(n) => n,
            _ => 0,
        })
    }
}
