//! JSON documents, read into [`serde_json::Value`]s.
//!
//! Arrays and objects are built up one element at a time through the `elements` and
//! `properties` branch symbols. A string followed by a colon becomes a `key`, which
//! is why the colon carries a precedence: it keeps the string from being promoted to
//! a plain value first.

use std::sync::Arc;

use logos::{Lexer, Logos};
use serde_json::{Map, Number, Value};
use strum::EnumProperty;

use super::{SourceError, run};
use crate::{
    Engine, Grammar, Token,
    error::{GrammarError, UnknownSymbol},
    symbol::Symbols,
};

pub type JsonError = SourceError<UnknownSymbol>;

fn string(lex: &mut Lexer<'_, JsonToken>) -> Option<String> {
    serde_json::from_str(lex.slice()).ok()
}

fn number(lex: &mut Lexer<'_, JsonToken>) -> Option<Number> {
    serde_json::from_str(lex.slice()).ok()
}

#[derive(Debug, Clone, PartialEq, Logos, EnumProperty)]
#[logos(skip r"[ \t\r\n]+")]
pub enum JsonToken {
    #[strum(props(symbol = "null"))]
    #[token("null")]
    Null,
    #[strum(props(symbol = "boolean"))]
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Boolean(bool),
    #[strum(props(symbol = "number"))]
    #[regex(r"-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?", number)]
    Number(Number),
    #[strum(props(symbol = "string"))]
    #[regex(r#""([^"\\]|\\.)*""#, string)]
    String(String),
    #[strum(props(symbol = "{"))]
    #[token("{")]
    OpenObject,
    #[strum(props(symbol = "}"))]
    #[token("}")]
    CloseObject,
    #[strum(props(symbol = "["))]
    #[token("[")]
    OpenArray,
    #[strum(props(symbol = "]"))]
    #[token("]")]
    CloseArray,
    #[strum(props(symbol = ","))]
    #[token(",")]
    Comma,
    #[strum(props(symbol = ":"))]
    #[token(":")]
    Colon,
}

impl From<JsonToken> for Value {
    fn from(token: JsonToken) -> Value {
        match token {
            JsonToken::Boolean(b) => Value::Bool(b),
            JsonToken::Number(n) => Value::Number(n),
            JsonToken::String(s) => Value::String(s),
            _ => Value::Null,
        }
    }
}

type Reduction = Result<Token<Value>, UnknownSymbol>;

fn promote(
    to: &'static str,
) -> impl Fn(&Symbols, Vec<Token<Value>>) -> Reduction + Send + Sync + 'static {
    move |symbols: &Symbols, tokens: Vec<Token<Value>>| {
        let Some(token) = tokens.into_iter().next() else {
            unreachable!("promotions have one symbol")
        };
        symbols.token(to, token.into_value())
    }
}

fn empty(
    to: &'static str,
    value: fn() -> Value,
) -> impl Fn(&Symbols, Vec<Token<Value>>) -> Reduction + Send + Sync + 'static {
    move |symbols: &Symbols, _: Vec<Token<Value>>| symbols.token(to, value())
}

fn start_array(symbols: &Symbols, mut tokens: Vec<Token<Value>>) -> Reduction {
    let first = tokens.swap_remove(1).into_value();
    symbols.token("elements", Value::Array(vec![first]))
}

fn add_element(_: &Symbols, mut tokens: Vec<Token<Value>>) -> Reduction {
    let [elements, _, value] = tokens.as_mut_slice() else {
        unreachable!("element rules have three symbols")
    };
    if let Value::Array(items) = &mut elements.value {
        items.push(value.value.take());
    }
    Ok(tokens.swap_remove(0))
}

fn insert(properties: &mut Value, key: Value, value: Value) {
    if let (Value::Object(map), Value::String(key)) = (properties, key) {
        map.insert(key, value);
    }
}

fn start_object(symbols: &Symbols, mut tokens: Vec<Token<Value>>) -> Reduction {
    let [_, key, value] = tokens.as_mut_slice() else {
        unreachable!("object rules have three symbols")
    };
    let mut properties = Value::Object(Map::new());
    insert(&mut properties, key.value.take(), value.value.take());
    symbols.token("properties", properties)
}

fn add_property(_: &Symbols, mut tokens: Vec<Token<Value>>) -> Reduction {
    let [properties, _, key, value] = tokens.as_mut_slice() else {
        unreachable!("property rules have four symbols")
    };
    insert(&mut properties.value, key.value.take(), value.value.take());
    Ok(tokens.swap_remove(0))
}

/// The JSON grammar, with `value` as its root.
///
/// # Errors
/// Never, in practice; the declarations are fixed.
pub fn grammar() -> Result<Grammar<Value, UnknownSymbol>, GrammarError> {
    Grammar::builder()
        .leaf("null")
        .leaf("boolean")
        .leaf("number")
        .leaf("string")
        .leaf("{")
        .leaf("}")
        .leaf("[")
        .leaf("]")
        .leaf(",")
        .leaf_with_precedence(":", 1)
        .branch("object")
        .branch("array")
        .branch("properties")
        .branch("elements")
        .branch("key")
        .root("value")
        .rule("null", promote("value"))
        .rule("boolean", promote("value"))
        .rule("number", promote("value"))
        .rule("string", promote("value"))
        .rule("object", promote("value"))
        .rule("array", promote("value"))
        .rule("[ ]", empty("array", || Value::Array(vec![])))
        .rule("[ value", start_array)
        .rule("elements , value", add_element)
        .rule("elements ]", promote("array"))
        .rule("{ }", empty("object", || Value::Object(Map::new())))
        .rule("{ key value", start_object)
        .rule("properties , key value", add_property)
        .rule("properties }", promote("object"))
        .rule("string :", promote("key"))
        .build()
}

/// Reads JSON text.
#[derive(Debug)]
pub struct JsonReader {
    engine: Engine<Value, UnknownSymbol>,
}

impl JsonReader {
    /// # Errors
    /// See [`grammar`].
    pub fn new() -> Result<JsonReader, GrammarError> {
        Ok(JsonReader::with_grammar(Arc::new(grammar()?)))
    }

    pub fn with_grammar(grammar: Arc<Grammar<Value, UnknownSymbol>>) -> JsonReader {
        JsonReader {
            engine: Engine::new(grammar),
        }
    }

    /// # Errors
    /// If `source` is not a single well-formed JSON value.
    pub fn read(&mut self, source: &str) -> Result<Value, JsonError> {
        run(&mut self.engine, source, |token: JsonToken| Value::from(token))
    }
}
