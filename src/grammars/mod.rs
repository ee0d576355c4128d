//! Ready-made grammars, each paired with a `logos` scanner so they can be run
//! straight from source text.

use std::{fmt::Display, ops::Range};

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use logos::Logos;
use strum::EnumProperty;
use thiserror::Error;

use crate::{Engine, ParseError};

pub mod calc;
pub mod json;

/// A failure while parsing source text, with the byte range it happened at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError<E> {
    #[error("unrecognised input")]
    Scan { span: Range<usize> },
    #[error("{error}")]
    Parse {
        span: Range<usize>,
        error: ParseError<E>,
    },
}

impl<E> SourceError<E> {
    pub fn span(&self) -> Range<usize> {
        match self {
            SourceError::Scan { span } | SourceError::Parse { span, .. } => span.clone(),
        }
    }

    pub fn parse_error(&self) -> Option<&ParseError<E>> {
        match self {
            SourceError::Scan { .. } => None,
            SourceError::Parse { error, .. } => Some(error),
        }
    }

    /// Render the error as a diagnostic pointing into `source`, which must be the text
    /// that was parsed.
    pub fn report(&self, source: &str) -> String
    where
        E: Display,
    {
        let span = self.span();
        let label = match self {
            SourceError::Scan { .. } => "not a token",
            SourceError::Parse {
                error: ParseError::NoSolution(_),
                ..
            } => "input ends here",
            SourceError::Parse { .. } => "while reading this",
        };

        let mut out = vec![];
        let written = Report::build(ReportKind::Error, span.clone())
            .with_config(
                Config::default()
                    .with_color(false)
                    .with_index_type(IndexType::Byte),
            )
            .with_message(self)
            .with_label(Label::new(span).with_message(label))
            .finish()
            .write(Source::from(source), &mut out);

        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Scan `source` with the lexer `T` and feed every token to `engine`.
///
/// Each token kind names its grammar symbol with a `symbol` strum property.
pub(crate) fn run<'s, T, V, E>(
    engine: &mut Engine<V, E>,
    source: &'s str,
    mut into_value: impl FnMut(T) -> V,
) -> Result<V, SourceError<E>>
where
    T: Logos<'s, Source = str> + EnumProperty,
    T::Extras: Default,
{
    engine.reset();
    for (token, span) in T::lexer(source).spanned() {
        let Ok(token) = token else {
            return Err(SourceError::Scan { span });
        };
        let Some(symbol) = token.get_str("symbol") else {
            unreachable!("every token kind names its symbol")
        };
        let value = into_value(token);
        engine
            .push(symbol, value)
            .map_err(|error| SourceError::Parse { span, error })?;
    }

    let end = source.trim_end().len();
    engine.end_of_tokens().map_err(|error| SourceError::Parse {
        span: end..end,
        error,
    })
}
