use std::{
    fmt::{self, Debug},
    sync::Arc,
};

use strum::{Display, VariantArray};
use tracing::{debug, trace};

use crate::{
    Grammar, Token,
    error::{NoSolution, ParseError, UnknownSymbol},
    stack::TokenStack,
    trace::{Event, Observer},
};

/// Which end of the stack a reduction scan tries first.
///
/// Only matters for grammars where more than one suffix of the stack matches a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, VariantArray)]
#[strum(serialize_all = "kebab-case")]
pub enum ScanOrder {
    /// Try the longest candidate suffix first.
    #[default]
    LeftmostFirst,
    /// Try the shortest candidate suffix first.
    RightmostFirst,
}

type BoxedObserver = Box<dyn Observer + Send>;

/// A shift-reduce parser over one [`Grammar`].
///
/// Tokens are pushed one at a time. After each push the stack is reduced as far as
/// it can be without knowing what comes next, with the most recent token held back
/// as lookahead. A rule is not applied while the lookahead has a higher precedence
/// than the rule, which is what makes `1 + 2 * 3` come out right.
///
/// An engine is a single mutable parse, but any number of them can share a grammar.
pub struct Engine<V, E> {
    grammar: Arc<Grammar<V, E>>,
    stack: TokenStack<V>,
    order: ScanOrder,
    ended: bool,
    observer: Option<BoxedObserver>,
}

impl<V, E> Engine<V, E> {
    pub fn new(grammar: impl Into<Arc<Grammar<V, E>>>) -> Engine<V, E> {
        Engine {
            grammar: grammar.into(),
            stack: TokenStack::new(),
            order: ScanOrder::default(),
            ended: false,
            observer: None,
        }
    }

    #[must_use]
    pub fn with_scan_order(mut self, order: ScanOrder) -> Engine<V, E> {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl Observer + Send + 'static) -> Engine<V, E> {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn grammar(&self) -> &Arc<Grammar<V, E>> {
        &self.grammar
    }

    pub fn scan_order(&self) -> ScanOrder {
        self.order
    }

    pub fn stack(&self) -> &TokenStack<V> {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// # Errors
    /// If the grammar has no symbol called `name`.
    pub fn create_token(&self, name: &str, value: V) -> Result<Token<V>, UnknownSymbol> {
        self.grammar.symbols().token(name, value)
    }

    /// Shift `token` and reduce what can be reduced.
    ///
    /// If a reduction fails, the engine refuses more input until [`reset`](Self::reset).
    ///
    /// # Errors
    /// If the token is not an input symbol of this engine's grammar, if the input has
    /// already been ended, or if a reduction fails.
    pub fn push_token(&mut self, token: Token<V>) -> Result<(), ParseError<E>> {
        if self.ended {
            return Err(ParseError::Ended);
        }
        let symbol = token.symbol();
        if !self.grammar.symbols().owns(token.symbol_ref()) {
            return Err(UnknownSymbol(symbol.name().to_owned()).into());
        }
        if !symbol.role().is_input() {
            return Err(ParseError::InvalidPush {
                symbol: symbol.name().to_owned(),
                role: symbol.role(),
            });
        }

        notify(&mut self.observer, &Event::Pushed { symbol });
        self.stack.push(token);
        let reduced = self.reduce(false);
        // The failed rule's tokens are gone, so the stack no longer reflects the input
        self.ended = reduced.is_err();
        reduced
    }

    /// Create a token of the symbol called `name` and push it.
    ///
    /// # Errors
    /// See [`create_token`](Self::create_token) and [`push_token`](Self::push_token).
    pub fn push(&mut self, name: &str, value: V) -> Result<(), ParseError<E>> {
        let token = self.create_token(name, value)?;
        self.push_token(token)
    }

    /// Signal the end of input and take the result.
    ///
    /// On success the engine is ready for a new parse. On failure it refuses more
    /// input until [`reset`](Self::reset).
    ///
    /// # Errors
    /// [`ParseError::EmptyInput`] if nothing was pushed, [`ParseError::NoSolution`]
    /// unless the stack reduces to a single output token, or a reduction error.
    pub fn end_of_tokens(&mut self) -> Result<V, ParseError<E>> {
        if self.ended {
            return Err(ParseError::Ended);
        }
        if self.stack.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        self.ended = true;
        self.reduce(true)?;

        let below = self.stack.len().saturating_sub(1);
        let failure = match self.stack.pop() {
            Some(token) if below == 0 && token.symbol().role().is_output() => {
                debug!(symbol = %token.symbol(), "solution found");
                notify(
                    &mut self.observer,
                    &Event::Solution {
                        symbol: token.symbol(),
                    },
                );
                self.ended = false;
                return Ok(token.into_value());
            }
            Some(token) => {
                let failure = if below == 0 {
                    NoSolution::NotRoot(token.symbol().name().to_owned())
                } else {
                    NoSolution::TokenCount(below + 1)
                };
                self.stack.push(token);
                failure
            }
            None => NoSolution::TokenCount(0),
        };
        debug!(stack = %self.stack, "{failure}");
        Err(ParseError::NoSolution(failure))
    }

    /// Run a whole parse of `tokens` from a clean state.
    ///
    /// # Errors
    /// See [`push_token`](Self::push_token) and [`end_of_tokens`](Self::end_of_tokens).
    pub fn parse(
        &mut self,
        tokens: impl IntoIterator<Item = Token<V>>,
    ) -> Result<V, ParseError<E>> {
        self.reset();
        for token in tokens {
            self.push_token(token)?;
        }
        self.end_of_tokens()
    }

    /// Discard the stack and any ended state.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.ended = false;
        notify(&mut self.observer, &Event::Reset);
    }

    fn reduce(&mut self, at_end: bool) -> Result<(), ParseError<E>> {
        let grammar = Arc::clone(&self.grammar);
        let symbols = grammar.symbols();
        let rules = grammar.rules();

        'scan: loop {
            let lookahead = if at_end {
                None
            } else {
                self.stack.last().map(|t| Arc::clone(t.symbol_ref()))
            };
            let end = self.stack.len() - usize::from(lookahead.is_some());
            let start = end.saturating_sub(rules.longest_pattern());

            for n in 0..end - start {
                let offset = match self.order {
                    ScanOrder::LeftmostFirst => start + n,
                    ScanOrder::RightmostFirst => end - 1 - n,
                };
                let Some(rule) = rules.lookup(self.stack.key(offset..end)) else {
                    continue;
                };
                let pattern = rule.pattern();

                if let Some(lookahead) = lookahead
                    .as_deref()
                    .filter(|l| l.precedence() > rule.precedence())
                {
                    notify(
                        &mut self.observer,
                        &Event::Deferred {
                            pattern,
                            offset,
                            lookahead,
                        },
                    );
                    continue;
                }

                notify(&mut self.observer, &Event::Matched { pattern, offset });
                let reduce = |tokens: Vec<Token<V>>| -> Result<Token<V>, ParseError<E>> {
                    let token = rule.reduce(symbols, tokens).map_err(ParseError::Reduction)?;
                    if symbols.owns(token.symbol_ref()) {
                        Ok(token)
                    } else {
                        Err(UnknownSymbol(token.symbol().name().to_owned()).into())
                    }
                };
                self.stack.splice_replace_with(offset, end - offset, reduce)?;

                let result = self.stack.as_slice()[offset].symbol();
                notify(
                    &mut self.observer,
                    &Event::Reduced {
                        pattern,
                        offset,
                        result,
                    },
                );
                continue 'scan;
            }
            return Ok(());
        }
    }
}

fn notify(observer: &mut Option<BoxedObserver>, event: &Event<'_>) {
    trace!(kind = %event.kind(), "{event}");
    if let Some(observer) = observer {
        observer.observe(event);
    }
}

impl<V: Debug, E> Debug for Engine<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("stack", &self.stack)
            .field("order", &self.order)
            .field("ended", &self.ended)
            .field("observed", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}
