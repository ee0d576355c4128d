use std::fmt::{self, Display};

use strum::{Display, EnumDiscriminants, IntoStaticStr, VariantArray};

use crate::symbol::Symbol;

/// Something the engine decided, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(EventKind), derive(IntoStaticStr, Display, VariantArray, Hash))]
pub enum Event<'a> {
    /// A token was appended to the stack.
    Pushed { symbol: &'a Symbol },
    /// A rule matched but the lookahead binds tighter, so it was passed over.
    Deferred {
        pattern: &'a str,
        offset: usize,
        lookahead: &'a Symbol,
    },
    Matched { pattern: &'a str, offset: usize },
    Reduced {
        pattern: &'a str,
        offset: usize,
        result: &'a Symbol,
    },
    /// End of input left exactly one output token.
    Solution { symbol: &'a Symbol },
    Reset,
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        EventKind::from(self)
    }
}

impl Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Pushed { symbol } => write!(f, "push {symbol}"),
            Event::Deferred {
                pattern,
                offset,
                lookahead,
            } => write!(f, "defer {pattern} at {offset} (lookahead {lookahead})"),
            Event::Matched { pattern, offset } => write!(f, "match {pattern} at {offset}"),
            Event::Reduced {
                pattern,
                offset,
                result,
            } => write!(f, "reduce {pattern} at {offset} -> {result}"),
            Event::Solution { symbol } => write!(f, "solution {symbol}"),
            Event::Reset => f.write_str("reset"),
        }
    }
}

/// Receives every [`Event`] of the engine it is attached to.
pub trait Observer {
    fn observe(&mut self, event: &Event<'_>);
}

impl<F> Observer for F
where
    F: FnMut(&Event<'_>),
{
    fn observe(&mut self, event: &Event<'_>) {
        self(event);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::{SymbolDecl, SymbolRole, Symbols};

    #[test]
    fn kinds_and_display() {
        let symbols = Symbols::new([
            SymbolDecl::new("number", SymbolRole::InputOutput),
            SymbolDecl::new("*", SymbolRole::Leaf),
        ])
        .unwrap();
        let number = symbols.by_name("number").unwrap();
        let times = symbols.by_name("*").unwrap();

        let events = [
            Event::Pushed { symbol: number },
            Event::Deferred {
                pattern: "number * number",
                offset: 0,
                lookahead: times,
            },
            Event::Solution { symbol: number },
            Event::Reset,
        ];
        let lines: Vec<_> = events
            .iter()
            .map(|e| format!("{}: {e}", e.kind()))
            .collect();
        insta::assert_compact_debug_snapshot!(lines, @r#"["Pushed: push number", "Deferred: defer number * number at 0 (lookahead *)", "Solution: solution number", "Reset: reset"]"#);
        assert_eq!(EventKind::VARIANTS.len(), 6);
    }

    #[test]
    fn closures_observe() {
        let mut seen = vec![];
        let mut observer = |e: &Event<'_>| seen.push(e.kind());
        observer.observe(&Event::Reset);
        observer.observe(&Event::Reset);
        assert_eq!(seen, [EventKind::Reset, EventKind::Reset]);
    }
}
