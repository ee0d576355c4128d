use std::{
    fmt::{self, Debug},
    sync::Arc,
};

use crate::symbol::Symbol;

/// A symbol paired with the value a scanner or a reduction gave it.
///
/// The engine never looks at `value`, only reduction functions do.
#[derive(Clone)]
pub struct Token<V> {
    symbol: Arc<Symbol>,
    pub value: V,
}

impl<V> Token<V> {
    pub fn new(symbol: Arc<Symbol>, value: V) -> Token<V> {
        Token { symbol, value }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn symbol_ref(&self) -> &Arc<Symbol> {
        &self.symbol
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V: Debug> Debug for Token<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.symbol.name(), self.value)
    }
}

impl<V: PartialEq> PartialEq for Token<V> {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.value == other.value
    }
}

#[cfg(test)]
mod test {
    use crate::symbol::{SymbolDecl, SymbolRole, Symbols};

    #[test]
    fn debug_shows_symbol_and_value() {
        let symbols = Symbols::new([
            SymbolDecl::new("string", SymbolRole::Leaf),
            SymbolDecl::new("value", SymbolRole::Root),
        ])
        .unwrap();
        let tokens = [
            symbols.token("string", "key").unwrap(),
            symbols.token("value", "key").unwrap(),
        ];
        insta::assert_compact_debug_snapshot!(tokens, @r#"[string("key"), value("key")]"#);
        assert_ne!(tokens[0], tokens[1]);
        assert_eq!(tokens[0].clone().into_value(), "key");
    }
}
