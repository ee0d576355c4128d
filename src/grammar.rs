use std::fmt::{self, Debug};

use crate::{
    Token,
    error::GrammarError,
    rule::{Pattern, RuleDecl, RuleTable},
    symbol::{SymbolDecl, SymbolRole, Symbols},
};

/// A validated set of symbols and the rules over them.
///
/// A grammar never changes after it is built, and can be shared between any number
/// of [`Engine`](crate::Engine)s through an `Arc`.
pub struct Grammar<V, E> {
    symbols: Symbols,
    rules: RuleTable<V, E>,
}

impl<V, E> Grammar<V, E> {
    pub fn builder() -> GrammarBuilder<V, E> {
        GrammarBuilder::default()
    }

    /// # Errors
    /// If the symbols or the rules do not form a valid grammar, see [`GrammarError`].
    pub fn new(
        symbols: impl IntoIterator<Item = SymbolDecl>,
        rules: impl IntoIterator<Item = RuleDecl<V, E>>,
    ) -> Result<Grammar<V, E>, GrammarError> {
        let symbols = Symbols::new(symbols)?;
        let rules = RuleTable::new(&symbols, rules)?;
        Ok(Grammar { symbols, rules })
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    pub fn rules(&self) -> &RuleTable<V, E> {
        &self.rules
    }
}

impl<V, E> Debug for Grammar<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("symbols", &self.symbols)
            .field("rules", &self.rules)
            .finish()
    }
}

/// Collects symbol and rule declarations. Nothing is checked until [`build`](Self::build).
pub struct GrammarBuilder<V, E> {
    symbols: Vec<SymbolDecl>,
    rules: Vec<RuleDecl<V, E>>,
}

impl<V, E> Default for GrammarBuilder<V, E> {
    fn default() -> Self {
        GrammarBuilder {
            symbols: vec![],
            rules: vec![],
        }
    }
}

impl<V, E> GrammarBuilder<V, E> {
    #[must_use]
    pub fn symbol(mut self, name: &str, role: SymbolRole, precedence: i32) -> Self {
        self.symbols.push(SymbolDecl::new(name, role).with_precedence(precedence));
        self
    }

    #[must_use]
    pub fn leaf(self, name: &str) -> Self {
        self.symbol(name, SymbolRole::Leaf, 0)
    }

    #[must_use]
    pub fn leaf_with_precedence(self, name: &str, precedence: i32) -> Self {
        self.symbol(name, SymbolRole::Leaf, precedence)
    }

    #[must_use]
    pub fn branch(self, name: &str) -> Self {
        self.symbol(name, SymbolRole::Branch, 0)
    }

    #[must_use]
    pub fn root(self, name: &str) -> Self {
        self.symbol(name, SymbolRole::Root, 0)
    }

    #[must_use]
    pub fn input_output(self, name: &str) -> Self {
        self.symbol(name, SymbolRole::InputOutput, 0)
    }

    /// Add a rule whose precedence comes from its pattern.
    #[must_use]
    pub fn rule<F>(mut self, pattern: impl Into<Pattern>, reduce: F) -> Self
    where
        F: Fn(&Symbols, Vec<Token<V>>) -> Result<Token<V>, E> + Send + Sync + 'static,
    {
        self.rules.push(RuleDecl::new(pattern, reduce));
        self
    }

    #[must_use]
    pub fn rule_with_precedence<F>(
        mut self,
        pattern: impl Into<Pattern>,
        precedence: i32,
        reduce: F,
    ) -> Self
    where
        F: Fn(&Symbols, Vec<Token<V>>) -> Result<Token<V>, E> + Send + Sync + 'static,
    {
        self.rules.push(RuleDecl::new(pattern, reduce).with_precedence(precedence));
        self
    }

    /// # Errors
    /// See [`Grammar::new`].
    pub fn build(self) -> Result<Grammar<V, E>, GrammarError> {
        Grammar::new(self.symbols, self.rules)
    }
}

impl<V, E> Debug for GrammarBuilder<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarBuilder")
            .field("symbols", &self.symbols)
            .field("rules", &self.rules)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::UnknownSymbol;

    fn keep(_: &Symbols, mut tokens: Vec<Token<()>>) -> Result<Token<()>, ()> {
        tokens.pop().ok_or(())
    }

    #[test]
    fn builder_declares_in_order() {
        let grammar = Grammar::builder()
            .leaf("a")
            .leaf_with_precedence("b", 2)
            .branch("c")
            .root("d")
            .rule("a b", keep)
            .rule_with_precedence("c", 7, keep)
            .build()
            .unwrap();

        let names: Vec<_> = grammar.symbols().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
        let rules: Vec<_> = grammar
            .rules()
            .iter()
            .map(|r| (r.pattern(), r.precedence()))
            .collect();
        assert_eq!(rules, [("a b", 2), ("c", 7)]);
    }

    #[test]
    fn errors_surface_on_build() {
        let err = Grammar::builder()
            .input_output("a")
            .rule("a b", keep)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnknownSymbol {
                pattern: "a b".into(),
                source: UnknownSymbol("b".into())
            }
        );

        let err = Grammar::<(), ()>::builder()
            .input_output("a")
            .root("b")
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::RootCount(2));
    }
}
