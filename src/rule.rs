use std::{
    collections::{HashMap, hash_map::Entry},
    fmt::{self, Debug},
};

use crate::{
    Token,
    error::{GrammarError, UnknownSymbol},
    symbol::Symbols,
};

/// A reduction: turns the tokens a rule matched, in order, into one new token.
///
/// The registry is passed along so the new token can be created by symbol name.
pub type ReduceFn<V, E> = dyn Fn(&Symbols, Vec<Token<V>>) -> Result<Token<V>, E> + Send + Sync;

/// The symbol names a rule matches.
///
/// Built from whitespace separated text, or from a list of names. Textual patterns
/// may end in an integer that is not a symbol name, which is then the rule's
/// precedence: `"( number ) 3"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    names: Vec<String>,
    textual: bool,
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern {
            names: text.split_whitespace().map(str::to_owned).collect(),
            textual: true,
        }
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Pattern::from(text.as_str())
    }
}

impl From<&[&str]> for Pattern {
    fn from(names: &[&str]) -> Self {
        Pattern {
            names: names.iter().map(|&n| n.to_owned()).collect(),
            textual: false,
        }
    }
}

impl<const N: usize> From<[&str; N]> for Pattern {
    fn from(names: [&str; N]) -> Self {
        Pattern::from(&names[..])
    }
}

impl From<Vec<String>> for Pattern {
    fn from(names: Vec<String>) -> Self {
        Pattern {
            names,
            textual: false,
        }
    }
}

/// A rule as declared, before its symbols are resolved.
pub struct RuleDecl<V, E> {
    pattern: Pattern,
    precedence: i32,
    reduce: Box<ReduceFn<V, E>>,
}

impl<V, E> RuleDecl<V, E> {
    pub fn new<F>(pattern: impl Into<Pattern>, reduce: F) -> RuleDecl<V, E>
    where
        F: Fn(&Symbols, Vec<Token<V>>) -> Result<Token<V>, E> + Send + Sync + 'static,
    {
        RuleDecl {
            pattern: pattern.into(),
            precedence: 0,
            reduce: Box::new(reduce),
        }
    }

    /// Zero means the precedence is taken from the pattern.
    #[must_use]
    pub fn with_precedence(mut self, precedence: i32) -> RuleDecl<V, E> {
        self.precedence = precedence;
        self
    }
}

impl<V, E> Debug for RuleDecl<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDecl")
            .field("pattern", &self.pattern)
            .field("precedence", &self.precedence)
            .finish_non_exhaustive()
    }
}

pub struct Rule<V, E> {
    key: Box<[u8]>,
    pattern: String,
    len: usize,
    precedence: i32,
    reduce: Box<ReduceFn<V, E>>,
}

impl<V, E> Rule<V, E> {
    /// The concatenated keys of the pattern's symbols.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The pattern's symbol names, separated by spaces.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of symbols in the pattern.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn precedence(&self) -> i32 {
        self.precedence
    }

    /// Run the reduction on `tokens`, which must match the pattern.
    ///
    /// # Errors
    /// Whatever the reduction function returns.
    pub fn reduce(&self, symbols: &Symbols, tokens: Vec<Token<V>>) -> Result<Token<V>, E> {
        debug_assert_eq!(tokens.len(), self.len);
        (self.reduce)(symbols, tokens)
    }
}

impl<V, E> Debug for Rule<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern)
            .field("precedence", &self.precedence)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Rules indexed by key.
pub struct RuleTable<V, E> {
    rules: Vec<Rule<V, E>>,
    by_key: HashMap<Box<[u8]>, usize>,
    longest: usize,
}

impl<V, E> RuleTable<V, E> {
    /// Resolve each declaration against `symbols`.
    ///
    /// A rule with no precedence of its own takes the precedence of the left-most
    /// input symbol in its pattern that has one.
    ///
    /// # Errors
    /// If a pattern is empty, names an unknown symbol, or has the same symbols as an
    /// earlier rule.
    pub fn new(
        symbols: &Symbols,
        decls: impl IntoIterator<Item = RuleDecl<V, E>>,
    ) -> Result<RuleTable<V, E>, GrammarError> {
        let mut rules: Vec<Rule<V, E>> = vec![];
        let mut by_key = HashMap::new();
        let mut longest = 0;

        for decl in decls {
            let RuleDecl {
                pattern: Pattern { mut names, textual },
                mut precedence,
                reduce,
            } = decl;

            if textual && names.len() > 1 {
                let trailing = names
                    .last()
                    .filter(|n| symbols.by_name(n).is_none())
                    .and_then(|n| n.parse::<i32>().ok());
                if let Some(p) = trailing {
                    names.pop();
                    if precedence == 0 {
                        precedence = p;
                    }
                }
            }
            if names.is_empty() {
                return Err(GrammarError::EmptyPattern);
            }
            let pattern = names.join(" ");

            let mut key = vec![];
            let mut derived = 0;
            for name in &names {
                let Some(symbol) = symbols.by_name(name) else {
                    return Err(GrammarError::UnknownSymbol {
                        pattern,
                        source: UnknownSymbol(name.clone()),
                    });
                };
                key.extend_from_slice(symbol.key().as_bytes());
                if derived == 0 && symbol.role().is_input() {
                    derived = symbol.precedence();
                }
            }
            if precedence == 0 {
                precedence = derived;
            }

            let key: Box<[u8]> = key.into();
            match by_key.entry(key.clone()) {
                Entry::Occupied(e) => {
                    let existing: &Rule<V, E> = &rules[*e.get()];
                    return Err(GrammarError::DuplicateRule {
                        pattern,
                        existing: existing.pattern.clone(),
                    });
                }
                Entry::Vacant(e) => {
                    e.insert(rules.len());
                }
            }

            longest = longest.max(names.len());
            rules.push(Rule {
                key,
                pattern,
                len: names.len(),
                precedence,
                reduce,
            });
        }

        tracing::debug!(rules = rules.len(), longest, "rule table built");
        Ok(RuleTable {
            rules,
            by_key,
            longest,
        })
    }

    pub fn lookup(&self, key: &[u8]) -> Option<&Rule<V, E>> {
        self.by_key.get(key).map(|n| &self.rules[*n])
    }

    /// Symbol count of the longest pattern.
    pub fn longest_pattern(&self) -> usize {
        self.longest
    }

    /// Rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule<V, E>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<V, E> Debug for RuleTable<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.rules).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::{SymbolDecl, SymbolRole};

    type Decl = RuleDecl<i64, ()>;

    fn symbols() -> Symbols {
        Symbols::new([
            SymbolDecl::new("number", SymbolRole::InputOutput),
            SymbolDecl::new("+", SymbolRole::Leaf),
            SymbolDecl::new("*", SymbolRole::Leaf).with_precedence(1),
            SymbolDecl::new("^", SymbolRole::Leaf).with_precedence(2),
            SymbolDecl::new("(", SymbolRole::Leaf),
            SymbolDecl::new(")", SymbolRole::Leaf),
            SymbolDecl::new("term", SymbolRole::Branch).with_precedence(5),
            SymbolDecl::new("7", SymbolRole::Leaf),
        ])
        .unwrap()
    }

    fn first(_: &Symbols, tokens: Vec<Token<i64>>) -> Result<Token<i64>, ()> {
        tokens.into_iter().next().ok_or(())
    }

    fn table(patterns: &[&str]) -> Result<RuleTable<i64, ()>, GrammarError> {
        let decls: Vec<Decl> = patterns.iter().map(|&p| RuleDecl::new(p, first)).collect();
        RuleTable::new(&symbols(), decls)
    }

    fn precedence_of(table: &RuleTable<i64, ()>, pattern: &str) -> i32 {
        table.iter().find(|r| r.pattern() == pattern).unwrap().precedence()
    }

    #[test]
    fn precedence_from_leftmost_input_symbol() {
        let table = table(&[
            "number + number",
            "number * number",
            "number * number ^ number",
            "number ^ number * number",
            "term + number",
            "term * number",
        ])
        .unwrap();

        assert_eq!(precedence_of(&table, "number + number"), 0);
        assert_eq!(precedence_of(&table, "number * number"), 1);
        assert_eq!(precedence_of(&table, "number * number ^ number"), 1);
        assert_eq!(precedence_of(&table, "number ^ number * number"), 2);
        // Branch precedence is ignored
        assert_eq!(precedence_of(&table, "term + number"), 0);
        assert_eq!(precedence_of(&table, "term * number"), 1);
    }

    #[test]
    fn explicit_precedence() {
        let decls: Vec<Decl> = vec![
            RuleDecl::new("( number )", first).with_precedence(3),
            RuleDecl::new("number * number", first).with_precedence(-1),
            RuleDecl::new("( number ) ) 4", first),
            RuleDecl::new("number 7", first),
            RuleDecl::new(["(", "8"], first),
        ];
        let err = RuleTable::new(&symbols(), decls).unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnknownSymbol {
                pattern: "( 8".into(),
                source: UnknownSymbol("8".into())
            }
        );

        let decls: Vec<Decl> = vec![
            RuleDecl::new("( number )", first).with_precedence(3),
            RuleDecl::new("number * number", first).with_precedence(-1),
            RuleDecl::new("( number ) ) 4", first),
            RuleDecl::new("number 7", first),
        ];
        let table = RuleTable::new(&symbols(), decls).unwrap();
        assert_eq!(precedence_of(&table, "( number )"), 3);
        assert_eq!(precedence_of(&table, "number * number"), -1);
        assert_eq!(precedence_of(&table, "( number ) )"), 4);
        // "7" is a symbol, so it stays part of the pattern
        assert_eq!(precedence_of(&table, "number 7"), 0);
        assert_eq!(table.longest_pattern(), 3);
    }

    #[test]
    fn lookup_by_concatenated_key() {
        let table = table(&["number + number", "( number )", "number"]).unwrap();
        let symbols = symbols();
        let key: Vec<u8> = ["(", "number", ")"]
            .iter()
            .flat_map(|n| symbols.by_name(n).unwrap().key().as_bytes().to_vec())
            .collect();

        let rule = table.lookup(&key).unwrap();
        assert_eq!(rule.pattern(), "( number )");
        assert_eq!(rule.len(), 3);
        assert_eq!(rule.key(), &key[..]);
        assert!(table.lookup(&key[..2]).is_none());
        assert_eq!(table.lookup(&key[1..2]).unwrap().pattern(), "number");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(table(&["number", "  "]).unwrap_err(), GrammarError::EmptyPattern);
        assert_eq!(
            table(&["number + number", "number  +   number"]).unwrap_err(),
            GrammarError::DuplicateRule {
                pattern: "number + number".into(),
                existing: "number + number".into()
            }
        );
        assert_eq!(
            table(&["number - number"]).unwrap_err(),
            GrammarError::UnknownSymbol {
                pattern: "number - number".into(),
                source: UnknownSymbol("-".into())
            }
        );
    }

    #[test]
    fn list_patterns_keep_numbers() {
        let decls: Vec<Decl> = vec![RuleDecl::new(vec!["number".into(), "7".into()], first)];
        let table = RuleTable::new(&symbols(), decls).unwrap();
        assert_eq!(table.iter().next().unwrap().pattern(), "number 7");
        assert!(!table.is_empty());
    }
}
