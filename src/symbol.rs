use std::{
    collections::HashMap,
    fmt::{self, Display},
    sync::Arc,
};

use strum::{Display, IntoStaticStr, VariantArray};

use crate::{
    Token,
    error::{GrammarError, UnknownSymbol},
    key::{self, Key},
};

/// What a symbol may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "kebab-case")]
pub enum SymbolRole {
    /// Pushed by the caller.
    Leaf,
    /// Only ever produced by a reduction.
    Branch,
    /// The single accepting symbol.
    Root,
    /// Pushable, and also the accepting symbol.
    InputOutput,
}

impl SymbolRole {
    pub fn is_input(self) -> bool {
        matches!(self, SymbolRole::Leaf | SymbolRole::InputOutput)
    }

    pub fn is_output(self) -> bool {
        matches!(self, SymbolRole::Root | SymbolRole::InputOutput)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolDecl {
    pub name: String,
    pub role: SymbolRole,
    pub precedence: i32,
}

impl SymbolDecl {
    pub fn new(name: impl Into<String>, role: SymbolRole) -> SymbolDecl {
        SymbolDecl {
            name: name.into(),
            role,
            precedence: 0,
        }
    }

    #[must_use]
    pub fn with_precedence(mut self, precedence: i32) -> SymbolDecl {
        self.precedence = precedence;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: usize,
    key: Key,
    name: String,
    role: SymbolRole,
    precedence: i32,
}

impl Symbol {
    /// Position of the symbol in its declaration list.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> SymbolRole {
        self.role
    }

    pub fn precedence(&self) -> i32 {
        self.precedence
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The registry of every symbol a grammar knows about.
///
/// Symbols are immutable once registered and are handed out as `Arc`s, so tokens can
/// refer to their symbol without borrowing the registry.
#[derive(Debug, Clone)]
pub struct Symbols {
    by_id: Vec<Arc<Symbol>>,
    by_name: HashMap<String, usize>,
    root: usize,
}

impl Symbols {
    /// Register `decls`, giving each symbol the key of its position in the list.
    ///
    /// # Errors
    /// If a name is repeated, there is not exactly one output symbol, there are no
    /// input symbols, or there are more symbols than keys.
    pub fn new(decls: impl IntoIterator<Item = SymbolDecl>) -> Result<Symbols, GrammarError> {
        let mut by_id = vec![];
        let mut by_name = HashMap::new();
        let mut roots = vec![];

        for (id, decl) in decls.into_iter().enumerate() {
            let SymbolDecl {
                name,
                role,
                precedence,
            } = decl;
            let key = key::encode(i64::try_from(id).unwrap_or(i64::MAX))?;

            if by_name.insert(name.clone(), id).is_some() {
                return Err(GrammarError::DuplicateSymbol(name));
            }
            if role.is_output() {
                roots.push(id);
            }
            by_id.push(Arc::new(Symbol {
                id,
                key,
                name,
                role,
                precedence,
            }));
        }

        let &[root] = roots.as_slice() else {
            return Err(GrammarError::RootCount(roots.len()));
        };
        if !by_id.iter().any(|s| s.role.is_input()) {
            return Err(GrammarError::NoInput);
        }

        Ok(Symbols {
            by_id,
            by_name,
            root,
        })
    }

    pub fn get(&self, id: usize) -> Option<&Arc<Symbol>> {
        self.by_id.get(id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<Symbol>> {
        self.by_name.get(name).map(|id| &self.by_id[*id])
    }

    pub fn by_key(&self, key: &[u8]) -> Option<&Arc<Symbol>> {
        let id = key::decode(key).ok()?;
        self.by_id.get(usize::try_from(id).ok()?)
    }

    pub fn root(&self) -> &Arc<Symbol> {
        &self.by_id[self.root]
    }

    /// Whether `symbol` is this registry's own instance, rather than an equal-looking
    /// symbol from some other grammar.
    pub fn owns(&self, symbol: &Arc<Symbol>) -> bool {
        self.by_id
            .get(symbol.id)
            .is_some_and(|s| Arc::ptr_eq(s, symbol))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Symbol>> {
        self.by_id.iter()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Create a token of the symbol called `name`.
    ///
    /// # Errors
    /// If there is no such symbol.
    pub fn token<V>(&self, name: &str, value: V) -> Result<Token<V>, UnknownSymbol> {
        let symbol = self
            .by_name(name)
            .ok_or_else(|| UnknownSymbol(name.to_owned()))?;
        Ok(Token::new(Arc::clone(symbol), value))
    }
}
