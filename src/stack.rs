use std::{
    convert::Infallible,
    fmt::{self, Debug, Display},
    ops::Range,
};

use crate::Token;

/// The engine's working stack of tokens.
///
/// Next to the tokens it keeps the concatenation of their symbol keys, so the rule key
/// for any run of tokens is a slice of that buffer rather than something to rebuild.
#[derive(Clone)]
pub struct TokenStack<V> {
    tokens: Vec<Token<V>>,
    keys: Vec<u8>,
    // Where each token's key begins in `keys`
    starts: Vec<usize>,
}

impl<V> Default for TokenStack<V> {
    fn default() -> Self {
        TokenStack::new()
    }
}

impl<V> TokenStack<V> {
    pub fn new() -> TokenStack<V> {
        TokenStack {
            tokens: Vec::new(),
            keys: Vec::new(),
            starts: Vec::new(),
        }
    }

    pub fn push(&mut self, token: Token<V>) {
        self.starts.push(self.keys.len());
        self.keys.extend_from_slice(token.symbol().key().as_bytes());
        self.tokens.push(token);
    }

    pub fn pop(&mut self) -> Option<Token<V>> {
        let token = self.tokens.pop()?;
        if let Some(start) = self.starts.pop() {
            self.keys.truncate(start);
        }
        Some(token)
    }

    pub fn last(&self) -> Option<&Token<V>> {
        self.tokens.last()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[Token<V>] {
        &self.tokens
    }

    pub fn slice_from(&self, offset: usize) -> &[Token<V>] {
        self.tokens.get(offset..).unwrap_or_default()
    }

    /// The concatenated keys of the tokens in `range`.
    pub fn key(&self, range: Range<usize>) -> &[u8] {
        let start = self.key_start(range.start);
        let end = self.key_start(range.end);
        &self.keys[start..end]
    }

    /// Replace `count` tokens starting at `offset` with `replacement`.
    ///
    /// # Panics
    /// If the range runs past the end of the stack.
    pub fn splice_replace(&mut self, offset: usize, count: usize, replacement: Token<V>) {
        match self.splice_replace_with(offset, count, |_| Ok::<_, Infallible>(replacement)) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Move `count` tokens starting at `offset` into `reduce`, and put the token it
    /// returns in their place.
    ///
    /// If `reduce` fails the removed tokens are gone, but the stack is otherwise
    /// consistent.
    ///
    /// # Errors
    /// Whatever `reduce` returns.
    ///
    /// # Panics
    /// If the range runs past the end of the stack.
    pub fn splice_replace_with<E>(
        &mut self,
        offset: usize,
        count: usize,
        reduce: impl FnOnce(Vec<Token<V>>) -> Result<Token<V>, E>,
    ) -> Result<(), E> {
        let end = offset + count;
        let key_range = self.key_start(offset)..self.key_start(end);
        let removed_len = key_range.len();

        let removed = self.tokens.drain(offset..end).collect();
        self.keys.drain(key_range);
        self.starts.drain(offset..end);
        for start in &mut self.starts[offset..] {
            *start -= removed_len;
        }

        let replacement = reduce(removed)?;
        self.insert(offset, replacement);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.keys.clear();
        self.starts.clear();
    }

    fn insert(&mut self, index: usize, token: Token<V>) {
        let key = token.symbol().key();
        let start = self.key_start(index);

        self.keys.splice(start..start, key.as_bytes().iter().copied());
        for s in &mut self.starts[index..] {
            *s += key.len();
        }
        self.starts.insert(index, start);
        self.tokens.insert(index, token);
    }

    fn key_start(&self, index: usize) -> usize {
        self.starts.get(index).copied().unwrap_or(self.keys.len())
    }
}

impl<V: Debug> Debug for TokenStack<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.tokens).finish()
    }
}

/// The symbol names of the stack, bottom first.
impl<V> Display for TokenStack<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, token) in self.tokens.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token.symbol())?;
        }
        Ok(())
    }
}
