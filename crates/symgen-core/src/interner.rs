//! Name interning for type graphs.
//!
//! Native type names repeat constantly (every field of type `int`, every
//! namespace prefix). The interner stores each distinct string once and hands
//! out `Symbol` handles that compare and hash as integers.

use std::collections::HashMap;

/// Handle to an interned name.
///
/// Symbols order by first interning, not lexicographically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Deduplicating string store.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    lookup: HashMap<String, Symbol>,
    names: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name, reusing the existing symbol when it was seen before.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(name) {
            return sym;
        }
        self.insert(name.to_owned())
    }

    /// Intern an owned name without cloning it on a hit.
    pub fn intern_owned(&mut self, name: String) -> Symbol {
        if let Some(&sym) = self.lookup.get(&name) {
            return sym;
        }
        self.insert(name)
    }

    fn insert(&mut self, name: String) -> Symbol {
        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.clone());
        self.lookup.insert(name, sym);
        sym
    }

    /// Look up a symbol that is known to be interned.
    ///
    /// # Panics
    /// Panics if the symbol came from a different interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.names[sym.0 as usize]
    }

    #[inline]
    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.names.get(sym.0 as usize).map(String::as_str)
    }

    /// Find the symbol of an already interned name without inserting it.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.lookup.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, s)| (Symbol(i as u32), s.as_str()))
    }
}
