//! Arena of type-tree nodes for one build.
//!
//! Nodes are addressed by `TypeId`. Symbol ids bind to slots on first sight:
//! a reference to an id that has no record yet gets an `Unresolved` slot, and
//! visiting the record later overwrites that same slot, so every earlier
//! holder of the id sees the real node.

use std::collections::HashMap;

use symgen_core::{Interner, Symbol, SymbolId};

use super::types::{PrimitiveType, TypeId, TypeTree, UserType};

/// Owns the nodes, the symbol bindings and the name interner of one build.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    nodes: Vec<TypeTree>,
    by_symbol: HashMap<SymbolId, TypeId>,
    /// Unbound primitives by native name (enum underlying types, degraded references).
    primitives: HashMap<Symbol, TypeId>,
    interner: Interner,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            nodes: Vec::new(),
            by_symbol: HashMap::new(),
            primitives: HashMap::new(),
            interner: Interner::new(),
        };

        let void_id = registry.primitive("void");
        debug_assert_eq!(void_id, TypeId::VOID);

        let variable_id = registry.primitive("Variable");
        debug_assert_eq!(variable_id, TypeId::VARIABLE);

        registry
    }

    /// Slot bound to `symbol`, allocating an `Unresolved` placeholder on first sight.
    ///
    /// The flag is `true` when the slot was created by this call.
    pub fn slot_for(&mut self, symbol: SymbolId) -> (TypeId, bool) {
        if let Some(&id) = self.by_symbol.get(&symbol) {
            return (id, false);
        }
        let id = self.alloc(TypeTree::Unresolved { symbol });
        self.by_symbol.insert(symbol, id);
        (id, true)
    }

    pub fn lookup(&self, symbol: SymbolId) -> Option<TypeId> {
        self.by_symbol.get(&symbol).copied()
    }

    /// Add a node that no symbol id is bound to.
    pub fn alloc(&mut self, tree: TypeTree) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(tree);
        id
    }

    /// Shared primitive node for a native spelling.
    pub fn primitive(&mut self, native: &str) -> TypeId {
        let name = self.interner.intern(native);
        if let Some(&id) = self.primitives.get(&name) {
            return id;
        }
        let id = self.alloc(TypeTree::Primitive(PrimitiveType { name }));
        self.primitives.insert(name, id);
        id
    }

    /// Overwrite a slot in place.
    pub fn replace(&mut self, id: TypeId, tree: TypeTree) {
        self.nodes[id.index()] = tree;
    }

    pub fn get(&self, id: TypeId) -> &TypeTree {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeTree {
        &mut self.nodes[id.index()]
    }

    pub fn user(&self, id: TypeId) -> Option<&UserType> {
        self.get(id).as_user()
    }

    pub fn user_mut(&mut self, id: TypeId) -> Option<&mut UserType> {
        match self.get_mut(id) {
            TypeTree::User(user) => Some(user),
            _ => None,
        }
    }

    /// The user node describing the layout of `id`: the node itself, or the
    /// template layout of an instantiation.
    pub fn layout_of(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeTree::User(_) => Some(id),
            TypeTree::Template(inst) => Some(inst.template),
            _ => None,
        }
    }

    /// Point every link and symbol binding in `forward` at its target.
    pub fn redirect(&mut self, forward: &HashMap<TypeId, TypeId>) {
        if forward.is_empty() {
            return;
        }
        let follow = |id: TypeId| forward.get(&id).copied().unwrap_or(id);
        for node in &mut self.nodes {
            node.remap_links(follow);
        }
        for id in self.by_symbol.values_mut() {
            *id = follow(*id);
        }
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    pub fn intern_owned(&mut self, name: String) -> Symbol {
        self.interner.intern_owned(name)
    }

    pub fn name(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeTree)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (TypeId(i as u32), node))
    }

    /// Symbol bindings, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, TypeId)> + '_ {
        self.by_symbol.iter().map(|(&symbol, &id)| (symbol, id))
    }
}
