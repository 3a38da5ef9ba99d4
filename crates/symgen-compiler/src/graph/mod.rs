//! Type graph construction.
//!
//! [`GraphBuilder`] turns a symbol record stream into a [`TypeGraph`]:
//! 1. declare: one node per record, user types as stubs
//! 2. populate: bases and fields, linked through the registry
//! 3. dangling references: fail, or degrade to `Variable`
//! 4. deduplicate: collapse records with the same identity
//! 5. validate: bases are aggregates, names render without cycles

mod builder;
mod dedup;


pub use builder::GraphBuilder;
pub use dedup::IdentityKey;

use symgen_core::{Symbol, SymbolId};

use crate::type_tree::{TemplateInstantiation, TypeId, TypeRegistry, TypeTree, UserType};

/// A finished, read-only type graph.
#[derive(Clone, Debug)]
pub struct TypeGraph {
    registry: TypeRegistry,
    /// Live user and template slots, in the order their records appeared.
    aggregates: Vec<TypeId>,
}

impl TypeGraph {
    pub(crate) fn new(registry: TypeRegistry, aggregates: Vec<TypeId>) -> Self {
        Self {
            registry,
            aggregates,
        }
    }

    pub fn get(&self, id: TypeId) -> &TypeTree {
        self.registry.get(id)
    }

    pub fn user(&self, id: TypeId) -> Option<&UserType> {
        self.registry.user(id)
    }

    pub fn layout_of(&self, id: TypeId) -> Option<TypeId> {
        self.registry.layout_of(id)
    }

    /// Node a symbol id ended up as, after deduplication.
    pub fn resolve(&self, symbol: SymbolId) -> Option<TypeId> {
        self.registry.lookup(symbol)
    }

    pub fn render_name(&self, id: TypeId, truncate_namespace: bool) -> String {
        self.registry.render_name(id, truncate_namespace)
    }

    pub fn native_spelling(&self, id: TypeId) -> String {
        self.registry.native_spelling(id)
    }

    pub fn user_path(&self, user: &UserType, truncate_namespace: bool) -> String {
        self.registry.user_path(user, truncate_namespace)
    }

    pub fn name(&self, sym: Symbol) -> &str {
        self.registry.name(sym)
    }

    pub fn aggregates(&self) -> &[TypeId] {
        &self.aggregates
    }

    /// Kept user types that are not template instantiations.
    pub fn user_types(&self) -> impl Iterator<Item = (TypeId, &UserType)> {
        self.aggregates
            .iter()
            .filter_map(|&id| self.registry.user(id).map(|user| (id, user)))
    }

    /// Kept template instantiations.
    pub fn instantiations(&self) -> impl Iterator<Item = (TypeId, &TemplateInstantiation)> {
        self.aggregates
            .iter()
            .filter_map(|&id| self.registry.get(id).as_template().map(|inst| (id, inst)))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (TypeId, &TypeTree)> {
        self.registry.iter()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }
}
