//! Type-tree model.
//!
//! A closed set of node variants describing native types as the generated
//! bindings see them, stored in a per-build arena (`TypeRegistry`) and linked
//! by `TypeId`. Every node renders to a target-language type name.

mod primitive;
mod registry;
mod render;
mod types;

#[cfg(test)]
mod registry_tests;
#[cfg(test)]
mod render_tests;

pub use primitive::{integer_of_size, rust_scalar};
pub use registry::TypeRegistry;
pub use types::{
    EnumMember, EnumType, Field, PrimitiveType, TemplateInstantiation, TypeId, TypeTree,
    UserState, UserType,
};
