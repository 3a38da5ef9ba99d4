//! Target-language names of type-tree nodes.

use symgen_core::utils::sanitize_identifier;

use super::primitive::rust_scalar;
use super::registry::TypeRegistry;
use super::types::{TypeId, TypeTree, UserType};

impl TypeRegistry {
    /// Name of `id` as the bindings spell it.
    ///
    /// Pure and deterministic. Recursion follows pointee, element, enum
    /// underlying and template argument links only, which the graph builder
    /// guarantees to be acyclic.
    pub fn render_name(&self, id: TypeId, truncate_namespace: bool) -> String {
        let mut out = String::new();
        self.render_into(id, truncate_namespace, &mut out);
        out
    }

    fn render_into(&self, id: TypeId, truncate: bool, out: &mut String) {
        match self.get(id) {
            TypeTree::Primitive(p) => out.push_str(&self.render_primitive(p.name)),
            TypeTree::Pointer { pointee } => {
                out.push_str("Pointer<");
                self.render_into(*pointee, truncate, out);
                out.push('>');
            }
            TypeTree::Array { element } => {
                out.push_str("Array<");
                self.render_into(*element, truncate, out);
                out.push('>');
            }
            TypeTree::Enum(e) => self.render_into(e.underlying, truncate, out),
            TypeTree::User(user) => out.push_str(&self.user_path(user, truncate)),
            TypeTree::Template(inst) => {
                match self.user(inst.template) {
                    Some(layout) => out.push_str(&self.user_path(layout, truncate)),
                    None => self.render_into(inst.template, truncate, out),
                }
                out.push('<');
                for (i, &arg) in inst.arguments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.render_into(arg, truncate, out);
                }
                out.push('>');
            }
            TypeTree::Unresolved { symbol } => {
                out.push_str(&format!("Unresolved<{symbol}>"));
            }
        }
    }

    /// Name of `id` as the native symbols spell it: `int`, `Color`,
    /// `ns::Box<int>`, `char*`, `Point[]`.
    ///
    /// Identity comparisons use this instead of [`Self::render_name`], which
    /// maps distinct native types such as `int` and `long` onto one scalar.
    pub fn native_spelling(&self, id: TypeId) -> String {
        match self.get(id) {
            TypeTree::Primitive(p) => self.name(p.name).to_string(),
            TypeTree::Pointer { pointee } => format!("{}*", self.native_spelling(*pointee)),
            TypeTree::Array { element } => format!("{}[]", self.native_spelling(*element)),
            TypeTree::Enum(e) => self.name(e.native_name).to_string(),
            TypeTree::User(user) => self.name(user.native_name).to_string(),
            TypeTree::Template(inst) => match self.user(inst.template) {
                Some(layout) => self.name(layout.native_name).to_string(),
                None => self.native_spelling(inst.template),
            },
            TypeTree::Unresolved { symbol } => symbol.to_string(),
        }
    }

    fn render_primitive(&self, name: symgen_core::Symbol) -> String {
        let native = self.name(name);
        match rust_scalar(native) {
            Some(scalar) => scalar.to_string(),
            None => sanitize_identifier(native),
        }
    }

    /// `ns::Name`, or `Name` when truncating.
    pub fn user_path(&self, user: &UserType, truncate_namespace: bool) -> String {
        let name = self.name(user.name);
        match user.namespace {
            Some(ns) if !truncate_namespace => format!("{}::{}", self.name(ns), name),
            _ => name.to_string(),
        }
    }
}
