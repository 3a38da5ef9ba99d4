//! Node definitions of the type tree.
//!
//! Nodes never own each other. Every link is a `TypeId` into the registry
//! arena, so self-referencing and mutually referencing types need no special
//! representation.

use symgen_core::{Symbol, SymbolId};

/// Index into the type registry.
///
/// Ids 0 and 1 are reserved for builtins (`Void`, `Variable`); nodes built
/// from records start at index 2.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Placeholder pointee/element for `void` and unknown targets.
    pub const VOID: TypeId = TypeId(0);
    /// Dynamically typed view, stands in for types outside the exported set.
    pub const VARIABLE: TypeId = TypeId(1);

    pub fn is_builtin(self) -> bool {
        self.0 <= Self::VARIABLE.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One native type as seen from the generated bindings.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeTree {
    Primitive(PrimitiveType),
    Pointer { pointee: TypeId },
    Array { element: TypeId },
    Enum(EnumType),
    User(UserType),
    Template(TemplateInstantiation),
    /// Referenced before its record was visited. Rewritten in place once it is.
    Unresolved { symbol: SymbolId },
}

impl TypeTree {
    pub fn as_user(&self) -> Option<&UserType> {
        match self {
            TypeTree::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_template(&self) -> Option<&TemplateInstantiation> {
        match self {
            TypeTree::Template(inst) => Some(inst),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, TypeTree::Unresolved { .. })
    }

    /// Links followed when rendering this node's name.
    ///
    /// Fields and bases are not included: a user type renders by name alone.
    pub fn render_links(&self) -> Vec<TypeId> {
        match self {
            TypeTree::Pointer { pointee } => vec![*pointee],
            TypeTree::Array { element } => vec![*element],
            TypeTree::Enum(e) => vec![e.underlying],
            TypeTree::Template(inst) => inst.arguments.clone(),
            TypeTree::Primitive(_) | TypeTree::User(_) | TypeTree::Unresolved { .. } => {
                Vec::new()
            }
        }
    }

    /// Rewrite every outgoing link through `f`.
    pub(crate) fn remap_links(&mut self, f: impl Fn(TypeId) -> TypeId) {
        match self {
            TypeTree::Pointer { pointee } => *pointee = f(*pointee),
            TypeTree::Array { element } => *element = f(*element),
            TypeTree::Enum(e) => e.underlying = f(e.underlying),
            TypeTree::User(user) => {
                for base in &mut user.bases {
                    *base = f(*base);
                }
                for field in &mut user.fields {
                    field.ty = f(field.ty);
                }
            }
            TypeTree::Template(inst) => {
                inst.template = f(inst.template);
                for arg in &mut inst.arguments {
                    *arg = f(*arg);
                }
            }
            TypeTree::Primitive(_) | TypeTree::Unresolved { .. } => {}
        }
    }
}

/// Built-in scalar, identified by its native spelling (`unsigned int`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PrimitiveType {
    pub name: Symbol,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EnumType {
    pub name: Symbol,
    pub native_name: Symbol,
    pub underlying: TypeId,
    pub members: Vec<EnumMember>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EnumMember {
    pub name: Symbol,
    pub value: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Field {
    pub name: Symbol,
    pub ty: TypeId,
    /// Byte offset as reported by the symbol backend.
    pub offset: u64,
}

/// Aggregate (struct/class/union) or the layout of one template instantiation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UserType {
    /// Identifier-safe last segment (`Point`, or `Stack` for a template).
    pub name: Symbol,
    /// Identifier-safe namespace path (`geo::detail`).
    pub namespace: Option<Symbol>,
    /// Name exactly as the symbol backend reported it.
    pub native_name: Symbol,
    pub size: u64,
    pub bases: Vec<TypeId>,
    pub fields: Vec<Field>,
    pub is_template: bool,
    pub symbol: SymbolId,
    pub state: UserState,
}

/// `template` is the instantiation's own layout, a `UserType` with `is_template` set.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TemplateInstantiation {
    pub template: TypeId,
    pub arguments: Vec<TypeId>,
}

/// Build lifecycle of a user type. Transitions only move forward.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UserState {
    Stub,
    Populated,
    Kept,
    Discarded { into: TypeId },
}

impl UserState {
    fn rank(self) -> u8 {
        match self {
            UserState::Stub => 0,
            UserState::Populated => 1,
            UserState::Kept | UserState::Discarded { .. } => 2,
        }
    }

    /// Move to `next`. Returns `false` and leaves the state untouched if that
    /// would go backward or leave a terminal state.
    pub fn advance(&mut self, next: UserState) -> bool {
        if next.rank() <= self.rank() {
            return false;
        }
        *self = next;
        true
    }

    pub fn is_live(self) -> bool {
        !matches!(self, UserState::Discarded { .. })
    }
}
