//! Argument-abstracted type shapes.
//!
//! A shape describes a field type of one instantiation with every sub-tree
//! that equals a template argument marked as a candidate parameter. Equality
//! is decided on native spelling, so a `long` field of `Box<int>` is not `T`.
//! Unifying the shapes of all instantiations tells whether one generic
//! declaration can spell the field for all of them.

use std::collections::{BTreeSet, HashMap};

use crate::graph::TypeGraph;
use crate::type_tree::{TypeId, TypeTree};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    /// Parameter positions this sub-tree equals in every instantiation.
    pub params: BTreeSet<usize>,
    /// Node all instantiations agree on, with its native spelling.
    pub concrete: Option<(TypeId, String)>,
    /// Common structure, if any.
    pub kind: Option<ShapeKind>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Leaf,
    Pointer(Box<Shape>),
    Array(Box<Shape>),
    /// Instantiation of the template group at this index.
    Template { group: usize, args: Vec<Shape> },
}

/// How a unified shape is written in a generic declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spelling<'a> {
    Param(usize),
    Concrete(TypeId),
    Pointer(&'a Shape),
    Array(&'a Shape),
    Template { group: usize, args: &'a [Shape] },
}

impl Shape {
    pub(crate) fn of(
        graph: &TypeGraph,
        group_of: &HashMap<TypeId, usize>,
        id: TypeId,
        arguments: &[String],
    ) -> Shape {
        let native = graph.native_spelling(id);
        let params = arguments
            .iter()
            .enumerate()
            .filter(|(_, arg)| **arg == native)
            .map(|(i, _)| i)
            .collect();
        let nested = |inner: TypeId| Box::new(Shape::of(graph, group_of, inner, arguments));
        let kind = match graph.get(id) {
            TypeTree::Pointer { pointee } => ShapeKind::Pointer(nested(*pointee)),
            TypeTree::Array { element } => ShapeKind::Array(nested(*element)),
            TypeTree::Template(inst) => match group_of.get(&id) {
                Some(&group) => ShapeKind::Template {
                    group,
                    args: inst
                        .arguments
                        .iter()
                        .map(|&arg| Shape::of(graph, group_of, arg, arguments))
                        .collect(),
                },
                None => ShapeKind::Leaf,
            },
            _ => ShapeKind::Leaf,
        };
        Shape {
            params,
            concrete: Some((id, native)),
            kind: Some(kind),
        }
    }

    /// Common shape of `self` and `other`, or `None` if no spelling fits both.
    pub fn unify(&self, other: &Shape) -> Option<Shape> {
        let params: BTreeSet<usize> = self.params.intersection(&other.params).copied().collect();
        let concrete = match (&self.concrete, &other.concrete) {
            (Some(a), Some(b)) if a.1 == b.1 => Some(a.clone()),
            _ => None,
        };
        let kind = match (&self.kind, &other.kind) {
            (Some(ShapeKind::Leaf), Some(ShapeKind::Leaf)) if concrete.is_some() => {
                Some(ShapeKind::Leaf)
            }
            (Some(ShapeKind::Pointer(a)), Some(ShapeKind::Pointer(b))) => {
                a.unify(b).map(|s| ShapeKind::Pointer(Box::new(s)))
            }
            (Some(ShapeKind::Array(a)), Some(ShapeKind::Array(b))) => {
                a.unify(b).map(|s| ShapeKind::Array(Box::new(s)))
            }
            (
                Some(ShapeKind::Template { group: g1, args: a1 }),
                Some(ShapeKind::Template { group: g2, args: a2 }),
            ) if g1 == g2 && a1.len() == a2.len() => a1
                .iter()
                .zip(a2)
                .map(|(x, y)| x.unify(y))
                .collect::<Option<Vec<_>>>()
                .map(|args| ShapeKind::Template { group: *g1, args }),
            _ => None,
        };

        if params.is_empty() && concrete.is_none() && kind.is_none() {
            return None;
        }
        Some(Shape {
            params,
            concrete,
            kind,
        })
    }

    pub fn mentions_params(&self) -> bool {
        !self.params.is_empty() || self.kind.as_ref().is_some_and(ShapeKind::mentions_params)
    }

    /// Parameters win; structure wins over a concrete node when it carries
    /// parameters deeper down.
    pub fn spelling(&self) -> Option<Spelling<'_>> {
        if let Some(&param) = self.params.first() {
            return Some(Spelling::Param(param));
        }
        let structural = self.kind.as_ref().is_some_and(ShapeKind::mentions_params);
        if let (Some((id, _)), false) = (&self.concrete, structural) {
            return Some(Spelling::Concrete(*id));
        }
        match &self.kind {
            Some(ShapeKind::Pointer(inner)) => Some(Spelling::Pointer(inner)),
            Some(ShapeKind::Array(inner)) => Some(Spelling::Array(inner)),
            Some(ShapeKind::Template { group, args }) => Some(Spelling::Template {
                group: *group,
                args,
            }),
            Some(ShapeKind::Leaf) | None => self.concrete.as_ref().map(|(id, _)| Spelling::Concrete(*id)),
        }
    }

    /// Template groups this shape spells generically.
    pub fn generic_dependencies(&self, out: &mut Vec<usize>) {
        match self.spelling() {
            Some(Spelling::Pointer(inner) | Spelling::Array(inner)) => {
                inner.generic_dependencies(out)
            }
            Some(Spelling::Template { group, args }) => {
                out.push(group);
                for arg in args {
                    arg.generic_dependencies(out);
                }
            }
            Some(Spelling::Param(_) | Spelling::Concrete(_)) | None => {}
        }
    }

    /// Parameters that appear in the spelling.
    pub fn used_params(&self, out: &mut BTreeSet<usize>) {
        match self.spelling() {
            Some(Spelling::Param(param)) => {
                out.insert(param);
            }
            Some(Spelling::Pointer(inner) | Spelling::Array(inner)) => inner.used_params(out),
            Some(Spelling::Template { args, .. }) => {
                for arg in args {
                    arg.used_params(out);
                }
            }
            Some(Spelling::Concrete(_)) | None => {}
        }
    }
}

impl ShapeKind {
    fn mentions_params(&self) -> bool {
        match self {
            ShapeKind::Leaf => false,
            ShapeKind::Pointer(inner) | ShapeKind::Array(inner) => inner.mentions_params(),
            ShapeKind::Template { args, .. } => args.iter().any(Shape::mentions_params),
        }
    }
}
