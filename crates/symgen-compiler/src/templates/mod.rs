//! Template resolution: one generic declaration per template, or one
//! specialized declaration per instantiation.
//!
//! Instantiations are grouped by template (namespace and name). A group is
//! emitted generically when the field layouts of all its instantiations unify
//! modulo their arguments: same field names in the same order, and field
//! types that either agree or stand for the same parameter everywhere.
//! Offsets and sizes need not agree; a generic field only carries an offset
//! when it is the same in every instantiation.

mod shape;


pub use shape::{Shape, ShapeKind, Spelling};

use std::collections::HashMap;

use indexmap::IndexMap;
use symgen_core::Symbol;

use crate::config::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::graph::TypeGraph;
use crate::type_tree::TypeId;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GroupKey {
    pub namespace: Option<Symbol>,
    pub name: Symbol,
}

#[derive(Clone, Debug)]
pub struct TemplateGroup {
    pub key: GroupKey,
    /// Template nodes, in record order.
    pub instantiations: Vec<TypeId>,
    pub policy: TemplatePolicy,
}

#[derive(Clone, Debug)]
pub enum TemplatePolicy {
    Generic(GenericLayout),
    Specialized,
}

#[derive(Clone, Debug)]
pub struct GenericLayout {
    pub arity: usize,
    pub fields: Vec<GenericField>,
    pub bases: Vec<Shape>,
    /// Total size, when all instantiations agree.
    pub size: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct GenericField {
    pub name: Symbol,
    pub offset: Option<u64>,
    pub shape: Shape,
}

/// `T` for single-parameter templates, `T1..Tn` otherwise.
pub fn parameter_name(index: usize, arity: usize) -> String {
    if arity == 1 {
        "T".to_string()
    } else {
        format!("T{}", index + 1)
    }
}

/// Emission policy of every template group in a graph.
#[derive(Clone, Debug, Default)]
pub struct TemplatePlan {
    groups: Vec<TemplateGroup>,
    group_of: HashMap<TypeId, usize>,
}

impl TemplatePlan {
    pub fn groups(&self) -> &[TemplateGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> &TemplateGroup {
        &self.groups[index]
    }

    /// Group index of a template node.
    pub fn group_index(&self, instantiation: TypeId) -> Option<usize> {
        self.group_of.get(&instantiation).copied()
    }

    pub fn is_generic(&self, instantiation: TypeId) -> bool {
        self.group_index(instantiation)
            .is_some_and(|g| matches!(self.groups[g].policy, TemplatePolicy::Generic(_)))
    }
}

/// Decide generic or specialized emission for each template in `graph`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve_templates(
    graph: &TypeGraph,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> TemplatePlan {
    let mut grouped: IndexMap<GroupKey, Vec<TypeId>> = IndexMap::new();
    for (id, inst) in graph.instantiations() {
        let Some(layout) = graph.user(inst.template) else {
            continue;
        };
        let key = GroupKey {
            namespace: layout.namespace,
            name: layout.name,
        };
        grouped.entry(key).or_default().push(id);
    }

    let group_of: HashMap<TypeId, usize> = grouped
        .values()
        .enumerate()
        .flat_map(|(g, ids)| ids.iter().map(move |&id| (id, g)))
        .collect();

    let mut groups: Vec<TemplateGroup> = grouped
        .into_iter()
        .map(|(key, instantiations)| {
            let policy = if !config.template_grouping {
                TemplatePolicy::Specialized
            } else {
                match unify_group(graph, &group_of, &instantiations) {
                    Ok(layout) => TemplatePolicy::Generic(layout),
                    Err(reason) => {
                        diagnostics.report(
                            DiagnosticKind::AmbiguousTemplateGrouping,
                            first_symbol(graph, &instantiations),
                            format!(
                                "instantiations of `{}` cannot share a generic declaration: {reason}; emitting one declaration per instantiation",
                                display_name(graph, key)
                            ),
                        );
                        TemplatePolicy::Specialized
                    }
                }
            };
            TemplateGroup {
                key,
                instantiations,
                policy,
            }
        })
        .collect();

    demote_blocked(graph, &mut groups, diagnostics);

    let generic = groups
        .iter()
        .filter(|g| matches!(g.policy, TemplatePolicy::Generic(_)))
        .count();
    tracing::debug!(
        groups = groups.len(),
        generic,
        specialized = groups.len() - generic,
        "templates resolved"
    );
    TemplatePlan { groups, group_of }
}

struct InstanceShape {
    arity: usize,
    size: u64,
    fields: Vec<GenericField>,
    bases: Vec<Shape>,
}

fn instance_shape(
    graph: &TypeGraph,
    group_of: &HashMap<TypeId, usize>,
    id: TypeId,
) -> Option<InstanceShape> {
    let inst = graph.get(id).as_template()?;
    let layout = graph.user(inst.template)?;
    let arguments: Vec<String> = inst
        .arguments
        .iter()
        .map(|&arg| graph.native_spelling(arg))
        .collect();

    let fields = layout
        .fields
        .iter()
        .map(|field| GenericField {
            name: field.name,
            offset: Some(field.offset),
            shape: Shape::of(graph, group_of, field.ty, &arguments),
        })
        .collect();
    let bases = layout
        .bases
        .iter()
        .map(|&base| Shape::of(graph, group_of, base, &arguments))
        .collect();

    Some(InstanceShape {
        arity: arguments.len(),
        size: layout.size,
        fields,
        bases,
    })
}

/// Fold all instantiation layouts into one generic layout.
fn unify_group(
    graph: &TypeGraph,
    group_of: &HashMap<TypeId, usize>,
    instantiations: &[TypeId],
) -> Result<GenericLayout, String> {
    let mut shapes = instantiations
        .iter()
        .filter_map(|&id| instance_shape(graph, group_of, id));
    let Some(first) = shapes.next() else {
        return Err("no instantiation has a layout".to_string());
    };

    let mut layout = GenericLayout {
        arity: first.arity,
        fields: first.fields,
        bases: first.bases,
        size: Some(first.size),
    };

    for next in shapes {
        if next.arity != layout.arity {
            return Err(format!(
                "argument counts differ ({} and {})",
                layout.arity, next.arity
            ));
        }
        if next.fields.len() != layout.fields.len() {
            return Err(format!(
                "field counts differ ({} and {})",
                layout.fields.len(),
                next.fields.len()
            ));
        }
        for (field, other) in layout.fields.iter_mut().zip(&next.fields) {
            if field.name != other.name {
                return Err(format!(
                    "field `{}` faces field `{}`",
                    graph.name(field.name),
                    graph.name(other.name)
                ));
            }
            field.shape = field.shape.unify(&other.shape).ok_or_else(|| {
                format!("field `{}` has incompatible types", graph.name(field.name))
            })?;
            if field.offset != other.offset {
                field.offset = None;
            }
        }
        if next.bases.len() != layout.bases.len() {
            return Err("base classes differ".to_string());
        }
        for (base, other) in layout.bases.iter_mut().zip(&next.bases) {
            *base = base
                .unify(other)
                .ok_or_else(|| "base classes differ".to_string())?;
        }
        if layout.size != Some(next.size) {
            layout.size = None;
        }
    }

    Ok(layout)
}

/// A generic declaration can only spell another template generically if that
/// template is emitted generically too. Demote until stable.
fn demote_blocked(graph: &TypeGraph, groups: &mut [TemplateGroup], diagnostics: &mut Diagnostics) {
    loop {
        let mut changed = false;
        for i in 0..groups.len() {
            let TemplatePolicy::Generic(layout) = &groups[i].policy else {
                continue;
            };
            let mut deps = Vec::new();
            for field in &layout.fields {
                field.shape.generic_dependencies(&mut deps);
            }
            for base in &layout.bases {
                base.generic_dependencies(&mut deps);
            }
            let Some(blocked) = deps
                .into_iter()
                .find(|&g| !matches!(groups[g].policy, TemplatePolicy::Generic(_)))
            else {
                continue;
            };

            diagnostics.report(
                DiagnosticKind::TemplateDemoted,
                first_symbol(graph, &groups[i].instantiations),
                format!(
                    "`{}` refers to `{}`, which has no generic declaration; emitting one declaration per instantiation",
                    display_name(graph, groups[i].key),
                    display_name(graph, groups[blocked].key)
                ),
            );
            groups[i].policy = TemplatePolicy::Specialized;
            changed = true;
        }
        if !changed {
            break;
        }
    }
}

fn display_name(graph: &TypeGraph, key: GroupKey) -> String {
    match key.namespace {
        Some(ns) => format!("{}::{}", graph.name(ns), graph.name(key.name)),
        None => graph.name(key.name).to_string(),
    }
}

fn first_symbol(graph: &TypeGraph, instantiations: &[TypeId]) -> Option<symgen_core::SymbolId> {
    instantiations
        .first()
        .and_then(|&id| graph.layout_of(id))
        .and_then(|layout| graph.user(layout))
        .map(|user| user.symbol)
}
