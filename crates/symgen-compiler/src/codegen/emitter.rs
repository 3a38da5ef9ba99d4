//! Core emitter struct and main emit logic.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::Declaration;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::graph::TypeGraph;
use crate::templates::{TemplatePlan, TemplatePolicy};
use crate::type_tree::{TypeId, TypeTree};
use crate::{Error, PassResult};

/// What a single declaration covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Unit {
    User(TypeId),
    /// Template group emitted as one generic declaration.
    Generic(usize),
    /// One instantiation of a template emitted on its own.
    Specialized(TypeId),
}

#[derive(Clone, Debug, Default)]
pub(super) struct UnitName {
    /// Struct identifier.
    pub ident: String,
    /// How references spell it (namespace-qualified unless truncating).
    pub path: String,
    pub namespace: Option<String>,
}

/// Renders declarations for a finished graph and its template plan.
pub struct Emitter<'a> {
    pub(super) graph: &'a TypeGraph,
    pub(super) plan: &'a TemplatePlan,
    pub(super) config: &'a Config,
    pub(super) diagnostics: Diagnostics,

    pub(super) units: Vec<Unit>,
    /// Unit index -> assigned name
    pub(super) unit_names: Vec<UnitName>,
    /// User or template slot -> unit declaring it
    pub(super) unit_of: HashMap<TypeId, usize>,
    /// Generic template group -> its unit
    pub(super) generic_unit: HashMap<usize, usize>,
    /// Names already declared (for collision avoidance)
    pub(super) used_names: BTreeSet<String>,
    /// Units already emitted
    pub(super) emitted: HashSet<usize>,
}

impl<'a> Emitter<'a> {
    pub fn new(graph: &'a TypeGraph, plan: &'a TemplatePlan, config: &'a Config) -> Self {
        Self {
            graph,
            plan,
            config,
            diagnostics: Diagnostics::new(),
            units: Vec::new(),
            unit_names: Vec::new(),
            unit_of: HashMap::new(),
            generic_unit: HashMap::new(),
            used_names: BTreeSet::new(),
            emitted: HashSet::new(),
        }
    }

    /// Emit every declaration, bases first.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn emit(mut self) -> PassResult<Vec<Declaration>> {
        self.check_resolved()?;
        self.collect_units();
        self.assign_names();

        let order = self.sort_topologically()?;
        let mut declarations = Vec::with_capacity(order.len());
        for unit in order {
            if !self.emitted.insert(unit) {
                continue;
            }
            declarations.push(self.render_unit(unit));
        }

        tracing::debug!(declarations = declarations.len(), "declarations emitted");
        Ok((declarations, self.diagnostics))
    }

    fn check_resolved(&self) -> Result<(), Error> {
        for (_, node) in self.graph.nodes() {
            if let TypeTree::Unresolved { symbol } = node {
                return Err(Error::UnresolvedAtEmission { id: *symbol });
            }
        }
        Ok(())
    }

    /// One unit per user type, generic group or specialized instantiation, in record order.
    fn collect_units(&mut self) {
        for &id in self.graph.aggregates() {
            let unit = match self.graph.get(id) {
                TypeTree::User(_) => Unit::User(id),
                TypeTree::Template(_) => match self.plan.group_index(id) {
                    Some(group)
                        if matches!(
                            self.plan.group(group).policy,
                            TemplatePolicy::Generic(_)
                        ) =>
                    {
                        if let Some(&existing) = self.generic_unit.get(&group) {
                            self.unit_of.insert(id, existing);
                            continue;
                        }
                        self.generic_unit.insert(group, self.units.len());
                        Unit::Generic(group)
                    }
                    _ => Unit::Specialized(id),
                },
                _ => continue,
            };
            self.unit_of.insert(id, self.units.len());
            self.units.push(unit);
        }
    }

    /// Base-class links of a unit, as slot ids.
    pub(super) fn unit_bases(&self, unit: Unit) -> Vec<TypeId> {
        let layouts: Vec<TypeId> = match unit {
            Unit::User(id) => vec![id],
            Unit::Specialized(id) => self.graph.layout_of(id).into_iter().collect(),
            Unit::Generic(group) => self
                .plan
                .group(group)
                .instantiations
                .iter()
                .filter_map(|&id| self.graph.layout_of(id))
                .collect(),
        };

        let mut bases = Vec::new();
        for layout in layouts {
            if let Some(user) = self.graph.user(layout) {
                for &base in &user.bases {
                    if !bases.contains(&base) {
                        bases.push(base);
                    }
                }
            }
        }
        bases
    }
}
