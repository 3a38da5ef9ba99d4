//! Declaration names.

use symgen_core::utils::sanitize_identifier;

use super::Emitter;
use super::emitter::{Unit, UnitName};
use crate::diagnostics::DiagnosticKind;

impl Emitter<'_> {
    pub(super) fn assign_names(&mut self) {
        self.unit_names = Vec::with_capacity(self.units.len());
        for i in 0..self.units.len() {
            let (namespace, base) = self.base_name(self.units[i]);
            let name = self.unique_name(namespace, &base);
            self.unit_names.push(name);
        }
    }

    /// Namespace and preferred identifier of a unit.
    fn base_name(&self, unit: Unit) -> (Option<String>, String) {
        let graph = self.graph;
        match unit {
            Unit::User(id) => match graph.user(id) {
                Some(user) => (
                    user.namespace.map(|ns| graph.name(ns).to_string()),
                    graph.name(user.name).to_string(),
                ),
                None => (None, "Anonymous".to_string()),
            },
            Unit::Generic(group) => {
                let key = self.plan.group(group).key;
                (
                    key.namespace.map(|ns| graph.name(ns).to_string()),
                    graph.name(key.name).to_string(),
                )
            }
            Unit::Specialized(id) => {
                let Some(inst) = graph.get(id).as_template() else {
                    return (None, "Anonymous".to_string());
                };
                let Some(layout) = graph.user(inst.template) else {
                    return (None, "Anonymous".to_string());
                };
                let mut ident = graph.name(layout.name).to_string();
                for &arg in &inst.arguments {
                    ident.push('_');
                    ident.push_str(&sanitize_identifier(&graph.render_name(arg, true)));
                }
                (layout.namespace.map(|ns| graph.name(ns).to_string()), ident)
            }
        }
    }

    /// Claim `base` in its scope, or the first free numbered variant.
    pub(super) fn unique_name(&mut self, namespace: Option<String>, base: &str) -> UnitName {
        let truncate = self.config.truncate_namespaces;
        let path_of = |ident: &str| match &namespace {
            Some(ns) if !truncate => format!("{ns}::{ident}"),
            _ => ident.to_string(),
        };

        // `Vec3` becomes `Vec3_2`, not `Vec32`.
        let separator = if base.ends_with(|c: char| c.is_ascii_digit()) {
            "_"
        } else {
            ""
        };
        let mut ident = base.to_string();
        let mut counter = 2;
        while !self.used_names.insert(path_of(&ident)) {
            ident = format!("{base}{separator}{counter}");
            counter += 1;
        }

        let path = path_of(&ident);
        if ident != base {
            self.diagnostics.report(
                DiagnosticKind::DeclarationRenamed,
                None,
                format!("`{}` is already declared; using `{path}`", path_of(base)),
            );
        }
        UnitName {
            ident,
            path,
            namespace,
        }
    }
}
