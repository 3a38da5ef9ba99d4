//! Two-pass graph construction from symbol records.

use std::collections::{HashMap, HashSet};

use symgen_core::utils::{
    qualified_segments, sanitize_identifier, split_qualified, strip_template_arguments,
};
use symgen_core::{Symbol, SymbolId, SymbolKind, SymbolRecord};

use super::TypeGraph;
use super::dedup::deduplicate;
use crate::config::Config;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::type_tree::{
    EnumMember, EnumType, Field, PrimitiveType, TemplateInstantiation, TypeId, TypeRegistry,
    TypeTree, UserState, UserType, integer_of_size,
};
use crate::{Error, PassResult};

/// Record that first mentioned a symbol id before the id had a record.
#[derive(Clone, Debug, Default)]
struct Referrer {
    name: String,
    field: Option<String>,
}

/// Builds one [`TypeGraph`]. Owns the registry for the duration of the build.
pub struct GraphBuilder<'a> {
    config: &'a Config,
    registry: TypeRegistry,
    diagnostics: Diagnostics,
    /// User and template slots, in record order.
    aggregates: Vec<TypeId>,
    referrers: HashMap<SymbolId, Referrer>,
    /// Dangling slots rewritten to `Variable`.
    degraded: HashSet<TypeId>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
            diagnostics: Diagnostics::new(),
            aggregates: Vec::new(),
            referrers: HashMap::new(),
            degraded: HashSet::new(),
        }
    }

    /// Build the graph. Either every reference resolves or nothing is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(mut self, records: &[SymbolRecord]) -> PassResult<TypeGraph> {
        for record in records {
            self.declare(record)?;
        }
        for record in records.iter().filter(|r| r.kind.is_aggregate()) {
            self.populate(record);
        }
        self.resolve_dangling()?;
        self.validate_render_links()?;
        deduplicate(
            &mut self.registry,
            &mut self.aggregates,
            &mut self.diagnostics,
        );
        self.validate_bases()?;

        tracing::debug!(
            nodes = self.registry.len(),
            aggregates = self.aggregates.len(),
            "type graph built"
        );
        Ok((
            TypeGraph::new(self.registry, self.aggregates),
            self.diagnostics,
        ))
    }

    /// Pass 1: write the node for a record into its slot.
    fn declare(&mut self, record: &SymbolRecord) -> Result<(), Error> {
        let (id, created) = self.registry.slot_for(record.id);
        if !created && !self.registry.get(id).is_unresolved() {
            return Err(Error::DuplicateSymbol {
                id: record.id,
                name: record.name.clone(),
            });
        }

        let tree = match record.kind {
            SymbolKind::Primitive => {
                let native = record.name.trim();
                if native.is_empty() {
                    return Err(malformed(record, "primitive type without a name"));
                }
                TypeTree::Primitive(PrimitiveType {
                    name: self.registry.intern(native),
                })
            }
            SymbolKind::Pointer => TypeTree::Pointer {
                pointee: self.target(record),
            },
            SymbolKind::Array => TypeTree::Array {
                element: self.target(record),
            },
            SymbolKind::Enum => TypeTree::Enum(self.enumeration(record)),
            SymbolKind::UserType => {
                self.aggregates.push(id);
                TypeTree::User(self.stub(record, false))
            }
            SymbolKind::TemplateInstantiation if record.template_arguments.is_empty() => {
                tracing::trace!(symbol = %record.id, name = %record.name, "template without arguments, declared as plain type");
                self.aggregates.push(id);
                TypeTree::User(self.stub(record, false))
            }
            SymbolKind::TemplateInstantiation => {
                self.aggregates.push(id);
                let layout = self.stub(record, true);
                let template = self.registry.alloc(TypeTree::User(layout));
                let arguments = record
                    .template_arguments
                    .iter()
                    .map(|&arg| self.reference(arg, record, None))
                    .collect();
                TypeTree::Template(TemplateInstantiation {
                    template,
                    arguments,
                })
            }
        };

        self.registry.replace(id, tree);
        Ok(())
    }

    /// Pass 2: fill bases and fields of a stub.
    fn populate(&mut self, record: &SymbolRecord) {
        let Some(layout) = self
            .registry
            .lookup(record.id)
            .and_then(|id| self.registry.layout_of(id))
        else {
            return;
        };

        let bases: Vec<TypeId> = record
            .bases
            .iter()
            .map(|&base| self.reference(base, record, None))
            .collect();
        let fields: Vec<Field> = record
            .fields
            .iter()
            .map(|field| Field {
                name: self.registry.intern(&field.name),
                ty: self.reference(field.type_id, record, Some(&field.name)),
                offset: field.offset,
            })
            .collect();

        if let Some(user) = self.registry.user_mut(layout) {
            user.bases = bases;
            user.fields = fields;
            user.state.advance(UserState::Populated);
        }
    }

    /// Slots still unresolved after pass 2 have no record at all.
    fn resolve_dangling(&mut self) -> Result<(), Error> {
        let dangling: Vec<(TypeId, SymbolId)> = self
            .registry
            .iter()
            .filter_map(|(id, node)| match node {
                TypeTree::Unresolved { symbol } => Some((id, *symbol)),
                _ => None,
            })
            .collect();

        for (id, symbol) in dangling {
            let referrer = self.referrers.get(&symbol).cloned().unwrap_or_default();
            if !self.config.allow_partial_graph {
                return Err(Error::SymbolResolution {
                    id: symbol,
                    referrer: referrer.name,
                    field: referrer.field,
                });
            }

            let name = self.registry.intern("Variable");
            self.registry
                .replace(id, TypeTree::Primitive(PrimitiveType { name }));
            self.degraded.insert(id);

            let location = match &referrer.field {
                Some(field) => format!("`{}::{}`", referrer.name, field),
                None => format!("`{}`", referrer.name),
            };
            self.diagnostics.report(
                DiagnosticKind::UnresolvedReference,
                Some(symbol),
                format!("type {symbol} used by {location} has no record; using `Variable`"),
            );
        }
        Ok(())
    }

    /// Bases must be aggregates. Degraded bases are dropped.
    fn validate_bases(&mut self) -> Result<(), Error> {
        for i in 0..self.aggregates.len() {
            let Some(layout) = self.registry.layout_of(self.aggregates[i]) else {
                continue;
            };
            let Some(user) = self.registry.user(layout) else {
                continue;
            };

            let mut bases = Vec::with_capacity(user.bases.len());
            for &base in &user.bases {
                match self.registry.get(base) {
                    TypeTree::User(_) | TypeTree::Template(_) => bases.push(base),
                    _ if self.degraded.contains(&base) => {}
                    _ => {
                        return Err(Error::MalformedRecord {
                            id: user.symbol,
                            name: self.registry.name(user.native_name).to_string(),
                            reason: format!(
                                "base `{}` is not a class or struct",
                                self.registry.render_name(base, false)
                            ),
                        });
                    }
                }
            }

            if let Some(user) = self.registry.user_mut(layout) {
                user.bases = bases;
            }
        }
        Ok(())
    }

    /// Rendering follows pointee, element, underlying and argument links;
    /// those must not loop back.
    fn validate_render_links(&self) -> Result<(), Error> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit(
            registry: &TypeRegistry,
            id: TypeId,
            marks: &mut HashMap<TypeId, Mark>,
        ) -> Option<TypeId> {
            match marks.get(&id) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => return Some(id),
                None => {}
            }
            marks.insert(id, Mark::Visiting);
            for next in registry.get(id).render_links() {
                if let Some(looped) = visit(registry, next, marks) {
                    return Some(looped);
                }
            }
            marks.insert(id, Mark::Done);
            None
        }

        let mut marks = HashMap::new();
        for (id, _) in self.registry.iter() {
            let Some(looped) = visit(&self.registry, id, &mut marks) else {
                continue;
            };
            let symbol = self
                .registry
                .symbols()
                .filter(|&(_, bound)| bound == looped)
                .map(|(symbol, _)| symbol)
                .min()
                .unwrap_or(SymbolId(u64::from(looped.0)));
            let name = match self.registry.get(looped) {
                TypeTree::Pointer { .. } => "pointer".to_string(),
                TypeTree::Array { .. } => "array".to_string(),
                TypeTree::Enum(e) => self.registry.name(e.native_name).to_string(),
                TypeTree::Template(inst) => self
                    .registry
                    .user(inst.template)
                    .map(|u| self.registry.name(u.native_name).to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            };
            return Err(Error::MalformedRecord {
                id: symbol,
                name,
                reason: "type refers to itself through pointer, array or template arguments"
                    .to_string(),
            });
        }
        Ok(())
    }

    fn target(&mut self, record: &SymbolRecord) -> TypeId {
        match record.element {
            Some(element) => self.reference(element, record, None),
            None => TypeId::VOID,
        }
    }

    fn reference(&mut self, symbol: SymbolId, from: &SymbolRecord, field: Option<&str>) -> TypeId {
        let (id, created) = self.registry.slot_for(symbol);
        if created {
            self.referrers.insert(
                symbol,
                Referrer {
                    name: from.name.clone(),
                    field: field.map(str::to_owned),
                },
            );
        }
        id
    }

    fn enumeration(&mut self, record: &SymbolRecord) -> EnumType {
        let underlying = match record.element {
            Some(element) => self.reference(element, record, None),
            None => self.registry.primitive(integer_of_size(record.size)),
        };
        let (_, last) = split_qualified(&record.name);
        let name = self.registry.intern_owned(sanitize_identifier(last));
        let native_name = self.registry.intern(&record.name);
        let members = record
            .enumerators
            .iter()
            .map(|e| EnumMember {
                name: self.registry.intern(&e.name),
                value: e.value,
            })
            .collect();
        EnumType {
            name,
            native_name,
            underlying,
            members,
        }
    }

    fn stub(&mut self, record: &SymbolRecord, is_template: bool) -> UserType {
        let (namespace, last) = split_qualified(&record.name);
        let base = if is_template {
            strip_template_arguments(last)
        } else {
            last
        };
        let ident = match sanitize_identifier(base).as_str() {
            "_" => "Anonymous".to_string(),
            ident => ident.to_string(),
        };

        UserType {
            name: self.registry.intern_owned(ident),
            namespace: namespace.map(|ns| self.namespace_path(ns)),
            native_name: self.registry.intern(&record.name),
            size: record.size,
            bases: Vec::new(),
            fields: Vec::new(),
            is_template,
            symbol: record.id,
            state: UserState::Stub,
        }
    }

    fn namespace_path(&mut self, namespace: &str) -> Symbol {
        let path = qualified_segments(namespace)
            .into_iter()
            .map(sanitize_identifier)
            .collect::<Vec<_>>()
            .join("::");
        self.registry.intern_owned(path)
    }
}

fn malformed(record: &SymbolRecord, reason: &str) -> Error {
    Error::MalformedRecord {
        id: record.id,
        name: record.name.clone(),
        reason: reason.to_string(),
    }
}
