//! Declaration text and type references.

use std::collections::{BTreeSet, HashSet};

use symgen_core::utils::{field_identifier, sanitize_identifier, split_qualified, strip_template_arguments};

use super::Declaration;
use super::Emitter;
use super::emitter::Unit;
use crate::templates::{GenericLayout, Shape, Spelling, TemplatePolicy, parameter_name};
use crate::type_tree::{Field, TypeId, TypeTree, UserType};

/// One `pub name: Type` line with its attribute.
struct FieldLine {
    name: String,
    ty: String,
    attr: String,
}

impl Emitter<'_> {
    pub(super) fn render_unit(&self, unit: usize) -> Declaration {
        let name = &self.unit_names[unit];
        let (decl_name, text) = match self.units[unit] {
            Unit::User(id) => (name.path.clone(), self.render_concrete(unit, id, false)),
            Unit::Specialized(id) => {
                let layout = self.graph.layout_of(id).unwrap_or(id);
                (name.path.clone(), self.render_concrete(unit, layout, true))
            }
            Unit::Generic(group) => {
                let arity = match &self.plan.group(group).policy {
                    TemplatePolicy::Generic(layout) => layout.arity,
                    TemplatePolicy::Specialized => 0,
                };
                let params: Vec<String> = (0..arity).map(|i| parameter_name(i, arity)).collect();
                (
                    format!("{}<{}>", name.path, params.join(", ")),
                    self.render_generic(unit, group),
                )
            }
        };
        Declaration {
            name: decl_name,
            namespace: name.namespace.clone(),
            text,
        }
    }

    /// A user type or one specialized instantiation.
    fn render_concrete(&self, unit: usize, layout: TypeId, specialized: bool) -> String {
        let Some(user) = self.graph.user(layout) else {
            return String::new();
        };
        let native = self.graph.name(user.native_name);

        let mut out = String::new();
        if self.config.doc_comments {
            out.push_str(&format!("/// Native type `{native}` ({} bytes).\n", user.size));
        }

        let bases: Vec<String> = user.bases.iter().map(|&b| self.render_ref(b)).collect();
        out.push_str(&native_type_attr(native, Some(user.size), &bases));
        if specialized {
            out.push_str("#[allow(non_camel_case_types)]\n");
        }

        let lines = self.concrete_fields(user);
        out.push_str(&struct_body(&self.unit_names[unit].ident, "", &lines));
        out
    }

    fn concrete_fields(&self, user: &UserType) -> Vec<FieldLine> {
        let mut used = HashSet::new();
        user.fields
            .iter()
            .map(|field: &Field| FieldLine {
                name: unique_field(&mut used, &field_identifier(self.graph.name(field.name))),
                ty: self.render_ref(field.ty),
                attr: self.field_attr(Some(field.offset), Some(field.ty)),
            })
            .collect()
    }

    /// One declaration covering every instantiation of a template group.
    fn render_generic(&self, unit: usize, group: usize) -> String {
        let group = self.plan.group(group);
        let TemplatePolicy::Generic(layout) = &group.policy else {
            return String::new();
        };
        let natives: Vec<&str> = group
            .instantiations
            .iter()
            .filter_map(|&id| self.graph.layout_of(id))
            .filter_map(|layout| self.graph.user(layout))
            .map(|user| self.graph.name(user.native_name))
            .collect();
        let template_name = natives
            .first()
            .map(|native| template_native_name(native))
            .unwrap_or_default();

        let mut out = String::new();
        if self.config.doc_comments {
            let covered: Vec<String> = natives.iter().map(|n| format!("`{n}`")).collect();
            out.push_str(&format!(
                "/// Native template `{template_name}`, covering {}.\n",
                covered.join(", ")
            ));
        }

        let bases: Vec<String> = layout
            .bases
            .iter()
            .map(|base| self.render_shape(base, layout.arity))
            .collect();
        out.push_str(&native_type_attr(&template_name, layout.size, &bases));

        let params: Vec<String> = (0..layout.arity)
            .map(|i| parameter_name(i, layout.arity))
            .collect();
        let generics = format!("<{}>", params.join(", "));
        let lines = self.generic_fields(layout, &params);
        out.push_str(&struct_body(&self.unit_names[unit].ident, &generics, &lines));
        out
    }

    fn generic_fields(&self, layout: &GenericLayout, params: &[String]) -> Vec<FieldLine> {
        let mut used = HashSet::new();
        let mut lines: Vec<FieldLine> = layout
            .fields
            .iter()
            .map(|field| {
                let enum_ty = match field.shape.spelling() {
                    Some(Spelling::Concrete(id)) => Some(id),
                    _ => None,
                };
                FieldLine {
                    name: unique_field(&mut used, &field_identifier(self.graph.name(field.name))),
                    ty: self.render_shape(&field.shape, layout.arity),
                    attr: self.field_attr(field.offset, enum_ty),
                }
            })
            .collect();

        let mut mentioned = BTreeSet::new();
        for field in &layout.fields {
            field.shape.used_params(&mut mentioned);
        }
        if mentioned.len() < params.len() {
            let tuple = match params {
                [single] => format!("({single},)"),
                _ => format!("({})", params.join(", ")),
            };
            lines.push(FieldLine {
                name: unique_field(&mut used, "_params"),
                ty: format!("::core::marker::PhantomData<{tuple}>"),
                attr: "#[field(skip)]".to_string(),
            });
        }
        lines
    }

    /// `#[field(...)]` with offset, plus the member table of enum-typed fields.
    fn field_attr(&self, offset: Option<u64>, ty: Option<TypeId>) -> String {
        let mut parts = vec![match offset {
            Some(offset) => format!("offset = 0x{offset:x}"),
            None => "dynamic".to_string(),
        }];
        if let Some(TypeTree::Enum(e)) = ty.map(|id| self.graph.get(id)) {
            let values: Vec<String> = e
                .members
                .iter()
                .map(|m| format!("{} = {}", sanitize_identifier(self.graph.name(m.name)), m.value))
                .collect();
            parts.push(format!(
                "enumeration = \"{}\"",
                self.graph.name(e.native_name)
            ));
            parts.push(format!("values({})", values.join(", ")));
        }
        format!("#[field({})]", parts.join(", "))
    }

    /// Type reference as it appears in emitted code.
    pub(super) fn render_ref(&self, id: TypeId) -> String {
        match self.graph.get(id) {
            TypeTree::Pointer { pointee } => format!("Pointer<{}>", self.render_ref(*pointee)),
            TypeTree::Array { element } => format!("Array<{}>", self.render_ref(*element)),
            TypeTree::Enum(e) => self.render_ref(e.underlying),
            TypeTree::User(_) => match self.unit_of.get(&id) {
                Some(&unit) => self.unit_names[unit].path.clone(),
                None => self.graph.render_name(id, self.config.truncate_namespaces),
            },
            TypeTree::Template(inst) => match self.unit_of.get(&id) {
                Some(&unit) if matches!(self.units[unit], Unit::Generic(_)) => {
                    let args: Vec<String> =
                        inst.arguments.iter().map(|&a| self.render_ref(a)).collect();
                    format!("{}<{}>", self.unit_names[unit].path, args.join(", "))
                }
                Some(&unit) => self.unit_names[unit].path.clone(),
                None => self.graph.render_name(id, self.config.truncate_namespaces),
            },
            TypeTree::Primitive(_) | TypeTree::Unresolved { .. } => {
                self.graph.render_name(id, self.config.truncate_namespaces)
            }
        }
    }

    /// Spelling of a unified shape inside a generic declaration.
    fn render_shape(&self, shape: &Shape, arity: usize) -> String {
        match shape.spelling() {
            Some(Spelling::Param(index)) => parameter_name(index, arity),
            Some(Spelling::Concrete(id)) => self.render_ref(id),
            Some(Spelling::Pointer(inner)) => format!("Pointer<{}>", self.render_shape(inner, arity)),
            Some(Spelling::Array(inner)) => format!("Array<{}>", self.render_shape(inner, arity)),
            Some(Spelling::Template { group, args }) => {
                let args: Vec<String> = args.iter().map(|a| self.render_shape(a, arity)).collect();
                let path = self
                    .generic_unit
                    .get(&group)
                    .map(|&unit| self.unit_names[unit].path.clone())
                    .unwrap_or_default();
                format!("{path}<{}>", args.join(", "))
            }
            None => "Variable".to_string(),
        }
    }
}

fn native_type_attr(native: &str, size: Option<u64>, bases: &[String]) -> String {
    let mut parts = vec![format!("name = {native:?}")];
    if let Some(size) = size {
        parts.push(format!("size = {size}"));
    }
    if !bases.is_empty() {
        parts.push(format!("bases({})", bases.join(", ")));
    }
    format!("#[native_type({})]\n", parts.join(", "))
}

fn struct_body(ident: &str, generics: &str, lines: &[FieldLine]) -> String {
    if lines.is_empty() {
        return format!("pub struct {ident}{generics} {{}}\n");
    }
    let mut out = format!("pub struct {ident}{generics} {{\n");
    for line in lines {
        out.push_str(&format!("    {}\n", line.attr));
        out.push_str(&format!("    pub {}: {},\n", line.name, line.ty));
    }
    out.push_str("}\n");
    out
}

fn unique_field(used: &mut HashSet<String>, base: &str) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let mut counter = 2;
    loop {
        let name = format!("{base}_{counter}");
        if used.insert(name.clone()) {
            return name;
        }
        counter += 1;
    }
}

/// `ns::Stack<int>` -> `ns::Stack`.
fn template_native_name(native: &str) -> String {
    let (namespace, last) = split_qualified(native);
    let base = strip_template_arguments(last);
    match namespace {
        Some(ns) => format!("{ns}::{base}"),
        None => base.to_string(),
    }
}
