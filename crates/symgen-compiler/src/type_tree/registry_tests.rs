use std::collections::HashMap;

use symgen_core::SymbolId;

use super::*;

fn stub(registry: &mut TypeRegistry, name: &str, symbol: u64) -> UserType {
    UserType {
        name: registry.intern(name),
        namespace: None,
        native_name: registry.intern(name),
        size: 0,
        bases: Vec::new(),
        fields: Vec::new(),
        is_template: false,
        symbol: SymbolId(symbol),
        state: UserState::Stub,
    }
}

#[test]
fn builtins_are_preregistered() {
    let registry = TypeRegistry::new();

    assert_eq!(registry.len(), 2);
    assert!(TypeId::VOID.is_builtin());
    assert!(TypeId::VARIABLE.is_builtin());
    assert!(!TypeId(2).is_builtin());
    assert_eq!(registry.render_name(TypeId::VOID, true), "Void");
    assert_eq!(registry.render_name(TypeId::VARIABLE, true), "Variable");
}

#[test]
fn primitive_nodes_are_shared() {
    let mut registry = TypeRegistry::new();

    let a = registry.primitive("int");
    let b = registry.primitive("int");
    let c = registry.primitive("double");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(registry.primitive("void"), TypeId::VOID);
}

#[test]
fn slot_for_binds_once() {
    let mut registry = TypeRegistry::new();

    let (first, created) = registry.slot_for(SymbolId(7));
    assert!(created);
    assert!(registry.get(first).is_unresolved());

    let (again, created) = registry.slot_for(SymbolId(7));
    assert!(!created);
    assert_eq!(first, again);
    assert_eq!(registry.lookup(SymbolId(7)), Some(first));
    assert_eq!(registry.lookup(SymbolId(8)), None);
}

#[test]
fn replace_rewrites_in_place() {
    let mut registry = TypeRegistry::new();
    let (target, _) = registry.slot_for(SymbolId(1));
    let pointer = registry.alloc(TypeTree::Pointer { pointee: target });

    assert_eq!(registry.render_name(pointer, true), "Pointer<Unresolved<#1>>");

    let node = stub(&mut registry, "Node", 1);
    registry.replace(target, TypeTree::User(node));

    assert_eq!(registry.render_name(pointer, true), "Pointer<Node>");
}

#[test]
fn redirect_rewrites_links_and_bindings() {
    let mut registry = TypeRegistry::new();
    let (keep, _) = registry.slot_for(SymbolId(1));
    let (dup, _) = registry.slot_for(SymbolId(2));
    let node = stub(&mut registry, "Point", 1);
    registry.replace(keep, TypeTree::User(node.clone()));
    registry.replace(dup, TypeTree::User(node));
    let array = registry.alloc(TypeTree::Array { element: dup });

    registry.redirect(&HashMap::from([(dup, keep)]));

    assert_eq!(registry.get(array), &TypeTree::Array { element: keep });
    assert_eq!(registry.lookup(SymbolId(2)), Some(keep));
}

#[test]
fn layout_of_template_is_its_user_node() {
    let mut registry = TypeRegistry::new();
    let mut layout = stub(&mut registry, "Stack", 3);
    layout.is_template = true;
    let layout = registry.alloc(TypeTree::User(layout));
    let int = registry.primitive("int");
    let inst = registry.alloc(TypeTree::Template(TemplateInstantiation {
        template: layout,
        arguments: vec![int],
    }));

    assert_eq!(registry.layout_of(inst), Some(layout));
    assert_eq!(registry.layout_of(layout), Some(layout));
    assert_eq!(registry.layout_of(int), None);
}

#[test]
fn user_state_only_moves_forward() {
    let mut state = UserState::Stub;

    assert!(state.advance(UserState::Populated));
    assert!(!state.advance(UserState::Stub));
    assert!(state.advance(UserState::Kept));
    assert!(!state.advance(UserState::Discarded { into: TypeId(2) }));
    assert_eq!(state, UserState::Kept);
    assert!(state.is_live());

    let mut dropped = UserState::Populated;
    assert!(dropped.advance(UserState::Discarded { into: TypeId(5) }));
    assert!(!dropped.is_live());
}
