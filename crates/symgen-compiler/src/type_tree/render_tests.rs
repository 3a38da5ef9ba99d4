use symgen_core::SymbolId;

use super::*;

fn user(registry: &mut TypeRegistry, namespace: Option<&str>, name: &str) -> TypeId {
    let namespace = namespace.map(|ns| registry.intern(ns));
    let name_sym = registry.intern(name);
    registry.alloc(TypeTree::User(UserType {
        name: name_sym,
        namespace,
        native_name: name_sym,
        size: 16,
        bases: Vec::new(),
        fields: Vec::new(),
        is_template: false,
        symbol: SymbolId(100),
        state: UserState::Populated,
    }))
}

fn template(registry: &mut TypeRegistry, name: &str, arguments: Vec<TypeId>) -> TypeId {
    let layout = user(registry, Some("coll"), name);
    if let Some(u) = registry.user_mut(layout) {
        u.is_template = true;
    }
    registry.alloc(TypeTree::Template(TemplateInstantiation {
        template: layout,
        arguments,
    }))
}

#[test]
fn primitives_map_to_scalars() {
    let mut registry = TypeRegistry::new();
    let cases = [
        ("double", "f64"),
        ("unsigned char", "u8"),
        ("const int", "i32"),
        ("unsigned  long long", "u64"),
        ("wchar_t", "u16"),
        ("bool", "bool"),
        ("GUID", "GUID"),
        ("long double", "f64"),
    ];

    for (native, expected) in cases {
        let id = registry.primitive(native);
        assert_eq!(registry.render_name(id, true), expected, "{native}");
    }
}

#[test]
fn user_type_truncation() {
    let mut registry = TypeRegistry::new();
    let point = user(&mut registry, Some("geo"), "Point");

    assert_eq!(registry.render_name(point, false), "geo::Point");
    assert_eq!(registry.render_name(point, true), "Point");
}

#[test]
fn wrappers_nest() {
    let mut registry = TypeRegistry::new();
    let point = user(&mut registry, Some("geo"), "Point");
    let array = registry.alloc(TypeTree::Array { element: point });
    let pointer = registry.alloc(TypeTree::Pointer { pointee: array });

    assert_eq!(registry.render_name(array, true), "Array<Point>");
    assert_eq!(
        registry.render_name(pointer, false),
        "Pointer<Array<geo::Point>>"
    );
}

#[test]
fn void_placeholders() {
    let mut registry = TypeRegistry::new();
    let void_ptr = registry.alloc(TypeTree::Pointer {
        pointee: TypeId::VOID,
    });
    let unknown_array = registry.alloc(TypeTree::Array {
        element: TypeId::VOID,
    });

    assert_eq!(registry.render_name(void_ptr, true), "Pointer<Void>");
    assert_eq!(registry.render_name(unknown_array, true), "Array<Void>");
}

#[test]
fn template_arguments_render_recursively() {
    let mut registry = TypeRegistry::new();
    let int = registry.primitive("int");
    let point = user(&mut registry, Some("geo"), "Point");
    let inner = template(&mut registry, "Stack", vec![int]);
    let outer = template(&mut registry, "Map", vec![point, inner]);

    assert_eq!(registry.render_name(inner, true), "Stack<i32>");
    assert_eq!(
        registry.render_name(outer, false),
        "coll::Map<geo::Point, coll::Stack<i32>>"
    );
    assert_eq!(registry.render_name(outer, true), "Map<Point, Stack<i32>>");
}

#[test]
fn enum_renders_as_underlying() {
    let mut registry = TypeRegistry::new();
    let underlying = registry.primitive("unsigned short");
    let name = registry.intern("Color");
    let color = registry.alloc(TypeTree::Enum(EnumType {
        name,
        native_name: name,
        underlying,
        members: Vec::new(),
    }));

    assert_eq!(registry.render_name(color, false), "u16");
}

#[test]
fn rendering_is_idempotent() {
    let mut registry = TypeRegistry::new();
    let point = user(&mut registry, Some("geo"), "Point");
    let ptr = registry.alloc(TypeTree::Pointer { pointee: point });
    let stack = template(&mut registry, "Stack", vec![ptr]);

    for truncate in [false, true] {
        let first = registry.render_name(stack, truncate);
        let second = registry.render_name(stack, truncate);
        assert_eq!(first, second);
    }
}

#[test]
fn native_spelling_keeps_distinct_scalars_apart() {
    let mut registry = TypeRegistry::new();
    let int = registry.primitive("int");
    let long = registry.primitive("long");
    let name = registry.intern("Color");
    let color = registry.alloc(TypeTree::Enum(EnumType {
        name,
        native_name: name,
        underlying: int,
        members: Vec::new(),
    }));
    let point = user(&mut registry, Some("geo"), "Point");
    let int_ptr = registry.alloc(TypeTree::Pointer { pointee: int });
    let points = registry.alloc(TypeTree::Array { element: point });

    assert_eq!(registry.render_name(int, false), registry.render_name(long, false));
    assert_eq!(registry.native_spelling(int), "int");
    assert_eq!(registry.native_spelling(long), "long");
    assert_eq!(registry.native_spelling(color), "Color");
    assert_eq!(registry.native_spelling(int_ptr), "int*");
    assert_eq!(registry.native_spelling(points), "Point[]");
}
