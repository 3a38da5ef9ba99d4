use symgen_core::{SymbolId, SymbolRecord};

use crate::graph::TypeGraph;
use crate::test_utils::{
    DOUBLE, INT, UCHAR, declaration_names, generate, point, source, stack, with_primitives,
};
use crate::type_tree::TypeRegistry;
use crate::{Config, DiagnosticKind, Emitter, Error, TemplatePlan};

#[test]
fn point_with_doc_comments() {
    let records = with_primitives(vec![point(1, "Point")]);
    let output = generate(&records, &Config::new());

    insta::assert_snapshot!(output.source(), @r#"
    /// Native type `Point` (16 bytes).
    #[native_type(name = "Point", size = 16)]
    pub struct Point {
        #[field(offset = 0x0)]
        pub x: f64,
        #[field(offset = 0x8)]
        pub y: f64,
    }
    "#);
}

#[test]
fn self_referencing_pointer() {
    let records = vec![
        SymbolRecord::user_type(2, "Node", 8).with_field("next", 3, 0),
        SymbolRecord::pointer(3, Some(2), 8),
    ];

    insta::assert_snapshot!(source(&records, Config::new()), @r#"
    #[native_type(name = "Node", size = 8)]
    pub struct Node {
        #[field(offset = 0x0)]
        pub next: Pointer<Node>,
    }
    "#);
}

#[test]
fn generic_template_and_its_use() {
    let mut records = with_primitives(Vec::new());
    records.extend(stack(10, 11, INT, "int"));
    records.extend(stack(12, 13, DOUBLE, "double"));
    records.push(SymbolRecord::user_type(20, "Holder", 16).with_field("ints", 10, 0));

    let output = generate(&records, &Config::new());
    assert_eq!(declaration_names(&output), ["Stack<T>", "Holder"]);

    insta::assert_snapshot!(output.source(), @r#"
    /// Native template `Stack`, covering `Stack<int>`, `Stack<double>`.
    #[native_type(name = "Stack", size = 16)]
    pub struct Stack<T> {
        #[field(offset = 0x0)]
        pub items: Pointer<T>,
        #[field(offset = 0x8)]
        pub count: i32,
    }

    /// Native type `Holder` (16 bytes).
    #[native_type(name = "Holder", size = 16)]
    pub struct Holder {
        #[field(offset = 0x0)]
        pub ints: Stack<i32>,
    }
    "#);
}

#[test]
fn specialized_instantiations() {
    let mut records = with_primitives(Vec::new());
    records.extend(stack(10, 11, INT, "int"));
    records.extend(stack(12, 13, UCHAR, "unsigned char"));
    records[5] = records[5].clone().with_field("flags", UCHAR, 12);

    let output = generate(&records, &Config::new().doc_comments(false));
    assert_eq!(declaration_names(&output), ["Stack_i32", "Stack_u8"]);
    assert_eq!(
        output
            .diagnostics
            .of_kind(DiagnosticKind::AmbiguousTemplateGrouping)
            .count(),
        1
    );

    insta::assert_snapshot!(output.source(), @r#"
    #[native_type(name = "Stack<int>", size = 16)]
    #[allow(non_camel_case_types)]
    pub struct Stack_i32 {
        #[field(offset = 0x0)]
        pub items: Pointer<i32>,
        #[field(offset = 0x8)]
        pub count: i32,
    }

    #[native_type(name = "Stack<unsigned char>", size = 16)]
    #[allow(non_camel_case_types)]
    pub struct Stack_u8 {
        #[field(offset = 0x0)]
        pub items: Pointer<u8>,
        #[field(offset = 0x8)]
        pub count: i32,
        #[field(offset = 0xc)]
        pub flags: u8,
    }
    "#);
}

#[test]
fn nested_generic_templates() {
    let records = with_primitives(vec![
        SymbolRecord::template_instantiation(20, "Wrapper<int>", 4, &[INT])
            .with_field("value", INT, 0),
        SymbolRecord::template_instantiation(21, "Wrapper<double>", 8, &[DOUBLE])
            .with_field("value", DOUBLE, 0),
        SymbolRecord::template_instantiation(30, "Holder<int>", 4, &[INT])
            .with_field("inner", 20, 0),
        SymbolRecord::template_instantiation(31, "Holder<double>", 8, &[DOUBLE])
            .with_field("inner", 21, 0),
    ]);

    insta::assert_snapshot!(source(&records, Config::new()), @r#"
    #[native_type(name = "Wrapper")]
    pub struct Wrapper<T> {
        #[field(offset = 0x0)]
        pub value: T,
    }

    #[native_type(name = "Holder")]
    pub struct Holder<T> {
        #[field(offset = 0x0)]
        pub inner: Wrapper<T>,
    }
    "#);
}

#[test]
fn generic_field_offsets_that_vary() {
    let records = with_primitives(vec![
        SymbolRecord::template_instantiation(10, "Slot<unsigned char>", 8, &[UCHAR])
            .with_field("value", UCHAR, 0)
            .with_field("tag", INT, 4),
        SymbolRecord::template_instantiation(11, "Slot<double>", 16, &[DOUBLE])
            .with_field("value", DOUBLE, 0)
            .with_field("tag", INT, 8),
    ]);

    insta::assert_snapshot!(source(&records, Config::new()), @r#"
    #[native_type(name = "Slot")]
    pub struct Slot<T> {
        #[field(offset = 0x0)]
        pub value: T,
        #[field(dynamic)]
        pub tag: i32,
    }
    "#);
}

#[test]
fn unused_parameter_gets_marker() {
    let records = with_primitives(vec![
        SymbolRecord::template_instantiation(10, "Tag<int>", 4, &[INT]).with_field("id", INT, 0),
        SymbolRecord::template_instantiation(11, "Tag<double>", 4, &[DOUBLE])
            .with_field("id", INT, 0),
    ]);

    insta::assert_snapshot!(source(&records, Config::new()), @r#"
    #[native_type(name = "Tag", size = 4)]
    pub struct Tag<T> {
        #[field(offset = 0x0)]
        pub id: i32,
        #[field(skip)]
        pub _params: ::core::marker::PhantomData<(T,)>,
    }
    "#);
}

#[test]
fn bases_and_enum_fields() {
    let records = with_primitives(vec![
        SymbolRecord::user_type(1, "Base", 4).with_field("id", INT, 0),
        SymbolRecord::enumeration(2, "gfx::Color", 4, None)
            .with_enumerator("Red", 0)
            .with_enumerator("Green", 1),
        SymbolRecord::user_type(3, "Brush", 8)
            .with_base(1)
            .with_field("color", 2, 4),
    ]);

    insta::assert_snapshot!(source(&records, Config::new()), @r#"
    #[native_type(name = "Base", size = 4)]
    pub struct Base {
        #[field(offset = 0x0)]
        pub id: i32,
    }

    #[native_type(name = "Brush", size = 8, bases(Base))]
    pub struct Brush {
        #[field(offset = 0x4, enumeration = "gfx::Color", values(Red = 0, Green = 1))]
        pub color: i32,
    }
    "#);
}

#[test]
fn namespaced_declarations() {
    let records = with_primitives(vec![
        point(1, "geo::Point"),
        SymbolRecord::user_type(2, "geo::shapes::Line", 32)
            .with_field("from", 1, 0)
            .with_field("to", 1, 16),
    ]);
    let output = generate(&records, &Config::new().doc_comments(false));

    assert_eq!(declaration_names(&output), ["geo::Point", "geo::shapes::Line"]);
    assert_eq!(output.declarations[1].namespace.as_deref(), Some("geo::shapes"));
    insta::assert_snapshot!(output.declarations[1].text, @r#"
    #[native_type(name = "geo::shapes::Line", size = 32)]
    pub struct Line {
        #[field(offset = 0x0)]
        pub from: geo::Point,
        #[field(offset = 0x10)]
        pub to: geo::Point,
    }
    "#);
}

#[test]
fn truncated_names_are_made_unique() {
    let records = with_primitives(vec![
        point(1, "a::Point"),
        point(2, "b::Point"),
        SymbolRecord::user_type(3, "Segment", 32)
            .with_field("start", 1, 0)
            .with_field("end", 2, 16),
    ]);
    let config = Config::new().truncate_namespaces(true).doc_comments(false);
    let output = generate(&records, &config);

    assert_eq!(declaration_names(&output), ["Point", "Point2", "Segment"]);
    let renamed: Vec<String> = output
        .diagnostics
        .of_kind(DiagnosticKind::DeclarationRenamed)
        .map(ToString::to_string)
        .collect();
    insta::assert_snapshot!(renamed.join("\n"), @"note[declaration-renamed]: `Point` is already declared; using `Point2`");

    insta::assert_snapshot!(output.declarations[2].text, @r#"
    #[native_type(name = "Segment", size = 32)]
    pub struct Segment {
        #[field(offset = 0x0)]
        pub start: Point,
        #[field(offset = 0x10)]
        pub end: Point2,
    }
    "#);
}

#[test]
fn numbered_names_get_a_separator() {
    let records = with_primitives(vec![
        SymbolRecord::primitive(103, "long", 4),
        SymbolRecord::template_instantiation(10, "Box<int>", 4, &[INT]).with_field("value", INT, 0),
        SymbolRecord::template_instantiation(11, "Box<long>", 4, &[103])
            .with_field("value", 103, 0),
        point(1, "a::Vec3"),
        point(2, "b::Vec3"),
    ]);
    let config = Config::new()
        .template_grouping(false)
        .truncate_namespaces(true)
        .doc_comments(false);
    let output = generate(&records, &config);

    assert_eq!(
        declaration_names(&output),
        ["Box_i32", "Box_i32_2", "Vec3", "Vec3_2"]
    );
    let renamed: Vec<String> = output
        .diagnostics
        .of_kind(DiagnosticKind::DeclarationRenamed)
        .map(ToString::to_string)
        .collect();
    insta::assert_snapshot!(renamed.join("\n"), @r"
    note[declaration-renamed]: `Box_i32` is already declared; using `Box_i32_2`
    note[declaration-renamed]: `Vec3` is already declared; using `Vec3_2`
    ");
}

#[test]
fn mutually_referencing_structs() {
    let records = vec![
        SymbolRecord::user_type(10, "Parent", 8).with_field("child", 12, 0),
        SymbolRecord::user_type(11, "Child", 8).with_field("parent", 13, 0),
        SymbolRecord::pointer(12, Some(11), 8),
        SymbolRecord::pointer(13, Some(10), 8),
    ];
    let output = generate(&records, &Config::new().doc_comments(false));

    assert_eq!(declaration_names(&output), ["Parent", "Child"]);
    insta::assert_snapshot!(output.source(), @r#"
    #[native_type(name = "Parent", size = 8)]
    pub struct Parent {
        #[field(offset = 0x0)]
        pub child: Pointer<Child>,
    }

    #[native_type(name = "Child", size = 8)]
    pub struct Child {
        #[field(offset = 0x0)]
        pub parent: Pointer<Parent>,
    }
    "#);
}

#[test]
fn field_names_become_identifiers() {
    let records = with_primitives(vec![
        SymbolRecord::user_type(1, "Odd", 16)
            .with_field("type", INT, 0)
            .with_field("x", INT, 4)
            .with_field("x", INT, 8)
            .with_field("self", INT, 12),
        SymbolRecord::user_type(2, "Empty", 1),
    ]);

    insta::assert_snapshot!(source(&records, Config::new()), @r#"
    #[native_type(name = "Odd", size = 16)]
    pub struct Odd {
        #[field(offset = 0x0)]
        pub r#type: i32,
        #[field(offset = 0x4)]
        pub x: i32,
        #[field(offset = 0x8)]
        pub x_2: i32,
        #[field(offset = 0xc)]
        pub self_: i32,
    }

    #[native_type(name = "Empty", size = 1)]
    pub struct Empty {}
    "#);
}

#[test]
fn partial_graph_uses_placeholder() {
    let records = vec![SymbolRecord::user_type(1, "Holder", 8).with_field("other", 99, 0)];
    let config = Config::new().allow_partial_graph(true).doc_comments(false);
    let output = generate(&records, &config);

    assert_eq!(output.diagnostics.warning_count(), 1);
    insta::assert_snapshot!(output.source(), @r#"
    #[native_type(name = "Holder", size = 8)]
    pub struct Holder {
        #[field(offset = 0x0)]
        pub other: Variable,
    }
    "#);
}

#[test]
fn unresolved_node_stops_emission() {
    let mut registry = TypeRegistry::new();
    registry.slot_for(SymbolId(5));
    let graph = TypeGraph::new(registry, Vec::new());
    let plan = TemplatePlan::default();
    let config = Config::new();

    let err = Emitter::new(&graph, &plan, &config).emit().unwrap_err();
    assert!(matches!(err, Error::UnresolvedAtEmission { id } if id == SymbolId(5)));
}
