//! Test fixtures and helpers.

use symgen_core::SymbolRecord;

use crate::{Config, Diagnostics, GraphBuilder, Output, TypeGraph};

pub const INT: u64 = 100;
pub const DOUBLE: u64 = 101;
pub const UCHAR: u64 = 102;

pub fn primitives() -> Vec<SymbolRecord> {
    vec![
        SymbolRecord::primitive(INT, "int", 4),
        SymbolRecord::primitive(DOUBLE, "double", 8),
        SymbolRecord::primitive(UCHAR, "unsigned char", 1),
    ]
}

/// `primitives()` followed by `records`.
pub fn with_primitives(records: Vec<SymbolRecord>) -> Vec<SymbolRecord> {
    let mut all = primitives();
    all.extend(records);
    all
}

pub fn point(id: u64, name: &str) -> SymbolRecord {
    SymbolRecord::user_type(id, name, 16)
        .with_field("x", DOUBLE, 0)
        .with_field("y", DOUBLE, 8)
}

/// `Stack<arg>` holding a pointer to its items and a count.
pub fn stack(id: u64, pointer_id: u64, arg: u64, arg_name: &str) -> Vec<SymbolRecord> {
    vec![
        SymbolRecord::template_instantiation(id, &format!("Stack<{arg_name}>"), 16, &[arg])
            .with_field("items", pointer_id, 0)
            .with_field("count", INT, 8),
        SymbolRecord::pointer(pointer_id, Some(arg), 8),
    ]
}

pub fn build(records: &[SymbolRecord]) -> (TypeGraph, Diagnostics) {
    build_with(records, &Config::new())
}

pub fn build_with(records: &[SymbolRecord], config: &Config) -> (TypeGraph, Diagnostics) {
    GraphBuilder::new(config)
        .build(records)
        .unwrap_or_else(|e| panic!("graph build failed: {e}"))
}

pub fn generate(records: &[SymbolRecord], config: &Config) -> Output {
    crate::generate(records, config).unwrap_or_else(|e| panic!("generation failed: {e}"))
}

/// Emitted source without doc comments.
pub fn source(records: &[SymbolRecord], config: Config) -> String {
    generate(records, &config.doc_comments(false)).source()
}

pub fn declaration_names(output: &Output) -> Vec<&str> {
    output.declarations.iter().map(|d| d.name.as_str()).collect()
}
