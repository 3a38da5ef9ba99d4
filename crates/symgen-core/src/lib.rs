#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for symgen.
//!
//! - **Symbol records**: the flat, id-linked description of native types that a
//!   symbol backend (PDB reader, debugger engine) hands to the generator.
//! - **Snapshots**: a compact binary form of a record stream, so a dump taken
//!   once can be regenerated offline.
//! - **Interner**: cheap handles for the names that appear over and over in
//!   a type graph.
//! - **Utils**: native name handling (qualified names, template argument
//!   lists, identifier sanitizing).

mod interner;
mod records;
pub mod utils;

pub use interner::{Interner, Symbol};
pub use records::{
    EnumeratorRecord, FieldRecord, RecordError, SymbolId, SymbolKind, SymbolRecord,
    decode_records, encode_records, parse_symbol_records,
};
