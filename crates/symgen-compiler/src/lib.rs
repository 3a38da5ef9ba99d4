//! symgen compiler: from symbol records to typed Rust bindings.
//!
//! Pipeline stages:
//! - `graph` - type graph construction, deduplication and validation
//! - `templates` - generic vs specialized emission per template
//! - `codegen` - declaration ordering and rendering
//! - `type_tree` - the node model shared by all stages
//! - `diagnostics` - recoverable findings

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod graph;
pub mod templates;
pub mod type_tree;

#[cfg(test)]
pub mod test_utils;

use rayon::prelude::*;
use symgen_core::{SymbolId, SymbolRecord};

pub use codegen::{Declaration, Emitter};
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use graph::{GraphBuilder, TypeGraph};
pub use templates::{TemplatePlan, resolve_templates};

/// Result of a stage that produces output alongside recoverable diagnostics.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

/// Errors that abort generation for a record set.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A referenced id has no record and partial graphs are not allowed.
    #[error("type {id} referenced by `{referrer}`{} has no symbol record", in_field(.field))]
    SymbolResolution {
        id: SymbolId,
        referrer: String,
        field: Option<String>,
    },

    #[error("symbol id {id} is used by more than one record (`{name}`)")]
    DuplicateSymbol { id: SymbolId, name: String },

    #[error("malformed record {id} `{name}`: {reason}")]
    MalformedRecord {
        id: SymbolId,
        name: String,
        reason: String,
    },

    /// The base-class relation loops; members listed in cycle order.
    #[error("cyclic inheritance: {}", .cycle.join(" -> "))]
    CyclicInheritance { cycle: Vec<String> },

    #[error("type {id} is still unresolved at emission")]
    UnresolvedAtEmission { id: SymbolId },
}

fn in_field(field: &Option<String>) -> String {
    match field {
        Some(field) => format!(" (field `{field}`)"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Declarations in dependency order plus everything worth telling the user.
#[derive(Debug, Clone)]
pub struct Output {
    pub declarations: Vec<Declaration>,
    pub diagnostics: Diagnostics,
}

impl Output {
    /// All declarations concatenated, separated by blank lines.
    pub fn source(&self) -> String {
        if self.declarations.is_empty() {
            return String::new();
        }
        let texts: Vec<&str> = self.declarations.iter().map(|d| d.text.as_str()).collect();
        let mut out = texts.join("\n");
        out.truncate(out.trim_end().len());
        out.push('\n');
        out
    }
}

/// Run the whole pipeline over one record set.
#[tracing::instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn generate(records: &[SymbolRecord], config: &Config) -> Result<Output> {
    let (graph, mut diagnostics) = GraphBuilder::new(config).build(records)?;
    let plan = resolve_templates(&graph, config, &mut diagnostics);
    let (declarations, emit_diagnostics) = Emitter::new(&graph, &plan, config).emit()?;
    diagnostics.extend(emit_diagnostics);

    tracing::debug!(
        declarations = declarations.len(),
        warnings = diagnostics.warning_count(),
        "generation finished"
    );
    Ok(Output {
        declarations,
        diagnostics,
    })
}

/// One independent export: a record set and the options to generate it with.
#[derive(Debug, Clone)]
pub struct ExportJob<'a> {
    pub name: String,
    pub records: &'a [SymbolRecord],
    pub config: Config,
}

/// Generate several exports in parallel. Results come back in job order.
pub fn generate_all(jobs: &[ExportJob<'_>]) -> Vec<Result<Output>> {
    jobs.par_iter()
        .map(|job| {
            let _span = tracing::debug_span!("export", job = %job.name).entered();
            generate(job.records, &job.config)
        })
        .collect()
}
