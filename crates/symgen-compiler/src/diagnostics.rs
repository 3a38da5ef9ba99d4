//! Recoverable findings collected while generating.
//!
//! Anything that aborts a build is an [`Error`](crate::Error). Everything
//! else is resolved locally by a fallback policy and recorded here, and also
//! reported through `tracing`.

use std::fmt;

use symgen_core::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Note => f.write_str("note"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// Instantiations of one template have incompatible layouts; emitted specialized.
    AmbiguousTemplateGrouping,
    /// Dangling reference degraded to `Variable` (partial graphs allowed).
    UnresolvedReference,
    /// Two records share an identity but disagree on size; the first one wins.
    ConflictingDuplicate,
    /// Generic template depends on a specialized one; emitted specialized too.
    TemplateDemoted,
    /// Declaration name already taken; a numbered name was used.
    DeclarationRenamed,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::AmbiguousTemplateGrouping
            | DiagnosticKind::UnresolvedReference
            | DiagnosticKind::ConflictingDuplicate => Severity::Warning,
            DiagnosticKind::TemplateDemoted | DiagnosticKind::DeclarationRenamed => Severity::Note,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::AmbiguousTemplateGrouping => "ambiguous-template-grouping",
            DiagnosticKind::UnresolvedReference => "unresolved-reference",
            DiagnosticKind::ConflictingDuplicate => "conflicting-duplicate",
            DiagnosticKind::TemplateDemoted => "template-demoted",
            DiagnosticKind::DeclarationRenamed => "declaration-renamed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Symbol the finding is about, when there is a single one.
    pub symbol: Option<SymbolId>,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity(), self.kind.code(), self.message)?;
        if let Some(symbol) = self.symbol {
            write!(f, " (symbol {symbol})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a finding and log it.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        symbol: Option<SymbolId>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            message: message.into(),
            symbol,
        };
        match diagnostic.severity() {
            Severity::Warning => tracing::warn!(code = kind.code(), "{}", diagnostic.message),
            Severity::Note => tracing::debug!(code = kind.code(), "{}", diagnostic.message),
        }
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.kind == kind)
    }

    pub fn has_warnings(&self) -> bool {
        self.0.iter().any(|d| d.severity() == Severity::Warning)
    }

    pub fn warning_count(&self) -> usize {
        self.0
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
