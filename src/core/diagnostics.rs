//! Non-fatal diagnostics.
//!
//! Every operation that can recover from a problem takes a `&mut Diagnostics`
//! and records a warning instead of printing it. Callers decide whether to
//! print, count or ignore them (see `cli::report`).

use std::fmt;

/// Kind of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// Translation call whose key is not a string literal.
    MalformedCall,
    /// Key used at a call site but absent from the key table.
    MissingKey,
    /// Key defined, but not for any locale in the fallback chain.
    MissingLocaleValue,
    /// Pattern call whose value is not a string.
    InvalidPatternValue,
    /// Script linked to several translation resources.
    AmbiguousResource,
    /// Key used from several scripts while resolving its owner.
    AmbiguousOwner,
    /// A new translation resource was created.
    ResourceCreated,
    /// Reference to an asset that could not be loaded.
    UnresolvedReference,
    /// Script that does not parse.
    ParseFailure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedCall => write!(f, "malformed-call"),
            DiagnosticKind::MissingKey => write!(f, "missing-key"),
            DiagnosticKind::MissingLocaleValue => write!(f, "missing-locale-value"),
            DiagnosticKind::InvalidPatternValue => write!(f, "invalid-pattern-value"),
            DiagnosticKind::AmbiguousResource => write!(f, "ambiguous-resource"),
            DiagnosticKind::AmbiguousOwner => write!(f, "ambiguous-owner"),
            DiagnosticKind::ResourceCreated => write!(f, "resource-created"),
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved-reference"),
            DiagnosticKind::ParseFailure => write!(f, "parse-failure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Identifier of the asset the problem was found in, when known.
    pub asset: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.items.push(Diagnostic {
            kind,
            message: message.into(),
            asset: None,
        });
    }

    pub fn warn_in(
        &mut self,
        kind: DiagnosticKind,
        asset: Option<&str>,
        message: impl Into<String>,
    ) {
        self.items.push(Diagnostic {
            kind,
            message: message.into(),
            asset: asset.map(str::to_string),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
