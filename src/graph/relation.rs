use std::fmt;
use std::ops::Range;

use swc_common::Span;

use super::AssetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationId(pub(crate) usize);

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// `<script src>` from a document.
    DocumentScript,
    /// `ns.include("…")` from a script, to a script or translation resource.
    ScriptInclude,
}

/// Relation kinds followed when collecting what a document loads.
pub const INCLUSION: &[RelationKind] = &[RelationKind::DocumentScript, RelationKind::ScriptInclude];

/// Where the reference sits in the source asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationLocation {
    /// Byte range of an attribute value in a document.
    Attribute(Range<usize>),
    /// Span of the include call in a script.
    Call(Span),
    /// Created during localization; has no source text yet.
    Synthesized,
}

#[derive(Debug, Clone)]
pub struct Relation {
    pub kind: RelationKind,
    pub from: AssetId,
    pub to: AssetId,
    pub bootstrapper: bool,
    pub location: RelationLocation,
}

impl Relation {
    pub fn new(kind: RelationKind, from: AssetId, to: AssetId, location: RelationLocation) -> Self {
        Self {
            kind,
            from,
            to,
            bootstrapper: false,
            location,
        }
    }

    pub fn bootstrapper(mut self) -> Self {
        self.bootstrapper = true;
        self
    }
}
