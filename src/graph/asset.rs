use std::fmt;

use swc_common::Span;
use swc_ecma_ast::Expr;

use crate::core::KeyTable;
use crate::core::parsers::document::document_lang;
use crate::core::parsers::script::ParsedScript;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(pub(crate) usize);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Document,
    Script,
    Resource,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Document => write!(f, "document"),
            AssetKind::Script => write!(f, "script"),
            AssetKind::Resource => write!(f, "resource"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asset {
    /// Root-relative, `/`-separated path.
    pub identifier: String,
    pub body: AssetBody,
    /// Changed since it was loaded.
    pub dirty: bool,
}

#[derive(Debug, Clone)]
pub enum AssetBody {
    Document(Document),
    Script(Script),
    Resource(Resource),
}

#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    /// Value for `<html lang>`; written out when it differs from the text.
    pub lang: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Script {
    pub text: String,
    /// Parsed lazily by `AssetGraph::load_parse_trees`.
    pub tree: Option<ParsedScript>,
    /// Call-site rewrites applied to `tree`, in the order they happened.
    pub splices: Vec<Splice>,
}

#[derive(Debug, Clone)]
pub struct Resource {
    pub text: String,
    /// Parsed lazily by `AssetGraph::load_parse_trees`.
    pub table: Option<KeyTable>,
}

/// A replaced expression: the original source range and what now stands
/// in its place.
#[derive(Debug, Clone)]
pub struct Splice {
    pub span: Span,
    pub replacement: Expr,
}

impl Asset {
    pub fn document(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lang = document_lang(&text);
        Self {
            identifier: identifier.into(),
            body: AssetBody::Document(Document { text, lang }),
            dirty: false,
        }
    }

    pub fn script(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            body: AssetBody::Script(Script {
                text: text.into(),
                tree: None,
                splices: Vec::new(),
            }),
            dirty: false,
        }
    }

    pub fn resource(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            body: AssetBody::Resource(Resource {
                text: text.into(),
                table: None,
            }),
            dirty: false,
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self.body {
            AssetBody::Document(_) => AssetKind::Document,
            AssetBody::Script(_) => AssetKind::Script,
            AssetBody::Resource(_) => AssetKind::Resource,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match &mut self.body {
            AssetBody::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn as_script(&self) -> Option<&Script> {
        match &self.body {
            AssetBody::Script(script) => Some(script),
            _ => None,
        }
    }

    pub fn as_script_mut(&mut self) -> Option<&mut Script> {
        match &mut self.body {
            AssetBody::Script(script) => Some(script),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match &self.body {
            AssetBody::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_resource_mut(&mut self) -> Option<&mut Resource> {
        match &mut self.body {
            AssetBody::Resource(resource) => Some(resource),
            _ => None,
        }
    }
}
