use std::collections::{BTreeMap, HashSet};
use std::ops::ControlFlow;

use swc_common::{Span, Spanned};
use swc_ecma_ast::Expr;

use crate::core::{CallKind, CallNames, CallSiteScanner, Diagnostics, LocalizeError};
use crate::graph::{AssetGraph, AssetId, AssetKind, INCLUSION};

/// One call site of a key.
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub script: AssetId,
    pub kind: CallKind,
    pub span: Span,
    pub fallback: Option<Expr>,
}

/// Call sites by key, each list in discovery order.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceIndex {
    by_key: BTreeMap<String, Vec<Occurrence>>,
}

impl OccurrenceIndex {
    pub fn get(&self, key: &str) -> &[Occurrence] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_fallback(&self, key: &str) -> bool {
        self.get(key).iter().any(|o| o.fallback.is_some())
    }

    /// Distinct scripts using `key`, in discovery order.
    pub fn scripts(&self, key: &str) -> Vec<AssetId> {
        let mut seen = HashSet::new();
        self.get(key)
            .iter()
            .map(|o| o.script)
            .filter(|script| seen.insert(*script))
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    fn push(&mut self, key: &str, occurrence: Occurrence) {
        self.by_key.entry(key.to_string()).or_default().push(occurrence);
    }
}

/// Index every call site in the scripts reachable from `starts`.
///
/// Scripts are parsed on demand and scanned once each, even when several
/// starts reach them.
pub fn find_call_site_occurrences(
    graph: &mut AssetGraph,
    starts: &[AssetId],
    names: &CallNames,
    diag: &mut Diagnostics,
) -> Result<OccurrenceIndex, LocalizeError> {
    let mut seen = HashSet::new();
    let mut scripts = Vec::new();
    for start in starts {
        for id in graph.collect_assets_post_order(*start, INCLUSION) {
            if graph.asset(id)?.kind() == AssetKind::Script && seen.insert(id) {
                scripts.push(id);
            }
        }
    }
    graph.load_parse_trees(&scripts)?;

    let mut index = OccurrenceIndex::default();
    for script in scripts {
        let identifier = graph.asset(script)?.identifier.as_str();
        let Some(program) = graph.program(script) else {
            continue;
        };
        CallSiteScanner::new(names)
            .with_origin(identifier)
            .scan_program(program, diag, |site, _| {
                index.push(
                    site.key,
                    Occurrence {
                        script,
                        kind: site.kind,
                        span: site.node.span(),
                        fallback: site.fallback.cloned(),
                    },
                );
                ControlFlow::Continue(())
            });
    }
    Ok(index)
}
