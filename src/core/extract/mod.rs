//! Reachable key tables and the call-site occurrence index.
//!
//! Everything here works over the assets reachable from a starting document
//! or script through inclusion relations (`<script src>` and
//! `ns.include(…)`), collected children first.

mod occurrences;

use std::collections::BTreeMap;

use crate::core::{
    DiagnosticKind, Diagnostics, FlatKeyTable, KeyTable, LocalizeError, LocalizeOptions,
    expand_locale,
};
use crate::graph::{AssetGraph, AssetId, AssetKind, INCLUSION};

pub use occurrences::{Occurrence, OccurrenceIndex, find_call_site_occurrences};

/// Resources reachable from `start`, in post-order.
fn reachable_resources(graph: &AssetGraph, start: AssetId) -> Vec<AssetId> {
    graph
        .collect_assets_post_order(start, INCLUSION)
        .into_iter()
        .filter(|id| graph.asset(*id).is_ok_and(|a| a.kind() == AssetKind::Resource))
        .collect()
}

/// Merge the key tables of every resource reachable from `starts`.
///
/// Resources are merged in discovery order; when two define the same
/// key/locale pair the later one wins.
pub fn extract_reachable_keys(
    graph: &mut AssetGraph,
    starts: &[AssetId],
) -> Result<KeyTable, LocalizeError> {
    let mut merged = KeyTable::new();
    for start in starts {
        let resources = reachable_resources(graph, *start);
        graph.load_parse_trees(&resources)?;
        for id in resources {
            let Some(table) = graph.resource_table(id) else {
                continue;
            };
            for (key, values) in table {
                let entry = merged.entry(key.clone()).or_default();
                for (locale, value) in values {
                    entry.insert(locale.clone(), value.clone());
                }
            }
        }
    }
    Ok(merged)
}

/// Fail with `DuplicateKey` if any key is defined by more than one resource
/// in the whole graph.
pub fn verify_resource_ownership(graph: &mut AssetGraph) -> Result<(), LocalizeError> {
    let resources = graph.find_assets(|_, asset| asset.kind() == AssetKind::Resource);
    graph.load_parse_trees(&resources)?;

    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for id in &resources {
        let asset = graph.asset(*id)?;
        let Some(table) = graph.resource_table(*id) else {
            continue;
        };
        for key in table.keys() {
            owners
                .entry(key.as_str())
                .or_default()
                .push(asset.identifier.as_str());
        }
    }

    match owners.into_iter().find(|(_, resources)| resources.len() > 1) {
        Some((key, resources)) => Err(LocalizeError::DuplicateKey {
            key: key.to_string(),
            resources: resources.into_iter().map(str::to_string).collect(),
        }),
        None => Ok(()),
    }
}

/// The key table reachable from `start`, resolved for one locale.
///
/// Each key takes the value of the first locale in the fallback chain of
/// `locale` that defines it. Keys with no value anywhere in the chain are
/// left out and reported, except in the default language when a call site
/// of the key reachable from `start` carries an inline fallback.
pub fn extract_reachable_keys_for_locale(
    graph: &mut AssetGraph,
    locale: &str,
    start: AssetId,
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> Result<FlatKeyTable, LocalizeError> {
    verify_resource_ownership(graph)?;
    let table = extract_reachable_keys(graph, &[start])?;
    let chain = expand_locale(locale);
    let default_language = options.default_language.matches(locale);

    let mut occurrences: Option<OccurrenceIndex> = None;
    let mut flat = FlatKeyTable::new();
    for (key, values) in table {
        if let Some(value) = chain.iter().find_map(|l| values.get(l)) {
            flat.insert(key, value.clone());
            continue;
        }

        if default_language {
            if occurrences.is_none() {
                // Malformed calls are reported when the scripts are rewritten.
                let mut scratch = Diagnostics::new();
                occurrences = Some(find_call_site_occurrences(
                    graph,
                    &[start],
                    &options.names,
                    &mut scratch,
                )?);
            }
            if occurrences.as_ref().is_some_and(|o| o.has_fallback(&key)) {
                continue;
            }
        }

        diag.warn(
            DiagnosticKind::MissingLocaleValue,
            format!("No value for key '{}' in locale {} ({})", key, locale, chain.join(" > ")),
        );
    }
    Ok(flat)
}
