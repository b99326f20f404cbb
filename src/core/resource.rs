//! Finding, and when needed creating, the translation resource that owns a
//! key.

use std::collections::BTreeSet;

use crate::core::{
    DiagnosticKind, Diagnostics, KeyTable, LocalizeError, LocalizeOptions, OccurrenceIndex,
    find_call_site_occurrences,
};
use crate::graph::{
    Asset, AssetGraph, AssetId, AssetKind, Relation, RelationKind, RelationLocation,
};

/// Identifier of the resource created for a script: `.js`/`.html` replaced
/// by the resource suffix, or the suffix appended.
///
/// ```
/// use localeclone::core::resource::resource_identifier_for;
///
/// assert_eq!(resource_identifier_for("js/app.js", ".i18n"), "js/app.i18n");
/// assert_eq!(resource_identifier_for("js/app", ".i18n"), "js/app.i18n");
/// ```
pub fn resource_identifier_for(script: &str, suffix: &str) -> String {
    let stem = script
        .strip_suffix(".js")
        .or_else(|| script.strip_suffix(".html"))
        .unwrap_or(script);
    format!("{}{}", stem, suffix)
}

/// The resource that owns `key`.
///
/// An existing resource defining the key wins. Otherwise the owner is the
/// resource included by the script using the key, created (with a new
/// include relation) when that script has none.
pub fn resolve_or_create(
    graph: &mut AssetGraph,
    key: &str,
    occurrences: &OccurrenceIndex,
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> Result<AssetId, LocalizeError> {
    resolve_owner(graph, key, occurrences, options, diag).map(|(id, _)| id)
}

/// Like [`resolve_or_create`], also telling whether the resource is new.
fn resolve_owner(
    graph: &mut AssetGraph,
    key: &str,
    occurrences: &OccurrenceIndex,
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> Result<(AssetId, bool), LocalizeError> {
    let resources = graph.find_assets(|_, asset| asset.kind() == AssetKind::Resource);
    graph.load_parse_trees(&resources)?;

    let defining: Vec<AssetId> = resources
        .into_iter()
        .filter(|id| graph.resource_table(*id).is_some_and(|t| t.contains_key(key)))
        .collect();
    match defining.as_slice() {
        [] => {}
        [only] => return Ok((*only, false)),
        _ => {
            return Err(LocalizeError::DuplicateKey {
                key: key.to_string(),
                resources: defining
                    .iter()
                    .map(|id| graph.asset(*id).map(|a| a.identifier.clone()))
                    .collect::<Result<_, _>>()?,
            });
        }
    }

    let script = match occurrences.scripts(key).as_slice() {
        [] => {
            return Err(LocalizeError::UnusedKey {
                key: key.to_string(),
            });
        }
        [only] => *only,
        [.., last] => {
            let chosen = graph.asset(*last)?.identifier.clone();
            diag.warn(
                DiagnosticKind::AmbiguousOwner,
                format!(
                    "The key '{}' is used from several scripts, adding it to the resource of {}",
                    key, chosen
                ),
            );
            *last
        }
    };

    let linked: Vec<AssetId> = graph
        .outgoing(script, RelationKind::ScriptInclude)
        .into_iter()
        .filter_map(|rel| graph.relation(rel).map(|r| r.to))
        .filter(|to| graph.asset(*to).is_ok_and(|a| a.kind() == AssetKind::Resource))
        .collect();

    match linked.as_slice() {
        [] => create_resource(graph, script, key, options, diag).map(|id| (id, true)),
        [only] => Ok((*only, false)),
        [first, ..] => {
            let script_identifier = &graph.asset(script)?.identifier;
            diag.warn_in(
                DiagnosticKind::AmbiguousResource,
                Some(script_identifier),
                format!(
                    "{} includes {} translation resources, using the first for '{}'",
                    script_identifier,
                    linked.len(),
                    key
                ),
            );
            Ok((*first, false))
        }
    }
}

fn create_resource(
    graph: &mut AssetGraph,
    script: AssetId,
    key: &str,
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> Result<AssetId, LocalizeError> {
    let script_identifier = graph.asset(script)?.identifier.clone();
    let identifier = graph.unique_identifier(&resource_identifier_for(
        &script_identifier,
        &options.resource_suffix,
    ));

    let mut asset = Asset::resource(identifier.clone(), "");
    if let Some(resource) = asset.as_resource_mut() {
        resource.table = Some(KeyTable::new());
    }
    asset.mark_dirty();
    let id = graph.add_asset(asset);
    graph.add_relation(Relation::new(
        RelationKind::ScriptInclude,
        script,
        id,
        RelationLocation::Synthesized,
    ));
    graph.asset_mut(script)?.mark_dirty();

    diag.warn_in(
        DiagnosticKind::ResourceCreated,
        Some(identifier.as_str()),
        format!(
            "Created {} for the key '{}' used in {}",
            identifier, key, script_identifier
        ),
    );
    Ok(id)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Keys present in the imported table.
    pub keys: usize,
    /// Locale values added or changed.
    pub values_changed: usize,
    /// Resources whose table changed, by identifier.
    pub updated_resources: BTreeSet<String>,
    /// Resources that did not exist before the import.
    pub created_resources: BTreeSet<String>,
}

impl ImportSummary {
    pub fn is_empty(&self) -> bool {
        self.values_changed == 0
    }
}

/// Merge an external `key → locale → value` table into the owning
/// resources. Owners are resolved against call sites in every document and
/// script of the graph.
pub fn import_translations(
    graph: &mut AssetGraph,
    table: &KeyTable,
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> Result<ImportSummary, LocalizeError> {
    let starts = graph.find_assets(|_, asset| {
        matches!(asset.kind(), AssetKind::Document | AssetKind::Script)
    });
    let occurrences = find_call_site_occurrences(graph, &starts, &options.names, diag)?;

    let mut summary = ImportSummary {
        keys: table.len(),
        ..ImportSummary::default()
    };
    for (key, values) in table {
        let (owner, created) = resolve_owner(graph, key, &occurrences, options, diag)?;
        let identifier = graph.asset(owner)?.identifier.clone();
        if created {
            summary.created_resources.insert(identifier.clone());
        }

        let mut changed = 0;
        if let Some(owner_table) = graph.resource_table_mut(owner) {
            let entry = owner_table.entry(key.clone()).or_default();
            for (locale, value) in values {
                if entry.get(locale) != Some(value) {
                    entry.insert(locale.clone(), value.clone());
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            graph.asset_mut(owner)?.mark_dirty();
            summary.values_changed += changed;
            summary.updated_resources.insert(identifier);
        }
    }
    Ok(summary)
}
