use std::collections::BTreeSet;

use anyhow::{Result, bail};

use super::super::args::KeysCommand;
use super::helper::{finish, load_project};
use super::{CommandError, CommandResult, CommandSummary, DocumentKeys, KeyEntry, KeysSummary};
use crate::core::{
    DiagnosticKind, Diagnostics, LocalizeError, LocalizeOptions, extract_reachable_keys,
    extract_reachable_keys_for_locale, find_call_site_occurrences, is_valid_locale_id,
};
use crate::graph::{AssetGraph, AssetId};

pub fn keys(cmd: KeysCommand) -> Result<CommandResult> {
    if let Some(locale) = &cmd.locale
        && !is_valid_locale_id(locale)
    {
        bail!("Invalid locale id: \"{}\"", locale);
    }

    let mut diag = Diagnostics::new();
    let mut project = load_project(&cmd.common, &mut diag, |_| {})?;
    let options = project.options();

    let mut documents = Vec::new();
    let mut errors = Vec::new();
    for id in project.documents.clone() {
        let identifier = project.graph.asset(id)?.identifier.clone();
        match document_keys(
            &mut project.graph,
            id,
            cmd.locale.as_deref(),
            &options,
            &mut diag,
        ) {
            Ok(keys) => documents.push(DocumentKeys { identifier, keys }),
            Err(err) => errors.push(CommandError {
                asset: Some(identifier),
                message: err.to_string(),
            }),
        }
    }

    Ok(finish(
        CommandSummary::Keys(KeysSummary {
            locale: cmd.locale,
            documents,
        }),
        diag,
        errors,
        true,
    ))
}

/// Every key that is either called or defined from `document`, sorted.
fn document_keys(
    graph: &mut AssetGraph,
    document: AssetId,
    locale: Option<&str>,
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> Result<Vec<KeyEntry>, LocalizeError> {
    let identifier = graph.asset(document)?.identifier.clone();
    let occurrences = find_call_site_occurrences(graph, &[document], &options.names, diag)?;
    let table = extract_reachable_keys(graph, &[document])?;
    let resolved = match locale {
        Some(locale) => Some(extract_reachable_keys_for_locale(
            graph, locale, document, options, diag,
        )?),
        None => None,
    };

    let all_keys: BTreeSet<&str> = occurrences
        .keys()
        .chain(table.keys().map(String::as_str))
        .collect();

    let mut entries = Vec::with_capacity(all_keys.len());
    for key in all_keys {
        let used = !occurrences.get(key).is_empty();
        let locales: Vec<String> = table
            .get(key)
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default();
        let value = resolved.as_ref().and_then(|flat| flat.get(key).cloned());

        if used && locales.is_empty() && !occurrences.has_fallback(key) {
            diag.warn_in(
                DiagnosticKind::MissingKey,
                Some(identifier.as_str()),
                format!("Key '{}' not found", key),
            );
        }

        entries.push(KeyEntry {
            key: key.to_string(),
            used,
            locales,
            value,
        });
    }
    Ok(entries)
}
