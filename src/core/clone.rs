//! Per-locale document cloning.
//!
//! For every document and locale, the document is cloned, scripts with
//! translation calls are cloned along with it and rewritten for the locale,
//! and scripts without calls stay shared between all clones. The original
//! document (and scripts only it used) is removed once every locale is done.

use std::collections::HashSet;
use std::ops::ControlFlow;

use crate::core::{
    CallSiteScanner, Diagnostics, LocalizeError, LocalizeOptions,
    extract_reachable_keys_for_locale, replace_in_script,
};
use crate::graph::{AssetGraph, AssetId, RelationId, RelationKind};
use crate::utils::insert_before_extension;

/// One locale variant of a document.
#[derive(Debug, Clone)]
pub struct LocalizedDocument {
    pub locale: String,
    pub document: AssetId,
    pub identifier: String,
    pub cloned_scripts: Vec<AssetId>,
    pub shared_scripts: Vec<AssetId>,
    pub rewritten_calls: usize,
}

/// Result for one input document.
#[derive(Debug)]
pub struct CloneOutcome {
    pub identifier: String,
    pub result: Result<Vec<LocalizedDocument>, LocalizeError>,
}

#[derive(Debug, Default)]
pub struct CloneReport {
    pub documents: Vec<CloneOutcome>,
}

impl CloneReport {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &LocalizeError)> {
        self.documents.iter().filter_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(err) => Some((outcome.identifier.as_str(), err)),
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn localized(&self) -> impl Iterator<Item = &LocalizedDocument> {
        self.documents
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .flatten()
    }
}

/// Localize each document for every locale.
///
/// Documents are independent: a failing document leaves the graph exactly
/// as it was before that document was started and is reported in its
/// outcome, and the remaining documents are still processed.
pub fn clone_for_each_locale(
    graph: &mut AssetGraph,
    documents: &[AssetId],
    locales: &[String],
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> CloneReport {
    let mut report = CloneReport::default();
    for document in documents {
        let identifier = graph
            .asset(*document)
            .map(|a| a.identifier.clone())
            .unwrap_or_else(|_| document.to_string());

        if locales.is_empty() {
            report.documents.push(CloneOutcome {
                identifier,
                result: Ok(Vec::new()),
            });
            continue;
        }

        let checkpoint = graph.clone();
        let result = localize_document(graph, *document, locales, options, diag);
        if result.is_err() {
            *graph = checkpoint;
        }
        report.documents.push(CloneOutcome { identifier, result });
    }
    report
}

fn localize_document(
    graph: &mut AssetGraph,
    document: AssetId,
    locales: &[String],
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> Result<Vec<LocalizedDocument>, LocalizeError> {
    let must_clone = scripts_with_calls(graph, document, options)?;

    let mut localized = Vec::with_capacity(locales.len());
    for locale in locales {
        localized.push(localize_for(graph, document, locale, &must_clone, options, diag)?);
    }

    graph.remove_asset(document)?;
    for script in must_clone {
        if !graph.is_referenced(script) {
            graph.remove_asset(script)?;
        }
    }
    Ok(localized)
}

/// Scripts loaded by the document (bootstrapper aside) that contain at
/// least one translation call.
fn scripts_with_calls(
    graph: &mut AssetGraph,
    document: AssetId,
    options: &LocalizeOptions,
) -> Result<HashSet<AssetId>, LocalizeError> {
    let relations = graph.outgoing(document, RelationKind::DocumentScript);
    let mut bootstrappers = 0;
    let mut targets = Vec::new();
    for id in relations {
        let Some(relation) = graph.relation(id) else {
            continue;
        };
        if relation.bootstrapper {
            bootstrappers += 1;
        } else if !targets.contains(&relation.to) {
            targets.push(relation.to);
        }
    }
    if bootstrappers > 1 {
        return Err(LocalizeError::BootstrapperCount {
            document: graph.asset(document)?.identifier.clone(),
            count: bootstrappers,
        });
    }

    graph.load_parse_trees(&targets)?;

    let scanner = CallSiteScanner::new(&options.names);
    // Malformed calls are reported when the clones are rewritten.
    let mut scratch = Diagnostics::new();
    let mut must_clone = HashSet::new();
    for script in targets {
        let Some(program) = graph.program(script) else {
            continue;
        };
        let mut found = false;
        scanner.scan_program(program, &mut scratch, |_, _| {
            found = true;
            ControlFlow::Break(())
        });
        if found {
            must_clone.insert(script);
        }
    }
    Ok(must_clone)
}

fn localize_for(
    graph: &mut AssetGraph,
    document: AssetId,
    locale: &str,
    must_clone: &HashSet<AssetId>,
    options: &LocalizeOptions,
    diag: &mut Diagnostics,
) -> Result<LocalizedDocument, LocalizeError> {
    let clone = graph.clone_asset(document, &[])?;
    let identifier = relabel(graph, clone, locale)?;

    let table = extract_reachable_keys_for_locale(graph, locale, clone, options, diag)?;

    // Scripts to clone with every relation pointing at them, so that a script
    // loaded twice by the document gets a single clone.
    let mut to_clone: Vec<(AssetId, Vec<RelationId>)> = Vec::new();
    let mut shared_scripts = Vec::new();
    for relation_id in graph.outgoing(clone, RelationKind::DocumentScript) {
        let Some(relation) = graph.relation(relation_id) else {
            continue;
        };
        let target = relation.to;
        if relation.bootstrapper || !must_clone.contains(&target) {
            shared_scripts.push(target);
            continue;
        }
        match to_clone.iter_mut().find(|(source, _)| *source == target) {
            Some((_, relations)) => relations.push(relation_id),
            None => to_clone.push((target, vec![relation_id])),
        }
    }

    let mut cloned_scripts = Vec::new();
    let mut rewritten_calls = 0;
    for (target, relations) in to_clone {
        let script = graph.clone_asset(target, &relations)?;
        relabel(graph, script, locale)?;
        rewritten_calls += replace_in_script(
            graph,
            script,
            &table,
            Some(locale),
            &options.default_language,
            &options.names,
            diag,
        )?;
        cloned_scripts.push(script);
    }

    let asset = graph.asset_mut(clone)?;
    if let Some(doc) = asset.as_document_mut() {
        doc.lang = Some(locale.to_string());
    }
    asset.mark_dirty();

    Ok(LocalizedDocument {
        locale: locale.to_string(),
        document: clone,
        identifier,
        cloned_scripts,
        shared_scripts,
        rewritten_calls,
    })
}

/// Give a clone the locale-tagged identifier of its original.
fn relabel(graph: &mut AssetGraph, id: AssetId, locale: &str) -> Result<String, LocalizeError> {
    let wanted = insert_before_extension(&graph.asset(id)?.identifier, locale);
    let identifier = graph.unique_identifier(&wanted);
    graph.asset_mut(id)?.identifier = identifier.clone();
    Ok(identifier)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::synth::as_string_literal;
    use crate::graph::AssetKind;
    use crate::graph::testing::GraphBuilder;

    fn identifiers(graph: &AssetGraph) -> Vec<String> {
        let mut ids: Vec<String> = graph.assets().map(|(_, a)| a.identifier.clone()).collect();
        ids.sort();
        ids
    }

    fn locales(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_script_loaded_twice_is_cloned_once() {
        let mut b = GraphBuilder::new();
        let doc = b.document("index.html", "<html></html>");
        let main = b.script("main.js", r#"one.tr("greet");"#);
        b.link_script(doc, main);
        b.link_script(doc, main);
        let mut graph = b.build();

        let mut diag = Diagnostics::new();
        let report = clone_for_each_locale(
            &mut graph,
            &[doc],
            &locales(&["da"]),
            &LocalizeOptions::default(),
            &mut diag,
        );

        assert!(!report.has_failures());
        assert_eq!(identifiers(&graph), vec!["index.da.html", "main.da.js"]);
        let da = report.localized().next().unwrap();
        assert_eq!(da.cloned_scripts.len(), 1);
        let edges = graph.outgoing(da.document, RelationKind::DocumentScript);
        assert_eq!(edges.len(), 2);
        for edge in edges {
            assert_eq!(graph.relation(edge).unwrap().to, da.cloned_scripts[0]);
        }
        assert!(graph.asset(main).is_err());
    }

    #[test]
    fn test_clones_per_locale_and_collects_garbage() {
        let mut b = GraphBuilder::new();
        let doc = b.document("index.html", "<html></html>");
        let boot = b.script("boot.js", r#"one.tr("never");"#);
        let main = b.script("main.js", r#"one.tr("greet");"#);
        let lib = b.script("lib.js", "var x = 1;");
        let res = b.resource("main.i18n", r#"{"greet": {"en": "Hello", "da": "Hej"}}"#);
        b.link_bootstrapper(doc, boot);
        b.link_script(doc, lib);
        b.link_script(doc, main);
        b.include(main, res);
        let mut graph = b.build();

        let mut diag = Diagnostics::new();
        let report = clone_for_each_locale(
            &mut graph,
            &[doc],
            &locales(&["en", "da"]),
            &LocalizeOptions::default(),
            &mut diag,
        );

        assert!(!report.has_failures());
        assert!(diag.is_empty());
        assert_eq!(
            identifiers(&graph),
            vec![
                "boot.js",
                "index.da.html",
                "index.en.html",
                "lib.js",
                "main.da.js",
                "main.en.js",
                "main.i18n",
            ]
        );

        let variants: Vec<&LocalizedDocument> = report.localized().collect();
        assert_eq!(variants.len(), 2);
        let da = variants.iter().find(|v| v.locale == "da").unwrap();
        assert_eq!(da.identifier, "index.da.html");
        assert_eq!(da.rewritten_calls, 1);
        assert_eq!(da.shared_scripts, vec![boot, lib]);
        assert_eq!(da.cloned_scripts.len(), 1);

        let script = graph.asset(da.cloned_scripts[0]).unwrap().as_script().unwrap();
        assert_eq!(script.splices.len(), 1);
        assert_eq!(as_string_literal(&script.splices[0].replacement), Some("Hej"));

        // The cloned script keeps its include of the shared resource.
        let includes = graph.outgoing(da.cloned_scripts[0], RelationKind::ScriptInclude);
        assert_eq!(graph.relation(includes[0]).unwrap().to, res);

        let clone = graph.asset(da.document).unwrap();
        assert!(clone.dirty);
        let crate::graph::AssetBody::Document(body) = &clone.body else {
            panic!("expected document");
        };
        assert_eq!(body.lang.as_deref(), Some("da"));
        assert!(graph.asset(doc).is_err());
        assert!(graph.asset(main).is_err());
    }

    #[test]
    fn test_document_without_calls_shares_every_script() {
        let mut b = GraphBuilder::new();
        let doc = b.document("page.html", "");
        let a = b.script("a.js", "var a;");
        let c = b.script("c.js", "var c;");
        b.link_script(doc, a);
        b.link_script(doc, c);
        let mut graph = b.build();

        let mut diag = Diagnostics::new();
        let report = clone_for_each_locale(
            &mut graph,
            &[doc],
            &locales(&["fr"]),
            &LocalizeOptions::default(),
            &mut diag,
        );

        let variant = report.localized().next().unwrap();
        assert!(variant.cloned_scripts.is_empty());
        assert_eq!(variant.shared_scripts, vec![a, c]);
        assert_eq!(identifiers(&graph), vec!["a.js", "c.js", "page.fr.html"]);
    }

    #[test]
    fn test_missing_value_uses_marker() {
        let mut b = GraphBuilder::new();
        let doc = b.document("index.html", "");
        let main = b.script("main.js", r#"x = one.tr("greet");"#);
        let res = b.resource("main.i18n", r#"{"greet": {"en": "Hi"}}"#);
        b.link_script(doc, main);
        b.include(main, res);
        let mut graph = b.build();

        let mut diag = Diagnostics::new();
        let report = clone_for_each_locale(
            &mut graph,
            &[doc],
            &locales(&["fr"]),
            &LocalizeOptions::default(),
            &mut diag,
        );
        let variant = report.localized().next().unwrap();
        let script = graph.asset(variant.cloned_scripts[0]).unwrap().as_script().unwrap();
        assert_eq!(
            as_string_literal(&script.splices[0].replacement),
            Some("[!greet!]")
        );
        assert_eq!(diag.count(crate::core::DiagnosticKind::MissingLocaleValue), 1);
        assert_eq!(diag.count(crate::core::DiagnosticKind::MissingKey), 1);
    }

    #[test]
    fn test_failed_document_restores_graph() {
        let mut b = GraphBuilder::new();
        let bad = b.document("bad.html", "");
        let good = b.document("good.html", "");
        let boot_a = b.script("a.js", "");
        let boot_b = b.script("b.js", "");
        let main = b.script("main.js", r#"one.tr("k");"#);
        b.link_bootstrapper(bad, boot_a);
        b.link_bootstrapper(bad, boot_b);
        b.link_script(bad, main);
        b.link_script(good, main);
        let mut graph = b.build();
        let before = identifiers(&graph);

        let mut diag = Diagnostics::new();
        let report = clone_for_each_locale(
            &mut graph,
            &[bad],
            &locales(&["da"]),
            &LocalizeOptions::default(),
            &mut diag,
        );
        let (identifier, err) = report.failures().next().unwrap();
        assert_eq!(identifier, "bad.html");
        assert!(matches!(
            err,
            LocalizeError::BootstrapperCount { count: 2, .. }
        ));
        assert_eq!(identifiers(&graph), before);
        assert_eq!(graph.relations().count(), 4);

        // The other document still localizes; main.js stays for bad.html.
        let report = clone_for_each_locale(
            &mut graph,
            &[good],
            &locales(&["da"]),
            &LocalizeOptions::default(),
            &mut diag,
        );
        assert!(!report.has_failures());
        assert!(graph.asset(main).is_ok());
        assert!(graph.find_by_identifier("main.da.js").is_some());
    }

    #[test]
    fn test_duplicate_key_fails_only_that_document() {
        let mut b = GraphBuilder::new();
        let doc = b.document("index.html", "");
        let main = b.script("main.js", r#"one.tr("k");"#);
        let r1 = b.resource("one.i18n", r#"{"k": {"en": "1"}}"#);
        let r2 = b.resource("two.i18n", r#"{"k": {"en": "2"}}"#);
        b.link_script(doc, main);
        b.include(main, r1);
        b.include(main, r2);
        let mut graph = b.build();
        let before = identifiers(&graph);

        let mut diag = Diagnostics::new();
        let report = clone_for_each_locale(
            &mut graph,
            &[doc],
            &locales(&["en"]),
            &LocalizeOptions::default(),
            &mut diag,
        );
        assert!(matches!(
            report.failures().next(),
            Some((_, LocalizeError::DuplicateKey { .. }))
        ));
        assert_eq!(identifiers(&graph), before);
    }

    #[test]
    fn test_no_locales_leaves_document_untouched() {
        let mut b = GraphBuilder::new();
        let doc = b.document("index.html", "");
        let main = b.script("main.js", r#"one.tr("k");"#);
        b.link_script(doc, main);
        let mut graph = b.build();

        let mut diag = Diagnostics::new();
        let report =
            clone_for_each_locale(&mut graph, &[doc], &[], &LocalizeOptions::default(), &mut diag);
        assert!(!report.has_failures());
        assert_eq!(report.localized().count(), 0);
        assert_eq!(identifiers(&graph), vec!["index.html", "main.js"]);
        assert_eq!(
            graph.find_assets(|_, a| a.kind() == AssetKind::Document).len(),
            1
        );
    }
}
