//! Populate an [`AssetGraph`] from a project directory.
//!
//! Documents are found by walking the root with the configured globs. Every
//! local `<script src>` of a document becomes a script asset, and every
//! `ns.include("...")` call of a loaded script pulls in the script or
//! translation resource it names, transitively.

use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

use crate::config::Config;
use crate::core::parsers::document::find_script_references;
use crate::core::scan::collect_includes;
use crate::core::{DiagnosticKind, Diagnostics, LocalizeError, LocalizeOptions};
use crate::graph::{Asset, AssetGraph, AssetId, AssetKind, Relation, RelationKind, RelationLocation};
use crate::utils::{is_remote, resolve_reference};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning for documents.
pub struct ScanResult {
    /// Document identifiers, sorted.
    pub files: BTreeSet<String>,
    pub skipped_count: usize,
}

/// Find the documents under `root` matching `config.documents`.
///
/// The output directory is always skipped so that earlier build results are
/// not localized again.
pub fn scan_documents(root: &Path, config: &Config, verbose: bool) -> ScanResult {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = vec![root.join(&config.output_dir)];
    let mut ignore_patterns: Vec<Pattern> = Vec::new();
    for p in &config.ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => ignore_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(root.join(p));
        }
    }

    let document_patterns: Vec<Pattern> = config
        .documents
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !literal_ignore_paths.iter().any(|p| e.path().starts_with(p)));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!("{} {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(identifier) = identifier_for(root, entry.path()) else {
            continue;
        };
        if ignore_patterns.iter().any(|p| p.matches(&identifier)) {
            continue;
        }
        if document_patterns.iter().any(|p| p.matches(&identifier)) {
            files.insert(identifier);
        }
    }

    ScanResult {
        files,
        skipped_count,
    }
}

/// Root-relative, `/`-separated identifier of a path under `root`.
fn identifier_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Read an asset's text, dropping a leading byte order mark.
fn read_asset_text(root: &Path, identifier: &str) -> Result<String, LocalizeError> {
    let text =
        fs::read_to_string(root.join(identifier)).map_err(|source| LocalizeError::Io {
            identifier: identifier.to_string(),
            source,
        })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// A loaded project: its configuration and the asset graph built from disk.
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub graph: AssetGraph,
    /// The scanned documents, in identifier order.
    pub documents: Vec<AssetId>,
    pub skipped_count: usize,
}

impl Project {
    /// Scan `root` for documents and load everything they reference.
    ///
    /// Unreadable documents are fatal. Missing scripts and resources are
    /// reported as `UnresolvedReference` and left out of the graph.
    pub fn load(
        root: &Path,
        config: Config,
        verbose: bool,
        diag: &mut Diagnostics,
    ) -> Result<Self> {
        let scan = scan_documents(root, &config, verbose);
        let options = config.localize_options();

        let mut loader = Loader {
            root,
            config: &config,
            options: &options,
            graph: AssetGraph::new(),
            by_identifier: HashMap::new(),
            pending: VecDeque::new(),
        };

        let mut documents = Vec::with_capacity(scan.files.len());
        for identifier in &scan.files {
            documents.push(loader.load_document(identifier, diag)?);
        }
        loader.follow_includes(diag);

        let graph = loader.graph;
        Ok(Self {
            root: root.to_path_buf(),
            config,
            graph,
            documents,
            skipped_count: scan.skipped_count,
        })
    }

    pub fn options(&self) -> LocalizeOptions {
        self.config.localize_options()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    /// Scripts and resources that were pulled in, excluding documents.
    pub fn linked_asset_count(&self) -> usize {
        self.graph
            .assets()
            .filter(|(_, a)| a.kind() != AssetKind::Document)
            .count()
    }
}

struct Loader<'a> {
    root: &'a Path,
    config: &'a Config,
    options: &'a LocalizeOptions,
    graph: AssetGraph,
    by_identifier: HashMap<String, AssetId>,
    /// Scripts whose includes have not been followed yet.
    pending: VecDeque<AssetId>,
}

impl Loader<'_> {
    fn load_document(&mut self, identifier: &str, diag: &mut Diagnostics) -> Result<AssetId> {
        let text = read_asset_text(self.root, identifier)?;
        let references = find_script_references(&text, &self.config.bootstrapper_id);

        let document = self.graph.add_asset(Asset::document(identifier, text));
        self.by_identifier.insert(identifier.to_string(), document);

        for reference in references {
            if is_remote(&reference.src) {
                continue;
            }
            let Some(target) = resolve_reference(identifier, &reference.src) else {
                diag.warn_in(
                    DiagnosticKind::UnresolvedReference,
                    Some(identifier),
                    format!("Cannot resolve script reference '{}'", reference.src),
                );
                continue;
            };
            let Some(script) = self.load_asset(&target, AssetKind::Script, identifier, diag)
            else {
                continue;
            };

            let relation = Relation::new(
                RelationKind::DocumentScript,
                document,
                script,
                RelationLocation::Attribute(reference.src_range),
            );
            self.graph.add_relation(if reference.bootstrapper {
                relation.bootstrapper()
            } else {
                relation
            });
        }
        Ok(document)
    }

    /// The asset for `identifier`, reading it from disk the first time.
    fn load_asset(
        &mut self,
        identifier: &str,
        kind: AssetKind,
        referrer: &str,
        diag: &mut Diagnostics,
    ) -> Option<AssetId> {
        if let Some(id) = self.by_identifier.get(identifier) {
            return Some(*id);
        }

        let text = match read_asset_text(self.root, identifier) {
            Ok(text) => text,
            Err(err) => {
                diag.warn_in(
                    DiagnosticKind::UnresolvedReference,
                    Some(referrer),
                    err.to_string(),
                );
                return None;
            }
        };

        let asset = match kind {
            AssetKind::Document => Asset::document(identifier, text),
            AssetKind::Script => Asset::script(identifier, text),
            AssetKind::Resource => Asset::resource(identifier, text),
        };
        let id = self.graph.add_asset(asset);
        self.by_identifier.insert(identifier.to_string(), id);
        if kind == AssetKind::Script {
            self.pending.push_back(id);
        }
        Some(id)
    }

    /// Follow `include` calls breadth first until no new scripts appear.
    fn follow_includes(&mut self, diag: &mut Diagnostics) {
        while !self.pending.is_empty() {
            let batch: Vec<AssetId> = self.pending.drain(..).collect();
            if self.graph.load_parse_trees(&batch).is_err() {
                // Parse the good ones and report the broken ones, which stay
                // unparsed and fail again when a document using them is
                // localized.
                for id in &batch {
                    if let Err(err) = self.graph.load_parse_trees(&[*id]) {
                        let identifier =
                            self.graph.asset(*id).map(|a| a.identifier.clone()).ok();
                        diag.warn_in(
                            DiagnosticKind::ParseFailure,
                            identifier.as_deref(),
                            err.to_string(),
                        );
                    }
                }
            }

            for script in batch {
                self.link_includes(script, diag);
            }
        }
    }

    fn link_includes(&mut self, script: AssetId, diag: &mut Diagnostics) {
        let Some(program) = self.graph.program(script) else {
            return;
        };
        let includes = collect_includes(program, &self.options.names);
        let Ok(identifier) = self.graph.asset(script).map(|a| a.identifier.clone()) else {
            return;
        };

        for (path, span) in includes {
            let Some(target) = resolve_reference(&identifier, &path) else {
                diag.warn_in(
                    DiagnosticKind::UnresolvedReference,
                    Some(identifier.as_str()),
                    format!("Cannot resolve include '{}'", path),
                );
                continue;
            };
            let kind = if target.ends_with(&self.options.resource_suffix) {
                AssetKind::Resource
            } else {
                AssetKind::Script
            };
            if let Some(to) = self.load_asset(&target, kind, &identifier, diag) {
                self.graph.add_relation(Relation::new(
                    RelationKind::ScriptInclude,
                    script,
                    to,
                    RelationLocation::Call(span),
                ));
            }
        }
    }
}
