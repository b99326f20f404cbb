//! Call-site rewriting for one locale.

use std::ops::ControlFlow;

use serde_json::Value;
use swc_ecma_ast::Expr;

use crate::core::pattern::{compile_pattern, compile_pattern_function, tokenize_pattern};
use crate::core::synth::{as_string_literal, string_literal, value_to_expr};
use crate::core::{
    CallKind, CallNames, CallSiteMut, CallSiteScanner, DefaultLanguagePolicy, DiagnosticKind,
    Diagnostics, FlatKeyTable, LocalizeError,
};
use crate::graph::{AssetGraph, AssetId, Script, Splice};

/// What a call site resolves to before its shape is taken into account.
enum Resolved<'v> {
    Value(&'v Value),
    Fallback(Expr),
    Marker(String),
}

/// Rewrites translation call sites with the values of one locale.
#[derive(Debug, Clone, Copy)]
pub struct Replacer<'a> {
    table: &'a FlatKeyTable,
    locale: Option<&'a str>,
    policy: &'a DefaultLanguagePolicy,
    origin: Option<&'a str>,
}

impl<'a> Replacer<'a> {
    pub fn new(
        table: &'a FlatKeyTable,
        locale: Option<&'a str>,
        policy: &'a DefaultLanguagePolicy,
    ) -> Self {
        Self {
            table,
            locale,
            policy,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: &'a str) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Rewrite one call site in place.
    ///
    /// Returns the splice when the node was replaced; pattern calls whose
    /// value is not a string are reported and left alone.
    pub fn replace(&self, site: &mut CallSiteMut<'_>, diag: &mut Diagnostics) -> Option<Splice> {
        let resolved = self.resolve(site, diag);

        let replacement = match site.kind {
            CallKind::Direct => match resolved {
                Resolved::Value(value) => value_to_expr(value),
                Resolved::Fallback(expr) => expr,
                Resolved::Marker(marker) => string_literal(&marker),
            },
            CallKind::PatternInvocation | CallKind::PatternReference => {
                let pattern = match &resolved {
                    Resolved::Value(Value::String(text)) => Some(text.as_str()),
                    Resolved::Value(_) => None,
                    Resolved::Fallback(expr) => as_string_literal(expr),
                    Resolved::Marker(marker) => Some(marker.as_str()),
                };
                let Some(pattern) = pattern else {
                    diag.warn_in(
                        DiagnosticKind::InvalidPatternValue,
                        self.origin,
                        format!(
                            "The value of the key '{}' is not a string, cannot compile it as a pattern",
                            site.key
                        ),
                    );
                    return None;
                };
                let tokens = tokenize_pattern(pattern);
                if site.kind == CallKind::PatternInvocation {
                    compile_pattern(&tokens, &site.arguments())
                } else {
                    compile_pattern_function(&tokens)
                }
            }
        };

        Some(site.splice(replacement))
    }

    /// A `null` value counts as missing.
    fn resolve(&self, site: &CallSiteMut<'_>, diag: &mut Diagnostics) -> Resolved<'a> {
        if let Some(value) = self.table.get(&site.key).filter(|value| !value.is_null()) {
            return Resolved::Value(value);
        }

        let fallback = site.fallback().cloned();
        let suppressed =
            fallback.is_some() && self.locale.is_some_and(|locale| self.policy.matches(locale));
        if !suppressed {
            let message = match self.locale {
                Some(locale) => format!("Key '{}' has no value for locale {}", site.key, locale),
                None => format!("Key '{}' not found", site.key),
            };
            diag.warn_in(DiagnosticKind::MissingKey, self.origin, message);
        }

        match fallback {
            Some(expr) => Resolved::Fallback(expr),
            None => Resolved::Marker(format!("[!{}!]", site.key)),
        }
    }

    /// Rewrite every call site of a parsed script, recording the splices.
    /// Returns the number of rewritten call sites.
    pub fn rewrite_script(
        &self,
        script: &mut Script,
        names: &CallNames,
        diag: &mut Diagnostics,
    ) -> usize {
        let Script { tree, splices, .. } = script;
        let Some(tree) = tree.as_mut() else {
            return 0;
        };

        let mut scanner = CallSiteScanner::new(names);
        if let Some(origin) = self.origin {
            scanner = scanner.with_origin(origin);
        }

        let mut count = 0;
        scanner.scan_program_mut(&mut tree.program, diag, |mut site, diag| {
            if let Some(splice) = self.replace(&mut site, diag) {
                splices.push(splice);
                count += 1;
            }
            ControlFlow::Continue(())
        });
        count
    }
}

/// Parse (if needed) and rewrite one script asset, marking it dirty.
pub fn replace_in_script(
    graph: &mut AssetGraph,
    id: AssetId,
    table: &FlatKeyTable,
    locale: Option<&str>,
    policy: &DefaultLanguagePolicy,
    names: &CallNames,
    diag: &mut Diagnostics,
) -> Result<usize, LocalizeError> {
    graph.load_parse_trees(&[id])?;
    let asset = graph.asset_mut(id)?;
    let identifier = asset.identifier.clone();
    let count = match asset.as_script_mut() {
        Some(script) => Replacer::new(table, locale, policy)
            .with_origin(&identifier)
            .rewrite_script(script, names, diag),
        None => 0,
    };
    asset.mark_dirty();
    Ok(count)
}
