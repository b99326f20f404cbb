//! Turning assets back into text.
//!
//! Scripts are not reprinted from their trees. The original text is kept and
//! only the recorded splices are applied, so formatting and comments outside
//! rewritten call sites survive unchanged. Replacement nodes that still carry
//! a source span (fallbacks and operands written by the author) are copied
//! from the source, synthesized nodes are printed.

use swc_common::Spanned;
use swc_ecma_ast::{BinaryOp, Expr, Lit, Pat, Prop, PropName, PropOrSpread, Stmt};

use crate::core::CallNames;
use crate::core::LocalizeError;
use crate::core::parsers::document::{document_lang, set_document_lang};
use crate::core::parsers::resource::render_resource;
use crate::graph::{
    AssetBody, AssetGraph, AssetId, RelationKind, RelationLocation, Script,
};
use crate::utils::{relative_reference, resolve_reference};

/// Current text of an asset.
pub fn render_asset(
    graph: &AssetGraph,
    id: AssetId,
    names: &CallNames,
) -> Result<String, LocalizeError> {
    let asset = graph.asset(id)?;
    match &asset.body {
        AssetBody::Document(document) => {
            let mut edits = Vec::new();
            for relation_id in graph.outgoing(id, RelationKind::DocumentScript) {
                let Some(relation) = graph.relation(relation_id) else {
                    continue;
                };
                let RelationLocation::Attribute(range) = &relation.location else {
                    continue;
                };
                let Some(written) = document.text.get(range.clone()) else {
                    continue;
                };
                let target = &graph.asset(relation.to)?.identifier;
                if resolve_reference(&asset.identifier, written).as_deref() != Some(target.as_str()) {
                    edits.push((range.clone(), relative_reference(&asset.identifier, target)));
                }
            }

            let mut text = document.text.clone();
            edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
            for (range, href) in edits {
                text.replace_range(range, &href);
            }
            if let Some(lang) = &document.lang
                && document_lang(&text).as_deref() != Some(lang.as_str())
            {
                text = set_document_lang(&text, lang);
            }
            Ok(text)
        }
        AssetBody::Script(script) => {
            let mut prelude = String::new();
            for relation_id in graph.outgoing(id, RelationKind::ScriptInclude) {
                let Some(relation) = graph.relation(relation_id) else {
                    continue;
                };
                if relation.location != RelationLocation::Synthesized {
                    continue;
                }
                let target = &graph.asset(relation.to)?.identifier;
                let path = relative_reference(&asset.identifier, target);
                prelude.push_str(&format!(
                    "{}.{}({});\n",
                    names.namespace,
                    names.include,
                    string_literal(&path)
                ));
            }
            prelude.push_str(&render_script(script));
            Ok(prelude)
        }
        AssetBody::Resource(resource) => Ok(match &resource.table {
            Some(table) if asset.dirty => render_resource(table),
            _ => resource.text.clone(),
        }),
    }
}

/// Script text with every recorded splice applied.
pub fn render_script(script: &Script) -> String {
    let Some(tree) = &script.tree else {
        return script.text.clone();
    };
    let splices = script
        .splices
        .iter()
        .filter(|s| !s.span.is_dummy())
        .map(|s| SpliceRange {
            start: tree.offset(s.span.lo),
            end: tree.offset(s.span.hi),
            replacement: &s.replacement,
        })
        .filter(|s| s.start <= s.end && s.end <= script.text.len())
        .collect();

    let printer = Printer {
        text: &script.text,
        start_pos: tree.start_pos.0,
        splices,
    };
    printer.render_range(0, script.text.len())
}

struct SpliceRange<'s> {
    start: usize,
    end: usize,
    replacement: &'s Expr,
}

struct Printer<'s> {
    text: &'s str,
    start_pos: u32,
    splices: Vec<SpliceRange<'s>>,
}

impl Printer<'_> {
    /// Source text of `start..end` with the outermost splices inside it
    /// applied.
    fn render_range(&self, start: usize, end: usize) -> String {
        let mut inside: Vec<&SpliceRange> = self
            .splices
            .iter()
            .filter(|s| s.start >= start && s.end <= end && (s.start, s.end) != (start, end))
            .collect();
        inside.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));

        let mut out = String::new();
        let mut cursor = start;
        for splice in inside {
            if splice.start < cursor {
                // Nested in a splice already applied.
                continue;
            }
            out.push_str(&self.text[cursor..splice.start]);
            let printed = self.print(splice.replacement);
            let accessed = continues_with_access(&self.text[splice.end..end]);
            if needs_parens_in_place(splice.replacement, accessed) {
                out.push('(');
                out.push_str(&printed);
                out.push(')');
            } else {
                out.push_str(&printed);
            }
            cursor = splice.end;
        }
        out.push_str(&self.text[cursor..end]);
        out
    }

    fn print(&self, expr: &Expr) -> String {
        let span = expr.span();
        if !span.is_dummy() {
            let start = (span.lo.0 - self.start_pos) as usize;
            let end = (span.hi.0 - self.start_pos) as usize;
            if start <= end && end <= self.text.len() {
                return self.render_range(start, end);
            }
        }

        match expr {
            Expr::Lit(Lit::Str(s)) => string_literal(&s.value.to_string_lossy()),
            Expr::Lit(Lit::Num(n)) => number_literal(n.value),
            Expr::Lit(Lit::Bool(b)) => b.value.to_string(),
            Expr::Lit(Lit::Null(_)) => "null".to_string(),
            Expr::Ident(ident) => ident.sym.to_string(),
            Expr::Paren(paren) => format!("({})", self.print(&paren.expr)),
            Expr::Array(array) => {
                let items: Vec<String> = array
                    .elems
                    .iter()
                    .map(|item| match item {
                        Some(item) => self.print(&item.expr),
                        None => String::new(),
                    })
                    .collect();
                format!("[{}]", items.join(", "))
            }
            Expr::Object(object) => {
                let props: Vec<String> = object
                    .props
                    .iter()
                    .filter_map(|prop| match prop {
                        PropOrSpread::Prop(prop) => match &**prop {
                            Prop::KeyValue(kv) => Some(kv),
                            _ => None,
                        },
                        PropOrSpread::Spread(_) => None,
                    })
                    .map(|kv| {
                        let key = match &kv.key {
                            PropName::Str(s) => string_literal(&s.value.to_string_lossy()),
                            PropName::Ident(ident) => ident.sym.to_string(),
                            other => string_literal(&format!("{:?}", other)),
                        };
                        format!("{}: {}", key, self.print(&kv.value))
                    })
                    .collect();
                format!("{{{}}}", props.join(", "))
            }
            Expr::Bin(bin) => {
                let left = self.print_operand(&bin.left, bin.op, false);
                let right = self.print_operand(&bin.right, bin.op, true);
                format!("{} {} {}", left, bin.op.as_str(), right)
            }
            Expr::Fn(fn_expr) => {
                let params: Vec<String> = fn_expr
                    .function
                    .params
                    .iter()
                    .filter_map(|param| match &param.pat {
                        Pat::Ident(binding) => Some(binding.id.sym.to_string()),
                        _ => None,
                    })
                    .collect();
                let body = fn_expr
                    .function
                    .body
                    .iter()
                    .flat_map(|block| &block.stmts)
                    .filter_map(|stmt| match stmt {
                        Stmt::Return(ret) => Some(match &ret.arg {
                            Some(arg) => format!(" return {};", self.print(arg)),
                            None => " return;".to_string(),
                        }),
                        _ => None,
                    })
                    .collect::<String>();
                format!("function ({}) {{{} }}", params.join(", "), body)
            }
            // Nothing else is ever synthesized.
            _ => "undefined".to_string(),
        }
    }

    fn print_operand(&self, operand: &Expr, parent: BinaryOp, right: bool) -> String {
        let printed = self.print(operand);
        let wrap = match operand {
            Expr::Bin(child) => {
                child.op.precedence() < parent.precedence()
                    || (right && child.op.precedence() == parent.precedence())
            }
            Expr::Cond(_) | Expr::Seq(_) | Expr::Assign(_) | Expr::Arrow(_) | Expr::Yield(_) => {
                true
            }
            _ => false,
        };
        if wrap { format!("({})", printed) } else { printed }
    }
}

/// Whether the source following a call makes it the object of a member
/// access, a call or a tagged template.
fn continues_with_access(rest: &str) -> bool {
    let rest = rest.trim_start();
    rest.starts_with(['.', '[', '(', '`']) || rest.starts_with("?.")
}

/// Whether a replacement standing where a call expression was needs
/// parentheses to parse the same way. `accessed` is set when the call was
/// the object of a member access or call.
fn needs_parens_in_place(expr: &Expr, accessed: bool) -> bool {
    match expr {
        Expr::Lit(Lit::Num(n)) => accessed || n.value.is_sign_negative(),
        Expr::New(new) => accessed && new.args.is_none(),
        Expr::Bin(_)
        | Expr::Fn(_)
        | Expr::Object(_)
        | Expr::Cond(_)
        | Expr::Seq(_)
        | Expr::Assign(_)
        | Expr::Arrow(_)
        | Expr::Unary(_)
        | Expr::Yield(_)
        | Expr::Await(_)
        | Expr::Update(_) => true,
        _ => false,
    }
}

fn string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn number_literal(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::core::parsers::script::parse_script;
    use crate::core::{DefaultLanguagePolicy, Diagnostics, FlatKeyTable, replace_in_script};
    use crate::graph::testing::GraphBuilder;
    use crate::graph::{Asset, Relation};

    fn rewritten(code: &str, entries: &[(&str, Value)], locale: &str) -> String {
        let mut b = GraphBuilder::new();
        let id = b.script("main.js", code);
        let mut graph = b.build();
        let table: FlatKeyTable = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let mut diag = Diagnostics::new();
        replace_in_script(
            &mut graph,
            id,
            &table,
            Some(locale),
            &DefaultLanguagePolicy::disabled(),
            &CallNames::default(),
            &mut diag,
        )
        .unwrap();
        render_asset(&graph, id, &CallNames::default()).unwrap()
    }

    #[test]
    fn test_untouched_script_is_unchanged() {
        let code = "// leading comment\nvar  a = 1;\n";
        assert_eq!(rewritten(code, &[], "en"), code);
    }

    #[test]
    fn test_direct_call_replaced_in_place() {
        assert_eq!(
            rewritten(
                "// hi\nvar a = one.tr(\"greet\"); // trailing\n",
                &[("greet", json!("Hello \"you\""))],
                "en"
            ),
            "// hi\nvar a = \"Hello \\\"you\\\"\"; // trailing\n"
        );
    }

    #[test]
    fn test_pattern_invocation_concatenates() {
        assert_eq!(
            rewritten(
                "x = one.trPattern('greet')(user.name);",
                &[("greet", json!("Hi {0}!"))],
                "en"
            ),
            "x = (\"Hi \" + user.name + \"!\");"
        );
    }

    #[test]
    fn test_low_precedence_operand_is_wrapped() {
        assert_eq!(
            rewritten(
                "x = one.trPattern('greet')(a || b);",
                &[("greet", json!("Hi {0}"))],
                "en"
            ),
            "x = (\"Hi \" + (a || b));"
        );
    }

    #[test]
    fn test_pattern_reference_becomes_function() {
        assert_eq!(
            rewritten(
                "var f = one.trPattern(\"k\");",
                &[("k", json!("{0} and {1}"))],
                "en"
            ),
            "var f = (function (a0, a1) { return a0 + \" and \" + a1; });"
        );
    }

    #[test]
    fn test_fallback_with_nested_call() {
        assert_eq!(
            rewritten(
                "one.tr('outer', prefix + one.tr('inner'));",
                &[("inner", json!("Inner"))],
                "fr"
            ),
            "(prefix + \"Inner\");"
        );
    }

    #[test]
    fn test_operand_with_nested_call() {
        assert_eq!(
            rewritten(
                "say(one.trPattern('p')(one.tr('n')));",
                &[("p", json!("Count: {0}")), ("n", json!(5))],
                "en"
            ),
            "say((\"Count: \" + 5));"
        );
    }

    #[test]
    fn test_number_used_as_member_object_is_wrapped() {
        let out = rewritten("x = one.tr('n').toFixed(2);", &[("n", json!(5))], "en");
        assert_eq!(out, "x = (5).toFixed(2);");
        assert!(parse_script(&out, "main.js").is_ok());

        let out = rewritten("x = one.tr('n') ;", &[("n", json!(5))], "en");
        assert_eq!(out, "x = 5 ;");
    }

    #[test]
    fn test_new_without_arguments_used_as_callee_is_wrapped() {
        let out = rewritten("x = one.tr('d', new Date)();", &[], "fr");
        assert_eq!(out, "x = (new Date)();");
        assert!(parse_script(&out, "main.js").is_ok());

        let out = rewritten("x = one.tr('d', new Date).getTime();", &[], "fr");
        assert_eq!(out, "x = (new Date).getTime();");
        assert!(parse_script(&out, "main.js").is_ok());
    }

    #[test]
    fn test_structured_values() {
        assert_eq!(
            rewritten(
                "cfg = one.tr('obj'); list = one.tr('arr'); off = one.tr('flag');",
                &[
                    ("obj", json!({"a": 1, "b": [true, null]})),
                    ("arr", json!(["x", 2.5])),
                    ("flag", json!(false)),
                ],
                "en"
            ),
            "cfg = ({\"a\": 1, \"b\": [true, null]}); list = [\"x\", 2.5]; off = false;"
        );
    }

    #[test]
    fn test_missing_key_marker() {
        assert_eq!(
            rewritten("alert(one.tr('greet'));", &[], "fr"),
            "alert(\"[!greet!]\");"
        );
    }

    #[test]
    fn test_synthesized_include_prelude() {
        let mut b = GraphBuilder::new();
        let script = b.script("js/app.js", "run();\n");
        let res = b.resource("js/app.i18n", "");
        let mut graph = b.build();
        graph.add_relation(Relation::new(
            RelationKind::ScriptInclude,
            script,
            res,
            RelationLocation::Synthesized,
        ));
        assert_eq!(
            render_asset(&graph, script, &CallNames::default()).unwrap(),
            "one.include(\"app.i18n\");\nrun();\n"
        );
    }

    #[test]
    fn test_document_src_and_lang() {
        let html = r#"<html><head><script src="main.js"></script><script src="lib.js"></script></head></html>"#;
        let start = html.find("main.js").unwrap();
        let lib_start = html.find("lib.js").unwrap();

        let mut graph = crate::graph::AssetGraph::new();
        let mut asset = Asset::document("index.da.html", html);
        if let Some(document) = asset.as_document_mut() {
            document.lang = Some("da".to_string());
        }
        let doc = graph.add_asset(asset);
        let main = graph.add_asset(Asset::script("main.da.js", ""));
        let lib = graph.add_asset(Asset::script("lib.js", ""));
        graph.add_relation(Relation::new(
            RelationKind::DocumentScript,
            doc,
            main,
            RelationLocation::Attribute(start..start + "main.js".len()),
        ));
        graph.add_relation(Relation::new(
            RelationKind::DocumentScript,
            doc,
            lib,
            RelationLocation::Attribute(lib_start..lib_start + "lib.js".len()),
        ));

        assert_eq!(
            render_asset(&graph, doc, &CallNames::default()).unwrap(),
            r#"<html lang="da"><head><script src="main.da.js"></script><script src="lib.js"></script></head></html>"#
        );
    }

    #[test]
    fn test_resource_rendered_when_dirty() {
        let mut b = GraphBuilder::new();
        let res = b.resource("a.i18n", "{\"k\":{\"en\":\"v\"}}");
        let mut graph = b.build();
        graph.load_parse_trees(&[res]).unwrap();
        assert_eq!(
            render_asset(&graph, res, &CallNames::default()).unwrap(),
            "{\"k\":{\"en\":\"v\"}}"
        );

        graph.asset_mut(res).unwrap().mark_dirty();
        assert_eq!(
            render_asset(&graph, res, &CallNames::default()).unwrap(),
            "{\n  \"k\": {\n    \"en\": \"v\"\n  }\n}\n"
        );
    }
}
