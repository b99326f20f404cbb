//! Builders for synthesized expression nodes.
//!
//! Synthesized nodes carry `DUMMY_SP`; the renderer relies on that to tell
//! them apart from nodes that still correspond to original source text.

use serde_json::Value;
use swc_atoms::Atom;
use swc_common::DUMMY_SP;
use swc_ecma_ast::{
    ArrayLit, BinExpr, BinaryOp, BindingIdent, BlockStmt, Bool, Expr, ExprOrSpread, FnExpr,
    Function, Ident, KeyValueProp, Lit, Null, Number, ObjectLit, Param, Pat, Prop, PropName,
    PropOrSpread, ReturnStmt, Stmt, Str,
};

pub fn string_literal(value: &str) -> Expr {
    Expr::Lit(Lit::Str(str_node(value)))
}

pub fn identifier(name: &str) -> Expr {
    Expr::Ident(ident_node(name))
}

/// `left + right`
pub fn concat(left: Expr, right: Expr) -> Expr {
    Expr::Bin(BinExpr {
        span: DUMMY_SP,
        op: BinaryOp::Add,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `function (p0, p1, …) { return body; }`
pub fn function_returning(params: &[String], body: Expr) -> Expr {
    let params = params
        .iter()
        .map(|name| Param {
            span: DUMMY_SP,
            decorators: Vec::new(),
            pat: Pat::Ident(BindingIdent {
                id: ident_node(name),
                type_ann: None,
            }),
        })
        .collect();

    let body = BlockStmt {
        stmts: vec![Stmt::Return(ReturnStmt {
            span: DUMMY_SP,
            arg: Some(Box::new(body)),
        })],
        ..Default::default()
    };

    Expr::Fn(FnExpr {
        ident: None,
        function: Box::new(Function {
            params,
            body: Some(body),
            ..Default::default()
        }),
    })
}

/// Convert a translation value into the expression that evaluates to it.
pub fn value_to_expr(value: &Value) -> Expr {
    match value {
        Value::Null => Expr::Lit(Lit::Null(Null { span: DUMMY_SP })),
        Value::Bool(value) => Expr::Lit(Lit::Bool(Bool {
            span: DUMMY_SP,
            value: *value,
        })),
        Value::Number(number) => Expr::Lit(Lit::Num(Number {
            span: DUMMY_SP,
            value: number.as_f64().unwrap_or(f64::NAN),
            raw: None,
        })),
        Value::String(text) => string_literal(text),
        Value::Array(items) => Expr::Array(ArrayLit {
            span: DUMMY_SP,
            elems: items
                .iter()
                .map(|item| {
                    Some(ExprOrSpread {
                        spread: None,
                        expr: Box::new(value_to_expr(item)),
                    })
                })
                .collect(),
        }),
        Value::Object(map) => Expr::Object(ObjectLit {
            span: DUMMY_SP,
            props: map
                .iter()
                .map(|(key, item)| {
                    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
                        key: PropName::Str(str_node(key)),
                        value: Box::new(value_to_expr(item)),
                    })))
                })
                .collect(),
        }),
    }
}

/// The string value of a string literal expression.
pub fn as_string_literal(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str(),
        _ => None,
    }
}

fn str_node(value: &str) -> Str {
    Str {
        span: DUMMY_SP,
        value: Atom::from(value).into(),
        raw: None,
    }
}

fn ident_node(name: &str) -> Ident {
    Ident::new_no_ctxt(Atom::from(name), DUMMY_SP)
}
