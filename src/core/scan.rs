//! Translation call-site scanner.
//!
//! Recognizes, for the configured namespace `ns` and method names:
//!
//! - `ns.tr("key")`, `ns.tr("key", fallback)`: [`CallKind::Direct`]
//! - `ns.trPattern("key")(a, b)`: [`CallKind::PatternInvocation`]
//! - `ns.trPattern("key")` used as a value: [`CallKind::PatternReference`]
//!
//! The key must be a string literal. Calls of the right shape with any other
//! key are reported as [`DiagnosticKind::MalformedCall`] and skipped.

use std::ops::ControlFlow;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{CallExpr, Callee, Expr, ExprOrSpread, Lit, MemberProp, Program};
use swc_ecma_visit::{Visit, VisitMut, VisitMutWith, VisitWith};

use crate::core::{DiagnosticKind, Diagnostics};
use crate::graph::Splice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Direct,
    PatternReference,
    PatternInvocation,
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallKind::Direct => write!(f, "direct"),
            CallKind::PatternReference => write!(f, "pattern reference"),
            CallKind::PatternInvocation => write!(f, "pattern invocation"),
        }
    }
}

/// Names making up the translation call surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallNames {
    pub namespace: String,
    pub direct: String,
    pub pattern: String,
    pub include: String,
}

impl Default for CallNames {
    fn default() -> Self {
        Self {
            namespace: "one".to_string(),
            direct: "tr".to_string(),
            pattern: "trPattern".to_string(),
            include: "include".to_string(),
        }
    }
}

/// A call site seen by [`CallSiteScanner::scan_program`].
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    pub kind: CallKind,
    pub key: &'a str,
    /// The whole call expression (for invocations, the outer call).
    pub node: &'a Expr,
    pub fallback: Option<&'a Expr>,
}

/// A call site seen by [`CallSiteScanner::scan_program_mut`]. The node may be
/// replaced in place with [`CallSiteMut::splice`].
#[derive(Debug)]
pub struct CallSiteMut<'a> {
    pub kind: CallKind,
    pub key: String,
    node: &'a mut Expr,
}

impl CallSiteMut<'_> {
    pub fn node(&self) -> &Expr {
        self.node
    }

    pub fn fallback(&self) -> Option<&Expr> {
        fallback(self.node, self.kind)
    }

    /// Placeholder operands of an invocation; empty for the other kinds.
    pub fn arguments(&self) -> Vec<Expr> {
        match (self.kind, &*self.node) {
            (CallKind::PatternInvocation, Expr::Call(call)) => {
                call.args.iter().map(|arg| (*arg.expr).clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Replace the call node, returning the record of the replacement.
    pub fn splice(&mut self, replacement: Expr) -> Splice {
        let span = self.node.span();
        *self.node = replacement.clone();
        Splice { span, replacement }
    }
}

/// Walks swc programs looking for translation calls.
#[derive(Debug, Clone, Copy)]
pub struct CallSiteScanner<'a> {
    names: &'a CallNames,
    origin: Option<&'a str>,
}

impl<'a> CallSiteScanner<'a> {
    pub fn new(names: &'a CallNames) -> Self {
        Self {
            names,
            origin: None,
        }
    }

    /// Attach the scanned asset's identifier to the diagnostics.
    pub fn with_origin(mut self, origin: &'a str) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Visit every call site in depth-first pre-order until the visitor
    /// breaks.
    pub fn scan_program<F>(&self, program: &Program, diag: &mut Diagnostics, visit: F)
    where
        F: FnMut(CallSite<'_>, &mut Diagnostics) -> ControlFlow<()>,
    {
        let mut visitor = ScanVisitor {
            scanner: *self,
            diag,
            visit,
            stopped: false,
        };
        program.visit_with(&mut visitor);
    }

    /// Visit every call site with mutable access to its node until the
    /// visitor breaks. Operands and fallbacks are visited before the call
    /// containing them, so nested call sites are handled first.
    pub fn scan_program_mut<F>(&self, program: &mut Program, diag: &mut Diagnostics, visit: F)
    where
        F: FnMut(CallSiteMut<'_>, &mut Diagnostics) -> ControlFlow<()>,
    {
        let mut visitor = ScanMutVisitor {
            scanner: *self,
            diag,
            visit,
            stopped: false,
        };
        program.visit_mut_with(&mut visitor);
    }

    fn report_malformed(&self, kind: CallKind, diag: &mut Diagnostics) {
        let method = match kind {
            CallKind::Direct => &self.names.direct,
            CallKind::PatternReference | CallKind::PatternInvocation => &self.names.pattern,
        };
        diag.warn_in(
            DiagnosticKind::MalformedCall,
            self.origin,
            format!(
                "Invalid {}.{}(...) call: the first argument must be a string literal key",
                self.names.namespace, method
            ),
        );
    }
}

/// `ns.<method>(…)` → the method name.
fn member_method<'c>(call: &'c CallExpr, names: &CallNames) -> Option<&'c str> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Member(member) = &**callee else {
        return None;
    };
    let Expr::Ident(ns) = &*member.obj else {
        return None;
    };
    let MemberProp::Ident(method) = &member.prop else {
        return None;
    };
    (ns.sym.as_str() == names.namespace).then_some(method.sym.as_str())
}

/// `ns.trPattern(…)` as the callee of another call.
fn inner_pattern_call<'c>(call: &'c CallExpr, names: &CallNames) -> Option<&'c CallExpr> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Call(inner) = &**callee else {
        return None;
    };
    (member_method(inner, names) == Some(names.pattern.as_str())).then_some(inner)
}

/// Shape-only classification of an expression.
fn classify(expr: &Expr, names: &CallNames) -> Option<CallKind> {
    let Expr::Call(call) = expr else {
        return None;
    };
    if inner_pattern_call(call, names).is_some() {
        return Some(CallKind::PatternInvocation);
    }
    match member_method(call, names)? {
        m if m == names.direct => Some(CallKind::Direct),
        m if m == names.pattern => Some(CallKind::PatternReference),
        _ => None,
    }
}

/// Arguments carrying the key and the fallback.
fn key_arguments(expr: &Expr, kind: CallKind) -> &[ExprOrSpread] {
    let Expr::Call(call) = expr else {
        return &[];
    };
    if kind == CallKind::PatternInvocation
        && let Callee::Expr(callee) = &call.callee
        && let Expr::Call(inner) = &**callee
    {
        return &inner.args;
    }
    &call.args
}

fn literal_key(expr: &Expr, kind: CallKind) -> Option<&str> {
    let first = key_arguments(expr, kind).first()?;
    if first.spread.is_some() {
        return None;
    }
    match &*first.expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str(),
        _ => None,
    }
}

fn fallback(expr: &Expr, kind: CallKind) -> Option<&Expr> {
    key_arguments(expr, kind)
        .get(1)
        .filter(|arg| arg.spread.is_none())
        .map(|arg| &*arg.expr)
}

struct ScanVisitor<'s, 'd, F> {
    scanner: CallSiteScanner<'s>,
    diag: &'d mut Diagnostics,
    visit: F,
    stopped: bool,
}

impl<F> ScanVisitor<'_, '_, F> {
    fn visit_arguments(&mut self, expr: &Expr, kind: CallKind)
    where
        F: FnMut(CallSite<'_>, &mut Diagnostics) -> ControlFlow<()>,
    {
        let Expr::Call(call) = expr else {
            return;
        };
        if kind == CallKind::PatternInvocation
            && let Callee::Expr(callee) = &call.callee
            && let Expr::Call(inner) = &**callee
        {
            for arg in &inner.args {
                arg.visit_with(self);
            }
        }
        for arg in &call.args {
            arg.visit_with(self);
        }
    }
}

impl<F> Visit for ScanVisitor<'_, '_, F>
where
    F: FnMut(CallSite<'_>, &mut Diagnostics) -> ControlFlow<()>,
{
    fn visit_expr(&mut self, expr: &Expr) {
        if self.stopped {
            return;
        }
        let Some(kind) = classify(expr, self.scanner.names) else {
            expr.visit_children_with(self);
            return;
        };

        match literal_key(expr, kind) {
            Some(key) => {
                let site = CallSite {
                    kind,
                    key,
                    node: expr,
                    fallback: fallback(expr, kind),
                };
                if (self.visit)(site, &mut *self.diag).is_break() {
                    self.stopped = true;
                    return;
                }
            }
            None => self.scanner.report_malformed(kind, &mut *self.diag),
        }
        self.visit_arguments(expr, kind);
    }
}

struct ScanMutVisitor<'s, 'd, F> {
    scanner: CallSiteScanner<'s>,
    diag: &'d mut Diagnostics,
    visit: F,
    stopped: bool,
}

impl<F> VisitMut for ScanMutVisitor<'_, '_, F>
where
    F: FnMut(CallSiteMut<'_>, &mut Diagnostics) -> ControlFlow<()>,
{
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.stopped {
            return;
        }
        let Some(kind) = classify(expr, self.scanner.names) else {
            expr.visit_mut_children_with(self);
            return;
        };

        if let Expr::Call(call) = expr {
            if kind == CallKind::PatternInvocation
                && let Callee::Expr(callee) = &mut call.callee
                && let Expr::Call(inner) = &mut **callee
            {
                for arg in inner.args.iter_mut() {
                    arg.visit_mut_with(self);
                }
            }
            for arg in call.args.iter_mut() {
                arg.visit_mut_with(self);
            }
        }
        if self.stopped {
            return;
        }

        let Some(key) = literal_key(expr, kind).map(str::to_string) else {
            self.scanner.report_malformed(kind, &mut *self.diag);
            return;
        };
        let site = CallSiteMut {
            kind,
            key,
            node: expr,
        };
        if (self.visit)(site, &mut *self.diag).is_break() {
            self.stopped = true;
        }
    }
}

/// `ns.include("path")` calls in a program, with the path and call span.
pub fn collect_includes(program: &Program, names: &CallNames) -> Vec<(String, Span)> {
    struct IncludeVisitor<'n> {
        names: &'n CallNames,
        found: Vec<(String, Span)>,
    }

    impl Visit for IncludeVisitor<'_> {
        fn visit_call_expr(&mut self, call: &CallExpr) {
            if member_method(call, self.names) == Some(self.names.include.as_str())
                && let Some(arg) = call.args.first()
                && arg.spread.is_none()
                && let Expr::Lit(Lit::Str(s)) = &*arg.expr
                && let Some(path) = s.value.as_str()
            {
                self.found.push((path.to_string(), call.span));
            }
            call.visit_children_with(self);
        }
    }

    let mut visitor = IncludeVisitor {
        names,
        found: Vec::new(),
    };
    program.visit_with(&mut visitor);
    visitor.found
}
