//! Message patterns: `"Hello {0}, you have {1} new \{messages\}"`.
//!
//! A pattern mixes literal text with `{N}` placeholders, N being the
//! zero-based index of the argument that fills it. `\{`, `\}` and `\\`
//! escape the literal characters.

use swc_ecma_ast::Expr;

use crate::core::synth::{concat, function_returning, identifier, string_literal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    Text(String),
    Placeholder(usize),
}

/// Split a pattern into text and placeholder tokens.
///
/// Adjacent text is merged into a single token, so text and placeholder
/// tokens alternate except around consecutive placeholders. A `{` that does
/// not open a `{digits}` placeholder is ordinary text.
pub fn tokenize_pattern(pattern: &str) -> Vec<PatternToken> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        match c {
            '\\' => match rest[1..].chars().next() {
                Some(escaped @ ('{' | '}' | '\\')) => {
                    text.push(escaped);
                    rest = &rest[2..];
                }
                _ => {
                    text.push('\\');
                    rest = &rest[1..];
                }
            },
            '{' => match placeholder_at(rest) {
                Some((index, consumed)) => {
                    if !text.is_empty() {
                        tokens.push(PatternToken::Text(std::mem::take(&mut text)));
                    }
                    tokens.push(PatternToken::Placeholder(index));
                    rest = &rest[consumed..];
                }
                None => {
                    text.push('{');
                    rest = &rest[1..];
                }
            },
            _ => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    if !text.is_empty() {
        tokens.push(PatternToken::Text(text));
    }
    tokens
}

/// Parse `{digits}` at the start of `s`, returning the index and the number
/// of bytes consumed.
fn placeholder_at(s: &str) -> Option<(usize, usize)> {
    let digits = s[1..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || s.as_bytes().get(1 + digits) != Some(&b'}') {
        return None;
    }
    let index = s[1..1 + digits].parse().ok()?;
    Some((index, digits + 2))
}

/// Join tokens back into a pattern in canonical escaped form.
pub fn render_tokens(tokens: &[PatternToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            PatternToken::Text(text) => {
                for c in text.chars() {
                    if matches!(c, '{' | '}' | '\\') {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
            PatternToken::Placeholder(index) => out.push_str(&format!("{{{}}}", index)),
        }
    }
    out
}

/// Highest placeholder index referenced by the tokens.
pub fn highest_placeholder(tokens: &[PatternToken]) -> Option<usize> {
    tokens
        .iter()
        .filter_map(|token| match token {
            PatternToken::Placeholder(index) => Some(*index),
            PatternToken::Text(_) => None,
        })
        .max()
}

/// Build the left-associative `+` concatenation for the tokens.
///
/// Placeholder `N` becomes `operands[N]`; a placeholder without an operand
/// becomes `undefined`, which is what the argument would be at runtime. An
/// empty token list compiles to `""`.
pub fn compile_pattern(tokens: &[PatternToken], operands: &[Expr]) -> Expr {
    let mut compiled: Option<Expr> = None;
    for token in tokens {
        let term = match token {
            PatternToken::Text(text) => string_literal(text),
            PatternToken::Placeholder(index) => operands
                .get(*index)
                .cloned()
                .unwrap_or_else(|| identifier("undefined")),
        };
        compiled = Some(match compiled {
            Some(left) => concat(left, term),
            None => term,
        });
    }
    compiled.unwrap_or_else(|| string_literal(""))
}

/// Build `function (a0, …, aN) { return <pattern>; }` for the tokens, with
/// one parameter per placeholder index up to the highest one used.
pub fn compile_pattern_function(tokens: &[PatternToken]) -> Expr {
    let arity = highest_placeholder(tokens).map_or(0, |highest| highest + 1);
    let params: Vec<String> = (0..arity).map(|i| format!("a{}", i)).collect();
    let operands: Vec<Expr> = params.iter().map(|name| identifier(name)).collect();
    function_returning(&params, compile_pattern(tokens, &operands))
}
