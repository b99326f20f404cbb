//! The small part of HTML documents the localizer cares about: external
//! `<script src>` tags and the `lang` attribute of `<html>`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>").unwrap());

static HTML_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<html\b([^>]*)>").unwrap());

static ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)([a-z][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReference {
    pub src: String,
    /// Byte range of the `src` value in the document text.
    pub src_range: Range<usize>,
    /// Tag carries `id="<bootstrapper id>"`.
    pub bootstrapper: bool,
}

#[derive(Debug)]
struct Attribute<'a> {
    name: &'a str,
    value: &'a str,
    range: Range<usize>,
}

/// Attributes of the tag whose attribute text starts at `offset`.
fn attributes(text: &str, offset: usize) -> Vec<Attribute<'_>> {
    ATTRIBUTE_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or(caps.get(3)).or(caps.get(4))?;
            Some(Attribute {
                name,
                value: value.as_str(),
                range: offset + value.start()..offset + value.end(),
            })
        })
        .collect()
}

/// Every `<script>` tag with a `src` attribute, in document order.
pub fn find_script_references(html: &str, bootstrapper_id: &str) -> Vec<ScriptReference> {
    let mut references = Vec::new();
    for caps in SCRIPT_TAG_REGEX.captures_iter(html) {
        let Some(attrs) = caps.get(1) else {
            continue;
        };
        let attrs = attributes(attrs.as_str(), attrs.start());
        let Some(src) = attrs.iter().find(|a| a.name.eq_ignore_ascii_case("src")) else {
            continue;
        };
        let bootstrapper = attrs
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case("id") && a.value == bootstrapper_id);
        references.push(ScriptReference {
            src: src.value.to_string(),
            src_range: src.range.clone(),
            bootstrapper,
        });
    }
    references
}

/// Value of `<html lang="…">`, if any.
pub fn document_lang(html: &str) -> Option<String> {
    let caps = HTML_TAG_REGEX.captures(html)?;
    let attrs = caps.get(1)?;
    attributes(attrs.as_str(), attrs.start())
        .into_iter()
        .find(|a| a.name.eq_ignore_ascii_case("lang"))
        .map(|a| a.value.to_string())
}

/// Set (or add) the `lang` attribute of the `<html>` tag. Documents without
/// an `<html>` tag are returned unchanged.
pub fn set_document_lang(html: &str, lang: &str) -> String {
    let Some(attrs) = HTML_TAG_REGEX.captures(html).and_then(|caps| caps.get(1)) else {
        return html.to_string();
    };
    let existing = attributes(attrs.as_str(), attrs.start())
        .into_iter()
        .find(|a| a.name.eq_ignore_ascii_case("lang"));

    match existing {
        Some(attr) => format!("{}{}{}", &html[..attr.range.start], lang, &html[attr.range.end..]),
        None => format!(
            "{} lang=\"{}\"{}",
            &html[..attrs.start()],
            lang,
            &html[attrs.start()..]
        ),
    }
}
