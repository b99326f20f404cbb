//! Localization engine.
//!
//! Leaves first:
//!
//! - `pattern`: message pattern tokenizer and expression compiler
//! - `scan`: translation call-site scanner over swc source trees
//! - `locale`: locale fallback chains and the default-language policy
//! - `extract`: reachable key tables and call-site occurrence index
//! - `replace`: call-site rewriting for one locale
//! - `resource`: owner resource lookup/creation for a key
//! - `clone`: per-locale document cloning over the asset graph
//!
//! Ambient pieces: `diagnostics` (non-fatal warnings), `error` (fatal
//! errors), `parsers` (script/resource/document parsing), `synth`
//! (expression builders).

pub mod clone;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod locale;
pub mod parsers;
pub mod pattern;
pub mod replace;
pub mod resource;
pub mod scan;
pub mod synth;

use std::collections::BTreeMap;

use serde_json::Value;

pub use clone::{CloneOutcome, CloneReport, LocalizedDocument, clone_for_each_locale};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::LocalizeError;
pub use extract::{
    Occurrence, OccurrenceIndex, extract_reachable_keys, extract_reachable_keys_for_locale,
    find_call_site_occurrences, verify_resource_ownership,
};
pub use locale::{DefaultLanguagePolicy, expand_locale, is_valid_locale_id};
pub use pattern::{PatternToken, compile_pattern, render_tokens, tokenize_pattern};
pub use replace::{Replacer, replace_in_script};
pub use resource::{ImportSummary, import_translations, resolve_or_create};
pub use scan::{CallKind, CallNames, CallSite, CallSiteMut, CallSiteScanner};

/// Values of one key, by locale id.
pub type LocaleValues = BTreeMap<String, Value>;

/// key → locale → value. The parse tree of a translation resource, and the
/// merged table of every resource reachable from a starting asset.
pub type KeyTable = BTreeMap<String, LocaleValues>;

/// key → value for a single locale, after fallback resolution.
pub type FlatKeyTable = BTreeMap<String, Value>;

/// Settings the engine needs from the project configuration.
#[derive(Debug, Clone)]
pub struct LocalizeOptions {
    pub names: CallNames,
    pub default_language: DefaultLanguagePolicy,
    /// Suffix of auto-created translation resources, including the dot.
    pub resource_suffix: String,
}

impl Default for LocalizeOptions {
    fn default() -> Self {
        Self {
            names: CallNames::default(),
            default_language: DefaultLanguagePolicy::new(Some("en".to_string())),
            resource_suffix: ".i18n".to_string(),
        }
    }
}
