//! Locale fallback chains.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use regex::Regex;

static EXPANSIONS: LazyLock<Mutex<HashMap<String, Vec<String>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

static LOCALE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(?:_[A-Za-z0-9]+)*$").expect("locale id regex is valid")
});

/// Expand a locale id into its fallback chain, most specific first.
///
/// ```
/// use localeclone::core::expand_locale;
///
/// assert_eq!(expand_locale("en_US_posix"), vec!["en_US_posix", "en_US", "en"]);
/// assert_eq!(expand_locale("da"), vec!["da"]);
/// ```
pub fn expand_locale(locale: &str) -> Vec<String> {
    // A poisoned memo only means another thread panicked mid-insert; the
    // map itself is still usable.
    let mut memo = EXPANSIONS.lock().unwrap_or_else(|e| e.into_inner());
    memo.entry(locale.to_string())
        .or_insert_with(|| compute_chain(locale))
        .clone()
}

fn compute_chain(locale: &str) -> Vec<String> {
    let mut chain = vec![locale.to_string()];
    let mut current = locale;
    while let Some(idx) = current.rfind('_') {
        current = &current[..idx];
        chain.push(current.to_string());
    }
    chain
}

/// Underscore-separated alphanumeric subtags, e.g. `en`, `en_US`, `zh_Hant_TW`.
pub fn is_valid_locale_id(locale: &str) -> bool {
    LOCALE_ID.is_match(locale)
}

/// Which locales are considered to be in the authoring language.
///
/// Call sites written with an inline fallback carry their default-language
/// text already, so a key without a value for such a locale is not worth a
/// warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLanguagePolicy {
    language: Option<String>,
}

impl DefaultLanguagePolicy {
    pub fn new(language: Option<String>) -> Self {
        Self { language }
    }

    /// Policy that never matches.
    pub fn disabled() -> Self {
        Self { language: None }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn matches(&self, locale: &str) -> bool {
        let Some(language) = self.language.as_deref() else {
            return false;
        };
        match locale.strip_prefix(language) {
            Some("") => true,
            Some(rest) => rest.starts_with('_') || rest.starts_with('-'),
            None => false,
        }
    }
}
