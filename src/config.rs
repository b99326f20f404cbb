use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{CallNames, DefaultLanguagePolicy, LocalizeOptions, is_valid_locale_id};

pub const CONFIG_FILE_NAME: &str = ".localerc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Glob patterns (relative to the project root) selecting the documents to localize.
    #[serde(default = "default_documents")]
    pub documents: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    /// Locales to produce when none are given on the command line.
    #[serde(default)]
    pub locales: Vec<String>,
    /// Language the call-site fallback values are written in. Missing-key
    /// warnings are not reported for this language when a fallback exists.
    /// `null` reports every missing key.
    #[serde(default = "default_default_language")]
    pub default_language: Option<String>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_direct_method")]
    pub direct_method: String,
    #[serde(default = "default_pattern_method")]
    pub pattern_method: String,
    #[serde(default = "default_include_method")]
    pub include_method: String,
    #[serde(default = "default_bootstrapper_id")]
    pub bootstrapper_id: String,
    #[serde(default = "default_resource_suffix")]
    pub resource_suffix: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_documents() -> Vec<String> {
    vec!["**/*.html".to_string()]
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_default_language() -> Option<String> {
    Some("en".to_string())
}

fn default_namespace() -> String {
    "one".to_string()
}

fn default_direct_method() -> String {
    "tr".to_string()
}

fn default_pattern_method() -> String {
    "trPattern".to_string()
}

fn default_include_method() -> String {
    "include".to_string()
}

fn default_bootstrapper_id() -> String {
    "oneBootstrapper".to_string()
}

fn default_resource_suffix() -> String {
    ".i18n".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents: default_documents(),
            ignores: default_ignores(),
            locales: Vec::new(),
            default_language: default_default_language(),
            namespace: default_namespace(),
            direct_method: default_direct_method(),
            pattern_method: default_pattern_method(),
            include_method: default_include_method(),
            bootstrapper_id: default_bootstrapper_id(),
            resource_suffix: default_resource_suffix(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns, empty call names, a
    /// resource suffix without a leading dot, or malformed locale ids.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.documents {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'documents': \"{}\"", pattern))?;
        }

        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for (field, value) in [
            ("namespace", &self.namespace),
            ("directMethod", &self.direct_method),
            ("patternMethod", &self.pattern_method),
            ("includeMethod", &self.include_method),
            ("bootstrapperId", &self.bootstrapper_id),
        ] {
            if value.trim().is_empty() {
                bail!("'{}' must not be empty", field);
            }
        }

        if self.direct_method == self.pattern_method {
            bail!(
                "'directMethod' and 'patternMethod' must differ (both are \"{}\")",
                self.direct_method
            );
        }

        if !self.resource_suffix.starts_with('.') || self.resource_suffix.len() < 2 {
            bail!(
                "'resourceSuffix' must start with a dot, got \"{}\"",
                self.resource_suffix
            );
        }

        for locale in &self.locales {
            if !is_valid_locale_id(locale) {
                bail!("Invalid locale id in 'locales': \"{}\"", locale);
            }
        }

        Ok(())
    }

    /// The options the localization core needs from this configuration.
    pub fn localize_options(&self) -> LocalizeOptions {
        LocalizeOptions {
            names: CallNames {
                namespace: self.namespace.clone(),
                direct: self.direct_method.clone(),
                pattern: self.pattern_method.clone(),
                include: self.include_method.clone(),
            },
            default_language: DefaultLanguagePolicy::new(self.default_language.clone()),
            resource_suffix: self.resource_suffix.clone(),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
