use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::core::{KeyTable, LocalizeError};

/// Parse a translation resource: a JSON object `key → { locale → value }`.
///
/// Blank text parses to an empty table, so freshly created resources need
/// no content.
pub fn parse_resource(text: &str, identifier: &str) -> Result<KeyTable, LocalizeError> {
    if text.trim().is_empty() {
        return Ok(KeyTable::new());
    }
    serde_json::from_str(text).map_err(|e| LocalizeError::InvalidResource {
        identifier: identifier.to_string(),
        message: e.to_string(),
    })
}

/// Pretty-print a key table the way resources are stored on disk.
pub fn render_resource(table: &KeyTable) -> String {
    let mut text = serde_json::to_string_pretty(table).unwrap_or_else(|_| "{}".to_string());
    text.push('\n');
    text
}

/// Read an external key table for `import`.
pub fn load_translation_file(path: &Path) -> Result<KeyTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read translation file: {:?}", path))?;
    let table = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse translation file: {:?}", path))?;
    Ok(table)
}
