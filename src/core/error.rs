//! Fatal errors of the localization engine.
//!
//! Anything listed here aborts the current document (or the current
//! command). Recoverable problems go to [`Diagnostics`](super::Diagnostics).

use thiserror::Error;

use crate::graph::AssetId;

#[derive(Debug, Error)]
pub enum LocalizeError {
    #[error(
        "The key '{key}' was found in multiple translation resources ({}), cannot proceed",
        .resources.join(", ")
    )]
    DuplicateKey { key: String, resources: Vec<String> },

    #[error("The key '{key}' isn't used anywhere, cannot work out which resource to add it to")]
    UnusedKey { key: String },

    #[error("Unexpected number of bootstrapper relations from {document}: {count}")]
    BootstrapperCount { document: String, count: usize },

    #[error("Failed to parse {identifier}: {message}")]
    Parse { identifier: String, message: String },

    #[error("Invalid translation resource {identifier}: {message}")]
    InvalidResource { identifier: String, message: String },

    #[error("Failed to read {identifier}: {source}")]
    Io {
        identifier: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Asset {0} is not in the graph")]
    MissingAsset(AssetId),
}
