//! localeclone - per-locale cloning of document/script asset graphs
//!
//! Finds translation calls (`one.tr("key")`, `one.trPattern("key")(args)`)
//! in the scripts a document loads, resolves each key for a locale, and
//! writes one rewritten copy of the document and its scripts per locale.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (build, keys, import, init)
//! - `config`: Configuration file loading and parsing
//! - `core`: Localization engine (scanning, extraction, rewriting, cloning)
//! - `graph`: In-memory asset graph
//! - `loader`: Builds the asset graph from a project directory
//! - `render`: Turns assets back into text
//! - `writer`: Persists rendered assets
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod graph;
pub mod loader;
pub mod render;
pub mod utils;
pub mod writer;
