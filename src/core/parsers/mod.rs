//! Parsers for the three asset kinds.
//!
//! - `script`: JavaScript source parser (uses swc for AST generation)
//! - `resource`: JSON translation resource parser and printer
//! - `document`: `<script src>` / `<html lang>` surface of HTML documents

pub mod document;
pub mod resource;
pub mod script;
