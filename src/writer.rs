use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::CallNames;
use crate::graph::{AssetGraph, AssetKind};
use crate::render::render_asset;

/// Which assets [`write_graph`] persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Every asset in the graph, for a self-contained build output.
    All,
    /// Only assets changed since loading, for in-place updates.
    Dirty,
}

#[derive(Debug, Clone, Default)]
pub struct WriteSummary {
    /// Identifiers of the written assets, in graph order.
    pub written: Vec<String>,
    pub documents: usize,
}

/// Render assets and save them under `out_dir`, keeping their identifiers
/// as relative paths.
pub fn write_graph(
    graph: &AssetGraph,
    out_dir: &Path,
    names: &CallNames,
    mode: WriteMode,
) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    for (id, asset) in graph.assets() {
        if mode == WriteMode::Dirty && !asset.dirty {
            continue;
        }

        let text = render_asset(graph, id, names)
            .with_context(|| format!("Failed to render {}", asset.identifier))?;
        let path = out_dir.join(&asset.identifier);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, text)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        if asset.kind() == AssetKind::Document {
            summary.documents += 1;
        }
        summary.written.push(asset.identifier.clone());
    }
    Ok(summary)
}
