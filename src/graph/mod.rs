//! In-memory asset graph.
//!
//! Assets (documents, scripts, translation resources) live in an arena keyed
//! by [`AssetId`]; typed [`Relation`]s connect them. Ids are never reused, and
//! both maps iterate in creation order, so relation order from a document
//! follows the order its tags appear in. The graph is `Clone`, which is how
//! callers take a checkpoint before a pass that may have to be undone.

mod asset;
mod relation;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;
use swc_ecma_ast::Program;

use crate::core::parsers::resource::parse_resource;
use crate::core::parsers::script::{ParsedScript, parse_script};
use crate::core::{KeyTable, LocalizeError};
use crate::utils::insert_counter;

pub use asset::{Asset, AssetBody, AssetId, AssetKind, Document, Resource, Script, Splice};
pub use relation::{INCLUSION, Relation, RelationId, RelationKind, RelationLocation};

#[derive(Debug, Clone, Default)]
pub struct AssetGraph {
    assets: BTreeMap<AssetId, Asset>,
    relations: BTreeMap<RelationId, Relation>,
    next_asset: usize,
    next_relation: usize,
}

impl AssetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_asset(&mut self, asset: Asset) -> AssetId {
        let id = AssetId(self.next_asset);
        self.next_asset += 1;
        self.assets.insert(id, asset);
        id
    }

    pub fn add_relation(&mut self, relation: Relation) -> RelationId {
        let id = RelationId(self.next_relation);
        self.next_relation += 1;
        self.relations.insert(id, relation);
        id
    }

    pub fn asset(&self, id: AssetId) -> Result<&Asset, LocalizeError> {
        self.assets.get(&id).ok_or(LocalizeError::MissingAsset(id))
    }

    pub fn asset_mut(&mut self, id: AssetId) -> Result<&mut Asset, LocalizeError> {
        self.assets.get_mut(&id).ok_or(LocalizeError::MissingAsset(id))
    }

    pub fn relation(&self, id: RelationId) -> Option<&Relation> {
        self.relations.get(&id)
    }

    pub fn assets(&self) -> impl Iterator<Item = (AssetId, &Asset)> {
        self.assets.iter().map(|(id, asset)| (*id, asset))
    }

    pub fn relations(&self) -> impl Iterator<Item = (RelationId, &Relation)> {
        self.relations.iter().map(|(id, relation)| (*id, relation))
    }

    pub fn find_assets(&self, pred: impl Fn(AssetId, &Asset) -> bool) -> Vec<AssetId> {
        self.assets
            .iter()
            .filter(|(id, asset)| pred(**id, asset))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn find_relations(&self, pred: impl Fn(&Relation) -> bool) -> Vec<RelationId> {
        self.relations
            .iter()
            .filter(|(_, relation)| pred(relation))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Relations of one kind leaving `from`, in creation order.
    pub fn outgoing(&self, from: AssetId, kind: RelationKind) -> Vec<RelationId> {
        self.find_relations(|r| r.from == from && r.kind == kind)
    }

    pub fn find_by_identifier(&self, identifier: &str) -> Option<AssetId> {
        self.assets
            .iter()
            .find(|(_, asset)| asset.identifier == identifier)
            .map(|(id, _)| *id)
    }

    /// Copy an asset and its outgoing relations. Each relation in `repoint`
    /// is redirected to the copy. The copy starts out dirty.
    pub fn clone_asset(
        &mut self,
        id: AssetId,
        repoint: &[RelationId],
    ) -> Result<AssetId, LocalizeError> {
        let mut copy = self.asset(id)?.clone();
        copy.mark_dirty();
        let new_id = self.add_asset(copy);

        let outgoing: Vec<Relation> = self
            .relations
            .values()
            .filter(|r| r.from == id)
            .cloned()
            .collect();
        for mut relation in outgoing {
            relation.from = new_id;
            self.add_relation(relation);
        }

        for relation_id in repoint {
            if let Some(relation) = self.relations.get_mut(relation_id) {
                relation.to = new_id;
            }
        }
        Ok(new_id)
    }

    /// Remove an asset together with every relation to or from it.
    pub fn remove_asset(&mut self, id: AssetId) -> Result<Asset, LocalizeError> {
        let asset = self.assets.remove(&id).ok_or(LocalizeError::MissingAsset(id))?;
        self.relations.retain(|_, r| r.from != id && r.to != id);
        Ok(asset)
    }

    pub fn is_referenced(&self, id: AssetId) -> bool {
        self.relations.values().any(|r| r.to == id)
    }

    /// Assets reachable from `start` over relations of `kinds`, children
    /// before parents, `start` last. Each asset appears once.
    pub fn collect_assets_post_order(&self, start: AssetId, kinds: &[RelationKind]) -> Vec<AssetId> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.post_order(start, kinds, &mut visited, &mut order);
        order
    }

    fn post_order(
        &self,
        id: AssetId,
        kinds: &[RelationKind],
        visited: &mut HashSet<AssetId>,
        order: &mut Vec<AssetId>,
    ) {
        if !visited.insert(id) || !self.assets.contains_key(&id) {
            return;
        }
        let children: Vec<AssetId> = self
            .relations
            .values()
            .filter(|r| r.from == id && kinds.contains(&r.kind))
            .map(|r| r.to)
            .collect();
        for child in children {
            self.post_order(child, kinds, visited, order);
        }
        order.push(id);
    }

    /// Parse every not-yet-parsed script and resource among `ids`.
    ///
    /// Scripts are parsed in parallel; trees are installed only once all of
    /// them parsed, so a failure leaves the graph as it was.
    pub fn load_parse_trees(&mut self, ids: &[AssetId]) -> Result<(), LocalizeError> {
        let mut scripts = Vec::new();
        let mut resources = Vec::new();
        for id in ids {
            let asset = self.asset(*id)?;
            match &asset.body {
                AssetBody::Script(script) if script.tree.is_none() => {
                    scripts.push((*id, asset.identifier.as_str(), script.text.as_str()));
                }
                AssetBody::Resource(resource) if resource.table.is_none() => {
                    resources.push((*id, asset.identifier.as_str(), resource.text.as_str()));
                }
                _ => {}
            }
        }

        let parsed_scripts = scripts
            .par_iter()
            .map(|(id, identifier, text)| parse_script(text, identifier).map(|tree| (*id, tree)))
            .collect::<Result<Vec<(AssetId, ParsedScript)>, LocalizeError>>()?;
        let parsed_resources = resources
            .iter()
            .map(|(id, identifier, text)| parse_resource(text, identifier).map(|table| (*id, table)))
            .collect::<Result<Vec<(AssetId, KeyTable)>, LocalizeError>>()?;

        for (id, tree) in parsed_scripts {
            if let Some(script) = self.asset_mut(id)?.as_script_mut() {
                script.tree = Some(tree);
            }
        }
        for (id, table) in parsed_resources {
            if let Some(resource) = self.asset_mut(id)?.as_resource_mut() {
                resource.table = Some(table);
            }
        }
        Ok(())
    }

    /// The parse tree of a script, if it has been loaded.
    pub fn program(&self, id: AssetId) -> Option<&Program> {
        self.assets
            .get(&id)?
            .as_script()?
            .tree
            .as_ref()
            .map(|tree| &tree.program)
    }

    /// The key table of a resource, if it has been loaded.
    pub fn resource_table(&self, id: AssetId) -> Option<&KeyTable> {
        self.assets.get(&id)?.as_resource()?.table.as_ref()
    }

    pub fn resource_table_mut(&mut self, id: AssetId) -> Option<&mut KeyTable> {
        self.assets.get_mut(&id)?.as_resource_mut()?.table.as_mut()
    }

    /// `wanted`, or `wanted` with a counter inserted before the extension
    /// when another asset already has that identifier.
    pub fn unique_identifier(&self, wanted: &str) -> String {
        let taken = |candidate: &str| self.assets.values().any(|a| a.identifier == candidate);
        if !taken(wanted) {
            return wanted.to_string();
        }
        (1..)
            .map(|n| insert_counter(wanted, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| wanted.to_string())
    }
}
