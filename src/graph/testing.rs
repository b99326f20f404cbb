//! Small graph builder for unit tests.

use swc_common::DUMMY_SP;

use super::{Asset, AssetGraph, AssetId, Relation, RelationId, RelationKind, RelationLocation};

pub struct GraphBuilder {
    graph: AssetGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: AssetGraph::new(),
        }
    }

    pub fn document(&mut self, identifier: &str, text: &str) -> AssetId {
        self.graph.add_asset(Asset::document(identifier, text))
    }

    pub fn script(&mut self, identifier: &str, text: &str) -> AssetId {
        self.graph.add_asset(Asset::script(identifier, text))
    }

    pub fn resource(&mut self, identifier: &str, text: &str) -> AssetId {
        self.graph.add_asset(Asset::resource(identifier, text))
    }

    pub fn link_script(&mut self, document: AssetId, script: AssetId) -> RelationId {
        self.graph.add_relation(Relation::new(
            RelationKind::DocumentScript,
            document,
            script,
            RelationLocation::Attribute(0..0),
        ))
    }

    pub fn link_bootstrapper(&mut self, document: AssetId, script: AssetId) -> RelationId {
        self.graph.add_relation(
            Relation::new(
                RelationKind::DocumentScript,
                document,
                script,
                RelationLocation::Attribute(0..0),
            )
            .bootstrapper(),
        )
    }

    pub fn include(&mut self, from: AssetId, to: AssetId) -> RelationId {
        self.graph.add_relation(Relation::new(
            RelationKind::ScriptInclude,
            from,
            to,
            RelationLocation::Call(DUMMY_SP),
        ))
    }

    pub fn build(self) -> AssetGraph {
        self.graph
    }
}
