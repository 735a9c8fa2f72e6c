//! Interaction network: node index, graph construction, paths and statistics.
//!
//! - [`index::NodeIndex`]: bijection between node identifiers and labels
//! - [`build::GraphBuilder`]: turns identifier-level edges into a [`NetworkGraph`]
//! - [`traverse`]: all shortest paths between two nodes
//! - [`analytics`]: summary statistics in plain and enriched mode
//!
//! The graph itself is an undirected `petgraph` graph whose nodes are named by
//! their labels and whose edges carry an [`EdgeKind`].

pub mod analytics;
pub mod build;
pub mod index;
pub mod traverse;

use std::collections::HashMap;

use petgraph::graph::{NodeIndex as PetIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::node::{Category, NodeId};

/// Metadata carried by an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// An interaction from the PPI input, e.g. `"physical association"`.
    Interaction(String),
    /// DNA → RNA edge added by enrichment.
    Transcribed,
    /// RNA → Protein edge added by enrichment.
    Translated,
}

impl EdgeKind {
    pub fn interaction(kind: impl Into<String>) -> Self {
        EdgeKind::Interaction(kind.into())
    }

    /// Parse the third column of an edge list.
    pub fn parse(token: &str) -> Self {
        match token {
            "transcribed" => EdgeKind::Transcribed,
            "translated" => EdgeKind::Translated,
            other => EdgeKind::Interaction(other.to_string()),
        }
    }

    /// The edge-list token: whitespace in interaction types becomes `_`.
    pub fn token(&self) -> String {
        match self {
            EdgeKind::Interaction(kind) => crate::relation::normalize_interaction(kind),
            EdgeKind::Transcribed => "transcribed".into(),
            EdgeKind::Translated => "translated".into(),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        !matches!(self, EdgeKind::Interaction(_))
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Interaction(kind) => f.write_str(kind),
            EdgeKind::Transcribed => f.write_str("transcribed"),
            EdgeKind::Translated => f.write_str("translated"),
        }
    }
}

/// An identifier-level edge, as stored in edge lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }
}

/// Node weight of a [`NetworkGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Name the node is addressed by (symbol or enriched display name).
    pub name: String,
    /// Molecular category in enriched graphs.
    pub category: Option<Category>,
}

impl std::fmt::Display for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Undirected interaction network, owned by one analysis session.
///
/// The graph is simple: a second edge between the same pair of nodes replaces
/// the metadata of the first (last edge wins).
#[derive(Clone, Default)]
pub struct NetworkGraph {
    graph: UnGraph<GraphNode, EdgeKind>,
    by_name: HashMap<String, PetIndex>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a node with this name exists, returning its petgraph index.
    pub(crate) fn ensure_node(&mut self, name: &str, category: Option<Category>) -> PetIndex {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            name: name.to_string(),
            category,
        });
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    /// Connect two nodes, replacing the metadata of an existing edge between them.
    pub(crate) fn connect(&mut self, a: PetIndex, b: PetIndex, kind: EdgeKind) {
        self.graph.update_edge(a, b, kind);
    }

    /// Petgraph index of a named node.
    pub fn index_of(&self, name: &str) -> Option<PetIndex> {
        self.by_name.get(name).copied()
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn node(&self, idx: PetIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node names in insertion order.
    pub fn node_names(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].name.as_str())
            .collect()
    }

    /// All edges as `(name, name, kind)` in insertion order.
    pub fn edges(&self) -> Vec<(&str, &str, &EdgeKind)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].name.as_str(),
                    self.graph[e.target()].name.as_str(),
                    e.weight(),
                )
            })
            .collect()
    }

    /// The metadata of the edge between two named nodes, if any.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&EdgeKind> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge)
    }

    /// Names of the neighbors of a node.
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        match self.index_of(name) {
            Some(idx) => self
                .graph
                .neighbors(idx)
                .map(|n| self.graph[n].name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Read access to the underlying petgraph graph.
    pub fn graph(&self) -> &UnGraph<GraphNode, EdgeKind> {
        &self.graph
    }
}

impl std::fmt::Debug for NetworkGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_edges_collapse_last_wins() {
        let mut g = NetworkGraph::new();
        let a = g.ensure_node("A", None);
        let b = g.ensure_node("B", None);
        g.connect(a, b, EdgeKind::interaction("association"));
        g.connect(b, a, EdgeKind::interaction("physical association"));

        assert_eq!(g.edge_count(), 1);
        assert_eq!(
            g.edge_between("A", "B"),
            Some(&EdgeKind::interaction("physical association"))
        );
    }

    #[test]
    fn ensure_node_is_idempotent() {
        let mut g = NetworkGraph::new();
        let first = g.ensure_node("TP53", None);
        let second = g.ensure_node("TP53", None);
        assert_eq!(first, second);
        assert_eq!(g.node_count(), 1);
        assert!(g.has_node("TP53"));
        assert!(!g.has_node("tp53"));
    }

    #[test]
    fn edge_kind_tokens() {
        assert_eq!(EdgeKind::parse("transcribed"), EdgeKind::Transcribed);
        assert_eq!(
            EdgeKind::interaction("physical association").token(),
            "physical_association"
        );
        assert!(EdgeKind::Translated.is_synthetic());
        assert!(!EdgeKind::interaction("x").is_synthetic());
    }
}
