//! Graph construction from a node index and identifier-level edges.

use std::collections::HashMap;

use crate::error::IndexError;
use crate::node::{NodeId, NodeStyle};
use crate::relation::Relation;

use super::index::{IndexResult, NodeIndex};
use super::{Edge, NetworkGraph};

/// Builds a [`NetworkGraph`] from a [`NodeIndex`].
///
/// Every index entry becomes a node, named according to the builder's
/// [`NodeStyle`], in index order. Edges are added in input order; a later
/// edge between the same pair of nodes replaces the earlier one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    style: NodeStyle,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name enriched nodes by registry identifiers instead of symbols.
    pub fn with_style(style: NodeStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> NodeStyle {
        self.style
    }

    /// Build the graph of an index and its identifier-level edges.
    ///
    /// Fails with [`IndexError::UnknownId`] if an edge references an
    /// identifier missing from the index, and with
    /// [`IndexError::AmbiguousLabel`] if two index entries get the same node
    /// name, e.g. two symbols sharing a UniProt accession in the identifier
    /// view.
    pub fn build(&self, index: &NodeIndex, edges: &[Edge]) -> IndexResult<NetworkGraph> {
        let mut graph = NetworkGraph::new();
        let mut owners: HashMap<String, NodeId> = HashMap::with_capacity(index.len());
        for (id, label) in index.iter() {
            let name = label.node_name(self.style);
            if let Some(existing) = owners.get(&name) {
                return Err(IndexError::AmbiguousLabel {
                    label: name,
                    existing: existing.get(),
                });
            }
            graph.ensure_node(&name, label.category);
            owners.insert(name, id);
        }

        let endpoint = |graph: &mut NetworkGraph, id: NodeId| {
            let label = index
                .label(id)
                .ok_or(IndexError::UnknownId { id: id.get() })?;
            Ok::<_, IndexError>(graph.ensure_node(&label.node_name(self.style), label.category))
        };
        for edge in edges {
            let a = endpoint(&mut graph, edge.source)?;
            let b = endpoint(&mut graph, edge.target)?;
            graph.connect(a, b, edge.kind.clone());
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            input_edges = edges.len(),
            "graph built"
        );
        Ok(graph)
    }

    /// Replace each relation's symbols by their identifiers and build the graph.
    pub fn build_relations(
        &self,
        relations: &[Relation],
        index: &NodeIndex,
    ) -> IndexResult<NetworkGraph> {
        let edges = index.edges_for(relations)?;
        self.build(index, &edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;
    use crate::node::{Category, NodeLabel};

    fn rels() -> Vec<Relation> {
        vec![
            Relation::new("USP14", "physical association", "AR"),
            Relation::new("AR", "association", "CREBBP"),
            Relation::new("USP14", "direct interaction", "AR"),
        ]
    }

    #[test]
    fn plain_graph_uses_symbols() {
        let index = NodeIndex::plain(&rels()).unwrap();
        let graph = GraphBuilder::new().build_relations(&rels(), &index).unwrap();
        assert_eq!(graph.node_names(), vec!["USP14", "AR", "CREBBP"]);
        assert_eq!(graph.edge_count(), 2);
        // Last edge wins for the repeated USP14–AR pair.
        assert_eq!(
            graph.edge_between("AR", "USP14"),
            Some(&EdgeKind::interaction("direct interaction"))
        );
    }

    #[test]
    fn enriched_graph_names_and_categories() {
        let enrichment = crate::enrich::enrich_relations(&rels(), None).unwrap();
        let graph = GraphBuilder::new()
            .build(&enrichment.index, &enrichment.edges)
            .unwrap();
        assert_eq!(graph.node_count(), 9);
        assert_eq!(graph.edge_count(), 8);
        assert_eq!(
            graph.edge_between("AR DNA", "AR RNA"),
            Some(&EdgeKind::Transcribed)
        );
        let idx = graph.index_of("AR Protein").unwrap();
        assert_eq!(graph.node(idx).unwrap().category, Some(Category::Protein));
    }

    #[test]
    fn identifier_style_names() {
        let mut index = NodeIndex::new(crate::graph::index::IndexScheme::Enriched);
        let dna = index
            .insert(NodeLabel::categorized("AR", Category::Dna, Some("HGNC:644/ENSG1".into())))
            .unwrap();
        let rna = index
            .insert(NodeLabel::categorized("AR", Category::Rna, None))
            .unwrap();
        let graph = GraphBuilder::with_style(NodeStyle::Identifier)
            .build(&index, &[Edge::new(dna, rna, EdgeKind::Transcribed)])
            .unwrap();
        assert!(graph.has_node("DNA HGNC:644"));
        assert!(graph.has_node("RNA AR"));
    }

    #[test]
    fn shared_accession_in_identifier_view_is_ambiguous() {
        // HBA1 and HBA2 both encode P69905.
        let mut index = NodeIndex::new(crate::graph::index::IndexScheme::Enriched);
        for symbol in ["HBA1", "HBA2"] {
            index
                .insert(NodeLabel::categorized(symbol, Category::Dna, None))
                .unwrap();
            index
                .insert(NodeLabel::categorized(symbol, Category::Rna, None))
                .unwrap();
            index
                .insert(NodeLabel::categorized(symbol, Category::Protein, Some("P69905".into())))
                .unwrap();
        }

        let err = GraphBuilder::with_style(NodeStyle::Identifier)
            .build(&index, &[])
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::AmbiguousLabel { ref label, existing: 3 } if label == "Protein P69905"
        ));

        // Symbol names stay distinct.
        let graph = GraphBuilder::new().build(&index, &[]).unwrap();
        assert_eq!(graph.node_count(), 6);
    }

    #[test]
    fn unknown_identifier_fails() {
        let index = NodeIndex::plain(&rels()).unwrap();
        let id = |n| NodeId::new(n).unwrap();
        let err = GraphBuilder::new()
            .build(&index, &[Edge::new(id(1), id(99), EdgeKind::interaction("x"))])
            .unwrap_err();
        assert!(matches!(err, IndexError::UnknownId { id: 99 }));
    }
}
