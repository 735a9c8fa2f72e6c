//! Enrichment: split every symbol into DNA, RNA and Protein nodes.
//!
//! Each symbol becomes three consecutive node identifiers connected by a
//! `transcribed` (DNA → RNA) and a `translated` (RNA → Protein) edge.
//! Interactions from the input connect the Protein nodes of their endpoints.
//!
//! Identifier metadata comes from an [`IdentifierLookup`](lookup::IdentifierLookup)
//! collaborator. Missing metadata never fails the pipeline; the affected
//! nodes keep bare category labels.

pub mod client;
pub mod lookup;

use crate::error::IndexError;
use crate::graph::index::{IndexResult, NodeIndex};
use crate::graph::{Edge, EdgeKind};
use crate::node::{Category, NodeKey};
use crate::relation::Relation;

use lookup::{IdentifierLookup, MetadataMap};

/// Enriched node index plus the identifier-level edges connecting it.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub index: NodeIndex,
    pub edges: Vec<Edge>,
}

/// Query the lookup collaborator once per distinct symbol.
///
/// Lookup failures are logged and treated like absent metadata.
pub fn gather_identifiers<I, S, L>(symbols: I, lookup: &L) -> MetadataMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    L: IdentifierLookup + ?Sized,
{
    let mut metadata = MetadataMap::new();
    let mut missing = 0usize;
    for symbol in symbols {
        let symbol = symbol.as_ref();
        if metadata.contains_key(symbol) {
            continue;
        }
        match lookup.lookup(symbol) {
            Ok(Some(meta)) => {
                metadata.insert(symbol.to_string(), meta);
            }
            Ok(None) => missing += 1,
            Err(e) => {
                missing += 1;
                tracing::warn!(symbol, error = %e, "identifier lookup failed, using bare labels");
            }
        }
    }
    tracing::info!(found = metadata.len(), missing, "gathered identifiers");
    metadata
}

/// Build the enriched node index of a relation list.
pub fn expand_nodes(relations: &[Relation], metadata: Option<&MetadataMap>) -> IndexResult<NodeIndex> {
    NodeIndex::enriched(relations, metadata)
}

/// The `transcribed` and `translated` edges of every symbol, in index order.
pub fn synthetic_edges(index: &NodeIndex) -> IndexResult<Vec<Edge>> {
    let symbols = index.symbols();
    let mut edges = Vec::with_capacity(symbols.len() * 2);
    for symbol in symbols {
        let id = |category| {
            index
                .id_of(&NodeKey::categorized(symbol, category))
                .ok_or_else(|| IndexError::UnknownSymbol {
                    symbol: format!("{symbol} {category}"),
                })
        };
        let (dna, rna, protein) = (id(Category::Dna)?, id(Category::Rna)?, id(Category::Protein)?);
        edges.push(Edge::new(dna, rna, EdgeKind::Transcribed));
        edges.push(Edge::new(rna, protein, EdgeKind::Translated));
    }
    Ok(edges)
}

/// Synthetic edges followed by one Protein–Protein edge per relation.
pub fn derive_edges(index: &NodeIndex, relations: &[Relation]) -> IndexResult<Vec<Edge>> {
    let mut edges = synthetic_edges(index)?;
    edges.extend(index.edges_for(relations)?);
    Ok(edges)
}

/// Synthetic edges followed by the edges of a plain edge list, remapped from
/// plain identifiers to the Protein identifiers of the same symbols.
pub fn derive_edges_from_list(
    plain: &NodeIndex,
    enriched: &NodeIndex,
    edges: &[Edge],
) -> IndexResult<Vec<Edge>> {
    let symbol_of = |id: crate::node::NodeId| {
        plain
            .label(id)
            .map(|label| label.symbol.as_str())
            .ok_or(IndexError::UnknownId { id: id.get() })
    };
    let mut derived = synthetic_edges(enriched)?;
    for edge in edges {
        derived.push(Edge::new(
            enriched.interaction_node(symbol_of(edge.source)?)?,
            enriched.interaction_node(symbol_of(edge.target)?)?,
            edge.kind.clone(),
        ));
    }
    Ok(derived)
}

/// Full enrichment of a relation list: gather metadata (if a lookup is
/// given), expand nodes, derive edges.
pub fn enrich_relations(
    relations: &[Relation],
    lookup: Option<&dyn IdentifierLookup>,
) -> IndexResult<Enrichment> {
    let metadata = lookup.map(|l| {
        gather_identifiers(crate::graph::index::distinct_symbols(relations), l)
    });
    let index = expand_nodes(relations, metadata.as_ref())?;
    let edges = derive_edges(&index, relations)?;
    tracing::info!(nodes = index.len(), edges = edges.len(), "enriched network");
    Ok(Enrichment { index, edges })
}

/// Enrichment of a plain node list and its edge list.
///
/// Symbols are taken in node-list order. Without a lookup every label is a
/// bare DNA/RNA/Protein label.
pub fn enrich_lists(
    plain: &NodeIndex,
    edges: &[Edge],
    lookup: Option<&dyn IdentifierLookup>,
) -> IndexResult<Enrichment> {
    let symbols = plain.symbols();
    let metadata = lookup.map(|l| gather_identifiers(symbols.iter(), l));
    let index = NodeIndex::enriched_from_symbols(&symbols, metadata.as_ref())?;
    let edges = derive_edges_from_list(plain, &index, edges)?;
    tracing::info!(nodes = index.len(), edges = edges.len(), "enriched node list");
    Ok(Enrichment { index, edges })
}
