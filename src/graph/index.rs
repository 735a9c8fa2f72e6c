//! Bidirectional node index.
//!
//! Maps 1-based [`NodeId`]s to [`NodeLabel`]s and back. Two schemes exist:
//! - **plain**: one node per distinct symbol, labeled by the symbol
//! - **enriched**: three consecutive nodes per symbol, labeled DNA, RNA and Protein
//!
//! Both directions are maintained as hash maps built on insertion, so reverse
//! lookups are O(1) and a second label with the same key is rejected instead
//! of silently shadowing the first.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::enrich::lookup::MetadataMap;
use crate::error::IndexError;
use crate::relation::{self, NodeRow, Relation, RelationResult};
use crate::node::{Category, NodeId, NodeKey, NodeLabel};

use super::{Edge, EdgeKind};

/// Result type for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Labeling scheme of a [`NodeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexScheme {
    Plain,
    Enriched,
}

/// Distinct symbols referenced as source or target, in first-appearance order.
///
/// The order is deterministic for a given relation list, so identifiers
/// assigned from it are reproducible across the node-list and edge-list
/// writes of one session.
pub fn distinct_symbols(relations: &[Relation]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for rel in relations {
        for symbol in [&rel.source, &rel.target] {
            if seen.insert(symbol.as_str()) {
                symbols.push(symbol.clone());
            }
        }
    }
    symbols
}

/// Bijection between node identifiers and node labels.
#[derive(Debug, Clone)]
pub struct NodeIndex {
    scheme: IndexScheme,
    /// Labels in insertion order.
    entries: Vec<(NodeId, NodeLabel)>,
    /// NodeId → position in `entries`.
    by_id: HashMap<NodeId, usize>,
    /// Reverse map used for edge remapping.
    by_key: HashMap<NodeKey, NodeId>,
    next_id: NodeId,
}

impl NodeIndex {
    /// Create an empty index.
    pub fn new(scheme: IndexScheme) -> Self {
        Self {
            scheme,
            entries: Vec::new(),
            by_id: HashMap::new(),
            by_key: HashMap::new(),
            next_id: NodeId::FIRST,
        }
    }

    /// Build a plain index: one identifier per distinct symbol, starting at 1.
    pub fn plain(relations: &[Relation]) -> IndexResult<Self> {
        let mut index = Self::new(IndexScheme::Plain);
        for symbol in distinct_symbols(relations) {
            index.insert(NodeLabel::plain(symbol))?;
        }
        Ok(index)
    }

    /// Build an enriched index from the symbols of a relation list.
    ///
    /// Symbols without metadata get bare DNA/RNA/Protein labels.
    pub fn enriched(relations: &[Relation], metadata: Option<&MetadataMap>) -> IndexResult<Self> {
        Self::enriched_from_symbols(distinct_symbols(relations), metadata)
    }

    /// Build an enriched index from an explicit symbol sequence, e.g. the
    /// symbols of a plain node list.
    pub fn enriched_from_symbols<I, S>(symbols: I, metadata: Option<&MetadataMap>) -> IndexResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new(IndexScheme::Enriched);
        for symbol in symbols {
            let symbol = symbol.as_ref();
            let meta = metadata.and_then(|m| m.get(symbol));
            for category in Category::ALL {
                let annotation = meta.and_then(|m| m.annotation(category));
                index.insert(NodeLabel::categorized(symbol, category, annotation))?;
            }
        }
        Ok(index)
    }

    /// Rebuild an index from node-list rows, keeping their identifiers.
    pub fn from_rows(rows: &[NodeRow]) -> IndexResult<Self> {
        let scheme = if rows.iter().any(|r| r.label.category.is_some()) {
            IndexScheme::Enriched
        } else {
            IndexScheme::Plain
        };
        let mut index = Self::new(scheme);
        for row in rows {
            index.insert_with_id(row.id, row.label.clone())?;
        }
        Ok(index)
    }

    /// Insert a label under the next free identifier.
    pub fn insert(&mut self, label: NodeLabel) -> IndexResult<NodeId> {
        let id = self.next_id;
        self.insert_with_id(id, label)?;
        Ok(id)
    }

    /// Insert a label under an explicit identifier.
    pub fn insert_with_id(&mut self, id: NodeId, label: NodeLabel) -> IndexResult<()> {
        if self.by_id.contains_key(&id) {
            return Err(IndexError::DuplicateId { id: id.get() });
        }
        let key = label.key();
        if let Some(existing) = self.by_key.get(&key) {
            return Err(IndexError::AmbiguousLabel {
                label: key.to_string(),
                existing: existing.get(),
            });
        }
        self.by_key.insert(key, id);
        self.by_id.insert(id, self.entries.len());
        self.entries.push((id, label));
        if id >= self.next_id {
            self.next_id = id.next().unwrap_or(id);
        }
        Ok(())
    }

    pub fn scheme(&self) -> IndexScheme {
        self.scheme
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label of an identifier.
    pub fn label(&self, id: NodeId) -> Option<&NodeLabel> {
        self.by_id.get(&id).map(|&pos| &self.entries[pos].1)
    }

    /// Identifier of a label key.
    pub fn id_of(&self, key: &NodeKey) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// The node a symbol takes part in interactions through: the plain node,
    /// or the Protein node of an enriched index.
    pub fn interaction_node(&self, symbol: &str) -> IndexResult<NodeId> {
        let key = match self.scheme {
            IndexScheme::Plain => NodeKey::plain(symbol),
            IndexScheme::Enriched => NodeKey::categorized(symbol, Category::Protein),
        };
        self.id_of(&key).ok_or_else(|| IndexError::UnknownSymbol {
            symbol: symbol.to_string(),
        })
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeLabel)> {
        self.entries.iter().map(|(id, label)| (*id, label))
    }

    /// Identifier → label direction, used for serialization.
    pub fn labels_by_id(&self) -> BTreeMap<NodeId, &NodeLabel> {
        self.iter().collect()
    }

    /// Label key → identifier direction, used for edge remapping.
    pub fn ids_by_key(&self) -> &HashMap<NodeKey, NodeId> {
        &self.by_key
    }

    /// Distinct symbols in insertion order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|(_, label)| label.symbol.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Replace each relation's symbols by their interaction-node identifiers.
    pub fn edges_for(&self, relations: &[Relation]) -> IndexResult<Vec<Edge>> {
        relations
            .iter()
            .map(|rel| {
                Ok(Edge::new(
                    self.interaction_node(&rel.source)?,
                    self.interaction_node(&rel.target)?,
                    EdgeKind::interaction(rel.interaction.clone()),
                ))
            })
            .collect()
    }

    /// Rows as written to a node list.
    pub fn rows(&self) -> Vec<NodeRow> {
        self.iter()
            .map(|(id, label)| NodeRow {
                id,
                label: label.clone(),
            })
            .collect()
    }

    /// Write the node list: `id<TAB>symbol` or `id<TAB>symbol<TAB>category`.
    pub fn write_node_list(&self, path: &Path) -> RelationResult<()> {
        relation::write_tsv(
            path,
            self.iter().map(|(id, label)| {
                let mut row = vec![id.to_string(), label.symbol.clone()];
                row.extend(label.category_label());
                row
            }),
        )?;
        tracing::debug!(path = %path.display(), nodes = self.len(), "wrote node list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::lookup::{EnrichmentMetadata, HgncRecord};

    fn rels() -> Vec<Relation> {
        vec![
            Relation::new("USP14", "physical association", "AR"),
            Relation::new("AR", "association", "CREBBP"),
            Relation::new("CREBBP", "association", "USP14"),
        ]
    }

    #[test]
    fn plain_one_id_per_distinct_symbol() {
        let index = NodeIndex::plain(&rels()).unwrap();
        assert_eq!(index.len(), 3);
        let ids: Vec<u64> = index.iter().map(|(id, _)| id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(index.label(NodeId::new(1).unwrap()).unwrap().symbol, "USP14");
        assert_eq!(index.interaction_node("AR").unwrap().get(), 2);
    }

    #[test]
    fn plain_index_is_stable_between_calls() {
        let a = NodeIndex::plain(&rels()).unwrap();
        let b = NodeIndex::plain(&rels()).unwrap();
        assert_eq!(a.labels_by_id(), b.labels_by_id());
    }

    #[test]
    fn enriched_three_consecutive_ids_per_symbol() {
        let index = NodeIndex::enriched(&rels(), None).unwrap();
        assert_eq!(index.len(), 9);
        let labels: Vec<_> = index.iter().take(3).map(|(_, l)| l.clone()).collect();
        assert_eq!(labels[0], NodeLabel::categorized("USP14", Category::Dna, None));
        assert_eq!(labels[1], NodeLabel::categorized("USP14", Category::Rna, None));
        assert_eq!(labels[2], NodeLabel::categorized("USP14", Category::Protein, None));
        assert_eq!(index.interaction_node("AR").unwrap().get(), 6);
    }

    #[test]
    fn enriched_labels_carry_annotations() {
        let mut metadata = MetadataMap::new();
        metadata.insert(
            "AR".into(),
            EnrichmentMetadata::new(
                "AR",
                HgncRecord {
                    hgnc_id: Some("HGNC:644".into()),
                    ensembl_gene_id: Some("ENSG00000169083".into()),
                    uniprot_ids: vec!["P10275".into()],
                },
            ),
        );
        let index = NodeIndex::enriched(&rels(), Some(&metadata)).unwrap();
        let dna = index
            .label(index.id_of(&NodeKey::categorized("AR", Category::Dna)).unwrap())
            .unwrap();
        assert_eq!(dna.category_label().unwrap(), "DNA HGNC:644/ENSG00000169083");
        let protein = index.label(index.interaction_node("AR").unwrap()).unwrap();
        assert_eq!(protein.category_label().unwrap(), "Protein P10275");
        let bare = index.label(index.interaction_node("USP14").unwrap()).unwrap();
        assert_eq!(bare.category_label().unwrap(), "Protein");
    }

    #[test]
    fn duplicate_label_is_ambiguous() {
        let mut index = NodeIndex::new(IndexScheme::Plain);
        index.insert(NodeLabel::plain("AR")).unwrap();
        let err = index.insert(NodeLabel::plain("AR")).unwrap_err();
        assert!(matches!(err, IndexError::AmbiguousLabel { existing: 1, .. }));
    }

    #[test]
    fn from_rows_rejects_duplicate_ids() {
        let id = NodeId::new(4).unwrap();
        let rows = vec![
            NodeRow { id, label: NodeLabel::plain("A") },
            NodeRow { id, label: NodeLabel::plain("B") },
        ];
        assert!(matches!(
            NodeIndex::from_rows(&rows),
            Err(IndexError::DuplicateId { id: 4 })
        ));
    }

    #[test]
    fn from_rows_continues_numbering() {
        let rows = vec![NodeRow {
            id: NodeId::new(7).unwrap(),
            label: NodeLabel::plain("A"),
        }];
        let mut index = NodeIndex::from_rows(&rows).unwrap();
        assert_eq!(index.insert(NodeLabel::plain("B")).unwrap().get(), 8);
    }

    #[test]
    fn edges_for_unknown_symbol_fails() {
        let index = NodeIndex::plain(&rels()).unwrap();
        let err = index
            .edges_for(&[Relation::new("AR", "x", "BRCA1")])
            .unwrap_err();
        assert!(matches!(err, IndexError::UnknownSymbol { .. }));
    }

    #[test]
    fn node_list_round_trip_keeps_symbols() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nodes.tsv");
        let index = NodeIndex::plain(&rels()).unwrap();
        index.write_node_list(&path).unwrap();

        let rows = relation::read_node_list(&path).unwrap();
        let reread = NodeIndex::from_rows(&rows).unwrap();
        assert_eq!(reread.symbols(), index.symbols());
        assert_eq!(reread.scheme(), IndexScheme::Plain);
    }
}
