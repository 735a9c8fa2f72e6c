//! Core node types for the interaction network.
//!
//! Every node of a network is identified by a [`NodeId`] and described by a
//! [`NodeLabel`]. In plain networks a label is just the gene/protein symbol;
//! in enriched networks each symbol is split into three labels, one per
//! molecular [`Category`].

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// Unique, niche-optimized identifier for a node.
///
/// Identifiers are 1-based, so `NonZeroU64` lets `Option<NodeId>` stay the
/// same size as `NodeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// The first identifier handed out by an index.
    pub const FIRST: NodeId = NodeId(NonZeroU64::MIN);

    /// Create a `NodeId` from a raw `u64`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(NodeId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// The identifier following this one.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(NodeId)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Molecular category of an enriched node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Dna,
    Rna,
    Protein,
}

impl Category {
    /// All categories in allocation order (DNA, RNA, Protein).
    pub const ALL: [Category; 3] = [Category::Dna, Category::Rna, Category::Protein];

    /// The tag written to node lists and used in node names.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Dna => "DNA",
            Category::Rna => "RNA",
            Category::Protein => "Protein",
        }
    }

    /// Parse the leading category tag of a category label such as
    /// `"DNA HGNC:11998/ENSG00000141510"` or `"Protein"`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.split_whitespace().next()? {
            "DNA" => Some(Category::Dna),
            "RNA" => Some(Category::Rna),
            "Protein" => Some(Category::Protein),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How nodes are named when a graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeStyle {
    /// `"TP53"` in plain mode, `"TP53 Protein"` in enriched mode.
    #[default]
    Symbol,
    /// Registry identifiers instead of symbols where available,
    /// e.g. `"DNA HGNC:11998"` or `"Protein P04637"`.
    Identifier,
}

/// Reverse-lookup key of a node: its symbol plus optional category.
///
/// Annotations are derived from the symbol, so two labels with the same key
/// denote the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub symbol: String,
    pub category: Option<Category>,
}

impl NodeKey {
    pub fn plain(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            category: None,
        }
    }

    pub fn categorized(symbol: impl Into<String>, category: Category) -> Self {
        Self {
            symbol: symbol.into(),
            category: Some(category),
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.category {
            Some(category) => write!(f, "{} {}", self.symbol, category),
            None => f.write_str(&self.symbol),
        }
    }
}

/// Label of a node in a [`NodeIndex`](crate::graph::index::NodeIndex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeLabel {
    /// Gene/protein symbol the node was derived from.
    pub symbol: String,
    /// Molecular category; `None` in plain networks.
    pub category: Option<Category>,
    /// Registry annotation, e.g. `"HGNC:11998/ENSG00000141510"` for DNA
    /// or `"P04637"` for Protein.
    pub annotation: Option<String>,
}

impl NodeLabel {
    /// A plain (non-enriched) label.
    pub fn plain(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            category: None,
            annotation: None,
        }
    }

    /// An enriched label with an optional registry annotation.
    pub fn categorized(
        symbol: impl Into<String>,
        category: Category,
        annotation: Option<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            category: Some(category),
            annotation: annotation.filter(|a| !a.is_empty()),
        }
    }

    /// Rebuild a label from the third column of an enriched node list.
    ///
    /// Unknown category tags keep the whole column as annotation of a plain label.
    pub fn from_category_label(symbol: impl Into<String>, label: &str) -> Self {
        let label = label.trim();
        match Category::from_label(label) {
            Some(category) => {
                let rest = label
                    .split_once(char::is_whitespace)
                    .map(|(_, rest)| rest.trim().to_string());
                Self::categorized(symbol, category, rest)
            }
            None => Self {
                symbol: symbol.into(),
                category: None,
                annotation: Some(label.to_string()).filter(|a| !a.is_empty()),
            },
        }
    }

    pub fn key(&self) -> NodeKey {
        NodeKey {
            symbol: self.symbol.clone(),
            category: self.category,
        }
    }

    /// The category column of an enriched node list: `"DNA HGNC:5/ENSG…"`,
    /// `"RNA"`, `"Protein P04637"`. `None` for plain labels.
    pub fn category_label(&self) -> Option<String> {
        let category = self.category?;
        Some(match &self.annotation {
            Some(annotation) => format!("{category} {annotation}"),
            None => category.to_string(),
        })
    }

    /// Name of the graph node built from this label.
    pub fn node_name(&self, style: NodeStyle) -> String {
        let Some(category) = self.category else {
            return self.symbol.clone();
        };
        match (style, category, &self.annotation) {
            (NodeStyle::Symbol, _, _) => format!("{} {}", self.symbol, category),
            // Only the HGNC part of a DNA annotation, the Ensembl part follows the `/`.
            (NodeStyle::Identifier, Category::Dna, Some(annotation)) => {
                let hgnc = annotation.split('/').next().unwrap_or(annotation).trim();
                format!("DNA {hgnc}")
            }
            (NodeStyle::Identifier, Category::Protein, Some(annotation)) => {
                format!("Protein {annotation}")
            }
            (NodeStyle::Identifier, _, _) => format!("{} {}", category, self.symbol),
        }
    }
}

impl std::fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.category_label() {
            Some(label) => write!(f, "{} {}", self.symbol, label),
            None => f.write_str(&self.symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_is_one_based() {
        assert!(NodeId::new(0).is_none());
        assert_eq!(NodeId::FIRST.get(), 1);
        assert_eq!(NodeId::FIRST.next().unwrap().get(), 2);
        assert_eq!(
            std::mem::size_of::<Option<NodeId>>(),
            std::mem::size_of::<NodeId>()
        );
    }

    #[test]
    fn category_label_round_trip() {
        let dna = NodeLabel::categorized(
            "TP53",
            Category::Dna,
            Some("HGNC:11998/ENSG00000141510".into()),
        );
        let column = dna.category_label().unwrap();
        assert_eq!(column, "DNA HGNC:11998/ENSG00000141510");
        assert_eq!(NodeLabel::from_category_label("TP53", &column), dna);

        let rna = NodeLabel::from_category_label("TP53", "RNA");
        assert_eq!(rna.category, Some(Category::Rna));
        assert!(rna.annotation.is_none());
    }

    #[test]
    fn node_names_per_style() {
        let dna = NodeLabel::categorized(
            "TP53",
            Category::Dna,
            Some("HGNC:11998/ENSG00000141510".into()),
        );
        let rna = NodeLabel::categorized("TP53", Category::Rna, None);
        let protein = NodeLabel::categorized("TP53", Category::Protein, Some("P04637".into()));

        assert_eq!(dna.node_name(NodeStyle::Symbol), "TP53 DNA");
        assert_eq!(dna.node_name(NodeStyle::Identifier), "DNA HGNC:11998");
        assert_eq!(rna.node_name(NodeStyle::Identifier), "RNA TP53");
        assert_eq!(protein.node_name(NodeStyle::Identifier), "Protein P04637");
        assert_eq!(NodeLabel::plain("AR").node_name(NodeStyle::Identifier), "AR");
    }

    #[test]
    fn bare_labels_stay_unique_in_identifier_style() {
        let a = NodeLabel::categorized("AR", Category::Dna, None);
        let b = NodeLabel::categorized("USP14", Category::Dna, None);
        assert_ne!(
            a.node_name(NodeStyle::Identifier),
            b.node_name(NodeStyle::Identifier)
        );
    }
}
