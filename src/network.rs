//! Network facade: one analysis session over one interaction network.
//!
//! A [`Network`] owns its node index, its identifier-level edges and the
//! graph built from them. Sessions never share state; two sessions over the
//! same input build independent instances.

use std::path::{Path, PathBuf};

use crate::enrich::lookup::IdentifierLookup;
use crate::enrich::{self, Enrichment};
use crate::error::{NetworkError, PpiResult};
use crate::graph::analytics::{self, StatisticsSummary};
use crate::graph::build::GraphBuilder;
use crate::graph::index::{IndexScheme, NodeIndex};
use crate::graph::traverse::{self, NodePath};
use crate::graph::{Edge, NetworkGraph};
use crate::node::NodeStyle;
use crate::relation::{self, FileRole, Relation};
use crate::render::{self, Coloring, RenderRequest, Renderer};

/// Where a session reads its network from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkInput {
    /// A raw comma-separated PPI file.
    Ppi(PathBuf),
    /// A node list and its edge list.
    Lists { nodes: PathBuf, edges: PathBuf },
}

impl NetworkInput {
    /// Select the input from optional command-line arguments.
    ///
    /// A PPI file excludes node and edge lists. A node list needs an edge
    /// list. The two lists may be given in either order; their roles are
    /// detected from their content.
    pub fn from_args(
        ppi: Option<PathBuf>,
        nodes: Option<PathBuf>,
        edges: Option<PathBuf>,
    ) -> PpiResult<Self> {
        match (ppi, nodes, edges) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                Err(NetworkError::ConflictingInputs.into())
            }
            (Some(ppi), None, None) => Ok(Self::Ppi(ppi)),
            (None, Some(nodes), Some(edges)) => Self::lists(nodes, edges),
            _ => Err(NetworkError::MissingInput.into()),
        }
    }

    /// Node and edge lists, swapped if they were given in the wrong order.
    pub fn lists(first: PathBuf, second: PathBuf) -> PpiResult<Self> {
        let roles = (relation::detect_role(&first)?, relation::detect_role(&second)?);
        match roles {
            (FileRole::NodeList, FileRole::EdgeList) => Ok(Self::Lists {
                nodes: first,
                edges: second,
            }),
            (FileRole::EdgeList, FileRole::NodeList) => {
                tracing::debug!("node and edge lists given in reverse order");
                Ok(Self::Lists {
                    nodes: second,
                    edges: first,
                })
            }
            (FileRole::NodeList, found) => Err(NetworkError::WrongRole {
                path: second.display().to_string(),
                expected: FileRole::EdgeList.to_string(),
                found: found.to_string(),
            }
            .into()),
            (found, _) => Err(NetworkError::WrongRole {
                path: first.display().to_string(),
                expected: FileRole::NodeList.to_string(),
                found: found.to_string(),
            }
            .into()),
        }
    }
}

/// How a session builds its network.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Split every symbol into DNA, RNA and Protein nodes.
    pub enrich: bool,
    /// Naming of enriched graph nodes.
    pub style: NodeStyle,
}

/// One analysis session.
#[derive(Debug, Clone)]
pub struct Network {
    index: NodeIndex,
    edges: Vec<Edge>,
    graph: NetworkGraph,
}

impl Network {
    /// Assemble a session from an index and its edges.
    pub fn from_parts(index: NodeIndex, edges: Vec<Edge>, style: NodeStyle) -> PpiResult<Self> {
        let graph = GraphBuilder::with_style(style).build(&index, &edges)?;
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            enriched = index.scheme() == IndexScheme::Enriched,
            "network ready"
        );
        Ok(Self {
            index,
            edges,
            graph,
        })
    }

    /// Build from parsed relations.
    pub fn from_relations(
        relations: &[Relation],
        options: BuildOptions,
        lookup: Option<&dyn IdentifierLookup>,
    ) -> PpiResult<Self> {
        if options.enrich {
            let Enrichment { index, edges } = enrich::enrich_relations(relations, lookup)?;
            Self::from_parts(index, edges, options.style)
        } else {
            let index = NodeIndex::plain(relations)?;
            let edges = index.edges_for(relations)?;
            Self::from_parts(index, edges, options.style)
        }
    }

    /// Build from a raw PPI file.
    pub fn from_ppi_file(
        path: &Path,
        options: BuildOptions,
        lookup: Option<&dyn IdentifierLookup>,
    ) -> PpiResult<Self> {
        let relations = relation::read_ppis(path)?;
        Self::from_relations(&relations, options, lookup)
    }

    /// Build from a node list and an edge list.
    ///
    /// An enriched node list is used as is. A plain node list is enriched
    /// when `options.enrich` is set.
    pub fn from_lists(
        nodes: &Path,
        edges: &Path,
        options: BuildOptions,
        lookup: Option<&dyn IdentifierLookup>,
    ) -> PpiResult<Self> {
        let index = NodeIndex::from_rows(&relation::read_node_list(nodes)?)?;
        let edges = relation::read_edge_list(edges)?;
        if options.enrich && index.scheme() == IndexScheme::Plain {
            let Enrichment { index, edges } = enrich::enrich_lists(&index, &edges, lookup)?;
            return Self::from_parts(index, edges, options.style);
        }
        Self::from_parts(index, edges, options.style)
    }

    /// Build from either kind of input.
    pub fn open(
        input: &NetworkInput,
        options: BuildOptions,
        lookup: Option<&dyn IdentifierLookup>,
    ) -> PpiResult<Self> {
        match input {
            NetworkInput::Ppi(path) => Self::from_ppi_file(path, options, lookup),
            NetworkInput::Lists { nodes, edges } => {
                Self::from_lists(nodes, edges, options, lookup)
            }
        }
    }

    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn is_enriched(&self) -> bool {
        self.index.scheme() == IndexScheme::Enriched
    }

    /// Write the node list of this session.
    pub fn write_node_list(&self, path: &Path) -> PpiResult<()> {
        Ok(self.index.write_node_list(path)?)
    }

    /// Write the edge list of this session.
    pub fn write_edge_list(&self, path: &Path) -> PpiResult<()> {
        Ok(relation::write_edge_list(path, &self.edges)?)
    }

    /// Graph node name of a user-supplied name.
    ///
    /// Node names are used as given. In enriched networks a bare symbol
    /// resolves to its Protein node.
    pub fn resolve_node(&self, name: &str) -> String {
        if self.graph.has_node(name) || !self.is_enriched() {
            return name.to_string();
        }
        self.index
            .interaction_node(name)
            .ok()
            .and_then(|id| self.index.label(id))
            .and_then(|label| {
                let candidate = label.node_name(NodeStyle::Symbol);
                if self.graph.has_node(&candidate) {
                    return Some(candidate);
                }
                let candidate = label.node_name(NodeStyle::Identifier);
                self.graph.has_node(&candidate).then_some(candidate)
            })
            .unwrap_or_else(|| name.to_string())
    }

    /// All shortest paths between two nodes. Empty if they are disconnected.
    pub fn shortest_paths(&self, source: &str, target: &str) -> PpiResult<Vec<NodePath>> {
        let source = self.resolve_node(source);
        let target = self.resolve_node(target);
        let paths = traverse::all_shortest_paths(&self.graph, &source, &target)?;
        if paths.is_empty() {
            tracing::warn!(%source, %target, "no path found");
        }
        Ok(paths)
    }

    /// Summary statistics, with the category breakdown for enriched networks.
    pub fn statistics(&self) -> PpiResult<StatisticsSummary> {
        Ok(analytics::summarize(&self.graph, self.is_enriched())?)
    }

    /// Default coloring: by category for enriched networks, uniform otherwise.
    pub fn coloring(&self) -> Coloring {
        if self.is_enriched() {
            render::category_coloring(&self.graph)
        } else {
            Coloring::uniform(render::Color::Red, render::Color::Black)
        }
    }

    /// Draw the graph with the given coloring.
    pub fn render(
        &self,
        renderer: &dyn Renderer,
        path: &Path,
        coloring: &Coloring,
        edge_labels: bool,
    ) -> PpiResult<()> {
        render::check_output_path(path)?;
        let request = RenderRequest {
            graph: &self.graph,
            coloring,
            edge_labels,
        };
        Ok(renderer.render(&request, path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PpiError;

    const PPIS: &str = "\
source,interaction,target
USP14,physical association,AR
AR,association,CREBBP
CREBBP,association,EP300
";

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn input_selection() {
        let dir = tempfile::TempDir::new().unwrap();
        let ppi = write(dir.path(), "ppis.csv", PPIS);
        let nodes = write(dir.path(), "nodes.tsv", "1\tA\n2\tB\n");
        let edges = write(dir.path(), "edges.tsv", "1\t2\tassociation\n");

        assert_eq!(
            NetworkInput::from_args(Some(ppi.clone()), None, None).unwrap(),
            NetworkInput::Ppi(ppi.clone())
        );
        assert!(matches!(
            NetworkInput::from_args(Some(ppi), Some(nodes.clone()), Some(edges.clone())),
            Err(PpiError::Network(NetworkError::ConflictingInputs))
        ));
        assert!(matches!(
            NetworkInput::from_args(None, Some(nodes.clone()), None),
            Err(PpiError::Network(NetworkError::MissingInput))
        ));
        // Reversed order is detected from content.
        assert_eq!(
            NetworkInput::from_args(None, Some(edges.clone()), Some(nodes.clone())).unwrap(),
            NetworkInput::Lists { nodes, edges }
        );
    }

    #[test]
    fn two_node_lists_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = write(dir.path(), "a.tsv", "1\tA\n");
        let b = write(dir.path(), "b.tsv", "1\tB\n");
        assert!(matches!(
            NetworkInput::lists(a, b),
            Err(PpiError::Network(NetworkError::WrongRole { .. }))
        ));
    }

    #[test]
    fn lists_reproduce_the_ppi_session() {
        let dir = tempfile::TempDir::new().unwrap();
        let ppi = write(dir.path(), "ppis.csv", PPIS);
        let direct = Network::from_ppi_file(&ppi, BuildOptions::default(), None).unwrap();

        let nodes = dir.path().join("nodes.tsv");
        let edges = dir.path().join("edges.tsv");
        direct.write_node_list(&nodes).unwrap();
        direct.write_edge_list(&edges).unwrap();

        let reread = Network::from_lists(&nodes, &edges, BuildOptions::default(), None).unwrap();
        assert_eq!(reread.graph().node_names(), direct.graph().node_names());
        assert_eq!(reread.graph().edge_count(), direct.graph().edge_count());
    }

    #[test]
    fn enriching_a_plain_node_list() {
        let dir = tempfile::TempDir::new().unwrap();
        let ppi = write(dir.path(), "ppis.csv", PPIS);
        let plain = Network::from_ppi_file(&ppi, BuildOptions::default(), None).unwrap();
        let nodes = dir.path().join("nodes.tsv");
        let edges = dir.path().join("edges.tsv");
        plain.write_node_list(&nodes).unwrap();
        plain.write_edge_list(&edges).unwrap();

        let options = BuildOptions {
            enrich: true,
            ..Default::default()
        };
        let enriched = Network::from_lists(&nodes, &edges, options, None).unwrap();
        assert!(enriched.is_enriched());
        let stats = enriched.statistics().unwrap();
        let breakdown = stats.breakdown.unwrap();
        assert_eq!(breakdown.dna, 4);
        assert_eq!(breakdown.ppi, 3);
    }

    #[test]
    fn enriched_paths_accept_bare_symbols() {
        let relations = relation::parse_ppis(PPIS, "inline").unwrap();
        let options = BuildOptions {
            enrich: true,
            ..Default::default()
        };
        let network = Network::from_relations(&relations, options, None).unwrap();
        let paths = network.shortest_paths("USP14", "EP300").unwrap();
        assert_eq!(
            paths,
            vec![vec!["USP14 Protein", "AR Protein", "CREBBP Protein", "EP300 Protein"]]
        );
    }

    #[test]
    fn missing_node_is_reported() {
        let relations = relation::parse_ppis(PPIS, "inline").unwrap();
        let network = Network::from_relations(&relations, BuildOptions::default(), None).unwrap();
        assert!(matches!(
            network.shortest_paths("USP14", "BRCA1"),
            Err(PpiError::Graph(_))
        ));
    }
}
