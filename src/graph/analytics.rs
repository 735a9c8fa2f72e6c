//! Summary statistics of an interaction network.
//!
//! Two schemas share one record: the plain summary (counts, density,
//! average node connectivity) and, for enriched networks, an additional
//! per-category breakdown of nodes and edges.
//!
//! Two conventions are kept for compatibility with existing outputs:
//! - density is `edges / (nodes - 1)`, not `2E / (N(N-1))`
//! - average node connectivity sums the local connectivity of the endpoints
//!   of every edge and divides by the number of node pairs `C(N, 2)`

use std::collections::VecDeque;

use petgraph::graph::NodeIndex as PetIndex;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::error::StatsError;
use crate::node::Category;

use super::{EdgeKind, NetworkGraph};

/// Result type for statistics.
pub type StatsResult<T> = std::result::Result<T, StatsError>;

/// Node and edge counts per category of an enriched network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub dna: usize,
    pub rna: usize,
    pub protein: usize,
    pub transcribed: usize,
    pub translated: usize,
    pub ppi: usize,
}

/// Summary statistics of one network, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub average_node_connectivity: f64,
    /// Present only for enriched networks.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CategoryBreakdown>,
}

impl StatisticsSummary {
    /// Field names and rendered values, in export column order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("nodes", self.nodes.to_string()),
            ("edges", self.edges.to_string()),
            ("density", self.density.to_string()),
            (
                "average_node_connectivity",
                self.average_node_connectivity.to_string(),
            ),
        ];
        if let Some(b) = &self.breakdown {
            fields.extend([
                ("dna", b.dna.to_string()),
                ("rna", b.rna.to_string()),
                ("protein", b.protein.to_string()),
                ("transcribed", b.transcribed.to_string()),
                ("translated", b.translated.to_string()),
                ("ppi", b.ppi.to_string()),
            ]);
        }
        fields
    }
}

/// Node-count density: `edges / (nodes - 1)`.
pub fn density(nodes: usize, edges: usize) -> StatsResult<f64> {
    if nodes <= 1 {
        return Err(StatsError::DegenerateGraph { nodes });
    }
    Ok(edges as f64 / (nodes - 1) as f64)
}

/// Count nodes by category and edges by kind.
pub fn category_breakdown(graph: &NetworkGraph) -> CategoryBreakdown {
    let g = graph.graph();
    let mut breakdown = CategoryBreakdown::default();
    for node in g.node_weights() {
        match node.category {
            Some(Category::Dna) => breakdown.dna += 1,
            Some(Category::Rna) => breakdown.rna += 1,
            Some(Category::Protein) => breakdown.protein += 1,
            None => {}
        }
    }
    for kind in g.edge_weights() {
        match kind {
            EdgeKind::Transcribed => breakdown.transcribed += 1,
            EdgeKind::Translated => breakdown.translated += 1,
            EdgeKind::Interaction(_) => breakdown.ppi += 1,
        }
    }
    breakdown
}

/// Compute the summary of a graph. `enriched` adds the category breakdown.
///
/// Fails with [`StatsError::DegenerateGraph`] for graphs with fewer than two nodes.
pub fn summarize(graph: &NetworkGraph, enriched: bool) -> StatsResult<StatisticsSummary> {
    let nodes = graph.node_count();
    let edges = graph.edge_count();
    let density = density(nodes, edges)?;
    let average_node_connectivity = average_node_connectivity(graph)?;
    let breakdown = enriched.then(|| category_breakdown(graph));

    tracing::info!(nodes, edges, density, average_node_connectivity, "statistics computed");
    Ok(StatisticsSummary {
        nodes,
        edges,
        density,
        average_node_connectivity,
        breakdown,
    })
}

/// Sum of the local node connectivity over all edges, divided by `C(N, 2)`.
///
/// Self-loops contribute nothing.
pub fn average_node_connectivity(graph: &NetworkGraph) -> StatsResult<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return Err(StatsError::DegenerateGraph { nodes: n });
    }
    let flow = SplitFlow::new(graph);
    let total: usize = graph
        .graph()
        .edge_references()
        .filter(|e| e.source() != e.target())
        .map(|e| flow.max_flow(e.source(), e.target()))
        .sum();
    let pairs = (n * (n - 1) / 2) as f64;
    Ok(total as f64 / pairs)
}

/// Local node connectivity between two named nodes: the maximum number of
/// internally vertex-disjoint paths, a direct edge counting as one path.
///
/// `None` if either node is missing or both names are the same.
pub fn local_node_connectivity(graph: &NetworkGraph, a: &str, b: &str) -> Option<usize> {
    let (a, b) = (graph.index_of(a)?, graph.index_of(b)?);
    if a == b {
        return None;
    }
    Some(SplitFlow::new(graph).max_flow(a, b))
}

// ---------------------------------------------------------------------------
// Vertex-split unit-capacity flow network
// ---------------------------------------------------------------------------

/// Residual arc: head node, capacity, and index of the reverse arc.
#[derive(Debug, Clone, Copy)]
struct Arc {
    to: usize,
    cap: u32,
    rev: usize,
}

/// Every graph node `v` becomes `v_in = 2v` and `v_out = 2v + 1` joined by a
/// unit arc; every undirected edge becomes `u_out → v_in` and `v_out → u_in`.
struct SplitFlow {
    arcs: Vec<Vec<Arc>>,
}

impl SplitFlow {
    fn new(graph: &NetworkGraph) -> Self {
        let g = graph.graph();
        let mut flow = Self {
            arcs: vec![Vec::new(); g.node_count() * 2],
        };
        for v in g.node_indices() {
            flow.add_arc(2 * v.index(), 2 * v.index() + 1);
        }
        for e in g.edge_references() {
            let (u, v) = (e.source().index(), e.target().index());
            if u == v {
                continue;
            }
            flow.add_arc(2 * u + 1, 2 * v);
            flow.add_arc(2 * v + 1, 2 * u);
        }
        flow
    }

    fn add_arc(&mut self, from: usize, to: usize) {
        let rev_from = self.arcs[to].len();
        let rev_to = self.arcs[from].len();
        self.arcs[from].push(Arc {
            to,
            cap: 1,
            rev: rev_from,
        });
        self.arcs[to].push(Arc {
            to: from,
            cap: 0,
            rev: rev_to,
        });
    }

    /// Edmonds–Karp from `s_out` to `t_in` on a fresh copy of the residual network.
    fn max_flow(&self, s: PetIndex, t: PetIndex) -> usize {
        let source = 2 * s.index() + 1;
        let sink = 2 * t.index();
        let mut arcs = self.arcs.clone();
        let mut total = 0;

        loop {
            // parent[v] = (previous node, arc index within previous node)
            let mut parent: Vec<Option<(usize, usize)>> = vec![None; arcs.len()];
            let mut queue = VecDeque::from([source]);
            let mut reached = false;
            while let Some(u) = queue.pop_front() {
                for (i, arc) in arcs[u].iter().enumerate() {
                    if arc.cap > 0 && arc.to != source && parent[arc.to].is_none() {
                        parent[arc.to] = Some((u, i));
                        if arc.to == sink {
                            reached = true;
                            break;
                        }
                        queue.push_back(arc.to);
                    }
                }
                if reached {
                    break;
                }
            }
            if !reached {
                return total;
            }

            // Unit capacities: every augmenting path carries exactly one unit.
            let mut v = sink;
            while let Some((u, i)) = parent[v] {
                arcs[u][i].cap -= 1;
                let rev = arcs[u][i].rev;
                arcs[v][rev].cap += 1;
                v = u;
                if v == source {
                    break;
                }
            }
            total += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> NetworkGraph {
        let mut g = NetworkGraph::new();
        for (a, b) in edges {
            let a = g.ensure_node(a, None);
            let b = g.ensure_node(b, None);
            g.connect(a, b, EdgeKind::interaction("association"));
        }
        g
    }

    #[test]
    fn single_edge_density_is_one() {
        let g = graph(&[("A", "B")]);
        let summary = summarize(&g, false).unwrap();
        assert_eq!(summary.nodes, 2);
        assert_eq!(summary.edges, 1);
        assert_eq!(summary.density, 1.0);
        // One edge of connectivity 1 over one pair.
        assert_eq!(summary.average_node_connectivity, 1.0);
        assert!(summary.breakdown.is_none());
    }

    #[test]
    fn degenerate_graphs_fail() {
        let mut g = NetworkGraph::new();
        assert!(matches!(
            summarize(&g, false),
            Err(StatsError::DegenerateGraph { nodes: 0 })
        ));
        g.ensure_node("A", None);
        assert!(matches!(density(1, 0), Err(StatsError::DegenerateGraph { nodes: 1 })));
        assert!(summarize(&g, false).is_err());
    }

    #[test]
    fn triangle_connectivity() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "A")]);
        // Direct edge plus the path through the third node.
        assert_eq!(local_node_connectivity(&g, "A", "B"), Some(2));
        let summary = summarize(&g, false).unwrap();
        assert_eq!(summary.density, 1.5);
        // (2 + 2 + 2) / C(3, 2)
        assert_eq!(summary.average_node_connectivity, 2.0);
    }

    #[test]
    fn shared_inner_vertex_counts_once() {
        // A and D are joined by two paths that both pass through B.
        let g = graph(&[("A", "B"), ("B", "C"), ("B", "E"), ("C", "D"), ("E", "D")]);
        assert_eq!(local_node_connectivity(&g, "A", "D"), Some(1));
        assert_eq!(local_node_connectivity(&g, "B", "D"), Some(2));
        assert_eq!(local_node_connectivity(&g, "A", "A"), None);
        assert_eq!(local_node_connectivity(&g, "A", "Z"), None);
    }

    #[test]
    fn enriched_breakdown_counts_categories() {
        let relations = vec![
            crate::relation::Relation::new("A", "association", "B"),
            crate::relation::Relation::new("B", "association", "C"),
        ];
        let enrichment = crate::enrich::enrich_relations(&relations, None).unwrap();
        let g = crate::graph::build::GraphBuilder::new()
            .build(&enrichment.index, &enrichment.edges)
            .unwrap();
        let summary = summarize(&g, true).unwrap();
        let b = summary.breakdown.unwrap();
        assert_eq!((b.dna, b.rna, b.protein), (3, 3, 3));
        assert_eq!((b.transcribed, b.translated, b.ppi), (3, 3, 2));
        assert_eq!(summary.nodes, 9);
        assert_eq!(summary.edges, 8);
    }

    #[test]
    fn fields_follow_schema() {
        let g = graph(&[("A", "B")]);
        let plain = summarize(&g, false).unwrap();
        assert_eq!(plain.fields().len(), 4);
        let names: Vec<_> = plain.fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["nodes", "edges", "density", "average_node_connectivity"]);
    }
}
