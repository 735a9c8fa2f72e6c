//! Shortest-path enumeration.
//!
//! BFS from the source records, for every reached node, all predecessors on a
//! shortest path. Backtracking from the target then yields every path of
//! minimum length. Edges are unweighted.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex as PetIndex;

use crate::error::GraphError;

use super::NetworkGraph;

/// A path as the sequence of node names from source to target.
pub type NodePath = Vec<String>;

fn resolve(graph: &NetworkGraph, name: &str) -> Result<PetIndex, GraphError> {
    graph.index_of(name).ok_or_else(|| GraphError::NodeNotFound {
        name: name.to_string(),
    })
}

/// All shortest paths between `source` and `target`.
///
/// Returns an empty list when the two nodes are disconnected. No particular
/// order of the paths is guaranteed.
pub fn all_shortest_paths(
    graph: &NetworkGraph,
    source: &str,
    target: &str,
) -> Result<Vec<NodePath>, GraphError> {
    let src = resolve(graph, source)?;
    let dst = resolve(graph, target)?;
    let g = graph.graph();

    let n = g.node_count();
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut preds: Vec<Vec<PetIndex>> = vec![Vec::new(); n];
    let mut queue = VecDeque::new();
    dist[src.index()] = Some(0);
    queue.push_back(src);

    while let Some(current) = queue.pop_front() {
        let Some(d) = dist[current.index()] else {
            continue;
        };
        // Nodes beyond the target's depth cannot be on a shortest path to it.
        if dist[dst.index()].is_some_and(|t| d >= t) {
            break;
        }
        for next in g.neighbors(current) {
            match dist[next.index()] {
                None => {
                    dist[next.index()] = Some(d + 1);
                    preds[next.index()].push(current);
                    queue.push_back(next);
                }
                Some(nd) if nd == d + 1 && !preds[next.index()].contains(&current) => {
                    preds[next.index()].push(current);
                }
                Some(_) => {}
            }
        }
    }

    if dist[dst.index()].is_none() {
        return Ok(Vec::new());
    }

    // Iterative backtracking: each stack entry is a partial path from the
    // target towards the source.
    let mut paths = Vec::new();
    let mut stack: Vec<Vec<PetIndex>> = vec![vec![dst]];
    while let Some(partial) = stack.pop() {
        let Some(&head) = partial.last() else {
            continue;
        };
        if head == src {
            paths.push(
                partial
                    .iter()
                    .rev()
                    .map(|&idx| g[idx].name.clone())
                    .collect(),
            );
            continue;
        }
        for &pred in &preds[head.index()] {
            let mut extended = partial.clone();
            extended.push(pred);
            stack.push(extended);
        }
    }

    tracing::debug!(source, target, paths = paths.len(), "shortest paths");
    Ok(paths)
}

/// Consecutive node pairs of a path.
pub fn path_edges(path: &[String]) -> impl Iterator<Item = (&str, &str)> {
    path.windows(2).map(|w| (w[0].as_str(), w[1].as_str()))
}

/// Verbose rendering of a path: `START : ***A -> B -> C  ***STOP`.
pub fn format_path(path: &[String]) -> String {
    format!("START : ***{}  ***STOP", path.join(" -> "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;

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
    fn diamond_has_two_paths() {
        let g = graph(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")]);
        let mut paths = all_shortest_paths(&g, "A", "E").unwrap();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                vec!["A", "B", "D", "E"].into_iter().map(String::from).collect::<Vec<_>>(),
                vec!["A", "C", "D", "E"].into_iter().map(String::from).collect::<Vec<_>>(),
            ]
        );
    }

    #[test]
    fn longer_alternatives_are_excluded() {
        let g = graph(&[("A", "B"), ("B", "C"), ("A", "X"), ("X", "Y"), ("Y", "C")]);
        let paths = all_shortest_paths(&g, "A", "C").unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0], vec!["A", "B", "C"]);
    }

    #[test]
    fn disconnected_is_empty_not_error() {
        let g = graph(&[("A", "B"), ("C", "D")]);
        assert!(all_shortest_paths(&g, "A", "D").unwrap().is_empty());
    }

    #[test]
    fn missing_endpoint_is_error() {
        let g = graph(&[("A", "B")]);
        let err = all_shortest_paths(&g, "A", "Z").unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound { name } if name == "Z"));
    }

    #[test]
    fn source_equals_target() {
        let g = graph(&[("A", "B")]);
        assert_eq!(all_shortest_paths(&g, "A", "A").unwrap(), vec![vec!["A".to_string()]]);
    }

    #[test]
    fn formatting() {
        let path: Vec<String> = vec!["A".into(), "B".into()];
        assert_eq!(format_path(&path), "START : ***A -> B  ***STOP");
        assert_eq!(path_edges(&path).collect::<Vec<_>>(), vec![("A", "B")]);
    }
}
