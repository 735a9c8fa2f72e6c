//! Graph rendering: output validation, color assignment, and the drawing
//! collaborator.
//!
//! Drawing itself is delegated to a [`Renderer`]. The bundled
//! [`GraphvizRenderer`] emits DOT through `petgraph::dot` and pipes it into
//! the Graphviz `dot` executable.

use std::collections::HashMap;
use std::path::Path;

use petgraph::dot::{Config, Dot};
use petgraph::visit::EdgeRef;

use crate::error::RenderError;
use crate::graph::NetworkGraph;
use crate::graph::traverse::{NodePath, path_edges};
use crate::node::Category;

/// Result type for rendering.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Image formats a rendering target may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Png,
    Jpg,
    Svg,
}

impl OutputFormat {
    /// The Graphviz `-T` argument.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Validate the extension of a rendering target.
pub fn check_output_path(path: &Path) -> RenderResult<OutputFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => Ok(OutputFormat::Pdf),
        Some("png") => Ok(OutputFormat::Png),
        Some("jpg") => Ok(OutputFormat::Jpg),
        Some("svg") => Ok(OutputFormat::Svg),
        _ => Err(RenderError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Blue,
    Green,
    Purple,
    Black,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Purple => "purple",
            Color::Black => "black",
        }
    }
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Per-node and per-edge colors, with defaults for everything unlisted.
#[derive(Debug, Clone)]
pub struct Coloring {
    nodes: HashMap<String, Color>,
    edges: HashMap<(String, String), Color>,
    default_node: Color,
    default_edge: Color,
}

impl Coloring {
    pub fn uniform(node: Color, edge: Color) -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            default_node: node,
            default_edge: edge,
        }
    }

    pub fn set_node(&mut self, name: &str, color: Color) {
        self.nodes.insert(name.to_string(), color);
    }

    /// Edges are undirected; `(a, b)` and `(b, a)` are the same edge.
    pub fn set_edge(&mut self, a: &str, b: &str, color: Color) {
        self.edges.insert(edge_key(a, b), color);
    }

    pub fn node(&self, name: &str) -> Color {
        self.nodes.get(name).copied().unwrap_or(self.default_node)
    }

    pub fn edge(&self, a: &str, b: &str) -> Color {
        self.edges
            .get(&edge_key(a, b))
            .copied()
            .unwrap_or(self.default_edge)
    }
}

/// Highlight shortest paths: nodes on any path blue, others red; edges on
/// any path purple, others black.
pub fn path_coloring(paths: &[NodePath]) -> Coloring {
    let mut coloring = Coloring::uniform(Color::Red, Color::Black);
    for path in paths {
        for name in path {
            coloring.set_node(name, Color::Blue);
        }
        for (a, b) in path_edges(path) {
            coloring.set_edge(a, b, Color::Purple);
        }
    }
    coloring
}

/// Color enriched nodes by category: DNA green, RNA blue, Protein red.
pub fn category_coloring(graph: &NetworkGraph) -> Coloring {
    let mut coloring = Coloring::uniform(Color::Red, Color::Black);
    for node in graph.graph().node_weights() {
        let color = match node.category {
            Some(Category::Dna) => Color::Green,
            Some(Category::Rna) => Color::Blue,
            Some(Category::Protein) | None => Color::Red,
        };
        coloring.set_node(&node.name, color);
    }
    coloring
}

/// Everything the drawing collaborator needs for one image.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub graph: &'a NetworkGraph,
    pub coloring: &'a Coloring,
    pub edge_labels: bool,
}

/// Drawing collaborator.
pub trait Renderer {
    /// Draw the request into `path`. Implementations may assume the extension
    /// has been checked with [`check_output_path`].
    fn render(&self, request: &RenderRequest<'_>, path: &Path) -> RenderResult<()>;
}

/// DOT text of a request.
pub fn to_dot(request: &RenderRequest<'_>) -> String {
    let g = request.graph.graph();
    let config: &[Config] = if request.edge_labels {
        &[]
    } else {
        &[Config::EdgeNoLabel]
    };
    let coloring = request.coloring;
    format!(
        "{}",
        Dot::with_attr_getters(
            g,
            config,
            &|g, edge| {
                let color = coloring.edge(&g[edge.source()].name, &g[edge.target()].name);
                format!("color = \"{}\"", color.as_str())
            },
            &|_, (_, node)| {
                format!(
                    "color = \"{}\" style = \"filled\" fillcolor = \"{}\"",
                    coloring.node(&node.name).as_str(),
                    coloring.node(&node.name).as_str()
                )
            },
        )
    )
}

/// Renders through the Graphviz `dot` executable.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: String,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self {
            program: "dot".into(),
        }
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, request: &RenderRequest<'_>, path: &Path) -> RenderResult<()> {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let format = check_output_path(path)?;
        let dot = to_dot(request);

        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.as_str()))
            .arg("-o")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RenderError::Backend {
                message: format!("cannot start {}: {e}", self.program),
            })?;

        child
            .stdin
            .as_mut()
            .ok_or_else(|| RenderError::Backend {
                message: "renderer stdin unavailable".into(),
            })?
            .write_all(dot.as_bytes())
            .map_err(|e| RenderError::Backend {
                message: format!("write DOT: {e}"),
            })?;

        let output = child.wait_with_output().map_err(|e| RenderError::Backend {
            message: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(RenderError::Backend {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        tracing::info!(path = %path.display(), nodes = request.graph.node_count(), "rendered graph");
        Ok(())
    }
}
