//! Relation store: parse raw PPI files and node/edge lists.
//!
//! Three tabular formats are understood:
//! - **PPI file**: comma-separated `source,interaction,target` rows after a header row
//! - **Node list**: tab-separated `id<TAB>symbol` (plain) or `id<TAB>symbol<TAB>category` (enriched)
//! - **Edge list**: tab-separated `source_id<TAB>target_id<TAB>interaction`
//!
//! Row order is preserved everywhere; enrichment relies on it.

use std::path::Path;

use crate::error::RelationError;
use crate::graph::{Edge, EdgeKind};
use crate::node::{NodeId, NodeLabel};

/// Result type for relation parsing.
pub type RelationResult<T> = std::result::Result<T, RelationError>;

/// A raw protein-protein interaction: `(source, interaction, target)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub source: String,
    pub interaction: String,
    pub target: String,
}

impl Relation {
    pub fn new(
        source: impl Into<String>,
        interaction: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            interaction: interaction.into(),
            target: target.into(),
        }
    }

    /// The interaction type with whitespace replaced by underscores, as written
    /// to edge lists.
    pub fn interaction_token(&self) -> String {
        normalize_interaction(&self.interaction)
    }
}

/// One row of a node list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub id: NodeId,
    pub label: NodeLabel,
}

/// What a tabular input file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Ppi,
    NodeList,
    EdgeList,
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileRole::Ppi => write!(f, "PPI file"),
            FileRole::NodeList => write!(f, "node list"),
            FileRole::EdgeList => write!(f, "edge list"),
        }
    }
}

/// Replace runs of whitespace with a single underscore.
pub fn normalize_interaction(interaction: &str) -> String {
    interaction.split_whitespace().collect::<Vec<_>>().join("_")
}

fn read(path: &Path) -> RelationResult<String> {
    std::fs::read_to_string(path).map_err(|e| RelationError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Non-empty lines with their 1-based line numbers.
fn records(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn parse_id(value: &str, source: &str, line: usize) -> RelationResult<NodeId> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(NodeId::new)
        .ok_or_else(|| RelationError::BadIdentifier {
            path: source.to_string(),
            line,
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// PPI files
// ---------------------------------------------------------------------------

/// Parse comma-separated PPI content. The first non-empty line is a header
/// and is skipped.
///
/// `source` names the input in error messages.
pub fn parse_ppis(content: &str, source: &str) -> RelationResult<Vec<Relation>> {
    let mut relations = Vec::new();
    for (line, record) in records(content).skip(1) {
        let fields: Vec<&str> = record.trim().split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(RelationError::MalformedRecord {
                path: source.to_string(),
                line,
                expected: "3".into(),
                found: fields.len(),
            });
        }
        relations.push(Relation::new(fields[0], fields[1], fields[2]));
    }
    Ok(relations)
}

/// Read a PPI file from disk.
pub fn read_ppis(path: &Path) -> RelationResult<Vec<Relation>> {
    let content = read(path)?;
    let relations = parse_ppis(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), relations = relations.len(), "read PPI file");
    Ok(relations)
}

// ---------------------------------------------------------------------------
// Node lists
// ---------------------------------------------------------------------------

/// Parse a tab-separated node list (2 or 3 columns per row).
pub fn parse_node_rows(content: &str, source: &str) -> RelationResult<Vec<NodeRow>> {
    let mut rows = Vec::new();
    for (line, record) in records(content) {
        let fields: Vec<&str> = record.split('\t').collect();
        let label = match fields.as_slice() {
            [_, symbol] => NodeLabel::plain(symbol.trim()),
            [_, symbol, category] => NodeLabel::from_category_label(symbol.trim(), category),
            _ => {
                return Err(RelationError::MalformedRecord {
                    path: source.to_string(),
                    line,
                    expected: "2 or 3".into(),
                    found: fields.len(),
                });
            }
        };
        rows.push(NodeRow {
            id: parse_id(fields[0], source, line)?,
            label,
        });
    }
    Ok(rows)
}

/// Read a node list from disk.
pub fn read_node_list(path: &Path) -> RelationResult<Vec<NodeRow>> {
    let content = read(path)?;
    parse_node_rows(&content, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Edge lists
// ---------------------------------------------------------------------------

/// Parse a tab-separated edge list (3 columns per row).
pub fn parse_edge_rows(content: &str, source: &str) -> RelationResult<Vec<Edge>> {
    let mut edges = Vec::new();
    for (line, record) in records(content) {
        let fields: Vec<&str> = record.split('\t').collect();
        if fields.len() != 3 {
            return Err(RelationError::MalformedRecord {
                path: source.to_string(),
                line,
                expected: "3".into(),
                found: fields.len(),
            });
        }
        edges.push(Edge {
            source: parse_id(fields[0], source, line)?,
            target: parse_id(fields[1], source, line)?,
            kind: EdgeKind::parse(fields[2].trim()),
        });
    }
    Ok(edges)
}

/// Read an edge list from disk.
pub fn read_edge_list(path: &Path) -> RelationResult<Vec<Edge>> {
    let content = read(path)?;
    parse_edge_rows(&content, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write rows as tab-separated lines.
pub fn write_tsv<I, R>(path: &Path, rows: I) -> RelationResult<()>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.as_ref().join("\t"));
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|e| RelationError::Write {
        path: path.display().to_string(),
        source: e,
    })
}

/// Write an edge list: `source_id<TAB>target_id<TAB>interaction`.
pub fn write_edge_list(path: &Path, edges: &[Edge]) -> RelationResult<()> {
    write_tsv(
        path,
        edges.iter().map(|e| {
            [
                e.source.to_string(),
                e.target.to_string(),
                e.kind.token(),
            ]
        }),
    )?;
    tracing::debug!(path = %path.display(), edges = edges.len(), "wrote edge list");
    Ok(())
}

// ---------------------------------------------------------------------------
// File role detection
// ---------------------------------------------------------------------------

/// Classify the content of a tabular file by its first record.
///
/// Edge rows start with two integer columns, node rows with one integer
/// column followed by a symbol, anything comma-separated is a PPI file.
pub fn sniff_role(content: &str) -> Option<FileRole> {
    let (_, first) = records(content).next()?;
    let fields: Vec<&str> = first.split('\t').map(str::trim).collect();
    let is_id = |s: &str| s.parse::<u64>().map(|v| v > 0).unwrap_or(false);
    match fields.as_slice() {
        [a, b, _] if is_id(a) && is_id(b) => Some(FileRole::EdgeList),
        [a, _] | [a, _, _] if is_id(a) => Some(FileRole::NodeList),
        [single] if single.split(',').count() == 3 => Some(FileRole::Ppi),
        _ => None,
    }
}

/// Determine the role of an input file, by extension first and by content
/// for `.tsv`/`.txt` files.
pub fn detect_role(path: &Path) -> RelationResult<FileRole> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if extension.as_deref() == Some("csv") {
        return Ok(FileRole::Ppi);
    }
    let content = read(path)?;
    sniff_role(&content).ok_or_else(|| RelationError::UnknownRole {
        path: path.display().to_string(),
    })
}
