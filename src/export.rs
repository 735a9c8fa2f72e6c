//! Statistics export and terminal table rendering.
//!
//! The extension of the target path selects the format:
//! - `json`: one object, field names as keys
//! - `csv`: header row plus value row, comma-separated
//! - `tsv`, `txt`: header row plus value row, tab-separated

use std::path::Path;

use crate::error::ExportError;
use crate::graph::analytics::StatisticsSummary;

/// Result type for exports.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Serialization format of a statistics export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Tsv,
    Txt,
}

impl ExportFormat {
    /// Format selected by the extension of `path`.
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            Some("tsv") => Ok(Self::Tsv),
            Some("txt") => Ok(Self::Txt),
            _ => Err(ExportError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    fn delimiter(self) -> Option<char> {
        match self {
            Self::Json => None,
            Self::Csv => Some(','),
            Self::Tsv | Self::Txt => Some('\t'),
        }
    }
}

/// Render a summary in the given format.
pub fn format_summary(summary: &StatisticsSummary, format: ExportFormat) -> ExportResult<String> {
    let Some(delimiter) = format.delimiter() else {
        return serde_json::to_string_pretty(summary).map_err(|e| ExportError::Serialize {
            message: e.to_string(),
        });
    };
    let fields = summary.fields();
    let sep = delimiter.to_string();
    let header: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let values: Vec<&str> = fields.iter().map(|(_, value)| value.as_str()).collect();
    Ok(format!("{}\n{}\n", header.join(&sep), values.join(&sep)))
}

/// Write a summary to `path`, choosing the format by extension.
///
/// Any extension other than json, csv, tsv or txt is an error, and nothing
/// is written.
pub fn export_summary(summary: &StatisticsSummary, path: &Path) -> ExportResult<()> {
    let format = ExportFormat::from_path(path)?;
    let content = format_summary(summary, format)?;
    std::fs::write(path, content).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), ?format, "exported statistics");
    Ok(())
}

fn display_name(field: &str) -> &str {
    match field {
        "nodes" => "Nodes",
        "edges" => "Edges",
        "density" => "Density of network",
        "average_node_connectivity" => "Average node connectivity",
        "dna" => "Nodes-DNA",
        "rna" => "Nodes-RNA",
        "protein" => "Nodes-Protein",
        "transcribed" => "Edges-transcribed",
        "translated" => "Edges-translated",
        "ppi" => "Edges-PPI",
        other => other,
    }
}

/// Boxed two-column table for terminal output.
pub fn render_table(summary: &StatisticsSummary) -> String {
    let rows: Vec<(&str, String)> = summary
        .fields()
        .into_iter()
        .map(|(name, value)| (display_name(name), value))
        .collect();
    let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{left}{}{mid}{}{right}\n",
            "─".repeat(key_width + 2),
            "─".repeat(value_width + 2)
        )
    };
    let mut out = rule("┌", "┬", "┐");
    for (i, (key, value)) in rows.iter().enumerate() {
        if i > 0 {
            out.push_str(&rule("├", "┼", "┤"));
        }
        out.push_str(&format!("│ {key:<key_width$} │ {value:>value_width$} │\n"));
    }
    out.push_str(&rule("└", "┴", "┘"));
    out
}
