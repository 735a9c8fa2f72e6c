//! Rich diagnostic error types for ppi-network.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users can tell a
//! malformed input file from an unsupported output format or a missing node.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the network pipeline.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum PpiError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Relation(#[from] RelationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Network(#[from] NetworkError),
}

// ---------------------------------------------------------------------------
// Relation (input parsing) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RelationError {
    #[error("failed to read {path}")]
    #[diagnostic(
        code(ppi::relation::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    #[diagnostic(
        code(ppi::relation::write),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in {path} line {line}: expected {expected} fields, found {found}")]
    #[diagnostic(
        code(ppi::relation::malformed_record),
        help(
            "PPI files are comma-separated `source,interaction,target` rows after a header. \
             Node lists are tab-separated `id<TAB>symbol[<TAB>category]`, edge lists \
             `source_id<TAB>target_id<TAB>interaction`."
        )
    )]
    MalformedRecord {
        path: String,
        line: usize,
        expected: String,
        found: usize,
    },

    #[error("invalid identifier \"{value}\" in {path} line {line}")]
    #[diagnostic(
        code(ppi::relation::bad_identifier),
        help("Node identifiers must be positive integers.")
    )]
    BadIdentifier {
        path: String,
        line: usize,
        value: String,
    },

    #[error("cannot determine the role of {path}")]
    #[diagnostic(
        code(ppi::relation::unknown_role),
        help(
            "Use a .csv file for raw PPIs, or a .tsv node list (`id<TAB>symbol`) \
             or edge list (`id<TAB>id<TAB>interaction`)."
        )
    )]
    UnknownRole { path: String },
}

// ---------------------------------------------------------------------------
// Node index errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    #[error("ambiguous label \"{label}\": already assigned to node {existing}")]
    #[diagnostic(
        code(ppi::index::ambiguous_label),
        help(
            "Two identifiers map to the same node label, so reverse lookup would be ambiguous. \
             Check the node list for duplicate symbols."
        )
    )]
    AmbiguousLabel { label: String, existing: u64 },

    #[error("duplicate node identifier {id}")]
    #[diagnostic(
        code(ppi::index::duplicate_id),
        help("Each row of a node list must carry a distinct identifier.")
    )]
    DuplicateId { id: u64 },

    #[error("unknown symbol \"{symbol}\"")]
    #[diagnostic(
        code(ppi::index::unknown_symbol),
        help("Every symbol referenced by an edge must be present in the node index.")
    )]
    UnknownSymbol { symbol: String },

    #[error("unknown node identifier {id}")]
    #[diagnostic(
        code(ppi::index::unknown_id),
        help("The edge list references an identifier that is missing from the node list.")
    )]
    UnknownId { id: u64 },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("node not found: \"{name}\"")]
    #[diagnostic(
        code(ppi::graph::node_not_found),
        help(
            "The node is not part of the network. Symbols are case-sensitive; \
             in enriched mode node names look like \"TP53 Protein\"."
        )
    )]
    NodeNotFound { name: String },
}

// ---------------------------------------------------------------------------
// Statistics errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StatsError {
    #[error("degenerate graph: {nodes} node(s), statistics need at least 2")]
    #[diagnostic(
        code(ppi::stats::degenerate_graph),
        help("Density and average connectivity are undefined for graphs with fewer than two nodes.")
    )]
    DegenerateGraph { nodes: usize },
}

// ---------------------------------------------------------------------------
// Rendering errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("unsupported graph output format: \"{path}\"")]
    #[diagnostic(
        code(ppi::render::unsupported_format),
        help("Graph images must use one of the extensions: pdf, png, jpg, svg.")
    )]
    UnsupportedFormat { path: String },

    #[error("graph renderer failed: {message}")]
    #[diagnostic(
        code(ppi::render::backend),
        help("Rendering uses the Graphviz `dot` executable. Make sure it is installed and on PATH.")
    )]
    Backend { message: String },
}

// ---------------------------------------------------------------------------
// Statistics export errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("unsupported statistics export format: \"{path}\"")]
    #[diagnostic(
        code(ppi::export::unsupported_format),
        help("Statistics can be exported as json, csv, tsv or txt.")
    )]
    UnsupportedFormat { path: String },

    #[error("failed to write statistics to {path}")]
    #[diagnostic(
        code(ppi::export::io),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize statistics: {message}")]
    #[diagnostic(code(ppi::export::serialize))]
    Serialize { message: String },
}

// ---------------------------------------------------------------------------
// Identifier lookup errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LookupError {
    #[error("request to {url} failed: {message}")]
    #[diagnostic(
        code(ppi::lookup::request),
        help("The identifier registry could not be reached. Retry later or use --offline.")
    )]
    Request { url: String, message: String },

    #[error("cache I/O error at {path}")]
    #[diagnostic(
        code(ppi::lookup::cache_io),
        help("Check permissions of the cache directory, or point --cache-dir elsewhere.")
    )]
    CacheIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse registry response for \"{key}\": {message}")]
    #[diagnostic(
        code(ppi::lookup::parse),
        help("The cached response may be truncated. Delete it from the cache directory to refetch.")
    )]
    Parse { key: String, message: String },
}

// ---------------------------------------------------------------------------
// Metadata store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(ppi::store::io),
        help("Check that the data directory exists and has correct permissions.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("redb error: {message}")]
    #[diagnostic(
        code(ppi::store::redb),
        help(
            "The metadata database encountered an error. \
             If it persists, remove the database file and run `ppi populate` again."
        )
    )]
    Redb { message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(ppi::store::serde),
        help("The stored record format is unreadable. Re-populate the store.")
    )]
    Serialization { message: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    #[diagnostic(code(ppi::config::io), help("Check that the config file is readable."))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    #[diagnostic(
        code(ppi::config::parse),
        help("The config file must be TOML. Remove unknown keys or fix the syntax.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize config: {message}")]
    #[diagnostic(code(ppi::config::serialize))]
    Serialize { message: String },
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum NetworkError {
    #[error("cannot import a PPI file together with node and edge lists")]
    #[diagnostic(
        code(ppi::network::conflicting_inputs),
        help("Pass either a PPI file, or a node list and an edge list, not both.")
    )]
    ConflictingInputs,

    #[error("no network input given")]
    #[diagnostic(
        code(ppi::network::missing_input),
        help("Pass a PPI file with --ppi, or both --nodes and --edges.")
    )]
    MissingInput,

    #[error("{path} is a {found}, expected a {expected}")]
    #[diagnostic(
        code(ppi::network::wrong_role),
        help("Check the order of the node and edge list arguments.")
    )]
    WrongRole {
        path: String,
        expected: String,
        found: String,
    },
}

/// Convenience result type for top-level operations.
pub type PpiResult<T> = std::result::Result<T, PpiError>;
