// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ppi-network
//!
//! Protein-protein interaction networks: construction from tabular inputs,
//! DNA/RNA/Protein enrichment from identifier registries, shortest paths,
//! summary statistics, and rendering.
//!
//! ## Architecture
//!
//! - **Relations** (`relation`): PPI files, node lists and edge lists
//! - **Graph** (`graph`): node index, graph builder, shortest paths, statistics
//! - **Enrichment** (`enrich`): DNA/RNA/Protein expansion, HGNC/UniProt lookups
//! - **Metadata store** (`store`): identifier metadata persisted in redb
//! - **Output** (`render`, `export`): Graphviz images and statistics files
//!
//! ## Library usage
//!
//! ```no_run
//! use ppi_network::network::{BuildOptions, Network};
//!
//! let network = Network::from_ppi_file(
//!     std::path::Path::new("ppis.csv"),
//!     BuildOptions::default(),
//!     None,
//! )
//! .unwrap();
//! for path in network.shortest_paths("CREBBP", "TRA2B").unwrap() {
//!     println!("{}", path.join(" -> "));
//! }
//! println!("{:?}", network.statistics().unwrap());
//! ```

pub mod config;
pub mod enrich;
pub mod error;
pub mod export;
pub mod graph;
pub mod network;
pub mod node;
pub mod paths;
pub mod relation;
pub mod render;
pub mod store;
