//! ppi CLI: build, enrich and analyze protein-protein interaction networks.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::Result;

use ppi_network::config::PpiConfig;
use ppi_network::enrich::client::{CachedRegistry, RegistryClient, ResponseCache};
use ppi_network::enrich::gather_identifiers;
use ppi_network::enrich::lookup::IdentifierLookup;
use ppi_network::export;
use ppi_network::graph::analytics::StatisticsSummary;
use ppi_network::graph::index::distinct_symbols;
use ppi_network::graph::traverse::format_path;
use ppi_network::network::{BuildOptions, Network, NetworkInput};
use ppi_network::node::NodeStyle;
use ppi_network::paths::PpiPaths;
use ppi_network::relation;
use ppi_network::render::{self, GraphvizRenderer};
use ppi_network::store::MetadataStore;

#[derive(Parser)]
#[command(name = "ppi", version, about = "Protein-protein interaction network toolkit")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/ppi-network/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for cached registry responses.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Serve identifier lookups from the cache only.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Either a PPI file or a node list plus an edge list.
#[derive(Args)]
struct InputArgs {
    /// Raw PPI file (comma-separated, with header).
    #[arg(long)]
    ppi: Option<PathBuf>,

    /// Node list (`id<TAB>symbol[<TAB>category]`).
    #[arg(long)]
    nodes: Option<PathBuf>,

    /// Edge list (`id<TAB>id<TAB>interaction`).
    #[arg(long)]
    edges: Option<PathBuf>,
}

impl InputArgs {
    fn into_input(self) -> Result<NetworkInput> {
        Ok(NetworkInput::from_args(self.ppi, self.nodes, self.edges)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the node and edge lists of a PPI file.
    Compile {
        /// Raw PPI file.
        ppi: PathBuf,
        /// Output node list.
        nodes: PathBuf,
        /// Output edge list.
        edges: PathBuf,
        /// Split every symbol into DNA, RNA and Protein nodes.
        #[arg(long)]
        enrich: bool,
        /// Read identifiers from the metadata store instead of the registries.
        #[arg(long)]
        from_store: bool,
    },

    /// Find all shortest paths between two nodes and draw them.
    Path {
        /// Output image (pdf, png, jpg or svg).
        output: PathBuf,
        /// Source node.
        #[arg(short, long)]
        source: String,
        /// Target node.
        #[arg(short, long)]
        target: String,
        #[command(flatten)]
        input: InputArgs,
        /// Print every path.
        #[arg(short, long)]
        verbose: bool,
        /// Draw interaction types on edges.
        #[arg(long)]
        edge_labels: bool,
    },

    /// Build a network, write its lists and draw it.
    Create {
        /// Raw PPI file.
        ppi: PathBuf,
        /// Output image (pdf, png, jpg or svg).
        output: PathBuf,
        /// Output node list.
        nodes: PathBuf,
        /// Output edge list.
        edges: PathBuf,
        #[arg(long)]
        enrich: bool,
        /// Name enriched nodes by HGNC/UniProt identifiers.
        #[arg(long)]
        show_identifier: bool,
        #[arg(short, long)]
        verbose: bool,
        #[arg(long)]
        from_store: bool,
    },

    /// Compute summary statistics.
    Stats {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        enrich: bool,
        /// Print a table on stdout.
        #[arg(long)]
        print_table: bool,
        /// Write the statistics to a json, csv, tsv or txt file.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show the registry identifiers of a symbol.
    Info {
        symbol: String,
        #[arg(long)]
        from_store: bool,
    },

    /// Fetch identifiers for every symbol of a PPI file into the metadata store.
    Populate {
        /// Raw PPI file.
        ppi: PathBuf,
    },
}

/// Resolved configuration of one invocation.
struct Context {
    config: PpiConfig,
    paths: PpiPaths,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self> {
        let paths = PpiPaths::resolve()?;
        let config_file = cli.config.clone().unwrap_or_else(|| paths.config_file());
        let mut config = PpiConfig::load_or_default(&config_file)?;
        if let Some(dir) = &cli.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        if cli.offline {
            config.registry.offline = true;
        }
        Ok(Self { config, paths })
    }

    fn registry(&self) -> Result<CachedRegistry> {
        let cache = ResponseCache::new(&self.config.cache_root(&self.paths));
        cache.ensure_dirs()?;
        Ok(if self.config.registry.offline {
            CachedRegistry::offline(cache)
        } else {
            CachedRegistry::new(cache, RegistryClient::new(&self.config.registry))
        })
    }

    fn store(&self) -> Result<MetadataStore> {
        Ok(MetadataStore::open(&self.config.database_path(&self.paths))?)
    }

    /// Identifier lookup for enrichment: none, the store, or the registries.
    fn lookup(&self, enrich: bool, from_store: bool) -> Result<Option<Box<dyn IdentifierLookup>>> {
        if !enrich {
            return Ok(None);
        }
        Ok(Some(if from_store {
            Box::new(self.store()?)
        } else {
            Box::new(self.registry()?)
        }))
    }
}

fn options(enrich: bool, show_identifier: bool) -> BuildOptions {
    BuildOptions {
        enrich,
        style: if show_identifier {
            NodeStyle::Identifier
        } else {
            NodeStyle::Symbol
        },
    }
}

/// Statistics of a network. Counts do not depend on registry metadata, so
/// enrichment runs without a lookup.
fn statistics(input: &NetworkInput, enrich: bool) -> Result<StatisticsSummary> {
    let network = Network::open(input, options(enrich, false), None)?;
    Ok(network.statistics()?)
}

fn write_lists(network: &Network, nodes: &Path, edges: &Path) -> Result<()> {
    network.write_node_list(nodes)?;
    network.write_edge_list(edges)?;
    println!("Wrote node list to {}", nodes.display());
    println!("Wrote edge list to {}", edges.display());
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = Context::load(&cli)?;

    match cli.command {
        Commands::Compile {
            ppi,
            nodes,
            edges,
            enrich,
            from_store,
        } => {
            let lookup = ctx.lookup(enrich, from_store)?;
            let network = Network::from_ppi_file(&ppi, options(enrich, false), lookup.as_deref())?;
            write_lists(&network, &nodes, &edges)?;
        }

        Commands::Path {
            output,
            source,
            target,
            input,
            verbose,
            edge_labels,
        } => {
            render::check_output_path(&output)?;
            let network = Network::open(&input.into_input()?, BuildOptions::default(), None)?;
            let paths = network.shortest_paths(&source, &target)?;
            if paths.is_empty() {
                println!("No path found between {source} and {target}.");
                return Ok(());
            }
            if verbose {
                for path in &paths {
                    println!("{}", format_path(path));
                }
            }
            println!(
                "{} shortest path(s) of length {}",
                paths.len(),
                paths[0].len().saturating_sub(1)
            );
            let coloring = render::path_coloring(&paths);
            network.render(&GraphvizRenderer::default(), &output, &coloring, edge_labels)?;
            println!("Drew paths to {}", output.display());
        }

        Commands::Create {
            ppi,
            output,
            nodes,
            edges,
            enrich,
            show_identifier,
            verbose,
            from_store,
        } => {
            render::check_output_path(&output)?;
            let lookup = ctx.lookup(enrich, from_store)?;
            let network = Network::from_ppi_file(
                &ppi,
                options(enrich, show_identifier),
                lookup.as_deref(),
            )?;
            write_lists(&network, &nodes, &edges)?;
            if verbose {
                for (a, b, kind) in network.graph().edges() {
                    println!("{a} -- {b} [{kind}]");
                }
            }
            network.render(
                &GraphvizRenderer::default(),
                &output,
                &network.coloring(),
                false,
            )?;
            println!("Drew network to {}", output.display());
        }

        Commands::Stats {
            input,
            enrich,
            print_table,
            export: export_path,
        } => {
            let summary = statistics(&input.into_input()?, enrich)?;
            if print_table {
                print!("{}", export::render_table(&summary));
            }
            if let Some(path) = export_path {
                export::export_summary(&summary, &path)?;
                println!("Exported statistics to {}", path.display());
            }
            if !print_table {
                println!(
                    "nodes={} edges={} density={:.4} average_node_connectivity={:.4}",
                    summary.nodes,
                    summary.edges,
                    summary.density,
                    summary.average_node_connectivity
                );
            }
        }

        Commands::Info { symbol, from_store } => {
            let metadata = if from_store {
                ctx.store()?.lookup(&symbol)?
            } else {
                ctx.registry()?.lookup(&symbol)?
            };
            let Some(meta) = metadata else {
                println!("No identifiers found for {symbol}.");
                return Ok(());
            };
            let none = || "-".to_string();
            println!("Symbol:     {}", meta.symbol);
            println!("HGNC ID:    {}", meta.hgnc.hgnc_id.clone().unwrap_or_else(none));
            println!(
                "Ensembl ID: {}",
                meta.hgnc.ensembl_gene_id.clone().unwrap_or_else(none)
            );
            println!("HGNC:       {}{}", ctx.config.registry.hgnc_url, meta.symbol);
            for accession in &meta.hgnc.uniprot_ids {
                let detail = meta
                    .proteins
                    .iter()
                    .find(|p| &p.accession == accession)
                    .and_then(|p| p.full_protein_name.clone())
                    .unwrap_or_default();
                println!("UniProt:    {accession} {detail}");
                println!("            https://www.uniprot.org/uniprot/{accession}");
            }
        }

        Commands::Populate { ppi } => {
            let relations = relation::read_ppis(&ppi)?;
            let registry = ctx.registry()?;
            let store = ctx.store()?;
            let metadata = gather_identifiers(distinct_symbols(&relations), &registry);
            for meta in metadata.values() {
                store.put(meta)?;
            }
            println!(
                "Stored identifiers for {} symbol(s); {} record(s) in the store.",
                metadata.len(),
                store.len()?
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppi_network::graph::analytics::CategoryBreakdown;
    use tempfile::TempDir;

    #[test]
    fn enriched_statistics_of_plain_lists() {
        let dir = TempDir::new().unwrap();
        let nodes = dir.path().join("nodes.tsv");
        let edges = dir.path().join("edges.tsv");
        std::fs::write(&nodes, "1\tUSP14\n2\tAR\n3\tCREBBP\n").unwrap();
        std::fs::write(&edges, "1\t2\tphysical association\n2\t3\tassociation\n").unwrap();
        let input = NetworkInput::from_args(None, Some(nodes), Some(edges)).unwrap();

        let summary = statistics(&input, true).unwrap();
        assert_eq!(summary.nodes, 9);
        assert_eq!(summary.edges, 8);
        assert_eq!(
            summary.breakdown,
            Some(CategoryBreakdown {
                dna: 3,
                rna: 3,
                protein: 3,
                transcribed: 3,
                translated: 3,
                ppi: 2,
            })
        );

        let plain = statistics(&input, false).unwrap();
        assert_eq!((plain.nodes, plain.edges), (3, 2));
        assert!(plain.breakdown.is_none());
    }
}
