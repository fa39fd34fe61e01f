//! gefura - group brokerage centrality from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Global gefura over an edge list and a node->group assignment
//! gefura global edges.csv --groups groups.csv --normalized --top 10
//!
//! # Local gefura on a directed network, incoming paths
//! gefura local edges.csv --groups groups.csv --directed --direction in
//!
//! # Network and group statistics
//! gefura stats edges.csv --groups groups.csv
//! ```
//!
//! The edge file is headerless CSV: `from,to[,weight]`. The groups file is
//! headerless CSV: `node,group`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gefura_core::algo::gefura::{global_gefura, local_gefura, Direction, GefuraConfig};
use gefura_core::{Grouping, Network};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gefura")]
#[command(about = "Group brokerage centrality", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Global gefura: brokerage between any two groups
    Global {
        /// Edge list file (CSV: from,to[,weight])
        edges: PathBuf,

        /// Group assignment file (CSV: node,group)
        #[arg(short, long)]
        groups: PathBuf,

        #[command(flatten)]
        options: MeasureOptions,
    },

    /// Local gefura: brokerage between a node's own group and the rest
    Local {
        /// Edge list file (CSV: from,to[,weight])
        edges: PathBuf,

        /// Group assignment file (CSV: node,group)
        #[arg(short, long)]
        groups: PathBuf,

        /// Path direction on directed networks
        #[arg(long, default_value = "out")]
        direction: DirectionArg,

        #[command(flatten)]
        options: MeasureOptions,
    },

    /// Show statistics about a network (and optionally its grouping)
    Stats {
        /// Edge list file (CSV: from,to[,weight])
        edges: PathBuf,

        /// Group assignment file (CSV: node,group)
        #[arg(short, long)]
        groups: Option<PathBuf>,

        /// Treat edges as one-way
        #[arg(long)]
        directed: bool,
    },
}

#[derive(clap::Args)]
struct MeasureOptions {
    /// Treat edges as one-way
    #[arg(long)]
    directed: bool,

    /// Use the third CSV column as edge weight
    #[arg(long)]
    weighted: bool,

    /// Divide scores by the per-node cross-group pair count
    #[arg(long)]
    normalized: bool,

    /// Spread per-source accumulations across threads
    #[arg(long)]
    parallel: bool,

    /// Number of top nodes to show
    #[arg(short, long, default_value = "20")]
    top: usize,

    /// Emit a JSON object instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    /// Paths from the own group to elsewhere
    Out,
    /// Paths from elsewhere to the own group
    In,
    /// Both directions
    All,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Out => Direction::Out,
            DirectionArg::In => Direction::In,
            DirectionArg::All => Direction::All,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Global {
            edges,
            groups,
            options,
        } => cmd_measure(&edges, &groups, Direction::Out, false, options),
        Commands::Local {
            edges,
            groups,
            direction,
            options,
        } => cmd_measure(&edges, &groups, direction.into(), true, options),
        Commands::Stats {
            edges,
            groups,
            directed,
        } => cmd_stats(&edges, groups.as_deref(), directed),
    }
}

fn load_network(path: &Path, directed: bool) -> Result<Network> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {}...", path.display()));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut net = if directed {
        Network::directed()
    } else {
        Network::undirected()
    };

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        let (Some(from), Some(to)) = (record.get(0), record.get(1)) else {
            bail!(
                "{}:{}: expected at least two columns (from,to)",
                path.display(),
                line + 1
            );
        };
        let weight = match record.get(2).filter(|w| !w.is_empty()) {
            Some(raw) => Some(raw.parse::<f64>().with_context(|| {
                format!("{}:{}: bad weight {raw:?}", path.display(), line + 1)
            })?),
            None => None,
        };
        net.add_edge(from, to, weight);
    }

    pb.finish_with_message(format!(
        "Loaded {} nodes, {} edges in {:.2?}",
        net.node_count(),
        net.edge_count(),
        start.elapsed()
    ));
    Ok(net)
}

fn load_grouping(path: &Path) -> Result<Grouping> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut pairs = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        let (Some(node), Some(group)) = (record.get(0), record.get(1)) else {
            bail!(
                "{}:{}: expected two columns (node,group)",
                path.display(),
                line + 1
            );
        };
        pairs.push((node.to_string(), group.to_string()));
    }

    Grouping::from_membership(pairs)
        .with_context(|| format!("Invalid group assignment in {}", path.display()))
}

fn cmd_measure(
    edges: &Path,
    groups: &Path,
    direction: Direction,
    local: bool,
    options: MeasureOptions,
) -> Result<()> {
    let net = load_network(edges, options.directed)?;
    let grouping = load_grouping(groups)?;

    let config = GefuraConfig {
        weighted: options.weighted,
        normalized: options.normalized,
        direction,
        parallel: options.parallel,
        ..Default::default()
    };

    let kind = if local { "local" } else { "global" };
    let start = Instant::now();
    let scores = if local {
        local_gefura(&net, &grouping, config)
    } else {
        global_gefura(&net, &grouping, config)
    }
    .with_context(|| format!("Failed to compute {kind} gefura"))?;

    if options.json {
        let ordered: BTreeMap<_, _> = scores.iter().collect();
        println!("{}", serde_json::to_string_pretty(&ordered)?);
        return Ok(());
    }

    println!("Computed {kind} gefura in {:.2?}", start.elapsed());

    let mut sorted_scores: Vec<_> = scores.into_iter().collect();
    sorted_scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));

    println!("Top {} nodes by {kind} gefura:", options.top);
    for (i, (node, score)) in sorted_scores.iter().take(options.top).enumerate() {
        println!("{}. {} ({:.6})", i + 1, node, score);
    }

    Ok(())
}

fn cmd_stats(edges: &Path, groups: Option<&Path>, directed: bool) -> Result<()> {
    let net = load_network(edges, directed)?;
    let stats = net.stats();

    println!("Network Statistics");
    println!("==================");
    println!("Nodes:      {}", stats.node_count);
    println!("Edges:      {}", stats.edge_count);
    println!("Directed:   {}", stats.directed);
    println!("Avg degree: {:.2}", stats.avg_degree);

    if let Some(path) = groups {
        let grouping = load_grouping(path)?;
        grouping
            .validate_against(&net)
            .context("Group assignment does not cover the network")?;

        let mut sizes: Vec<_> = grouping
            .groups()
            .map(|g| (g.to_string(), grouping.group_size(g)))
            .collect();
        sizes.sort();

        println!();
        println!("Groups:     {}", grouping.len());
        for (group, size) in sizes {
            println!("  {} ({} nodes)", group, size);
        }
    }

    Ok(())
}
