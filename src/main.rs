use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use kplex_cover::config::CoverConfig;
use kplex_cover::cover::NodePriority;
use kplex_cover::hierarchy::{CacheMode, HierarchyCache};
use kplex_cover::pool::PoolOp;
use kplex_cover::{data, storage, viz};

#[derive(Parser, Debug)]
#[clap(
    name = "kplex-cover",
    about = "Hierarchical k-plex cover construction and graph pooling"
)]
struct Cli {
    /// Path to input Parquet edge list (src, dst[, weight][, graph])
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cover_results")]
    output_dir: String,

    /// k values, one hierarchy level each, applied in order
    #[clap(long = "k", default_values_t = vec![2u32])]
    ks: Vec<u32>,

    /// Cover seed priority criteria, in rank order
    #[clap(long)]
    cover_priority: Vec<String>,

    /// K-plex growth priority criteria, in rank order
    #[clap(long)]
    kplex_priority: Vec<String>,

    /// Build a strict partition instead of an overlapping cover
    #[clap(long)]
    skip_covered: bool,

    /// Quantile threshold for hub promotion (disabled when omitted)
    #[clap(long)]
    hub_quantile: Option<f64>,

    /// Drop self-loops and re-coalesce after edge pooling
    #[clap(long)]
    simplify: bool,

    /// Merge operator for pooled edge weights
    #[clap(long, default_value = "add")]
    edge_pool_op: String,

    /// Recompute the hierarchy per request instead of caching it eagerly
    #[clap(long)]
    lazy: bool,

    /// Skip GraphML export
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting k-plex cover hierarchy construction");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    // 1. Build the pipeline configuration
    let defaults = CoverConfig::default();
    let config = CoverConfig {
        ks: args.ks.clone(),
        cover_priority: parse_priorities(&args.cover_priority, defaults.cover_priority)?,
        kplex_priority: parse_priorities(&args.kplex_priority, defaults.kplex_priority)?,
        skip_covered: args.skip_covered,
        hub_quantile: args.hub_quantile,
        simplify: args.simplify,
        edge_pool_op: args.edge_pool_op.parse::<PoolOp>()?,
    };

    // 2. Load data
    let dataset: Vec<Arc<_>> = data::parquet::load_edge_data(&args.input)?
        .into_iter()
        .map(Arc::new)
        .collect();

    log::info!(
        "Loaded {} graphs with {} nodes total",
        dataset.len(),
        dataset.iter().map(|g| g.node_count).sum::<usize>()
    );
    log::debug!(
        "Dataset memory: {} bytes",
        dataset.iter().map(|g| g.memory_usage()).sum::<usize>()
    );

    // 3. Build the hierarchy
    let mode = if args.lazy {
        CacheMode::Lazy
    } else {
        CacheMode::Eager
    };
    let cache = HierarchyCache::new(dataset.clone(), config, mode)?;
    let indices: Vec<usize> = (0..cache.len()).collect();
    let hierarchy = cache.get(&indices)?;

    log::info!(
        "Built {} levels over {} graphs",
        hierarchy.levels.len(),
        hierarchy.num_graphs()
    );

    // 4. Save results
    storage::save_results(&hierarchy, &dataset, &args.output_dir)?;

    // 5. Generate visualizations if requested
    if !args.skip_viz {
        viz::export_graphml(&hierarchy, &args.output_dir)?;
    }

    log::info!("Construction complete. Results saved to {}", args.output_dir);

    Ok(())
}

/// Parse priority names from the command line, falling back to the
/// configuration defaults when none were given
fn parse_priorities(
    names: &[String],
    default: Vec<NodePriority>,
) -> Result<Vec<NodePriority>> {
    if names.is_empty() {
        return Ok(default);
    }
    names
        .iter()
        .map(|name| name.parse::<NodePriority>().map_err(Into::into))
        .collect()
}
