use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use salesim::present::{PeerRow, SaleCard, DEFAULT_DIMENSIONS};
use salesim::{
    rank_similarity_points, DataFiles, Dataset, FeatureComparator, RankWindow, RankingEngine,
    RankingSummary, SaleId, Scope, SnapshotStore, Weights, GLOBAL_EMOJI, GLOBAL_LABEL,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Browse sales similar to a chosen sale
#[derive(Parser, Debug)]
#[command(name = "salesim")]
#[command(about = "Rank and explain similar sales from precomputed tables", long_about = None)]
struct Args {
    /// Directory holding the snapshot tables
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// JSON file overriding individual snapshot paths
    #[arg(long)]
    files: Option<PathBuf>,

    /// Ranking table CSV (long or wide layout)
    #[arg(long)]
    rankings: Option<PathBuf>,

    /// Display names CSV
    #[arg(long)]
    display_names: Option<PathBuf>,

    /// Feature table CSV
    #[arg(long)]
    features: Option<PathBuf>,

    /// Dimension to feature-columns JSON mapping
    #[arg(long)]
    feature_columns: Option<PathBuf>,

    /// JSON file replacing the built-in dimension registry
    #[arg(long)]
    dimensions_file: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List selectable sale names
    Sales,
    /// Show the dimension registry with its feature columns
    Dimensions,
    /// Per-dimension rankings in upstream rank order
    Thematic {
        /// Display name of the selected sale
        #[arg(long)]
        sale: String,
        /// Dimension label or key, repeatable
        #[arg(long = "dimension")]
        dimensions: Vec<String>,
        /// Rank window, e.g. 1-5
        #[arg(long, default_value = "1-5")]
        top: RankWindow,
    },
    /// One ranking combining weighted dimensions
    Global {
        /// Display name of the selected sale
        #[arg(long)]
        sale: String,
        /// DIMENSION=WEIGHT, repeatable; weights in [0, 1]
        #[arg(long = "weight", value_parser = parse_weight)]
        weights: Vec<(String, f64)>,
        /// Rank window, e.g. 1-5
        #[arg(long, default_value = "1-5")]
        top: RankWindow,
    },
    /// Compare the features of the selected sale and one peer
    Explain {
        /// Display name of the selected sale
        #[arg(long)]
        sale: String,
        /// Peer sale identifier or display name
        #[arg(long)]
        peer: String,
        /// Dimension label or key, or "all"
        #[arg(long, default_value = "all")]
        dimension: Scope,
    },
}

fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (dimension, weight) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected DIMENSION=WEIGHT, got '{}'", s))?;
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("weight '{}' is not a number", weight))?;
    Ok((dimension.trim().to_string(), weight))
}

fn init_logging(log_level: &str) -> anyhow::Result<()> {
    let log_level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), value)?;
    println!();
    Ok(())
}

fn resolve_sale(dataset: &Dataset, name: &str) -> anyhow::Result<SaleId> {
    Ok(dataset
        .catalog
        .resolve(name)
        .with_context(|| format!("no sale named '{}'", name))?
        .clone())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut files = match &args.files {
        Some(path) => DataFiles::from_json_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => DataFiles::in_dir(&args.data_dir),
    };
    if let Some(path) = args.rankings {
        files.rankings = path;
    }
    if let Some(path) = args.display_names {
        files.display_names = path;
    }
    if let Some(path) = args.features {
        files.features = path;
    }
    if let Some(path) = args.feature_columns {
        files.feature_columns = path;
    }
    if let Some(path) = args.dimensions_file {
        files = files.with_dimensions(path);
    }
    debug!(?files, "snapshot files");

    let store = SnapshotStore::new(files);
    let dataset = store.dataset().context("loading snapshot tables")?;
    if let Some(report) = store.report() {
        info!(loaded_at = %report.loaded_at, "dataset ready");
    }

    match args.command {
        Command::Sales => {
            let sales: Vec<_> = dataset
                .catalog
                .display_names()
                .iter()
                .filter_map(|name| {
                    let id = dataset.catalog.resolve(name).ok()?;
                    Some(json!({ "name": name, "sale_uid": id }))
                })
                .collect();
            print_json(&sales)
        }
        Command::Dimensions => print_json(&*dataset.registry),
        Command::Thematic {
            sale,
            dimensions,
            top,
        } => {
            let focal = resolve_sale(&dataset, &sale)?;
            let dimensions = if dimensions.is_empty() {
                DEFAULT_DIMENSIONS.iter().map(|d| d.to_string()).collect()
            } else {
                dimensions
            };

            let engine = RankingEngine::from_dataset(&dataset);
            let rankings = engine.rank_thematic(focal.as_str(), &dimensions, top)?;
            let chart = rank_similarity_points(&rankings);
            let sections: Vec<_> = rankings
                .iter()
                .map(|r| {
                    json!({
                        "dimension": r.dimension,
                        "heading": format!("{} {}", r.emoji, r.label),
                        "summary": RankingSummary::compute(&r.results),
                        "results": r.results.iter()
                            .map(|p| PeerRow::from_ranked(&dataset.catalog, p))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();

            print_json(&json!({
                "sale": SaleCard::new(&dataset.catalog, &focal)?,
                "window": top,
                "rankings": sections,
                "chart": chart,
            }))
        }
        Command::Global { sale, weights, top } => {
            let focal = resolve_sale(&dataset, &sale)?;
            if weights.is_empty() {
                bail!("at least one --weight DIMENSION=WEIGHT is required");
            }
            let weights = Weights::from_pairs(&dataset.registry, weights)?;

            let engine = RankingEngine::from_dataset(&dataset);
            let results = engine.rank_weighted(focal.as_str(), &weights, top)?;

            print_json(&json!({
                "sale": SaleCard::new(&dataset.catalog, &focal)?,
                "heading": format!("{} {}", GLOBAL_EMOJI, GLOBAL_LABEL),
                "window": top,
                "weights": weights,
                "weights_sum_to_one": weights.is_normalized(),
                "summary": RankingSummary::compute(&results),
                "results": results.iter()
                    .map(|p| json!({
                        "row": PeerRow::from_weighted(&dataset.catalog, p),
                        "contributions": p.contributions,
                    }))
                    .collect::<Vec<_>>(),
            }))
        }
        Command::Explain {
            sale,
            peer,
            dimension,
        } => {
            let focal = resolve_sale(&dataset, &sale)?;
            let peer = if dataset.catalog.contains(&peer) || dataset.features.contains(&peer) {
                SaleId::new(peer)
            } else {
                resolve_sale(&dataset, &peer)?
            };

            let comparator = FeatureComparator::from_dataset(&dataset);
            let explanation = comparator.explain(focal.as_str(), peer.as_str(), &dimension)?;
            print_json(&explanation)
        }
    }
}
