//! Street-asset lookup.
//!
//! Loads a footpath dataset into a quadtree, then answers `<longitude> <latitude>`
//! queries from stdin. Matching records go to the output file; the quadrant path of
//! every matching point goes to stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use footpath_quadtree::{
    Config, QuadTree, Query, QueryResult, RecordStore, Schema, DEFAULT_NODE_CAPACITY,
};

#[derive(Parser, Debug)]
#[command(name = "footpath-quadtree")]
#[command(about = "Index street-asset coordinates in a quadtree and look them up")]
struct Args {
    /// Stage to run (only stage 3 is supported)
    stage: String,

    /// Input dataset (CSV with a header row)
    dataset: PathBuf,

    /// File receiving the matching records for every query
    output: PathBuf,

    /// Longitude of the bottom-left corner of the root area
    #[arg(allow_negative_numbers = true)]
    min_lon: f64,

    /// Latitude of the bottom-left corner of the root area
    #[arg(allow_negative_numbers = true)]
    min_lat: f64,

    /// Longitude of the top-right corner of the root area
    #[arg(allow_negative_numbers = true)]
    max_lon: f64,

    /// Latitude of the top-right corner of the root area
    #[arg(allow_negative_numbers = true)]
    max_lat: f64,

    /// Items a quadtree node holds before it subdivides
    #[arg(long, default_value_t = DEFAULT_NODE_CAPACITY)]
    capacity: usize,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut config = Config::new(
            args.dataset,
            args.output,
            [args.min_lon, args.min_lat, args.max_lon, args.max_lat],
        );
        config.stage = args.stage;
        config.node_capacity = args.capacity;
        config
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the summary
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from(Args::parse());
    config.check_stage()?;

    let boundary = config.root_boundary()?;
    let mut tree = QuadTree::new(boundary, config.node_capacity)?;
    let mut store = RecordStore::new();

    info!("Loading dataset {}", config.dataset.display());
    let dataset = File::open(&config.dataset)
        .with_context(|| format!("Failed to open dataset {}", config.dataset.display()))?;
    store
        .ingest(BufReader::new(dataset), &mut tree)
        .with_context(|| format!("Failed to load dataset {}", config.dataset.display()))?;

    let output = File::create(&config.output)
        .with_context(|| format!("Failed to create output file {}", config.output.display()))?;
    let mut details = BufWriter::new(output);
    let stdout = io::stdout();
    let mut summary = BufWriter::new(stdout.lock());

    let schema = Schema::FOOTPATH;
    let mut answered = 0usize;
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read query from stdin")?;
        let query = match Query::parse(&line) {
            Ok(Some(query)) => query,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping query: {e}");
                continue;
            }
        };

        let result = QueryResult::run(query, &store, &tree);
        result
            .write_details(&mut details, &schema)
            .context("Failed to write details")?;
        result
            .write_summary(&mut summary)
            .context("Failed to write summary")?;
        answered += 1;
    }

    details.flush().context("Failed to flush output file")?;
    summary.flush().context("Failed to flush stdout")?;
    info!("Answered {} queries", answered);
    Ok(())
}
