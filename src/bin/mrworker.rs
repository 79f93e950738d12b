use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use map_task_rs::mr::{
    function::{ii, wc},
    local::map_all,
    MapConfig, MapWorker,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum App {
    /// Word count
    Wc,
    /// Inverted index
    Ii,
}

/// Run the map phase of a job over the given input shards
/// Map task `i` reads the `i`-th shard and writes `mrtmp.<job>-<i>-<r>` for every reduce task `r`
#[derive(Debug, Parser)]
#[command(name = "mrworker")]
struct Args {
    /// The name of the MapReduce job
    #[arg(long)]
    job: String,

    /// The number of reduce tasks
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    reduce: u64,

    /// The map function to run
    #[arg(long, value_enum, default_value_t = App::Wc)]
    app: App,

    /// Where the intermediate files go, overrides MR_OUTPUT_DIR
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Whether to fsync every intermediate file once it is complete, overrides MR_SYNC_OUTPUTS
    #[arg(long, value_name = "BOOL")]
    sync: Option<bool>,

    /// The input shards, in map task order
    #[arg(required = true)]
    shards: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mrworker=info,map_task_rs=info")),
        )
        .init();

    let args = Args::parse();

    let config = MapConfig::from_env().with_overrides(args.output_dir, args.sync);

    info!(
        "[Worker Configuration] #{} Map Tasks | #{} Reduce Tasks | output in {}",
        args.shards.len(),
        args.reduce,
        config.output_dir.display()
    );

    let worker = MapWorker::new(config);
    let (job, shards, n_reduce, app) = (args.job, args.shards, args.reduce as usize, args.app);

    // The map phase is plain blocking file I/O, keep it off the async workers
    let outputs = tokio::task::spawn_blocking(move || match app {
        App::Wc => map_all(&worker, &job, &shards, n_reduce, &wc::map),
        App::Ii => map_all(&worker, &job, &shards, n_reduce, &ii::map),
    })
    .await
    .context("the map phase panicked")??;

    let records = outputs.iter().map(|o| o.records).sum::<u64>();
    info!(
        "The map phase has finished, {} records in {} intermediate files",
        records,
        outputs.iter().map(|o| o.buckets.len()).sum::<usize>()
    );

    Ok(())
}
