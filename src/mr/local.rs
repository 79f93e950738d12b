//! Runs a whole map phase on one machine
//!
//! Map task `i` reads `shards[i]`. Different map tasks never share an intermediate file,
//! so they run side by side on the rayon pool without any locking

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{error, info};

use crate::mr::{
    error::MapResult,
    record::KeyValue,
    task::MapTask,
    worker::{MapOutput, MapWorker},
};

/// Map every shard of `job_name` into `n_reduce` buckets
/// Fails with the error of the lowest-numbered failed task; the other tasks still run to
/// completion and their files are kept
pub fn map_all<F>(
    worker: &MapWorker,
    job_name: &str,
    shards: &[PathBuf],
    n_reduce: usize,
    map_func: &F,
) -> MapResult<Vec<MapOutput>>
where
    F: Fn(&str, &str) -> anyhow::Result<Vec<KeyValue>> + Sync + ?Sized,
{
    let tasks = (0..shards.len())
        .map(|map_task| MapTask::new(job_name, map_task, n_reduce))
        .collect::<MapResult<Vec<_>>>()?;

    info!(
        "[Map] Running #{} map tasks | #{} reduce tasks for job {}",
        tasks.len(),
        n_reduce,
        job_name
    );

    let results = tasks
        .par_iter()
        .zip(shards.par_iter())
        .map(|(task, shard)| {
            worker.map(task, shard, map_func).inspect_err(|e| {
                error!("[Map] Map task #{} failed: {}", task.map_task, e);
            })
        })
        .collect::<Vec<_>>();

    results.into_iter().collect()
}
