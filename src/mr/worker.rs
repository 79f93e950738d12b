use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::mr::{
    bucket::{BucketSummary, BucketWriter},
    config::MapConfig,
    error::{MapError, MapResult},
    record::KeyValue,
    shard::read_shard,
    task::MapTask,
};

/// The result of one finished map task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapOutput {
    pub task: MapTask,
    pub shard: PathBuf,
    /// How many records the map function emitted
    pub records: u64,
    /// One entry per reduce task, in reduce task order
    pub buckets: Vec<BucketSummary>,
}

/// Calls the user-defined map function, exactly once
/// The function gets the shard's name and its whole contents
pub fn call_map_func<F>(map_func: &F, file: &str, contents: &str) -> MapResult<Vec<KeyValue>>
where
    F: Fn(&str, &str) -> anyhow::Result<Vec<KeyValue>> + ?Sized,
{
    map_func(file, contents).map_err(|source| MapError::Transform {
        shard: file.to_string(),
        source,
    })
}

/// Runs map tasks on this machine
/// A worker holds no per-task state, so one worker may run several tasks at once
#[derive(Debug, Clone, Default)]
pub struct MapWorker {
    config: MapConfig,
}

impl MapWorker {
    pub fn new(config: MapConfig) -> Self {
        Self { config }
    }

    /// Do one map task: read `shard`, map it, and write the records to `task.n_reduce`
    /// intermediate files under the configured output directory
    ///
    /// The stages run strictly in order, so an unreadable shard never reaches `map_func`,
    /// and a failing `map_func` never creates an intermediate file. Any error ends the task,
    /// files written so far stay where they are.
    /// `shard` must be valid UTF-8 since `map_func` receives it as `&str`
    pub fn map<F>(&self, task: &MapTask, shard: &Path, map_func: &F) -> MapResult<MapOutput>
    where
        F: Fn(&str, &str) -> anyhow::Result<Vec<KeyValue>> + ?Sized,
    {
        task.validate()?;
        info!(
            "[Map] Worker is reading input file {} for map task #{} of job {}",
            shard.display(),
            task.map_task,
            task.job_name
        );
        // The map function identifies the shard by name, which has to be exact
        let file_name = shard.to_str().ok_or_else(|| MapError::ShardName {
            path: shard.to_path_buf(),
        })?;
        let contents = read_shard(shard)?;

        let key_value_pairs = call_map_func(map_func, file_name, &contents)?;
        debug!(
            "[Map] Map function emitted {} key-value pairs for map task #{}",
            key_value_pairs.len(),
            task.map_task
        );

        // Every intermediate file is created before the first record goes out
        let mut writer =
            BucketWriter::create(&self.config.output_dir, task, self.config.sync_outputs)?;
        for kv in &key_value_pairs {
            writer.append(kv)?;
        }
        let buckets = writer.finish()?;

        info!(
            "[Map] Worker finished map task #{}, {} records written to {} intermediate files in {}",
            task.map_task,
            key_value_pairs.len(),
            buckets.len(),
            self.config.output_dir.display()
        );

        Ok(MapOutput {
            task: task.clone(),
            shard: shard.to_path_buf(),
            records: key_value_pairs.len() as u64,
            buckets,
        })
    }
}
