use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::mr::error::{MapError, MapResult};

/// The identity of one map task, handed over by whoever schedules it
/// It never changes while the task runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTask {
    /// The name of the MapReduce job
    pub job_name: String,
    /// Which map task this is, also which shard it reads
    pub map_task: usize,
    /// The number of reduce tasks, i.e. the number of buckets ("R" in the paper)
    pub n_reduce: usize,
}

/// The name of the intermediate file holding map task `map_task`'s records for reduce task `reduce_task`
/// The reduce phase rebuilds exactly this name to find its input, so it must never change
pub fn reduce_name(job_name: &str, map_task: usize, reduce_task: usize) -> String {
    format!("mrtmp.{}-{}-{}", job_name, map_task, reduce_task)
}

impl MapTask {
    pub fn new(job_name: impl Into<String>, map_task: usize, n_reduce: usize) -> MapResult<Self> {
        let task = Self {
            job_name: job_name.into(),
            map_task,
            n_reduce,
        };
        task.validate()?;
        Ok(task)
    }

    /// Check the identity can be turned into `n_reduce` distinct file names
    pub fn validate(&self) -> MapResult<()> {
        if self.n_reduce == 0 {
            return Err(MapError::InvalidTask(
                "the number of reduce tasks must be at least 1".to_string(),
            ));
        }
        if self.job_name.is_empty() {
            return Err(MapError::InvalidTask("the job name is empty".to_string()));
        }
        // The job name ends up inside a file name
        if self.job_name.contains(['/', '\\']) {
            return Err(MapError::InvalidTask(format!(
                "the job name {:?} contains a path separator",
                self.job_name
            )));
        }
        Ok(())
    }

    pub fn output_name(&self, reduce_task: usize) -> String {
        reduce_name(&self.job_name, self.map_task, reduce_task)
    }

    pub fn output_path(&self, dir: &Path, reduce_task: usize) -> PathBuf {
        dir.join(self.output_name(reduce_task))
    }
}
