use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::mr::{
    codec::RecordWriter,
    error::{MapError, MapResult},
    partition::bucket_for,
    record::KeyValue,
    task::MapTask,
};

/// What ended up in one intermediate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    /// The reduce task this file is for
    pub reduce: usize,
    pub path: PathBuf,
    pub records: u64,
}

/// One open intermediate file
/// Dropping it closes the file, whether or not `finish` ran
struct Bucket {
    reduce: usize,
    path: PathBuf,
    writer: RecordWriter<BufWriter<File>>,
}

impl Bucket {
    fn create(path: PathBuf, reduce: usize) -> MapResult<Self> {
        let file = File::create(&path).map_err(|source| MapError::CreateOutput {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            reduce,
            path,
            writer: RecordWriter::new(BufWriter::new(file)),
        })
    }

    fn write(&mut self, kv: &KeyValue) -> MapResult<()> {
        self.writer
            .write(kv)
            .map_err(|source| MapError::WriteOutput {
                path: self.path.clone(),
                source,
            })
    }

    fn finish(mut self, sync: bool) -> MapResult<BucketSummary> {
        let mut flushed = self.writer.flush();
        if sync && flushed.is_ok() {
            flushed = self.writer.get_ref().get_ref().sync_all();
        }
        if let Err(source) = flushed {
            return Err(MapError::FinishOutput {
                path: self.path,
                source,
            });
        }
        Ok(BucketSummary {
            reduce: self.reduce,
            records: self.writer.records_written(),
            path: self.path,
        })
    }
}

/// Spreads one map task's records over its `n_reduce` intermediate files
pub struct BucketWriter {
    task: MapTask,
    buckets: Vec<Bucket>,
    sync: bool,
}

impl BucketWriter {
    /// Create (or truncate) all `n_reduce` intermediate files of `task` under `dir`
    /// Nothing is written until every file exists; if one can't be created the ones
    /// already created are closed and left empty on disk.
    /// `task` must already be valid, see `MapTask::validate`
    pub fn create(dir: &Path, task: &MapTask, sync: bool) -> MapResult<Self> {
        let mut buckets = Vec::with_capacity(task.n_reduce);
        for reduce in 0..task.n_reduce {
            buckets.push(Bucket::create(task.output_path(dir, reduce), reduce)?);
        }
        debug!(
            "[Map] Created {} intermediate files for map task #{} of job {}",
            buckets.len(),
            task.map_task,
            task.job_name
        );
        Ok(Self {
            task: task.clone(),
            buckets,
            sync,
        })
    }

    /// Encode `kv` into the file of the bucket its key hashes to, returning that bucket
    pub fn append(&mut self, kv: &KeyValue) -> MapResult<usize> {
        let index = bucket_for(kv.key(), self.task.n_reduce);
        self.buckets[index].write(kv)?;
        Ok(index)
    }

    /// Flush and close every intermediate file, in bucket order
    /// On failure the remaining files are still closed, but nothing is removed
    pub fn finish(self) -> MapResult<Vec<BucketSummary>> {
        let mut summaries = Vec::with_capacity(self.buckets.len());
        for bucket in self.buckets {
            match bucket.finish(self.sync) {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    warn!(
                        "[Map] Map task #{} of job {} left incomplete intermediate files behind: {}",
                        self.task.map_task, self.task.job_name, e
                    );
                    return Err(e);
                }
            }
        }
        Ok(summaries)
    }
}
