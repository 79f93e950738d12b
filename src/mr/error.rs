//! Errors raised while running a map task
//!
//! Nothing here is retried, every variant is fatal to the task that raised it.
//! The scheduler owning the task is expected to run it again on fresh outputs

use std::{io, path::PathBuf};

use thiserror::Error;

pub type MapResult<T> = Result<T, MapError>;

/// The coarse error classes a caller has to distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The task identity itself is unusable
    InvalidTask,
    /// A shard or an intermediate file could not be read or written
    Io,
    /// The user map function failed
    Transform,
}

/// The pipeline stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    ReadShard,
    Transform,
    WriteBuckets,
    ReadBucket,
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("invalid map task: {0}")]
    InvalidTask(String),

    #[error("[read shard] cannot open {path}: {source}")]
    OpenShard { path: PathBuf, source: io::Error },

    #[error("[read shard] cannot stat {path}: {source}")]
    StatShard { path: PathBuf, source: io::Error },

    #[error("[read shard] cannot read {path}: {source}")]
    ReadShard { path: PathBuf, source: io::Error },

    #[error("[read shard] short read on {path}: expected {expected} bytes, got {actual}")]
    ShortRead {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("[read shard] the shard name {path} is not valid UTF-8")]
    ShardName { path: PathBuf },

    #[error("[read shard] {path} is not valid UTF-8: {source}")]
    ShardEncoding {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[error("[transform] map function failed on {shard}: {source:#}")]
    Transform {
        shard: String,
        source: anyhow::Error,
    },

    #[error("[write buckets] cannot create {path}: {source}")]
    CreateOutput { path: PathBuf, source: io::Error },

    #[error("[write buckets] cannot write record to {path}: {source}")]
    WriteOutput { path: PathBuf, source: io::Error },

    #[error("[write buckets] cannot finish {path}: {source}")]
    FinishOutput { path: PathBuf, source: io::Error },

    #[error("[read bucket] cannot open {path}: {source}")]
    OpenBucket { path: PathBuf, source: io::Error },

    #[error("[read bucket] malformed record #{index}: {source}")]
    Decode {
        index: u64,
        source: serde_json::Error,
    },
}

impl MapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTask(_) => ErrorKind::InvalidTask,
            Self::Transform { .. } => ErrorKind::Transform,
            _ => ErrorKind::Io,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidTask(_) => Stage::Validate,
            Self::OpenShard { .. }
            | Self::StatShard { .. }
            | Self::ReadShard { .. }
            | Self::ShortRead { .. }
            | Self::ShardName { .. }
            | Self::ShardEncoding { .. } => Stage::ReadShard,
            Self::Transform { .. } => Stage::Transform,
            Self::CreateOutput { .. } | Self::WriteOutput { .. } | Self::FinishOutput { .. } => {
                Stage::WriteBuckets
            }
            Self::OpenBucket { .. } | Self::Decode { .. } => Stage::ReadBucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_errors_are_classified_apart_from_io() {
        let err = MapError::Transform {
            shard: "pg-0.txt".to_string(),
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(err.kind(), ErrorKind::Transform);
        assert_eq!(err.stage(), Stage::Transform);
        assert!(err.to_string().contains("pg-0.txt"));
        assert!(err.to_string().contains("boom"));

        let err = MapError::CreateOutput {
            path: PathBuf::from("out/mrtmp.wc-0-1"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.stage(), Stage::WriteBuckets);
        assert!(err.to_string().contains("mrtmp.wc-0-1"));
    }
}
