//! The map phase of a MapReduce job
//!
//! One map task reads a shard, hands it to the user map function, and spreads the
//! emitted key-value pairs over `n_reduce` intermediate files named with `reduce_name`,
//! which is all a reduce task needs to find its input

pub mod bucket;
pub mod codec;
pub mod config;
pub mod error;
pub mod function;
pub mod local;
pub mod partition;
pub mod record;
pub mod shard;
pub mod task;
pub mod worker;

pub use config::MapConfig;
pub use error::{ErrorKind, MapError, Stage};
pub use record::KeyValue;
pub use task::{reduce_name, MapTask};
pub use worker::{MapOutput, MapWorker};
