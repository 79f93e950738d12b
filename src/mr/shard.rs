use std::{
    fs::File,
    io::Read,
    path::Path,
};

use tracing::debug;

use crate::mr::error::{MapError, MapResult};

/// Read the whole input shard into memory
/// The size is taken from the file's metadata up front, anything shorter is a failed read.
/// The file is closed when `file` goes out of scope, on every path out of here
pub fn read_shard(path: &Path) -> MapResult<String> {
    let file = File::open(path).map_err(|source| MapError::OpenShard {
        path: path.to_path_buf(),
        source,
    })?;

    let expected = file
        .metadata()
        .map_err(|source| MapError::StatShard {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let mut data = Vec::with_capacity(expected as usize);
    let actual = file
        .take(expected)
        .read_to_end(&mut data)
        .map_err(|source| MapError::ReadShard {
            path: path.to_path_buf(),
            source,
        })? as u64;
    if actual != expected {
        return Err(MapError::ShortRead {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }

    debug!("[Map] Read {} bytes from shard {}", actual, path.display());

    String::from_utf8(data).map_err(|source| MapError::ShardEncoding {
        path: path.to_path_buf(),
        source,
    })
}
