//! Key to bucket assignment
//!
//! The reduce phase relies on every map task agreeing on where a key goes, so the hash
//! is fixed to 32-bit FNV-1a rather than std's `DefaultHasher`, whose output is not
//! guaranteed across releases

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the raw bytes of `key`
pub fn ihash(key: &str) -> u32 {
    key.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// The bucket, i.e. the reduce task, that owns `key`
/// `n_reduce` must be at least 1, which `MapTask::validate` guarantees
pub fn bucket_for(key: &str, n_reduce: usize) -> usize {
    debug_assert!(n_reduce > 0);
    (ihash(key) as u64 % n_reduce as u64) as usize
}
