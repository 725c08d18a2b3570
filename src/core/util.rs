//! Common utilities

use xxhash_rust::xxh3::xxh3_64;

/// Compute the xxh3 hash of bytes as lowercase hex
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}

/// Current time in milliseconds since epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
