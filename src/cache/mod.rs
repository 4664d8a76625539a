//! Cache Module
//!
//! Expiring key-value storage behind the [`CacheBackend`] trait: an in-memory
//! store with LRU eviction and stale retention, and a Redis store for shared
//! deployments.

mod backend;
mod entry;
mod handle;
mod lru;
mod redis_store;
mod stats;
mod store;


// Re-export public types
pub use backend::{CacheBackend, MemoryBackend};
pub use entry::CacheEntry;
pub use handle::{CacheHandle, CacheMode, CacheStatus};
pub use lru::LruTracker;
pub use redis_store::{escape_glob, shadow_key, RedisBackend, STALE_PREFIX};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
