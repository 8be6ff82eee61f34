//! # TtlCache
//!
//! A fixed-capacity LRU map whose entries also expire a constant time after
//! insertion. Used to track in-flight correlation hashes: an entry lives from
//! request send until the response arrives, the caller gives up, or the TTL runs out.
//!
//! ## Lifecycle
//!
//! ```text
//! Absent --put--> Present(expires_at) --+--> Evicted (capacity, least recently used)
//!                                       +--> Expired (background sweep)
//!                                       +--> Absent  (remove / clear)
//! ```
//!
//! ## Invariants
//! - **Single Lock**: The entry table and both order indexes sit behind one mutex,
//!   so a reader never observes a half-evicted entry.
//! - **Constant TTL**: Every entry of one cache lives for the same duration, so
//!   insertion order is expiry order and the sweep can stop at the first live entry.
//! - **Terminal Clear**: `clear()` stops the sweep task and rejects later inserts.

mod cache;
mod config;


pub use cache::TtlCache;
pub use config::CacheConfig;

/// Cache errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The sweep task needs a tokio runtime and none was running.
    NoRuntime,
    /// The cache was cleared and no longer accepts entries.
    Closed,
    /// A configuration value is out of range.
    InvalidConfig(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoRuntime => write!(f, "No tokio runtime available for the sweep task"),
            Error::Closed => write!(f, "Cache has been cleared"),
            Error::InvalidConfig(msg) => write!(f, "Invalid cache configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
