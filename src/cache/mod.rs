//! Cache Layer
//!
//! A small key-value capability injected into the components that need it,
//! plus the per-owner creation draft log built on top of it.

mod draft_log;
mod memory;

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};

pub use draft_log::{DraftLog, DEFAULT_KEY_PREFIX};
pub use memory::MemoryCache;

/// String key-value store
///
/// Entries may be lost at any time (restart, eviction by the backend);
/// callers must treat the cache as best-effort.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Store `value` under `key`. `ttl = None` keeps it until overwritten.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> DomainResult<()>;
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
