//! Creation Draft Log
//!
//! Every submitted creation payload is appended to a per-owner JSON array
//! in the cache, with no expiry. Nothing in the request path reads it back.
//!
//! `record` is a plain get-append-set against the cache. Two concurrent
//! records for the same owner can both read the old array and the later
//! `set` wins, dropping the other entry.

use std::sync::Arc;

use super::KeyValueCache;
use crate::domain::{DomainResult, TaskDraft};

pub const DEFAULT_KEY_PREFIX: &str = "task_form_";

#[derive(Clone)]
pub struct DraftLog {
    cache: Arc<dyn KeyValueCache>,
    key_prefix: String,
}

impl DraftLog {
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self::with_prefix(cache, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(cache: Arc<dyn KeyValueCache>, key_prefix: impl Into<String>) -> Self {
        Self {
            cache,
            key_prefix: key_prefix.into(),
        }
    }

    /// Cache key holding `owner_id`'s drafts
    pub fn key(&self, owner_id: u32) -> String {
        format!("{}{}", self.key_prefix, owner_id)
    }

    /// Append `draft` to the owner's log
    pub async fn record(&self, owner_id: u32, draft: &TaskDraft) -> DomainResult<()> {
        let key = self.key(owner_id);
        let mut drafts = self.read(&key).await?;
        drafts.push(draft.clone());
        self.cache
            .set(&key, serde_json::to_string(&drafts)?, None)
            .await
    }

    /// Drafts recorded for the owner, oldest first
    pub async fn history(&self, owner_id: u32) -> DomainResult<Vec<TaskDraft>> {
        self.read(&self.key(owner_id)).await
    }

    async fn read(&self, key: &str) -> DomainResult<Vec<TaskDraft>> {
        let Some(raw) = self.cache.get(key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(drafts) => Ok(drafts),
            Err(e) => {
                log::warn!("Discarding unreadable draft log {}: {}", key, e);
                Ok(Vec::new())
            }
        }
    }
}
