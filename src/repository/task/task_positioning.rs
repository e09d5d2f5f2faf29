//! Task Positioning Operations
//!
//! Order key management: applying a submitted permutation as one
//! transaction, and the optional dense reindex.

use async_trait::async_trait;
use rusqlite::{params, Transaction};

use super::super::db::not_initialized;
use crate::domain::{DomainError, DomainResult};

/// What a reorder batch actually touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderOutcome {
    /// Rows whose order key was written
    pub applied: usize,
    /// Submitted ids that are unknown or owned by someone else
    pub skipped: Vec<u32>,
}

/// Trait for task positioning operations
#[async_trait]
pub trait TaskPositioningOperations {
    /// Set the order key of each of the owner's tasks to its index in `ids`.
    ///
    /// Ids that are unknown or belong to another owner are skipped without
    /// error. Tasks not mentioned keep their current key. All writes happen
    /// in a single transaction.
    async fn reorder(&self, owner_id: u32, ids: &[u32]) -> DomainResult<ReorderOutcome>;

    /// Renumber the owner's tasks to 0..n-1, keeping the current
    /// `(position, id)` order. Returns the number of tasks.
    async fn reindex(&self, owner_id: u32) -> DomainResult<usize>;

    /// `reorder` followed by `reindex`, committed as one transaction
    async fn reorder_dense(&self, owner_id: u32, ids: &[u32]) -> DomainResult<ReorderOutcome>;
}

#[async_trait]
impl TaskPositioningOperations for super::task_repo::TaskRepository {
    async fn reorder(&self, owner_id: u32, ids: &[u32]) -> DomainResult<ReorderOutcome> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let outcome = apply_positions(&tx, owner_id, ids)?;
        // Dropping `tx` on any error above rolls the whole batch back
        tx.commit()?;

        log_skipped(owner_id, &outcome);
        Ok(outcome)
    }

    async fn reindex(&self, owner_id: u32) -> DomainResult<usize> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let count = renumber(&tx, owner_id)?;
        tx.commit()?;

        Ok(count)
    }

    async fn reorder_dense(&self, owner_id: u32, ids: &[u32]) -> DomainResult<ReorderOutcome> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let outcome = apply_positions(&tx, owner_id, ids)?;
        let count = renumber(&tx, owner_id)?;
        tx.commit()?;

        log_skipped(owner_id, &outcome);
        log::debug!("Reindexed {} tasks for owner {}", count, owner_id);
        Ok(outcome)
    }
}

fn apply_positions(tx: &Transaction<'_>, owner_id: u32, ids: &[u32]) -> DomainResult<ReorderOutcome> {
    let mut outcome = ReorderOutcome::default();
    let mut stmt = tx.prepare("UPDATE tasks SET position = ?1 WHERE id = ?2 AND owner_id = ?3")?;
    for (idx, id) in ids.iter().enumerate() {
        let position = i32::try_from(idx)
            .map_err(|_| DomainError::InvalidInput("Too many positions".to_string()))?;
        if stmt.execute(params![position, id, owner_id])? == 0 {
            outcome.skipped.push(*id);
        } else {
            outcome.applied += 1;
        }
    }
    Ok(outcome)
}

fn renumber(tx: &Transaction<'_>, owner_id: u32) -> DomainResult<usize> {
    let ids = {
        let mut stmt = tx.prepare("SELECT id FROM tasks WHERE owner_id = ?1 ORDER BY position, id")?;
        let ids = stmt
            .query_map(params![owner_id], |row| row.get::<_, u32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        ids
    };

    let mut stmt = tx.prepare("UPDATE tasks SET position = ?1 WHERE id = ?2")?;
    for (new_pos, id) in ids.iter().enumerate() {
        let position = i32::try_from(new_pos)
            .map_err(|_| DomainError::Internal("Too many tasks to reindex".to_string()))?;
        stmt.execute(params![position, id])?;
    }

    Ok(ids.len())
}

fn log_skipped(owner_id: u32, outcome: &ReorderOutcome) {
    if !outcome.skipped.is_empty() {
        log::debug!(
            "Reorder for owner {} skipped {} foreign or unknown ids",
            owner_id,
            outcome.skipped.len()
        );
    }
}
