//! Task Search Operations

use async_trait::async_trait;
use rusqlite::params;

use super::super::db::not_initialized;
use super::super::traits::SearchableRepository;
use super::task_repo::{row_to_task, TaskRepository, TASK_COLUMNS};
use crate::domain::{DomainError, DomainResult, Task};

#[async_trait]
impl SearchableRepository<Task> for TaskRepository {
    /// Case-sensitive substring match on the title, in list order
    async fn search(&self, owner_id: u32, query: &str) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE owner_id = ?1 AND instr(title, ?2) > 0 ORDER BY position ASC, id ASC",
            TASK_COLUMNS
        ))?;
        let tasks = stmt
            .query_map(params![owner_id, query], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

/// Counting queries used by the task list view
#[async_trait]
pub trait TaskSearchOperations {
    /// Number of the owner's tasks not yet complete
    async fn count_incomplete(&self, owner_id: u32) -> DomainResult<usize>;
}

#[async_trait]
impl TaskSearchOperations for TaskRepository {
    async fn count_incomplete(&self, owner_id: u32) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE owner_id = ?1 AND complete = 0",
            params![owner_id],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|e| DomainError::Internal(e.to_string()))
    }
}
