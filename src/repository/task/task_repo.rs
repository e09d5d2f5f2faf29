//! Task Repository - Core CRUD Operations
//!
//! SQLite-backed, owner-scoped implementation of task CRUD.
//! Specialized operations are in separate modules:
//! - task_positioning: Order key management
//! - task_search: Search and counts

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::super::db::{not_initialized, SharedConnection};
use super::super::traits::OwnedRepository;
use crate::domain::{DomainError, DomainResult, Task, TaskDraft};

pub(super) const TASK_COLUMNS: &str =
    "id, owner_id, title, description, complete, created_at, position";

/// SQLite implementation of the task repository
#[derive(Clone)]
pub struct TaskRepository {
    pub(super) conn: SharedConnection,
}

impl TaskRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl OwnedRepository<Task> for TaskRepository {
    type Draft = TaskDraft;

    async fn create(&self, owner_id: u32, draft: &TaskDraft) -> DomainResult<Task> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Tail position is computed under the same lock as the insert
        let position: i32 = conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM tasks WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )?;

        let mut task = Task::from_draft(owner_id, draft);
        task.position = position;

        conn.execute(
            "INSERT INTO tasks (owner_id, title, description, complete, created_at, position) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                owner_id,
                task.title,
                task.description,
                task.complete,
                task.created_at.timestamp_millis(),
                position
            ],
        )?;

        task.id = u32::try_from(conn.last_insert_rowid())
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        // Stored precision is milliseconds
        task.created_at = millis_to_datetime(task.created_at.timestamp_millis())?;
        Ok(task)
    }

    async fn find(&self, owner_id: u32, id: u32) -> DomainResult<Task> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_owned(conn, owner_id, id)
    }

    async fn list(&self, owner_id: u32) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE owner_id = ?1 ORDER BY position ASC, id ASC",
            TASK_COLUMNS
        ))?;
        let tasks = stmt
            .query_map(params![owner_id], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    async fn update(&self, owner_id: u32, id: u32, draft: &TaskDraft) -> DomainResult<Task> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, complete = ?3 WHERE id = ?4 AND owner_id = ?5",
            params![draft.title, draft.description, draft.complete, id, owner_id],
        )?;
        if changed == 0 {
            return Err(task_not_found(id));
        }

        find_owned(conn, owner_id, id)
    }

    async fn delete(&self, owner_id: u32, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Survivors keep their order keys; only an explicit reorder renumbers
        let changed = conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
        )?;
        if changed == 0 {
            return Err(task_not_found(id));
        }
        Ok(())
    }
}

pub(super) fn find_owned(conn: &rusqlite::Connection, owner_id: u32, id: u32) -> DomainResult<Task> {
    conn.query_row(
        &format!(
            "SELECT {} FROM tasks WHERE id = ?1 AND owner_id = ?2",
            TASK_COLUMNS
        ),
        params![id, owner_id],
        row_to_task,
    )
    .optional()?
    .ok_or_else(|| task_not_found(id))
}

pub(super) fn task_not_found(id: u32) -> DomainError {
    DomainError::NotFound(format!("Task {} not found", id))
}

fn millis_to_datetime(millis: i64) -> DomainResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DomainError::Internal(format!("Invalid timestamp {}", millis)))
}

/// Convert a database row to Task
pub(super) fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let millis: i64 = row.get(5)?;
    let created_at = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(5, millis)
    })?;

    Ok(Task {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        complete: row.get(4)?,
        created_at,
        position: row.get(6)?,
    })
}
