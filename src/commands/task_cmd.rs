//! Task Commands
//!
//! List, detail, create, update, delete and reorder for the requesting owner.

use serde::Serialize;

use super::error::{CommandError, CommandResult, Redirect};
use crate::domain::{DomainError, DomainResult, Task};
use crate::forms::{FormData, PositionForm, TaskForm};
use crate::guard::{AccessGuard, OwnerScope, Session};
use crate::routes;
use crate::AppState;

/// Query parameter carrying the title filter
pub const SEARCH_PARAM: &str = "search-area";

/// Data for the task list page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskListView {
    pub tasks: Vec<Task>,
    /// Incomplete tasks, counted before the search filter
    pub count: usize,
    pub search_input: String,
}

/// The `search-area` value of a decoded query string
pub fn search_param(query: &FormData) -> Option<&str> {
    query.get(SEARCH_PARAM)
}

fn scope<'a>(state: &'a AppState, session: &'a Session, path: &str) -> CommandResult<OwnerScope<'a>> {
    AccessGuard::scope(session, path, &state.tasks).map_err(|e| fail(state, e))
}

fn fail(state: &AppState, err: DomainError) -> CommandError {
    CommandError::from_domain(err, &state.config.login_url)
}

/// List the owner's tasks, optionally filtered by title
pub async fn list_tasks(
    state: &AppState,
    session: &Session,
    search_input: Option<&str>,
) -> CommandResult<TaskListView> {
    let tasks = scope(state, session, routes::TASKS)?;
    let search_input = search_input.unwrap_or_default().to_string();

    let count = tasks.count_incomplete().await.map_err(|e| fail(state, e))?;
    let listed = if search_input.is_empty() {
        tasks.list().await.map_err(|e| fail(state, e))?
    } else {
        tasks.search(&search_input).await.map_err(|e| fail(state, e))?
    };

    Ok(TaskListView {
        tasks: listed,
        count,
        search_input,
    })
}

/// Get one of the owner's tasks
pub async fn get_task(state: &AppState, session: &Session, id: u32) -> CommandResult<Task> {
    let tasks = scope(state, session, &routes::task_detail(id))?;
    tasks.find(id).await.map_err(|e| fail(state, e))
}

/// Create a task at the end of the owner's list
pub async fn create_task(
    state: &AppState,
    session: &Session,
    form: &FormData,
) -> CommandResult<Redirect> {
    let tasks = scope(state, session, routes::TASK_CREATE)?;
    let draft = TaskForm::parse(form)?;

    let task = tasks.create(&draft).await.map_err(|e| fail(state, e))?;

    if let Some(drafts) = &state.drafts {
        // The draft log is best-effort; the task already exists
        if let Err(e) = drafts.record(task.owner_id, &draft).await {
            log::warn!("Failed to record creation draft for owner {}: {}", task.owner_id, e);
        }
    }

    log::info!("Task created: {} by {}", task.title, tasks.owner().username);
    Ok(Redirect::to(routes::TASKS))
}

/// Replace the editable fields of one of the owner's tasks
pub async fn update_task(
    state: &AppState,
    session: &Session,
    id: u32,
    form: &FormData,
) -> CommandResult<Redirect> {
    let tasks = scope(state, session, &routes::task_update(id))?;
    // Existence first, so a foreign id is NotFound even with a bad form
    tasks.find(id).await.map_err(|e| fail(state, e))?;
    let draft = TaskForm::parse(form)?;

    tasks.update(id, &draft).await.map_err(|e| fail(state, e))?;
    Ok(Redirect::to(routes::TASKS))
}

/// Delete one of the owner's tasks; remaining order keys are kept
pub async fn delete_task(state: &AppState, session: &Session, id: u32) -> CommandResult<Redirect> {
    let tasks = scope(state, session, &routes::task_delete(id))?;
    tasks.delete(id).await.map_err(|e| fail(state, e))?;
    Ok(Redirect::to(routes::TASKS))
}

/// Apply a drag-and-drop order submitted as `position=7,3,9`
///
/// Ids that are unknown or belong to another owner are ignored; the caller
/// gets the same redirect either way.
pub async fn reorder_tasks(
    state: &AppState,
    session: &Session,
    form: &FormData,
) -> CommandResult<Redirect> {
    let tasks = scope(state, session, routes::TASK_REORDER)?;
    let position = PositionForm::parse(form)?;

    apply_order(state, &tasks, &position.ids)
        .await
        .map_err(|e| fail(state, e))?;
    Ok(Redirect::to(routes::TASKS))
}

async fn apply_order(state: &AppState, tasks: &OwnerScope<'_>, ids: &[u32]) -> DomainResult<()> {
    let outcome = if state.config.ordering.repair_after_reorder {
        tasks.reorder_dense(ids).await?
    } else {
        tasks.reorder(ids).await?
    };
    log::info!(
        "Reordered tasks for {}: {} applied, {} skipped",
        tasks.owner().username,
        outcome.applied,
        outcome.skipped.len()
    );
    Ok(())
}
