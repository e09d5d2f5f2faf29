//! Task Entity
//!
//! A single entry in an owner's ordered task list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Owned};

/// A task owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store
    pub id: u32,
    /// Owner; never changes after creation
    pub owner_id: u32,
    pub title: String,
    pub description: String,
    /// Completion status
    pub complete: bool,
    pub created_at: DateTime<Utc>,
    /// Order key among the owner's tasks
    pub position: i32,
}

impl Task {
    /// Build an unsaved task from a draft
    pub fn from_draft(owner_id: u32, draft: &TaskDraft) -> Self {
        Self {
            id: 0,
            owner_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            complete: draft.complete,
            created_at: Utc::now(),
            position: 0,
        }
    }
}

impl Entity for Task {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Owned for Task {
    fn owner_id(&self) -> u32 {
        self.owner_id
    }
}

/// User-submitted task fields, as accepted by create and update
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub complete: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            complete: false,
        }
    }
}
