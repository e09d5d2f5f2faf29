//! Access Guard
//!
//! Binds every task operation to the authenticated owner of the request.
//! Anonymous requests fail with `AuthenticationRequired`; operations on
//! another owner's task fail with `NotFound`, exactly as if it did not exist.

use crate::domain::{DomainError, DomainResult, Owner, Task, TaskDraft};
use crate::repository::{
    OwnedRepository, ReorderOutcome, SearchableRepository, TaskPositioningOperations,
    TaskRepository, TaskSearchOperations,
};

/// Identity of the current request, as supplied by the session provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    owner: Option<Owner>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { owner: None }
    }

    pub fn authenticated(owner: Owner) -> Self {
        Self { owner: Some(owner) }
    }

    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }
}

pub struct AccessGuard;

impl AccessGuard {
    /// The session's owner, or `AuthenticationRequired` naming `requested_path`
    pub fn require<'a>(session: &'a Session, requested_path: &str) -> DomainResult<&'a Owner> {
        session
            .owner()
            .ok_or_else(|| DomainError::AuthenticationRequired {
                next: requested_path.to_string(),
            })
    }

    /// Task operations bound to the session's owner
    pub fn scope<'a>(
        session: &'a Session,
        requested_path: &str,
        tasks: &'a TaskRepository,
    ) -> DomainResult<OwnerScope<'a>> {
        let owner = Self::require(session, requested_path)?;
        Ok(OwnerScope { owner, tasks })
    }
}

/// The task store as seen by one owner
pub struct OwnerScope<'a> {
    owner: &'a Owner,
    tasks: &'a TaskRepository,
}

impl<'a> OwnerScope<'a> {
    pub fn owner(&self) -> &'a Owner {
        self.owner
    }

    pub async fn list(&self) -> DomainResult<Vec<Task>> {
        self.tasks.list(self.owner.id).await
    }

    pub async fn search(&self, query: &str) -> DomainResult<Vec<Task>> {
        self.tasks.search(self.owner.id, query).await
    }

    pub async fn count_incomplete(&self) -> DomainResult<usize> {
        self.tasks.count_incomplete(self.owner.id).await
    }

    pub async fn find(&self, id: u32) -> DomainResult<Task> {
        self.tasks.find(self.owner.id, id).await
    }

    pub async fn create(&self, draft: &TaskDraft) -> DomainResult<Task> {
        self.tasks.create(self.owner.id, draft).await
    }

    pub async fn update(&self, id: u32, draft: &TaskDraft) -> DomainResult<Task> {
        self.tasks.update(self.owner.id, id, draft).await
    }

    pub async fn delete(&self, id: u32) -> DomainResult<()> {
        self.tasks.delete(self.owner.id, id).await
    }

    pub async fn reorder(&self, ids: &[u32]) -> DomainResult<ReorderOutcome> {
        self.tasks.reorder(self.owner.id, ids).await
    }

    /// Reorder, then renumber densely, in one transaction
    pub async fn reorder_dense(&self, ids: &[u32]) -> DomainResult<ReorderOutcome> {
        self.tasks.reorder_dense(self.owner.id, ids).await
    }
}
