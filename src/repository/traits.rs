//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for owner-scoped data access.
//! Every operation takes the owner explicitly; a row owned by someone else
//! is indistinguishable from a missing one.

use async_trait::async_trait;

use crate::domain::{DomainResult, Owned};

/// Core repository trait for owner-scoped CRUD operations
#[async_trait]
pub trait OwnedRepository<T: Owned>: Send + Sync {
    /// Fields accepted on create and update
    type Draft: Send + Sync;

    /// Create a new entity for `owner_id`
    async fn create(&self, owner_id: u32, draft: &Self::Draft) -> DomainResult<T>;

    /// Find one of the owner's entities; `NotFound` otherwise
    async fn find(&self, owner_id: u32, id: T::Id) -> DomainResult<T>;

    /// List the owner's entities
    async fn list(&self, owner_id: u32) -> DomainResult<Vec<T>>;

    /// Update one of the owner's entities; `NotFound` otherwise
    async fn update(&self, owner_id: u32, id: T::Id, draft: &Self::Draft) -> DomainResult<T>;

    /// Delete one of the owner's entities; `NotFound` otherwise
    async fn delete(&self, owner_id: u32, id: T::Id) -> DomainResult<()>;
}

/// Extension for repositories that support text search
#[async_trait]
pub trait SearchableRepository<T: Owned>: OwnedRepository<T> {
    /// Owner's entities whose title contains `query`
    async fn search(&self, owner_id: u32, query: &str) -> DomainResult<Vec<T>>;
}
