//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has no storage or transport dependencies.

mod entity;
mod owner;
mod task;

pub use entity::{DomainError, DomainResult, Entity, Owned};
pub use owner::Owner;
pub use task::{Task, TaskDraft};
