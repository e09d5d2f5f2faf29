//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod task;
mod traits;

#[cfg(test)]
mod tests;

pub use db::{init_db, DbState, SharedConnection};
pub use task::{ReorderOutcome, TaskPositioningOperations, TaskRepository, TaskSearchOperations};
pub use traits::{OwnedRepository, SearchableRepository};
