//! Task Repository Module
//!
//! - task_repo: Core owner-scoped CRUD operations
//! - task_positioning: Order keys (reorder batches, reindex)
//! - task_search: Title search and counts

mod task_positioning;
mod task_repo;
mod task_search;

pub use task_positioning::{ReorderOutcome, TaskPositioningOperations};
pub use task_repo::TaskRepository;
pub use task_search::TaskSearchOperations;
