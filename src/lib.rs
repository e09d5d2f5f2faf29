//! Task List Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Owner-scoped storage and the reorder engine
//! - cache: Key-value capability and the creation draft log
//! - guard: Binds requests to their authenticated owner
//! - commands: Handlers behind the task endpoints

use std::sync::Arc;

pub mod cache;
pub mod commands;
pub mod config;
pub mod domain;
pub mod forms;
pub mod guard;
pub mod repository;
pub mod routes;

use cache::{DraftLog, KeyValueCache, MemoryCache};
use config::AppConfig;
use domain::{DomainError, DomainResult};
use repository::{init_db, DbState, TaskRepository};
use rolling_logger::{LoggerError, RollingConfig};

/// Application state shared across commands
#[derive(Clone)]
pub struct AppState {
    pub db_state: DbState,
    pub tasks: TaskRepository,
    /// `None` when the draft log is disabled
    pub drafts: Option<DraftLog>,
    pub config: AppConfig,
}

impl AppState {
    /// Install the file logger, then open the configured database with an
    /// in-process draft cache
    pub async fn init(config: AppConfig) -> DomainResult<Self> {
        match init_logging(&config) {
            Ok(()) => {}
            Err(LoggerError::AlreadyInitialized(e)) => {
                log::debug!("Keeping the installed logger: {}", e);
            }
            Err(e) => return Err(DomainError::Internal(e.to_string())),
        }
        Self::with_cache(config, Arc::new(MemoryCache::new())).await
    }

    /// Open the configured database, logging drafts into `cache`
    pub async fn with_cache(config: AppConfig, cache: Arc<dyn KeyValueCache>) -> DomainResult<Self> {
        let db_state = match init_db(&config.database_path).await {
            Ok(db_state) => db_state,
            Err(e) => {
                let _ = rolling_logger::error(&format!("Database init failed: {}", e));
                return Err(e);
            }
        };
        let tasks = TaskRepository::new(db_state.connection());
        let drafts = config
            .drafts
            .enabled
            .then(|| DraftLog::with_prefix(cache, config.drafts.key_prefix.clone()));

        let _ = rolling_logger::info(&format!("{} state ready", config.app_name));
        Ok(Self {
            db_state,
            tasks,
            drafts,
            config,
        })
    }
}

/// Install the rolling file logger if `log_dir` is configured
pub fn init_logging(config: &AppConfig) -> Result<(), LoggerError> {
    let Some(dir) = &config.log_dir else {
        return Ok(());
    };
    let rolling = RollingConfig::new(dir.clone(), &config.app_name)
        .with_rotation(rolling_logger::parse_rotation(&config.log_rotation));
    rolling_logger::init_with_config(rolling)
}
