use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::adapter::config::AppConfig;
use crate::adapter::store::command::audit::SqlAuditRepository;
use crate::adapter::store::command::user::SqlUserRepository;
use crate::adapter::store::memory::{InMemoryStore, InMemoryTransactionManager};
use crate::adapter::store::pg::transaction_manager::PgTransactionManager;
use crate::adapter::web::app_state::AppState;
use crate::core::domain::context::ExecutionContext;
use crate::core::domain::transaction_manager::TransactionManager;
use crate::core::use_case::create_user::CreateUserUseCase;

pub struct AppInitializer;

impl AppInitializer {
    pub async fn initialize(config: &AppConfig) -> Result<Arc<AppState>, AppInitializerError> {
        let transaction_manager: Arc<dyn TransactionManager> = match config.database_url() {
            Some(url) => {
                let pool = PgPool::connect(url)
                    .await
                    .map_err(|e| AppInitializerError::DatabaseInitError(e.to_string()))?;
                tracing::info!("using postgres store");
                Arc::new(PgTransactionManager::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                Arc::new(InMemoryTransactionManager::new(Arc::new(InMemoryStore::new())))
            }
        };

        let context = match config.transaction_timeout() {
            Some(timeout) => ExecutionContext::new().with_timeout(timeout),
            None => ExecutionContext::new(),
        };

        let user_create_use_case = Arc::new(CreateUserUseCase::new(
            Arc::new(SqlUserRepository),
            Arc::new(SqlAuditRepository),
            transaction_manager,
            context,
        ));

        Ok(Arc::new(AppState {
            user_create_use_case,
        }))
    }
}

#[derive(Debug, Error)]
pub enum AppInitializerError {
    #[error("Failed to initialize database: {0}")]
    DatabaseInitError(String),
}
