use async_trait::async_trait;
use sqlx::PgPool;

use crate::adapter::store::pg::sqlx_transaction::SqlxTransaction;
use crate::core::domain::context::ExecutionContext;
use crate::core::domain::transaction::TransactionWrapper;
use crate::core::domain::transaction_manager::{
    run_in_transaction, TransactionManager, TransactionManagerError,
};
use crate::core::domain::transaction_operation::BoxedTransactionOperation;

pub struct PgTransactionManager {
    pool: PgPool,
}

impl PgTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        operation: &dyn BoxedTransactionOperation,
    ) -> Result<(), TransactionManagerError> {
        let transaction = self
            .pool
            .begin()
            .await
            .map_err(|e| TransactionManagerError::BeginError(e.to_string()))?;
        tracing::debug!("postgres transaction started");

        let transaction: Box<dyn TransactionWrapper> = Box::new(SqlxTransaction::new(transaction));
        run_in_transaction(ctx, transaction, operation).await
    }
}
