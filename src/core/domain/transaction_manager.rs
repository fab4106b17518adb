use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::domain::context::ExecutionContext;
use crate::core::domain::transaction::{TransactionError, TransactionWrapper};
use crate::core::domain::transaction_operation::{
    BoxedTransactionOperation, TransactionOperationError,
};

#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        operation: &dyn BoxedTransactionOperation,
    ) -> Result<(), TransactionManagerError>;
}

#[derive(Debug, Error)]
pub enum TransactionManagerError {
    #[error("Failed to begin transaction: {0}")]
    BeginError(String),

    #[error(transparent)]
    OperationError(#[from] TransactionOperationError),

    #[error(transparent)]
    TransactionError(#[from] TransactionError),

    #[error("Failed to rollback after {cause}: {rollback}")]
    RollbackFailed {
        cause: Box<TransactionManagerError>,
        rollback: TransactionError,
    },

    #[error("Transaction exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),
}

impl TransactionManagerError {
    /// The error that ended the transaction, looking past a failed rollback.
    pub fn root_cause(&self) -> &TransactionManagerError {
        match self {
            TransactionManagerError::RollbackFailed { cause, .. } => cause,
            other => other,
        }
    }
}

/// Runs `operation` on an already opened transaction, then commits or rolls back.
pub async fn run_in_transaction(
    ctx: &ExecutionContext,
    mut transaction: Box<dyn TransactionWrapper>,
    operation: &dyn BoxedTransactionOperation,
) -> Result<(), TransactionManagerError> {
    let outcome = match ctx.timeout() {
        Some(limit) => {
            match tokio::time::timeout(limit, operation.execute(&mut transaction)).await {
                Ok(result) => result.map_err(TransactionManagerError::OperationError),
                Err(_) => Err(TransactionManagerError::DeadlineExceeded(limit)),
            }
        }
        None => operation
            .execute(&mut transaction)
            .await
            .map_err(TransactionManagerError::OperationError),
    };

    match outcome {
        Ok(()) => {
            transaction.commit().await?;
            tracing::debug!("transaction committed");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "rolling back transaction");
            if let Err(rollback_err) = transaction.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
                return Err(TransactionManagerError::RollbackFailed {
                    cause: Box::new(e),
                    rollback: rollback_err,
                });
            }
            Err(e)
        }
    }
}
