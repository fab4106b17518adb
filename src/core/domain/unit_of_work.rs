use std::sync::Arc;

use crate::core::domain::context::ExecutionContext;
use crate::core::domain::transaction::TransactionWrapper;
use crate::core::domain::transaction_manager::{TransactionManager, TransactionManagerError};
use crate::core::domain::transaction_operation::{
    compose, empty, from_fn, OperationFuture, SharedOperation,
};

/// Accumulates operations and runs them together in one transaction.
#[derive(Clone)]
pub struct UnitOfWork {
    transaction_manager: Arc<dyn TransactionManager>,
    work: SharedOperation,
}

impl UnitOfWork {
    pub fn new(transaction_manager: Arc<dyn TransactionManager>) -> Self {
        Self {
            transaction_manager,
            work: empty(),
        }
    }

    pub fn append(&self, step: SharedOperation) -> Self {
        Self {
            transaction_manager: self.transaction_manager.clone(),
            work: compose(self.work.clone(), step),
        }
    }

    pub fn append_fn<F>(&self, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Box<dyn TransactionWrapper>) -> OperationFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.append(from_fn(f))
    }

    /// The whole chain as one operation, ready to be appended elsewhere.
    pub fn operation(&self) -> SharedOperation {
        self.work.clone()
    }

    pub async fn execute(&self, ctx: &ExecutionContext) -> Result<(), TransactionManagerError> {
        self.transaction_manager
            .execute(ctx, self.work.as_ref())
            .await
    }
}
