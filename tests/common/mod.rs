use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use unit_of_work::core::domain::transaction::{ToSql, TransactionError, TransactionWrapper};
use unit_of_work::core::domain::transaction_manager::run_in_transaction;
use unit_of_work::{
    from_fn, BoxedTransactionOperation, ExecutionContext, SharedOperation, TransactionManager,
    TransactionManagerError, TransactionOperationError,
};

pub type Events = Arc<Mutex<Vec<String>>>;

/// Transaction manager that logs every session call and can be told to fail.
#[derive(Default)]
pub struct RecordingTransactionManager {
    pub events: Events,
    pub fail_begin: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,
}

impl RecordingTransactionManager {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

struct RecordingTransaction {
    events: Events,
    fail_commit: bool,
    fail_rollback: bool,
}

#[async_trait]
impl TransactionWrapper for RecordingTransaction {
    async fn execute(
        &mut self,
        query: &str,
        _params: Vec<Box<dyn ToSql>>,
    ) -> Result<(), TransactionError> {
        self.events.lock().unwrap().push(query.to_string());
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), TransactionError> {
        if self.fail_rollback {
            return Err(TransactionError::RollbackError("connection lost".to_string()));
        }
        self.events.lock().unwrap().push("ROLLBACK".to_string());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), TransactionError> {
        if self.fail_commit {
            return Err(TransactionError::CommitError("connection lost".to_string()));
        }
        self.events.lock().unwrap().push("COMMIT".to_string());
        Ok(())
    }
}

#[async_trait]
impl TransactionManager for RecordingTransactionManager {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        operation: &dyn BoxedTransactionOperation,
    ) -> Result<(), TransactionManagerError> {
        if self.fail_begin {
            return Err(TransactionManagerError::BeginError(
                "pool exhausted".to_string(),
            ));
        }
        self.events.lock().unwrap().push("BEGIN".to_string());
        let transaction: Box<dyn TransactionWrapper> = Box::new(RecordingTransaction {
            events: self.events.clone(),
            fail_commit: self.fail_commit,
            fail_rollback: self.fail_rollback,
        });
        run_in_transaction(ctx, transaction, operation).await
    }
}

/// Step that issues `statement` on the session.
pub fn statement(statement: &'static str) -> SharedOperation {
    from_fn(move |transaction| {
        Box::pin(async move {
            transaction.execute(statement, Vec::new()).await?;
            Ok::<(), TransactionOperationError>(())
        })
    })
}

/// Step that fails with `message` without touching the session.
pub fn failure(message: &'static str) -> SharedOperation {
    from_fn(move |_transaction| {
        Box::pin(async move {
            Err::<(), _>(TransactionOperationError::Failed(message.to_string()))
        })
    })
}
