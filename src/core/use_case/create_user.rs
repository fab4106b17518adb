use async_trait::async_trait;
use std::sync::Arc;

use crate::core::domain::context::ExecutionContext;
use crate::core::domain::entity::audit::{AuditCommand, AuditEntry};
use crate::core::domain::entity::user::user::UnvalidatedCreateUserInput;
use crate::core::domain::entity::user::{User, UserCommand};
use crate::core::domain::transaction::TransactionWrapper;
use crate::core::domain::transaction_manager::TransactionManager;
use crate::core::domain::transaction_operation::{
    BoxedTransactionOperation, TransactionOperationError,
};
use crate::core::domain::unit_of_work::UnitOfWork;

use crate::core::port::create_user::{
    CreateUserError, CreateUserInputBoundary, CreateUserOutputBoundary,
};

pub struct InsertUserOperation {
    user: User,
    user_repository: Arc<dyn UserCommand>,
}

impl InsertUserOperation {
    pub fn new(user: User, user_repository: Arc<dyn UserCommand>) -> Self {
        Self {
            user,
            user_repository,
        }
    }
}

#[async_trait]
impl BoxedTransactionOperation for InsertUserOperation {
    async fn execute(
        &self,
        transaction: &mut Box<dyn TransactionWrapper>,
    ) -> Result<(), TransactionOperationError> {
        self.user_repository
            .insert(transaction, self.user.clone())
            .await?;
        Ok(())
    }
}

pub struct RecordAuditOperation {
    entry: AuditEntry,
    audit_repository: Arc<dyn AuditCommand>,
}

impl RecordAuditOperation {
    pub fn new(entry: AuditEntry, audit_repository: Arc<dyn AuditCommand>) -> Self {
        Self {
            entry,
            audit_repository,
        }
    }
}

#[async_trait]
impl BoxedTransactionOperation for RecordAuditOperation {
    async fn execute(
        &self,
        transaction: &mut Box<dyn TransactionWrapper>,
    ) -> Result<(), TransactionOperationError> {
        self.audit_repository
            .record(transaction, self.entry.clone())
            .await?;
        Ok(())
    }
}

/// Creates a user and its audit trail in one transaction.
pub struct CreateUserUseCase {
    repository: Arc<dyn UserCommand>,
    audit_repository: Arc<dyn AuditCommand>,
    transaction_manager: Arc<dyn TransactionManager>,
    context: ExecutionContext,
}

impl CreateUserUseCase {
    pub fn new(
        repository: Arc<dyn UserCommand>,
        audit_repository: Arc<dyn AuditCommand>,
        transaction_manager: Arc<dyn TransactionManager>,
        context: ExecutionContext,
    ) -> Self {
        Self {
            repository,
            audit_repository,
            transaction_manager,
            context,
        }
    }
}

#[async_trait]
impl CreateUserInputBoundary for CreateUserUseCase {
    #[tracing::instrument(skip_all, fields(user_id = input.id))]
    async fn execute(
        &self,
        input: UnvalidatedCreateUserInput,
        output_boundary: &mut dyn CreateUserOutputBoundary,
    ) -> Result<(), CreateUserError> {
        let user = User::try_from(input)?;
        let id = user.id;

        UnitOfWork::new(self.transaction_manager.clone())
            .append(Arc::new(InsertUserOperation::new(
                user,
                self.repository.clone(),
            )))
            .append(Arc::new(RecordAuditOperation::new(
                AuditEntry::user_created(id),
                self.audit_repository.clone(),
            )))
            .execute(&self.context)
            .await?;

        tracing::info!("user created");
        output_boundary.execute(id)?;

        Ok(())
    }
}
