pub mod adapter;
pub mod core;
pub mod error;

pub use crate::core::domain::context::ExecutionContext;
pub use crate::core::domain::transaction_manager::{TransactionManager, TransactionManagerError};
pub use crate::core::domain::transaction_operation::{
    compose, empty, from_fn, BoxedTransactionOperation, SharedOperation,
    TransactionOperationError,
};
pub use crate::core::domain::unit_of_work::UnitOfWork;
