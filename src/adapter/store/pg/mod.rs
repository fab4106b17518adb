pub mod sqlx_transaction;
pub mod transaction_manager;
