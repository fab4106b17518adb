use async_trait::async_trait;

use crate::core::domain::command::CommandError;
use crate::core::domain::entity::user::{User, UserCommand};
use crate::core::domain::transaction::{ToSql, TransactionWrapper};

pub struct SqlUserRepository;

#[async_trait]
impl UserCommand for SqlUserRepository {
    async fn insert(
        &self,
        transaction: &mut Box<dyn TransactionWrapper>,
        user: User,
    ) -> Result<(), CommandError> {
        let query = "INSERT INTO users (id, name, email) VALUES ($1, $2, $3)";
        let params: Vec<Box<dyn ToSql>> = vec![
            Box::new(user.id) as Box<dyn ToSql>,
            Box::new(user.name) as Box<dyn ToSql>,
            Box::new(user.email) as Box<dyn ToSql>,
        ];
        transaction
            .execute(query, params)
            .await
            .map_err(|e| CommandError::from_store_error("User", user.id, e.to_string()))
    }
}
