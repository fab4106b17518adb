use async_trait::async_trait;

use crate::core::domain::command::CommandError;
use crate::core::domain::entity::audit::{AuditCommand, AuditEntry};
use crate::core::domain::transaction::{ToSql, TransactionWrapper};

pub struct SqlAuditRepository;

#[async_trait]
impl AuditCommand for SqlAuditRepository {
    async fn record(
        &self,
        transaction: &mut Box<dyn TransactionWrapper>,
        entry: AuditEntry,
    ) -> Result<(), CommandError> {
        let query =
            "INSERT INTO audit_log (key, entity_type, entity_id, action) VALUES ($1, $2, $3, $4)";
        let entity_id = entry.entity_id;
        let params: Vec<Box<dyn ToSql>> = vec![
            Box::new(entry.key()) as Box<dyn ToSql>,
            Box::new(entry.entity_type) as Box<dyn ToSql>,
            Box::new(entry.entity_id) as Box<dyn ToSql>,
            Box::new(entry.action) as Box<dyn ToSql>,
        ];
        transaction
            .execute(query, params)
            .await
            .map_err(|e| CommandError::from_store_error("AuditEntry", entity_id, e.to_string()))
    }
}
