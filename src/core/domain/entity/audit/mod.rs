use async_trait::async_trait;

use crate::core::domain::command::CommandError;
use crate::core::domain::transaction::TransactionWrapper;

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub entity_type: String,
    pub entity_id: i32,
    pub action: String,
}

impl AuditEntry {
    pub fn user_created(user_id: i32) -> Self {
        Self {
            entity_type: "User".to_string(),
            entity_id: user_id,
            action: "created".to_string(),
        }
    }

    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.entity_type, self.entity_id, self.action)
    }
}

#[async_trait]
pub trait AuditCommand: Send + Sync {
    async fn record(
        &self,
        transaction: &mut Box<dyn TransactionWrapper>,
        entry: AuditEntry,
    ) -> Result<(), CommandError>;
}
