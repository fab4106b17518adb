use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Entity already exists: {entity_type} - {details}")]
    AlreadyExists {
        entity_type: String,
        details: String,
    },

    #[error("Concurrent modification detected: {entity_type}")]
    ConcurrencyError { entity_type: String },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl CommandError {
    /// Classifies a failed write by the message the store reported.
    pub fn from_store_error(entity_type: &str, id: i32, message: String) -> Self {
        if message.contains("unique constraint") {
            CommandError::AlreadyExists {
                entity_type: entity_type.to_string(),
                details: format!("id: {}", id),
            }
        } else if message.contains("deadlock") {
            CommandError::ConcurrencyError {
                entity_type: entity_type.to_string(),
            }
        } else {
            CommandError::DatabaseError(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_store_messages() {
        let err = CommandError::from_store_error(
            "User",
            3,
            "duplicate key value violates unique constraint \"users_pkey\"".to_string(),
        );
        assert!(matches!(err, CommandError::AlreadyExists { ref details, .. } if details == "id: 3"));

        let err = CommandError::from_store_error("User", 3, "deadlock detected".to_string());
        assert!(matches!(err, CommandError::ConcurrencyError { .. }));

        let err = CommandError::from_store_error("User", 3, "syntax error".to_string());
        assert!(matches!(err, CommandError::DatabaseError(_)));
    }
}
