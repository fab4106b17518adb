use axum::http::StatusCode;
use axum::Json;

use crate::adapter::web::dto::create_user_web_input::CreateUserWebOutput;
use crate::core::domain::command::CommandError;
use crate::core::domain::transaction_manager::TransactionManagerError;
use crate::core::domain::transaction_operation::TransactionOperationError;
use crate::core::port::create_user::{
    CreateUserError, CreateUserOutputBoundary, CreateUserOutputError,
};

#[derive(Default)]
pub struct CreateUserPresenter {
    output: Option<i32>,
}

impl CreateUserPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn success(
        &self,
    ) -> Result<(StatusCode, Json<CreateUserWebOutput>), (StatusCode, String)> {
        match self.output {
            Some(id) => Ok((StatusCode::CREATED, Json(CreateUserWebOutput { id }))),
            None => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Output not set by presenter".to_string(),
            )),
        }
    }

    pub(crate) fn failure(&self, error: CreateUserError) -> (StatusCode, String) {
        let status = match &error {
            CreateUserError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CreateUserError::TransactionError(e) => match e.root_cause() {
                TransactionManagerError::OperationError(
                    TransactionOperationError::CommandError(CommandError::AlreadyExists { .. }),
                ) => StatusCode::CONFLICT,
                TransactionManagerError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            CreateUserError::OutputError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %error, "failed to create user");
        }
        (status, format!("Failed to create user: {}", error))
    }
}

impl CreateUserOutputBoundary for CreateUserPresenter {
    fn execute(&mut self, output: i32) -> Result<(), CreateUserOutputError> {
        if let Some(existing) = self.output {
            return Err(CreateUserOutputError::AlreadySet(existing));
        }
        self.output = Some(output);
        Ok(())
    }
}
