use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::adapter::web::app_state::AppState;
use crate::adapter::web::dto::create_user_web_input::{CreateUserWebInput, CreateUserWebOutput};
use crate::adapter::web::handler::users::post::UserHandler;

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(user): Json<CreateUserWebInput>,
) -> Result<(StatusCode, Json<CreateUserWebOutput>), (StatusCode, String)> {
    UserHandler::new(state.user_create_use_case.clone())
        .create_user(user)
        .await
}
