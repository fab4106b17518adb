use std::sync::Arc;

use crate::core::port::create_user::CreateUserInputBoundary;

pub struct AppState {
    pub user_create_use_case: Arc<dyn CreateUserInputBoundary>,
}
