use serde::{Deserialize, Serialize};

use crate::core::domain::entity::user::user::UnvalidatedCreateUserInput;

#[derive(Debug, Deserialize, Clone)]
pub struct CreateUserWebInput {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<CreateUserWebInput> for UnvalidatedCreateUserInput {
    fn from(value: CreateUserWebInput) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CreateUserWebOutput {
    pub id: i32,
}
