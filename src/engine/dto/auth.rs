//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::validation::{FieldDescriptor, FieldSchema};

fn email_field() -> FieldDescriptor {
    FieldDescriptor::string()
        .required()
        .email()
        .max_length(255)
        .lowercase()
        .trim()
        .into()
}

pub fn register_dto_in() -> FieldSchema {
    FieldSchema::new()
        .field(
            "name",
            FieldDescriptor::string().required().min_length(1).max_length(100).trim(),
        )
        .field("email", email_field())
        .field(
            "password",
            FieldDescriptor::string().required().min_length(6).max_length(100),
        )
}

pub fn login_dto_in() -> FieldSchema {
    FieldSchema::new()
        .field("email", email_field())
        .field("password", FieldDescriptor::string().required().min_length(1))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthDtoOut {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GetMeDtoOut {
    pub user: CurrentUser,
}
