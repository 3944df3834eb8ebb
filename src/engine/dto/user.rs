//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::validation::{FieldDescriptor, FieldSchema};

/// Query string of `GET /api/users`
pub fn get_users_dto_in() -> FieldSchema {
    FieldSchema::new().field("search", FieldDescriptor::string().max_length(100).trim())
}

pub fn update_user_dto_in() -> FieldSchema {
    FieldSchema::new().field(
        "name",
        FieldDescriptor::string().required().min_length(1).max_length(100).trim(),
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GetUsersDtoOut {
    pub users: Vec<UserSummary>,
}

/// Returned by get and update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDtoOut {
    pub user: UserSummary,
}
