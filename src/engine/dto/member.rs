//! Shop list membership DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::rbac::MembershipRole;
use crate::engine::validation::{FieldDescriptor, FieldSchema};

const ROLES: [&str; 2] = ["member", "owner"];

pub fn add_member_dto_in() -> FieldSchema {
    FieldSchema::new()
        .field("userId", FieldDescriptor::string().required().object_id())
        .field(
            "role",
            FieldDescriptor::string().one_of(ROLES).default_value("member"),
        )
}

pub fn update_member_role_dto_in() -> FieldSchema {
    FieldSchema::new().field("role", FieldDescriptor::string().required().one_of(ROLES))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDtoOut {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub role: MembershipRole,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GetMembersDtoOut {
    pub members: Vec<MemberDtoOut>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::validation::validate;
    use serde_json::json;

    #[test]
    fn test_add_member_rejects_bad_user_id_and_role() {
        let input = json!({"userId": "mock-user-2", "role": "admin"});
        let outcome = validate(&add_member_dto_in(), input.as_object().unwrap().clone());
        let messages: Vec<&str> = outcome.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "userId must be a valid ObjectId",
                "role must be one of: member, owner",
            ]
        );
    }

    #[test]
    fn test_update_role_requires_role() {
        let outcome = validate(&update_member_role_dto_in(), serde_json::Map::new());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].message, "role is required");
    }
}
