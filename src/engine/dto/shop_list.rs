//! Shop list and item DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::rbac::MembershipRole;
use crate::engine::validation::{FieldDescriptor, FieldSchema, StringField};

fn list_name() -> StringField {
    FieldDescriptor::string().min_length(1).max_length(200).trim()
}

/// Query string of `GET /api/shoplists`
pub fn get_shop_lists_dto_in() -> FieldSchema {
    FieldSchema::new().field("archived", FieldDescriptor::string().one_of(["true", "false"]))
}

pub fn create_shop_list_dto_in() -> FieldSchema {
    FieldSchema::new().field("name", list_name().required())
}

pub fn update_shop_list_dto_in() -> FieldSchema {
    FieldSchema::new()
        .field("name", list_name())
        .field("archived", FieldDescriptor::boolean())
}

pub fn add_item_dto_in() -> FieldSchema {
    FieldSchema::new().field("name", list_name().required())
}

pub fn update_item_dto_in() -> FieldSchema {
    FieldSchema::new()
        .field("name", list_name())
        .field("completed", FieldDescriptor::boolean())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopListItem {
    pub name: String,
    pub completed: bool,
    pub added_at: DateTime<Utc>,
}

/// Shop list as seen by one caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopListDtoOut {
    pub id: String,
    pub name: String,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ShopListItem>,
    pub role: MembershipRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetShopListsDtoOut {
    pub shop_lists: Vec<ShopListDtoOut>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedDtoOut {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::validation::validate;
    use serde_json::json;

    #[test]
    fn test_update_coerces_archived_flag() {
        let input = json!({"archived": "false"});
        let outcome = validate(&update_shop_list_dto_in(), input.as_object().unwrap().clone());
        assert!(outcome.is_valid());
        assert_eq!(outcome.input["archived"], json!(false));
    }

    #[test]
    fn test_item_name_limits() {
        let long = "x".repeat(201);
        let input = json!({ "name": long });
        let outcome = validate(&add_item_dto_in(), input.as_object().unwrap().clone());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].message, "name must be at most 200 characters long");
    }

    #[test]
    fn test_shop_list_serializes_role_lowercase() {
        let list = ShopListDtoOut {
            id: "l".into(),
            name: "n".into(),
            archived: false,
            created_at: Utc::now(),
            items: Vec::new(),
            role: MembershipRole::Owner,
        };
        let value = serde_json::to_value(list).unwrap();
        assert_eq!(value["role"], json!("owner"));
        assert!(value.get("createdAt").is_some());
    }
}
