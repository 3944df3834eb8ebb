//! Response envelope
//!
//! Every endpoint answers with `{success, dtoIn?, dtoOut?, uuAppErrorMap?}`.
//! Error map keys are the error message in snake_case.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// One entry of `uuAppErrorMap`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    pub message: String,
    #[schema(value_type = Object)]
    pub param_map: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub dto_in: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub dto_out: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub uu_app_error_map: Option<Map<String, Value>>,
}

impl Envelope {
    pub fn success<T: Serialize>(dto_out: &T, dto_in: Option<Value>) -> Self {
        Self {
            success: true,
            dto_in,
            dto_out: Some(serde_json::to_value(dto_out).unwrap_or(Value::Null)),
            uu_app_error_map: None,
        }
    }

    /// Error envelope keyed by the snake_case form of `message`
    pub fn error(message: &str, param_map: Map<String, Value>, dto_in: Option<Value>) -> Self {
        Self::error_with_key(&error_key(message), message, param_map, dto_in)
    }

    pub fn error_with_key(
        key: &str,
        message: &str,
        param_map: Map<String, Value>,
        dto_in: Option<Value>,
    ) -> Self {
        let entry = ErrorEntry {
            message: message.to_string(),
            param_map,
        };
        let mut map = Map::new();
        map.insert(
            key.to_string(),
            serde_json::to_value(entry).unwrap_or(Value::Null),
        );
        Self {
            success: false,
            dto_in,
            dto_out: None,
            uu_app_error_map: Some(map),
        }
    }
}

/// `"Shop list ID is required"` becomes `shop_list_id_is_required`
pub fn error_key(message: &str) -> String {
    let mut key = String::with_capacity(message.len());
    let mut in_space = false;
    for c in message.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                key.push('_');
            }
            in_space = true;
        } else {
            key.push(c);
            in_space = false;
        }
    }
    key
}
