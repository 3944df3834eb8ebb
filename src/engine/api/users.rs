//! User handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use chrono::Utc;
use serde_json::{Map, Value};

use super::gate::{merge_params, parse_body, query_map, validate_body, validate_query};
use super::AppState;
use crate::engine::dto::user::{GetUsersDtoOut, UserDtoOut, UserSummary};
use crate::engine::error::{ApiResult, AppError};
use crate::engine::rbac::Identity;
use crate::engine::response::Envelope;

#[utoipa::path(
    get,
    path = "/api/users",
    params(("search" = Option<String>, Query, description = "Name filter")),
    responses(
        (status = 200, description = "Users", body = Envelope),
        (status = 400, description = "Query validation failed", body = Envelope)
    ),
    tag = "users"
)]
pub async fn get_users(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Envelope>> {
    let dto_in = validate_query(&state, "getUsers", query_map(pairs))?;

    let now = Utc::now();
    let users = (1..=2)
        .map(|n| UserSummary {
            id: format!("mock-user-{n}"),
            name: format!("Mock User {n}"),
            created_at: now,
        })
        .collect();
    Ok(Json(Envelope::success(
        &GetUsersDtoOut { users },
        Some(Value::Object(dto_in)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, description = "User", body = Envelope)),
    tag = "users"
)]
pub async fn get_user(Path(id): Path<String>) -> Json<Envelope> {
    let dto_out = UserDtoOut {
        user: UserSummary {
            id: id.clone(),
            name: "Mock User".to_string(),
            created_at: Utc::now(),
        },
    };
    Json(Envelope::success(&dto_out, Some(merge_params(Map::new(), &[("id", id.as_str())]))))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = Value,
    responses(
        (status = 200, description = "Updated user", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 403, description = "Not the caller's profile", body = Envelope)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Envelope>> {
    let input = validate_body(&state, "updateUser", parse_body(&body)?)?;
    let dto_in = merge_params(input, &[("id", id.as_str())]);

    if caller.user_id != id {
        return Err(AppError::forbidden("You can only update your own profile").with_dto_in(dto_in));
    }

    let dto_out = UserDtoOut {
        user: UserSummary {
            id,
            name: dto_in.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
            created_at: Utc::now(),
        },
    };
    Ok(Json(Envelope::success(&dto_out, Some(dto_in))))
}
