//! Shop list membership handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Utc;
use serde_json::{Map, Value};

use super::gate::{merge_params, parse_body, require_role, validate_body};
use super::AppState;
use crate::engine::dto::member::{GetMembersDtoOut, MemberDtoOut};
use crate::engine::dto::shop_list::DeletedDtoOut;
use crate::engine::error::{ApiResult, AppError};
use crate::engine::rbac::{Identity, MembershipRole, Role};
use crate::engine::response::Envelope;

fn role_of(dto_in: &Value) -> MembershipRole {
    match dto_in.get("role").and_then(Value::as_str) {
        Some("owner") => MembershipRole::Owner,
        _ => MembershipRole::Member,
    }
}

fn mock_member(id: &str, user_id: &str, user_name: &str, role: MembershipRole) -> MemberDtoOut {
    MemberDtoOut {
        id: id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        role,
        added_at: Utc::now(),
    }
}

#[utoipa::path(
    get,
    path = "/api/shoplists/{id}/members",
    params(("id" = String, Path, description = "Shop list ID")),
    responses(
        (status = 200, description = "Members", body = Envelope),
        (status = 403, description = "Caller is not a member", body = Envelope)
    ),
    tag = "members"
)]
pub async fn get_members(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    require_role(&state, &caller, &id, Role::Member, &Map::new()).await?;

    let dto_out = GetMembersDtoOut {
        members: vec![
            mock_member("mock-member-1", "mock-user-1", "Mock User 1", MembershipRole::Owner),
            mock_member("mock-member-2", "mock-user-2", "Mock User 2", MembershipRole::Member),
        ],
    };
    Ok(Json(Envelope::success(
        &dto_out,
        Some(merge_params(Map::new(), &[("shopListId", id.as_str())])),
    )))
}

#[utoipa::path(
    post,
    path = "/api/shoplists/{id}/members",
    params(("id" = String, Path, description = "Shop list ID")),
    request_body = Value,
    responses(
        (status = 201, description = "Member added", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 403, description = "Caller is not the owner", body = Envelope)
    ),
    tag = "members"
)]
pub async fn add_member(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Envelope>)> {
    let input = parse_body(&body)?;
    require_role(&state, &caller, &id, Role::Owner, &input).await?;
    let dto_in = merge_params(validate_body(&state, "addMember", input)?, &[("shopListId", id.as_str())]);

    let user_id = dto_in.get("userId").and_then(Value::as_str).unwrap_or_default();
    let dto_out = mock_member("mock-member-id", user_id, "Mock User", role_of(&dto_in));
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(&dto_out, Some(dto_in))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/shoplists/{id}/members/{user_id}",
    params(
        ("id" = String, Path, description = "Shop list ID"),
        ("user_id" = String, Path, description = "Member's user ID")
    ),
    request_body = Value,
    responses(
        (status = 200, description = "Role changed", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 403, description = "Caller is not the owner", body = Envelope)
    ),
    tag = "members"
)]
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path((id, user_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Json<Envelope>> {
    let input = parse_body(&body)?;
    require_role(&state, &caller, &id, Role::Owner, &input).await?;
    let dto_in = merge_params(
        validate_body(&state, "updateMemberRole", input)?,
        &[("shopListId", id.as_str()), ("userId", user_id.as_str())],
    );

    let dto_out = mock_member("mock-member-id", &user_id, "Mock User", role_of(&dto_in));
    Ok(Json(Envelope::success(&dto_out, Some(dto_in))))
}

/// Members may remove themselves; removing anyone else takes the owner
#[utoipa::path(
    delete,
    path = "/api/shoplists/{id}/members/{user_id}",
    params(
        ("id" = String, Path, description = "Shop list ID"),
        ("user_id" = String, Path, description = "Member's user ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = Envelope),
        (status = 403, description = "Caller may not remove this member", body = Envelope)
    ),
    tag = "members"
)]
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path((id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<Envelope>> {
    let dto_in = merge_params(Map::new(), &[("shopListId", id.as_str()), ("userId", user_id.as_str())]);

    if caller.user_id != user_id {
        let context = state
            .authorizer
            .resolve_effective_role(&caller, Some(id.as_str()))
            .await
            .map_err(|err| AppError::from(err).with_dto_in(dto_in.clone()))?;
        if !context.is_owner() {
            tracing::warn!(user = %caller.user_id, resource = %id, "member removal denied");
            return Err(
                AppError::forbidden("Only owners can remove other members").with_dto_in(dto_in)
            );
        }
    }

    Ok(Json(Envelope::success(&DeletedDtoOut { success: true }, Some(dto_in))))
}
