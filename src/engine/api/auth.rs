//! Register, login and current-user handlers

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Utc;
use serde_json::Value;

use super::gate::{parse_body, validate_body};
use super::AppState;
use crate::engine::dto::auth::{AuthDtoOut, AuthUser, CurrentUser, GetMeDtoOut};
use crate::engine::error::ApiResult;
use crate::engine::rbac::Identity;
use crate::engine::response::Envelope;

const MOCK_TOKEN: &str = "mock-token-placeholder";

fn text(input: &serde_json::Map<String, Value>, key: &str) -> String {
    input
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = Value,
    responses(
        (status = 201, description = "Registered", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Envelope>)> {
    let dto_in = validate_body(&state, "register", parse_body(&body)?)?;

    let dto_out = AuthDtoOut {
        token: MOCK_TOKEN.to_string(),
        user: AuthUser {
            id: Identity::mock().user_id,
            name: text(&dto_in, "name"),
            email: text(&dto_in, "email"),
        },
    };
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(&dto_out, Some(Value::Object(dto_in)))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Value,
    responses(
        (status = 200, description = "Logged in", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope)
    ),
    tag = "auth"
)]
pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Envelope>> {
    let dto_in = validate_body(&state, "login", parse_body(&body)?)?;

    let mock = Identity::mock();
    let dto_out = AuthDtoOut {
        token: MOCK_TOKEN.to_string(),
        user: AuthUser {
            id: mock.user_id,
            name: mock.name,
            email: text(&dto_in, "email"),
        },
    };
    Ok(Json(Envelope::success(&dto_out, Some(Value::Object(dto_in)))))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    tag = "auth"
)]
pub async fn get_me(Extension(caller): Extension<Identity>) -> Json<Envelope> {
    let now = Utc::now();
    let dto_out = GetMeDtoOut {
        user: CurrentUser {
            id: caller.user_id,
            name: caller.name,
            email: caller.email,
            created_at: now,
            last_login: Some(now),
        },
    };
    Json(Envelope::success(&dto_out, None))
}
