//! Shop list and item handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Utc;
use serde_json::{Map, Value};

use super::gate::{
    merge_params, parse_body, query_map, require_role, validate_body, validate_query,
};
use super::AppState;
use crate::engine::dto::shop_list::{
    DeletedDtoOut, GetShopListsDtoOut, ShopListDtoOut, ShopListItem,
};
use crate::engine::error::ApiResult;
use crate::engine::rbac::{Identity, MembershipContext, MembershipRole, Role};
use crate::engine::response::Envelope;

const MOCK_LIST_NAME: &str = "Mock Shop List";

fn mock_list(id: &str, context: &MembershipContext, items: Vec<ShopListItem>) -> ShopListDtoOut {
    ShopListDtoOut {
        id: id.to_string(),
        name: MOCK_LIST_NAME.to_string(),
        archived: false,
        created_at: Utc::now(),
        items,
        role: context.membership.unwrap_or(MembershipRole::Member),
    }
}

fn item(name: &str, completed: bool) -> ShopListItem {
    ShopListItem {
        name: name.to_string(),
        completed,
        added_at: Utc::now(),
    }
}

#[utoipa::path(
    get,
    path = "/api/shoplists",
    params(("archived" = Option<String>, Query, description = "\"true\" or \"false\"")),
    responses(
        (status = 200, description = "Caller's shop lists", body = Envelope),
        (status = 400, description = "Query validation failed", body = Envelope)
    ),
    tag = "shoplists"
)]
pub async fn get_shop_lists(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Envelope>> {
    let dto_in = validate_query(&state, "getShopLists", query_map(pairs))?;

    let dto_out = GetShopListsDtoOut {
        shop_lists: vec![ShopListDtoOut {
            id: "mock-shoplist-1".to_string(),
            name: "Mock Shop List 1".to_string(),
            archived: false,
            created_at: Utc::now(),
            items: Vec::new(),
            role: MembershipRole::Owner,
        }],
    };
    Ok(Json(Envelope::success(&dto_out, Some(Value::Object(dto_in)))))
}

#[utoipa::path(
    post,
    path = "/api/shoplists",
    request_body = Value,
    responses(
        (status = 201, description = "Created", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope)
    ),
    tag = "shoplists"
)]
pub async fn create_shop_list(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Envelope>)> {
    let dto_in = validate_body(&state, "createShopList", parse_body(&body)?)?;

    let dto_out = ShopListDtoOut {
        id: "mock-shoplist-id".to_string(),
        name: dto_in
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        archived: false,
        created_at: Utc::now(),
        items: Vec::new(),
        role: MembershipRole::Owner,
    };
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(&dto_out, Some(Value::Object(dto_in)))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/shoplists/{id}",
    params(("id" = String, Path, description = "Shop list ID")),
    responses(
        (status = 200, description = "Shop list", body = Envelope),
        (status = 403, description = "Caller is not a member", body = Envelope)
    ),
    tag = "shoplists"
)]
pub async fn get_shop_list(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    let context = require_role(&state, &caller, &id, Role::Member, &Map::new()).await?;

    let dto_out = mock_list(&id, &context, vec![item("Mock Item 1", false)]);
    Ok(Json(Envelope::success(&dto_out, Some(merge_params(Map::new(), &[("id", id.as_str())])))))
}

#[utoipa::path(
    put,
    path = "/api/shoplists/{id}",
    params(("id" = String, Path, description = "Shop list ID")),
    request_body = Value,
    responses(
        (status = 200, description = "Updated", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 403, description = "Caller is not a member", body = Envelope)
    ),
    tag = "shoplists"
)]
pub async fn update_shop_list(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Envelope>> {
    let input = parse_body(&body)?;
    let context = require_role(&state, &caller, &id, Role::Member, &input).await?;
    let dto_in = merge_params(validate_body(&state, "updateShopList", input)?, &[("id", id.as_str())]);

    let mut dto_out = mock_list(&id, &context, Vec::new());
    if let Some(name) = dto_in.get("name").and_then(Value::as_str) {
        dto_out.name = name.to_string();
    }
    if let Some(archived) = dto_in.get("archived").and_then(Value::as_bool) {
        dto_out.archived = archived;
    }
    Ok(Json(Envelope::success(&dto_out, Some(dto_in))))
}

#[utoipa::path(
    delete,
    path = "/api/shoplists/{id}",
    params(("id" = String, Path, description = "Shop list ID")),
    responses(
        (status = 200, description = "Deleted", body = Envelope),
        (status = 403, description = "Caller is not the owner", body = Envelope)
    ),
    tag = "shoplists"
)]
pub async fn delete_shop_list(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    require_role(&state, &caller, &id, Role::Owner, &Map::new()).await?;

    Ok(Json(Envelope::success(
        &DeletedDtoOut { success: true },
        Some(merge_params(Map::new(), &[("id", id.as_str())])),
    )))
}

#[utoipa::path(
    post,
    path = "/api/shoplists/{id}/items",
    params(("id" = String, Path, description = "Shop list ID")),
    request_body = Value,
    responses(
        (status = 201, description = "Item added", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 403, description = "Caller is not a member", body = Envelope)
    ),
    tag = "items"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Envelope>)> {
    let input = parse_body(&body)?;
    let context = require_role(&state, &caller, &id, Role::Member, &input).await?;
    let dto_in = merge_params(validate_body(&state, "addItem", input)?, &[("id", id.as_str())]);

    let name = dto_in.get("name").and_then(Value::as_str).unwrap_or_default();
    let dto_out = mock_list(&id, &context, vec![item(name, false)]);
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(&dto_out, Some(dto_in))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/shoplists/{id}/items/{item_index}",
    params(
        ("id" = String, Path, description = "Shop list ID"),
        ("item_index" = String, Path, description = "Item position")
    ),
    request_body = Value,
    responses(
        (status = 200, description = "Item updated", body = Envelope),
        (status = 400, description = "Validation failed", body = Envelope),
        (status = 403, description = "Caller is not a member", body = Envelope)
    ),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path((id, item_index)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Json<Envelope>> {
    let input = parse_body(&body)?;
    let context = require_role(&state, &caller, &id, Role::Member, &input).await?;
    let dto_in = merge_params(
        validate_body(&state, "updateItem", input)?,
        &[("id", id.as_str()), ("itemIndex", item_index.as_str())],
    );

    let name = dto_in
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Mock Item");
    let completed = dto_in
        .get("completed")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let dto_out = mock_list(&id, &context, vec![item(name, completed)]);
    Ok(Json(Envelope::success(&dto_out, Some(dto_in))))
}

#[utoipa::path(
    delete,
    path = "/api/shoplists/{id}/items/{item_index}",
    params(
        ("id" = String, Path, description = "Shop list ID"),
        ("item_index" = String, Path, description = "Item position")
    ),
    responses(
        (status = 200, description = "Item removed", body = Envelope),
        (status = 403, description = "Caller is not a member", body = Envelope)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path((id, item_index)): Path<(String, String)>,
) -> ApiResult<Json<Envelope>> {
    let context = require_role(&state, &caller, &id, Role::Member, &Map::new()).await?;

    let dto_out = mock_list(&id, &context, Vec::new());
    let dto_in = merge_params(Map::new(), &[("id", id.as_str()), ("itemIndex", item_index.as_str())]);
    Ok(Json(Envelope::success(&dto_out, Some(dto_in))))
}
