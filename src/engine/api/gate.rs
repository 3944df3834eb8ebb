//! Request gates
//!
//! Authentication runs as route middleware. Role checks and DTO validation are
//! called from handlers in pipeline order: role check, then validation.

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::{Map, Value};

use super::AppState;
use crate::engine::error::AppError;
use crate::engine::rbac::{AuthenticationError, Identity, MembershipContext, Role};
use crate::engine::validation::Input;

/// Resolve the bearer token and attach the caller's `Identity`
pub async fn protect(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(request.headers()).ok_or(AuthenticationError::MissingCredentials)?;
    let identity = state.identity.resolve(token).await?;
    tracing::debug!(user = %identity.user_id, "authenticated");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Token is the word right after `Bearer `; a second space leaves it empty
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.split(' ').next()?;
    (!token.is_empty()).then_some(token)
}

/// Empty body reads as `{}`; anything but a JSON object is rejected
pub fn parse_body(body: &Bytes) -> Result<Input, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(AppError::bad_request("Invalid JSON body")),
    }
}

/// Query pairs as a string-valued mapping; a repeated key keeps its last value
pub fn query_map(pairs: Vec<(String, String)>) -> Input {
    pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

/// Caller's role on `resource_id` must imply `required`
pub async fn require_role(
    state: &AppState,
    caller: &Identity,
    resource_id: &str,
    required: Role,
    dto_in: &Input,
) -> Result<MembershipContext, AppError> {
    state
        .authorizer
        .authorize_resource(caller, Some(resource_id), required)
        .await
        .map_err(|err| AppError::from(err).with_dto_in(Value::Object(dto_in.clone())))
}

/// Validate a request body against the named DTO-in schema
pub fn validate_body(state: &AppState, dto: &str, input: Input) -> Result<Input, AppError> {
    let schema = state
        .dtos
        .schema(dto)
        .map_err(|err| AppError::internal(err, state.development))?;
    state
        .validator
        .validate(schema, input)
        .into_result()
        .map_err(|(errors, input)| AppError::validation(errors, Value::Object(input)))
}

/// Validate a query string against the named DTO-in schema
pub fn validate_query(state: &AppState, dto: &str, query: Input) -> Result<Input, AppError> {
    let schema = state
        .dtos
        .schema(dto)
        .map_err(|err| AppError::internal(err, state.development))?;
    state
        .validator
        .validate_query(schema, query)
        .into_result()
        .map_err(|(errors, query)| AppError::query_validation(errors, Value::Object(query)))
}

/// `{...input, key: value}` with path parameters
pub fn merge_params(mut input: Input, params: &[(&str, &str)]) -> Value {
    for (key, value) in params {
        input.insert((*key).to_string(), Value::String((*value).to_string()));
    }
    Value::Object(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        assert_eq!(extract_bearer(&headers), Some("abc"));

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer  abc"));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer abc extra"));
        assert_eq!(extract_bearer(&headers), Some("abc"));
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(&Bytes::new()).unwrap().is_empty());
        assert_eq!(
            Value::Object(parse_body(&Bytes::from_static(br#"{"a": 1}"#)).unwrap()),
            json!({"a": 1})
        );
        assert!(parse_body(&Bytes::from_static(b"{oops")).is_err());
        assert!(parse_body(&Bytes::from_static(b"[1, 2]")).is_err());
    }

    #[test]
    fn test_merge_params_overrides_body() {
        let input = json!({"name": "x", "id": "spoofed"}).as_object().unwrap().clone();
        assert_eq!(
            merge_params(input, &[("id", "list-1")]),
            json!({"name": "x", "id": "list-1"})
        );
    }

    #[test]
    fn test_query_map_last_value_wins() {
        let map = query_map(vec![
            ("archived".into(), "true".into()),
            ("archived".into(), "false".into()),
        ]);
        assert_eq!(Value::Object(map), json!({"archived": "false"}));
    }
}
