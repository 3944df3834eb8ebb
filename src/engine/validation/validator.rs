//! DTO validation engine
//!
//! Checks a JSON object against a [`FieldSchema`], normalizing string and
//! boolean values in place. Every field is checked; errors come back in schema
//! declaration order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::format::{is_date, is_email, is_object_id, join_values, text_length};
use super::schema::{FieldDescriptor, FieldSchema, FieldType, StringFormat, StringRules};

/// Request body or query mapping
pub type Input = Map<String, Value>;

/// One field-level failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
        }
    }
}

/// Validation policy switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Fill absent optional fields from their declared `default`
    #[serde(default)]
    pub apply_defaults: bool,

    /// Report input keys the schema does not declare
    #[serde(default)]
    pub reject_unknown_fields: bool,
}

/// Errors plus the (possibly normalized) input
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub errors: Vec<FieldError>,
    pub input: Input,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Sanitized input, or the full ordered error list
    pub fn into_result(self) -> Result<Input, (Vec<FieldError>, Input)> {
        if self.errors.is_empty() {
            Ok(self.input)
        } else {
            Err((self.errors, self.input))
        }
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

/// Numbers match by value, so `2.0` is a member of `[1, 2, 3]`
fn is_allowed(allowed: &[Value], value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            let n = n.as_f64();
            allowed.iter().any(|candidate| match candidate {
                Value::Number(c) => c.as_f64() == n,
                _ => false,
            })
        }
        other => allowed.contains(other),
    }
}

fn one_of_error(field: &str, allowed: &[Value]) -> FieldError {
    FieldError::new(field, format!("{field} must be one of: {}", join_values(allowed)))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    pub fn validate(&self, schema: &FieldSchema, mut input: Input) -> ValidationOutcome {
        let errors = self.validate_in_place(schema, &mut input);
        ValidationOutcome { errors, input }
    }

    /// Full rule set. String normalization and boolean coercion are written
    /// back into `input` even when other checks on the same field fail.
    pub fn validate_in_place(&self, schema: &FieldSchema, input: &mut Input) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for (field, descriptor) in schema.iter() {
            if is_absent(input.get(field)) {
                if descriptor.required {
                    errors.push(FieldError::new(field, format!("{field} is required")));
                } else if self.options.apply_defaults {
                    if let Some(default) = &descriptor.default {
                        input.insert(field.to_string(), default.clone());
                    }
                }
                continue;
            }

            self.check_field(field, descriptor, input, &mut errors);
        }

        if self.options.reject_unknown_fields {
            let unknown: Vec<&str> = input
                .keys()
                .map(String::as_str)
                .filter(|key| !schema.contains(key))
                .collect();
            if !unknown.is_empty() {
                errors.push(FieldError::new(
                    "unknown",
                    format!("Unknown fields: {}", unknown.join(", ")),
                ));
            }
        }

        tracing::debug!(fields = schema.iter().count(), errors = errors.len(), "validated dto");
        errors
    }

    fn check_field(
        &self,
        field: &str,
        descriptor: &FieldDescriptor,
        input: &mut Input,
        errors: &mut Vec<FieldError>,
    ) {
        let Some(original) = input.get(field).cloned() else {
            return;
        };

        match &descriptor.field_type {
            FieldType::String(rules) => match original {
                Value::String(text) => {
                    let normalized = normalize(&text, rules);
                    Self::check_string(field, &normalized, rules, descriptor, errors);
                    if normalized != text {
                        input.insert(field.to_string(), Value::String(normalized));
                    }
                }
                _ => errors.push(type_error(field, &descriptor.field_type)),
            },
            FieldType::Boolean => {
                match &original {
                    Value::Bool(_) => {}
                    Value::String(s) if s == "true" => {
                        input.insert(field.to_string(), Value::Bool(true));
                    }
                    Value::String(s) if s == "false" => {
                        input.insert(field.to_string(), Value::Bool(false));
                    }
                    _ => errors.push(FieldError::new(field, format!("{field} must be a boolean"))),
                }
                Self::check_one_of(field, &original, descriptor, errors);
            }
            FieldType::Date => {
                if !is_date(&original) {
                    errors.push(FieldError::new(field, format!("{field} must be a valid date")));
                    return;
                }
                Self::check_one_of(field, &original, descriptor, errors);
            }
            other => {
                let matches = match other {
                    FieldType::Number => original.is_number(),
                    FieldType::Array => original.is_array(),
                    FieldType::Object => original.is_object(),
                    _ => true,
                };
                if !matches {
                    errors.push(type_error(field, other));
                    return;
                }
                Self::check_one_of(field, &original, descriptor, errors);
            }
        }
    }

    fn check_string(
        field: &str,
        value: &str,
        rules: &StringRules,
        descriptor: &FieldDescriptor,
        errors: &mut Vec<FieldError>,
    ) {
        let length = text_length(value);
        if let Some(min) = rules.min_length {
            if length < min {
                errors.push(FieldError::new(
                    field,
                    format!("{field} must be at least {min} characters long"),
                ));
            }
        }
        if let Some(max) = rules.max_length {
            if length > max {
                errors.push(FieldError::new(
                    field,
                    format!("{field} must be at most {max} characters long"),
                ));
            }
        }

        match rules.format {
            Some(StringFormat::Email) if !is_email(value) => errors.push(FieldError::new(
                field,
                format!("{field} must be a valid email address"),
            )),
            Some(StringFormat::ObjectId) if !is_object_id(value) => errors.push(FieldError::new(
                field,
                format!("{field} must be a valid ObjectId"),
            )),
            _ => {}
        }

        Self::check_one_of(field, &Value::String(value.to_string()), descriptor, errors);
    }

    fn check_one_of(
        field: &str,
        value: &Value,
        descriptor: &FieldDescriptor,
        errors: &mut Vec<FieldError>,
    ) {
        if let Some(allowed) = &descriptor.one_of {
            if !is_allowed(allowed, value) {
                errors.push(one_of_error(field, allowed));
            }
        }
    }

    /// Reduced rule set for query strings: presence and enum membership only.
    /// Nothing is normalized.
    pub fn validate_query(&self, schema: &FieldSchema, query: Input) -> ValidationOutcome {
        let mut errors = Vec::new();

        for (field, descriptor) in schema.iter() {
            let value = query.get(field);
            if is_absent(value) {
                if descriptor.required {
                    errors.push(FieldError::new(field, format!("{field} is required")));
                }
                continue;
            }

            if let (Some(allowed), Some(value)) = (&descriptor.one_of, value) {
                if !is_allowed(allowed, value) {
                    errors.push(one_of_error(field, allowed));
                }
            }
        }

        tracing::debug!(fields = schema.iter().count(), errors = errors.len(), "validated query");
        ValidationOutcome {
            errors,
            input: query,
        }
    }
}

fn normalize(value: &str, rules: &StringRules) -> String {
    let value = if rules.trim { value.trim() } else { value };
    if rules.lowercase {
        value.to_lowercase()
    } else {
        value.to_string()
    }
}

fn type_error(field: &str, expected: &FieldType) -> FieldError {
    FieldError::new(field, format!("{field} must be of type {expected}"))
}

/// Validate with default options
pub fn validate(schema: &FieldSchema, input: Input) -> ValidationOutcome {
    Validator::default().validate(schema, input)
}

/// Query validation with default options
pub fn validate_query(schema: &FieldSchema, query: Input) -> ValidationOutcome {
    Validator::default().validate_query(schema, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> Input {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    fn messages(outcome: &ValidationOutcome) -> Vec<&str> {
        outcome.errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        let schema = FieldSchema::new().field(
            "email",
            FieldDescriptor::string().required().email().lowercase().trim(),
        );

        let outcome = validate(&schema, input(json!({"email": "  A@B.COM "})));
        assert!(outcome.is_valid(), "{:?}", outcome.errors);
        assert_eq!(Value::Object(outcome.input), json!({"email": "a@b.com"}));
    }

    #[test]
    fn test_empty_string_only_reports_required() {
        let schema = FieldSchema::new().field(
            "name",
            FieldDescriptor::string().required().min_length(1).max_length(5),
        );

        let outcome = validate(&schema, input(json!({"name": ""})));
        assert_eq!(
            outcome.errors,
            vec![FieldError::new("name", "name is required".to_string())]
        );
    }

    #[test]
    fn test_enum_violation_lists_allowed_values() {
        let schema = FieldSchema::new().field(
            "role",
            FieldDescriptor::string().required().one_of(["member", "owner"]),
        );

        let outcome = validate(&schema, input(json!({"role": "admin"})));
        assert_eq!(messages(&outcome), vec!["role must be one of: member, owner"]);
        assert_eq!(outcome.errors[0].field, "role");
    }

    #[test]
    fn test_all_fields_reported_in_declaration_order() {
        let schema = FieldSchema::new()
            .field("zeta", FieldDescriptor::string().required())
            .field("alpha", FieldDescriptor::number().required());

        let outcome = validate(&schema, input(json!({"alpha": null})));
        let fields: Vec<&str> = outcome.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["zeta", "alpha"]);
        assert_eq!(messages(&outcome), vec!["zeta is required", "alpha is required"]);
    }

    #[test]
    fn test_boolean_coercion() {
        let schema = FieldSchema::new().field("archived", FieldDescriptor::boolean());

        let outcome = validate(&schema, input(json!({"archived": "false"})));
        assert!(outcome.is_valid());
        assert_eq!(outcome.input["archived"], json!(false));

        let outcome = validate(&schema, input(json!({"archived": "true"})));
        assert_eq!(outcome.input["archived"], json!(true));

        let outcome = validate(&schema, input(json!({"archived": true})));
        assert!(outcome.is_valid());

        let outcome = validate(&schema, input(json!({"archived": "maybe"})));
        assert_eq!(messages(&outcome), vec!["archived must be a boolean"]);
        assert_eq!(outcome.input["archived"], json!("maybe"));

        let outcome = validate(&schema, input(json!({"archived": 1})));
        assert_eq!(messages(&outcome), vec!["archived must be a boolean"]);
    }

    #[test]
    fn test_type_mismatch_short_circuits_field() {
        let schema = FieldSchema::new()
            .field(
                "name",
                FieldDescriptor::string().min_length(3).one_of(["abc"]).trim(),
            )
            .field("count", FieldDescriptor::number().one_of([1, 2]))
            .field("tags", FieldDescriptor::array())
            .field("meta", FieldDescriptor::object());

        let outcome = validate(
            &schema,
            input(json!({"name": 42, "count": "2", "tags": {"a": 1}, "meta": [1]})),
        );
        assert_eq!(
            messages(&outcome),
            vec![
                "name must be of type string",
                "count must be of type number",
                "tags must be of type array",
                "meta must be of type object",
            ]
        );
        assert_eq!(outcome.input["name"], json!(42));
    }

    #[test]
    fn test_string_checks_can_all_fire() {
        let schema = FieldSchema::new()
            .field("code", FieldDescriptor::string().min_length(5).one_of(["alpha"]))
            .field("short", FieldDescriptor::string().max_length(2))
            .field("email", FieldDescriptor::string().email())
            .field("userId", FieldDescriptor::string().object_id());

        let outcome = validate(
            &schema,
            input(json!({"code": "ab", "short": "abc", "email": "nope", "userId": "123"})),
        );
        assert_eq!(
            messages(&outcome),
            vec![
                "code must be at least 5 characters long",
                "code must be one of: alpha",
                "short must be at most 2 characters long",
                "email must be a valid email address",
                "userId must be a valid ObjectId",
            ]
        );
    }

    #[test]
    fn test_normalization_applies_even_when_invalid() {
        let schema = FieldSchema::new().field(
            "email",
            FieldDescriptor::string().required().email().trim().lowercase(),
        );

        let outcome = validate(&schema, input(json!({"email": "  NOT-AN-EMAIL  "})));
        assert_eq!(messages(&outcome), vec!["email must be a valid email address"]);
        assert_eq!(outcome.input["email"], json!("not-an-email"));
    }

    #[test]
    fn test_non_string_enum() {
        let schema = FieldSchema::new().field("priority", FieldDescriptor::number().one_of([1, 2, 3]));

        assert!(validate(&schema, input(json!({"priority": 2}))).is_valid());
        let outcome = validate(&schema, input(json!({"priority": 7})));
        assert_eq!(messages(&outcome), vec!["priority must be one of: 1, 2, 3"]);
    }

    #[test]
    fn test_numeric_enum_matches_by_value() {
        let schema = FieldSchema::new().field("priority", FieldDescriptor::number().one_of([1, 2, 3]));

        assert!(validate(&schema, input(json!({"priority": 2.0}))).is_valid());
        let outcome = validate(&schema, input(json!({"priority": 2.5})));
        assert_eq!(messages(&outcome), vec!["priority must be one of: 1, 2, 3"]);

        let floats = FieldSchema::new().field("ratio", FieldDescriptor::number().one_of([0.5, 1.0]));
        assert!(validate(&floats, input(json!({"ratio": 1}))).is_valid());

        let strings = FieldSchema::new().field("level", FieldDescriptor::string().one_of(["2"]));
        assert!(!validate(&strings, input(json!({"level": 2}))).is_valid());
    }

    #[test]
    fn test_dates() {
        let schema = FieldSchema::new().field("addedAt", FieldDescriptor::date().required());

        assert!(validate(&schema, input(json!({"addedAt": "2024-05-01T10:00:00Z"}))).is_valid());
        assert!(validate(&schema, input(json!({"addedAt": 1714557600000i64}))).is_valid());
        let outcome = validate(&schema, input(json!({"addedAt": "someday"})));
        assert_eq!(messages(&outcome), vec!["addedAt must be a valid date"]);
    }

    #[test]
    fn test_optional_absent_fields_are_skipped() {
        let schema = FieldSchema::new()
            .field("name", FieldDescriptor::string().min_length(1).trim())
            .field("archived", FieldDescriptor::boolean());

        let outcome = validate(&schema, input(json!({"name": "", "archived": null})));
        assert!(outcome.is_valid());
        assert_eq!(Value::Object(outcome.input), json!({"name": "", "archived": null}));
    }

    #[test]
    fn test_unknown_fields_pass_by_default() {
        let schema = FieldSchema::new().field("name", FieldDescriptor::string().required());
        let outcome = validate(&schema, input(json!({"name": "x", "extra": 1, "other": true})));
        assert!(outcome.is_valid());
        assert_eq!(outcome.input["extra"], json!(1));
    }

    #[test]
    fn test_unknown_fields_rejected_when_enabled() {
        let validator = Validator::new(ValidationOptions {
            reject_unknown_fields: true,
            ..ValidationOptions::default()
        });
        let schema = FieldSchema::new().field("name", FieldDescriptor::string().required());

        let outcome = validator.validate(&schema, input(json!({"extra": 1, "other": true})));
        assert_eq!(
            outcome.errors,
            vec![
                FieldError::new("name", "name is required".to_string()),
                FieldError::new("unknown", "Unknown fields: extra, other".to_string()),
            ]
        );
    }

    #[test]
    fn test_defaults_only_applied_when_enabled() {
        let schema = FieldSchema::new().field(
            "role",
            FieldDescriptor::string().one_of(["member", "owner"]).default_value("member"),
        );

        let outcome = validate(&schema, Input::new());
        assert!(outcome.is_valid());
        assert!(!outcome.input.contains_key("role"));

        let validator = Validator::new(ValidationOptions {
            apply_defaults: true,
            ..ValidationOptions::default()
        });
        let outcome = validator.validate(&schema, Input::new());
        assert!(outcome.is_valid());
        assert_eq!(outcome.input["role"], json!("member"));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let schema = FieldSchema::new()
            .field("name", FieldDescriptor::string().required().min_length(1).max_length(100).trim())
            .field("email", FieldDescriptor::string().required().email().lowercase().trim())
            .field("archived", FieldDescriptor::boolean());
        let raw = input(json!({"name": "  Groceries ", "email": " Me@Example.COM", "archived": "true"}));

        let first = validate(&schema, raw);
        assert!(first.is_valid());
        let second = validate(&schema, first.input.clone());
        assert!(second.is_valid());
        assert_eq!(second.input, first.input);
        assert_eq!(
            Value::Object(second.input),
            json!({"name": "Groceries", "email": "me@example.com", "archived": true})
        );
    }

    #[test]
    fn test_query_checks_presence_and_enum_only() {
        let schema = FieldSchema::new()
            .field("archived", FieldDescriptor::string().one_of(["true", "false"]))
            .field("search", FieldDescriptor::string().max_length(3).trim())
            .field("page", FieldDescriptor::string().required());

        let outcome = validate_query(
            &schema,
            input(json!({"archived": "maybe", "search": "  far too long  "})),
        );
        assert_eq!(
            messages(&outcome),
            vec!["archived must be one of: true, false", "page is required"]
        );
        assert_eq!(outcome.input["search"], json!("  far too long  "));

        let outcome = validate_query(&schema, input(json!({"archived": "true", "page": "2"})));
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_into_result() {
        let schema = FieldSchema::new().field("name", FieldDescriptor::string().required());

        let sanitized = validate(&schema, input(json!({"name": "x"}))).into_result().unwrap();
        assert_eq!(sanitized["name"], json!("x"));

        let (errors, echoed) = validate(&schema, Input::new()).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(echoed.is_empty());
    }
}
