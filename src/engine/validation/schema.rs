//! Declarative field schemas for DTO input
//!
//! One descriptor per field, tagged by declared type. String-only rules live on
//! the `String` variant, so a length limit on a boolean field does not compile.

use serde_json::Value;
use std::fmt;

/// Format rules for string fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    ObjectId,
}

/// Constraints and normalization flags for a string field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub format: Option<StringFormat>,
    pub trim: bool,
    pub lowercase: bool,
}

/// Field type definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String(StringRules),
    Number,
    Boolean,
    Array,
    Object,
    Date,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String(_) => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field definition in schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub field_type: FieldType,
    pub required: bool,
    pub one_of: Option<Vec<Value>>,
    pub default: Option<Value>,
}

impl FieldDescriptor {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            one_of: None,
            default: None,
        }
    }

    pub fn string() -> StringField {
        StringField::default()
    }

    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    pub fn array() -> Self {
        Self::of(FieldType::Array)
    }

    pub fn object() -> Self {
        Self::of(FieldType::Object)
    }

    pub fn date() -> Self {
        Self::of(FieldType::Date)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn string_rules(&self) -> Option<&StringRules> {
        match &self.field_type {
            FieldType::String(rules) => Some(rules),
            _ => None,
        }
    }
}

/// Builder for string fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringField {
    rules: StringRules,
    required: bool,
    one_of: Option<Vec<Value>>,
    default: Option<Value>,
}

impl StringField {
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.rules.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.rules.max_length = Some(len);
        self
    }

    pub fn email(mut self) -> Self {
        self.rules.format = Some(StringFormat::Email);
        self
    }

    pub fn object_id(mut self) -> Self {
        self.rules.format = Some(StringFormat::ObjectId);
        self
    }

    pub fn trim(mut self) -> Self {
        self.rules.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.rules.lowercase = true;
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(values.into_iter().map(|v| Value::String(v.into())).collect());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(Value::String(value.to_string()));
        self
    }
}

impl From<StringField> for FieldDescriptor {
    fn from(field: StringField) -> Self {
        Self {
            field_type: FieldType::String(field.rules),
            required: field.required,
            one_of: field.one_of,
            default: field.default,
        }
    }
}

/// Ordered field schema. Declaration order is validation and error order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: Vec<(String, FieldDescriptor)>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field; redeclaring a name replaces it in place
    pub fn field(mut self, name: &str, descriptor: impl Into<FieldDescriptor>) -> Self {
        let descriptor = descriptor.into();
        match self.fields.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = descriptor,
            None => self.fields.push((name.to_string(), descriptor)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_keeps_declaration_order() {
        let schema = FieldSchema::new()
            .field("name", FieldDescriptor::string().required())
            .field("archived", FieldDescriptor::boolean())
            .field("email", FieldDescriptor::string().email());

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "archived", "email"]);

        let schema = schema.field("name", FieldDescriptor::number());
        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "archived", "email"]);
        assert_eq!(schema.get("name").unwrap().field_type, FieldType::Number);
    }

    #[test]
    fn test_string_builder() {
        let descriptor: FieldDescriptor = FieldDescriptor::string()
            .required()
            .min_length(1)
            .max_length(100)
            .trim()
            .lowercase()
            .email()
            .into();

        assert!(descriptor.required);
        let rules = descriptor.string_rules().unwrap();
        assert_eq!(rules.min_length, Some(1));
        assert_eq!(rules.max_length, Some(100));
        assert_eq!(rules.format, Some(StringFormat::Email));
        assert!(rules.trim && rules.lowercase);
    }

    #[test]
    fn test_enum_and_default() {
        let role: FieldDescriptor = FieldDescriptor::string()
            .one_of(["member", "owner"])
            .default_value("member")
            .into();
        assert_eq!(role.one_of, Some(vec![json!("member"), json!("owner")]));
        assert_eq!(role.default, Some(json!("member")));

        let priority = FieldDescriptor::number().one_of([1, 2, 3]);
        assert_eq!(priority.one_of, Some(vec![json!(1), json!(2), json!(3)]));
        assert!(priority.string_rules().is_none());
        assert_eq!(priority.field_type.to_string(), "number");
    }
}
