//! Request Validation Module
//!
//! Schema-driven checks and coercion for request bodies and query strings

pub mod format;
pub mod schema;
pub mod validator;

pub use schema::{FieldDescriptor, FieldSchema, FieldType, StringField, StringFormat, StringRules};
pub use validator::{
    validate, validate_query, FieldError, Input, ValidationOptions, ValidationOutcome, Validator,
};
