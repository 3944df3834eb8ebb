//! Shoplist - shared shopping-list REST backend
//! Role-scoped access control and declarative DTO validation

pub mod engine;

pub use engine::api::{build_router, AppState};
pub use engine::config::Config;
pub use engine::error::AppError;
pub use engine::rbac::{Authorizer, Identity, Role, RoleHierarchy};
pub use engine::validation::{validate, validate_query, FieldSchema, ValidationOutcome};
