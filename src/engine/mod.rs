// Shoplist Engine - Core module structure
pub mod api;
pub mod cli;
pub mod config;
pub mod dto;
pub mod error;
pub mod observability;
pub mod rbac;
pub mod response;
pub mod validation;

pub use config::Config;
pub use error::AppError;
