//! Shoplist API Module
//! REST routes for auth, users, shop lists, items and members

pub mod auth;
pub mod gate;
pub mod members;
pub mod openapi;
pub mod shop_lists;
pub mod system;
pub mod users;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::engine::config::{Config, ConfigError};
use crate::engine::dto::DtoRegistry;
use crate::engine::error::AppError;
use crate::engine::rbac::{Authorizer, IdentityResolver};
use crate::engine::validation::{ValidationOptions, Validator};

/// Shared, read-only request context
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityResolver>,
    pub authorizer: Arc<Authorizer>,
    pub validator: Validator,
    pub dtos: Arc<DtoRegistry>,
    pub development: bool,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityResolver>, authorizer: Arc<Authorizer>) -> Self {
        Self {
            identity,
            authorizer,
            validator: Validator::default(),
            dtos: Arc::new(DtoRegistry::standard()),
            development: false,
        }
    }

    pub fn with_validation(mut self, options: ValidationOptions) -> Self {
        self.validator = Validator::new(options);
        self
    }

    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Wire in-memory backends and policy from configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let hierarchy = Arc::new(config.role_hierarchy()?);
        let authorizer = Authorizer::new(hierarchy, Arc::new(config.membership_store()))
            .with_lookup_timeout(config.membership_timeout());

        Ok(Self::new(Arc::new(config.identity_resolver()), Arc::new(authorizer))
            .with_validation(config.validation)
            .with_development(config.runtime.development))
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/api/auth/me", get(auth::get_me))
        .route("/api/users", get(users::get_users))
        .route("/api/users/{id}", get(users::get_user).put(users::update_user))
        .route(
            "/api/shoplists",
            get(shop_lists::get_shop_lists).post(shop_lists::create_shop_list),
        )
        .route(
            "/api/shoplists/{id}",
            get(shop_lists::get_shop_list)
                .put(shop_lists::update_shop_list)
                .delete(shop_lists::delete_shop_list),
        )
        .route("/api/shoplists/{id}/items", post(shop_lists::add_item))
        .route(
            "/api/shoplists/{id}/items/{item_index}",
            put(shop_lists::update_item).delete(shop_lists::delete_item),
        )
        .route(
            "/api/shoplists/{id}/members",
            get(members::get_members).post(members::add_member),
        )
        .route(
            "/api/shoplists/{id}/members/{user_id}",
            put(members::update_member_role).delete(members::remove_member),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::protect));

    Router::new()
        .route("/api/health", get(system::health_check))
        .route("/api/openapi.json", get(system::openapi_json))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .fallback(route_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}
