//! Caller identity resolution
//!
//! Maps request credentials to a caller. Credential verification lives behind
//! the `IdentityResolver` trait; the in-memory resolver backs the stub server
//! and the tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::profile::Role;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Not authorized to access this route")]
    MissingCredentials,

    #[error("Not authorized to access this route")]
    InvalidCredentials,
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// Role before any resource-scoped membership is considered
    pub base_role: Role,
}

impl Identity {
    pub fn new(user_id: &str, name: &str, email: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            base_role: Role::Authenticated,
        }
    }

    /// Caller the stub backend hands out for any token
    pub fn mock() -> Self {
        Self::new("mock-user-id", "Mock User", "mock@example.com")
    }
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Identity, AuthenticationError>;
}

/// Token table with an optional catch-all caller
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityResolver {
    tokens: HashMap<String, Identity>,
    fallback: Option<Identity>,
}

impl InMemoryIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept any non-empty token as `identity`
    pub fn permissive(identity: Identity) -> Self {
        Self {
            tokens: HashMap::new(),
            fallback: Some(identity),
        }
    }

    pub fn with_token(mut self, token: &str, identity: Identity) -> Self {
        self.tokens.insert(token.to_string(), identity);
        self
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Identity, AuthenticationError> {
        if token.trim().is_empty() {
            return Err(AuthenticationError::MissingCredentials);
        }
        if let Some(identity) = self.tokens.get(token) {
            return Ok(identity.clone());
        }
        self.fallback
            .clone()
            .ok_or(AuthenticationError::InvalidCredentials)
    }
}
