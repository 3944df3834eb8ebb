//! Shop list membership lookup

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use utoipa::ToSchema;

use super::profile::Role;

/// Role a user holds on one shop list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Member,
    Owner,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Member => "member",
            MembershipRole::Owner => "owner",
        }
    }
}

impl From<MembershipRole> for Role {
    fn from(role: MembershipRole) -> Self {
        match role {
            MembershipRole::Member => Role::Member,
            MembershipRole::Owner => Role::Owner,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("Membership store unavailable: {0}")]
    Unavailable(String),

    #[error("Membership lookup timed out after {0} ms")]
    Timeout(u64),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// `Ok(None)` means the caller is not a member of the resource
    async fn lookup(
        &self,
        user_id: &str,
        resource_id: &str,
    ) -> Result<Option<MembershipRole>, MembershipError>;
}

/// Membership records kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryMembershipStore {
    records: RwLock<HashMap<(String, String), MembershipRole>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_membership(self, user_id: &str, resource_id: &str, role: MembershipRole) -> Self {
        self.insert(user_id, resource_id, role);
        self
    }

    pub fn insert(&self, user_id: &str, resource_id: &str, role: MembershipRole) {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert((user_id.to_string(), resource_id.to_string()), role);
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn lookup(
        &self,
        user_id: &str,
        resource_id: &str,
    ) -> Result<Option<MembershipRole>, MembershipError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .get(&(user_id.to_string(), resource_id.to_string()))
            .copied())
    }
}
