//! RBAC Enforcement Layer
//!
//! Resolves a caller's effective role on one shop list and checks it against
//! the role an operation requires.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::identity::Identity;
use super::membership::{MembershipError, MembershipRole, MembershipStore};
use super::profile::{Role, RoleHierarchy};

/// Default budget for a single membership lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Shop list ID is required")]
    MissingResource,

    #[error("This action requires {required} profile")]
    Forbidden { required: Role },

    #[error("Membership service unavailable")]
    Unavailable(String),
}

/// Per-request authorization context for one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipContext {
    pub caller_id: String,
    pub resource_id: String,
    pub membership: Option<MembershipRole>,
    pub effective_role: Role,
}

impl MembershipContext {
    pub fn is_owner(&self) -> bool {
        self.membership == Some(MembershipRole::Owner)
    }
}

/// The enforcement engine
pub struct Authorizer {
    hierarchy: Arc<RoleHierarchy>,
    memberships: Arc<dyn MembershipStore>,
    lookup_timeout: Duration,
}

impl Authorizer {
    pub fn new(hierarchy: Arc<RoleHierarchy>, memberships: Arc<dyn MembershipStore>) -> Self {
        Self {
            hierarchy,
            memberships,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    /// Check a role the caller already holds
    pub fn authorize(&self, actual: Role, required: Role) -> Result<(), AuthorizationError> {
        self.hierarchy.authorize(actual, required)
    }

    /// Determine the caller's role for `resource_id`.
    ///
    /// A caller without a membership keeps their base role, which never
    /// satisfies `Member` or `Owner`. A store that fails or exceeds the lookup
    /// budget yields `Unavailable`. A resource the store reports as missing
    /// has no members, so the caller keeps their base role there too.
    pub async fn resolve_effective_role(
        &self,
        caller: &Identity,
        resource_id: Option<&str>,
    ) -> Result<MembershipContext, AuthorizationError> {
        let resource_id = match resource_id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => return Err(AuthorizationError::MissingResource),
        };

        let lookup = self.memberships.lookup(&caller.user_id, resource_id);
        let membership = match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(membership)) => membership,
            Ok(Err(MembershipError::NotFound(resource))) => {
                tracing::debug!(resource = %resource, "membership lookup: resource not found");
                None
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, resource = %resource_id, "membership lookup failed");
                return Err(AuthorizationError::Unavailable(err.to_string()));
            }
            Err(_) => {
                let err = MembershipError::Timeout(self.lookup_timeout.as_millis() as u64);
                tracing::warn!(error = %err, resource = %resource_id, "membership lookup failed");
                return Err(AuthorizationError::Unavailable(err.to_string()));
            }
        };

        let effective_role = membership.map(Role::from).unwrap_or(caller.base_role);
        Ok(MembershipContext {
            caller_id: caller.user_id.clone(),
            resource_id: resource_id.to_string(),
            membership,
            effective_role,
        })
    }

    /// Resolve the caller's role on `resource_id` and require `required`
    pub async fn authorize_resource(
        &self,
        caller: &Identity,
        resource_id: Option<&str>,
        required: Role,
    ) -> Result<MembershipContext, AuthorizationError> {
        let context = self.resolve_effective_role(caller, resource_id).await?;
        match self.authorize(context.effective_role, required) {
            Ok(()) => {
                tracing::debug!(
                    user = %context.caller_id,
                    resource = %context.resource_id,
                    role = %context.effective_role,
                    required = %required,
                    "access granted"
                );
                Ok(context)
            }
            Err(err) => {
                tracing::warn!(
                    user = %context.caller_id,
                    resource = %context.resource_id,
                    role = %context.effective_role,
                    required = %required,
                    "access denied"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rbac::membership::InMemoryMembershipStore;
    use async_trait::async_trait;

    fn authorizer() -> Authorizer {
        let store = InMemoryMembershipStore::new()
            .with_membership("alice", "list-1", MembershipRole::Owner)
            .with_membership("bob", "list-1", MembershipRole::Member);
        Authorizer::new(Arc::new(RoleHierarchy::standard()), Arc::new(store))
    }

    fn caller(id: &str) -> Identity {
        Identity::new(id, id, &format!("{id}@example.com"))
    }

    struct FailingStore(MembershipError);

    #[async_trait]
    impl MembershipStore for FailingStore {
        async fn lookup(&self, _: &str, _: &str) -> Result<Option<MembershipRole>, MembershipError> {
            Err(self.0.clone())
        }
    }

    struct SlowStore;

    #[async_trait]
    impl MembershipStore for SlowStore {
        async fn lookup(&self, _: &str, _: &str) -> Result<Option<MembershipRole>, MembershipError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Some(MembershipRole::Owner))
        }
    }

    #[tokio::test]
    async fn test_owner_and_member_resolution() {
        let auth = authorizer();

        let ctx = auth
            .authorize_resource(&caller("alice"), Some("list-1"), Role::Owner)
            .await
            .unwrap();
        assert_eq!(ctx.effective_role, Role::Owner);
        assert!(ctx.is_owner());

        let ctx = auth
            .authorize_resource(&caller("bob"), Some("list-1"), Role::Member)
            .await
            .unwrap();
        assert_eq!(ctx.effective_role, Role::Member);
        assert_eq!(ctx.membership, Some(MembershipRole::Member));

        let err = auth
            .authorize_resource(&caller("bob"), Some("list-1"), Role::Owner)
            .await
            .unwrap_err();
        assert_eq!(err, AuthorizationError::Forbidden { required: Role::Owner });
    }

    #[tokio::test]
    async fn test_non_member_keeps_base_role() {
        let auth = authorizer();

        let ctx = auth
            .resolve_effective_role(&caller("carol"), Some("list-1"))
            .await
            .unwrap();
        assert_eq!(ctx.membership, None);
        assert_eq!(ctx.effective_role, Role::Authenticated);

        for required in [Role::Member, Role::Owner] {
            let err = auth
                .authorize_resource(&caller("carol"), Some("list-1"), required)
                .await
                .unwrap_err();
            assert_eq!(err, AuthorizationError::Forbidden { required });
        }
        assert!(auth
            .authorize_resource(&caller("carol"), Some("list-1"), Role::Authenticated)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_missing_resource_is_bad_request() {
        let auth = authorizer();
        for resource in [None, Some(""), Some("   ")] {
            let err = auth
                .authorize_resource(&caller("alice"), resource, Role::Member)
                .await
                .unwrap_err();
            assert_eq!(err, AuthorizationError::MissingResource);
        }
    }

    #[tokio::test]
    async fn test_store_failures() {
        let hierarchy = Arc::new(RoleHierarchy::standard());

        let down = Authorizer::new(
            hierarchy.clone(),
            Arc::new(FailingStore(MembershipError::Unavailable("down".into()))),
        );
        let err = down
            .authorize_resource(&caller("alice"), Some("list-1"), Role::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthorizationError::Unavailable(_)));

        let missing = Authorizer::new(
            hierarchy.clone(),
            Arc::new(FailingStore(MembershipError::NotFound("list-1".into()))),
        );
        let err = missing
            .authorize_resource(&caller("alice"), Some("list-1"), Role::Member)
            .await
            .unwrap_err();
        assert_eq!(err, AuthorizationError::Forbidden { required: Role::Member });

        let slow = Authorizer::new(hierarchy, Arc::new(SlowStore))
            .with_lookup_timeout(Duration::from_millis(20));
        let err = slow
            .authorize_resource(&caller("alice"), Some("list-1"), Role::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthorizationError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_resource_reports_required_role() {
        let missing = Authorizer::new(
            Arc::new(RoleHierarchy::standard()),
            Arc::new(FailingStore(MembershipError::NotFound("gone".into()))),
        );

        let err = missing
            .authorize_resource(&caller("alice"), Some("gone"), Role::Owner)
            .await
            .unwrap_err();
        assert_eq!(err, AuthorizationError::Forbidden { required: Role::Owner });
        assert_eq!(err.to_string(), "This action requires OWNER profile");

        let ctx = missing
            .authorize_resource(&caller("alice"), Some("gone"), Role::Authenticated)
            .await
            .unwrap();
        assert_eq!(ctx.membership, None);
        assert_eq!(ctx.effective_role, Role::Authenticated);
    }
}
