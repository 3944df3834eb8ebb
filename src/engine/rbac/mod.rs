//! RBAC Module
//!
//! Role profiles with hierarchical inheritance and membership-scoped checks

pub mod enforcer;
pub mod identity;
pub mod membership;
pub mod profile;

pub use enforcer::{AuthorizationError, Authorizer, MembershipContext};
pub use identity::{AuthenticationError, Identity, IdentityResolver, InMemoryIdentityResolver};
pub use membership::{InMemoryMembershipStore, MembershipError, MembershipRole, MembershipStore};
pub use profile::{HierarchyError, Role, RoleHierarchy};
