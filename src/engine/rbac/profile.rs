//! Role profiles and the inheritance hierarchy
//!
//! Direct edges are closed transitively once, at construction. Checks are
//! set lookups and never walk the graph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::enforcer::AuthorizationError;

/// Caller profiles, from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Unauthenticated,
    Authenticated,
    Member,
    Owner,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Unauthenticated,
        Role::Authenticated,
        Role::Member,
        Role::Owner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unauthenticated => "UNAUTHENTICATED",
            Role::Authenticated => "AUTHENTICATED",
            Role::Member => "MEMBER",
            Role::Owner => "OWNER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HierarchyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "UNAUTHENTICATED" => Ok(Role::Unauthenticated),
            "AUTHENTICATED" => Ok(Role::Authenticated),
            "MEMBER" => Ok(Role::Member),
            "OWNER" => Ok(Role::Owner),
            _ => Err(HierarchyError::UnknownRole(value.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Role hierarchy contains a cycle through {0}")]
    Cycle(Role),
}

/// Direct inheritance edges of the built-in hierarchy
const STANDARD_EDGES: [(Role, &[Role]); 4] = [
    (Role::Unauthenticated, &[]),
    (Role::Authenticated, &[Role::Unauthenticated]),
    (Role::Member, &[Role::Authenticated]),
    (Role::Owner, &[Role::Member]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Immutable role lattice with precomputed ancestor sets
#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    closure: HashMap<Role, BTreeSet<Role>>,
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}

impl RoleHierarchy {
    /// Owner > Member > Authenticated > Unauthenticated
    pub fn standard() -> Self {
        Self::from_edges(
            STANDARD_EDGES
                .iter()
                .map(|(role, parents)| (*role, parents.to_vec())),
        )
        .expect("built-in role hierarchy is acyclic")
    }

    /// Build a hierarchy from direct `role -> implied roles` edges.
    ///
    /// Roles that never appear as a key have an empty ancestor set. A role
    /// that reaches itself through its edges is rejected.
    pub fn from_edges<I>(edges: I) -> Result<Self, HierarchyError>
    where
        I: IntoIterator<Item = (Role, Vec<Role>)>,
    {
        let mut direct: HashMap<Role, Vec<Role>> = HashMap::new();
        // Duplicate keys merge their parent lists
        for (role, parents) in edges {
            let entry = direct.entry(role).or_default();
            for parent in parents {
                if !entry.contains(&parent) {
                    entry.push(parent);
                }
            }
        }

        let mut closure = HashMap::new();
        let mut state = HashMap::new();
        let mut roles: Vec<Role> = direct.keys().copied().collect();
        roles.sort();
        for role in roles {
            Self::close(role, &direct, &mut state, &mut closure)?;
        }

        Ok(Self { closure })
    }

    fn close(
        role: Role,
        direct: &HashMap<Role, Vec<Role>>,
        state: &mut HashMap<Role, Visit>,
        closure: &mut HashMap<Role, BTreeSet<Role>>,
    ) -> Result<(), HierarchyError> {
        match state.get(&role) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => return Err(HierarchyError::Cycle(role)),
            None => {}
        }
        state.insert(role, Visit::InProgress);

        let mut ancestors = BTreeSet::new();
        for parent in direct.get(&role).map(Vec::as_slice).unwrap_or_default() {
            if *parent == role {
                return Err(HierarchyError::Cycle(role));
            }
            Self::close(*parent, direct, state, closure)?;
            ancestors.insert(*parent);
            if let Some(inherited) = closure.get(parent) {
                ancestors.extend(inherited.iter().copied());
            }
        }

        state.insert(role, Visit::Done);
        closure.insert(role, ancestors);
        Ok(())
    }

    /// Roles implied by `role`, excluding itself
    pub fn ancestors(&self, role: Role) -> impl Iterator<Item = Role> + '_ {
        self.closure.get(&role).into_iter().flatten().copied()
    }

    /// True iff `actual` equals `required` or implies it
    pub fn has_role(&self, actual: Role, required: Role) -> bool {
        actual == required
            || self
                .closure
                .get(&actual)
                .is_some_and(|ancestors| ancestors.contains(&required))
    }

    /// `has_role`, reported as a `Forbidden` result naming the required role
    pub fn authorize(&self, actual: Role, required: Role) -> Result<(), AuthorizationError> {
        if self.has_role(actual, required) {
            Ok(())
        } else {
            Err(AuthorizationError::Forbidden { required })
        }
    }
}
