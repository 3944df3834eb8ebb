//! Shoplist Configuration Module
//! Handles loading and validating shoplist.config.json

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::engine::rbac::{
    HierarchyError, Identity, InMemoryIdentityResolver, InMemoryMembershipStore, MembershipRole,
    Role, RoleHierarchy,
};
use crate::engine::validation::ValidationOptions;

pub const CONFIG_FILE: &str = "shoplist.config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Invalid config format: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },
    #[error("Invalid role hierarchy: {0}")]
    Hierarchy(#[from] HierarchyError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub validation: ValidationOptions,
    #[serde(default)]
    pub roles: RolesConfig,
    #[serde(default)]
    pub fixtures: FixturesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Attach internal error detail to 500 responses
    #[serde(default)]
    pub development: bool,
    #[serde(default = "default_membership_timeout_ms")]
    pub membership_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RolesConfig {
    /// Direct edges `ROLE -> [implied roles]`; replaces the built-in hierarchy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixturesConfig {
    /// Any non-empty bearer token resolves to the mock user
    #[serde(default = "default_true")]
    pub accept_any_token: bool,
    #[serde(default)]
    pub tokens: Vec<TokenFixture>,
    #[serde(default)]
    pub memberships: Vec<MembershipFixture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenFixture {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipFixture {
    pub user_id: String,
    pub shop_list_id: String,
    pub role: MembershipRole,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_membership_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            development: false,
            membership_timeout_ms: default_membership_timeout_ms(),
        }
    }
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            accept_any_token: true,
            tokens: Vec::new(),
            memberships: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = project_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path));
        }
        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Built-in defaults when the project has no config file
    pub fn load_or_default(project_dir: &Path) -> Result<Self, ConfigError> {
        match Self::load(project_dir) {
            Err(ConfigError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, project_dir: &Path) -> Result<(), ConfigError> {
        let config_path = project_dir.join(CONFIG_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Apply `SHOPLIST_HOST`, `SHOPLIST_PORT` and `SHOPLIST_ENV`
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SHOPLIST_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("SHOPLIST_PORT") {
            self.api.port = port.parse().map_err(|_| ConfigError::InvalidOverride {
                key: "SHOPLIST_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(env) = lookup("SHOPLIST_ENV") {
            self.runtime.development = env.eq_ignore_ascii_case("development");
        }
        Ok(self)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn membership_timeout(&self) -> Duration {
        Duration::from_millis(self.runtime.membership_timeout_ms)
    }

    /// Configured hierarchy, or the built-in one
    pub fn role_hierarchy(&self) -> Result<RoleHierarchy, ConfigError> {
        let Some(edges) = &self.roles.hierarchy else {
            return Ok(RoleHierarchy::standard());
        };

        let mut parsed = Vec::with_capacity(edges.len());
        for (role, parents) in edges {
            let role: Role = role.parse()?;
            let parents = parents
                .iter()
                .map(|parent| parent.parse())
                .collect::<Result<Vec<Role>, _>>()?;
            parsed.push((role, parents));
        }
        Ok(RoleHierarchy::from_edges(parsed)?)
    }

    pub fn identity_resolver(&self) -> InMemoryIdentityResolver {
        let base = if self.fixtures.accept_any_token {
            InMemoryIdentityResolver::permissive(Identity::mock())
        } else {
            InMemoryIdentityResolver::new()
        };
        self.fixtures.tokens.iter().fold(base, |resolver, fixture| {
            resolver.with_token(
                &fixture.token,
                Identity::new(&fixture.user_id, &fixture.name, &fixture.email),
            )
        })
    }

    pub fn membership_store(&self) -> InMemoryMembershipStore {
        let store = InMemoryMembershipStore::new();
        for fixture in &self.fixtures.memberships {
            store.insert(&fixture.user_id, &fixture.shop_list_id, fixture.role);
        }
        store
    }
}
