//! Network configuration

use std::path::Path;

use colony_recovery::QuorumPolicy;
use colony_types::{ColonyRole, RoleSet};
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, NetworkResult};

/// Network configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Display name, used in logs
    pub name: String,

    /// Approvals needed to leave recovery mode
    pub quorum: QuorumPolicy,

    /// Roles that may install the latest version of an extension
    pub install_roles: Vec<ColonyRole>,

    /// Event records kept before the oldest are dropped; 0 keeps everything
    pub event_log_capacity: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "colony-network".to_string(),
            quorum: QuorumPolicy::StrictMajority,
            install_roles: vec![ColonyRole::Root, ColonyRole::Administration],
            event_log_capacity: 10_000,
        }
    }
}

impl NetworkConfig {
    pub fn from_toml_str(text: &str) -> NetworkResult<Self> {
        toml::from_str(text).map_err(|e| NetworkError::Config(e.to_string()))
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> NetworkResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn with_quorum(mut self, quorum: QuorumPolicy) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn install_role_set(&self) -> RoleSet {
        RoleSet::from_roles(&self.install_roles)
    }
}
