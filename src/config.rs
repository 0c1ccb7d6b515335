//! Engine configuration
//!
//! Two knobs, both supplied by the host application:
//! - `resource_prefix` - the first segment every resource string must carry
//! - `teams_enabled` - whether team-sourced policies participate in decisions

use serde::Deserialize;

/// Configuration for validation and decision making.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Prefix required as the first segment of every resource string,
    /// e.g. `acl` in `acl::users::*`.
    pub resource_prefix: String,

    /// When disabled, policies reachable through teams are ignored entirely.
    pub teams_enabled: bool,
}

impl AclConfig {
    /// Create a config with the given prefix and teams disabled.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        AclConfig {
            resource_prefix: prefix.into(),
            teams_enabled: false,
        }
    }

    /// Enable or disable the team feature.
    pub fn teams(mut self, enabled: bool) -> Self {
        self.teams_enabled = enabled;
        self
    }
}

impl Default for AclConfig {
    fn default() -> Self {
        AclConfig {
            resource_prefix: "acl".to_string(),
            teams_enabled: false,
        }
    }
}
