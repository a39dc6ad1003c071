//! # Runtime Configuration
//!
//! Group and proof-engine settings, loaded from YAML with per-field
//! defaults and overridable from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `COHORT_GROUP_ID` | `group_id` |
//! | `COHORT_TREE_DEPTH` | `tree_depth` |
//! | `COHORT_NON_MEMBER_POLICY` | `non_member_policy` (`fail-closed` / `degrade-unverified`) |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest supported Merkle tree depth.
pub const MIN_TREE_DEPTH: usize = 1;
/// Largest supported Merkle tree depth (2^32 leaves).
pub const MAX_TREE_DEPTH: usize = 32;

const DEFAULT_GROUP_ID: &str = "network-school-2024";
const DEFAULT_TREE_DEPTH: usize = 20;

/// What the proof engine does when asked to prove for a commitment that is
/// not in the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonMemberPolicy {
    /// Refuse with a typed error.
    #[default]
    FailClosed,
    /// Return a bundle tagged unverified. Verification always rejects it.
    DegradeUnverified,
}

impl NonMemberPolicy {
    /// The kebab-case name used in config files and the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailClosed => "fail-closed",
            Self::DegradeUnverified => "degrade-unverified",
        }
    }
}

impl std::str::FromStr for NonMemberPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-closed" => Ok(Self::FailClosed),
            "degrade-unverified" => Ok(Self::DegradeUnverified),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for NonMemberPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a Cohort deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Identifier of the membership group. Informational; carried in logs.
    #[serde(default = "default_group_id")]
    pub group_id: String,
    /// Merkle tree depth. Fixed for the lifetime of a deployed group.
    #[serde(default = "default_tree_depth")]
    pub tree_depth: usize,
    /// Behavior when a proof is requested for a non-member.
    #[serde(default)]
    pub non_member_policy: NonMemberPolicy,
}

fn default_group_id() -> String {
    DEFAULT_GROUP_ID.to_string()
}

fn default_tree_depth() -> usize {
    DEFAULT_TREE_DEPTH
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            group_id: default_group_id(),
            tree_depth: DEFAULT_TREE_DEPTH,
            non_member_policy: NonMemberPolicy::default(),
        }
    }
}

impl CohortConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML config file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::load_from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        tracing::debug!(
            group_id = %config.group_id,
            tree_depth = config.tree_depth,
            policy = %config.non_member_policy,
            "loaded cohort configuration"
        );
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(group_id) = lookup("COHORT_GROUP_ID") {
            self.group_id = group_id;
        }
        if let Some(raw) = lookup("COHORT_TREE_DEPTH") {
            self.tree_depth = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "COHORT_TREE_DEPTH",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("COHORT_NON_MEMBER_POLICY") {
            self.non_member_policy = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "COHORT_NON_MEMBER_POLICY",
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TREE_DEPTH..=MAX_TREE_DEPTH).contains(&self.tree_depth) {
            return Err(ConfigError::Invalid(format!(
                "tree_depth {} outside supported range {MIN_TREE_DEPTH}..={MAX_TREE_DEPTH}",
                self.tree_depth
            )));
        }
        if self.group_id.trim().is_empty() {
            return Err(ConfigError::Invalid("group_id must not be empty".to_string()));
        }
        Ok(())
    }
}
