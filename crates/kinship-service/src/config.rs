//! Configuration for kinship operations
//!
//! Controls the traversal bound, which rule table is loaded and the
//! relationship validation policy.

use kinship_graph::DEFAULT_MAX_DEPTH;
use kinship_rules::BUILTIN_LOCALES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted traversal bound
pub const MAX_DEPTH_LIMIT: usize = 64;

/// Configuration for the kinship service
///
/// # Examples
///
/// ```
/// use kinship_service::KinshipConfig;
///
/// let config = KinshipConfig::default();
/// assert_eq!(config.max_depth, 6);
/// assert_eq!(config.rules_locale, "en");
///
/// let config = KinshipConfig::from_toml("max_depth = 10\nrules_locale = \"vi\"").unwrap();
/// assert_eq!(config.max_depth, 10);
/// assert!(config.policy.forbid_ancestry_cycles);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinshipConfig {
    /// Maximum number of steps a kinship path may have
    /// Default: 6
    pub max_depth: usize,

    /// Built-in rule table to use when `rules_path` is not set
    /// Default: "en"
    pub rules_locale: String,

    /// Custom rule table file, overriding `rules_locale`
    pub rules_path: Option<PathBuf>,

    /// Validation applied to relationship updates
    pub policy: RelationshipPolicy,
}

/// Checks applied on top of the graph invariants when relationships change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipPolicy {
    /// Reject parent assignments that make a member their own ancestor
    /// Default: true
    pub forbid_ancestry_cycles: bool,

    /// Require fathers and husbands to be male, mothers and wives female
    /// (`Unknown` is always accepted)
    /// Default: false
    pub require_parent_gender: bool,
}

impl Default for RelationshipPolicy {
    fn default() -> Self {
        Self {
            forbid_ancestry_cycles: true,
            require_parent_gender: false,
        }
    }
}

impl Default for KinshipConfig {
    /// Balanced configuration
    ///
    /// - Depth bound: 6 steps (second cousins)
    /// - Rules: built-in English table
    /// - Ancestry cycles rejected, genders not enforced
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            rules_locale: "en".to_string(),
            rules_path: None,
            policy: RelationshipPolicy::default(),
        }
    }
}

impl KinshipConfig {
    /// Strict configuration
    ///
    /// Shorter paths and every policy check enabled. Suitable for curated
    /// trees where data entry mistakes should be caught early.
    pub fn strict() -> Self {
        Self {
            max_depth: 4,
            policy: RelationshipPolicy {
                forbid_ancestry_cycles: true,
                require_parent_gender: true,
            },
            ..Self::default()
        }
    }

    /// Lenient configuration
    ///
    /// Long paths and only the structural invariants enforced. Suitable for
    /// importing messy data.
    pub fn lenient() -> Self {
        Self {
            max_depth: 12,
            policy: RelationshipPolicy {
                forbid_ancestry_cycles: false,
                require_parent_gender: false,
            },
            ..Self::default()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be greater than 0".to_string());
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(format!("max_depth cannot exceed {}", MAX_DEPTH_LIMIT));
        }
        if self.rules_path.is_none() && !BUILTIN_LOCALES.contains(&self.rules_locale.as_str()) {
            return Err(format!(
                "Unknown rules_locale '{}' (available: {})",
                self.rules_locale,
                BUILTIN_LOCALES.join(", ")
            ));
        }
        Ok(())
    }

    /// Parse configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }
}
