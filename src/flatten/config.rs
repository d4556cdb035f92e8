//! Configuration for flattening

use serde::{Deserialize, Serialize};

/// Raw keys tolerated in strict mode even though no question declares them
pub const DEFAULT_IGNORED_FIELDS: &[&str] = &[
    "formhub/uuid",
    "meta/instanceID",
    "meta/rootUuid",
    "meta/deprecatedID",
];

/// What to do when two raw keys in one record reduce to the same column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Keep the first value seen; later ones are dropped
    #[default]
    KeepFirst,
    /// Later values overwrite earlier ones
    KeepLast,
    /// Keep no value: strict mode fails with a validation error, lenient mode
    /// leaves the cell null
    Reject,
}

/// Configuration for the flatten engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlattenConfig {
    /// Fail on the first submission that disagrees with the schema
    pub strict: bool,

    /// Resolution of same-column collisions within one row
    pub collision_policy: CollisionPolicy,

    /// Raw keys never treated as undeclared
    pub ignore_fields: Vec<String>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            strict: false,
            collision_policy: CollisionPolicy::default(),
            ignore_fields: DEFAULT_IGNORED_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FlattenConfig {
    /// Create a new configuration with defaults (lenient)
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict configuration: schema mismatches abort the batch
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Create a builder for custom configuration
    pub fn builder() -> FlattenConfigBuilder {
        FlattenConfigBuilder::default()
    }
}

/// Builder for FlattenConfig
#[derive(Debug, Default)]
pub struct FlattenConfigBuilder {
    config: FlattenConfig,
}

impl FlattenConfigBuilder {
    /// Enable or disable strict mode
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Set the collision policy
    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.config.collision_policy = policy;
        self
    }

    /// Add a raw key to ignore
    pub fn ignore_field(mut self, field: impl Into<String>) -> Self {
        self.config.ignore_fields.push(field.into());
        self
    }

    /// Replace the ignored keys
    pub fn ignore_fields(mut self, fields: Vec<String>) -> Self {
        self.config.ignore_fields = fields;
        self
    }

    /// Build the configuration
    pub fn build(self) -> FlattenConfig {
        self.config
    }
}
