// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolver and materializer configuration.
//!
//! Both structs are plain values with `Default` impls and `with_*`
//! builders. With the `serde` feature they can be embedded in an
//! application's own configuration file.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Container used when an entity declares no `schema`.
pub const DEFAULT_CONTAINER: &str = "public";

/// Relation depth at which definition resolution stops expanding.
pub const DEFAULT_MAX_RELATION_DEPTH: usize = 8;

/// Definition resolution settings.
///
/// # Example
///
/// ```rust
/// use rowgraph_core::ResolverConfig;
///
/// let config = ResolverConfig::default()
///     .with_default_container("dbo")
///     .with_max_relation_depth(3);
/// assert_eq!(config.default_container, "dbo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResolverConfig {
    /// Container for entities without `#[entity(schema = "..")]`.
    pub default_container: String,

    /// Maximum number of relation hops expanded from a root.
    pub max_relation_depth: usize
}

impl ResolverConfig {
    /// Set the default container.
    #[must_use]
    pub fn with_default_container(mut self, container: impl Into<String>) -> Self {
        self.default_container = container.into();
        self
    }

    /// Set the relation depth bound.
    #[must_use]
    pub const fn with_max_relation_depth(mut self, depth: usize) -> Self {
        self.max_relation_depth = depth;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_container:  DEFAULT_CONTAINER.to_owned(),
            max_relation_depth: DEFAULT_MAX_RELATION_DEPTH
        }
    }
}

/// When a related node is left unset because its columns are `NULL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NullSuppression {
    /// Skip the node if its selected key columns are all `NULL`, or, when
    /// no key is selected, if all its selected columns are `NULL`.
    #[default]
    KeyOrAllAttributes,

    /// Skip the node only if all its selected columns are `NULL`.
    AllAttributes,

    /// Always create related nodes.
    Never
}

impl NullSuppression {
    /// Check if nodes may be suppressed at all.
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Never)
    }
}

/// Row materialization settings.
///
/// # Example
///
/// ```rust
/// use rowgraph_core::{MaterializerConfig, NullSuppression};
///
/// let config = MaterializerConfig::default().with_null_suppression(NullSuppression::Never);
/// assert!(config.share_identities);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaterializerConfig {
    /// Null suppression policy for related nodes.
    pub null_suppression: NullSuppression,

    /// Reuse keyed related objects across rows of one read pass.
    pub share_identities: bool
}

impl MaterializerConfig {
    /// Set the null suppression policy.
    #[must_use]
    pub const fn with_null_suppression(mut self, policy: NullSuppression) -> Self {
        self.null_suppression = policy;
        self
    }

    /// Enable or disable identity sharing.
    #[must_use]
    pub const fn with_share_identities(mut self, share: bool) -> Self {
        self.share_identities = share;
        self
    }
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            null_suppression: NullSuppression::default(),
            share_identities: true
        }
    }
}
