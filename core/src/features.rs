//! Feature gate.
//!
//! Answers whether an option is relevant for the current emulator build. The
//! binding engine uses it to pick between a declared default and a
//! feature-specific fallback when the user left an option unset.

use hashbrown::HashSet;

/// Capability query used by the binding engine.
pub trait FeatureGate {
    fn is_supported(&self, name: &str) -> bool;
}

/// Feature gate backed by an optional allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeatureSet {
    /// Every option is supported (no feature list configured).
    #[default]
    All,
    /// Only the listed options are supported.
    Only(HashSet<String>),
}

impl FeatureSet {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FeatureSet::Only(names.into_iter().map(Into::into).collect())
    }

    /// A gate that supports nothing.
    pub fn none() -> Self {
        FeatureSet::Only(HashSet::new())
    }
}

impl FeatureGate for FeatureSet {
    fn is_supported(&self, name: &str) -> bool {
        match self {
            FeatureSet::All => true,
            FeatureSet::Only(names) => names.contains(name),
        }
    }
}
