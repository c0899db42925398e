use crate::features::FeatureGate;
use crate::options::OptionsSource;

use super::Rule;

/// Condition on the options that selects a branch of a [`GuardChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The option is present and equal to `token`.
    Equals { option: String, token: String },
    /// The option is present and not blank.
    NonEmpty { option: String },
    /// The option is absent.
    Unset { option: String },
    /// The option is present and truthy.
    Truthy { option: String },
}

impl Guard {
    pub fn equals(option: impl Into<String>, token: impl Into<String>) -> Self {
        Guard::Equals {
            option: option.into(),
            token: token.into(),
        }
    }

    pub fn non_empty(option: impl Into<String>) -> Self {
        Guard::NonEmpty {
            option: option.into(),
        }
    }

    pub fn unset(option: impl Into<String>) -> Self {
        Guard::Unset {
            option: option.into(),
        }
    }

    pub fn truthy(option: impl Into<String>) -> Self {
        Guard::Truthy {
            option: option.into(),
        }
    }

    pub fn matches(&self, options: &dyn OptionsSource) -> bool {
        match self {
            Guard::Equals { option, token } => options.get(option) == Some(token.as_str()),
            Guard::NonEmpty { option } => options.get(option).is_some_and(|v| !v.trim().is_empty()),
            Guard::Unset { option } => !options.is_set(option),
            Guard::Truthy { option } => options.get_bool(option),
        }
    }
}

/// Ordered multi-way conditional.
///
/// The first matching guard's rules run. If nothing matches, the `otherwise`
/// rules run only when `feature` is supported; otherwise nothing is written
/// and the existing keys are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardChain {
    pub feature: String,
    pub branches: Vec<(Guard, Vec<Rule>)>,
    pub otherwise: Vec<Rule>,
}

impl GuardChain {
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            branches: Vec::new(),
            otherwise: Vec::new(),
        }
    }

    pub fn when(mut self, guard: Guard, rules: Vec<Rule>) -> Self {
        self.branches.push((guard, rules));
        self
    }

    pub fn otherwise(mut self, rules: Vec<Rule>) -> Self {
        self.otherwise = rules;
        self
    }

    /// Rules selected for the given options, or `None` when nothing applies.
    pub fn select(
        &self,
        options: &dyn OptionsSource,
        features: &dyn FeatureGate,
    ) -> Option<&[Rule]> {
        if let Some((_, rules)) = self.branches.iter().find(|(guard, _)| guard.matches(options)) {
            return Some(rules);
        }
        if features.is_supported(&self.feature) {
            return Some(&self.otherwise);
        }
        None
    }
}
