//! Generic option source.
//!
//! The frontend hands every launch a flat, ordered set of `name -> value`
//! strings. Adapters only read it; a launch never mutates its options.

use indexmap::IndexMap;

/// Tokens accepted as `true` by [`OptionsSource::get_bool`] (case-insensitive).
pub const TRUTHY_TOKENS: &[&str] = &["1", "true", "on", "yes", "enabled"];

/// Returns true if `value` is one of [`TRUTHY_TOKENS`].
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    TRUTHY_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(value))
}

/// Read-only query surface over generic options.
pub trait OptionsSource {
    /// Raw value of `name`, or `None` when the option is absent.
    ///
    /// An option set to the empty string is present.
    fn get(&self, name: &str) -> Option<&str>;

    /// Whether `name` is present at all.
    fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Boolean coercion; absent and unrecognised values are `false`.
    fn get_bool(&self, name: &str) -> bool {
        self.get(name).is_some_and(is_truthy)
    }
}

/// Ordered option set for one launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    values: IndexMap<String, String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `overrides` on top of `base`; later values win, first position is kept.
    pub fn layered<'a>(
        base: impl IntoIterator<Item = (&'a String, &'a String)>,
        overrides: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut values: IndexMap<String, String> = base
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        values.extend(overrides);
        Self { values }
    }

    /// Builder-style insert, for tests and fixed option sets.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl OptionsSource for Options {
    fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse a `name=value` assignment as given on the command line.
///
/// The value may be empty (`name=`) and may itself contain `=`.
pub fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("option name is empty in '{}'", arg));
    }
    Ok((name.to_string(), value.to_string()))
}
