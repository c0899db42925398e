//! Declarative option-to-document bindings.
//!
//! Adapters describe their config files as an ordered list of [`Rule`]s;
//! [`apply_rules`] interprets that list against either document shape. Rule
//! values depend only on the options, the feature gate and (for
//! [`Rule::SetIfBlank`]) the key's own prior value, so applying the same list
//! twice gives the same document.

mod apply;
mod guard;

pub use apply::{BindingContext, Rule, SynthesisReport, apply_rules};
pub use guard::{Guard, GuardChain};

use crate::document::KeyPath;
use crate::features::FeatureGate;
use crate::options::{OptionsSource, is_truthy};

/// How a raw option string becomes a document value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coercion {
    /// Written as given. An empty value counts as malformed.
    Raw,
    /// Truthy values write `on`, anything else writes `off`.
    Boolean { on: String, off: String },
    /// Lookup table from option token to document value.
    Enumerated(Vec<(String, String)>),
    /// Numeric passthrough.
    Slider,
}

impl Coercion {
    /// Coerce `raw`; `None` means the value is unusable and the default applies.
    pub fn coerce(&self, raw: &str) -> Option<String> {
        match self {
            Coercion::Raw => {
                if raw.trim().is_empty() {
                    None
                } else {
                    Some(raw.to_string())
                }
            }
            Coercion::Boolean { on, off } => {
                let value = if is_truthy(raw) { on } else { off };
                Some(value.clone())
            }
            Coercion::Enumerated(table) => {
                let token = raw.trim();
                table
                    .iter()
                    .find(|(from, _)| from == token)
                    .or_else(|| table.iter().find(|(from, _)| from.eq_ignore_ascii_case(token)))
                    .map(|(_, to)| to.clone())
            }
            Coercion::Slider => {
                let token = raw.trim();
                token.parse::<f64>().ok().map(|_| token.to_string())
            }
        }
    }
}

/// One generic option bound to one document key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub target: KeyPath,
    pub option: String,
    /// Written when the option is unusable, or absent on an unsupported build.
    pub default: String,
    /// Written when the option is absent on a supported build; `None` reuses `default`.
    pub fallback: Option<String>,
    pub coercion: Coercion,
}

impl Binding {
    /// Raw binding of `option` onto `target`.
    pub fn new(target: KeyPath, option: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            target,
            option: option.into(),
            default: default.into(),
            fallback: None,
            coercion: Coercion::Raw,
        }
    }

    pub fn fallback(mut self, value: impl Into<String>) -> Self {
        self.fallback = Some(value.into());
        self
    }

    pub fn boolean(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.coercion = Coercion::Boolean {
            on: on.into(),
            off: off.into(),
        };
        self
    }

    /// Enumerated coercion from `(token, value)` pairs.
    pub fn enumerated(mut self, table: &[(&str, &str)]) -> Self {
        self.coercion = Coercion::Enumerated(
            table
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        );
        self
    }

    pub fn slider(mut self) -> Self {
        self.coercion = Coercion::Slider;
        self
    }

    /// The value this binding writes.
    pub fn resolve(&self, options: &dyn OptionsSource, features: &dyn FeatureGate) -> String {
        match options.get(&self.option) {
            Some(raw) => self
                .coercion
                .coerce(raw)
                .unwrap_or_else(|| self.default.clone()),
            None if features.is_supported(&self.option) => self
                .fallback
                .clone()
                .unwrap_or_else(|| self.default.clone()),
            None => self.default.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;
    use crate::options::Options;

    fn discord() -> Binding {
        Binding::new(KeyPath::new(["Meta"], "useRichPresence"), "discord", "false")
            .fallback("true")
            .boolean("true", "false")
    }

    // ============================================================================
    // Boolean coercion
    // ============================================================================

    #[test]
    fn test_boolean_set_values() {
        let gate = FeatureSet::All;
        let on = Options::new().with("discord", "1");
        let off = Options::new().with("discord", "0");
        assert_eq!(discord().resolve(&on, &gate), "true");
        assert_eq!(discord().resolve(&off, &gate), "false");
    }

    #[test]
    fn test_absent_supported_writes_fallback() {
        assert_eq!(discord().resolve(&Options::new(), &FeatureSet::All), "true");
    }

    #[test]
    fn test_absent_unsupported_writes_default() {
        assert_eq!(discord().resolve(&Options::new(), &FeatureSet::none()), "false");
    }

    #[test]
    fn test_fallback_defaults_to_default() {
        let binding = Binding::new(KeyPath::root("aspect"), "redream_aspect", "4:3");
        assert_eq!(binding.resolve(&Options::new(), &FeatureSet::All), "4:3");
    }

    // ============================================================================
    // Enumerated / slider / raw
    // ============================================================================

    #[test]
    fn test_unknown_enumerated_token_uses_default() {
        let binding = Binding::new(KeyPath::root("region"), "redream_region", "japan")
            .enumerated(&[("japan", "japan"), ("usa", "usa"), ("europe", "europe")]);
        let gate = FeatureSet::All;

        let usa = Options::new().with("redream_region", "USA");
        let bogus = Options::new().with("redream_region", "mars");
        assert_eq!(binding.resolve(&usa, &gate), "usa");
        assert_eq!(binding.resolve(&bogus, &gate), "japan");
    }

    #[test]
    fn test_slider_requires_number() {
        let binding = Binding::new(KeyPath::root("res"), "redream_res", "2").slider();
        let gate = FeatureSet::All;
        assert_eq!(binding.resolve(&Options::new().with("redream_res", " 4 "), &gate), "4");
        assert_eq!(binding.resolve(&Options::new().with("redream_res", "max"), &gate), "2");
    }

    #[test]
    fn test_raw_empty_value_uses_default() {
        let binding = Binding::new(KeyPath::new(["Core"], "PPU Decoder"), "ppudecoder", "Recompiler (LLVM)");
        let gate = FeatureSet::none();
        assert_eq!(binding.resolve(&Options::new().with("ppudecoder", ""), &gate), "Recompiler (LLVM)");
        assert_eq!(
            binding.resolve(&Options::new().with("ppudecoder", "Interpreter (static)"), &gate),
            "Interpreter (static)"
        );
    }
}
