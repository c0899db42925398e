use crate::document::{ConfigDocument, KeyPath};
use crate::features::FeatureGate;
use crate::options::OptionsSource;

use super::{Binding, GuardChain};

/// One step of a document's synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Unconditional write.
    Set { target: KeyPath, value: String },
    /// Option binding with defaulting and coercion.
    Bind(Binding),
    /// Write only if the key is missing, empty or `""`.
    SetIfBlank { target: KeyPath, value: String },
    /// Multi-way conditional block.
    Guarded(GuardChain),
}

impl Rule {
    pub fn set(target: KeyPath, value: impl Into<String>) -> Self {
        Rule::Set {
            target,
            value: value.into(),
        }
    }

    pub fn set_if_blank(target: KeyPath, value: impl Into<String>) -> Self {
        Rule::SetIfBlank {
            target,
            value: value.into(),
        }
    }
}

impl From<Binding> for Rule {
    fn from(binding: Binding) -> Self {
        Rule::Bind(binding)
    }
}

impl From<GuardChain> for Rule {
    fn from(chain: GuardChain) -> Self {
        Rule::Guarded(chain)
    }
}

/// Read-only inputs of one synthesis pass.
#[derive(Clone, Copy)]
pub struct BindingContext<'a> {
    pub options: &'a dyn OptionsSource,
    pub features: &'a dyn FeatureGate,
}

impl<'a> BindingContext<'a> {
    pub fn new(options: &'a dyn OptionsSource, features: &'a dyn FeatureGate) -> Self {
        Self { options, features }
    }
}

/// What a synthesis pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    /// Keys written.
    pub written: usize,
    /// Rules that deliberately wrote nothing.
    pub skipped: usize,
}

impl std::ops::AddAssign for SynthesisReport {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.skipped += other.skipped;
    }
}

/// Apply `rules` to `doc` in order.
pub fn apply_rules<D>(doc: &mut D, rules: &[Rule], ctx: BindingContext<'_>) -> SynthesisReport
where
    D: ConfigDocument + ?Sized,
{
    let mut report = SynthesisReport::default();

    for rule in rules {
        match rule {
            Rule::Set { target, value } => {
                write(doc, target, value);
                report.written += 1;
            }
            Rule::Bind(binding) => {
                let value = binding.resolve(ctx.options, ctx.features);
                write(doc, &binding.target, &value);
                report.written += 1;
            }
            Rule::SetIfBlank { target, value } => {
                if is_blank(doc.value(target)) {
                    write(doc, target, value);
                    report.written += 1;
                } else {
                    report.skipped += 1;
                }
            }
            Rule::Guarded(chain) => match chain.select(ctx.options, ctx.features) {
                Some(selected) => report += apply_rules(doc, selected, ctx),
                None => {
                    tracing::debug!("{}: no branch selected, leaving keys untouched", chain.feature);
                    report.skipped += 1;
                }
            },
        }
    }

    report
}

fn write<D: ConfigDocument + ?Sized>(doc: &mut D, target: &KeyPath, value: &str) {
    tracing::debug!("{} = {}", target, value);
    doc.set_value(target, value);
}

fn is_blank(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let v = v.trim();
            v.is_empty() || v == "\"\""
        }
    }
}
