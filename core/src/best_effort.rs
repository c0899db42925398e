//! Attempt-and-continue results.
//!
//! Some side effects (killing a stale emulator instance, creating a save
//! directory, marking an extraction in use) must never abort a launch. They
//! return a [`BestEffort`] so callers and tests can still see what happened.

use std::fmt::Display;

/// Outcome of an operation whose failure is logged and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort {
    /// The operation completed.
    Done,
    /// The operation failed; the launch continues.
    Failed(String),
}

impl BestEffort {
    /// Collapse a fallible result, logging the failure at `warn`.
    pub fn attempt<E: Display>(what: &str, result: Result<(), E>) -> Self {
        match result {
            Ok(()) => BestEffort::Done,
            Err(e) => {
                tracing::warn!("{} failed (ignored): {}", what, e);
                BestEffort::Failed(format!("{what}: {e}"))
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, BestEffort::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_ok_is_done() {
        let outcome = BestEffort::attempt::<std::io::Error>("create dir", Ok(()));
        assert!(outcome.is_done());
    }

    #[test]
    fn test_attempt_err_is_swallowed() {
        let outcome = BestEffort::attempt("kill rpcs3", Err("access denied"));
        assert_eq!(
            outcome,
            BestEffort::Failed("kill rpcs3: access denied".to_string())
        );
    }
}
