//! Emulator adapter core.
//!
//! Everything an emulator adapter needs between "the user picked a game" and
//! "spawn this process":
//!
//! - [`options`] and [`features`]: the read-only generic settings of one launch
//!   and the per-build feature gate.
//! - [`document`]: flat INI and hierarchical YML config backends with scoped,
//!   save-on-exit acquisition.
//! - [`binding`]: declarative rules mapping generic options onto document keys,
//!   evaluated by one interpreter for both document shapes.
//! - [`rom`]: archive extraction, disc-image priority selection, boot-file and
//!   playlist resolution.
//! - [`launch`]: launch spec assembly and the firmware-install branch.
//! - [`adapter`]: the per-emulator capability trait, its registry and the fixed
//!   orchestration order.
//!
//! Process spawning, overlays and shader injection are collaborators behind the
//! traits in [`process`] and [`hooks`].

pub mod adapter;
pub mod best_effort;
pub mod binding;
pub mod config;
pub mod document;
pub mod error;
pub mod features;
pub mod hooks;
pub mod launch;
pub mod options;
pub mod process;
pub mod rom;

pub use best_effort::BestEffort;
pub use error::LaunchError;
pub use features::{FeatureGate, FeatureSet};
pub use options::{Options, OptionsSource};
