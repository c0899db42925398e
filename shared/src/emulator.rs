//! Emulator identifiers.
//!
//! Every emulator the launcher knows how to drive has one `EmulatorId`. The
//! frontend passes free-form emulator names (`rpcs3`, `rpcs3-nightly`, ...);
//! [`EmulatorId::from_emulator_name`] folds those variants onto the base id.

use std::fmt;
use std::str::FromStr;

/// Known emulator identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmulatorId {
    /// Redream (Sega Dreamcast)
    Redream,
    /// RPCS3 (Sony PlayStation 3)
    Rpcs3,
}

/// Error returned when an emulator name does not match any known id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emulator '{0}'")]
pub struct UnknownEmulator(pub String);

impl EmulatorId {
    /// All known emulators, in registration order.
    pub const ALL: [EmulatorId; 2] = [EmulatorId::Redream, EmulatorId::Rpcs3];

    /// Canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmulatorId::Redream => "redream",
            EmulatorId::Rpcs3 => "rpcs3",
        }
    }

    /// Executable file stem, without platform suffix.
    pub fn binary_name(&self) -> &'static str {
        match self {
            EmulatorId::Redream => "redream",
            EmulatorId::Rpcs3 => "rpcs3",
        }
    }

    /// Executable file name for the current platform.
    pub fn executable_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.binary_name())
        } else {
            self.binary_name().to_string()
        }
    }

    /// Resolve a frontend emulator name, accepting `<id>-<variant>` spellings.
    ///
    /// Matching is case-sensitive, like the frontend's own identifiers.
    pub fn from_emulator_name(name: &str) -> Option<Self> {
        if let Ok(id) = name.parse() {
            return Some(id);
        }
        Self::ALL.into_iter().find(|id| {
            name.strip_prefix(id.as_str())
                .is_some_and(|rest| rest.starts_with('-') || rest.starts_with('_'))
        })
    }
}

impl FromStr for EmulatorId {
    type Err = UnknownEmulator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redream" => Ok(EmulatorId::Redream),
            "rpcs3" => Ok(EmulatorId::Rpcs3),
            _ => Err(UnknownEmulator(s.to_string())),
        }
    }
}

impl fmt::Display for EmulatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
