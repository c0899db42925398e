//! Process collaborators: spawning the emulator and cleaning up stray instances.

use std::ffi::OsStr;

use anyhow::{Context, Result};
use sysinfo::{ProcessesToUpdate, System};

use crate::best_effort::BestEffort;
use crate::launch::LaunchSpec;

/// Spawns a launch spec and blocks until it exits.
pub trait ProcessRunner {
    /// Run `spec` to completion and return its exit code.
    fn run_and_wait(&self, spec: &LaunchSpec) -> Result<i32>;
}

/// Runs launch specs with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl ProcessRunner for CommandRunner {
    fn run_and_wait(&self, spec: &LaunchSpec) -> Result<i32> {
        tracing::info!("Launching {}", spec.command_line());
        let status = spec
            .to_command()
            .status()
            .with_context(|| format!("Failed to start {}", spec.executable.display()))?;
        // Killed by a signal: no code.
        Ok(status.code().unwrap_or(-1))
    }
}

/// Name-based process queries.
pub trait ProcessTable {
    /// Kill every process named `name`.
    fn kill_by_name(&self, name: &str) -> BestEffort;

    /// Wait for the first process named `name`; false if none was running.
    fn wait_for_name(&self, name: &str) -> bool;
}

/// [`ProcessTable`] over the live system process list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessTable;

impl SystemProcessTable {
    fn snapshot() -> System {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        system
    }
}

impl ProcessTable for SystemProcessTable {
    fn kill_by_name(&self, name: &str) -> BestEffort {
        let system = Self::snapshot();
        let mut failed = Vec::new();
        for process in system.processes_by_exact_name(OsStr::new(name)) {
            tracing::info!("Killing running {} (pid {})", name, process.pid());
            if !process.kill() {
                failed.push(process.pid().to_string());
            }
        }

        let result = if failed.is_empty() {
            Ok(())
        } else {
            Err(format!("could not kill pid {}", failed.join(", ")))
        };
        BestEffort::attempt(&format!("kill {}", name), result)
    }

    fn wait_for_name(&self, name: &str) -> bool {
        let system = Self::snapshot();
        let Some(process) = system.processes_by_exact_name(OsStr::new(name)).next() else {
            return false;
        };
        tracing::info!("Waiting for relaunched {} (pid {})", name, process.pid());
        let _ = process.wait();
        true
    }
}
