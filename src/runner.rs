use anyhow::{Context, Result};
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

use crate::engine::Step;

/// Why a step did not complete.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to launch {program}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Exit(ExitStatus),
}

/// Runs command plan steps against the OS.
///
/// The executor only talks to this trait, so tests can substitute a
/// recording implementation.
pub trait Runner {
    /// Run a step with the terminal attached. Non-zero exit is an error.
    fn run(&self, step: &Step) -> Result<(), RunError>;

    /// Run a step silently and report whether it exited zero.
    ///
    /// Only a launch failure is an error.
    fn probe(&self, step: &Step) -> Result<bool, RunError>;
}

/// [`Runner`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, step: &Step) -> Result<(), RunError> {
        let status = Command::new(&step.program)
            .args(&step.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| RunError::Launch {
                program: step.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::Exit(status))
        }
    }

    fn probe(&self, step: &Step) -> Result<bool, RunError> {
        Command::new(&step.program)
            .args(&step.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .map_err(|source| RunError::Launch {
                program: step.program.clone(),
                source,
            })
    }
}

/// Run a command and capture output
pub fn run_capture(cmd: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Command failed: {}", stderr.trim())
    }
}
