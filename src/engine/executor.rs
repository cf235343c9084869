//! Execution engine - runs a command plan in order, stopping at the first failure

use colored::Colorize;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::runner::{RunError, Runner};

use super::step::Step;

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Show the plan and wait for the operator before running anything
    pub confirm: bool,
}

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("aborted: no confirmation received")]
    NoConfirmation,

    #[error("aborted while waiting for confirmation")]
    Prompt(#[source] io::Error),

    #[error("failed to run: {command_line}")]
    StepFailed {
        command_line: String,
        #[source]
        source: RunError,
    },
}

/// Execute `steps` strictly in order.
///
/// With `confirm`, the full plan is written to `err` and one line is read
/// from `input` before the first step. Reaching end of input, or any read
/// error, aborts without running anything.
///
/// The first failing step aborts the plan. Completed steps are not rolled
/// back; re-running the same command picks up from the current OS state.
pub fn execute(
    steps: &[Step],
    opts: &ExecuteOptions,
    runner: &dyn Runner,
    input: &mut dyn BufRead,
    err: &mut dyn Write,
) -> Result<(), ExecuteError> {
    if steps.is_empty() {
        return Ok(());
    }

    if opts.confirm {
        confirm_proceed(steps, input, err)?;
    }

    // Multi-step destructive runs always show progress
    let announce = opts.confirm && steps.len() > 1;

    for step in steps {
        let command_line = step.command_line();
        if announce {
            log::info!("Running command cmd={command_line}");
        } else {
            log::debug!("Running command cmd={command_line}");
        }

        if let Err(source) = runner.run(step) {
            return Err(ExecuteError::StepFailed {
                command_line,
                source,
            });
        }

        log::debug!("Completed command cmd={command_line}");
    }

    Ok(())
}

/// Render the plan and block until the operator presses return.
fn confirm_proceed(
    steps: &[Step],
    input: &mut dyn BufRead,
    err: &mut dyn Write,
) -> Result<(), ExecuteError> {
    render_plan(steps, err).map_err(ExecuteError::Prompt)?;

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Err(ExecuteError::NoConfirmation),
        Ok(_) => {
            writeln!(err, "{}", "CONTINUE".green()).map_err(ExecuteError::Prompt)?;
            Ok(())
        }
        Err(e) => Err(ExecuteError::Prompt(e)),
    }
}

fn render_plan(steps: &[Step], err: &mut dyn Write) -> io::Result<()> {
    writeln!(
        err,
        "{} The following commands will be executed:",
        "⚠".yellow()
    )?;
    for step in steps {
        writeln!(err, "  {}", step.command_line())?;
    }
    writeln!(
        err,
        "{} Press return to continue, or Ctrl-C to abort",
        "?".cyan().bold()
    )?;
    err.flush()
}
