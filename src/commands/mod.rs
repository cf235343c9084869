pub mod create;
pub mod delete;
pub mod list;

use colored::Colorize;

use crate::orchestrator::{InstanceReport, Outcome};
use crate::ui;

/// Print one line per instance after a lifecycle command.
fn print_reports(reports: &[InstanceReport], done: &str, skipped: &str) {
    for report in reports {
        let line = format!("{} ({})", report.instance, report.account.as_str().dimmed());
        match report.outcome {
            Outcome::Done => ui::success(&format!("{done} {line}")),
            Outcome::Skipped => ui::dim(&format!("{skipped} {line}")),
        }
    }
}
