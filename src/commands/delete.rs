//! `alcove delete`

use anyhow::Result;
use std::io;

use crate::Context;
use crate::bootstrap::Homebrew;
use crate::cli::DeleteArgs;
use crate::orchestrator::{Console, DeleteRequest, Orchestrator};
use crate::runner::SystemRunner;
use crate::sudo::SudoCredentialCache;

pub fn run(ctx: &Context, args: DeleteArgs) -> Result<()> {
    let runner = SystemRunner;
    let directory = userkit::default_backend();
    let bootstrap = Homebrew::new(&runner);
    let orchestrator = Orchestrator {
        settings: &ctx.settings,
        directory: &directory,
        runner: &runner,
        bootstrap: &bootstrap,
        credentials: &SudoCredentialCache,
    };

    let request = DeleteRequest {
        instances: args.instances,
        tty: ctx.tty,
    };

    let mut input = io::stdin().lock();
    let mut err = io::stderr();
    let mut console = Console {
        input: &mut input,
        err: &mut err,
    };
    let reports = orchestrator.delete(&request, &mut console)?;

    if !ctx.quiet {
        super::print_reports(&reports, "Deleted", "Not found");
    }
    Ok(())
}
