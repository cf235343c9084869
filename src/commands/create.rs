//! `alcove create`

use anyhow::Result;
use std::io;

use crate::Context;
use crate::bootstrap::Homebrew;
use crate::cli::CreateArgs;
use crate::orchestrator::{Console, CreateRequest, Orchestrator};
use crate::runner::SystemRunner;
use crate::sudo::SudoCredentialCache;

pub fn run(ctx: &Context, args: CreateArgs) -> Result<()> {
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

    let request = CreateRequest {
        instances: args.instances,
        name_flag: args.name,
        password: args.user_password,
        tty: ctx.tty,
        plain: ctx.plain,
        tools: args.tools,
        default_tools: args.default_tools,
    };

    let mut input = io::stdin().lock();
    let mut err = io::stderr();
    let mut console = Console {
        input: &mut input,
        err: &mut err,
    };
    let reports = orchestrator.create(&request, &mut console)?;

    if !ctx.quiet {
        super::print_reports(&reports, "Ready", "Unchanged");
    }
    Ok(())
}
