mod bootstrap;
mod cli;
mod commands;
mod config;
mod engine;
mod grant;
mod instance;
mod orchestrator;
mod password;
mod runner;
mod sudo;
#[cfg(test)]
mod testing;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Settings;
use std::io;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    pub tty: bool,
    pub plain: bool,
    pub settings: Settings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Lifecycle records are info, so they show without -v
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "alcove", &mut io::stdout());
        return Ok(());
    }

    let ctx = Context {
        quiet: cli.quiet,
        tty: cli.tty(),
        plain: cli.plain,
        settings: Settings::from_args(&cli.settings)?,
    };

    match cli.command {
        Command::Create(args) => commands::create::run(&ctx, args),
        Command::Delete(args) => commands::delete::run(&ctx, args),
        Command::List { json } => commands::list::run(&ctx, json),
        Command::Completions { .. } => Ok(()),
    }
}
