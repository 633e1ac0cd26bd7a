//! `link-dotfiles` binary entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use link_dotfiles::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command = match &args.command {
        cli::Command::Setup(_) => "setup",
        cli::Command::Show => "show",
        cli::Command::Version => {
            commands::version::run();
            return Ok(());
        }
    };
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    match args.command {
        cli::Command::Setup(opts) => commands::setup::run(&args.global, &opts, &log),
        cli::Command::Show => commands::show::run(&args.global, &log),
        cli::Command::Version => Ok(()),
    }
}
