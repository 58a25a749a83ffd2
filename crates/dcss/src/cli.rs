use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::args::GlobalArgs;
use crate::commands::Command;
use crate::commands::DcssCommand;

/// Compile dynamic stylesheets.
#[derive(Parser)]
#[command(name = "dcss")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: DcssCommand,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Parse CLI arguments and execute the chosen command.
pub fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    // Settings errors are reported by the command itself.
    let debug = crate::project::resolve_project_root()
        .and_then(|root| crate::project::load_settings(&root))
        .is_ok_and(|settings| settings.debug());
    crate::logging::init_tracing(&cli.global, debug);

    let exit = cli.command.execute(&cli.global)?;
    Ok(exit.report())
}
