mod check;
mod compile;

use anyhow::Result;
use clap::Subcommand;

use crate::args::GlobalArgs;
use crate::exit::Exit;

pub trait Command {
    fn execute(&self, args: &GlobalArgs) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum DcssCommand {
    /// Compile stylesheets to CSS
    Compile(self::compile::Compile),
    /// Report placeholder problems without writing any output
    Check(self::check::Check),
}

impl Command for DcssCommand {
    fn execute(&self, args: &GlobalArgs) -> Result<Exit> {
        match self {
            DcssCommand::Compile(cmd) => cmd.execute(args),
            DcssCommand::Check(cmd) => cmd.execute(args),
        }
    }
}
