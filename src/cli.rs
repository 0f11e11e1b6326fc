use crate::command::ReleaseCommand;
use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(name = "relkit", about = "Release automation helpers")]
pub struct ReleaseCli {
    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: ReleaseCommand,
}

impl ReleaseCli {
    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
