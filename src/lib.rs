#![doc = include_str!("../README.md")]

pub mod cli;
pub mod command;
pub mod error;
pub mod fs;
pub mod git;
pub mod manifest;
pub mod notes;
pub mod notify;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use command::ReleaseCommand;

    let cli = cli::ReleaseCli::parse();

    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_filter()),
    )
    .format_timestamp(None)
    .try_init();
    log::debug!("relkit {}", VERSION);

    match cli.command {
        ReleaseCommand::SetVersion(args) => command::set_version::execute(args),
        ReleaseCommand::NotifyIssues(args) => command::notify_issues::execute(args),
        ReleaseCommand::ReleaseNotes(args) => command::release_notes::execute(args),
    }
}
