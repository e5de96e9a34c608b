use clap::{Args, Subcommand};

mod check;
mod init;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Wait for the database and create the productos table if missing
    Init(init::InitArgs),

    /// Check that the database accepts queries
    Check(check::CheckArgs),
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    match command.command {
        DbSubcommand::Init(args) => init::run(args).await,
        DbSubcommand::Check(args) => check::run(args).await,
    }
}
