//! Stockroom operator CLI

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = cli.run().await {
        #[expect(
            clippy::print_stderr,
            reason = "command failures are reported to the operator's terminal"
        )]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}
