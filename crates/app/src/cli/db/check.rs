use clap::Args;
use stockroom_app::{config::DatabaseConfig, database};

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: CheckArgs) -> Result<(), String> {
    // Single attempt; callers poll this command themselves.
    let pool = database::connect(&args.database.settings())
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::ping(&pool)
        .await
        .map_err(|error| format!("database did not answer: {error}"))?;

    #[expect(
        clippy::print_stdout,
        reason = "the CLI reports its result on stdout"
    )]
    {
        println!("database {} is reachable", args.database.db_name);
    }

    Ok(())
}
