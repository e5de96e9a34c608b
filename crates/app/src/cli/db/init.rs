use clap::Args;
use stockroom_app::{config::DatabaseConfig, database};

#[derive(Debug, Args)]
pub(crate) struct InitArgs {
    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: InitArgs) -> Result<(), String> {
    let pool = database::connect_with_retry(&args.database.settings())
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::ensure_schema(&pool)
        .await
        .map_err(|error| format!("failed to create productos table: {error}"))?;

    #[expect(
        clippy::print_stdout,
        reason = "the CLI reports its result on stdout"
    )]
    {
        println!("productos table ready in {}", args.database.db_name);
    }

    Ok(())
}
