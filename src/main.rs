use anyhow::Result;
use clap::Parser;
use tramax::{
    cli::{Cli, Commands},
    commands, db,
    types::{Config, OutputFmt},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let fmt = if cli.json {
        OutputFmt::Json
    } else {
        OutputFmt::Text
    };

    match cli.cmd {
        // Config never touches the database.
        Commands::Config(cmd) => commands::config::handle(cmd).await?,

        cmd => {
            let db_path = Config::load(&commands::config::config_path()?)?
                .map
                .get("db_path")
                .cloned()
                .unwrap_or_else(|| "./tramax.db".to_string());

            let pool = db::open(&db_path).await?;
            db::init(&pool).await?;

            match cmd {
                Commands::User(cmd) => commands::user::handle(cmd, &pool, fmt).await?,
                Commands::Profile(cmd) => commands::profile::handle(cmd, &pool, fmt).await?,
                Commands::Program(cmd) => commands::program::handle(cmd, &pool, fmt).await?,
                Commands::Status { user, date } => {
                    commands::status::handle(&pool, fmt, &user, date.as_deref()).await?
                }
                Commands::Complete { user, date } => {
                    commands::complete::handle(&pool, fmt, &user, date.as_deref()).await?
                }
                Commands::Exercise(cmd) => commands::exercise::handle(cmd, &pool, fmt).await?,
                Commands::Nutrition(cmd) => commands::nutrition::handle(cmd, &pool, fmt).await?,
                Commands::Calendar { user, year, month } => {
                    commands::calendar::handle(&pool, &user, year, month).await?
                }
                Commands::Config(_) => unreachable!(),
            }
        }
    }

    Ok(())
}
