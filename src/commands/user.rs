use anyhow::Result;
use colored::Colorize;
use sqlx::SqlitePool;

use crate::{
    cli::UserCmd,
    storage,
    types::{OutputFmt, emit},
};

pub async fn handle(cmd: UserCmd, pool: &SqlitePool, fmt: OutputFmt) -> Result<()> {
    match cmd {
        UserCmd::Register { name, email } => {
            if name.trim().len() < 2 {
                println!(
                    "{} name must be at least 2 characters",
                    "error:".red().bold()
                );
                return Ok(());
            }

            if !email.contains('@') {
                println!("{} `{}` is not a valid email", "error:".red().bold(), email);
                return Ok(());
            }

            match storage::create_user(pool, name.trim(), &email).await {
                Ok(id) => println!(
                    "{} registered `{}` ({})",
                    "ok:".green().bold(),
                    name.trim(),
                    id
                ),
                Err(e) => {
                    if let Some(sqlx::Error::Database(db_err)) =
                        e.downcast_ref::<sqlx::Error>()
                    {
                        // 2067 = SQLITE_CONSTRAINT_UNIQUE
                        if db_err.code() == Some("2067".into()) {
                            println!(
                                "{} a user with email `{}` already exists",
                                "warning:".yellow().bold(),
                                email
                            );
                            return Ok(());
                        }
                    }
                    return Err(e);
                }
            }
        }

        UserCmd::List => {
            let users = storage::list_users(pool).await?;

            emit(fmt, &users, || {
                if users.is_empty() {
                    println!("{}", "  (no users registered)".dimmed());
                    return;
                }

                println!("{}", "Users:".cyan().bold());
                for (i, u) in users.iter().enumerate() {
                    let idx = format!("{}", i + 1).yellow();
                    let profile = match &u.profile {
                        Some(p) => format!("IMC {:.1}", p.bmi).dimmed().to_string(),
                        None => "no profile".dimmed().to_string(),
                    };
                    println!(" {} • {} <{}> {}", idx, u.name.bold(), u.email, profile);
                }
            });
        }
    }

    Ok(())
}
