use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use sqlx::SqlitePool;

use crate::{models::User, storage};

pub mod calendar;
pub mod complete;
pub mod config;
pub mod exercise;
pub mod nutrition;
pub mod profile;
pub mod program;
pub mod status;
pub mod user;

/// Resolve a user selector, printing the standard error line when it
/// matches nobody.
pub(crate) async fn require_user(pool: &SqlitePool, selector: &str) -> Result<Option<User>> {
    let user = storage::resolve_user(pool, selector).await?;
    if user.is_none() {
        println!(
            "{} no user matching `{}` – register one with `user register`",
            "error:".red().bold(),
            selector
        );
    }
    Ok(user)
}

/// Parse an optional `--date YYYY-MM-DD` argument, defaulting to today.
pub(crate) fn parse_date_arg(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date `{}` – expected YYYY-MM-DD", s)),
        None => Ok(Local::now().date_naive()),
    }
}
