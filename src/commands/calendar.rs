use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use sqlx::SqlitePool;

use crate::{
    commands::require_user,
    schedule::{self, DayResolution},
    storage,
};

pub async fn handle(
    pool: &SqlitePool,
    user: &str,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let Some(user) = require_user(pool, user).await? else {
        return Ok(());
    };

    // Get current date if year/month not specified
    let now = chrono::Local::now();
    let year = year.unwrap_or(now.year());
    let month = month.unwrap_or(now.month());

    if !(1..=12).contains(&month) {
        println!("{} month must be between 1 and 12", "error:".red().bold());
        return Ok(());
    }

    let Some(program) = storage::find_active_program(pool, &user.id).await? else {
        println!(
            "{} no active program – create one with `program create`",
            "error:".red().bold()
        );
        return Ok(());
    };

    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        println!("{} invalid month", "error:".red().bold());
        return Ok(());
    };
    let last_day = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .and_then(|d| d.pred_opt())
    .unwrap_or(first_day);

    // Print calendar header
    let month_name = first_day.format("%B %Y").to_string();
    println!("\n{}", month_name.bold().cyan());
    println!("{}", "Su Mo Tu We Th Fr Sa".dimmed());

    // Day of week for the first day (0 = Sunday)
    let first_weekday = first_day.weekday().num_days_from_sunday() as usize;
    print!("{}", "   ".repeat(first_weekday));

    let mut planned = 0u32;
    let mut completed = 0u32;

    for day in 1..=last_day.day() {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(first_day);

        match schedule::resolve_training_day(&program, date) {
            DayResolution::Training(d) if d.completed => {
                completed += 1;
                planned += 1;
                print!("{:>2} ", day.to_string().green().bold());
            }
            DayResolution::Training(_) => {
                planned += 1;
                print!("{:>2} ", day);
            }
            // Rest days and out-of-range days are dimmed.
            _ => print!("{:>2} ", day.to_string().dimmed()),
        }

        // New line at end of week
        if (first_weekday + day as usize) % 7 == 0 {
            println!();
        }
    }
    println!("\n");

    println!(
        "{} {} of {} training days completed",
        "info:".blue().bold(),
        completed,
        planned
    );

    Ok(())
}
