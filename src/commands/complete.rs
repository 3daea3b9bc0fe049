use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use itertools::Itertools;
use sqlx::SqlitePool;

use crate::{
    commands::{parse_date_arg, require_user},
    errors::TrackerError,
    schedule, storage,
    types::OutputFmt,
    utils,
};

pub async fn handle(
    pool: &SqlitePool,
    _fmt: OutputFmt,
    user: &str,
    date: Option<&str>,
) -> Result<()> {
    let Some(user) = require_user(pool, user).await? else {
        return Ok(());
    };
    let today = parse_date_arg(date)?;

    let Some(mut program) = storage::find_active_program(pool, &user.id).await? else {
        println!(
            "{} no active program – create one with `program create`",
            "error:".red().bold()
        );
        return Ok(());
    };

    if program.is_paused {
        println!(
            "{} `{}` is paused – resume it before logging workouts",
            "warning:".yellow().bold(),
            program.name
        );
        return Ok(());
    }

    let already_done = matches!(
        schedule::resolve_training_day(&program, today),
        schedule::DayResolution::Training(day) if day.completed
    );

    match schedule::apply_completion(&mut program, today, Local::now()) {
        Ok(()) => {}
        Err(TrackerError::InvalidDay) => {
            println!(
                "{} {} is a rest day – nothing to complete",
                "warning:".yellow().bold(),
                today.format("%Y-%m-%d")
            );
            return Ok(());
        }
        Err(TrackerError::NotStarted) => {
            println!(
                "{} the program starts on {} – that day hasn't arrived yet",
                "warning:".yellow().bold(),
                program.start_date.format("%Y-%m-%d")
            );
            return Ok(());
        }
        Err(e @ TrackerError::NotFound { .. }) => {
            println!("{} {}", "error:".red().bold(), e);
            return Err(e.into());
        }
    }

    // A failed write must surface: silently dropping a completion would
    // corrupt the user's visible progress.
    storage::update_program(pool, &program).await?;

    let day = program
        .week(program.current_week)
        .and_then(|w| w.day(program.current_day));

    if let Some(day) = day {
        let groups = day.muscle_groups.iter().join(", ");
        if already_done {
            println!(
                "{} {} was already completed – timestamp refreshed",
                "info:".blue().bold(),
                day.day_name
            );
        } else {
            println!(
                "{} {} completado – {}",
                "ok:".green().bold(),
                day.day_name.bold(),
                groups
            );
        }
    }

    println!(
        "  {} {}/{} ({}%)",
        "rutina:".dimmed(),
        program.completed_workouts,
        program.total_workouts,
        utils::percentage(program.completed_workouts, program.total_workouts)
    );

    Ok(())
}
