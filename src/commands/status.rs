use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    commands::{parse_date_arg, require_user},
    models::{DayStatus, TodayStatus, WorkoutStats},
    schedule, storage,
    types::{OutputFmt, emit},
    utils,
};

#[derive(Serialize)]
struct StatusJson {
    program: Option<String>,
    is_paused: bool,
    today: TodayStatus,
    week_history: Vec<DayStatus>,
    stats: WorkoutStats,
}

fn print_history_strip(history: &[DayStatus]) {
    let strip = history
        .iter()
        .map(|d| {
            if !d.has_workout {
                d.day.dimmed().to_string()
            } else if d.completed {
                d.day.green().bold().to_string()
            } else {
                d.day.red().to_string()
            }
        })
        .join(" ");

    println!("  {}  {}", "últimos 7 días:".dimmed(), strip);
}

pub async fn handle(
    pool: &SqlitePool,
    fmt: OutputFmt,
    user: &str,
    date: Option<&str>,
) -> Result<()> {
    let Some(user) = require_user(pool, user).await? else {
        return Ok(());
    };
    let today = parse_date_arg(date)?;

    // Read failures degrade to "no program" instead of surfacing; a broken
    // dashboard read should never look like lost data to the user.
    let program = match storage::find_active_program(pool, &user.id).await {
        Ok(p) => p,
        Err(e) => {
            println!(
                "{} could not load the active program – showing empty status ({})",
                "warning:".yellow().bold(),
                e
            );
            None
        }
    };

    let Some(program) = program else {
        let payload = StatusJson {
            program: None,
            is_paused: false,
            today: TodayStatus::absent(),
            week_history: Vec::new(),
            stats: WorkoutStats {
                total_workouts: 0,
                completed_workouts: 0,
                current_streak: 0,
                week_progress: 0,
            },
        };
        emit(fmt, &payload, || {
            println!(
                "{} no active program – create one with `program create`",
                "info:".blue().bold()
            );
        });
        return Ok(());
    };

    let today_status = schedule::derive_today(&program, today);
    let week_history = schedule::derive_week_history(&program, today);
    let stats = schedule::derive_stats(&program, today);

    let payload = StatusJson {
        program: Some(program.name.clone()),
        is_paused: program.is_paused,
        today: today_status,
        week_history,
        stats,
    };

    emit(fmt, &payload, || {
        println!("{}", program.name.cyan().bold());
        if program.is_paused {
            println!("{} this program is paused", "warning:".yellow().bold());
        }

        let today_status = &payload.today;
        if today_status.is_rest_day {
            println!(
                "  {} {} – día de descanso",
                "hoy:".bold(),
                today_status.day_name
            );
        } else if !today_status.has_workout {
            println!(
                "  {} {} – sin entrenamiento programado",
                "hoy:".bold(),
                today_status.day_name
            );
        } else {
            let groups = today_status.muscle_groups.iter().join(", ");
            let done = if today_status.completed {
                "✓ completado".green().to_string()
            } else {
                "pendiente".yellow().to_string()
            };
            println!(
                "  {} {} – {} ({} ejercicios) {}",
                "hoy:".bold(),
                today_status.day_name,
                groups.bold(),
                today_status.exercises_count,
                done
            );
            if let Some(cardio) = &today_status.cardio {
                println!(
                    "       cardio {} ({})",
                    cardio.kind.to_lowercase(),
                    cardio.duration
                );
            }
        }

        print_history_strip(&payload.week_history);

        println!(
            "  {}  {} días",
            "racha actual:".dimmed(),
            payload.stats.current_streak.to_string().bold()
        );
        println!(
            "  {}  {}%",
            "progreso semanal:".dimmed(),
            payload.stats.week_progress
        );
        println!(
            "  {}  {}/{} ({}%)",
            "rutina:".dimmed(),
            payload.stats.completed_workouts,
            payload.stats.total_workouts,
            utils::percentage(payload.stats.completed_workouts, payload.stats.total_workouts)
        );

        if let Some(last) = program.last_workout_date {
            let elapsed = Local::now() - last;
            if elapsed.num_minutes() >= 0 {
                println!(
                    "  {}  hace {}",
                    "último entrenamiento:".dimmed(),
                    utils::format_duration(elapsed)
                );
            }
        }
    });

    Ok(())
}
