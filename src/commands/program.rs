use anyhow::Result;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    cli::{CreateArgs, ProgramCmd},
    commands::require_user,
    models::Program,
    plan, storage,
    types::{OutputFmt, ProgramKind, emit},
};

#[derive(Serialize)]
struct ProgJson {
    idx: usize,
    name: String,
    kind: String,
    progress: u32,
    completed_workouts: u32,
    total_workouts: u32,
    is_active: bool,
    is_paused: bool,
    started: String,
}

fn pretty_print(progs: &[ProgJson]) {
    if progs.is_empty() {
        println!("{}", "  (no programs found)".dimmed());
        return;
    }

    println!("{}", "Programs:".cyan().bold());
    for p in progs {
        let idx = format!("{}", p.idx).yellow();
        let state = if !p.is_active {
            "archived".dimmed().to_string()
        } else if p.is_paused {
            "paused".yellow().to_string()
        } else {
            "active".green().to_string()
        };
        println!(
            " {} • {} [{}] {} {} {}",
            idx,
            p.name.bold(),
            state,
            format!("{}%", p.progress).bold(),
            format!("({}/{})", p.completed_workouts, p.total_workouts).dimmed(),
            format!("started {}", p.started).dimmed()
        );
    }
}

async fn load_active(pool: &SqlitePool, owner_id: &str) -> Result<Option<Program>> {
    let program = storage::find_active_program(pool, owner_id).await?;
    if program.is_none() {
        println!(
            "{} no active program – create one with `program create`",
            "error:".red().bold()
        );
    }
    Ok(program)
}

pub async fn handle(cmd: ProgramCmd, pool: &SqlitePool, fmt: OutputFmt) -> Result<()> {
    match cmd {
        ProgramCmd::Create(CreateArgs { user, kind, name }) => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };

            if storage::find_active_program(pool, &user.id).await?.is_some() {
                println!(
                    "{} `{}` already has an active program – complete or deactivate it first",
                    "warning:".yellow().bold(),
                    user.name
                );
                return Ok(());
            }

            let program = match kind {
                ProgramKind::Template => plan::generate(&user.id, &user.name),
                ProgramKind::Custom => plan::custom_shell(&user.id, &user.name, name),
            };

            storage::insert_program(pool, &program).await?;

            println!(
                "{} `{}` – {} weeks, {} workouts",
                "ok:".green().bold(),
                program.name,
                program.total_weeks,
                program.total_workouts
            );
        }

        ProgramCmd::List { user } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };

            let programs = storage::list_programs(pool, &user.id).await?;
            let progs: Vec<ProgJson> = programs
                .iter()
                .enumerate()
                .map(|(i, p)| ProgJson {
                    idx: i + 1,
                    name: p.name.clone(),
                    kind: p.kind.to_string(),
                    progress: p.progress_percentage(),
                    completed_workouts: p.completed_workouts,
                    total_workouts: p.total_workouts,
                    is_active: p.is_active,
                    is_paused: p.is_paused,
                    started: p.start_date.format("%Y-%m-%d").to_string(),
                })
                .collect();

            emit(fmt, &progs, || pretty_print(&progs));
        }

        ProgramCmd::Show { user } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };
            let Some(program) = load_active(pool, &user.id).await? else {
                return Ok(());
            };

            emit(fmt, &program, || {
                println!("{}", program.name.cyan().bold());
                if let Some(desc) = &program.description {
                    println!("{}", desc.dimmed());
                }
                println!(
                    "{} • {} • {}",
                    program.difficulty, program.duration, program.frequency
                );
                println!(
                    "progress: {} ({}/{})\n",
                    format!("{}%", program.progress_percentage()).bold(),
                    program.completed_workouts,
                    program.total_workouts
                );

                for week in &program.weeks {
                    let marker = if week.completed { "✓".green().to_string() } else { String::new() };
                    println!("{} {}", format!("Semana {}", week.week_number).bold(), marker);

                    for (i, day) in week.days.iter().enumerate() {
                        let connector = if i + 1 == week.days.len() { "└─" } else { "├─" };
                        let groups = day.muscle_groups.iter().join(", ");
                        let done = if day.completed {
                            "✓".green().to_string()
                        } else {
                            "·".dimmed().to_string()
                        };
                        println!(" {} {} {} — {}", connector, done, day.day_name.bold(), groups);

                        for ex in &day.exercises {
                            println!(
                                "      {} {}x{} ({}s)",
                                ex.name,
                                ex.sets,
                                ex.reps,
                                ex.rest_time
                            );
                        }
                        println!(
                            "      {} {} ({})",
                            "cardio:".dimmed(),
                            day.cardio.kind,
                            day.cardio.duration
                        );
                    }
                }
            });
        }

        ProgramCmd::Pause { user } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };
            let Some(mut program) = load_active(pool, &user.id).await? else {
                return Ok(());
            };

            if program.is_paused {
                println!("{} `{}` is already paused", "warning:".yellow().bold(), program.name);
                return Ok(());
            }

            program.is_paused = true;
            storage::update_program(pool, &program).await?;
            println!("{} paused `{}`", "ok:".green().bold(), program.name);
        }

        ProgramCmd::Resume { user } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };
            let Some(mut program) = load_active(pool, &user.id).await? else {
                return Ok(());
            };

            if !program.is_paused {
                println!("{} `{}` is not paused", "warning:".yellow().bold(), program.name);
                return Ok(());
            }

            program.is_paused = false;
            storage::update_program(pool, &program).await?;
            println!("{} resumed `{}`", "ok:".green().bold(), program.name);
        }

        ProgramCmd::Deactivate { user } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };
            let Some(mut program) = load_active(pool, &user.id).await? else {
                return Ok(());
            };

            program.is_active = false;
            storage::update_program(pool, &program).await?;
            println!(
                "{} archived `{}` – progress is kept, nothing is deleted",
                "ok:".green().bold(),
                program.name
            );
        }
    }

    Ok(())
}
