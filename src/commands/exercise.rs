use std::{collections::BTreeSet, fs::read_to_string, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::{
    cli::ExerciseCmd,
    types::{ExerciseImport, OutputFmt, best_muscle_suggestion, canonical_muscle, emit},
};

#[derive(Serialize)]
struct ExJson {
    idx: i64,
    name: String,
    muscle_group: String,
    calories_per_minute: f64,
    description: String,
}

async fn insert_exercise(
    pool: &SqlitePool,
    name: &str,
    muscle: &str,
    calories: f64,
    desc: Option<&str>,
) -> std::result::Result<sqlx::sqlite::SqliteQueryResult, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO exercises
        (id, name, muscle_group, calories_per_minute, description, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
        "#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(name)
    .bind(muscle)
    .bind(calories)
    .bind(desc.unwrap_or_default())
    .execute(pool)
    .await
}

pub async fn handle(cmd: ExerciseCmd, pool: &SqlitePool, fmt: OutputFmt) -> Result<()> {
    match cmd {
        ExerciseCmd::Add {
            name,
            muscle,
            desc,
            calories,
        } => {
            let Some(muscle) = canonical_muscle(&muscle) else {
                match best_muscle_suggestion(&muscle) {
                    Some(sug) => println!(
                        "{} unknown muscle group `{}` – did you mean `{}`?",
                        "error:".red().bold(),
                        muscle,
                        sug.green()
                    ),
                    None => println!(
                        "{} unknown muscle group `{}`",
                        "error:".red().bold(),
                        muscle
                    ),
                }
                return Ok(());
            };

            match insert_exercise(pool, &name, &muscle, calories, desc.as_deref()).await {
                Ok(info) if info.rows_affected() == 1 => {
                    println!("{} exercise \"{}\" added", "ok:".green().bold(), &name)
                }
                Ok(_) => println!(
                    "{} exercise \"{}\" was not inserted",
                    "info:".blue().bold(),
                    &name
                ),
                Err(sqlx::Error::Database(db_err)) if db_err.code() == Some("2067".into()) => {
                    // 2067 = SQLITE_CONSTRAINT_UNIQUE
                    println!(
                        "{} exercise \"{}\" already exists — use `ex list` to view all exercises",
                        "warning:".yellow().bold(),
                        name
                    );
                }
                Err(e) => {
                    println!("{} {}", "error:".red().bold(), e.to_string().red());
                    return Err(e.into());
                }
            }
        }

        ExerciseCmd::Import { file } => {
            let path = Path::new(&file);
            let toml_str = read_to_string(path)
                .with_context(|| format!("Could not read file: `{}`", file))?;

            let import: ExerciseImport = toml::from_str(&toml_str)
                .context("Failed to parse TOML: Expected `[[exercise]]` entries")?;

            if import.exercise.is_empty() {
                println!(
                    "{}",
                    "warning: no [[exercise]] entries found".yellow().bold()
                );
                return Ok(());
            }

            let mut inserted = 0;
            let mut skipped = 0;
            let mut unknowns: BTreeSet<String> = BTreeSet::new();

            for ex in import.exercise {
                let Some(muscle) = canonical_muscle(&ex.primary_muscle) else {
                    if let Some(sug) = best_muscle_suggestion(&ex.primary_muscle) {
                        println!(
                            "{} `{}` skipped – unknown muscle `{}` – did you mean `{}`?",
                            "warning:".yellow().bold(),
                            ex.name,
                            ex.primary_muscle,
                            sug.green()
                        );
                    } else {
                        println!(
                            "{} `{}` skipped – unknown muscle `{}`",
                            "warning:".yellow().bold(),
                            ex.name,
                            ex.primary_muscle
                        );
                    }

                    skipped += 1;
                    unknowns.insert(ex.primary_muscle);
                    continue;
                };

                let calories = ex.calories_per_minute.unwrap_or(5.0);
                match insert_exercise(pool, &ex.name, &muscle, calories, ex.description.as_deref())
                    .await
                {
                    Ok(_) => inserted += 1,
                    Err(sqlx::Error::Database(db_err)) if db_err.code() == Some("2067".into()) => {
                        skipped += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            println!(
                "{} {} imported, {} skipped",
                "ok:".green().bold(),
                inserted,
                skipped
            );
            if !unknowns.is_empty() {
                println!(
                    "{} unknown muscle groups: {}",
                    "warning:".yellow().bold(),
                    unknowns.into_iter().collect::<Vec<_>>().join(", ")
                );
            }
        }

        ExerciseCmd::List { muscle } => {
            let query = match &muscle {
                Some(m) => sqlx::query(
                    r#"
                    SELECT ROW_NUMBER() OVER (ORDER BY name) AS idx,
                           name, muscle_group, calories_per_minute,
                           COALESCE(description,'') AS description
                    FROM   exercises
                    WHERE  muscle_group = ?
                    ORDER  BY idx
                    "#,
                )
                .bind(m.to_string()),
                None => sqlx::query(
                    r#"
                    SELECT ROW_NUMBER() OVER (ORDER BY name) AS idx,
                           name, muscle_group, calories_per_minute,
                           COALESCE(description,'') AS description
                    FROM   exercises
                    ORDER  BY idx
                    "#,
                ),
            };

            // A broken catalog read degrades to an empty listing.
            let rows = match query.fetch_all(pool).await {
                Ok(rows) => rows,
                Err(e) => {
                    println!(
                        "{} could not load exercises – showing none ({})",
                        "warning:".yellow().bold(),
                        e
                    );
                    Vec::new()
                }
            };

            let exercises: Vec<ExJson> = rows
                .iter()
                .map(|r| ExJson {
                    idx: r.get("idx"),
                    name: r.get("name"),
                    muscle_group: r.get("muscle_group"),
                    calories_per_minute: r.get("calories_per_minute"),
                    description: r.get("description"),
                })
                .collect();

            emit(fmt, &exercises, || {
                if exercises.is_empty() {
                    println!("{}", "  (no exercises found)".dimmed());
                    return;
                }

                println!("{}", "Exercises:".cyan().bold());
                for ex in &exercises {
                    let desc = if ex.description.is_empty() {
                        String::new()
                    } else {
                        format!("– {}", ex.description).dimmed().to_string()
                    };
                    let burn =
                        crate::utils::calories_burned(ex.calories_per_minute, 30.0);
                    println!(
                        " {} • {} [{}] {} {}",
                        format!("{:>2}", ex.idx).yellow(),
                        ex.name.bold(),
                        ex.muscle_group,
                        format!("≈{:.0} kcal / 30 min", burn).dimmed(),
                        desc
                    );
                }
            });
        }

        ExerciseCmd::Delete { exercise } => {
            let name: Option<String> = if let Ok(idx) = exercise.parse::<i64>() {
                sqlx::query_scalar(
                    r#"
                    SELECT name
                    FROM (
                      SELECT name, ROW_NUMBER() OVER (ORDER BY name) AS rn
                      FROM exercises
                    ) t
                    WHERE t.rn = ?
                    "#,
                )
                .bind(idx)
                .fetch_optional(pool)
                .await?
            } else {
                sqlx::query_scalar("SELECT name FROM exercises WHERE name = ?")
                    .bind(&exercise)
                    .fetch_optional(pool)
                    .await?
            };

            let Some(name) = name else {
                println!(
                    "{} no exercise matching `{}`",
                    "error:".red().bold(),
                    exercise
                );
                return Ok(());
            };

            sqlx::query("DELETE FROM exercises WHERE name = ?")
                .bind(&name)
                .execute(pool)
                .await?;

            println!("{} deleted `{}`", "ok:".green().bold(), name);
        }
    }

    Ok(())
}
