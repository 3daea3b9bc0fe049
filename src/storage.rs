use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use crate::{
    models::{Profile, Program, User, Week},
    types::ProgramKind,
};

//
// Users
//

pub async fn create_user(pool: &SqlitePool, name: &str, email: &str) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, created_at)
        VALUES (?1, ?2, ?3, datetime('now'))
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(email.to_lowercase())
    .execute(pool)
    .await?;

    Ok(id)
}

fn row_to_user(row: &SqliteRow) -> User {
    let age: Option<i64> = row.get("age");
    let weight_kg: Option<f64> = row.get("weight_kg");
    let height_cm: Option<f64> = row.get("height_cm");
    let bmi: Option<f64> = row.get("bmi");

    let profile = match (age, weight_kg, height_cm, bmi) {
        (Some(age), Some(weight_kg), Some(height_cm), Some(bmi)) => Some(Profile {
            age: age as u32,
            weight_kg,
            height_cm,
            bmi,
        }),
        _ => None,
    };

    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        profile,
        created_at: row.get("created_at"),
    }
}

/// Look a user up by list index (from `user list`), exact name or email.
pub async fn resolve_user(pool: &SqlitePool, selector: &str) -> Result<Option<User>> {
    let row = if let Ok(idx) = selector.parse::<i64>() {
        sqlx::query(
            r#"
            SELECT *
            FROM (
              SELECT *, ROW_NUMBER() OVER (ORDER BY created_at) AS rn
              FROM users
            ) t
            WHERE t.rn = ?
            "#,
        )
        .bind(idx)
        .fetch_optional(pool)
        .await?
    } else {
        // Emails are stored lowercased; names match exactly.
        sqlx::query("SELECT * FROM users WHERE email = lower(?1) OR name = ?1")
            .bind(selector)
            .fetch_optional(pool)
            .await?
    };

    Ok(row.as_ref().map(row_to_user))
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT * FROM users ORDER BY created_at")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(row_to_user).collect())
}

/// Write body metrics; the stored BMI is always recomputed here, callers
/// cannot set it directly.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    age: u32,
    weight_kg: f64,
    height_cm: f64,
) -> Result<Profile> {
    let bmi = crate::utils::bmi(weight_kg, height_cm);

    sqlx::query(
        r#"
        UPDATE users
        SET age = ?2, weight_kg = ?3, height_cm = ?4, bmi = ?5
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .bind(i64::from(age))
    .bind(weight_kg)
    .bind(height_cm)
    .bind(bmi)
    .execute(pool)
    .await?;

    Ok(Profile {
        age,
        weight_kg,
        height_cm,
        bmi,
    })
}

//
// Programs
//
// Program documents keep their nested weeks/days/exercises tree as a JSON
// column; the scalar fields callers filter and list on are broken out into
// real columns.
//

fn kind_to_str(kind: ProgramKind) -> &'static str {
    match kind {
        ProgramKind::Template => "template",
        ProgramKind::Custom => "custom",
    }
}

fn parse_kind(s: &str) -> ProgramKind {
    match s {
        "custom" => ProgramKind::Custom,
        _ => ProgramKind::Template,
    }
}

fn parse_local(s: &str) -> Result<DateTime<Local>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid stored timestamp `{}`", s))?
        .with_timezone(&Local))
}

fn row_to_program(row: &SqliteRow) -> Result<Program> {
    let weeks_json: String = row.get("weeks");
    let weeks: Vec<Week> =
        serde_json::from_str(&weeks_json).context("invalid stored program document")?;

    let last_workout_date: Option<String> = row.get("last_workout_date");
    let kind: String = row.get("kind");

    Ok(Program {
        id: row.get("id"),
        owner_id: row.get("user_id"),
        name: row.get("name"),
        kind: parse_kind(&kind),
        description: row.get("description"),
        difficulty: row.get("difficulty"),
        duration: row.get("duration"),
        frequency: row.get("frequency"),
        current_week: row.get::<i64, _>("current_week") as u32,
        current_day: row.get::<i64, _>("current_day") as u32,
        total_weeks: row.get::<i64, _>("total_weeks") as u32,
        weeks,
        total_workouts: row.get::<i64, _>("total_workouts") as u32,
        completed_workouts: row.get::<i64, _>("completed_workouts") as u32,
        start_date: parse_local(row.get("start_date"))?,
        last_workout_date: last_workout_date.as_deref().map(parse_local).transpose()?,
        is_active: row.get::<i64, _>("is_active") != 0,
        is_paused: row.get::<i64, _>("is_paused") != 0,
    })
}

/// Persist a new program document. At most one active program per user is
/// enforced here, at the storage boundary.
pub async fn insert_program(pool: &SqlitePool, program: &Program) -> Result<()> {
    if program.is_active {
        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM programs WHERE user_id = ? AND is_active = 1")
                .bind(&program.owner_id)
                .fetch_optional(pool)
                .await?;

        if existing.is_some() {
            bail!("user already has an active program – pause or deactivate it first");
        }
    }

    let weeks_json = serde_json::to_string(&program.weeks)?;

    sqlx::query(
        r#"
        INSERT INTO programs
          (id, user_id, name, kind, description, difficulty, duration, frequency,
           current_week, current_day, total_weeks, total_workouts, completed_workouts,
           start_date, last_workout_date, is_active, is_paused, weeks, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18,
                datetime('now'))
        "#,
    )
    .bind(&program.id)
    .bind(&program.owner_id)
    .bind(&program.name)
    .bind(kind_to_str(program.kind))
    .bind(program.description.as_deref())
    .bind(&program.difficulty)
    .bind(&program.duration)
    .bind(&program.frequency)
    .bind(i64::from(program.current_week))
    .bind(i64::from(program.current_day))
    .bind(i64::from(program.total_weeks))
    .bind(i64::from(program.total_workouts))
    .bind(i64::from(program.completed_workouts))
    .bind(program.start_date.to_rfc3339())
    .bind(program.last_workout_date.map(|d| d.to_rfc3339()))
    .bind(i64::from(program.is_active))
    .bind(i64::from(program.is_paused))
    .bind(weeks_json)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_active_program(pool: &SqlitePool, owner_id: &str) -> Result<Option<Program>> {
    let row = sqlx::query("SELECT * FROM programs WHERE user_id = ? AND is_active = 1")
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_program).transpose()
}

/// All of a user's programs, newest first.
pub async fn list_programs(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Program>> {
    let rows = sqlx::query("SELECT * FROM programs WHERE user_id = ? ORDER BY created_at DESC")
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_program).collect()
}

/// Write back a mutated program: the weeks document, the recomputed
/// counters, the display cursor and the lifecycle flags. `start_date` is
/// immutable and deliberately not part of this statement.
pub async fn update_program(pool: &SqlitePool, program: &Program) -> Result<()> {
    let weeks_json = serde_json::to_string(&program.weeks)?;

    let result = sqlx::query(
        r#"
        UPDATE programs
        SET weeks = ?2,
            total_workouts = ?3,
            completed_workouts = ?4,
            current_week = ?5,
            current_day = ?6,
            last_workout_date = ?7,
            is_active = ?8,
            is_paused = ?9
        WHERE id = ?1
        "#,
    )
    .bind(&program.id)
    .bind(weeks_json)
    .bind(i64::from(program.total_workouts))
    .bind(i64::from(program.completed_workouts))
    .bind(i64::from(program.current_week))
    .bind(i64::from(program.current_day))
    .bind(program.last_workout_date.map(|d| d.to_rfc3339()))
    .bind(i64::from(program.is_active))
    .bind(i64::from(program.is_paused))
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        bail!("program `{}` no longer exists", program.id);
    }

    Ok(())
}
