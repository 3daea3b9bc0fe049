use std::str::FromStr;

use anyhow::Result;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub type DB = SqlitePool;

pub async fn open(path: &str) -> Result<DB> {
    let opts = SqliteConnectOptions::from_str(path)?.create_if_missing(true);

    Ok(SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?)
}

/// Create the schema if this is a fresh database. Every statement is
/// idempotent, so running this on every startup is safe.
pub async fn init(pool: &DB) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id         TEXT PRIMARY KEY,
            name       TEXT NOT NULL,
            email      TEXT NOT NULL UNIQUE,
            age        INTEGER,
            weight_kg  REAL,
            height_cm  REAL,
            bmi        REAL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS programs (
            id                 TEXT PRIMARY KEY,
            user_id            TEXT NOT NULL REFERENCES users(id),
            name               TEXT NOT NULL,
            kind               TEXT NOT NULL,
            description        TEXT,
            difficulty         TEXT NOT NULL,
            duration           TEXT NOT NULL,
            frequency          TEXT NOT NULL,
            current_week       INTEGER NOT NULL,
            current_day        INTEGER NOT NULL,
            total_weeks        INTEGER NOT NULL,
            total_workouts     INTEGER NOT NULL,
            completed_workouts INTEGER NOT NULL,
            start_date         TEXT NOT NULL,
            last_workout_date  TEXT,
            is_active          INTEGER NOT NULL,
            is_paused          INTEGER NOT NULL,
            weeks              TEXT NOT NULL,
            created_at         TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exercises (
            id                  TEXT PRIMARY KEY,
            name                TEXT NOT NULL UNIQUE,
            muscle_group        TEXT NOT NULL,
            calories_per_minute REAL NOT NULL DEFAULT 5,
            description         TEXT,
            created_at          TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS foods (
            id                TEXT PRIMARY KEY,
            name              TEXT NOT NULL UNIQUE,
            calories_per_100g REAL NOT NULL,
            protein           REAL,
            carbs             REAL,
            fat               REAL,
            fiber             REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nutrition_logs (
            id        TEXT PRIMARY KEY,
            user_id   TEXT NOT NULL REFERENCES users(id),
            food_id   TEXT NOT NULL REFERENCES foods(id),
            meal_type TEXT NOT NULL,
            grams     REAL NOT NULL,
            calories  REAL NOT NULL,
            logged_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
