use std::str::FromStr;

use chrono::{Local, NaiveDate, TimeZone};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tramax::{db, plan, schedule, storage, types::Reps, utils};

/// A single-connection in-memory pool: more connections would each see
/// their own empty database.
async fn test_pool() -> SqlitePool {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();

    db::init(&pool).await.unwrap();
    pool
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Generate a program for `owner` anchored to Monday 2025-06-02.
fn program_for(owner: &str) -> tramax::models::Program {
    let mut program = plan::generate(owner, "Ana");
    program.start_date = Local.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
    program
}

#[tokio::test]
async fn generate_persist_and_reload() {
    let pool = test_pool().await;
    let owner = storage::create_user(&pool, "Ana", "ana@example.com")
        .await
        .unwrap();

    let program = program_for(&owner);
    storage::insert_program(&pool, &program).await.unwrap();

    let loaded = storage::find_active_program(&pool, &owner)
        .await
        .unwrap()
        .expect("active program should exist");

    assert_eq!(loaded.id, program.id);
    assert_eq!(loaded.total_weeks, 4);
    assert_eq!(loaded.weeks.len(), 4);
    assert_eq!(loaded.total_workouts, 20);
    assert_eq!(loaded.completed_workouts, 0);
    assert!(loaded.is_active);
    assert!(!loaded.is_paused);
    assert_eq!(loaded.start_date, program.start_date);

    // The nested document survives the JSON column, "al fallo" included.
    let legs = loaded.week(1).unwrap().day(2).unwrap();
    assert_eq!(legs.exercises[1].reps, Reps::ToFailure);
    assert_eq!(legs.exercises[0].reps, Reps::Count(12));
    assert_eq!(legs.muscle_groups, vec!["PIERNAS"]);
}

#[tokio::test]
async fn a_second_active_program_is_refused() {
    let pool = test_pool().await;
    let owner = storage::create_user(&pool, "Ana", "ana@example.com")
        .await
        .unwrap();

    storage::insert_program(&pool, &program_for(&owner))
        .await
        .unwrap();

    let err = storage::insert_program(&pool, &program_for(&owner))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("active program"));
}

#[tokio::test]
async fn deactivating_allows_a_new_program() {
    let pool = test_pool().await;
    let owner = storage::create_user(&pool, "Ana", "ana@example.com")
        .await
        .unwrap();

    let mut first = program_for(&owner);
    storage::insert_program(&pool, &first).await.unwrap();

    first.is_active = false;
    storage::update_program(&pool, &first).await.unwrap();

    storage::insert_program(&pool, &program_for(&owner))
        .await
        .unwrap();

    let programs = storage::list_programs(&pool, &owner).await.unwrap();
    assert_eq!(programs.len(), 2);
    assert_eq!(programs.iter().filter(|p| p.is_active).count(), 1);
}

#[tokio::test]
async fn completion_persists_and_never_double_counts() {
    let pool = test_pool().await;
    let owner = storage::create_user(&pool, "Ana", "ana@example.com")
        .await
        .unwrap();

    let mut program = program_for(&owner);
    storage::insert_program(&pool, &program).await.unwrap();

    // Complete Monday of week 1 and persist.
    let monday = date(2025, 6, 2);
    let now = Local.with_ymd_and_hms(2025, 6, 2, 19, 0, 0).unwrap();
    schedule::apply_completion(&mut program, monday, now).unwrap();
    storage::update_program(&pool, &program).await.unwrap();

    let mut reloaded = storage::find_active_program(&pool, &owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.completed_workouts, 1);
    assert!(reloaded.week(1).unwrap().day(1).unwrap().completed);
    assert_eq!(reloaded.last_workout_date, Some(now));

    // Completing the same day again refreshes the timestamp only.
    let later = Local.with_ymd_and_hms(2025, 6, 2, 21, 0, 0).unwrap();
    schedule::apply_completion(&mut reloaded, monday, later).unwrap();
    storage::update_program(&pool, &reloaded).await.unwrap();

    let after = storage::find_active_program(&pool, &owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.completed_workouts, 1);
    assert_eq!(
        after.week(1).unwrap().day(1).unwrap().completed_at,
        Some(later)
    );
    assert!(after.completed_workouts <= after.total_workouts);
}

#[tokio::test]
async fn completions_feed_the_derivers_after_reload() {
    let pool = test_pool().await;
    let owner = storage::create_user(&pool, "Ana", "ana@example.com")
        .await
        .unwrap();

    let mut program = program_for(&owner);
    for day in 2..=4u32 {
        let d = date(2025, 6, day);
        let now = Local.with_ymd_and_hms(2025, 6, day, 20, 0, 0).unwrap();
        schedule::apply_completion(&mut program, d, now).unwrap();
    }
    storage::insert_program(&pool, &program).await.unwrap();

    let loaded = storage::find_active_program(&pool, &owner)
        .await
        .unwrap()
        .unwrap();

    // Mon/Tue/Wed done; evaluated Wednesday evening the streak is 3, and
    // Thursday morning it is 0 again.
    assert_eq!(schedule::derive_streak(&loaded, date(2025, 6, 4)), 3);
    assert_eq!(schedule::derive_streak(&loaded, date(2025, 6, 5)), 0);

    let today = schedule::derive_today(&loaded, date(2025, 6, 4));
    assert!(today.has_workout);
    assert!(today.completed);
}

#[tokio::test]
async fn updating_a_missing_program_fails_loudly() {
    let pool = test_pool().await;
    let owner = storage::create_user(&pool, "Ana", "ana@example.com")
        .await
        .unwrap();

    let program = program_for(&owner);
    // Never inserted: the write must surface an error, not vanish.
    let err = storage::update_program(&pool, &program).await.unwrap_err();
    assert!(err.to_string().contains("no longer exists"));
}

#[tokio::test]
async fn profile_write_recomputes_bmi() {
    let pool = test_pool().await;
    let owner = storage::create_user(&pool, "Ana", "ana@example.com")
        .await
        .unwrap();

    let profile = storage::update_profile(&pool, &owner, 30, 70.0, 175.0)
        .await
        .unwrap();
    assert_eq!(profile.bmi, utils::bmi(70.0, 175.0));

    let user = storage::resolve_user(&pool, "ana@example.com")
        .await
        .unwrap()
        .unwrap();
    let stored = user.profile.expect("profile should be stored");
    assert_eq!(stored.bmi, 22.9);
    assert_eq!(stored.age, 30);
}

#[tokio::test]
async fn duplicate_emails_are_rejected() {
    let pool = test_pool().await;
    storage::create_user(&pool, "Ana", "ana@example.com")
        .await
        .unwrap();

    let err = storage::create_user(&pool, "Other", "Ana@Example.com")
        .await
        .unwrap_err();

    let is_unique_violation = matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db_err)) if db_err.code() == Some("2067".into())
    );
    assert!(is_unique_violation, "expected unique violation, got {err}");
}
