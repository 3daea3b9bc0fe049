use anyhow::Result;
use colored::Colorize;
use sqlx::SqlitePool;

use crate::{
    cli::ProfileCmd,
    commands::require_user,
    storage,
    types::{OutputFmt, emit},
};

const AGE_RANGE: std::ops::RangeInclusive<u32> = 13..=100;
const WEIGHT_RANGE: std::ops::RangeInclusive<f64> = 30.0..=300.0;
const HEIGHT_RANGE: std::ops::RangeInclusive<f64> = 120.0..=250.0;

pub async fn handle(cmd: ProfileCmd, pool: &SqlitePool, fmt: OutputFmt) -> Result<()> {
    match cmd {
        ProfileCmd::Show { user } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };

            emit(fmt, &user, || {
                println!("{} <{}>", user.name.bold(), user.email);
                match &user.profile {
                    Some(p) => {
                        println!("  edad:   {} años", p.age);
                        println!("  peso:   {} kg", p.weight_kg);
                        println!("  altura: {} cm", p.height_cm);
                        println!("  IMC:    {}", format!("{:.1}", p.bmi).bold());
                    }
                    None => println!(
                        "{}",
                        "  (no profile set – use `profile set`)".dimmed()
                    ),
                }
            });
        }

        ProfileCmd::Set {
            user,
            age,
            weight,
            height,
        } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };

            if !AGE_RANGE.contains(&age) {
                println!(
                    "{} age must be between {} and {}",
                    "error:".red().bold(),
                    AGE_RANGE.start(),
                    AGE_RANGE.end()
                );
                return Ok(());
            }
            if !WEIGHT_RANGE.contains(&weight) {
                println!(
                    "{} weight must be between {} and {} kg",
                    "error:".red().bold(),
                    WEIGHT_RANGE.start(),
                    WEIGHT_RANGE.end()
                );
                return Ok(());
            }
            if !HEIGHT_RANGE.contains(&height) {
                println!(
                    "{} height must be between {} and {} cm",
                    "error:".red().bold(),
                    HEIGHT_RANGE.start(),
                    HEIGHT_RANGE.end()
                );
                return Ok(());
            }

            let profile = storage::update_profile(pool, &user.id, age, weight, height).await?;

            emit(fmt, &profile, || {
                println!(
                    "{} profile updated – IMC {}",
                    "ok:".green().bold(),
                    format!("{:.1}", profile.bmi).bold()
                );
            });
        }
    }

    Ok(())
}
