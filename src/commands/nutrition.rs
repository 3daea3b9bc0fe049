use anyhow::Result;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::{
    cli::NutritionCmd,
    commands::{parse_date_arg, require_user},
    models::{DayTotals, Food, MealEntry},
    types::{OutputFmt, emit},
};

const MEAL_ORDER: [&str; 5] = ["desayuno", "almuerzo", "merienda", "cena", "snack"];

#[derive(Serialize)]
struct DayLogJson {
    date: String,
    entries: Vec<MealEntry>,
    totals: DayTotals,
}

async fn resolve_food(pool: &SqlitePool, selector: &str) -> Result<Option<Food>> {
    let row = if let Ok(idx) = selector.parse::<i64>() {
        sqlx::query(
            r#"
            SELECT *
            FROM (
              SELECT *, ROW_NUMBER() OVER (ORDER BY name) AS rn
              FROM foods
            ) t
            WHERE t.rn = ?
            "#,
        )
        .bind(idx)
        .fetch_optional(pool)
        .await?
    } else {
        sqlx::query("SELECT * FROM foods WHERE name = ?")
            .bind(selector)
            .fetch_optional(pool)
            .await?
    };

    Ok(row.map(|r| Food {
        id: r.get("id"),
        name: r.get("name"),
        calories_per_100g: r.get("calories_per_100g"),
        protein: r.get("protein"),
        carbs: r.get("carbs"),
        fat: r.get("fat"),
        fiber: r.get("fiber"),
    }))
}

pub async fn handle(cmd: NutritionCmd, pool: &SqlitePool, fmt: OutputFmt) -> Result<()> {
    match cmd {
        NutritionCmd::FoodAdd {
            name,
            calories,
            protein,
            carbs,
            fat,
            fiber,
        } => {
            let res = sqlx::query(
                r#"
                INSERT INTO foods (id, name, calories_per_100g, protein, carbs, fat, fiber)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&name)
            .bind(calories)
            .bind(protein)
            .bind(carbs)
            .bind(fat)
            .bind(fiber)
            .execute(pool)
            .await;

            match res {
                Ok(_) => println!(
                    "{} food \"{}\" added ({} kcal/100g)",
                    "ok:".green().bold(),
                    name,
                    calories
                ),
                Err(sqlx::Error::Database(db_err)) if db_err.code() == Some("2067".into()) => {
                    println!(
                        "{} food \"{}\" already exists",
                        "warning:".yellow().bold(),
                        name
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        NutritionCmd::Foods => {
            let rows = sqlx::query(
                r#"
                SELECT ROW_NUMBER() OVER (ORDER BY name) AS idx, *
                FROM foods ORDER BY idx
                "#,
            )
            .fetch_all(pool)
            .await?;

            let foods: Vec<Food> = rows
                .iter()
                .map(|r| Food {
                    id: r.get("id"),
                    name: r.get("name"),
                    calories_per_100g: r.get("calories_per_100g"),
                    protein: r.get("protein"),
                    carbs: r.get("carbs"),
                    fat: r.get("fat"),
                    fiber: r.get("fiber"),
                })
                .collect();

            emit(fmt, &foods, || {
                if foods.is_empty() {
                    println!("{}", "  (no foods in the catalog)".dimmed());
                    return;
                }

                println!("{}", "Foods:".cyan().bold());
                for (i, f) in foods.iter().enumerate() {
                    println!(
                        " {} • {} {} {}",
                        format!("{:>2}", i + 1).yellow(),
                        f.name.bold(),
                        format!("{} kcal/100g", f.calories_per_100g),
                        format!(
                            "P {:.0} / C {:.0} / G {:.0}",
                            f.protein.unwrap_or(0.0),
                            f.carbs.unwrap_or(0.0),
                            f.fat.unwrap_or(0.0)
                        )
                        .dimmed()
                    );
                }
            });
        }

        NutritionCmd::Log {
            user,
            food,
            grams,
            meal,
        } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };

            if grams <= 0.0 {
                println!("{} grams must be positive", "error:".red().bold());
                return Ok(());
            }

            let Some(food) = resolve_food(pool, &food).await? else {
                println!(
                    "{} no food matching `{}` – add it with `nutrition food-add`",
                    "error:".red().bold(),
                    food
                );
                return Ok(());
            };

            // Macros are stored per 100 g; scale by the logged amount.
            let calories = food.calories_per_100g * grams / 100.0;

            sqlx::query(
                r#"
                INSERT INTO nutrition_logs (id, user_id, food_id, meal_type, grams, calories, logged_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&user.id)
            .bind(&food.id)
            .bind(meal.to_string())
            .bind(grams)
            .bind(calories)
            .execute(pool)
            .await?;

            println!(
                "{} {} – {:.0} g de {} ({:.0} kcal)",
                "ok:".green().bold(),
                meal,
                grams,
                food.name.bold(),
                calories
            );
        }

        NutritionCmd::Show { user, date } => {
            let Some(user) = require_user(pool, &user).await? else {
                return Ok(());
            };
            let day = parse_date_arg(date.as_deref())?;

            let rows = sqlx::query(
                r#"
                SELECT f.name AS food_name,
                       n.meal_type,
                       n.grams,
                       n.calories,
                       COALESCE(f.protein, 0) * n.grams / 100 AS protein,
                       COALESCE(f.carbs, 0)   * n.grams / 100 AS carbs,
                       COALESCE(f.fat, 0)     * n.grams / 100 AS fat
                FROM   nutrition_logs n
                JOIN   foods f ON f.id = n.food_id
                WHERE  n.user_id = ? AND date(n.logged_at) = ?
                ORDER  BY n.logged_at
                "#,
            )
            .bind(&user.id)
            .bind(day.format("%Y-%m-%d").to_string())
            .fetch_all(pool)
            .await?;

            let entries: Vec<MealEntry> = rows
                .iter()
                .map(|r| MealEntry {
                    food_name: r.get("food_name"),
                    meal_type: r.get("meal_type"),
                    grams: r.get("grams"),
                    calories: r.get("calories"),
                    protein: r.get("protein"),
                    carbs: r.get("carbs"),
                    fat: r.get("fat"),
                })
                .collect();

            let mut totals = DayTotals::default();
            for e in &entries {
                totals.total_calories += e.calories;
                totals.total_protein += e.protein;
                totals.total_carbs += e.carbs;
                totals.total_fat += e.fat;
            }

            let payload = DayLogJson {
                date: day.format("%Y-%m-%d").to_string(),
                entries,
                totals,
            };

            emit(fmt, &payload, || {
                println!(
                    "{} {}",
                    "Nutrición".cyan().bold(),
                    payload.date.dimmed()
                );

                if payload.entries.is_empty() {
                    println!("{}", "  (no meals logged)".dimmed());
                    return;
                }

                let by_meal = payload
                    .entries
                    .iter()
                    .into_group_map_by(|e| e.meal_type.clone());

                for meal in MEAL_ORDER {
                    let Some(entries) = by_meal.get(meal) else {
                        continue;
                    };
                    println!("  {}", meal.bold());
                    for e in entries {
                        println!(
                            "    {} {:.0} g – {:.0} kcal",
                            e.food_name,
                            e.grams,
                            e.calories
                        );
                    }
                }

                println!(
                    "  {} {:.0} kcal – P {:.0} g / C {:.0} g / G {:.0} g",
                    "total:".bold(),
                    payload.totals.total_calories,
                    payload.totals.total_protein,
                    payload.totals.total_carbs,
                    payload.totals.total_fat
                );
            });
        }
    }

    Ok(())
}
