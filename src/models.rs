use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{ProgramKind, Reps};

/// A user's multi-week training plan instance. Stored as one document per
/// program; at most one may be active per user at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub kind: ProgramKind,
    pub description: Option<String>,
    pub difficulty: String,
    pub duration: String,
    pub frequency: String,
    /// Display cursor only. The schedule derivation computes the real
    /// week/day from `start_date` and never trusts these fields.
    pub current_week: u32,
    pub current_day: u32,
    pub total_weeks: u32,
    pub weeks: Vec<Week>,
    /// Denormalized counters, recomputed on every mutation.
    pub total_workouts: u32,
    pub completed_workouts: u32,
    /// Immutable after creation; anchor for all cycle math.
    pub start_date: DateTime<Local>,
    pub last_workout_date: Option<DateTime<Local>>,
    pub is_active: bool,
    pub is_paused: bool,
}

impl Program {
    pub fn week(&self, week_number: u32) -> Option<&Week> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    /// Completed workouts as a percentage, rounded. 0 when nothing is planned.
    pub fn progress_percentage(&self) -> u32 {
        crate::utils::percentage(self.completed_workouts, self.total_workouts)
    }

    /// Recompute `total_workouts`, `completed_workouts` and the per-week
    /// `completed` flags from the day entries. Counters are never
    /// incremented in place.
    pub fn recount_workouts(&mut self) {
        let mut total = 0;
        let mut completed = 0;

        for week in &mut self.weeks {
            total += week.days.len() as u32;
            completed += week.days.iter().filter(|d| d.completed).count() as u32;
            week.completed = !week.days.is_empty() && week.days.iter().all(|d| d.completed);
        }

        self.total_workouts = total;
        self.completed_workouts = completed;
    }
}

/// One week of the repeating cycle. `completed` is derived from the days,
/// not authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    pub week_number: u32,
    pub days: Vec<Day>,
    pub completed: bool,
}

impl Week {
    pub fn day(&self, day_number: u32) -> Option<&Day> {
        self.days.iter().find(|d| d.day_number == day_number)
    }
}

/// A planned training day. Only weekdays are modeled (Monday=1 .. Friday=5);
/// weekends are implicit rest days with no entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub day_name: String,
    pub day_number: u32,
    pub muscle_groups: Vec<String>,
    pub exercises: Vec<PlannedExercise>,
    pub cardio: Cardio,
    pub completed: bool,
    pub completed_at: Option<DateTime<Local>>,
}

/// An exercise slot inside a planned day. The `completed` flag here is
/// informational; day-level completion is what drives the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedExercise {
    pub name: String,
    pub muscle_group: String,
    pub sets: u32,
    pub reps: Reps,
    pub rest_time: u32,
    pub completed: bool,
}

/// The daily cardio slot every generated day carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cardio {
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub completed: bool,
}

/// What today looks like for a program: a training day with its content,
/// a rest day, or nothing (program absent or not started).
#[derive(Debug, Clone, Serialize)]
pub struct TodayStatus {
    pub has_workout: bool,
    pub is_rest_day: bool,
    pub day_name: String,
    pub muscle_groups: Vec<String>,
    pub exercises_count: usize,
    pub completed: bool,
    pub exercises: Vec<PlannedExercise>,
    pub cardio: Option<Cardio>,
}

impl TodayStatus {
    /// The "no active program" placeholder the dashboard falls back to.
    pub fn absent() -> Self {
        Self {
            has_workout: false,
            is_rest_day: false,
            day_name: "Sin rutina".to_string(),
            muscle_groups: Vec::new(),
            exercises_count: 0,
            completed: false,
            exercises: Vec::new(),
            cardio: None,
        }
    }
}

/// One entry of the rolling 7-day history strip.
#[derive(Debug, Clone, Serialize)]
pub struct DayStatus {
    /// One-letter day label (L, M, M, J, V, S, D).
    pub day: String,
    pub date: NaiveDate,
    pub has_workout: bool,
    pub completed: bool,
    pub muscle_groups: Vec<String>,
}

/// Aggregated progress numbers for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutStats {
    pub total_workouts: u32,
    pub completed_workouts: u32,
    pub current_streak: u32,
    /// Percentage of this week's training days already completed.
    pub week_progress: u32,
}

/// An account record. Authentication lives outside this tool; users exist
/// here so every program, log and profile has an explicit owner.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile: Option<Profile>,
    pub created_at: String,
}

/// Body metrics; `bmi` is recomputed on every write, never hand-set.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub bmi: f64,
}

/// Catalog entry for a single exercise.
#[derive(Debug, Clone, Serialize)]
pub struct Exercise {
    pub name: String,
    pub muscle_group: String,
    pub calories_per_minute: f64,
    pub description: Option<String>,
}

/// Catalog entry for a food, with macros per 100 g.
#[derive(Debug, Clone, Serialize)]
pub struct Food {
    pub id: String,
    pub name: String,
    pub calories_per_100g: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
}

/// One logged meal: a food, how much of it, and the calories that implies.
#[derive(Debug, Clone, Serialize)]
pub struct MealEntry {
    pub food_name: String,
    pub meal_type: String,
    pub grams: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Calorie and macro totals for one day of logged meals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DayTotals {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32, completed: bool) -> Day {
        Day {
            day_name: format!("Día {}", n),
            day_number: n,
            muscle_groups: vec![],
            exercises: vec![],
            cardio: Cardio {
                duration: "15-30 min".to_string(),
                kind: "Libre".to_string(),
                completed: false,
            },
            completed,
            completed_at: None,
        }
    }

    #[test]
    fn recount_rebuilds_counters_from_days() {
        let mut program = Program {
            id: "p1".to_string(),
            owner_id: "u1".to_string(),
            name: "test".to_string(),
            kind: ProgramKind::Template,
            description: None,
            difficulty: "Intermedio".to_string(),
            duration: "45-60 min".to_string(),
            frequency: "5 días/semana".to_string(),
            current_week: 1,
            current_day: 1,
            total_weeks: 1,
            weeks: vec![Week {
                week_number: 1,
                days: vec![day(1, true), day(2, true), day(3, false)],
                completed: false,
            }],
            total_workouts: 99,
            completed_workouts: 99,
            start_date: Local::now(),
            last_workout_date: None,
            is_active: true,
            is_paused: false,
        };

        program.recount_workouts();

        assert_eq!(program.total_workouts, 3);
        assert_eq!(program.completed_workouts, 2);
        assert!(!program.weeks[0].completed);
        assert!(program.completed_workouts <= program.total_workouts);
    }
}
