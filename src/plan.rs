use chrono::Local;
use uuid::Uuid;

use crate::{
    models::{Cardio, Day, PlannedExercise, Program, Week},
    types::{ProgramKind, Reps},
};

pub const TOTAL_WEEKS: u32 = 4;
pub const REST_SECONDS: u32 = 60;
pub const CARDIO_DURATION: &str = "15-30 min";
pub const CARDIO_TYPE: &str = "Libre";

pub struct ExerciseTemplate {
    pub name: &'static str,
    pub muscle: &'static str,
    pub sets: u32,
    pub reps: Reps,
}

pub struct DayTemplate {
    pub day_name: &'static str,
    pub muscle_groups: &'static [&'static str],
    pub exercises: &'static [ExerciseTemplate],
}

const CHEST_BACK: &[ExerciseTemplate] = &[
    ExerciseTemplate { name: "Press inclinado con mancuernas", muscle: "pecho", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Jalón al pecho", muscle: "espalda", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Press plano", muscle: "pecho", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Remo en T o remo con barra", muscle: "espalda", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Aperturas en peck deck", muscle: "pecho", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Pull over", muscle: "espalda", sets: 3, reps: Reps::Count(12) },
];

const LEGS: &[ExerciseTemplate] = &[
    ExerciseTemplate { name: "Hack o prensa", muscle: "piernas", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Extensión de cuádriceps", muscle: "piernas", sets: 3, reps: Reps::ToFailure },
    ExerciseTemplate { name: "Curl femoral acostado o sentado", muscle: "piernas", sets: 3, reps: Reps::ToFailure },
    ExerciseTemplate { name: "Abductores", muscle: "piernas", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Aductores", muscle: "piernas", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Gemelos", muscle: "piernas", sets: 3, reps: Reps::Count(12) },
];

const ARMS_SHOULDERS: &[ExerciseTemplate] = &[
    ExerciseTemplate { name: "Press militar", muscle: "hombros", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Laterales unilateral", muscle: "hombros", sets: 3, reps: Reps::ToFailure },
    ExerciseTemplate { name: "Posterior en peck deck o en polea", muscle: "hombros", sets: 3, reps: Reps::ToFailure },
    ExerciseTemplate { name: "Press francés", muscle: "brazos", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Extensión de tríceps con agarre en V", muscle: "brazos", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Curl predicador", muscle: "brazos", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Martillo", muscle: "brazos", sets: 3, reps: Reps::Count(12) },
];

const ABS: &[ExerciseTemplate] = &[
    ExerciseTemplate { name: "Elevación de piernas", muscle: "core", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Crunch en polea", muscle: "core", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Rueda abdominal", muscle: "core", sets: 3, reps: Reps::Count(12) },
    ExerciseTemplate { name: "Abdominales laterales (oblicuos)", muscle: "core", sets: 3, reps: Reps::Count(12) },
];

const CHEST_BACK_GROUPS: &[&str] = &["PECHO", "ESPALDA"];
const LEGS_GROUPS: &[&str] = &["PIERNAS"];
const ARMS_SHOULDERS_GROUPS: &[&str] = &["BRAZOS", "HOMBROS"];
const ABS_GROUPS: &[&str] = &["ABDOMEN"];

/// Week pattern for odd cycle weeks (1 and 3).
pub const PATTERN_A: [DayTemplate; 5] = [
    DayTemplate { day_name: "Lunes", muscle_groups: CHEST_BACK_GROUPS, exercises: CHEST_BACK },
    DayTemplate { day_name: "Martes", muscle_groups: LEGS_GROUPS, exercises: LEGS },
    DayTemplate { day_name: "Miercoles", muscle_groups: ARMS_SHOULDERS_GROUPS, exercises: ARMS_SHOULDERS },
    DayTemplate { day_name: "Jueves", muscle_groups: ABS_GROUPS, exercises: ABS },
    DayTemplate { day_name: "Viernes", muscle_groups: CHEST_BACK_GROUPS, exercises: CHEST_BACK },
];

/// Week pattern for even cycle weeks (2 and 4): chest/back and arms/shoulders
/// swap places, legs and abs stay put.
pub const PATTERN_B: [DayTemplate; 5] = [
    DayTemplate { day_name: "Lunes", muscle_groups: ARMS_SHOULDERS_GROUPS, exercises: ARMS_SHOULDERS },
    DayTemplate { day_name: "Martes", muscle_groups: LEGS_GROUPS, exercises: LEGS },
    DayTemplate { day_name: "Miercoles", muscle_groups: CHEST_BACK_GROUPS, exercises: CHEST_BACK },
    DayTemplate { day_name: "Jueves", muscle_groups: ABS_GROUPS, exercises: ABS },
    DayTemplate { day_name: "Viernes", muscle_groups: ARMS_SHOULDERS_GROUPS, exercises: ARMS_SHOULDERS },
];

fn build_day(day_number: u32, template: &DayTemplate) -> Day {
    Day {
        day_name: template.day_name.to_string(),
        day_number,
        muscle_groups: template.muscle_groups.iter().map(|g| g.to_string()).collect(),
        exercises: template
            .exercises
            .iter()
            .map(|e| PlannedExercise {
                name: e.name.to_string(),
                muscle_group: e.muscle.to_string(),
                sets: e.sets,
                reps: e.reps,
                rest_time: REST_SECONDS,
                completed: false,
            })
            .collect(),
        cardio: Cardio {
            duration: CARDIO_DURATION.to_string(),
            kind: CARDIO_TYPE.to_string(),
            completed: false,
        },
        completed: false,
        completed_at: None,
    }
}

/// Expand the two-week pattern into a four-week program for `owner_id`,
/// starting now. Every day, exercise and cardio slot begins not-completed.
pub fn generate(owner_id: &str, owner_name: &str) -> Program {
    let weeks = (1..=TOTAL_WEEKS)
        .map(|week_number| {
            let pattern = if week_number % 2 == 1 { &PATTERN_A } else { &PATTERN_B };
            Week {
                week_number,
                days: pattern
                    .iter()
                    .enumerate()
                    .map(|(i, t)| build_day(i as u32 + 1, t))
                    .collect(),
                completed: false,
            }
        })
        .collect();

    let mut program = Program {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        name: format!("Rutina Tramax - {}", owner_name),
        kind: ProgramKind::Template,
        description: Some(
            "Rutina de 4 semanas con alternancia de grupos musculares. \
             Incluye cardio diario de 15-30 minutos."
                .to_string(),
        ),
        difficulty: "Intermedio".to_string(),
        duration: "45-60 min".to_string(),
        frequency: "5 días/semana".to_string(),
        current_week: 1,
        current_day: 1,
        total_weeks: TOTAL_WEEKS,
        weeks,
        total_workouts: 0,
        completed_workouts: 0,
        start_date: Local::now(),
        last_workout_date: None,
        is_active: true,
        is_paused: false,
    };

    program.recount_workouts();
    program
}

/// Empty one-week shell for a user-built routine. Filling it with exercises
/// is up to the caller; the cycle math treats it like any other program.
pub fn custom_shell(owner_id: &str, owner_name: &str, custom_name: Option<String>) -> Program {
    let mut program = Program {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        name: custom_name.unwrap_or_else(|| format!("Rutina Personalizada - {}", owner_name)),
        kind: ProgramKind::Custom,
        description: Some("Rutina personalizada creada por el usuario".to_string()),
        difficulty: "Intermedio".to_string(),
        duration: "Variable".to_string(),
        frequency: "Personalizada".to_string(),
        current_week: 1,
        current_day: 1,
        total_weeks: 1,
        weeks: vec![Week {
            week_number: 1,
            days: Vec::new(),
            completed: false,
        }],
        total_workouts: 0,
        completed_workouts: 0,
        start_date: Local::now(),
        last_workout_date: None,
        is_active: true,
        is_paused: false,
    };

    program.recount_workouts();
    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_four_weeks_of_five_days() {
        let program = generate("u1", "Ana");

        assert_eq!(program.total_weeks, 4);
        assert_eq!(program.weeks.len(), 4);
        for (i, week) in program.weeks.iter().enumerate() {
            assert_eq!(week.week_number, i as u32 + 1);
            assert_eq!(week.days.len(), 5);
            for (j, day) in week.days.iter().enumerate() {
                assert_eq!(day.day_number, j as u32 + 1);
                assert!(!day.completed);
                assert!(day.completed_at.is_none());
                assert!(!day.cardio.completed);
                assert_eq!(day.cardio.duration, "15-30 min");
                assert_eq!(day.cardio.kind, "Libre");
                assert!(day.exercises.iter().all(|e| !e.completed));
                assert!(day.exercises.iter().all(|e| e.rest_time == 60));
            }
        }
    }

    #[test]
    fn counters_start_at_five_per_week() {
        let program = generate("u1", "Ana");

        assert_eq!(program.total_workouts, 5 * program.total_weeks);
        assert_eq!(program.completed_workouts, 0);
        assert!(program.is_active);
        assert!(!program.is_paused);
    }

    #[test]
    fn odd_and_even_weeks_alternate_patterns() {
        let program = generate("u1", "Ana");

        // Pattern A Monday is chest/back, pattern B Monday is arms/shoulders.
        assert_eq!(program.weeks[0].days[0].muscle_groups, vec!["PECHO", "ESPALDA"]);
        assert_eq!(program.weeks[1].days[0].muscle_groups, vec!["BRAZOS", "HOMBROS"]);
        assert_eq!(program.weeks[2].days[0].muscle_groups, vec!["PECHO", "ESPALDA"]);
        assert_eq!(program.weeks[3].days[0].muscle_groups, vec!["BRAZOS", "HOMBROS"]);

        // Legs and abs are fixed in both patterns.
        for week in &program.weeks {
            assert_eq!(week.days[1].muscle_groups, vec!["PIERNAS"]);
            assert_eq!(week.days[3].muscle_groups, vec!["ABDOMEN"]);
        }
    }

    #[test]
    fn to_failure_reps_survive_expansion() {
        let program = generate("u1", "Ana");
        let legs = &program.weeks[0].days[1];

        assert_eq!(legs.exercises[1].name, "Extensión de cuádriceps");
        assert_eq!(legs.exercises[1].reps, crate::types::Reps::ToFailure);
        assert_eq!(legs.exercises[0].reps, crate::types::Reps::Count(12));
    }

    #[test]
    fn custom_shell_is_an_empty_single_week() {
        let program = custom_shell("u1", "Ana", None);

        assert_eq!(program.total_weeks, 1);
        assert_eq!(program.weeks.len(), 1);
        assert!(program.weeks[0].days.is_empty());
        assert_eq!(program.total_workouts, 0);
        assert_eq!(program.completed_workouts, 0);
        assert_eq!(program.name, "Rutina Personalizada - Ana");
    }
}
