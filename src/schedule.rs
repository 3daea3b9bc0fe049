use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

use crate::{
    errors::TrackerError,
    models::{Day, DayStatus, Program, TodayStatus, WorkoutStats},
    utils,
};

/// How far back the streak walk scans, in calendar days.
const STREAK_WINDOW_DAYS: i64 = 30;

/// Where a calendar date lands relative to a program's cycle.
#[derive(Debug)]
pub enum DayResolution<'a> {
    /// The date is before the program's start date.
    NotStarted,
    /// Saturday or Sunday; the cycle has no entry for weekends.
    RestDay,
    /// A weekday the cycle should cover, but the program document has no
    /// matching week/day entry.
    Unplanned,
    Training(&'a Day),
}

enum Slot {
    NotStarted,
    RestDay,
    Missing { week: u32, day: u32 },
    Found { week_idx: usize, day_idx: usize },
}

/// ISO weekday number, Monday=1 .. Sunday=7.
fn iso_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

fn weekday_name(date: NaiveDate) -> &'static str {
    match iso_weekday(date) {
        1 => "Lunes",
        2 => "Martes",
        3 => "Miercoles",
        4 => "Jueves",
        5 => "Viernes",
        6 => "Sábado",
        _ => "Domingo",
    }
}

fn day_letter(date: NaiveDate) -> &'static str {
    match iso_weekday(date) {
        1 => "L",
        2 => "M",
        3 => "M",
        4 => "J",
        5 => "V",
        6 => "S",
        _ => "D",
    }
}

/// The one place the cycle math lives. Every deriver and the completion
/// path go through here so week resolution cannot drift between them.
fn locate(program: &Program, date: NaiveDate) -> Slot {
    let iso_day = iso_weekday(date);
    if iso_day > 5 {
        return Slot::RestDay;
    }

    let elapsed_days = (date - program.start_date.date_naive()).num_days();
    if elapsed_days < 0 {
        return Slot::NotStarted;
    }

    if program.total_weeks == 0 {
        return Slot::Missing { week: 0, day: iso_day };
    }

    let weeks_since_start = elapsed_days / 7;
    let week_in_cycle = (weeks_since_start % i64::from(program.total_weeks)) as u32 + 1;

    let Some(week_idx) = program
        .weeks
        .iter()
        .position(|w| w.week_number == week_in_cycle)
    else {
        return Slot::Missing { week: week_in_cycle, day: iso_day };
    };

    let Some(day_idx) = program.weeks[week_idx]
        .days
        .iter()
        .position(|d| d.day_number == iso_day)
    else {
        return Slot::Missing { week: week_in_cycle, day: iso_day };
    };

    Slot::Found { week_idx, day_idx }
}

/// Resolve which planned day (if any) `date` falls on.
pub fn resolve_training_day(program: &Program, date: NaiveDate) -> DayResolution<'_> {
    match locate(program, date) {
        Slot::NotStarted => DayResolution::NotStarted,
        Slot::RestDay => DayResolution::RestDay,
        Slot::Missing { .. } => DayResolution::Unplanned,
        Slot::Found { week_idx, day_idx } => {
            DayResolution::Training(&program.weeks[week_idx].days[day_idx])
        }
    }
}

/// Today's workout, rest-day or not-started state. Lookup misses degrade to
/// "no workout today", never an error.
pub fn derive_today(program: &Program, today: NaiveDate) -> TodayStatus {
    match resolve_training_day(program, today) {
        DayResolution::RestDay => TodayStatus {
            has_workout: false,
            is_rest_day: true,
            day_name: weekday_name(today).to_string(),
            muscle_groups: Vec::new(),
            exercises_count: 0,
            completed: false,
            exercises: Vec::new(),
            cardio: None,
        },
        DayResolution::NotStarted | DayResolution::Unplanned => TodayStatus {
            has_workout: false,
            is_rest_day: false,
            day_name: weekday_name(today).to_string(),
            muscle_groups: Vec::new(),
            exercises_count: 0,
            completed: false,
            exercises: Vec::new(),
            cardio: None,
        },
        DayResolution::Training(day) => TodayStatus {
            has_workout: true,
            is_rest_day: false,
            day_name: day.day_name.clone(),
            muscle_groups: day.muscle_groups.clone(),
            exercises_count: day.exercises.len(),
            completed: day.completed,
            exercises: day.exercises.clone(),
            cardio: Some(day.cardio.clone()),
        },
    }
}

/// The 7 calendar days ending today, oldest first. Each date re-runs the
/// cycle resolution independently. Weekends show up as
/// `has_workout = false, completed = true` -- rest days are rendered as
/// vacuously satisfied on the history strip.
pub fn derive_week_history(program: &Program, today: NaiveDate) -> Vec<DayStatus> {
    (0..7)
        .map(|i| {
            let date = today - Duration::days(6 - i);
            match resolve_training_day(program, date) {
                DayResolution::RestDay => DayStatus {
                    day: day_letter(date).to_string(),
                    date,
                    has_workout: false,
                    completed: true,
                    muscle_groups: Vec::new(),
                },
                DayResolution::Training(day) => DayStatus {
                    day: day_letter(date).to_string(),
                    date,
                    has_workout: true,
                    completed: day.completed,
                    muscle_groups: day.muscle_groups.clone(),
                },
                DayResolution::NotStarted | DayResolution::Unplanned => DayStatus {
                    day: day_letter(date).to_string(),
                    date,
                    has_workout: false,
                    completed: false,
                    muscle_groups: Vec::new(),
                },
            }
        })
        .collect()
}

/// Count of consecutive completed training days walking backward from
/// `today`, scanning at most 30 calendar days. Weekends are skipped. The
/// first incomplete or unresolvable training day ends the streak -- an
/// unfinished today counts as a break, not a pass. Days before the
/// program's start stop the scan without discarding what was counted.
pub fn derive_streak(program: &Program, today: NaiveDate) -> u32 {
    let mut streak = 0;

    for i in 0..STREAK_WINDOW_DAYS {
        match resolve_training_day(program, today - Duration::days(i)) {
            DayResolution::RestDay => continue,
            DayResolution::NotStarted => break,
            DayResolution::Training(day) if day.completed => streak += 1,
            DayResolution::Training(_) | DayResolution::Unplanned => break,
        }
    }

    streak
}

/// Dashboard numbers: the program counters, the streak, and how much of
/// this week's visible training days are done.
pub fn derive_stats(program: &Program, today: NaiveDate) -> WorkoutStats {
    let history = derive_week_history(program, today);
    let training_days = history.iter().filter(|d| d.has_workout).count() as u32;
    let completed_days = history
        .iter()
        .filter(|d| d.has_workout && d.completed)
        .count() as u32;

    WorkoutStats {
        total_workouts: program.total_workouts,
        completed_workouts: program.completed_workouts,
        current_streak: derive_streak(program, today),
        week_progress: utils::percentage(completed_days, training_days),
    }
}

/// Mark `date`'s training day completed and recompute the counters.
/// Weekends and pre-start dates are rejected; an already-completed day just
/// refreshes its completion timestamp, the counters cannot double-count.
pub fn apply_completion(
    program: &mut Program,
    date: NaiveDate,
    now: DateTime<Local>,
) -> Result<(), TrackerError> {
    match locate(program, date) {
        Slot::RestDay => Err(TrackerError::InvalidDay),
        Slot::NotStarted => Err(TrackerError::NotStarted),
        Slot::Missing { week, day } => Err(TrackerError::NotFound { week, day }),
        Slot::Found { week_idx, day_idx } => {
            let week_number = program.weeks[week_idx].week_number;
            let day = &mut program.weeks[week_idx].days[day_idx];
            let day_number = day.day_number;

            day.completed = true;
            day.completed_at = Some(now);

            program.last_workout_date = Some(now);
            program.current_week = week_number;
            program.current_day = day_number;
            program.recount_workouts();

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan;
    use chrono::TimeZone;

    /// A generated program anchored to Monday 2025-06-02.
    fn program_starting_monday() -> Program {
        let mut program = plan::generate("u1", "Ana");
        program.start_date = Local.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        program
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn complete(program: &mut Program, week_idx: usize, day_idx: usize) {
        program.weeks[week_idx].days[day_idx].completed = true;
        program.recount_workouts();
    }

    #[test]
    fn weekends_are_rest_days_regardless_of_content() {
        let program = program_starting_monday();

        for d in [date(2025, 6, 7), date(2025, 6, 8)] {
            let today = derive_today(&program, d);
            assert!(!today.has_workout);
            assert!(today.is_rest_day);
            assert_eq!(today.exercises_count, 0);
        }
    }

    #[test]
    fn dates_before_start_have_no_workout() {
        let program = program_starting_monday();

        // Friday before the Monday start.
        let today = derive_today(&program, date(2025, 5, 30));
        assert!(!today.has_workout);
        assert!(!today.is_rest_day);
    }

    #[test]
    fn cycle_advances_weekly_and_wraps_after_four_weeks() {
        let program = program_starting_monday();

        // Start Monday resolves to week 1's Monday (chest/back).
        match resolve_training_day(&program, date(2025, 6, 2)) {
            DayResolution::Training(day) => {
                assert_eq!(day.day_name, "Lunes");
                assert_eq!(day.muscle_groups, vec!["PECHO", "ESPALDA"]);
            }
            other => panic!("expected training day, got {:?}", other),
        }

        // One week later: week 2's Monday (arms/shoulders).
        match resolve_training_day(&program, date(2025, 6, 9)) {
            DayResolution::Training(day) => {
                assert_eq!(day.muscle_groups, vec!["BRAZOS", "HOMBROS"]);
            }
            other => panic!("expected training day, got {:?}", other),
        }

        // Four weeks later the cycle wraps back to week 1.
        match resolve_training_day(&program, date(2025, 6, 30)) {
            DayResolution::Training(day) => {
                assert_eq!(day.muscle_groups, vec!["PECHO", "ESPALDA"]);
            }
            other => panic!("expected training day, got {:?}", other),
        }
    }

    #[test]
    fn today_status_exposes_the_planned_day() {
        let program = program_starting_monday();

        // Tuesday of week 1 is leg day.
        let today = derive_today(&program, date(2025, 6, 3));
        assert!(today.has_workout);
        assert_eq!(today.day_name, "Martes");
        assert_eq!(today.muscle_groups, vec!["PIERNAS"]);
        assert_eq!(today.exercises_count, 6);
        assert!(!today.completed);
        assert!(today.cardio.is_some());
    }

    #[test]
    fn week_history_is_seven_days_oldest_first() {
        let program = program_starting_monday();

        // From Wednesday 2025-06-11: Thu,Fri,Sat,Sun,Mon,Tue,Wed.
        let history = derive_week_history(&program, date(2025, 6, 11));
        assert_eq!(history.len(), 7);

        let letters: Vec<&str> = history.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(letters, vec!["J", "V", "S", "D", "L", "M", "M"]);
        assert_eq!(history[0].date, date(2025, 6, 5));
        assert_eq!(history[6].date, date(2025, 6, 11));

        // Saturday and Sunday: no workout, vacuously complete.
        for weekend in [&history[2], &history[3]] {
            assert!(!weekend.has_workout);
            assert!(weekend.completed);
        }

        // Weekdays carry their muscle groups.
        assert_eq!(history[4].muscle_groups, vec!["BRAZOS", "HOMBROS"]);
        assert!(history[4].has_workout);
    }

    #[test]
    fn incomplete_today_yields_zero_streak() {
        let mut program = program_starting_monday();
        // Mon/Tue/Wed of week 1 done, Thursday not.
        complete(&mut program, 0, 0);
        complete(&mut program, 0, 1);
        complete(&mut program, 0, 2);

        // Evaluated from Thursday (incomplete): the break is immediate.
        assert_eq!(derive_streak(&program, date(2025, 6, 5)), 0);

        // Evaluated from Wednesday end-of-day: three in a row.
        assert_eq!(derive_streak(&program, date(2025, 6, 4)), 3);
    }

    #[test]
    fn streak_skips_weekends() {
        let mut program = program_starting_monday();
        // Thu and Fri of week 1, then Monday of week 2.
        complete(&mut program, 0, 3);
        complete(&mut program, 0, 4);
        complete(&mut program, 1, 0);

        // From Monday 2025-06-09 the walk crosses the weekend untouched.
        assert_eq!(derive_streak(&program, date(2025, 6, 9)), 3);
    }

    #[test]
    fn streak_stops_scanning_before_start_date() {
        let mut program = plan::generate("u1", "Ana");
        // Program starts mid-week, on Wednesday 2025-06-04.
        program.start_date = Local.with_ymd_and_hms(2025, 6, 4, 8, 0, 0).unwrap();
        complete(&mut program, 0, 2);

        // Monday and Tuesday of that week are before the start. They must
        // neither count nor break the streak accumulated so far.
        assert_eq!(derive_streak(&program, date(2025, 6, 4)), 1);
    }

    #[test]
    fn completing_a_weekend_is_rejected() {
        let mut program = program_starting_monday();
        let now = Local.with_ymd_and_hms(2025, 6, 7, 18, 0, 0).unwrap();

        let err = apply_completion(&mut program, date(2025, 6, 7), now).unwrap_err();
        assert_eq!(err, TrackerError::InvalidDay);
        assert_eq!(program.completed_workouts, 0);
    }

    #[test]
    fn completing_before_start_is_rejected() {
        let mut program = program_starting_monday();
        let now = Local.with_ymd_and_hms(2025, 5, 30, 18, 0, 0).unwrap();

        let err = apply_completion(&mut program, date(2025, 5, 30), now).unwrap_err();
        assert_eq!(err, TrackerError::NotStarted);
    }

    #[test]
    fn completing_an_unplanned_day_reports_not_found() {
        let mut shell = plan::custom_shell("u1", "Ana", None);
        shell.start_date = Local.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        let now = Local.with_ymd_and_hms(2025, 6, 3, 18, 0, 0).unwrap();

        let err = apply_completion(&mut shell, date(2025, 6, 3), now).unwrap_err();
        assert_eq!(err, TrackerError::NotFound { week: 1, day: 2 });
    }

    #[test]
    fn completion_marks_the_day_and_recounts() {
        let mut program = program_starting_monday();
        let now = Local.with_ymd_and_hms(2025, 6, 2, 19, 30, 0).unwrap();

        apply_completion(&mut program, date(2025, 6, 2), now).unwrap();

        let day = program.week(1).unwrap().day(1).unwrap();
        assert!(day.completed);
        assert_eq!(day.completed_at, Some(now));
        assert_eq!(program.completed_workouts, 1);
        assert_eq!(program.total_workouts, 20);
        assert_eq!(program.last_workout_date, Some(now));
        assert_eq!(program.current_week, 1);
        assert_eq!(program.current_day, 1);
    }

    #[test]
    fn completion_is_idempotent_on_the_counters() {
        let mut program = program_starting_monday();
        let first = Local.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        let second = Local.with_ymd_and_hms(2025, 6, 2, 20, 0, 0).unwrap();

        apply_completion(&mut program, date(2025, 6, 2), first).unwrap();
        apply_completion(&mut program, date(2025, 6, 2), second).unwrap();

        assert_eq!(program.completed_workouts, 1);
        let day = program.week(1).unwrap().day(1).unwrap();
        assert_eq!(day.completed_at, Some(second));
    }

    #[test]
    fn stats_only_count_visible_training_days() {
        let mut program = program_starting_monday();
        complete(&mut program, 0, 0);
        complete(&mut program, 0, 1);

        // Tuesday evening: the strip's only training days so far are
        // Mon/Tue (pre-start days and the weekend don't count), both done.
        let stats = derive_stats(&program, date(2025, 6, 3));
        assert_eq!(stats.completed_workouts, 2);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.week_progress, 100);

        // A day later, with Wednesday pending, the streak resets and the
        // strip shows two of three training days done.
        let stats = derive_stats(&program, date(2025, 6, 4));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.week_progress, 67);
    }
}
