use thiserror::Error;

/// Domain errors callers need to tell apart.
///
/// `RestDay` and `NotStarted` are ordinary states on the read path (the
/// derivers report them inside `TodayStatus` instead of returning an error);
/// they only become errors when someone tries to *complete* a day that does
/// not exist. `NotFound` during read derivation degrades to "no workout
/// today"; during completion it is surfaced, since it means the program
/// document is malformed or the wrong day was requested.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// Completion requested on a weekend.
    #[error("today is a rest day, there is nothing to complete")]
    InvalidDay,

    /// Completion requested before the program's start date.
    #[error("the program has not started yet")]
    NotStarted,

    /// The cycle resolved to a week/day the program document does not contain.
    #[error("week {week}, day {day} not found in the program")]
    NotFound { week: u32, day: u32 },
}
