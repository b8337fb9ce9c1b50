pub mod calendar;

/// Whole minutes of work time. Signed so it can be handed straight to
/// `chrono::TimeDelta::minutes`.
pub type Minutes = i64;

/// Whole hours of work time.
pub type WorkHours = i32;
