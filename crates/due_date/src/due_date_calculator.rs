use chrono::Datelike;
use chrono::Days;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::TimeDelta;
use chrono::Weekday;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::trace;
use work_calendar::Minutes;
use work_calendar::WorkHours;
use work_calendar::calendar::WorkCalendar;

// Type Alias to keep the roles of the timestamps apart
pub type SubmitDate = NaiveDateTime;
pub type DueDate = NaiveDateTime;
pub type TurnaroundTime = WorkHours;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DueDateError
{
    #[error("submit date is required")]
    MissingSubmitDate,
    #[error("submit date must be on a work day, work days are {first_work_day} to {last_work_day}")]
    SubmitDateNotWorkDay
    {
        first_work_day: Weekday,
        last_work_day: Weekday,
    },
    #[error("submit time must be within work hours, work hours are {work_hours_start} to {work_hours_end}")]
    SubmitTimeNotWorkHour
    {
        work_hours_start: NaiveTime,
        work_hours_end: NaiveTime,
    },
    #[error("turnaround time must be positive, got {0}")]
    NonPositiveTurnaroundTime(TurnaroundTime),
    #[error("due date for {turnaround_time} work hours after {submit_date} is outside the representable date range")]
    DateRangeExceeded
    {
        submit_date: SubmitDate,
        turnaround_time: TurnaroundTime,
    },
}

/// Calculates due dates by consuming turnaround time only during the work
/// hours of a [`WorkCalendar`].
///
/// The calculator holds nothing but its calendar, so a single instance can be
/// shared freely between threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDateCalculator
{
    work_calendar: WorkCalendar,
}

impl DueDateCalculator
{
    pub fn new(work_calendar: WorkCalendar) -> Self
    {
        Self { work_calendar }
    }

    pub fn work_calendar(&self) -> &WorkCalendar
    {
        &self.work_calendar
    }

    /// Every input is validated before any date arithmetic happens, so a
    /// rejected call has no partial result.
    ///
    /// This method fails when:
    /// * `submit_date` is `None`.
    /// * `submit_date` is not on a work day.
    /// * `submit_date` is before the start or after the end of the work hours.
    /// * `turnaround_time` is zero or negative.
    /// * The due date cannot be represented by [`NaiveDateTime`].
    pub fn calculate_due_date(&self, submit_date: Option<SubmitDate>, turnaround_time: TurnaroundTime) -> Result<DueDate, DueDateError>
    {
        let submit_date = self.validate_inputs(submit_date, turnaround_time)?;
        let date_range_exceeded = DueDateError::DateRangeExceeded {
            submit_date,
            turnaround_time,
        };

        let due_date = self
            .advance_whole_days(submit_date, turnaround_time)
            .ok_or(date_range_exceeded)?;
        let due_date = self
            .advance_remaining_time(due_date, turnaround_time)
            .ok_or(date_range_exceeded)?;

        debug!(%submit_date, turnaround_time, %due_date, "Calculated due date");
        Ok(due_date)
    }
}

/// Private methods.
///
/// The `Option` returned by the date arithmetic is `None` only when chrono
/// runs out of representable dates.
impl DueDateCalculator
{
    fn validate_inputs(&self, submit_date: Option<SubmitDate>, turnaround_time: TurnaroundTime) -> Result<SubmitDate, DueDateError>
    {
        let Some(submit_date) = submit_date else {
            debug!("Rejected missing submit date");
            return Err(DueDateError::MissingSubmitDate);
        };

        if !self.work_calendar.is_work_day(submit_date.weekday()) {
            debug!(%submit_date, weekday = %submit_date.weekday(), "Rejected submit date outside the work week");
            return Err(DueDateError::SubmitDateNotWorkDay {
                first_work_day: self.work_calendar.first_work_day(),
                last_work_day: self.work_calendar.last_work_day(),
            });
        }

        if !self.work_calendar.is_work_hour(submit_date.time()) {
            debug!(%submit_date, time = %submit_date.time(), "Rejected submit time outside the work hours");
            return Err(DueDateError::SubmitTimeNotWorkHour {
                work_hours_start: self.work_calendar.work_hours_start(),
                work_hours_end: self.work_calendar.work_hours_end(),
            });
        }

        if turnaround_time <= 0 {
            debug!(turnaround_time, "Rejected non-positive turnaround time");
            return Err(DueDateError::NonPositiveTurnaroundTime(turnaround_time));
        }

        Ok(submit_date)
    }

    fn advance_whole_days(&self, date: NaiveDateTime, turnaround_time: TurnaroundTime) -> Option<NaiveDateTime>
    {
        let total_work_days = turnaround_time / self.work_calendar.work_hours_per_day();
        let full_weeks = total_work_days / self.work_calendar.work_days_per_week();
        let extra_days = total_work_days % self.work_calendar.work_days_per_week();
        trace!(total_work_days, full_weeks, extra_days, "Advancing whole work days");

        // A calendar week holds exactly one work week, so the weekday is kept.
        let calendar_days = u64::try_from(full_weeks).ok()? * 7;
        let mut date = date.checked_add_days(Days::new(calendar_days))?;

        for _ in 0..extra_days {
            date = date.checked_add_days(Days::new(1))?;
            date = self.next_or_same_work_day(date)?;
        }

        Some(date)
    }

    fn advance_remaining_time(&self, date: NaiveDateTime, turnaround_time: TurnaroundTime) -> Option<NaiveDateTime>
    {
        let remaining_minutes: Minutes = Minutes::from(turnaround_time % self.work_calendar.work_hours_per_day()) * 60;
        let minutes_left = self.work_calendar.minutes_until_end_of_work_day(date.time());

        if remaining_minutes <= minutes_left {
            trace!(remaining_minutes, minutes_left, "Remaining time fits in the current work day");
            return date.checked_add_signed(TimeDelta::minutes(remaining_minutes));
        }

        let rollover_minutes = remaining_minutes - minutes_left;
        debug_assert!(
            rollover_minutes < self.work_calendar.work_minutes_per_day(),
            "rollover of {rollover_minutes} minutes does not fit in one work day"
        );
        trace!(remaining_minutes, minutes_left, rollover_minutes, "Rolling remaining time over to the next day");

        let next_day = date.date().checked_add_days(Days::new(1))?;
        let rolled_over = next_day
            .and_time(self.work_calendar.work_hours_start())
            .checked_add_signed(TimeDelta::minutes(rollover_minutes))?;

        self.next_or_same_work_day(rolled_over)
    }

    fn next_or_same_work_day(&self, date: NaiveDateTime) -> Option<NaiveDateTime>
    {
        if self.work_calendar.is_work_day(date.weekday()) {
            return Some(date);
        }

        self.work_calendar
            .next_first_work_day(date.date())
            .map(|work_day| work_day.and_time(date.time()))
    }
}
