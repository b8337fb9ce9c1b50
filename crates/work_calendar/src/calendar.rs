use chrono::Datelike;
use chrono::Days;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Weekday;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::Minutes;
use crate::WorkHours;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WorkCalendarError
{
    #[error("first work day {first_work_day} comes after last work day {last_work_day}")]
    InvertedWorkWeek
    {
        first_work_day: Weekday,
        last_work_day: Weekday,
    },
    #[error("work hours start {work_hours_start} is not before work hours end {work_hours_end}")]
    InvertedWorkHours
    {
        work_hours_start: NaiveTime,
        work_hours_end: NaiveTime,
    },
    #[error("work day from {work_hours_start} to {work_hours_end} is shorter than one hour")]
    WorkDayShorterThanOneHour
    {
        work_hours_start: NaiveTime,
        work_hours_end: NaiveTime,
    },
}

/// A fixed weekly work calendar: a contiguous range of work days and a
/// single window of work hours that applies to each of them.
///
/// The value is immutable once built. Deserialization runs the same checks
/// as [`WorkCalendar::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WorkCalendarFields")]
pub struct WorkCalendar
{
    first_work_day: Weekday,
    last_work_day: Weekday,
    work_hours_start: NaiveTime,
    work_hours_end: NaiveTime,
}

#[derive(Deserialize)]
struct WorkCalendarFields
{
    first_work_day: Weekday,
    last_work_day: Weekday,
    work_hours_start: NaiveTime,
    work_hours_end: NaiveTime,
}

impl TryFrom<WorkCalendarFields> for WorkCalendar
{
    type Error = WorkCalendarError;

    fn try_from(fields: WorkCalendarFields) -> Result<Self, Self::Error>
    {
        Self::new(fields.first_work_day, fields.last_work_day, fields.work_hours_start, fields.work_hours_end)
    }
}

const fn on_the_hour(hour: u32) -> NaiveTime
{
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => time,
        None => panic!("hour out of range"),
    }
}

impl WorkCalendar
{
    /// Monday to Friday, 09:00 to 17:00.
    pub const STANDARD: Self = Self {
        first_work_day: Weekday::Mon,
        last_work_day: Weekday::Fri,
        work_hours_start: on_the_hour(9),
        work_hours_end: on_the_hour(17),
    };

    pub fn new(
        first_work_day: Weekday,
        last_work_day: Weekday,
        work_hours_start: NaiveTime,
        work_hours_end: NaiveTime,
    ) -> Result<Self, WorkCalendarError>
    {
        if first_work_day.num_days_from_monday() > last_work_day.num_days_from_monday() {
            return Err(WorkCalendarError::InvertedWorkWeek {
                first_work_day,
                last_work_day,
            });
        }

        if work_hours_start >= work_hours_end {
            return Err(WorkCalendarError::InvertedWorkHours {
                work_hours_start,
                work_hours_end,
            });
        }

        let work_calendar = Self {
            first_work_day,
            last_work_day,
            work_hours_start,
            work_hours_end,
        };

        if work_calendar.work_hours_per_day() < 1 {
            return Err(WorkCalendarError::WorkDayShorterThanOneHour {
                work_hours_start,
                work_hours_end,
            });
        }

        Ok(work_calendar)
    }

    pub fn first_work_day(&self) -> Weekday
    {
        self.first_work_day
    }

    pub fn last_work_day(&self) -> Weekday
    {
        self.last_work_day
    }

    pub fn work_hours_start(&self) -> NaiveTime
    {
        self.work_hours_start
    }

    pub fn work_hours_end(&self) -> NaiveTime
    {
        self.work_hours_end
    }

    /// Whole hours in the work window. A trailing partial hour is dropped.
    pub fn work_hours_per_day(&self) -> WorkHours
    {
        (self.work_hours_end - self.work_hours_start).num_hours() as WorkHours
    }

    pub fn work_minutes_per_day(&self) -> Minutes
    {
        Minutes::from(self.work_hours_per_day()) * 60
    }

    pub fn work_days_per_week(&self) -> i32
    {
        (self.last_work_day.num_days_from_monday() - self.first_work_day.num_days_from_monday() + 1) as i32
    }

    pub fn is_work_day(&self, weekday: Weekday) -> bool
    {
        (self.first_work_day.num_days_from_monday()..=self.last_work_day.num_days_from_monday()).contains(&weekday.num_days_from_monday())
    }

    /// Both ends of the work window count as work hours.
    pub fn is_work_hour(&self, time: NaiveTime) -> bool
    {
        self.work_hours_start <= time && time <= self.work_hours_end
    }

    /// Whole minutes from `time` until the end of the work window, truncated.
    /// Negative when `time` is already past the end.
    pub fn minutes_until_end_of_work_day(&self, time: NaiveTime) -> Minutes
    {
        (self.work_hours_end - time).num_minutes()
    }

    /// The next first work day strictly after `date`. Returns `None` when that
    /// day is outside the range `NaiveDate` can represent.
    pub fn next_first_work_day(&self, date: NaiveDate) -> Option<NaiveDate>
    {
        let days_ahead = match (7 + self.first_work_day.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7 {
            0 => 7,
            days => days,
        };
        date.checked_add_days(Days::new(u64::from(days_ahead)))
    }
}

impl Default for WorkCalendar
{
    fn default() -> Self
    {
        Self::STANDARD
    }
}
