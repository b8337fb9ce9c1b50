use std::fs;
use std::path::PathBuf;
use std::thread;

use chrono::Datelike;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use due_date::due_date_calculator::DueDateCalculator;
use serde::Deserialize;
use work_calendar::calendar::WorkCalendar;

/// One row of `due_date_cases.json`
#[derive(Deserialize, Debug)]
struct DueDateCase
{
    name: String,
    submit_date: NaiveDateTime,
    turnaround_time: i32,
    due_date: NaiveDateTime,
}

fn get_test_data_path(filename: &str) -> PathBuf
{
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir).join("tests").join(filename)
}

fn load_due_date_cases() -> Vec<DueDateCase>
{
    let cases_json = fs::read_to_string(get_test_data_path("due_date_cases.json")).expect("Failed to read due_date_cases.json");
    serde_json::from_str(&cases_json).expect("Failed to parse due_date_cases.json")
}

#[test]
fn test_due_date_cases()
{
    let due_date_calculator = DueDateCalculator::default();
    let due_date_cases = load_due_date_cases();

    assert!(!due_date_cases.is_empty(), "Expected at least one due date case");

    for case in &due_date_cases {
        let due_date = due_date_calculator.calculate_due_date(Some(case.submit_date), case.turnaround_time);

        assert_eq!(due_date, Ok(case.due_date), "case `{}`", case.name);
    }
}

#[test]
fn test_due_date_stays_within_work_calendar()
{
    let due_date_calculator = DueDateCalculator::default();
    let work_calendar = WorkCalendar::default();

    // Monday 2017-06-19 to Friday 2017-06-23, every minute from 09:00 to 17:00
    for day in 19..=23 {
        let work_day_start = NaiveDate::from_ymd_opt(2017, 6, day)
            .unwrap()
            .and_time(work_calendar.work_hours_start());

        for minute in 0..=work_calendar.work_minutes_per_day() {
            let submit_date = work_day_start + Duration::minutes(minute);

            for turnaround_time in 1..=40 {
                let due_date = due_date_calculator
                    .calculate_due_date(Some(submit_date), turnaround_time)
                    .unwrap();

                assert!(due_date > submit_date, "{submit_date} + {turnaround_time}h gave {due_date}");
                assert!(
                    work_calendar.is_work_day(due_date.weekday()),
                    "{submit_date} + {turnaround_time}h gave {due_date}, which is not a work day"
                );
                assert!(
                    work_calendar.is_work_hour(due_date.time()),
                    "{submit_date} + {turnaround_time}h gave {due_date}, which is outside the work hours"
                );
            }
        }
    }
}

#[test]
fn test_work_calendar_loaded_from_json()
{
    let calculator_json = r#"{
        "work_calendar": {
            "first_work_day": "Mon",
            "last_work_day": "Thu",
            "work_hours_start": "07:00:00",
            "work_hours_end": "17:00:00"
        }
    }"#;

    let due_date_calculator: DueDateCalculator = serde_json::from_str(calculator_json).expect("Failed to parse calculator");
    assert_eq!(due_date_calculator.work_calendar().work_hours_per_day(), 10);
    assert_eq!(due_date_calculator.work_calendar().work_days_per_week(), 4);

    // Thursday 16:00 plus 3 hours: one hour on Thursday, two on Monday.
    let submit_date = NaiveDate::from_ymd_opt(2017, 6, 22).unwrap().and_hms_opt(16, 0, 0).unwrap();
    let due_date = due_date_calculator.calculate_due_date(Some(submit_date), 3);

    assert_eq!(due_date, Ok(NaiveDate::from_ymd_opt(2017, 6, 26).unwrap().and_hms_opt(9, 0, 0).unwrap()));
}

#[test]
fn test_concurrent_calculations_do_not_interfere()
{
    let due_date_calculator = DueDateCalculator::default();
    let due_date_cases = load_due_date_cases();

    let sequential = due_date_cases
        .iter()
        .map(|case| due_date_calculator.calculate_due_date(Some(case.submit_date), case.turnaround_time))
        .collect::<Vec<_>>();

    let concurrent = thread::scope(|scope| {
        let handles = due_date_cases
            .iter()
            .map(|case| scope.spawn(move || due_date_calculator.calculate_due_date(Some(case.submit_date), case.turnaround_time)))
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("Calculation thread panicked"))
            .collect::<Vec<_>>()
    });

    assert_eq!(sequential, concurrent);
}
