//! Hand-built staff and schedule helpers for unit tests.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use shared::{Department, Role, ShiftType};

use crate::domain::entities::{Assignment, Schedule, Shift, Staff};

pub fn tfa(identifier: &str) -> Staff {
    Staff {
        identifier: identifier.to_string(),
        name: identifier.to_string(),
        role: Role::Tfa,
        adult: true,
        weekly_hours: 40,
        department: Department::Other,
        reception_capable: true,
        night_possible: true,
        night_alone: true,
        night_max_consecutive: None,
        night_min_consecutive: 2,
        night_exception_weekdays: BTreeSet::new(),
        birthday: None,
    }
}

pub fn azubi(identifier: &str) -> Staff {
    Staff {
        role: Role::Azubi,
        night_possible: false,
        night_alone: false,
        night_min_consecutive: 1,
        ..tfa(identifier)
    }
}

pub fn intern(identifier: &str) -> Staff {
    Staff {
        role: Role::Intern,
        reception_capable: false,
        ..tfa(identifier)
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Empty schedule for Q2/2026 (Apr 1 - Jun 30).
pub fn q2_2026_schedule() -> Schedule {
    Schedule::new(date(2026, 4, 1), date(2026, 6, 30))
}

pub fn assign(
    schedule: &mut Schedule,
    day: (i32, u32, u32),
    shift_type: ShiftType,
    staff_identifier: &str,
    is_paired: bool,
) {
    schedule.assignments.push(Assignment::new(
        Shift::new(date(day.0, day.1, day.2), shift_type),
        staff_identifier,
        is_paired,
    ));
}

/// Night shift assignment with the shift type derived from the date.
pub fn assign_night(
    schedule: &mut Schedule,
    day: (i32, u32, u32),
    staff_identifier: &str,
    is_paired: bool,
) {
    use chrono::Datelike;
    let night_date = date(day.0, day.1, day.2);
    let shift_type = ShiftType::night_for_weekday(night_date.weekday());
    schedule.assignments.push(Assignment::new(
        Shift::new(night_date, shift_type),
        staff_identifier,
        is_paired,
    ));
}
