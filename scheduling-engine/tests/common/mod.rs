//! Shared roster fixtures for the integration suites.
#![allow(dead_code)]

use std::collections::BTreeSet;

use chrono::NaiveDate;
use scheduling_engine::Staff;
use shared::{Department, Role};

pub fn q2_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

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

/// A comfortably staffed practice: six TFAs (two of them in restricted
/// departments), four Azubis (one night-capable), two night interns.
pub fn practice_roster() -> Vec<Staff> {
    let mut t1 = tfa("T1");
    t1.department = Department::Op;
    let mut t2 = tfa("T2");
    t2.department = Department::Station;
    let mut t4 = tfa("T4");
    t4.department = Department::Op;

    let mut a1 = azubi("A1");
    a1.night_possible = true;

    vec![
        t1,
        t2,
        tfa("T3"),
        t4,
        tfa("T5"),
        tfa("T6"),
        a1,
        azubi("A2"),
        azubi("A3"),
        azubi("A4"),
        intern("I1"),
        intern("I2"),
    ]
}
