use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::{DomainError, DomainResult};

use super::staff::Staff;

/// A vacation interval, end inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vacation {
    pub staff_identifier: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Vacation {
    pub fn new(
        staff_identifier: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<Self> {
        if end_date < start_date {
            return Err(DomainError::InvalidInput(format!(
                "vacation ends before it starts: {start_date} > {end_date}"
            )));
        }
        Ok(Self {
            staff_identifier: staff_identifier.into(),
            start_date,
            end_date,
        })
    }
}

/// Per-staff blackout days inside one quarter: vacation days plus the
/// birthday, which acts as a single-day vacation. Vacation days are kept
/// separately because presence normalization only discounts vacations.
#[derive(Debug, Clone, Default)]
pub struct VacationCalendar {
    blocked: BTreeMap<String, BTreeSet<NaiveDate>>,
    vacation_days: BTreeMap<String, u32>,
}

impl VacationCalendar {
    pub fn build(
        staff: &[Staff],
        vacations: &[Vacation],
        quarter_start: NaiveDate,
        quarter_end: NaiveDate,
    ) -> DomainResult<Self> {
        let known: BTreeSet<&str> = staff.iter().map(|s| s.identifier.as_str()).collect();
        let mut calendar = VacationCalendar::default();

        for vacation in vacations {
            if !known.contains(vacation.staff_identifier.as_str()) {
                return Err(DomainError::UnknownStaff(vacation.staff_identifier.clone()));
            }
            if vacation.end_date < vacation.start_date {
                return Err(DomainError::InvalidInput(format!(
                    "vacation ends before it starts: {} > {}",
                    vacation.start_date, vacation.end_date
                )));
            }
            let mut date = vacation.start_date.max(quarter_start);
            let last = vacation.end_date.min(quarter_end);
            while date <= last {
                let days = calendar
                    .blocked
                    .entry(vacation.staff_identifier.clone())
                    .or_default();
                if days.insert(date) {
                    *calendar
                        .vacation_days
                        .entry(vacation.staff_identifier.clone())
                        .or_insert(0) += 1;
                }
                date += Duration::days(1);
            }
        }

        for member in staff {
            if let Some(birthday) = member.birthday {
                for year in [quarter_start.year(), quarter_end.year()] {
                    if let Some(date) = birthday.in_year(year) {
                        if date >= quarter_start && date <= quarter_end {
                            calendar
                                .blocked
                                .entry(member.identifier.clone())
                                .or_default()
                                .insert(date);
                        }
                    }
                }
            }
        }

        Ok(calendar)
    }

    pub fn is_blocked(&self, staff_identifier: &str, date: NaiveDate) -> bool {
        self.blocked
            .get(staff_identifier)
            .is_some_and(|days| days.contains(&date))
    }

    /// Vacation days (birthdays excluded) falling inside the quarter.
    pub fn vacation_day_count(&self, staff_identifier: &str) -> u32 {
        self.vacation_days.get(staff_identifier).copied().unwrap_or(0)
    }

    /// Presence-adjusted available days; a fully absent person counts as
    /// one day to keep divisions defined.
    pub fn available_days(&self, staff_identifier: &str, quarter_days: u32) -> u32 {
        quarter_days
            .saturating_sub(self.vacation_day_count(staff_identifier))
            .max(1)
    }
}
