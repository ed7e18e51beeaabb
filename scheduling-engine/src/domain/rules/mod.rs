pub mod blocks;
pub mod consecutive;
pub mod coverage;
pub mod department;
pub mod eligibility;
pub mod pairing;
pub mod penalty;
pub mod temporal;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use shared::ShiftType;

use crate::domain::catalogue;
use crate::domain::entities::{
    Assignment, PreviousPlanContext, Schedule, Staff, VacationCalendar,
};
use crate::domain::runs::{consecutive_runs, DutyRun};

pub use blocks::BlockSpacingRule;
pub use consecutive::{NightMaxConsecutiveRule, NightMinConsecutiveRule};
pub use coverage::{SameDayRule, ShiftCoverageRule};
pub use department::{DepartmentConsecutiveRule, DepartmentSameNightRule};
pub use eligibility::{
    BlackoutRule, InternWeekendRule, MinorSundayRule, NightExceptionRule, ShiftEligibilityRule,
};
pub use pairing::{AzubiNightRule, InternNightCapRule, NdAloneRule, NightPairingRule};
pub use temporal::{NightDayConflictRule, WeekendIsolationRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Hard,
    Soft,
}

/// A single constraint violation with a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub constraint_name: String,
    pub description: String,
    pub severity: Severity,
}

impl ConstraintViolation {
    pub fn hard(constraint_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            description: description.into(),
            severity: Severity::Hard,
        }
    }
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Hard => "HARD",
            Severity::Soft => "SOFT",
        };
        write!(f, "[{severity}] {}: {}", self.constraint_name, self.description)
    }
}

/// Pre-indexed view of a schedule, shared by all rule checks.
pub struct ValidationContext<'a> {
    pub schedule: &'a Schedule,
    pub staff: BTreeMap<&'a str, &'a Staff>,
    pub calendar: Option<&'a VacationCalendar>,
    pub previous: Option<&'a PreviousPlanContext>,
    /// Assignments per staff member, sorted by date
    pub by_staff: BTreeMap<&'a str, Vec<&'a Assignment>>,
    /// Night assignments per date
    pub nights_by_date: BTreeMap<NaiveDate, Vec<&'a Assignment>>,
    /// Assignments per catalogue slot
    pub slots: BTreeMap<(NaiveDate, ShiftType), Vec<&'a Assignment>>,
    /// Slots the catalogue requires for this schedule's date range
    pub expected_slots: Vec<crate::domain::entities::Shift>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        schedule: &'a Schedule,
        staff_list: &'a [Staff],
        calendar: Option<&'a VacationCalendar>,
        previous: Option<&'a PreviousPlanContext>,
    ) -> Self {
        let staff: BTreeMap<&str, &Staff> =
            staff_list.iter().map(|s| (s.identifier.as_str(), s)).collect();

        let mut by_staff: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
        let mut nights_by_date: BTreeMap<NaiveDate, Vec<&Assignment>> = BTreeMap::new();
        let mut slots: BTreeMap<(NaiveDate, ShiftType), Vec<&Assignment>> = BTreeMap::new();

        for assignment in &schedule.assignments {
            by_staff
                .entry(assignment.staff_identifier.as_str())
                .or_default()
                .push(assignment);
            if assignment.shift.is_night_shift() {
                nights_by_date.entry(assignment.shift.date).or_default().push(assignment);
            }
            slots
                .entry((assignment.shift.date, assignment.shift.shift_type))
                .or_default()
                .push(assignment);
        }
        for assignments in by_staff.values_mut() {
            assignments.sort_by_key(|a| (a.shift.date, a.shift.shift_type));
        }

        let expected_slots = catalogue::shifts_between(schedule.quarter_start, schedule.quarter_end);

        Self {
            schedule,
            staff,
            calendar,
            previous,
            by_staff,
            nights_by_date,
            slots,
            expected_slots,
        }
    }

    pub fn staff_for(&self, assignment: &Assignment) -> Option<&'a Staff> {
        self.staff.get(assignment.staff_identifier.as_str()).copied()
    }

    pub fn display_name(&self, staff_identifier: &'a str) -> &'a str {
        self.staff
            .get(staff_identifier)
            .map(|s| s.name.as_str())
            .unwrap_or(staff_identifier)
    }

    /// Does the staff member have any assignment on the given date?
    pub fn works_on(&self, staff_identifier: &str, date: NaiveDate) -> bool {
        self.by_staff
            .get(staff_identifier)
            .is_some_and(|assignments| assignments.iter().any(|a| a.shift.date == date))
    }

    /// Night duty dates of a staff member, trailing nights from the
    /// previous quarter included so runs merge across the boundary.
    pub fn night_dates_with_trailing(&self, staff_identifier: &str) -> BTreeSet<NaiveDate> {
        let mut dates: BTreeSet<NaiveDate> = self
            .by_staff
            .get(staff_identifier)
            .map(|assignments| {
                assignments
                    .iter()
                    .filter(|a| a.shift.is_night_shift())
                    .map(|a| a.shift.date)
                    .collect()
            })
            .unwrap_or_default();
        if let Some(previous) = self.previous {
            dates.extend(previous.trailing_night_dates(staff_identifier));
        }
        dates
    }

    /// Maximal night runs of a staff member, boundary-merged.
    pub fn night_runs(&self, staff_identifier: &str) -> Vec<DutyRun> {
        consecutive_runs(&self.night_dates_with_trailing(staff_identifier))
    }

    /// Night runs that touch the current quarter.
    pub fn night_runs_in_quarter(&self, staff_identifier: &str) -> Vec<DutyRun> {
        self.night_runs(staff_identifier)
            .into_iter()
            .filter(|run| run.end >= self.schedule.quarter_start)
            .collect()
    }
}

/// One family of hard-constraint checks.
pub trait Rule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation>;
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
