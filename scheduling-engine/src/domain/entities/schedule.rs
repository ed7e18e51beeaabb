use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Role, ShiftType};

use super::shift::Shift;

/// Assignment of a staff member to a shift.
///
/// `is_paired` is only meaningful on night shifts and records whether the
/// night was staffed by a two-person crew. Fairness math never trusts this
/// flag and recomputes pairing from the per-night headcount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub shift: Shift,
    pub staff_identifier: String,
    #[serde(default)]
    pub is_paired: bool,
}

impl Assignment {
    pub fn new(shift: Shift, staff_identifier: impl Into<String>, is_paired: bool) -> Self {
        Self {
            shift,
            staff_identifier: staff_identifier.into(),
            is_paired,
        }
    }
}

/// Complete schedule for one quarter.
///
/// `quarter_end` is the last day included in the horizon
/// (`quarter_start + 90` for a full quarter).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub quarter_start: NaiveDate,
    pub quarter_end: NaiveDate,
    pub assignments: Vec<Assignment>,
}

impl Schedule {
    pub fn new(quarter_start: NaiveDate, quarter_end: NaiveDate) -> Self {
        Self {
            quarter_start,
            quarter_end,
            assignments: Vec::new(),
        }
    }

    pub fn staff_assignments<'a>(
        &'a self,
        staff_identifier: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments
            .iter()
            .filter(move |a| a.staff_identifier == staff_identifier)
    }

    /// Number of staff assigned per night date.
    pub fn night_headcounts(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for assignment in &self.assignments {
            if assignment.shift.is_night_shift() {
                *counts.entry(assignment.shift.date).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Assignments grouped by shift slot.
    pub fn slot_assignments(&self) -> BTreeMap<(NaiveDate, ShiftType), Vec<&Assignment>> {
        let mut slots: BTreeMap<(NaiveDate, ShiftType), Vec<&Assignment>> = BTreeMap::new();
        for assignment in &self.assignments {
            slots
                .entry((assignment.shift.date, assignment.shift.shift_type))
                .or_default()
                .push(assignment);
        }
        slots
    }

    pub fn count_weekend_shifts(&self, staff_identifier: &str) -> u32 {
        self.staff_assignments(staff_identifier)
            .filter(|a| a.shift.is_weekend_shift())
            .count() as u32
    }

    /// Effective nights with pairing recomputed from per-night headcount:
    /// a night shared by two people counts half for TFA and interns, Azubi
    /// nights always count full.
    pub fn count_effective_nights(&self, staff_identifier: &str, role: Role) -> f64 {
        let headcounts = self.night_headcounts();
        self.staff_assignments(staff_identifier)
            .filter(|a| a.shift.is_night_shift())
            .map(|a| {
                if role == Role::Azubi {
                    1.0
                } else if headcounts.get(&a.shift.date).copied().unwrap_or(0) >= 2 {
                    0.5
                } else {
                    1.0
                }
            })
            .sum()
    }

    pub fn count_night_shifts(&self, staff_identifier: &str) -> u32 {
        self.staff_assignments(staff_identifier)
            .filter(|a| a.shift.is_night_shift())
            .count() as u32
    }

    /// Total Notdienst: weekend shifts plus effective nights.
    pub fn count_total_notdienst(&self, staff_identifier: &str, role: Role) -> f64 {
        self.count_weekend_shifts(staff_identifier) as f64
            + self.count_effective_nights(staff_identifier, role)
    }

    /// Night dates of one staff member, ascending.
    pub fn night_dates(&self, staff_identifier: &str) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .staff_assignments(staff_identifier)
            .filter(|a| a.shift.is_night_shift())
            .map(|a| a.shift.date)
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn night(date: (i32, u32, u32), shift_type: ShiftType, who: &str, paired: bool) -> Assignment {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        Assignment::new(Shift::new(date, shift_type), who, paired)
    }

    #[test]
    fn effective_nights_ignore_the_stored_flag() {
        let mut schedule = Schedule::new(
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        );
        // Two people on Apr 1, flag wrongly says unpaired
        schedule.assignments.push(night((2026, 4, 1), ShiftType::NightWedThu, "T1", false));
        schedule.assignments.push(night((2026, 4, 1), ShiftType::NightWedThu, "AZ1", false));
        // One person on Apr 2, flag wrongly says paired
        schedule.assignments.push(night((2026, 4, 2), ShiftType::NightThuFri, "T1", true));

        assert_eq!(schedule.count_effective_nights("T1", Role::Tfa), 0.5 + 1.0);
        // Azubi always counts full even when the night was shared
        assert_eq!(schedule.count_effective_nights("AZ1", Role::Azubi), 1.0);
    }

    #[test]
    fn total_notdienst_combines_weekends_and_nights() {
        let mut schedule = Schedule::new(
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        );
        let saturday = NaiveDate::from_ymd_opt(2026, 4, 4).unwrap();
        schedule
            .assignments
            .push(Assignment::new(Shift::new(saturday, ShiftType::Saturday1022), "T1", false));
        schedule.assignments.push(night((2026, 4, 7), ShiftType::NightTueWed, "T1", false));
        schedule.assignments.push(night((2026, 4, 8), ShiftType::NightWedThu, "T1", false));

        assert_eq!(schedule.count_weekend_shifts("T1"), 1);
        assert_eq!(schedule.count_night_shifts("T1"), 2);
        assert_eq!(schedule.count_total_notdienst("T1", Role::Tfa), 3.0);
        assert_eq!(schedule.night_dates("T1").len(), 2);
    }
}
