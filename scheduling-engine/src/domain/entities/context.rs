use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Role, ShiftType};

/// One assignment from the tail of the previous quarter, carried over so
/// block spacing and consecutive-night rules work across the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrailingAssignment {
    pub staff_identifier: String,
    pub date: NaiveDate,
    pub shift_type: ShiftType,
}

/// Per-person summary of the previous quarter's load.
///
/// Computed once by the carry-forward builder and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarryForwardEntry {
    pub identifier: String,
    pub role: Role,
    pub hours: u32,
    pub effective_nights: f64,
    pub weekend_shifts: u32,
    pub total_notdienst: f64,
    pub normalized_40h: f64,
    pub group_mean_40h: f64,
    /// normalized_40h minus the role-group mean; sums to ~0 inside a group
    pub carry_forward_delta: f64,
}

/// Summary of the immediately preceding quarter, fed back into the next
/// scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PreviousPlanContext {
    pub quarter_start: Option<NaiveDate>,
    pub quarter_end: Option<NaiveDate>,
    pub entries: Vec<CarryForwardEntry>,
    /// Assignments from the last 21 days of the previous quarter
    pub trailing_assignments: Vec<TrailingAssignment>,
}

impl PreviousPlanContext {
    pub fn delta_for(&self, staff_identifier: &str) -> f64 {
        self.entries
            .iter()
            .find(|e| e.identifier == staff_identifier)
            .map(|e| e.carry_forward_delta)
            .unwrap_or(0.0)
    }

    /// Dates of trailing night assignments of one staff member.
    pub fn trailing_night_dates(&self, staff_identifier: &str) -> BTreeSet<NaiveDate> {
        self.trailing_assignments
            .iter()
            .filter(|t| t.staff_identifier == staff_identifier && t.shift_type.is_night_shift())
            .map(|t| t.date)
            .collect()
    }

    /// The last night the staff member worked in the previous quarter.
    pub fn last_trailing_night(&self, staff_identifier: &str) -> Option<NaiveDate> {
        self.trailing_night_dates(staff_identifier).into_iter().next_back()
    }
}
