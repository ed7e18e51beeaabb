use std::collections::BTreeMap;

use chrono::Duration;
use shared::{DomainError, DomainResult, Role};

use crate::domain::entities::{
    CarryForwardEntry, PreviousPlanContext, Schedule, Staff, TrailingAssignment, Vacation,
    VacationCalendar,
};

/// Tolerance for the per-group delta sum invariant.
const DELTA_SUM_EPSILON: f64 = 0.01;

/// Days of the previous quarter carried over as trailing assignments.
const TRAILING_DAYS: i64 = 21;

/// Derive the carry-forward context from a completed quarter: per-person
/// normalized loads, role-group means, signed deltas and the trailing
/// assignments needed for cross-quarter continuity.
pub fn build_previous_context(
    schedule: &Schedule,
    staff_list: &[Staff],
    vacations: &[Vacation],
) -> DomainResult<PreviousPlanContext> {
    let quarter_days = (schedule.quarter_end - schedule.quarter_start).num_days() + 1;
    if quarter_days <= 0 {
        return Err(DomainError::InvalidInput(
            "schedule quarter_end precedes quarter_start".into(),
        ));
    }
    let calendar = VacationCalendar::build(
        staff_list,
        vacations,
        schedule.quarter_start,
        schedule.quarter_end,
    )?;

    let mut sorted_staff: Vec<&Staff> = staff_list.iter().collect();
    sorted_staff.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    // Pass 1: raw loads and presence-normalized values
    let mut normalized: BTreeMap<&str, f64> = BTreeMap::new();
    let mut raw: BTreeMap<&str, (u32, f64, f64)> = BTreeMap::new();
    for staff in &sorted_staff {
        let weekend_shifts = schedule.count_weekend_shifts(&staff.identifier);
        let effective_nights = schedule.count_effective_nights(&staff.identifier, staff.role);
        let total = weekend_shifts as f64 + effective_nights;

        let available = calendar.available_days(&staff.identifier, quarter_days as u32);
        let normalized_40h = (total / staff.weekly_hours as f64)
            * 40.0
            * (quarter_days as f64 / available as f64);

        normalized.insert(&staff.identifier, normalized_40h);
        raw.insert(&staff.identifier, (weekend_shifts, effective_nights, total));
    }

    // Pass 2: role-group means
    let mut group_means: BTreeMap<Role, f64> = BTreeMap::new();
    for role in [Role::Tfa, Role::Azubi, Role::Intern] {
        let values: Vec<f64> = sorted_staff
            .iter()
            .filter(|s| s.role == role)
            .map(|s| normalized[s.identifier.as_str()])
            .collect();
        if !values.is_empty() {
            group_means.insert(role, values.iter().sum::<f64>() / values.len() as f64);
        }
    }

    let entries: Vec<CarryForwardEntry> = sorted_staff
        .iter()
        .map(|staff| {
            let (weekend_shifts, effective_nights, total) = raw[staff.identifier.as_str()];
            let normalized_40h = normalized[staff.identifier.as_str()];
            let group_mean_40h = group_means[&staff.role];
            CarryForwardEntry {
                identifier: staff.identifier.clone(),
                role: staff.role,
                hours: staff.weekly_hours,
                effective_nights,
                weekend_shifts,
                total_notdienst: total,
                normalized_40h,
                group_mean_40h,
                carry_forward_delta: normalized_40h - group_mean_40h,
            }
        })
        .collect();

    // Deltas inside any role group must cancel out
    for role in [Role::Tfa, Role::Azubi, Role::Intern] {
        let sum: f64 = entries
            .iter()
            .filter(|e| e.role == role)
            .map(|e| e.carry_forward_delta)
            .sum();
        if sum.abs() > DELTA_SUM_EPSILON {
            return Err(DomainError::Internal(format!(
                "carry-forward deltas of group {role} sum to {sum:.4}, expected ~0"
            )));
        }
    }

    // Trailing assignments: the last 21 days of the quarter
    let trailing_from = schedule.quarter_end - Duration::days(TRAILING_DAYS - 1);
    let mut trailing_assignments: Vec<TrailingAssignment> = schedule
        .assignments
        .iter()
        .filter(|a| a.shift.date >= trailing_from)
        .map(|a| TrailingAssignment {
            staff_identifier: a.staff_identifier.clone(),
            date: a.shift.date,
            shift_type: a.shift.shift_type,
        })
        .collect();
    trailing_assignments.sort_by(|a, b| {
        (a.date, a.shift_type, a.staff_identifier.as_str())
            .cmp(&(b.date, b.shift_type, b.staff_identifier.as_str()))
    });

    Ok(PreviousPlanContext {
        quarter_start: Some(schedule.quarter_start),
        quarter_end: Some(schedule.quarter_end),
        entries,
        trailing_assignments,
    })
}
