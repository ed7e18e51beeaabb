use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{format_date, ConstraintViolation, Rule, ValidationContext};

/// Every catalogue slot must be staffed: exactly one person on weekend
/// shifts, one or two on nights, within the vet-present night caps.
pub struct ShiftCoverageRule;

impl Rule for ShiftCoverageRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for slot in &context.expected_slots {
            let assigned = context
                .slots
                .get(&(slot.date, slot.shift_type))
                .map(|a| a.as_slice())
                .unwrap_or(&[]);
            let count = assigned.len();

            if slot.is_weekend_shift() {
                if count != 1 {
                    violations.push(ConstraintViolation::hard(
                        "Shift Coverage",
                        format!(
                            "Weekend shift {} on {} has {} staff (need exactly 1)",
                            slot.shift_type,
                            format_date(slot.date),
                            count
                        ),
                    ));
                }
                continue;
            }

            // Night slots
            if count == 0 {
                violations.push(ConstraintViolation::hard(
                    "Shift Coverage",
                    format!(
                        "Night shift {} on {} has no coverage",
                        slot.shift_type,
                        format_date(slot.date)
                    ),
                ));
                continue;
            }
            if count > 2 {
                violations.push(ConstraintViolation::hard(
                    "Shift Coverage",
                    format!(
                        "Night shift {} on {} has {} staff (max 2)",
                        slot.shift_type,
                        format_date(slot.date),
                        count
                    ),
                ));
            }

            let non_azubi = assigned
                .iter()
                .filter(|a| {
                    context
                        .staff_for(a)
                        .map(|s| s.role != shared::Role::Azubi)
                        .unwrap_or(false)
                })
                .count();

            if non_azubi == 0 {
                violations.push(ConstraintViolation::hard(
                    "Intern Night No Non-Azubi",
                    format!(
                        "Night {} on {} has no TFA or intern on duty",
                        slot.shift_type,
                        format_date(slot.date)
                    ),
                ));
            }

            if slot.shift_type.is_vet_present_night() && non_azubi > 1 {
                violations.push(ConstraintViolation::hard(
                    "Vet Night Over Capacity",
                    format!(
                        "Vet-present night {} on {} has {} non-Azubi staff (need exactly 1)",
                        slot.shift_type,
                        format_date(slot.date),
                        non_azubi
                    ),
                ));
            }
        }

        violations
    }
}

/// At most one shift per person per day.
pub struct SameDayRule;

impl Rule for SameDayRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        for (staff_identifier, assignments) in &context.by_staff {
            let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
            for assignment in assignments {
                *per_day.entry(assignment.shift.date).or_insert(0) += 1;
            }
            for (date, count) in per_day {
                if count > 1 {
                    violations.push(ConstraintViolation::hard(
                        "Same Day Double Booking",
                        format!(
                            "{} has {} shifts on {}",
                            context.display_name(staff_identifier),
                            count,
                            format_date(date)
                        ),
                    ));
                }
            }
        }
        violations
    }
}
