use shared::Role;

use super::{format_date, ConstraintViolation, Rule, ValidationContext};

/// Minors cannot work Sundays.
pub struct MinorSundayRule;

impl Rule for MinorSundayRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        for assignment in &context.schedule.assignments {
            if !assignment.shift.shift_type.is_sunday_shift() {
                continue;
            }
            if let Some(staff) = context.staff_for(assignment) {
                if !staff.adult {
                    violations.push(ConstraintViolation::hard(
                        "Minor Sunday Ban",
                        format!(
                            "Minor {} assigned to Sunday shift on {}",
                            staff.name,
                            format_date(assignment.shift.date)
                        ),
                    ));
                }
            }
        }
        violations
    }
}

/// Interns never work weekends.
pub struct InternWeekendRule;

impl Rule for InternWeekendRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        for assignment in &context.schedule.assignments {
            if !assignment.shift.is_weekend_shift() {
                continue;
            }
            if let Some(staff) = context.staff_for(assignment) {
                if staff.role == Role::Intern {
                    violations.push(ConstraintViolation::hard(
                        "Intern Weekend Ban",
                        format!(
                            "Intern {} assigned to weekend shift on {}",
                            staff.name,
                            format_date(assignment.shift.date)
                        ),
                    ));
                }
            }
        }
        violations
    }
}

/// Every assignment must resolve to a known staff member who is eligible
/// for the shift type on that date.
pub struct ShiftEligibilityRule;

impl Rule for ShiftEligibilityRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        for assignment in &context.schedule.assignments {
            let Some(staff) = context.staff_for(assignment) else {
                violations.push(ConstraintViolation::hard(
                    "Unknown Staff",
                    format!(
                        "Staff {} not found in staff list",
                        assignment.staff_identifier
                    ),
                ));
                continue;
            };
            if !staff.can_work(assignment.shift.shift_type, assignment.shift.date) {
                violations.push(ConstraintViolation::hard(
                    "Shift Eligibility",
                    format!(
                        "{} not eligible for {} on {}",
                        staff.name,
                        assignment.shift.shift_type,
                        format_date(assignment.shift.date)
                    ),
                ));
            }
        }
        violations
    }
}

/// Night shifts must respect the staff member's excluded weekdays.
pub struct NightExceptionRule;

impl Rule for NightExceptionRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        for assignment in &context.schedule.assignments {
            if !assignment.shift.is_night_shift() {
                continue;
            }
            if let Some(staff) = context.staff_for(assignment) {
                let weekday = shared::time::iso_weekday(assignment.shift.date);
                if staff.night_exception_weekdays.contains(&weekday) {
                    violations.push(ConstraintViolation::hard(
                        "ND Exception Weekday",
                        format!(
                            "{} assigned night shift on {} (weekday {} in exceptions)",
                            staff.name,
                            format_date(assignment.shift.date),
                            weekday
                        ),
                    ));
                }
            }
        }
        violations
    }
}

/// No assignments on vacation days or birthdays.
pub struct BlackoutRule;

impl Rule for BlackoutRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let Some(calendar) = context.calendar else {
            return Vec::new();
        };
        let mut violations = Vec::new();
        for assignment in &context.schedule.assignments {
            if !calendar.is_blocked(&assignment.staff_identifier, assignment.shift.date) {
                continue;
            }
            let is_birthday = context
                .staff_for(assignment)
                .and_then(|s| s.birthday)
                .and_then(|b| b.in_year(chrono::Datelike::year(&assignment.shift.date)))
                .is_some_and(|d| d == assignment.shift.date);
            let (name, kind) = if is_birthday {
                ("Birthday Conflict", "birthday")
            } else {
                ("Vacation Conflict", "vacation day")
            };
            violations.push(ConstraintViolation::hard(
                name,
                format!(
                    "{} assigned on {} despite {}",
                    context.display_name(&assignment.staff_identifier),
                    format_date(assignment.shift.date),
                    kind
                ),
            ));
        }
        violations
    }
}
