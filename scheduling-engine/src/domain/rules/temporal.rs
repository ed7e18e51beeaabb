use chrono::Duration;

use super::{format_date, ConstraintViolation, Rule, ValidationContext};

/// Weekend shifts stand alone: no other duty on the day before or after.
pub struct WeekendIsolationRule;

impl Rule for WeekendIsolationRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (staff_identifier, assignments) in &context.by_staff {
            for assignment in assignments {
                if !assignment.shift.is_weekend_shift() {
                    continue;
                }
                let date = assignment.shift.date;
                for neighbor in [date - Duration::days(1), date + Duration::days(1)] {
                    if context.works_on(staff_identifier, neighbor) {
                        violations.push(ConstraintViolation::hard(
                            "Weekend Isolation",
                            format!(
                                "{} has duty on {} adjacent to weekend shift on {}",
                                context.display_name(staff_identifier),
                                format_date(neighbor),
                                format_date(date)
                            ),
                        ));
                    }
                }
            }
        }

        violations
    }
}

/// No day (weekend) duty on the same day as a night shift or the morning
/// after; the previous quarter's last night counts across the boundary.
pub struct NightDayConflictRule;

impl Rule for NightDayConflictRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (staff_identifier, assignments) in &context.by_staff {
            let night_dates: Vec<_> = assignments
                .iter()
                .filter(|a| a.shift.is_night_shift())
                .map(|a| a.shift.date)
                .collect();

            for assignment in assignments {
                if !assignment.shift.is_weekend_shift() {
                    continue;
                }
                let weekend_date = assignment.shift.date;
                if night_dates
                    .iter()
                    .any(|&n| n == weekend_date || n + Duration::days(1) == weekend_date)
                {
                    violations.push(ConstraintViolation::hard(
                        "Night/Day Conflict",
                        format!(
                            "{} has day shift on {} conflicting with a night shift",
                            context.display_name(staff_identifier),
                            format_date(weekend_date)
                        ),
                    ));
                    continue;
                }
                // Cross-quarter boundary: last night of the previous quarter
                if let Some(previous) = context.previous {
                    if previous.last_trailing_night(staff_identifier)
                        == Some(weekend_date - Duration::days(1))
                    {
                        violations.push(ConstraintViolation::hard(
                            "Night/Day Conflict",
                            format!(
                                "{} has day shift on {} right after the previous quarter's last night",
                                context.display_name(staff_identifier),
                                format_date(weekend_date)
                            ),
                        ));
                    }
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PreviousPlanContext, Schedule, TrailingAssignment};
    use crate::domain::test_fixtures::*;
    use shared::ShiftType;

    #[test]
    fn duty_next_to_weekend_shift_is_flagged() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        assign(&mut schedule, (2026, 4, 4), ShiftType::Saturday1022, "T1", false);
        assign_night(&mut schedule, (2026, 4, 3), "T1", false); // Friday night before

        let context = ValidationContext::new(&schedule, &staff, None, None);
        let violations = WeekendIsolationRule.check(&context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_name, "Weekend Isolation");
    }

    #[test]
    fn isolated_weekend_shift_is_fine() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        assign(&mut schedule, (2026, 4, 4), ShiftType::Saturday1022, "T1", false);
        assign_night(&mut schedule, (2026, 4, 7), "T1", false);

        let context = ValidationContext::new(&schedule, &staff, None, None);
        assert!(WeekendIsolationRule.check(&context).is_empty());
    }

    #[test]
    fn night_before_weekend_day_shift_is_flagged() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        // Night Fri Apr 10, weekend day shift Sat Apr 11
        assign_night(&mut schedule, (2026, 4, 10), "T1", false);
        assign(&mut schedule, (2026, 4, 11), ShiftType::Saturday1022, "T1", false);

        let context = ValidationContext::new(&schedule, &staff, None, None);
        let violations = NightDayConflictRule.check(&context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_name, "Night/Day Conflict");
    }

    #[test]
    fn trailing_night_blocks_first_day_weekend() {
        let staff = vec![tfa("T1")];
        // A quarter starting on a Saturday: 2028-01-01
        let start = date(2028, 1, 1);
        let mut schedule = Schedule::new(start, date(2028, 3, 31));
        assign(&mut schedule, (2028, 1, 1), ShiftType::Saturday1022, "T1", false);

        let previous = PreviousPlanContext {
            quarter_start: Some(date(2027, 10, 1)),
            quarter_end: Some(date(2027, 12, 31)),
            entries: vec![],
            trailing_assignments: vec![TrailingAssignment {
                staff_identifier: "T1".into(),
                date: date(2027, 12, 31),
                shift_type: ShiftType::NightFriSat,
            }],
        };

        let context = ValidationContext::new(&schedule, &staff, None, Some(&previous));
        let violations = NightDayConflictRule.check(&context);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].description.contains("previous quarter"));
    }
}
