use super::{format_date, ConstraintViolation, Rule, ValidationContext};

/// No night run may exceed the staff member's `night_max_consecutive`.
pub struct NightMaxConsecutiveRule;

impl Rule for NightMaxConsecutiveRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (identifier, staff) in &context.staff {
            let Some(max) = staff.night_max_consecutive else {
                continue;
            };
            for run in context.night_runs_in_quarter(identifier) {
                if run.length_days() > max {
                    violations.push(ConstraintViolation::hard(
                        "Night Max Consecutive",
                        format!(
                            "{} works {} consecutive nights from {} (max {})",
                            staff.name,
                            run.length_days(),
                            format_date(run.start),
                            max
                        ),
                    ));
                }
            }
        }

        violations
    }
}

/// Night runs must reach the staff member's `night_min_consecutive`;
/// trailing nights from the previous quarter extend boundary runs.
pub struct NightMinConsecutiveRule;

impl Rule for NightMinConsecutiveRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (identifier, staff) in &context.staff {
            if staff.night_min_consecutive < 2 {
                continue;
            }
            for run in context.night_runs_in_quarter(identifier) {
                if run.length_days() < staff.night_min_consecutive {
                    violations.push(ConstraintViolation::hard(
                        "Min Consecutive Nights",
                        format!(
                            "{} works only {} consecutive night(s) from {} (min {})",
                            staff.name,
                            run.length_days(),
                            format_date(run.start),
                            staff.night_min_consecutive
                        ),
                    ));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PreviousPlanContext, TrailingAssignment};
    use crate::domain::test_fixtures::*;
    use shared::ShiftType;

    #[test]
    fn run_longer_than_max_is_flagged() {
        let mut member = tfa("T1");
        member.night_max_consecutive = Some(2);
        let staff = vec![member];
        let mut schedule = q2_2026_schedule();
        assign_night(&mut schedule, (2026, 4, 7), "T1", false);
        assign_night(&mut schedule, (2026, 4, 8), "T1", false);
        assign_night(&mut schedule, (2026, 4, 9), "T1", false);

        let context = ValidationContext::new(&schedule, &staff, None, None);
        let violations = NightMaxConsecutiveRule.check(&context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_name, "Night Max Consecutive");
    }

    #[test]
    fn single_night_for_min_two_staff_is_flagged() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        assign_night(&mut schedule, (2026, 4, 7), "T1", false);

        let context = ValidationContext::new(&schedule, &staff, None, None);
        let violations = NightMinConsecutiveRule.check(&context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_name, "Min Consecutive Nights");
    }

    #[test]
    fn azubi_single_night_is_allowed() {
        let mut member = azubi("AZ1");
        member.night_possible = true;
        let staff = vec![member];
        let mut schedule = q2_2026_schedule();
        assign_night(&mut schedule, (2026, 4, 7), "AZ1", false);

        let context = ValidationContext::new(&schedule, &staff, None, None);
        assert!(NightMinConsecutiveRule.check(&context).is_empty());
    }

    #[test]
    fn trailing_night_completes_a_boundary_run() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        // Single in-quarter night on Apr 1, continued from Mar 31
        assign_night(&mut schedule, (2026, 4, 1), "T1", false);

        let previous = PreviousPlanContext {
            quarter_start: Some(date(2026, 1, 1)),
            quarter_end: Some(date(2026, 3, 31)),
            entries: vec![],
            trailing_assignments: vec![TrailingAssignment {
                staff_identifier: "T1".into(),
                date: date(2026, 3, 31),
                shift_type: ShiftType::NightTueWed,
            }],
        };

        let with_trailing = ValidationContext::new(&schedule, &staff, None, Some(&previous));
        assert!(NightMinConsecutiveRule.check(&with_trailing).is_empty());

        let without_trailing = ValidationContext::new(&schedule, &staff, None, None);
        assert_eq!(NightMinConsecutiveRule.check(&without_trailing).len(), 1);
    }
}
