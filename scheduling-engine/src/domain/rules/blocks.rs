use super::{format_date, ConstraintViolation, Rule, ValidationContext};

/// Minimum distance between the starts of two night duty blocks.
pub const BLOCK_SPACING_DAYS: i64 = 21;

/// Night duty blocks of one person must start at least three weeks apart,
/// counted across the quarter boundary via trailing assignments. Weekend
/// shifts are hard-isolated singletons and never form blocks.
pub struct BlockSpacingRule;

impl Rule for BlockSpacingRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for staff_identifier in context.by_staff.keys() {
            let runs = context.night_runs(staff_identifier);
            for pair in runs.windows(2) {
                // Pairs lying entirely in the previous quarter's trailing
                // window were validated back then (and may be truncated)
                if pair[1].start < context.schedule.quarter_start {
                    continue;
                }
                let gap = (pair[1].start - pair[0].start).num_days();
                if gap < BLOCK_SPACING_DAYS {
                    violations.push(ConstraintViolation::hard(
                        "3-Week Block Limit",
                        format!(
                            "{} has night blocks starting {} and {} only {} days apart",
                            context.display_name(staff_identifier),
                            format_date(pair[0].start),
                            format_date(pair[1].start),
                            gap
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
    fn blocks_fourteen_days_apart_are_flagged() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        // Two-night blocks starting Apr 4 and Apr 18: 14-day gap
        assign_night(&mut schedule, (2026, 4, 4), "T1", false);
        assign_night(&mut schedule, (2026, 4, 5), "T1", false);
        assign_night(&mut schedule, (2026, 4, 18), "T1", false);
        assign_night(&mut schedule, (2026, 4, 19), "T1", false);

        let context = ValidationContext::new(&schedule, &staff, None, None);
        let violations = BlockSpacingRule.check(&context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_name, "3-Week Block Limit");
        assert!(violations[0].description.contains("14 days"));
    }

    #[test]
    fn blocks_exactly_three_weeks_apart_are_fine() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        assign_night(&mut schedule, (2026, 4, 4), "T1", false);
        assign_night(&mut schedule, (2026, 4, 5), "T1", false);
        // 21 days after Apr 4
        assign_night(&mut schedule, (2026, 4, 25), "T1", false);
        assign_night(&mut schedule, (2026, 4, 26), "T1", false);

        let context = ValidationContext::new(&schedule, &staff, None, None);
        assert!(BlockSpacingRule.check(&context).is_empty());
    }

    #[test]
    fn trailing_block_counts_against_early_starts() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        // First in-quarter block starts Apr 10
        assign_night(&mut schedule, (2026, 4, 10), "T1", false);
        assign_night(&mut schedule, (2026, 4, 11), "T1", false);

        // Previous quarter block started Mar 28: only 13 days before Apr 10
        let previous = PreviousPlanContext {
            quarter_start: Some(date(2026, 1, 1)),
            quarter_end: Some(date(2026, 3, 31)),
            entries: vec![],
            trailing_assignments: vec![
                TrailingAssignment {
                    staff_identifier: "T1".into(),
                    date: date(2026, 3, 28),
                    shift_type: ShiftType::NightSatSun,
                },
                TrailingAssignment {
                    staff_identifier: "T1".into(),
                    date: date(2026, 3, 29),
                    shift_type: ShiftType::NightSunMon,
                },
            ],
        };

        let context = ValidationContext::new(&schedule, &staff, None, Some(&previous));
        let violations = BlockSpacingRule.check(&context);
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn trailing_run_merging_into_the_quarter_is_one_block() {
        let staff = vec![tfa("T1")];
        let mut schedule = q2_2026_schedule();
        // Quarter starts Wed Apr 1; previous nights Mar 30+31 continue into Apr 1
        assign_night(&mut schedule, (2026, 4, 1), "T1", false);

        let previous = PreviousPlanContext {
            quarter_start: Some(date(2026, 1, 1)),
            quarter_end: Some(date(2026, 3, 31)),
            entries: vec![],
            trailing_assignments: vec![
                TrailingAssignment {
                    staff_identifier: "T1".into(),
                    date: date(2026, 3, 30),
                    shift_type: ShiftType::NightMonTue,
                },
                TrailingAssignment {
                    staff_identifier: "T1".into(),
                    date: date(2026, 3, 31),
                    shift_type: ShiftType::NightTueWed,
                },
            ],
        };

        let context = ValidationContext::new(&schedule, &staff, None, Some(&previous));
        assert!(BlockSpacingRule.check(&context).is_empty());
    }
}
