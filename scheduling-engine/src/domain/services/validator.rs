use crate::domain::entities::{PreviousPlanContext, Schedule, Staff, VacationCalendar};
use crate::domain::rules::{
    penalty, AzubiNightRule, BlackoutRule, BlockSpacingRule, ConstraintViolation,
    DepartmentConsecutiveRule, DepartmentSameNightRule, InternNightCapRule, InternWeekendRule,
    MinorSundayRule, NdAloneRule, NightDayConflictRule, NightExceptionRule,
    NightMaxConsecutiveRule, NightMinConsecutiveRule, NightPairingRule, Rule, SameDayRule,
    ShiftCoverageRule, ShiftEligibilityRule, ValidationContext, WeekendIsolationRule,
};

/// Result of validating a schedule against the full rule book.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub hard_violations: Vec<ConstraintViolation>,
    pub soft_penalty: f64,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.hard_violations.is_empty()
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "Valid schedule (soft penalty: {:.2})", self.soft_penalty)
        } else {
            write!(f, "Invalid schedule ({} violations)", self.hard_violations.len())
        }
    }
}

/// Independent re-check of a schedule against every hard rule, plus the
/// soft penalty score. Pure and total: any schedule yields a result.
pub fn validate_schedule(
    schedule: &Schedule,
    staff_list: &[Staff],
    calendar: Option<&VacationCalendar>,
    previous: Option<&PreviousPlanContext>,
) -> ValidationResult {
    let context = ValidationContext::new(schedule, staff_list, calendar, previous);

    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(MinorSundayRule),
        Box::new(InternWeekendRule),
        Box::new(SameDayRule),
        Box::new(ShiftEligibilityRule),
        Box::new(NightExceptionRule),
        Box::new(BlackoutRule),
        Box::new(ShiftCoverageRule),
        Box::new(AzubiNightRule),
        Box::new(NightPairingRule),
        Box::new(NdAloneRule),
        Box::new(InternNightCapRule),
        Box::new(WeekendIsolationRule),
        Box::new(NightDayConflictRule),
        Box::new(BlockSpacingRule),
        Box::new(NightMaxConsecutiveRule),
        Box::new(NightMinConsecutiveRule),
        Box::new(DepartmentSameNightRule),
        Box::new(DepartmentConsecutiveRule),
    ];

    let mut hard_violations = Vec::new();
    for rule in &rules {
        hard_violations.extend(rule.check(&context));
    }

    let soft_penalty = penalty::soft_penalty(&context);

    ValidationResult {
        hard_violations,
        soft_penalty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::*;
    use shared::ShiftType;

    #[test]
    fn validation_is_pure_and_idempotent() {
        let staff = vec![tfa("T1"), azubi("AZ1")];
        let mut schedule = q2_2026_schedule();
        assign(&mut schedule, (2026, 4, 4), ShiftType::Saturday1019, "AZ1", false);
        assign_night(&mut schedule, (2026, 4, 7), "T1", false);

        let first = validate_schedule(&schedule, &staff, None, None);
        let second = validate_schedule(&schedule, &staff, None, None);
        assert_eq!(first, second);
        // An incomplete hand-built schedule is reported, never a crash
        assert!(!first.is_valid());
    }

    #[test]
    fn violations_carry_the_documented_names() {
        let mut minor = azubi("MINOR");
        minor.adult = false;
        let staff = vec![minor];
        let mut schedule = q2_2026_schedule();
        assign(&mut schedule, (2026, 4, 5), ShiftType::Sunday82030, "MINOR", false);

        let result = validate_schedule(&schedule, &staff, None, None);
        let names: Vec<&str> = result
            .hard_violations
            .iter()
            .map(|v| v.constraint_name.as_str())
            .collect();
        assert!(names.contains(&"Minor Sunday Ban"));
        assert!(names.contains(&"Shift Eligibility"));
    }
}
