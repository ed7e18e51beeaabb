use chrono::Duration;
use shared::Department;

use super::{format_date, ConstraintViolation, Rule, ValidationContext};

fn restricted_department(
    context: &ValidationContext<'_>,
    staff_identifier: &str,
) -> Option<Department> {
    context
        .staff
        .get(staff_identifier)
        .map(|s| s.department)
        .filter(|d| d.is_restricted())
}

/// Members of the same restricted department (OP, Station) never share a
/// night.
pub struct DepartmentSameNightRule;

impl Rule for DepartmentSameNightRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (night_date, assignments) in &context.nights_by_date {
            for (i, first) in assignments.iter().enumerate() {
                let Some(department) = restricted_department(context, &first.staff_identifier)
                else {
                    continue;
                };
                for second in &assignments[i + 1..] {
                    if first.staff_identifier == second.staff_identifier {
                        continue;
                    }
                    if restricted_department(context, &second.staff_identifier) == Some(department)
                    {
                        violations.push(ConstraintViolation::hard(
                            "Department Same Night",
                            format!(
                                "{} and {} (both {:?}) share the night of {}",
                                context.display_name(&first.staff_identifier),
                                context.display_name(&second.staff_identifier),
                                department,
                                format_date(*night_date)
                            ),
                        ));
                    }
                }
            }
        }

        violations
    }
}

/// Members of the same restricted department never occupy consecutive
/// nights.
pub struct DepartmentConsecutiveRule;

impl Rule for DepartmentConsecutiveRule {
    fn check(&self, context: &ValidationContext<'_>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (night_date, assignments) in &context.nights_by_date {
            let next_date = *night_date + Duration::days(1);
            let Some(next_assignments) = context.nights_by_date.get(&next_date) else {
                continue;
            };
            for first in assignments {
                let Some(department) = restricted_department(context, &first.staff_identifier)
                else {
                    continue;
                };
                for second in next_assignments {
                    if first.staff_identifier == second.staff_identifier {
                        continue;
                    }
                    if restricted_department(context, &second.staff_identifier) == Some(department)
                    {
                        violations.push(ConstraintViolation::hard(
                            "Department Consecutive Days",
                            format!(
                                "{} ({}) and {} ({}) cover consecutive nights (both {:?})",
                                context.display_name(&first.staff_identifier),
                                format_date(*night_date),
                                context.display_name(&second.staff_identifier),
                                format_date(next_date),
                                department
                            ),
                        ));
                    }
                }
            }
        }

        violations
    }
}
