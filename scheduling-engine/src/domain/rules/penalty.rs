use std::collections::BTreeMap;

use shared::Role;

use super::ValidationContext;

/// Soft penalty of a schedule, lower is better.
///
/// Penalizes deviation from the hours-proportional target (squared),
/// unfairness inside role groups (standard deviation, weighted 10x) and
/// night runs exceeding `night_max_consecutive` (100 per run).
pub fn soft_penalty(context: &ValidationContext<'_>) -> f64 {
    let mut penalty = 0.0;

    let total_hours: f64 = context.staff.values().map(|s| s.weekly_hours as f64).sum();
    let total_assignments = context.schedule.assignments.len() as f64;

    if total_hours > 0.0 {
        for staff in context.staff.values() {
            let actual = context
                .schedule
                .count_total_notdienst(&staff.identifier, staff.role);
            let target = (staff.weekly_hours as f64 / total_hours) * total_assignments;
            let deviation = (actual - target).abs();
            penalty += deviation * deviation;
        }
    }

    // Standard deviation of total Notdienst inside each role group
    let mut role_groups: BTreeMap<Role, Vec<f64>> = BTreeMap::new();
    for staff in context.staff.values() {
        role_groups.entry(staff.role).or_default().push(
            context
                .schedule
                .count_total_notdienst(&staff.identifier, staff.role),
        );
    }
    for counts in role_groups.values() {
        if counts.len() > 1 {
            let mean = counts.iter().sum::<f64>() / counts.len() as f64;
            let variance =
                counts.iter().map(|c| (c - mean) * (c - mean)).sum::<f64>() / counts.len() as f64;
            penalty += variance.sqrt() * 10.0;
        }
    }

    // Overshoots of the max-consecutive bound
    for (identifier, staff) in &context.staff {
        if let Some(max) = staff.night_max_consecutive {
            let overshoots = context
                .night_runs_in_quarter(identifier)
                .into_iter()
                .filter(|run| run.length_days() > max)
                .count();
            penalty += 100.0 * overshoots as f64;
        }
    }

    penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::*;

    #[test]
    fn even_distribution_scores_lower_than_skewed() {
        let staff = vec![tfa("T1"), tfa("T2")];

        let mut even = q2_2026_schedule();
        assign_night(&mut even, (2026, 4, 7), "T1", false);
        assign_night(&mut even, (2026, 4, 8), "T1", false);
        assign_night(&mut even, (2026, 5, 5), "T2", false);
        assign_night(&mut even, (2026, 5, 6), "T2", false);

        let mut skewed = q2_2026_schedule();
        assign_night(&mut skewed, (2026, 4, 7), "T1", false);
        assign_night(&mut skewed, (2026, 4, 8), "T1", false);
        assign_night(&mut skewed, (2026, 5, 5), "T1", false);
        assign_night(&mut skewed, (2026, 5, 6), "T1", false);

        let even_context = ValidationContext::new(&even, &staff, None, None);
        let skewed_context = ValidationContext::new(&skewed, &staff, None, None);
        assert!(soft_penalty(&even_context) < soft_penalty(&skewed_context));
    }

    #[test]
    fn max_consecutive_overshoot_costs_a_hundred() {
        let mut member = tfa("T1");
        member.night_max_consecutive = Some(2);
        let staff = vec![member];

        let mut within = q2_2026_schedule();
        assign_night(&mut within, (2026, 4, 7), "T1", false);
        assign_night(&mut within, (2026, 4, 8), "T1", false);

        let mut over = q2_2026_schedule();
        assign_night(&mut over, (2026, 4, 7), "T1", false);
        assign_night(&mut over, (2026, 4, 8), "T1", false);
        assign_night(&mut over, (2026, 4, 9), "T1", false);

        let within_context = ValidationContext::new(&within, &staff, None, None);
        let over_context = ValidationContext::new(&over, &staff, None, None);
        let difference = soft_penalty(&over_context) - soft_penalty(&within_context);
        assert!(difference >= 100.0);
    }
}
