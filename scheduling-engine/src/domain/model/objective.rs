use super::constraints::VarId;
use super::Candidate;

/// Scale factor for FTE normalization in the integer objective.
pub const SCALE: i64 = 400;
/// Scale factor for presence normalization.
pub const PRESENCE_SCALE: i64 = 1000;

/// Integer multiplier normalizing one person's half-unit expression by
/// FTE and presence. All divisions are integer divisions, applied in a
/// fixed order so every backend computes identical coefficients.
pub fn person_multiplier(weekly_hours: u32, available_days: u32, quarter_days: u32) -> i64 {
    let presence = ((available_days as i64 * PRESENCE_SCALE) / quarter_days as i64).max(1);
    (SCALE / weekly_hours as i64) * (10_000 / presence) / 10
}

/// Carry-forward delta converted to scaled half-unit points.
pub fn carry_forward_offset(delta: f64) -> i64 {
    (delta * (2 * SCALE / 40) as f64).round() as i64
}

/// Hard fairness band for one group: 1.5 Notdienst units in scaled points,
/// widened by the group's historical delta spread.
pub fn group_threshold(carry_forward_spread: f64) -> i64 {
    let base = (1.5 * (2 * SCALE / 40) as f64 * (PRESENCE_SCALE / 100) as f64).round() as i64;
    base + (carry_forward_spread * (2 * SCALE / 40) as f64).round() as i64
}

/// One person's scaled Notdienst expression: affine over the decision
/// variables, plus the carry-forward offset.
#[derive(Debug, Clone)]
pub struct PersonExpression {
    pub staff_identifier: String,
    /// weekend + night half-units, scaled by the person multiplier
    pub terms: Vec<(VarId, i64)>,
    /// night-only half-units, scaled
    pub night_terms: Vec<(VarId, i64)>,
    /// carry-forward offset added to the full expression
    pub offset: i64,
    /// the person's FTE/presence multiplier M(s)
    pub multiplier: i64,
}

impl PersonExpression {
    pub fn adjusted(&self, candidate: &Candidate) -> i64 {
        self.terms
            .iter()
            .filter(|(var, _)| candidate.value(*var))
            .map(|(_, weight)| weight)
            .sum::<i64>()
            + self.offset
    }

    pub fn night_value(&self, candidate: &Candidate) -> i64 {
        self.night_terms
            .iter()
            .filter(|(var, _)| candidate.value(*var))
            .map(|(_, weight)| weight)
            .sum()
    }
}

/// A role group participating in min-max fairness.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    pub label: String,
    /// indices into `ObjectiveSpec::expressions`
    pub members: Vec<usize>,
    pub threshold: i64,
    /// whether the secondary night-only range enters the objective
    pub include_night_range: bool,
}

/// The scaled integer fairness objective.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveSpec {
    pub expressions: Vec<PersonExpression>,
    pub groups: Vec<GroupSpec>,
}

impl ObjectiveSpec {
    fn group_range(&self, group: &GroupSpec, candidate: &Candidate) -> i64 {
        let values: Vec<i64> = group
            .members
            .iter()
            .map(|&member| self.expressions[member].adjusted(candidate))
            .collect();
        match (values.iter().max(), values.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    fn group_night_range(&self, group: &GroupSpec, candidate: &Candidate) -> i64 {
        let values: Vec<i64> = group
            .members
            .iter()
            .map(|&member| self.expressions[member].night_value(candidate))
            .collect();
        match (values.iter().max(), values.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    /// Primary range sum plus the night-only balance ranges.
    pub fn evaluate(&self, candidate: &Candidate) -> i64 {
        let mut total = 0;
        for group in &self.groups {
            total += self.group_range(group, candidate);
            if group.include_night_range {
                total += self.group_night_range(group, candidate);
            }
        }
        total
    }

    /// Hard violations of the per-group fairness bands.
    pub fn range_violations(&self, candidate: &Candidate) -> Vec<String> {
        let mut violations = Vec::new();
        for group in &self.groups {
            let range = self.group_range(group, candidate);
            if range > group.threshold {
                violations.push(format!(
                    "fairness range {} ({} > {})",
                    group.label, range, group.threshold
                ));
            }
        }
        violations
    }
}
