use super::Candidate;

/// Index of a boolean decision or auxiliary variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub u32);

/// A variable or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Lit {
    Pos(VarId),
    Neg(VarId),
}

impl Lit {
    pub fn holds(&self, candidate: &Candidate) -> bool {
        match self {
            Lit::Pos(var) => candidate.value(*var),
            Lit::Neg(var) => !candidate.value(*var),
        }
    }
}

/// Hard constraints, stated purely over booleans and linear sums so any
/// CP-SAT-capable backend can consume them.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// lower <= sum of vars <= upper
    SumInRange {
        label: String,
        vars: Vec<VarId>,
        lower: i64,
        upper: i64,
    },
    /// antecedent = 1 implies consequent = 1
    Implies {
        label: String,
        antecedent: VarId,
        consequent: VarId,
    },
    /// antecedent = 1 implies sum of vars >= lower
    ImpliesSumAtLeast {
        label: String,
        antecedent: VarId,
        vars: Vec<VarId>,
        lower: i64,
    },
    /// target == AND of operands
    AndEquality {
        label: String,
        target: VarId,
        operands: Vec<Lit>,
    },
    /// target == [sum of vars == value]
    CountEquality {
        label: String,
        target: VarId,
        vars: Vec<VarId>,
        value: i64,
    },
    /// at least one literal holds
    Clause {
        label: String,
        literals: Vec<Lit>,
    },
    /// var is pinned to a constant
    Fixed {
        label: String,
        var: VarId,
        value: bool,
    },
}

impl Constraint {
    pub fn label(&self) -> &str {
        match self {
            Constraint::SumInRange { label, .. }
            | Constraint::Implies { label, .. }
            | Constraint::ImpliesSumAtLeast { label, .. }
            | Constraint::AndEquality { label, .. }
            | Constraint::CountEquality { label, .. }
            | Constraint::Clause { label, .. }
            | Constraint::Fixed { label, .. } => label,
        }
    }

    /// Whether the candidate satisfies this constraint.
    pub fn is_satisfied(&self, candidate: &Candidate) -> bool {
        match self {
            Constraint::SumInRange { vars, lower, upper, .. } => {
                let sum: i64 = vars.iter().filter(|v| candidate.value(**v)).count() as i64;
                sum >= *lower && sum <= *upper
            }
            Constraint::Implies { antecedent, consequent, .. } => {
                !candidate.value(*antecedent) || candidate.value(*consequent)
            }
            Constraint::ImpliesSumAtLeast { antecedent, vars, lower, .. } => {
                if !candidate.value(*antecedent) {
                    return true;
                }
                let sum: i64 = vars.iter().filter(|v| candidate.value(**v)).count() as i64;
                sum >= *lower
            }
            Constraint::AndEquality { target, operands, .. } => {
                let conjunction = operands.iter().all(|lit| lit.holds(candidate));
                candidate.value(*target) == conjunction
            }
            Constraint::CountEquality { target, vars, value, .. } => {
                let sum: i64 = vars.iter().filter(|v| candidate.value(**v)).count() as i64;
                candidate.value(*target) == (sum == *value)
            }
            Constraint::Clause { literals, .. } => literals.iter().any(|lit| lit.holds(candidate)),
            Constraint::Fixed { var, value, .. } => candidate.value(*var) == *value,
        }
    }
}
