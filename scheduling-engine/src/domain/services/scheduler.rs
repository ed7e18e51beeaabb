use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{DomainError, DomainResult};

use crate::domain::entities::{PreviousPlanContext, Schedule, Staff, Vacation, VacationCalendar};
use crate::domain::model::ModelBuilder;
use crate::domain::services::diagnostics::diagnose_infeasibility;
use crate::domain::services::search::{SearchEngine, SearchOutcome};
use crate::domain::services::validator::validate_schedule;

/// Default wall-clock budget for one solve.
pub const DEFAULT_SOLVE_TIME_SECONDS: u64 = 120;

/// Outcome of a scheduling run. `success = false` never carries a
/// schedule; partial results are not surfaced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverResult {
    pub success: bool,
    pub schedule: Option<Schedule>,
    pub soft_penalty: Option<f64>,
    pub unsatisfiable_constraints: Vec<String>,
}

/// Produce a quarter schedule for the given roster.
///
/// Deterministic: identical inputs with the same seed yield an identical
/// schedule. The only blocking operation is the solve itself, bounded by
/// `max_solve_time_seconds`.
#[tracing::instrument(skip_all, fields(staff = staff_list.len(), %quarter_start))]
pub fn schedule(
    staff_list: &[Staff],
    quarter_start: NaiveDate,
    vacations: &[Vacation],
    previous: Option<&PreviousPlanContext>,
    max_solve_time_seconds: u64,
    seed: Option<u64>,
) -> DomainResult<SolverResult> {
    if staff_list.is_empty() {
        return Err(DomainError::InvalidInput("staff list is empty".into()));
    }
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for staff in staff_list {
        staff.validate()?;
        if !seen.insert(staff.identifier.as_str()) {
            return Err(DomainError::InvalidInput(format!(
                "duplicate staff identifier {}",
                staff.identifier
            )));
        }
    }

    let quarter_end = shared::time::quarter_end(quarter_start);
    let calendar = VacationCalendar::build(staff_list, vacations, quarter_start, quarter_end)?;
    let model = ModelBuilder::new(staff_list, quarter_start, &calendar, previous).build();
    tracing::debug!(
        variables = model.var_count(),
        constraints = model.constraint_count(),
        "constraint model built"
    );

    let deadline = Instant::now() + Duration::from_secs(max_solve_time_seconds.max(1));
    let engine = SearchEngine::new(staff_list, &model, previous, deadline, seed.unwrap_or(0));

    match engine.run() {
        SearchOutcome::Feasible {
            schedule,
            objective,
        } => {
            let validation = validate_schedule(&schedule, staff_list, Some(&calendar), previous);
            if !validation.is_valid() {
                tracing::warn!(
                    violations = validation.hard_violations.len(),
                    "solver output failed the independent validation"
                );
            }
            tracing::info!(
                assignments = schedule.assignments.len(),
                objective,
                soft_penalty = validation.soft_penalty,
                "schedule generated"
            );
            Ok(SolverResult {
                success: true,
                schedule: Some(schedule),
                soft_penalty: Some(validation.soft_penalty),
                unsatisfiable_constraints: Vec::new(),
            })
        }
        SearchOutcome::Infeasible { reasons } => {
            tracing::debug!(?reasons, "no feasible schedule found");
            let hints = diagnose_infeasibility(staff_list, &model.shifts);
            Ok(SolverResult {
                success: false,
                schedule: None,
                soft_penalty: None,
                unsatisfiable_constraints: hints,
            })
        }
    }
}
