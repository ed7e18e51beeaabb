use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scheduling_engine::domain::entities::VacationCalendar;
use scheduling_engine::infrastructure::config::Settings;
use scheduling_engine::infrastructure::{context_store, ingest};
use scheduling_engine::presentation::export::schedule_to_csv;
use scheduling_engine::{build_previous_context, schedule, validate_schedule};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheduling_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::new().context("loading configuration")?;
    tracing::info!(?settings, "configuration loaded");

    let quarter_start: NaiveDate = std::env::args()
        .nth(1)
        .context("usage: scheduling-engine <quarter-start YYYY-MM-DD>")?
        .parse()
        .context("quarter start must be YYYY-MM-DD")?;
    if !shared::time::is_quarter_start(quarter_start) {
        tracing::warn!(%quarter_start, "date is not a canonical quarter start (1 Jan/Apr/Jul/Oct)");
    }

    let staff = ingest::load_staff_csv(&settings.io.staff_csv)
        .with_context(|| format!("reading staff from {}", settings.io.staff_csv))?;
    tracing::info!(staff = staff.len(), "staff roster loaded");

    let vacations = match &settings.io.vacations_csv {
        Some(path) => ingest::load_vacations_csv(path)
            .with_context(|| format!("reading vacations from {path}"))?,
        None => Vec::new(),
    };
    let previous = match &settings.io.previous_context_json {
        Some(path) => Some(
            context_store::load_context(path)
                .with_context(|| format!("reading previous context from {path}"))?,
        ),
        None => None,
    };

    let result = schedule(
        &staff,
        quarter_start,
        &vacations,
        previous.as_ref(),
        settings.solver.max_solve_time_seconds,
        settings.solver.seed,
    )?;

    if !result.success {
        tracing::error!("no feasible schedule found");
        for hint in &result.unsatisfiable_constraints {
            tracing::error!("  {hint}");
        }
        bail!("scheduling failed");
    }

    let plan = result.schedule.expect("successful result carries a schedule");
    let calendar =
        VacationCalendar::build(&staff, &vacations, plan.quarter_start, plan.quarter_end)?;
    let validation = validate_schedule(&plan, &staff, Some(&calendar), previous.as_ref());
    tracing::info!(
        assignments = plan.assignments.len(),
        soft_penalty = validation.soft_penalty,
        valid = validation.is_valid(),
        "schedule ready"
    );
    for violation in &validation.hard_violations {
        tracing::warn!("{violation}");
    }

    std::fs::write(&settings.io.schedule_csv_out, schedule_to_csv(&plan)?)
        .with_context(|| format!("writing {}", settings.io.schedule_csv_out))?;
    tracing::info!(path = %settings.io.schedule_csv_out, "schedule exported");

    let next_context = build_previous_context(&plan, &staff, &vacations)?;
    context_store::save_context(&next_context, &settings.io.next_context_json_out)
        .with_context(|| format!("writing {}", settings.io.next_context_json_out))?;
    tracing::info!(path = %settings.io.next_context_json_out, "carry-forward context saved");

    Ok(())
}
