use shared::time::weekday_label;
use shared::{DomainError, DomainResult};

use crate::domain::entities::Schedule;

/// Render a schedule as the legacy CSV export: one row per assignment,
/// sorted by date, with German weekday labels and DD.MM.YYYY dates.
pub fn schedule_to_csv(schedule: &Schedule) -> DomainResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["date", "weekday", "shift_type", "staff_identifier", "paired"])
        .map_err(|e| DomainError::Serialization(e.to_string()))?;

    let mut assignments: Vec<_> = schedule.assignments.iter().collect();
    assignments.sort_by(|a, b| {
        (a.shift.date, a.shift.shift_type, a.staff_identifier.as_str()).cmp(&(
            b.shift.date,
            b.shift.shift_type,
            b.staff_identifier.as_str(),
        ))
    });

    for assignment in assignments {
        writer
            .write_record([
                assignment.shift.date.format("%d.%m.%Y").to_string(),
                weekday_label(assignment.shift.date).to_string(),
                assignment.shift.shift_type.code().to_string(),
                assignment.staff_identifier.clone(),
                if assignment.is_paired { "yes" } else { "no" }.to_string(),
            ])
            .map_err(|e| DomainError::Serialization(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DomainError::Serialization(e.to_string()))
}
