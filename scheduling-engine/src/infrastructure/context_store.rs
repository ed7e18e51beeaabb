use std::path::Path;

use shared::{DomainError, DomainResult};

use crate::domain::entities::PreviousPlanContext;

/// Serialize a carry-forward context to pretty JSON.
pub fn context_to_json(context: &PreviousPlanContext) -> DomainResult<String> {
    serde_json::to_string_pretty(context).map_err(|e| DomainError::Serialization(e.to_string()))
}

/// Parse a carry-forward context back from JSON.
pub fn context_from_json(json: &str) -> DomainResult<PreviousPlanContext> {
    serde_json::from_str(json).map_err(|e| DomainError::Serialization(e.to_string()))
}

pub fn save_context(context: &PreviousPlanContext, path: impl AsRef<Path>) -> DomainResult<()> {
    std::fs::write(path, context_to_json(context)?)?;
    Ok(())
}

pub fn load_context(path: impl AsRef<Path>) -> DomainResult<PreviousPlanContext> {
    let json = std::fs::read_to_string(path)?;
    context_from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CarryForwardEntry, TrailingAssignment};
    use chrono::NaiveDate;
    use shared::{Role, ShiftType};

    #[test]
    fn context_round_trips_through_json() {
        let context = PreviousPlanContext {
            quarter_start: NaiveDate::from_ymd_opt(2026, 1, 1),
            quarter_end: NaiveDate::from_ymd_opt(2026, 3, 31),
            entries: vec![CarryForwardEntry {
                identifier: "T1".into(),
                role: Role::Tfa,
                hours: 40,
                effective_nights: 5.5,
                weekend_shifts: 7,
                total_notdienst: 12.5,
                normalized_40h: 12.643,
                group_mean_40h: 12.0,
                carry_forward_delta: 0.643,
            }],
            trailing_assignments: vec![TrailingAssignment {
                staff_identifier: "T1".into(),
                date: NaiveDate::from_ymd_opt(2026, 3, 30).unwrap(),
                shift_type: ShiftType::NightMonTue,
            }],
        };

        let json = context_to_json(&context).unwrap();
        let restored = context_from_json(&json).unwrap();

        assert_eq!(restored.entries.len(), 1);
        let entry = &restored.entries[0];
        assert_eq!(entry.identifier, "T1");
        assert!((entry.carry_forward_delta - 0.643).abs() < 0.001);
        assert_eq!(restored.trailing_assignments, context.trailing_assignments);
        // The wire format keeps the legacy shift codes
        assert!(json.contains("N_Mo-Di"));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            context_from_json("{not json"),
            Err(DomainError::Serialization(_))
        ));
    }
}
