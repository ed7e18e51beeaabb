pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export the library surface
pub use domain::catalogue::generate_quarter_shifts;
pub use domain::entities::{
    Assignment, CarryForwardEntry, MonthDay, PreviousPlanContext, Schedule, Shift, Staff,
    TrailingAssignment, Vacation, VacationCalendar,
};
pub use domain::services::{
    build_previous_context, diagnose_infeasibility, schedule, validate_schedule, SolverResult,
    ValidationResult,
};
