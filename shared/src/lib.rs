pub mod error;
pub mod time;
pub mod types;

// Re-export commonly used items
pub use error::{DomainError, DomainResult};
pub use time::{is_quarter_start, quarter_dates, quarter_end, weekday_label, QUARTER_DAYS};
pub use types::{Department, Role, ShiftType};
