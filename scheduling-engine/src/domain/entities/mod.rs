pub mod context;
pub mod schedule;
pub mod shift;
pub mod staff;
pub mod vacation;

pub use context::{CarryForwardEntry, PreviousPlanContext, TrailingAssignment};
pub use schedule::{Assignment, Schedule};
pub use shift::Shift;
pub use staff::{MonthDay, Staff};
pub use vacation::{Vacation, VacationCalendar};
