pub mod carry_forward;
pub mod diagnostics;
pub mod scheduler;
pub mod search;
pub mod validator;

pub use carry_forward::build_previous_context;
pub use diagnostics::diagnose_infeasibility;
pub use scheduler::{schedule, SolverResult};
pub use validator::{validate_schedule, ValidationResult};
