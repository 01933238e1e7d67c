//! Application services for project status transitions.

mod transition;

pub use transition::{
    ProjectStatusError, ProjectStatusResult, ProjectStatusService, TransitionOutcome,
};
