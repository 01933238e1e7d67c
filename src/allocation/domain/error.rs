//! Error types for allocation domain validation and parsing.

use thiserror::Error;

/// Errors returned while validating an allocation proposal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AllocationDomainError {
    /// The proposal names no assignees.
    #[error("at least one assignee must be selected")]
    EmptySelection,

    /// The proposed quantities sum past the task's total due.
    #[error("allocated quantity {allocated} exceeds the {total} images due")]
    ExceedsTotal {
        /// Sum of the proposed quantities.
        allocated: u32,
        /// The task's total unit quantity due.
        total: u32,
    },

    /// The proposal matches the persisted assignments exactly.
    #[error("allocation is unchanged from the saved assignments")]
    Unchanged,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
