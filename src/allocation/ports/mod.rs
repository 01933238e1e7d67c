//! Port contracts for task assignment allocation.
//!
//! Ports define infrastructure-agnostic interfaces used by the allocator
//! service.

pub mod repository;

pub use repository::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult};
