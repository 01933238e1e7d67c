//! Application services for task assignment allocation.

mod allocator;

pub use allocator::{AllocationError, AllocationResult, CommitOutcome, TaskAssignmentAllocator};
