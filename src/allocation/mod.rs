//! Task assignment allocation for the studio console.
//!
//! This module distributes a task's image count across a variable set of
//! assignees, reconciles a desired assignment set against the persisted one
//! into create/update/delete operations, and validates completion reports
//! against the task's total due. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
