//! Project status transitions for the studio console.
//!
//! This module governs a project's lifecycle status: computing the set of
//! statuses a caller may choose from, and guarding the financially
//! consequential transitions (delivery and reopening) against invoice
//! state, client category, and caller permissions. The module follows
//! hexagonal architecture:
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
