//! Daguerre: operations console core for a photo-editing studio.
//!
//! This crate provides the domain core behind the studio's operations
//! console: distributing image counts across task assignees, guarding
//! project status transitions against billing state, and coordinating
//! cache invalidation between independent views.
//!
//! # Architecture
//!
//! Daguerre follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (stores, oracles)
//!
//! # Modules
//!
//! - [`allocation`]: Task assignment allocation engine
//! - [`project`]: Project status transition guard
//! - [`events`]: Cache-invalidation event bus
//! - [`identity`]: Staff identifiers shared across contexts

pub mod allocation;
pub mod events;
pub mod identity;
pub mod project;
