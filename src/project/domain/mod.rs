//! Domain model for project lifecycle management.
//!
//! The project domain models the status enumeration, the linked invoice and
//! client records the guard reads, and the guard functions themselves,
//! keeping all infrastructure concerns outside of the domain boundary.

mod client;
mod error;
mod guard;
mod ids;
mod invoice;
mod project;
mod status;

pub use client::{Client, ClientCategory};
pub use error::{
    ParseClientCategoryError, ParseInvoiceStatusError, ParseProjectStatusError,
};
pub use guard::{Permission, TransitionDecision, evaluate_transition, offerable_statuses};
pub use ids::{ClientId, InvoiceId, ProjectId};
pub use invoice::{Invoice, InvoiceStatus};
pub use project::{PersistedProjectData, Project};
pub use status::ProjectStatus;
