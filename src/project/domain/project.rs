//! Project aggregate root.

use super::{Client, Invoice, ProjectId, ProjectStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project aggregate root.
///
/// The status field is mutated only through the transition service after
/// guard approval; the linked invoice and client are read-only inputs to
/// the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    client: Client,
    invoice: Option<Invoice>,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Client reference.
    pub client: Client,
    /// Linked invoice, if one has been raised.
    pub invoice: Option<Invoice>,
    /// Persisted lifecycle status.
    pub status: ProjectStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new draft project for a client.
    #[must_use]
    pub fn new(client: Client, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            client,
            invoice: None,
            status: ProjectStatus::Draft,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Links an invoice to the project.
    #[must_use]
    pub const fn with_invoice(mut self, invoice: Invoice) -> Self {
        self.invoice = Some(invoice);
        self
    }

    /// Sets the initial status, for reconstruction and fixtures.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            client: data.client,
            invoice: data.invoice,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the client reference.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the linked invoice, if any.
    #[must_use]
    pub const fn invoice(&self) -> Option<&Invoice> {
        self.invoice.as_ref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the project to the given status after guard approval.
    ///
    /// The status is the only field a transition mutates.
    pub(crate) fn apply_status(&mut self, status: ProjectStatus, clock: &impl Clock) {
        self.status = status;
        self.updated_at = clock.utc();
    }
}
