//! Client records read by the transition guard.

use super::{ClientId, ParseClientCategoryError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Billing category of a client.
///
/// Walk-in clients settle per project, so delivery of their invoiced work
/// is gated on payment; permanent clients are billed on account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientCategory {
    /// A client billed on a running account.
    Permanent,
    /// A client billed per project.
    WalkIn,
}

impl ClientCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::WalkIn => "walk_in",
        }
    }
}

impl fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ClientCategory {
    type Error = ParseClientCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "permanent" => Ok(Self::Permanent),
            "walk_in" | "walkin" | "walk-in" => Ok(Self::WalkIn),
            _ => Err(ParseClientCategoryError(value.to_owned())),
        }
    }
}

/// Client reference carried by a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    category: ClientCategory,
}

impl Client {
    /// Creates a client reference.
    #[must_use]
    pub const fn new(id: ClientId, category: ClientCategory) -> Self {
        Self { id, category }
    }

    /// Returns the client identifier.
    #[must_use]
    pub const fn id(&self) -> ClientId {
        self.id
    }

    /// Returns the billing category.
    #[must_use]
    pub const fn category(&self) -> ClientCategory {
        self.category
    }
}
