//! Project lifecycle status.

use super::ParseProjectStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a project.
///
/// No status is structurally terminal; the set of statuses offered as next
/// targets is computed dynamically from project and invoice state by
/// [`super::offerable_statuses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// The project has been sketched out but not started.
    Draft,
    /// The project is open for work.
    Active,
    /// Editing work is underway.
    InProgress,
    /// Output is awaiting internal review.
    Review,
    /// The project has been reopened for further work.
    Reopen,
    /// All gradings have been finished.
    Completed,
    /// Work is temporarily paused.
    OnHold,
    /// Output has been handed over to the client.
    Delivered,
    /// The client has requested changes.
    Requested,
}

impl ProjectStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Draft,
        Self::Active,
        Self::InProgress,
        Self::Review,
        Self::Reopen,
        Self::Completed,
        Self::OnHold,
        Self::Delivered,
        Self::Requested,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Active => "ACTIVE",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Reopen => "REOPEN",
            Self::Completed => "COMPLETED",
            Self::OnHold => "ON_HOLD",
            Self::Delivered => "DELIVERED",
            Self::Requested => "REQUESTED",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "DRAFT" => Ok(Self::Draft),
            "ACTIVE" => Ok(Self::Active),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "REVIEW" => Ok(Self::Review),
            "REOPEN" => Ok(Self::Reopen),
            "COMPLETED" => Ok(Self::Completed),
            "ON_HOLD" => Ok(Self::OnHold),
            "DELIVERED" => Ok(Self::Delivered),
            "REQUESTED" => Ok(Self::Requested),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}
