//! Transition guard: offerable statuses and per-target rules.
//!
//! The two filters are deliberately independent. The offerable set decides
//! which statuses are listed as next targets; the per-target guards run
//! even for offered targets and decide whether the choice is blocked, so a
//! caller always learns the business reason rather than a generic
//! "unavailable".

use super::{ClientCategory, Project, ProjectStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed capability identifier checked by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Authority to deliver invoiced walk-in work.
    ProjectApprove,
}

impl Permission {
    /// Returns the canonical permission key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectApprove => "project_approve",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of the per-target transition guard.
///
/// A blocked transition is a first-class value carrying a human-readable
/// reason, so callers can render it without a try/catch at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionDecision {
    /// The transition may proceed.
    Allowed,
    /// The transition is blocked.
    Blocked {
        /// Human-readable reason shown to the caller.
        reason: String,
    },
}

impl TransitionDecision {
    /// Creates a blocked decision with the given reason.
    #[must_use]
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::Blocked {
            reason: reason.into(),
        }
    }

    /// Returns whether the transition may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns the rejection reason, if the transition is blocked.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed => None,
            Self::Blocked { reason } => Some(reason),
        }
    }
}

/// Computes the statuses offered as valid next targets.
///
/// A project with a linked invoice, or one already delivered, may only be
/// reopened. A completed project may be delivered or reopened. Every other
/// project may move to any status.
#[must_use]
pub fn offerable_statuses(project: &Project) -> Vec<ProjectStatus> {
    if project.invoice().is_some() || project.status() == ProjectStatus::Delivered {
        vec![ProjectStatus::Reopen]
    } else if project.status() == ProjectStatus::Completed {
        vec![ProjectStatus::Delivered, ProjectStatus::Reopen]
    } else {
        ProjectStatus::ALL.to_vec()
    }
}

/// Evaluates the per-target guard for a requested transition.
///
/// Only delivery and reopening carry guards; they encode the invariant
/// that money already collected from a walk-in client cannot silently
/// revert to an unbilled state. Every other target is allowed. The
/// permission predicate is resolved by the caller and passed in as an
/// opaque boolean.
#[must_use]
pub fn evaluate_transition(
    project: &Project,
    target: ProjectStatus,
    caller_can_approve: bool,
) -> TransitionDecision {
    match target {
        ProjectStatus::Delivered => evaluate_delivery(project, caller_can_approve),
        ProjectStatus::Reopen => evaluate_reopen(project),
        _ => TransitionDecision::Allowed,
    }
}

fn evaluate_delivery(project: &Project, caller_can_approve: bool) -> TransitionDecision {
    let Some(invoice) = project.invoice() else {
        return TransitionDecision::Allowed;
    };
    if project.client().category() != ClientCategory::WalkIn {
        return TransitionDecision::Allowed;
    }
    if !caller_can_approve {
        return TransitionDecision::blocked(
            "Delivering an invoiced walk-in project requires the project approve permission.",
        );
    }
    if !invoice.is_settled() {
        return TransitionDecision::blocked(format!(
            "Invoice must be paid first. Current balance: {}",
            invoice.balance_display()
        ));
    }
    TransitionDecision::Allowed
}

fn evaluate_reopen(project: &Project) -> TransitionDecision {
    match project.invoice() {
        Some(invoice) if invoice.is_settled() => TransitionDecision::blocked(
            "A fully paid invoice cannot be reopened for further work.",
        ),
        _ => TransitionDecision::Allowed,
    }
}
