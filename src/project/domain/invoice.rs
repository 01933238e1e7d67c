//! Invoice records read by the transition guard.

use super::{InvoiceId, ParseInvoiceStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// No payment has been received.
    Unpaid,
    /// Some, but not all, of the balance has been received.
    PartiallyPaid,
    /// The invoice has been settled in full.
    FullyPaid,
}

impl InvoiceStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::PartiallyPaid => "partially_paid",
            Self::FullyPaid => "fully_paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = ParseInvoiceStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unpaid" => Ok(Self::Unpaid),
            "partially_paid" => Ok(Self::PartiallyPaid),
            "fully_paid" => Ok(Self::FullyPaid),
            _ => Err(ParseInvoiceStatusError(value.to_owned())),
        }
    }
}

/// Invoice linked to a project.
///
/// The balance is held in INR minor units (paise) to keep guard arithmetic
/// exact. The guard only ever reads invoices; nothing in this crate mutates
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    status: InvoiceStatus,
    balance_minor: i64,
}

impl Invoice {
    /// Creates an invoice with the given payment state.
    #[must_use]
    pub const fn new(id: InvoiceId, status: InvoiceStatus, balance_minor: i64) -> Self {
        Self {
            id,
            status,
            balance_minor,
        }
    }

    /// Returns the invoice identifier.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Returns the payment status.
    #[must_use]
    pub const fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Returns the balance due in minor units.
    #[must_use]
    pub const fn balance_minor(&self) -> i64 {
        self.balance_minor
    }

    /// Returns whether the invoice is considered paid.
    ///
    /// An invoice is settled when its status is fully paid or nothing
    /// remains to collect.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self.status, InvoiceStatus::FullyPaid) || self.balance_minor <= 0
    }

    /// Formats the balance due as rupees, e.g. `₹50.00`.
    #[must_use]
    pub fn balance_display(&self) -> String {
        let rupees = self.balance_minor.div_euclid(100);
        let paise = self.balance_minor.rem_euclid(100);
        format!("₹{rupees}.{paise:02}")
    }
}
