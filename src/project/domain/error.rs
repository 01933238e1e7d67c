//! Error types for project domain parsing.

use thiserror::Error;

/// Error returned while parsing project statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);

/// Error returned while parsing invoice statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invoice status: {0}")]
pub struct ParseInvoiceStatusError(pub String);

/// Error returned while parsing client categories from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown client category: {0}")]
pub struct ParseClientCategoryError(pub String);
