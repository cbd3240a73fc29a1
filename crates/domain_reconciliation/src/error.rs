//! Reconciliation domain errors

use chrono::NaiveDate;
use core_kernel::StationId;
use thiserror::Error;

/// Errors that can occur in the reconciliation domain
///
/// Validation failures carry the full list of violated rules so a caller can
/// surface every problem at once rather than the first one found.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// The underlying store was unreachable or a query failed
    #[error("Data access failure: {0}")]
    DataAccess(String),

    /// One or more input rules were violated
    #[error("Validation failed: {}", violations.join("; "))]
    Validation { violations: Vec<String> },

    /// The business day is already finalized
    #[error("Day already closed for station {station} on {date}")]
    AlreadyClosed {
        station: StationId,
        date: NaiveDate,
    },

    /// Lookup by identifier missed
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl ReconciliationError {
    pub fn data_access(message: impl Into<String>) -> Self {
        ReconciliationError::DataAccess(message.into())
    }

    /// A validation failure with a single violation
    pub fn violation(message: impl Into<String>) -> Self {
        ReconciliationError::Validation {
            violations: vec![message.into()],
        }
    }

    pub fn validation(violations: Vec<String>) -> Self {
        ReconciliationError::Validation { violations }
    }

    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        ReconciliationError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Returns true if this is a finalize-once violation
    pub fn is_already_closed(&self) -> bool {
        matches!(self, ReconciliationError::AlreadyClosed { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconciliationError::NotFound { .. })
    }
}
