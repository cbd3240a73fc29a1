//! Request/Response data transfer objects

pub mod reconciliation;
pub mod differences;
