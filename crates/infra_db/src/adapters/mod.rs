//! Port adapters
//!
//! Implementations of the domain port traits over the repositories.

pub mod reconciliation;

pub use reconciliation::PostgresReconciliationAdapter;
