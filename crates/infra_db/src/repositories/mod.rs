//! Repository implementations
//!
//! One repository per table family. Repositories own the SQL and the row
//! types; the adapters in [`crate::adapters`] map rows to domain types.

pub mod sales;
pub mod collections;
pub mod reconciliation;
pub mod differences;

pub use sales::SaleRepository;
pub use collections::CollectionRepository;
pub use reconciliation::ReconciliationRepository;
pub use differences::DifferenceRepository;
