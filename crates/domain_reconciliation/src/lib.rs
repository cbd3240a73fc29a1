//! Reconciliation Domain - Daily Sales Reconciliation & Closure
//!
//! This crate owns the only stateful invariants of the fuel-station backend:
//! the comparison of machine-derived sales against human-reported collections
//! for one (tenant, station, business day), and the one-way transition that
//! locks a day once it has been reconciled.
//!
//! # Lifecycle of a business day
//!
//! ```text
//! absent ──(first summary read)──▶ open ──(close_day)──▶ finalized
//! ```
//!
//! The open record is recomputed freely; the finalized record is immutable.
//! No code path reopens a finalized day.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_reconciliation::{ReconciliationService, TolerancePolicy};
//!
//! let service = ReconciliationService::new(sales, collections, closures, differences)
//!     .with_policy(TolerancePolicy::default());
//!
//! let summary = service.get_summary(tenant, station, date).await?;
//! if summary.differences.within_tolerance {
//!     service.close_day(tenant, station, date, actor, None).await?;
//! }
//! ```

pub mod sales;
pub mod collections;
pub mod variance;
pub mod classify;
pub mod closure;
pub mod difference;
pub mod summary;
pub mod ports;
pub mod service;
pub mod error;

pub use sales::{FuelType, PaymentMethod, SaleStatus, SaleRecord, FuelAggregate, SystemCalculatedSales};
pub use collections::{CollectionEntry, UserEnteredCash};
pub use variance::{Differences, TolerancePolicy, compute_differences};
pub use classify::{classify, Classification, IssueCode, IssueSeverity, RiskTier, ValidationIssue};
pub use closure::{ClosureSnapshot, ClosureValidation, CloseOutcome, DailyReconciliation};
pub use difference::{DifferenceFilter, DifferenceStatus, DiscrepancySummary, ReconciliationDifference};
pub use summary::ReconciliationSummary;
pub use ports::{ClosureStore, CollectionSource, DifferenceStore, SaleLedger};
pub use service::ReconciliationService;
pub use error::ReconciliationError;
