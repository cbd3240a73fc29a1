//! Port traits to the backing store
//!
//! The domain depends only on these traits; `infra_db` provides the
//! PostgreSQL adapters and `test_utils` provides in-memory fakes. Every
//! operation is scoped by tenant so an adapter can resolve the tenant's
//! isolated partition before touching data.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use core_kernel::{ActorId, DifferenceId, ReconciliationId, StationId, TenantId};

use crate::closure::{ClosureSnapshot, DailyReconciliation};
use crate::collections::UserEnteredCash;
use crate::difference::{DifferenceFilter, DiscrepancySummary, ReconciliationDifference};
use crate::error::ReconciliationError;
use crate::sales::SystemCalculatedSales;

/// Read-only aggregation over the append-only sale ledger
#[async_trait]
pub trait SaleLedger: Send + Sync {
    /// Per-payment-method and per-fuel-type aggregates for one station day
    ///
    /// Voided and draft records never count. A day with no rows yields
    /// all-zero aggregates, not an error.
    async fn system_sales(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<SystemCalculatedSales, ReconciliationError>;
}

/// Read-only sum over human-submitted collection entries
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Sums all entries for the day; absence yields zeros
    async fn user_entered_cash(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<UserEnteredCash, ReconciliationError>;
}

/// Storage for the finalize-once closure records
#[async_trait]
pub trait ClosureStore: Send + Sync {
    /// Returns the day's record, materializing an open one if absent
    ///
    /// Implementations must make the create race-safe: two concurrent first
    /// reads of the same key observe the same single row.
    async fn get_or_create_open(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<DailyReconciliation, ReconciliationError>;

    /// Returns the day's record without creating one
    async fn find(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<Option<DailyReconciliation>, ReconciliationError>;

    /// Atomically finalizes the day with the given snapshot
    ///
    /// The write must be conditional on `finalized = false` so that of N
    /// concurrent closers exactly one succeeds; the rest get
    /// [`ReconciliationError::AlreadyClosed`]. No partial state may remain
    /// on failure.
    async fn finalize(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
        snapshot: ClosureSnapshot,
        closed_by: ActorId,
        closed_at: DateTime<Utc>,
    ) -> Result<ReconciliationId, ReconciliationError>;

    /// Open (not yet finalized) days for a tenant, optionally one station
    async fn list_open(
        &self,
        tenant: TenantId,
        station: Option<StationId>,
    ) -> Result<Vec<DailyReconciliation>, ReconciliationError>;
}

/// Storage for the per-entry discrepancy ledger
#[async_trait]
pub trait DifferenceStore: Send + Sync {
    async fn list(
        &self,
        tenant: TenantId,
        filter: DifferenceFilter,
    ) -> Result<Vec<ReconciliationDifference>, ReconciliationError>;

    /// Fails with [`ReconciliationError::NotFound`] on a miss
    async fn get(
        &self,
        tenant: TenantId,
        id: DifferenceId,
    ) -> Result<ReconciliationDifference, ReconciliationError>;

    /// Trailing-30-day dashboard rollup as of the given date
    async fn discrepancy_summary(
        &self,
        tenant: TenantId,
        as_of: NaiveDate,
    ) -> Result<DiscrepancySummary, ReconciliationError>;
}
