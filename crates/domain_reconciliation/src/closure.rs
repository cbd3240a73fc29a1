//! The daily closure record and its finalize-once lifecycle
//!
//! At most one `DailyReconciliation` row exists per (tenant, station, date).
//! It is created lazily in the open state on first summary read, recomputed
//! freely while open, and frozen forever by the first successful close.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ActorId, Money, ReconciliationId, StationId, TenantId};

use crate::sales::SystemCalculatedSales;

/// The closure record for one station business day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReconciliation {
    pub id: ReconciliationId,
    pub tenant_id: TenantId,
    pub station_id: StationId,
    pub business_date: NaiveDate,
    /// Station display name, joined in on read for summary assembly
    pub station_name: Option<String>,

    // System-calculated totals, snapshotted at close time
    pub total_volume: Decimal,
    pub total_sales: Money,
    pub cash_sales: Money,
    pub card_sales: Money,
    pub upi_sales: Money,
    pub credit_sales: Money,

    // Human-reported side
    pub reported_cash: Money,
    pub variance_amount: Money,
    /// Required whenever the variance exceeds the absolute threshold
    pub variance_reason: Option<String>,

    // Finalize-once state
    pub finalized: bool,
    pub closed_by: Option<ActorId>,
    pub closed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyReconciliation {
    /// A fresh open record with zeroed totals, as materialized on first read
    pub fn open(tenant_id: TenantId, station_id: StationId, business_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: ReconciliationId::new_v7(),
            tenant_id,
            station_id,
            business_date,
            station_name: None,
            total_volume: Decimal::ZERO,
            total_sales: Money::zero_inr(),
            cash_sales: Money::zero_inr(),
            card_sales: Money::zero_inr(),
            upi_sales: Money::zero_inr(),
            credit_sales: Money::zero_inr(),
            reported_cash: Money::zero_inr(),
            variance_amount: Money::zero_inr(),
            variance_reason: None,
            finalized: false,
            closed_by: None,
            closed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// The freshly computed figures written atomically when a day closes
///
/// Built from a re-derived summary at close time; caller-supplied numbers are
/// never trusted for the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureSnapshot {
    pub total_volume: Decimal,
    pub total_sales: Money,
    pub cash_sales: Money,
    pub card_sales: Money,
    pub upi_sales: Money,
    pub credit_sales: Money,
    pub reported_cash: Money,
    pub variance_amount: Money,
    pub variance_reason: Option<String>,
    pub notes: Option<String>,
}

impl ClosureSnapshot {
    /// Snapshots the system side from freshly aggregated sales
    pub fn from_system(system: &SystemCalculatedSales) -> Self {
        Self {
            total_volume: system.total_volume,
            total_sales: system.total_revenue,
            cash_sales: system.cash_sales,
            card_sales: system.card_sales,
            upi_sales: system.upi_sales,
            credit_sales: system.credit_sales,
            reported_cash: Money::zero_inr(),
            variance_amount: Money::zero_inr(),
            variance_reason: None,
            notes: None,
        }
    }

    pub fn with_reported_cash(mut self, reported: Money, variance: Money) -> Self {
        self.reported_cash = reported;
        self.variance_amount = variance;
        self
    }

    pub fn with_variance_reason(mut self, reason: Option<String>) -> Self {
        self.variance_reason = reason;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

/// Result of a non-mutating closure pre-flight check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureValidation {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ClosureValidation {
    pub fn new() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.valid = false;
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Result of a successful close
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseOutcome {
    pub id: ReconciliationId,
    pub warnings: Vec<String>,
}
