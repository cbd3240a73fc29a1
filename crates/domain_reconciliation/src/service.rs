//! Reconciliation application service
//!
//! Orchestrates the readers, the variance calculator, the classifier, and
//! the closure store behind the operations the transport layer exposes. The
//! service itself holds no mutable state; the only contended resource is the
//! closure row, and that contention is settled inside the store's conditional
//! finalize.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use tracing::{debug, info, instrument};

use core_kernel::{ActorId, BusinessDay, DifferenceId, Money, StationId, TenantId, Timezone};

use crate::closure::{CloseOutcome, ClosureSnapshot, ClosureValidation, DailyReconciliation};
use crate::difference::{DifferenceFilter, DiscrepancySummary, ReconciliationDifference};
use crate::error::ReconciliationError;
use crate::ports::{ClosureStore, CollectionSource, DifferenceStore, SaleLedger};
use crate::summary::ReconciliationSummary;
use crate::variance::{compute_differences, TolerancePolicy};

/// Front door of the reconciliation subsystem
pub struct ReconciliationService {
    sales: Arc<dyn SaleLedger>,
    collections: Arc<dyn CollectionSource>,
    closures: Arc<dyn ClosureStore>,
    differences: Arc<dyn DifferenceStore>,
    policy: TolerancePolicy,
    timezone: Timezone,
}

impl ReconciliationService {
    pub fn new(
        sales: Arc<dyn SaleLedger>,
        collections: Arc<dyn CollectionSource>,
        closures: Arc<dyn ClosureStore>,
        differences: Arc<dyn DifferenceStore>,
    ) -> Self {
        Self {
            sales,
            collections,
            closures,
            differences,
            policy: TolerancePolicy::default(),
            timezone: Timezone::default(),
        }
    }

    /// Overrides the deployment tolerance thresholds
    pub fn with_policy(mut self, policy: TolerancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Overrides the station locality used for future-date checks
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn policy(&self) -> &TolerancePolicy {
        &self.policy
    }

    /// Builds the full reconciliation summary for one station day
    ///
    /// Read-only and idempotent: with unchanged underlying data, repeated
    /// calls return identical values. Materializes the open closure record
    /// on first read.
    #[instrument(skip(self), fields(tenant = %tenant, station = %station, date = %date))]
    pub async fn get_summary(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<ReconciliationSummary, ReconciliationError> {
        debug!("Building reconciliation summary");

        let record = self.closures.get_or_create_open(tenant, station, date).await?;
        let system = self.sales.system_sales(tenant, station, date).await?;
        let reported = self.collections.user_entered_cash(tenant, station, date).await?;

        Ok(ReconciliationSummary::assemble(
            &record,
            system,
            reported,
            &self.policy,
        ))
    }

    /// Non-mutating pre-flight check for a closure attempt
    ///
    /// Never changes state and never fails outright: store problems are
    /// reported inside the errors list so a UI can show everything at once.
    #[instrument(skip(self), fields(tenant = %tenant, station = %station, date = %date))]
    pub async fn validate_closure_attempt(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
        reported_cash: Money,
    ) -> ClosureValidation {
        let mut validation = ClosureValidation::new();

        if reported_cash.is_negative() {
            validation.push_error("Reported cash cannot be negative");
        }

        let day = BusinessDay::new(date, self.timezone);
        if day.is_future(Utc::now()) {
            validation.push_error(format!("Business day {} is in the future", date));
        }

        match self.closures.find(tenant, station, date).await {
            Ok(Some(record)) if record.finalized => {
                validation.push_error(format!("Day {} is already finalized", date));
            }
            Ok(_) => {}
            Err(e) => {
                validation.push_error(format!("Could not load the closure record: {}", e));
            }
        }

        match self.sales.system_sales(tenant, station, date).await {
            Ok(system) => {
                let target = system.collected_revenue();
                if system.total_revenue.is_zero() {
                    if reported_cash.is_positive() {
                        validation.push_warning(format!(
                            "No system sales recorded, yet {} of cash was reported",
                            reported_cash
                        ));
                    }
                } else if !target.is_zero() {
                    let variance = reported_cash - target;
                    let limit = target.multiply(self.policy.preflight_variance_percent / dec!(100));
                    if variance.abs().amount() > limit.amount() {
                        validation.push_warning(format!(
                            "Reported cash differs from system sales by {}, more than {}% of the day's sales",
                            variance,
                            self.policy.preflight_variance_percent.normalize()
                        ));
                    }
                }
            }
            Err(e) => {
                validation.push_error(format!("Failed to aggregate system sales: {}", e));
            }
        }

        validation
    }

    /// Finalizes a business day with a freshly derived snapshot
    ///
    /// Re-derives every figure at call time; caller-supplied numbers are
    /// never trusted. Of N concurrent calls exactly one succeeds, the rest
    /// fail with [`ReconciliationError::AlreadyClosed`].
    #[instrument(skip(self, notes), fields(tenant = %tenant, station = %station, date = %date, actor = %actor))]
    pub async fn close_day(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
        actor: ActorId,
        notes: Option<String>,
    ) -> Result<CloseOutcome, ReconciliationError> {
        let day = BusinessDay::new(date, self.timezone);
        if day.is_future(Utc::now()) {
            return Err(ReconciliationError::violation(format!(
                "Business day {} is in the future",
                date
            )));
        }

        let record = self.closures.get_or_create_open(tenant, station, date).await?;
        if record.is_finalized() {
            return Err(ReconciliationError::AlreadyClosed { station, date });
        }

        let system = self.sales.system_sales(tenant, station, date).await?;
        let reported = self.collections.user_entered_cash(tenant, station, date).await?;
        let diffs = compute_differences(&system, &reported, &self.policy);

        let mut warnings = Vec::new();
        if system.total_revenue.is_zero() && reported.total_collected.is_positive() {
            warnings.push(format!(
                "No system sales recorded, yet {} of collections were reported",
                reported.total_collected
            ));
        }
        if !diffs.within_tolerance {
            warnings.push(format!(
                "Closing with a {}% deviation between collections and system sales",
                diffs.percent_diff
            ));
        }

        let snapshot = ClosureSnapshot::from_system(&system)
            .with_reported_cash(reported.total_collected, diffs.total_diff)
            .with_notes(notes);

        let id = self
            .closures
            .finalize(tenant, station, date, snapshot, actor, Utc::now())
            .await?;

        info!(%id, "Business day finalized");
        Ok(CloseOutcome { id, warnings })
    }

    /// Cash-report variant of the close: the caller vouches for a single
    /// reported-cash figure
    ///
    /// If the reported figure deviates from system sales by more than the
    /// absolute cash threshold, a non-empty variance reason is mandatory and
    /// the operation fails before any write without one.
    #[instrument(skip(self, variance_reason), fields(tenant = %tenant, station = %station, date = %date, actor = %actor))]
    pub async fn close_day_with_cash(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
        reported_cash: Money,
        variance_reason: Option<String>,
        actor: ActorId,
    ) -> Result<CloseOutcome, ReconciliationError> {
        let mut violations = Vec::new();
        if reported_cash.is_negative() {
            violations.push("Reported cash cannot be negative".to_string());
        }
        let day = BusinessDay::new(date, self.timezone);
        if day.is_future(Utc::now()) {
            violations.push(format!("Business day {} is in the future", date));
        }
        if !violations.is_empty() {
            return Err(ReconciliationError::validation(violations));
        }

        let record = self.closures.get_or_create_open(tenant, station, date).await?;
        if record.is_finalized() {
            return Err(ReconciliationError::AlreadyClosed { station, date });
        }

        let system = self.sales.system_sales(tenant, station, date).await?;
        let variance = reported_cash - system.collected_revenue();

        let reason = variance_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);

        if variance.abs().amount() > self.policy.cash_close_threshold.amount() && reason.is_none() {
            return Err(ReconciliationError::violation(format!(
                "Variance of {} between reported cash and system sales requires a variance reason",
                variance
            )));
        }

        let mut warnings = Vec::new();
        if system.total_revenue.is_zero() && reported_cash.is_positive() {
            warnings.push(format!(
                "No system sales recorded, yet {} of cash was reported",
                reported_cash
            ));
        }

        let snapshot = ClosureSnapshot::from_system(&system)
            .with_reported_cash(reported_cash, variance)
            .with_variance_reason(reason);

        let id = self
            .closures
            .finalize(tenant, station, date, snapshot, actor, Utc::now())
            .await?;

        info!(%id, "Business day finalized from cash report");
        Ok(CloseOutcome { id, warnings })
    }

    /// Days that have been materialized but not yet finalized
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn list_open_days(
        &self,
        tenant: TenantId,
        station: Option<StationId>,
    ) -> Result<Vec<DailyReconciliation>, ReconciliationError> {
        self.closures.list_open(tenant, station).await
    }

    /// True once the day's record exists and is finalized
    #[instrument(skip(self), fields(tenant = %tenant, station = %station, date = %date))]
    pub async fn is_day_closed(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<bool, ReconciliationError> {
        Ok(self
            .closures
            .find(tenant, station, date)
            .await?
            .is_some_and(|r| r.finalized))
    }

    #[instrument(skip(self, filter), fields(tenant = %tenant))]
    pub async fn list_differences(
        &self,
        tenant: TenantId,
        filter: DifferenceFilter,
    ) -> Result<Vec<ReconciliationDifference>, ReconciliationError> {
        self.differences.list(tenant, filter).await
    }

    #[instrument(skip(self), fields(tenant = %tenant, id = %id))]
    pub async fn get_difference(
        &self,
        tenant: TenantId,
        id: DifferenceId,
    ) -> Result<ReconciliationDifference, ReconciliationError> {
        self.differences.get(tenant, id).await
    }

    /// Trailing-30-day discrepancy dashboard rollup
    #[instrument(skip(self), fields(tenant = %tenant))]
    pub async fn discrepancy_summary(
        &self,
        tenant: TenantId,
    ) -> Result<DiscrepancySummary, ReconciliationError> {
        let today = self.timezone.local_date(Utc::now());
        self.differences.discrepancy_summary(tenant, today).await
    }
}
