//! PostgreSQL reconciliation adapter
//!
//! Implements the four domain storage ports over the repositories. The
//! adapter translates row types to domain types and database errors to
//! [`ReconciliationError`] variants. One struct carries all four ports so
//! the server wires a single value into the service.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    ActorId, BusinessDay, CollectionEntryId, DifferenceId, Money, ReconciliationId, StationId,
    TenantId, Timezone,
};
use domain_reconciliation::{
    ClosureSnapshot, ClosureStore, CollectionSource, DailyReconciliation, DifferenceFilter,
    DifferenceStatus, DifferenceStore, DiscrepancySummary, FuelAggregate, FuelType,
    ReconciliationDifference, ReconciliationError, SaleLedger, SystemCalculatedSales,
    UserEnteredCash,
};

use crate::error::DatabaseError;
use crate::repositories::differences::{DifferenceQuery, DifferenceRow};
use crate::repositories::reconciliation::{FinalizeParams, ReconciliationRow};
use crate::repositories::{
    CollectionRepository, DifferenceRepository, ReconciliationRepository, SaleRepository,
};

/// PostgreSQL-backed implementation of the reconciliation storage ports
#[derive(Debug, Clone)]
pub struct PostgresReconciliationAdapter {
    sales: SaleRepository,
    collections: CollectionRepository,
    reconciliations: ReconciliationRepository,
    differences: DifferenceRepository,
    timezone: Timezone,
}

impl PostgresReconciliationAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sales: SaleRepository::new(pool.clone()),
            collections: CollectionRepository::new(pool.clone()),
            reconciliations: ReconciliationRepository::new(pool.clone()),
            differences: DifferenceRepository::new(pool),
            timezone: Timezone::ist(),
        }
    }

    /// Overrides the station locality used to bound a business day
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }
}

fn translate(err: DatabaseError) -> ReconciliationError {
    ReconciliationError::data_access(err.to_string())
}

fn map_reconciliation(tenant: TenantId, row: ReconciliationRow) -> DailyReconciliation {
    DailyReconciliation {
        id: ReconciliationId::from_uuid(row.id),
        tenant_id: tenant,
        station_id: StationId::from_uuid(row.station_id),
        business_date: row.business_date,
        station_name: row.station_name,
        total_volume: row.total_volume,
        total_sales: Money::inr(row.total_sales),
        cash_sales: Money::inr(row.cash_sales),
        card_sales: Money::inr(row.card_sales),
        upi_sales: Money::inr(row.upi_sales),
        credit_sales: Money::inr(row.credit_sales),
        reported_cash: Money::inr(row.reported_cash),
        variance_amount: Money::inr(row.variance_amount),
        variance_reason: row.variance_reason,
        finalized: row.finalized,
        closed_by: row.closed_by.map(ActorId::from_uuid),
        closed_at: row.closed_at,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn map_difference(row: DifferenceRow) -> Result<ReconciliationDifference, ReconciliationError> {
    let status = DifferenceStatus::from_code(&row.status).ok_or_else(|| {
        ReconciliationError::data_access(format!(
            "Unknown difference status '{}' on row {}",
            row.status, row.id
        ))
    })?;

    Ok(ReconciliationDifference {
        id: DifferenceId::from_uuid(row.id),
        station_id: StationId::from_uuid(row.station_id),
        business_date: row.business_date,
        reported_cash: Money::inr(row.reported_cash),
        actual_cash: Money::inr(row.actual_cash),
        difference: Money::inr(row.difference),
        status,
        collection_entry_id: row.collection_entry_id.map(CollectionEntryId::from_uuid),
        reconciliation_id: row.reconciliation_id.map(ReconciliationId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn day_bounds(date: NaiveDate, timezone: Timezone) -> (DateTime<Utc>, DateTime<Utc>) {
    BusinessDay::new(date, timezone).utc_bounds()
}

#[async_trait]
impl SaleLedger for PostgresReconciliationAdapter {
    #[instrument(skip(self), fields(tenant = %tenant, station = %station, date = %date))]
    async fn system_sales(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<SystemCalculatedSales, ReconciliationError> {
        let (from, until) = day_bounds(date, self.timezone);
        let station_id = *station.as_uuid();

        let totals = self
            .sales
            .totals(tenant, station_id, from, until)
            .await
            .map_err(translate)?;
        let breakdown = self
            .sales
            .fuel_breakdown(tenant, station_id, from, until)
            .await
            .map_err(translate)?;

        let mut sales = SystemCalculatedSales::zero();
        sales.total_volume = totals.total_volume;
        sales.total_revenue = Money::inr(totals.total_revenue);
        sales.cash_sales = Money::inr(totals.cash_sales);
        sales.card_sales = Money::inr(totals.card_sales);
        sales.upi_sales = Money::inr(totals.upi_sales);
        sales.credit_sales = Money::inr(totals.credit_sales);

        for row in breakdown {
            let bucket = sales
                .fuel_breakdown
                .entry(FuelType::from_code(&row.fuel_type))
                .or_insert_with(FuelAggregate::zero);
            bucket.volume += row.volume;
            bucket.revenue = bucket.revenue + Money::inr(row.revenue);
        }

        debug!(revenue = %sales.total_revenue, "Aggregated system sales");
        Ok(sales)
    }
}

#[async_trait]
impl CollectionSource for PostgresReconciliationAdapter {
    #[instrument(skip(self), fields(tenant = %tenant, station = %station, date = %date))]
    async fn user_entered_cash(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<UserEnteredCash, ReconciliationError> {
        let totals = self
            .collections
            .totals(tenant, *station.as_uuid(), date)
            .await
            .map_err(translate)?;

        let cash = Money::inr(totals.cash_collected);
        let card = Money::inr(totals.card_collected);
        let upi = Money::inr(totals.upi_collected);

        Ok(UserEnteredCash {
            cash_collected: cash,
            card_collected: card,
            upi_collected: upi,
            total_collected: cash + card + upi,
        })
    }
}

#[async_trait]
impl ClosureStore for PostgresReconciliationAdapter {
    #[instrument(skip(self), fields(tenant = %tenant, station = %station, date = %date))]
    async fn get_or_create_open(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<DailyReconciliation, ReconciliationError> {
        let station_id = *station.as_uuid();

        self.reconciliations
            .ensure_open(tenant, station_id, date)
            .await
            .map_err(translate)?;

        let row = self
            .reconciliations
            .fetch(tenant, station_id, date)
            .await
            .map_err(translate)?
            .ok_or_else(|| {
                ReconciliationError::data_access("Closure row vanished after creation")
            })?;

        Ok(map_reconciliation(tenant, row))
    }

    #[instrument(skip(self), fields(tenant = %tenant, station = %station, date = %date))]
    async fn find(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
    ) -> Result<Option<DailyReconciliation>, ReconciliationError> {
        let row = self
            .reconciliations
            .fetch(tenant, *station.as_uuid(), date)
            .await
            .map_err(translate)?;

        Ok(row.map(|r| map_reconciliation(tenant, r)))
    }

    #[instrument(skip(self, snapshot), fields(tenant = %tenant, station = %station, date = %date))]
    async fn finalize(
        &self,
        tenant: TenantId,
        station: StationId,
        date: NaiveDate,
        snapshot: ClosureSnapshot,
        closed_by: ActorId,
        closed_at: DateTime<Utc>,
    ) -> Result<ReconciliationId, ReconciliationError> {
        let station_id = *station.as_uuid();

        // The row may not exist yet if nothing has read the day's summary
        self.reconciliations
            .ensure_open(tenant, station_id, date)
            .await
            .map_err(translate)?;

        let params = FinalizeParams {
            total_volume: snapshot.total_volume,
            total_sales: snapshot.total_sales.amount(),
            cash_sales: snapshot.cash_sales.amount(),
            card_sales: snapshot.card_sales.amount(),
            upi_sales: snapshot.upi_sales.amount(),
            credit_sales: snapshot.credit_sales.amount(),
            reported_cash: snapshot.reported_cash.amount(),
            variance_amount: snapshot.variance_amount.amount(),
            variance_reason: snapshot.variance_reason,
            notes: snapshot.notes,
            closed_by: *closed_by.as_uuid(),
            closed_at,
        };

        let id = self
            .reconciliations
            .finalize(tenant, station_id, date, params)
            .await
            .map_err(translate)?;

        match id {
            Some(id) => {
                debug!(%id, "Closure row finalized");
                Ok(ReconciliationId::from_uuid(id))
            }
            // The conditional update matched nothing: a competing closer won
            None => Err(ReconciliationError::AlreadyClosed { station, date }),
        }
    }

    #[instrument(skip(self), fields(tenant = %tenant))]
    async fn list_open(
        &self,
        tenant: TenantId,
        station: Option<StationId>,
    ) -> Result<Vec<DailyReconciliation>, ReconciliationError> {
        let rows = self
            .reconciliations
            .list_open(tenant, station.map(|s| *s.as_uuid()))
            .await
            .map_err(translate)?;

        Ok(rows
            .into_iter()
            .map(|r| map_reconciliation(tenant, r))
            .collect())
    }
}

#[async_trait]
impl DifferenceStore for PostgresReconciliationAdapter {
    #[instrument(skip(self, filter), fields(tenant = %tenant))]
    async fn list(
        &self,
        tenant: TenantId,
        filter: DifferenceFilter,
    ) -> Result<Vec<ReconciliationDifference>, ReconciliationError> {
        let query = DifferenceQuery {
            station_id: filter.station_id.map(|s| *s.as_uuid()),
            from_date: filter.from_date,
            to_date: filter.to_date,
            status: filter.status.map(|s| s.as_str().to_string()),
        };

        let rows = self.differences.list(tenant, query).await.map_err(translate)?;
        rows.into_iter().map(map_difference).collect()
    }

    #[instrument(skip(self), fields(tenant = %tenant, id = %id))]
    async fn get(
        &self,
        tenant: TenantId,
        id: DifferenceId,
    ) -> Result<ReconciliationDifference, ReconciliationError> {
        let row = self
            .differences
            .get(tenant, *id.as_uuid())
            .await
            .map_err(translate)?
            .ok_or_else(|| ReconciliationError::not_found("reconciliation difference", id))?;

        map_difference(row)
    }

    #[instrument(skip(self), fields(tenant = %tenant, as_of = %as_of))]
    async fn discrepancy_summary(
        &self,
        tenant: TenantId,
        as_of: NaiveDate,
    ) -> Result<DiscrepancySummary, ReconciliationError> {
        // Inclusive of as_of, so the window covers exactly WINDOW_DAYS calendar days.
        let from = as_of - Duration::days(DiscrepancySummary::WINDOW_DAYS as i64 - 1);
        let rows = self
            .differences
            .window(tenant, from, as_of)
            .await
            .map_err(translate)?;

        let records = rows
            .into_iter()
            .map(map_difference)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DiscrepancySummary::from_window(records))
    }
}
