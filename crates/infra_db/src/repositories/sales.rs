//! Sale ledger repository
//!
//! Read-only aggregation over the append-only `sale_records` table. The
//! ledger is owned by the upstream nozzle-reading pipeline; this subsystem
//! never inserts or updates sale rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::TenantId;

use crate::error::DatabaseError;
use crate::tenancy::PartitionResolver;

/// Day-level totals per payment bucket
#[derive(Debug, FromRow)]
pub struct SalesTotalsRow {
    pub total_volume: Decimal,
    pub total_revenue: Decimal,
    pub cash_sales: Decimal,
    pub card_sales: Decimal,
    pub upi_sales: Decimal,
    pub credit_sales: Decimal,
}

/// One fuel type's share of the day
#[derive(Debug, FromRow)]
pub struct FuelBreakdownRow {
    pub fuel_type: String,
    pub volume: Decimal,
    pub revenue: Decimal,
}

/// Repository for the sale ledger read model
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: PgPool,
    partitions: PartitionResolver,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            partitions: PartitionResolver::new(),
        }
    }

    /// Sums posted sales per payment bucket within the given UTC window
    ///
    /// Draft and voided rows are excluded in SQL; an empty day returns a row
    /// of zeros thanks to COALESCE.
    pub async fn totals(
        &self,
        tenant: TenantId,
        station_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<SalesTotalsRow, DatabaseError> {
        let table = self.partitions.table(tenant, "sale_records");
        let sql = format!(
            r#"
            SELECT
                COALESCE(SUM(volume), 0) AS total_volume,
                COALESCE(SUM(amount), 0) AS total_revenue,
                COALESCE(SUM(amount) FILTER (WHERE payment_method = 'cash'), 0) AS cash_sales,
                COALESCE(SUM(amount) FILTER (WHERE payment_method = 'card'), 0) AS card_sales,
                COALESCE(SUM(amount) FILTER (WHERE payment_method = 'upi'), 0) AS upi_sales,
                COALESCE(SUM(amount) FILTER (WHERE payment_method = 'credit'), 0) AS credit_sales
            FROM {table}
            WHERE station_id = $1
              AND recorded_at >= $2
              AND recorded_at <= $3
              AND status = 'posted'
            "#
        );

        let row = sqlx::query_as::<_, SalesTotalsRow>(&sql)
            .bind(station_id)
            .bind(from)
            .bind(until)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }

    /// Per-fuel-type volume and revenue within the given UTC window
    ///
    /// Ordered by fuel code so repeated reads produce the same row order.
    pub async fn fuel_breakdown(
        &self,
        tenant: TenantId,
        station_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<FuelBreakdownRow>, DatabaseError> {
        let table = self.partitions.table(tenant, "sale_records");
        let sql = format!(
            r#"
            SELECT
                fuel_type,
                COALESCE(SUM(volume), 0) AS volume,
                COALESCE(SUM(amount), 0) AS revenue
            FROM {table}
            WHERE station_id = $1
              AND recorded_at >= $2
              AND recorded_at <= $3
              AND status = 'posted'
            GROUP BY fuel_type
            ORDER BY fuel_type
            "#
        );

        let rows = sqlx::query_as::<_, FuelBreakdownRow>(&sql)
            .bind(station_id)
            .bind(from)
            .bind(until)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }
}
