//! Daily reconciliation repository
//!
//! Owns the `daily_reconciliations` table, subject to
//! UNIQUE(station_id, business_date). Lazy creation and the finalize-once
//! rule are both enforced here at the SQL level: creation with
//! ON CONFLICT DO NOTHING, finalization with an UPDATE conditional on
//! `finalized = FALSE`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::TenantId;

use crate::error::DatabaseError;
use crate::tenancy::PartitionResolver;

/// One `daily_reconciliations` row, station name joined in
#[derive(Debug, Clone, FromRow)]
pub struct ReconciliationRow {
    pub id: Uuid,
    pub station_id: Uuid,
    pub business_date: NaiveDate,
    pub station_name: Option<String>,
    pub total_volume: Decimal,
    pub total_sales: Decimal,
    pub cash_sales: Decimal,
    pub card_sales: Decimal,
    pub upi_sales: Decimal,
    pub credit_sales: Decimal,
    pub reported_cash: Decimal,
    pub variance_amount: Decimal,
    pub variance_reason: Option<String>,
    pub finalized: bool,
    pub closed_by: Option<Uuid>,
    pub closed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The figures written when a day is finalized
#[derive(Debug, Clone)]
pub struct FinalizeParams {
    pub total_volume: Decimal,
    pub total_sales: Decimal,
    pub cash_sales: Decimal,
    pub card_sales: Decimal,
    pub upi_sales: Decimal,
    pub credit_sales: Decimal,
    pub reported_cash: Decimal,
    pub variance_amount: Decimal,
    pub variance_reason: Option<String>,
    pub notes: Option<String>,
    pub closed_by: Uuid,
    pub closed_at: DateTime<Utc>,
}

/// Repository for the finalize-once closure records
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    pool: PgPool,
    partitions: PartitionResolver,
}

impl ReconciliationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            partitions: PartitionResolver::new(),
        }
    }

    const SELECT_COLUMNS: &'static str = r#"
        r.id, r.station_id, r.business_date, s.name AS station_name,
        r.total_volume, r.total_sales, r.cash_sales, r.card_sales,
        r.upi_sales, r.credit_sales, r.reported_cash, r.variance_amount,
        r.variance_reason, r.finalized, r.closed_by, r.closed_at, r.notes,
        r.created_at, r.updated_at
    "#;

    /// Materializes an open row for the day if none exists
    ///
    /// The unique key makes this race-safe: two concurrent first reads both
    /// end up observing the single surviving row.
    pub async fn ensure_open(
        &self,
        tenant: TenantId,
        station_id: Uuid,
        business_date: NaiveDate,
    ) -> Result<(), DatabaseError> {
        let table = self.partitions.table(tenant, "daily_reconciliations");
        let sql = format!(
            r#"
            INSERT INTO {table} (
                id, station_id, business_date,
                total_volume, total_sales, cash_sales, card_sales,
                upi_sales, credit_sales, reported_cash, variance_amount,
                finalized, created_at, updated_at
            ) VALUES ($1, $2, $3, 0, 0, 0, 0, 0, 0, 0, 0, FALSE, $4, $4)
            ON CONFLICT (station_id, business_date) DO NOTHING
            "#
        );

        sqlx::query(&sql)
            .bind(Uuid::now_v7())
            .bind(station_id)
            .bind(business_date)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(())
    }

    /// Fetches the day's row, if any
    pub async fn fetch(
        &self,
        tenant: TenantId,
        station_id: Uuid,
        business_date: NaiveDate,
    ) -> Result<Option<ReconciliationRow>, DatabaseError> {
        let table = self.partitions.table(tenant, "daily_reconciliations");
        let stations = self.partitions.table(tenant, "stations");
        let sql = format!(
            r#"
            SELECT {columns}
            FROM {table} r
            LEFT JOIN {stations} s ON s.id = r.station_id
            WHERE r.station_id = $1 AND r.business_date = $2
            "#,
            columns = Self::SELECT_COLUMNS,
        );

        let row = sqlx::query_as::<_, ReconciliationRow>(&sql)
            .bind(station_id)
            .bind(business_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }

    /// Atomically finalizes the day
    ///
    /// Returns the row id on success, `None` if the row was already
    /// finalized or does not exist. The WHERE clause is the whole
    /// concurrency story: of N racing updates exactly one sees
    /// `finalized = FALSE`.
    pub async fn finalize(
        &self,
        tenant: TenantId,
        station_id: Uuid,
        business_date: NaiveDate,
        params: FinalizeParams,
    ) -> Result<Option<Uuid>, DatabaseError> {
        let table = self.partitions.table(tenant, "daily_reconciliations");
        let sql = format!(
            r#"
            UPDATE {table}
            SET total_volume = $3,
                total_sales = $4,
                cash_sales = $5,
                card_sales = $6,
                upi_sales = $7,
                credit_sales = $8,
                reported_cash = $9,
                variance_amount = $10,
                variance_reason = $11,
                notes = $12,
                finalized = TRUE,
                closed_by = $13,
                closed_at = $14,
                updated_at = $14
            WHERE station_id = $1
              AND business_date = $2
              AND finalized = FALSE
            RETURNING id
            "#
        );

        let id = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(station_id)
            .bind(business_date)
            .bind(params.total_volume)
            .bind(params.total_sales)
            .bind(params.cash_sales)
            .bind(params.card_sales)
            .bind(params.upi_sales)
            .bind(params.credit_sales)
            .bind(params.reported_cash)
            .bind(params.variance_amount)
            .bind(params.variance_reason)
            .bind(params.notes)
            .bind(params.closed_by)
            .bind(params.closed_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(id)
    }

    /// Open rows for the tenant, oldest business day first
    pub async fn list_open(
        &self,
        tenant: TenantId,
        station_id: Option<Uuid>,
    ) -> Result<Vec<ReconciliationRow>, DatabaseError> {
        let table = self.partitions.table(tenant, "daily_reconciliations");
        let stations = self.partitions.table(tenant, "stations");
        let sql = format!(
            r#"
            SELECT {columns}
            FROM {table} r
            LEFT JOIN {stations} s ON s.id = r.station_id
            WHERE r.finalized = FALSE
              AND ($1::uuid IS NULL OR r.station_id = $1)
            ORDER BY r.business_date, r.station_id
            "#,
            columns = Self::SELECT_COLUMNS,
        );

        let rows = sqlx::query_as::<_, ReconciliationRow>(&sql)
            .bind(station_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }
}
