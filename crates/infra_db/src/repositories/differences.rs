//! Discrepancy ledger repository
//!
//! Read access to the `reconciliation_differences` table. Rows are written
//! by the recurring evaluation job elsewhere in the platform; this subsystem
//! queries and summarizes them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::TenantId;

use crate::error::DatabaseError;
use crate::tenancy::PartitionResolver;

/// One `reconciliation_differences` row
#[derive(Debug, Clone, FromRow)]
pub struct DifferenceRow {
    pub id: Uuid,
    pub station_id: Uuid,
    pub business_date: NaiveDate,
    pub reported_cash: Decimal,
    pub actual_cash: Decimal,
    pub difference: Decimal,
    pub status: String,
    pub collection_entry_id: Option<Uuid>,
    pub reconciliation_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional filters for listing difference rows
#[derive(Debug, Clone, Default)]
pub struct DifferenceQuery {
    pub station_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Repository for the per-entry discrepancy ledger
#[derive(Debug, Clone)]
pub struct DifferenceRepository {
    pool: PgPool,
    partitions: PartitionResolver,
}

impl DifferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            partitions: PartitionResolver::new(),
        }
    }

    const SELECT_COLUMNS: &'static str = r#"
        id, station_id, business_date, reported_cash, actual_cash,
        difference, status, collection_entry_id, reconciliation_id,
        created_at, updated_at
    "#;

    /// Filtered listing, most recent business day first
    pub async fn list(
        &self,
        tenant: TenantId,
        query: DifferenceQuery,
    ) -> Result<Vec<DifferenceRow>, DatabaseError> {
        let table = self.partitions.table(tenant, "reconciliation_differences");
        let sql = format!(
            r#"
            SELECT {columns}
            FROM {table}
            WHERE ($1::uuid IS NULL OR station_id = $1)
              AND ($2::date IS NULL OR business_date >= $2)
              AND ($3::date IS NULL OR business_date <= $3)
              AND ($4::text IS NULL OR status = $4)
            ORDER BY business_date DESC, created_at DESC
            "#,
            columns = Self::SELECT_COLUMNS,
        );

        let rows = sqlx::query_as::<_, DifferenceRow>(&sql)
            .bind(query.station_id)
            .bind(query.from_date)
            .bind(query.to_date)
            .bind(query.status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }

    /// Single row by id
    pub async fn get(
        &self,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<Option<DifferenceRow>, DatabaseError> {
        let table = self.partitions.table(tenant, "reconciliation_differences");
        let sql = format!(
            r#"
            SELECT {columns}
            FROM {table}
            WHERE id = $1
            "#,
            columns = Self::SELECT_COLUMNS,
        );

        let row = sqlx::query_as::<_, DifferenceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }

    /// Every row in a trailing date window, for the dashboard rollup
    pub async fn window(
        &self,
        tenant: TenantId,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<DifferenceRow>, DatabaseError> {
        let table = self.partitions.table(tenant, "reconciliation_differences");
        let sql = format!(
            r#"
            SELECT {columns}
            FROM {table}
            WHERE business_date >= $1 AND business_date <= $2
            "#,
            columns = Self::SELECT_COLUMNS,
        );

        let rows = sqlx::query_as::<_, DifferenceRow>(&sql)
            .bind(from_date)
            .bind(to_date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(rows)
    }
}
