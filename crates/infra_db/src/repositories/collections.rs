//! Collection entry repository
//!
//! Sums the human-submitted `collection_entries` rows for a station day.
//! Entries are written by the collection workflow elsewhere in the platform;
//! reconciliation only reads them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::TenantId;

use crate::error::DatabaseError;
use crate::tenancy::PartitionResolver;

/// Summed collections per channel for one station day
#[derive(Debug, FromRow)]
pub struct CollectionTotalsRow {
    pub cash_collected: Decimal,
    pub card_collected: Decimal,
    pub upi_collected: Decimal,
}

/// Repository for human-submitted collection entries
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    pool: PgPool,
    partitions: PartitionResolver,
}

impl CollectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            partitions: PartitionResolver::new(),
        }
    }

    /// Sums every entry for the day; a day with no entries returns zeros
    pub async fn totals(
        &self,
        tenant: TenantId,
        station_id: Uuid,
        business_date: NaiveDate,
    ) -> Result<CollectionTotalsRow, DatabaseError> {
        let table = self.partitions.table(tenant, "collection_entries");
        let sql = format!(
            r#"
            SELECT
                COALESCE(SUM(cash_amount), 0) AS cash_collected,
                COALESCE(SUM(card_amount), 0) AS card_collected,
                COALESCE(SUM(upi_amount), 0) AS upi_collected
            FROM {table}
            WHERE station_id = $1
              AND business_date = $2
            "#
        );

        let row = sqlx::query_as::<_, CollectionTotalsRow>(&sql)
            .bind(station_id)
            .bind(business_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }
}
