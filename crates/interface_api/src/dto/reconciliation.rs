//! Reconciliation DTOs
//!
//! Summaries, validations, and close outcomes serialize straight from the
//! domain types; the DTOs here cover request bodies and the thin response
//! wrappers the domain has no type for.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_reconciliation::DailyReconciliation;

/// Body of a pre-flight validation call
#[derive(Debug, Deserialize)]
pub struct ValidateCloseRequest {
    pub reported_cash: Decimal,
}

/// Body of a plain close call
#[derive(Debug, Default, Deserialize)]
pub struct CloseDayRequest {
    pub notes: Option<String>,
}

/// Body of a cash-report close call
#[derive(Debug, Deserialize)]
pub struct CloseCashRequest {
    pub reported_cash: Decimal,
    pub variance_reason: Option<String>,
}

/// Result of a successful close
#[derive(Debug, Serialize)]
pub struct CloseOutcomeResponse {
    pub id: Uuid,
    pub warnings: Vec<String>,
}

/// Closed-state probe response
#[derive(Debug, Serialize)]
pub struct ClosedStateResponse {
    pub closed: bool,
}

/// One open day in the backlog listing
#[derive(Debug, Serialize)]
pub struct OpenDayResponse {
    pub id: Uuid,
    pub station_id: Uuid,
    pub station_name: Option<String>,
    pub business_date: NaiveDate,
    pub total_sales: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<DailyReconciliation> for OpenDayResponse {
    fn from(record: DailyReconciliation) -> Self {
        Self {
            id: (*record.id.as_uuid()),
            station_id: (*record.station_id.as_uuid()),
            station_name: record.station_name,
            business_date: record.business_date,
            total_sales: record.total_sales.amount(),
            created_at: record.created_at,
        }
    }
}
