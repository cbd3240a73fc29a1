//! Discrepancy ledger DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use core_kernel::StationId;
use domain_reconciliation::{DifferenceFilter, DifferenceStatus};

/// Query string filters for the difference listing
#[derive(Debug, Default, Deserialize)]
pub struct DifferenceListQuery {
    pub station_id: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl DifferenceListQuery {
    /// Converts to a domain filter; an unknown status string is a caller
    /// error surfaced as `Err` with the offending value
    pub fn into_filter(self) -> Result<DifferenceFilter, String> {
        let status = match self.status {
            Some(raw) => Some(DifferenceStatus::from_code(&raw).ok_or(raw)?),
            None => None,
        };

        Ok(DifferenceFilter {
            station_id: self.station_id.map(StationId::from_uuid),
            from_date: self.from_date,
            to_date: self.to_date,
            status,
        })
    }
}
