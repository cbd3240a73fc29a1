//! The derived reconciliation summary
//!
//! Assembled on demand from the sale ledger, the collection entries, the
//! variance calculator, the classifier, and the persisted closure record.
//! Never stored as its own row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ActorId, StationId};

use crate::classify::{classify, RiskTier, ValidationIssue};
use crate::closure::DailyReconciliation;
use crate::collections::UserEnteredCash;
use crate::sales::SystemCalculatedSales;
use crate::variance::{compute_differences, Differences, TolerancePolicy};

/// One station-day reconciliation view
///
/// Field containers are ordered, so building the same summary twice over
/// unchanged data serializes byte-identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub station_id: StationId,
    pub station_name: Option<String>,
    pub business_date: NaiveDate,

    pub system: SystemCalculatedSales,
    pub reported: UserEnteredCash,
    pub differences: Differences,

    pub is_reconciled: bool,
    pub reconciled_by: Option<ActorId>,
    pub reconciled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,

    pub issues: Vec<ValidationIssue>,
    pub recommended_actions: Vec<String>,
    pub risk_tier: RiskTier,
}

impl ReconciliationSummary {
    /// Assembles the summary from its parts
    ///
    /// Pure given its inputs: all I/O happens before this point.
    pub fn assemble(
        record: &DailyReconciliation,
        system: SystemCalculatedSales,
        reported: UserEnteredCash,
        policy: &TolerancePolicy,
    ) -> Self {
        let differences = compute_differences(&system, &reported, policy);
        let classification = classify(&system, &reported, &differences, policy);

        Self {
            station_id: record.station_id,
            station_name: record.station_name.clone(),
            business_date: record.business_date,
            system,
            reported,
            differences,
            is_reconciled: record.finalized,
            reconciled_by: record.closed_by,
            reconciled_at: record.closed_at,
            notes: record.notes.clone(),
            issues: classification.issues,
            recommended_actions: classification.recommended_actions,
            risk_tier: classification.risk_tier,
        }
    }
}
