//! Per-entry discrepancy ledger
//!
//! Independent of the day-level closure: one row per collection entry
//! evaluated against computed actuals, used by discrepancy dashboards and
//! drill-downs. Rows are produced by an external recurring job; this
//! subsystem classifies, stores, and queries them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CollectionEntryId, DifferenceId, Money, ReconciliationId, StationId};

/// Verdict for one evaluated collection entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceStatus {
    /// Reported and actual agree within the absolute threshold
    Match,
    /// Reported more than the system accounts for
    Over,
    /// Reported less than the system accounts for
    Short,
}

impl DifferenceStatus {
    /// Classifies a signed difference (reported - actual) against an
    /// absolute threshold
    pub fn classify(difference: Money, threshold: Money) -> Self {
        if difference.abs().amount() <= threshold.amount() {
            DifferenceStatus::Match
        } else if difference.is_positive() {
            DifferenceStatus::Over
        } else {
            DifferenceStatus::Short
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceStatus::Match => "match",
            DifferenceStatus::Over => "over",
            DifferenceStatus::Short => "short",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "match" => Some(DifferenceStatus::Match),
            "over" => Some(DifferenceStatus::Over),
            "short" => Some(DifferenceStatus::Short),
            _ => None,
        }
    }
}

/// One discrepancy record
///
/// Not constrained by the closure table's one-row-per-day rule: many may
/// exist per station/date, one per evaluated collection entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationDifference {
    pub id: DifferenceId,
    pub station_id: StationId,
    pub business_date: NaiveDate,
    pub reported_cash: Money,
    pub actual_cash: Money,
    /// Signed: reported - actual
    pub difference: Money,
    pub status: DifferenceStatus,
    pub collection_entry_id: Option<CollectionEntryId>,
    pub reconciliation_id: Option<ReconciliationId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query filter for listing discrepancy records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceFilter {
    pub station_id: Option<StationId>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<DifferenceStatus>,
}

impl DifferenceFilter {
    /// True if a record passes every set filter field
    pub fn matches(&self, record: &ReconciliationDifference) -> bool {
        if let Some(station) = self.station_id {
            if record.station_id != station {
                return false;
            }
        }
        if let Some(from) = self.from_date {
            if record.business_date < from {
                return false;
            }
        }
        if let Some(to) = self.to_date {
            if record.business_date > to {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        true
    }
}

/// Dashboard rollup over the trailing window of non-matching entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscrepancySummary {
    pub window_days: u32,
    pub mismatch_count: u64,
    pub over_count: u64,
    pub short_count: u64,
    /// Largest absolute discrepancy in the window, if any
    pub largest_difference: Option<Money>,
    /// The 5 most recent non-matching entries
    pub recent: Vec<ReconciliationDifference>,
}

impl DiscrepancySummary {
    pub const WINDOW_DAYS: u32 = 30;
    pub const RECENT_LIMIT: usize = 5;

    pub fn empty() -> Self {
        Self {
            window_days: Self::WINDOW_DAYS,
            mismatch_count: 0,
            over_count: 0,
            short_count: 0,
            largest_difference: None,
            recent: Vec::new(),
        }
    }

    /// Builds the rollup from all records in the trailing window
    ///
    /// `records` may arrive in any order; recency is decided by creation
    /// timestamp. Matching entries contribute nothing.
    pub fn from_window(records: impl IntoIterator<Item = ReconciliationDifference>) -> Self {
        let mut mismatches: Vec<ReconciliationDifference> = records
            .into_iter()
            .filter(|r| r.status != DifferenceStatus::Match)
            .collect();

        let mut summary = Self::empty();
        summary.mismatch_count = mismatches.len() as u64;
        summary.over_count = mismatches
            .iter()
            .filter(|r| r.status == DifferenceStatus::Over)
            .count() as u64;
        summary.short_count = mismatches
            .iter()
            .filter(|r| r.status == DifferenceStatus::Short)
            .count() as u64;
        summary.largest_difference = mismatches
            .iter()
            .map(|r| r.difference.abs())
            .max_by(|a, b| a.amount().cmp(&b.amount()));

        mismatches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mismatches.truncate(Self::RECENT_LIMIT);
        summary.recent = mismatches;

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn threshold() -> Money {
        Money::inr(dec!(1.00))
    }

    fn record(diff: rust_decimal::Decimal, age_hours: i64) -> ReconciliationDifference {
        let difference = Money::inr(diff);
        let now = Utc::now();
        ReconciliationDifference {
            id: DifferenceId::new(),
            station_id: StationId::new(),
            business_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            reported_cash: Money::inr(dec!(1000)) + difference,
            actual_cash: Money::inr(dec!(1000)),
            difference,
            status: DifferenceStatus::classify(difference, threshold()),
            collection_entry_id: None,
            reconciliation_id: None,
            created_at: now - Duration::hours(age_hours),
            updated_at: now,
        }
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(
            DifferenceStatus::classify(Money::inr(dec!(0)), threshold()),
            DifferenceStatus::Match
        );
        // exactly at the threshold still matches
        assert_eq!(
            DifferenceStatus::classify(Money::inr(dec!(1.00)), threshold()),
            DifferenceStatus::Match
        );
        assert_eq!(
            DifferenceStatus::classify(Money::inr(dec!(-1.00)), threshold()),
            DifferenceStatus::Match
        );
        assert_eq!(
            DifferenceStatus::classify(Money::inr(dec!(1.01)), threshold()),
            DifferenceStatus::Over
        );
        assert_eq!(
            DifferenceStatus::classify(Money::inr(dec!(-5.00)), threshold()),
            DifferenceStatus::Short
        );
    }

    #[test]
    fn test_filter_matching() {
        let rec = record(dec!(10), 0);

        assert!(DifferenceFilter::default().matches(&rec));
        assert!(DifferenceFilter {
            status: Some(DifferenceStatus::Over),
            ..Default::default()
        }
        .matches(&rec));
        assert!(!DifferenceFilter {
            status: Some(DifferenceStatus::Short),
            ..Default::default()
        }
        .matches(&rec));
        assert!(!DifferenceFilter {
            station_id: Some(StationId::new()),
            ..Default::default()
        }
        .matches(&rec));
        assert!(!DifferenceFilter {
            from_date: NaiveDate::from_ymd_opt(2024, 3, 16),
            ..Default::default()
        }
        .matches(&rec));
    }

    #[test]
    fn test_summary_counts_and_largest() {
        let records = vec![
            record(dec!(0.50), 1),   // match, ignored
            record(dec!(25.00), 2),  // over
            record(dec!(-40.00), 3), // short, largest
            record(dec!(5.00), 4),   // over
        ];

        let summary = DiscrepancySummary::from_window(records);
        assert_eq!(summary.mismatch_count, 3);
        assert_eq!(summary.over_count, 2);
        assert_eq!(summary.short_count, 1);
        assert_eq!(summary.largest_difference.unwrap().amount(), dec!(40.00));
    }

    #[test]
    fn test_summary_recent_is_newest_first_and_capped() {
        let records: Vec<_> = (0..8).map(|i| record(dec!(10), i)).collect();

        let summary = DiscrepancySummary::from_window(records);
        assert_eq!(summary.recent.len(), DiscrepancySummary::RECENT_LIMIT);
        for pair in summary.recent.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }
}
