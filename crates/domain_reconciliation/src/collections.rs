//! Human-submitted collection entries and their daily aggregate
//!
//! Collection entries come from the station manager's cash-report submission
//! flow (external to this subsystem). Several entries may exist per day; the
//! reconciliation target is their sum.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CollectionEntryId, CreditorId, Money, StationId, TenantId};

/// One submitted cash report entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: CollectionEntryId,
    pub tenant_id: TenantId,
    pub station_id: StationId,
    pub business_date: NaiveDate,
    pub cash_amount: Money,
    pub card_amount: Money,
    pub upi_amount: Money,
    /// Set when part of the day was settled to a creditor account
    pub creditor_id: Option<CreditorId>,
    pub created_at: DateTime<Utc>,
}

/// Daily sum of user-entered collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnteredCash {
    pub cash_collected: Money,
    pub card_collected: Money,
    pub upi_collected: Money,
    pub total_collected: Money,
}

impl UserEnteredCash {
    /// The aggregate for a day with no submitted entries
    pub fn zero() -> Self {
        Self {
            cash_collected: Money::zero_inr(),
            card_collected: Money::zero_inr(),
            upi_collected: Money::zero_inr(),
            total_collected: Money::zero_inr(),
        }
    }

    /// Sums all entries for the day; absence of entries yields zeros
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CollectionEntry>) -> Self {
        let mut total = Self::zero();
        for entry in entries {
            total.cash_collected = total.cash_collected + entry.cash_amount;
            total.card_collected = total.card_collected + entry.card_amount;
            total.upi_collected = total.upi_collected + entry.upi_amount;
        }
        total.total_collected =
            total.cash_collected + total.card_collected + total.upi_collected;
        total
    }

    pub fn is_zero(&self) -> bool {
        self.total_collected.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(cash: rust_decimal::Decimal, card: rust_decimal::Decimal, upi: rust_decimal::Decimal) -> CollectionEntry {
        CollectionEntry {
            id: CollectionEntryId::new(),
            tenant_id: TenantId::new(),
            station_id: StationId::new(),
            business_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            cash_amount: Money::inr(cash),
            card_amount: Money::inr(card),
            upi_amount: Money::inr(upi),
            creditor_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_entries_yields_zero_not_error() {
        let total = UserEnteredCash::from_entries(&[]);
        assert!(total.is_zero());
        assert_eq!(total, UserEnteredCash::zero());
    }

    #[test]
    fn test_multiple_entries_are_summed() {
        let entries = vec![
            entry(dec!(300), dec!(200), dec!(0)),
            entry(dec!(200), dec!(100), dec!(50)),
        ];

        let total = UserEnteredCash::from_entries(&entries);
        assert_eq!(total.cash_collected.amount(), dec!(500));
        assert_eq!(total.card_collected.amount(), dec!(300));
        assert_eq!(total.upi_collected.amount(), dec!(50));
        assert_eq!(total.total_collected.amount(), dec!(850));
    }
}
