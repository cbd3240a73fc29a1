//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the
//! reconciliation system. These fixtures are designed to be consistent and
//! predictable for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{ActorId, Money, StationId, TenantId};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard INR amount
    pub fn inr_100() -> Money {
        Money::inr(dec!(100.00))
    }

    /// A typical full-day sales figure
    pub fn inr_day_sales() -> Money {
        Money::inr(dec!(45000.00))
    }

    /// An amount above the default large-day threshold
    pub fn inr_large_day() -> Money {
        Money::inr(dec!(125000.00))
    }

    /// A zero amount
    pub fn inr_zero() -> Money {
        Money::zero_inr()
    }

    /// A shortfall amount for variance scenarios
    pub fn inr_shortfall() -> Money {
        Money::inr(dec!(-250.00))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard business date (Mar 15, 2024)
    pub fn business_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// The business date one day earlier
    pub fn previous_business_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    /// A timestamp at midday IST on [`Self::business_date`] (06:30 UTC)
    pub fn midday_on_business_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 6, 30, 0).unwrap()
    }

    /// A "now" safely after the business date
    pub fn after_business_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    /// A date far in the future for future-day rejection tests
    pub fn far_future_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()
    }
}

/// Fixture for deterministic identifiers
///
/// Fixed UUIDs keep serialized output stable across test runs.
pub struct IdFixtures;

impl IdFixtures {
    pub fn tenant_id() -> TenantId {
        TenantId::from_uuid(Uuid::from_u128(0x1111_0000_0000_0000_0000_0000_0000_0001))
    }

    pub fn other_tenant_id() -> TenantId {
        TenantId::from_uuid(Uuid::from_u128(0x1111_0000_0000_0000_0000_0000_0000_0002))
    }

    pub fn station_id() -> StationId {
        StationId::from_uuid(Uuid::from_u128(0x2222_0000_0000_0000_0000_0000_0000_0001))
    }

    pub fn other_station_id() -> StationId {
        StationId::from_uuid(Uuid::from_u128(0x2222_0000_0000_0000_0000_0000_0000_0002))
    }

    pub fn actor_id() -> ActorId {
        ActorId::from_uuid(Uuid::from_u128(0x3333_0000_0000_0000_0000_0000_0000_0001))
    }
}
