//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{
    CollectionEntryId, DifferenceId, Money, NozzleId, SaleId, StationId, TenantId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_reconciliation::{
    CollectionEntry, DifferenceStatus, FuelType, PaymentMethod, ReconciliationDifference,
    SaleRecord, SaleStatus,
};

use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Builder for sale ledger rows
pub struct SaleRecordBuilder {
    tenant_id: TenantId,
    station_id: StationId,
    nozzle_id: NozzleId,
    fuel_type: FuelType,
    payment_method: PaymentMethod,
    volume: Decimal,
    amount: Money,
    status: SaleStatus,
    recorded_at: DateTime<Utc>,
}

impl Default for SaleRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SaleRecordBuilder {
    /// Creates a builder for a posted petrol cash sale on the standard
    /// business date
    pub fn new() -> Self {
        Self {
            tenant_id: IdFixtures::tenant_id(),
            station_id: IdFixtures::station_id(),
            nozzle_id: NozzleId::new(),
            fuel_type: FuelType::Petrol,
            payment_method: PaymentMethod::Cash,
            volume: dec!(10.5),
            amount: Money::inr(dec!(1000.00)),
            status: SaleStatus::Posted,
            recorded_at: TemporalFixtures::midday_on_business_date(),
        }
    }

    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn with_station(mut self, station_id: StationId) -> Self {
        self.station_id = station_id;
        self
    }

    pub fn with_fuel_type(mut self, fuel_type: FuelType) -> Self {
        self.fuel_type = fuel_type;
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_status(mut self, status: SaleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn voided(mut self) -> Self {
        self.status = SaleStatus::Voided;
        self
    }

    pub fn with_recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = at;
        self
    }

    pub fn build(self) -> SaleRecord {
        SaleRecord {
            id: SaleId::new_v7(),
            tenant_id: self.tenant_id,
            station_id: self.station_id,
            nozzle_id: self.nozzle_id,
            fuel_type: self.fuel_type,
            payment_method: self.payment_method,
            volume: self.volume,
            amount: self.amount,
            status: self.status,
            recorded_at: self.recorded_at,
        }
    }
}

/// Builder for human-submitted collection entries
pub struct CollectionEntryBuilder {
    tenant_id: TenantId,
    station_id: StationId,
    business_date: NaiveDate,
    cash_amount: Money,
    card_amount: Money,
    upi_amount: Money,
    created_at: DateTime<Utc>,
}

impl Default for CollectionEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionEntryBuilder {
    pub fn new() -> Self {
        Self {
            tenant_id: IdFixtures::tenant_id(),
            station_id: IdFixtures::station_id(),
            business_date: TemporalFixtures::business_date(),
            cash_amount: Money::inr(dec!(1000.00)),
            card_amount: Money::zero_inr(),
            upi_amount: Money::zero_inr(),
            created_at: TemporalFixtures::midday_on_business_date(),
        }
    }

    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn with_station(mut self, station_id: StationId) -> Self {
        self.station_id = station_id;
        self
    }

    pub fn with_business_date(mut self, date: NaiveDate) -> Self {
        self.business_date = date;
        self
    }

    pub fn with_cash(mut self, amount: Money) -> Self {
        self.cash_amount = amount;
        self
    }

    pub fn with_card(mut self, amount: Money) -> Self {
        self.card_amount = amount;
        self
    }

    pub fn with_upi(mut self, amount: Money) -> Self {
        self.upi_amount = amount;
        self
    }

    pub fn build(self) -> CollectionEntry {
        CollectionEntry {
            id: CollectionEntryId::new_v7(),
            tenant_id: self.tenant_id,
            station_id: self.station_id,
            business_date: self.business_date,
            cash_amount: self.cash_amount,
            card_amount: self.card_amount,
            upi_amount: self.upi_amount,
            creditor_id: None,
            created_at: self.created_at,
        }
    }
}

/// Builder for discrepancy ledger rows
pub struct DifferenceBuilder {
    station_id: StationId,
    business_date: NaiveDate,
    reported_cash: Money,
    actual_cash: Money,
    threshold: Money,
    created_at: DateTime<Utc>,
}

impl Default for DifferenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DifferenceBuilder {
    pub fn new() -> Self {
        Self {
            station_id: IdFixtures::station_id(),
            business_date: TemporalFixtures::business_date(),
            reported_cash: Money::inr(dec!(1000.00)),
            actual_cash: Money::inr(dec!(1000.00)),
            threshold: Money::inr(dec!(1.00)),
            created_at: TemporalFixtures::midday_on_business_date(),
        }
    }

    pub fn with_station(mut self, station_id: StationId) -> Self {
        self.station_id = station_id;
        self
    }

    pub fn with_business_date(mut self, date: NaiveDate) -> Self {
        self.business_date = date;
        self
    }

    pub fn with_reported(mut self, amount: Money) -> Self {
        self.reported_cash = amount;
        self
    }

    pub fn with_actual(mut self, amount: Money) -> Self {
        self.actual_cash = amount;
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Status is derived from the two amounts, never set directly
    pub fn build(self) -> ReconciliationDifference {
        let difference = self.reported_cash - self.actual_cash;
        ReconciliationDifference {
            id: DifferenceId::new_v7(),
            station_id: self.station_id,
            business_date: self.business_date,
            reported_cash: self.reported_cash,
            actual_cash: self.actual_cash,
            difference,
            status: DifferenceStatus::classify(difference, self.threshold),
            collection_entry_id: None,
            reconciliation_id: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
