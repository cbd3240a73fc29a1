//! Sale ledger read model and system-calculated aggregates
//!
//! The sale ledger is append-only and owned by the upstream nozzle-reading
//! pipeline; this subsystem only reads it. Aggregation is a pure function so
//! the exclusion rules (voided and draft records never count) are testable
//! without a database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{Money, NozzleId, SaleId, StationId, TenantId};

/// Fuel dispensed at a nozzle
///
/// A closed enumeration: codes the platform does not recognise land in
/// `Other` so their amounts stay visible in breakdowns instead of being
/// silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Cng,
    Lpg,
    Other,
}

impl FuelType {
    /// Parses a ledger fuel code; unknown codes map to `Other`
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "petrol" => FuelType::Petrol,
            "diesel" => FuelType::Diesel,
            "cng" => FuelType::Cng,
            "lpg" => FuelType::Lpg,
            _ => FuelType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Cng => "cng",
            FuelType::Lpg => "lpg",
            FuelType::Other => "other",
        }
    }
}

/// How a sale was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Credit,
}

impl PaymentMethod {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "upi" => Some(PaymentMethod::Upi),
            "credit" => Some(PaymentMethod::Credit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Credit => "credit",
        }
    }
}

/// Sale record status
///
/// Only `Posted` records count toward system-calculated totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Draft,
    Posted,
    Voided,
}

/// One row of the append-only sale ledger (read-only here)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: SaleId,
    pub tenant_id: TenantId,
    pub station_id: StationId,
    pub nozzle_id: NozzleId,
    pub fuel_type: FuelType,
    pub payment_method: PaymentMethod,
    /// Litres dispensed (kilograms for CNG/LPG)
    pub volume: Decimal,
    pub amount: Money,
    pub status: SaleStatus,
    pub recorded_at: DateTime<Utc>,
}

impl SaleRecord {
    /// True if this record counts toward system-calculated totals
    pub fn is_posted(&self) -> bool {
        self.status == SaleStatus::Posted
    }
}

/// Volume and revenue for one fuel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelAggregate {
    pub volume: Decimal,
    pub revenue: Money,
}

impl FuelAggregate {
    pub fn zero() -> Self {
        Self {
            volume: Decimal::ZERO,
            revenue: Money::zero_inr(),
        }
    }
}

/// Machine-derived sales aggregates for one (tenant, station, day)
///
/// The fuel breakdown is an ordered map so that serializing the same
/// aggregates twice yields byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCalculatedSales {
    pub total_volume: Decimal,
    pub total_revenue: Money,
    pub cash_sales: Money,
    pub card_sales: Money,
    pub upi_sales: Money,
    pub credit_sales: Money,
    pub fuel_breakdown: BTreeMap<FuelType, FuelAggregate>,
}

impl SystemCalculatedSales {
    /// All-zero aggregates: the result for a day with no posted sales
    pub fn zero() -> Self {
        Self {
            total_volume: Decimal::ZERO,
            total_revenue: Money::zero_inr(),
            cash_sales: Money::zero_inr(),
            card_sales: Money::zero_inr(),
            upi_sales: Money::zero_inr(),
            credit_sales: Money::zero_inr(),
            fuel_breakdown: BTreeMap::new(),
        }
    }

    /// Aggregates posted sale records into per-payment and per-fuel totals
    ///
    /// Draft and voided records are excluded entirely. Every posted amount
    /// counts toward the totals and toward exactly one payment-method bucket
    /// and one fuel-type bucket.
    pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> Self {
        let mut sales = Self::zero();

        for record in records {
            if !record.is_posted() {
                continue;
            }

            sales.total_volume += record.volume;
            sales.total_revenue = sales.total_revenue + record.amount;

            match record.payment_method {
                PaymentMethod::Cash => sales.cash_sales = sales.cash_sales + record.amount,
                PaymentMethod::Card => sales.card_sales = sales.card_sales + record.amount,
                PaymentMethod::Upi => sales.upi_sales = sales.upi_sales + record.amount,
                PaymentMethod::Credit => sales.credit_sales = sales.credit_sales + record.amount,
            }

            let bucket = sales
                .fuel_breakdown
                .entry(record.fuel_type)
                .or_insert_with(FuelAggregate::zero);
            bucket.volume += record.volume;
            bucket.revenue = bucket.revenue + record.amount;
        }

        sales
    }

    /// Revenue actually collectable on the day as cash/card/UPI
    ///
    /// Credit sales are settled later against the creditor's account, so they
    /// are excluded from the cash-reconciliation target.
    pub fn collected_revenue(&self) -> Money {
        self.total_revenue - self.credit_sales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(fuel: FuelType, method: PaymentMethod, volume: Decimal, amount: Decimal, status: SaleStatus) -> SaleRecord {
        SaleRecord {
            id: SaleId::new(),
            tenant_id: TenantId::new(),
            station_id: StationId::new(),
            nozzle_id: NozzleId::new(),
            fuel_type: fuel,
            payment_method: method,
            volume,
            amount: Money::inr(amount),
            status,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        let sales = SystemCalculatedSales::aggregate(&[]);
        assert_eq!(sales, SystemCalculatedSales::zero());
        assert!(sales.total_revenue.is_zero());
    }

    #[test]
    fn test_voided_and_draft_records_excluded() {
        let records = vec![
            record(FuelType::Petrol, PaymentMethod::Cash, dec!(10), dec!(1000), SaleStatus::Posted),
            record(FuelType::Petrol, PaymentMethod::Cash, dec!(5), dec!(500), SaleStatus::Voided),
            record(FuelType::Petrol, PaymentMethod::Cash, dec!(3), dec!(300), SaleStatus::Draft),
        ];

        let sales = SystemCalculatedSales::aggregate(&records);
        assert_eq!(sales.total_revenue.amount(), dec!(1000));
        assert_eq!(sales.total_volume, dec!(10));
        assert_eq!(sales.cash_sales.amount(), dec!(1000));
    }

    #[test]
    fn test_voiding_a_record_removes_it_from_totals() {
        let mut records = vec![
            record(FuelType::Diesel, PaymentMethod::Card, dec!(20), dec!(1800), SaleStatus::Posted),
            record(FuelType::Diesel, PaymentMethod::Cash, dec!(10), dec!(900), SaleStatus::Posted),
        ];

        let before = SystemCalculatedSales::aggregate(&records);
        assert_eq!(before.total_revenue.amount(), dec!(2700));

        records[1].status = SaleStatus::Voided;
        let after = SystemCalculatedSales::aggregate(&records);
        assert_eq!(after.total_revenue.amount(), dec!(1800));
        assert!(after.cash_sales.is_zero());
    }

    #[test]
    fn test_payment_method_buckets() {
        let records = vec![
            record(FuelType::Petrol, PaymentMethod::Cash, dec!(5), dec!(500), SaleStatus::Posted),
            record(FuelType::Petrol, PaymentMethod::Card, dec!(3), dec!(300), SaleStatus::Posted),
            record(FuelType::Diesel, PaymentMethod::Credit, dec!(1), dec!(100), SaleStatus::Posted),
        ];

        let sales = SystemCalculatedSales::aggregate(&records);
        assert_eq!(sales.cash_sales.amount(), dec!(500));
        assert_eq!(sales.card_sales.amount(), dec!(300));
        assert!(sales.upi_sales.is_zero());
        assert_eq!(sales.credit_sales.amount(), dec!(100));
        assert_eq!(sales.collected_revenue().amount(), dec!(800));
    }

    #[test]
    fn test_unknown_fuel_code_lands_in_other_bucket() {
        assert_eq!(FuelType::from_code("kerosene"), FuelType::Other);
        assert_eq!(FuelType::from_code("PETROL"), FuelType::Petrol);

        let records = vec![
            record(FuelType::Other, PaymentMethod::Cash, dec!(2), dec!(150), SaleStatus::Posted),
        ];
        let sales = SystemCalculatedSales::aggregate(&records);

        // Unrecognized fuel still counts toward totals and is visible
        assert_eq!(sales.total_revenue.amount(), dec!(150));
        assert_eq!(
            sales.fuel_breakdown.get(&FuelType::Other).unwrap().revenue.amount(),
            dec!(150)
        );
    }

    #[test]
    fn test_breakdown_serialization_is_deterministic() {
        let records = vec![
            record(FuelType::Lpg, PaymentMethod::Cash, dec!(1), dec!(90), SaleStatus::Posted),
            record(FuelType::Petrol, PaymentMethod::Cash, dec!(2), dec!(200), SaleStatus::Posted),
            record(FuelType::Diesel, PaymentMethod::Cash, dec!(3), dec!(270), SaleStatus::Posted),
        ];

        let sales = SystemCalculatedSales::aggregate(&records);
        let a = serde_json::to_string(&sales).unwrap();
        let b = serde_json::to_string(&SystemCalculatedSales::aggregate(&records)).unwrap();
        assert_eq!(a, b);
    }
}
