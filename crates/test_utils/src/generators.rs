//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data that
//! maintains domain invariants.

use chrono::NaiveDate;
use core_kernel::Money;
use domain_reconciliation::{FuelType, PaymentMethod};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for valid positive paise amounts
pub fn positive_paise_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for paise amounts including zero
pub fn paise_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

/// Strategy for non-negative INR Money values
pub fn inr_money_strategy() -> impl Strategy<Value = Money> {
    paise_strategy().prop_map(|paise| Money::inr(Decimal::new(paise, 2)))
}

/// Strategy for strictly positive INR Money values
pub fn positive_inr_money_strategy() -> impl Strategy<Value = Money> {
    positive_paise_strategy().prop_map(|paise| Money::inr(Decimal::new(paise, 2)))
}

/// Strategy for dispensed volumes in litres (0.01 to 500.00)
pub fn volume_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..50_000i64).prop_map(|centilitres| Decimal::new(centilitres, 2))
}

/// Strategy for every fuel type
pub fn fuel_type_strategy() -> impl Strategy<Value = FuelType> {
    prop_oneof![
        Just(FuelType::Petrol),
        Just(FuelType::Diesel),
        Just(FuelType::Cng),
        Just(FuelType::Lpg),
        Just(FuelType::Other),
    ]
}

/// Strategy for every payment method
pub fn payment_method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::Card),
        Just(PaymentMethod::Upi),
        Just(PaymentMethod::Credit),
    ]
}

/// Strategy for business dates within 2024
pub fn business_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1u32..=366u32).prop_map(|ordinal| {
        NaiveDate::from_yo_opt(2024, ordinal)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
    })
}
