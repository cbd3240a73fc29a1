//! Variance calculation between system sales and reported collections
//!
//! Pure arithmetic over the two daily aggregates. The thresholds live in an
//! injected [`TolerancePolicy`] so deployments can tune them without code
//! changes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::collections::UserEnteredCash;
use crate::sales::SystemCalculatedSales;

/// Tolerance thresholds for a deployment
///
/// Two independent policies coexist deliberately (see DESIGN.md): the
/// percentage thresholds govern the summary/risk path, while the absolute
/// `cash_close_threshold` governs only the cash-close variant's mandatory
/// variance-reason rule. They are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TolerancePolicy {
    /// Deviations at or below this percentage of revenue are acceptable
    pub acceptable_percent: Decimal,
    /// Deviations above this (but within acceptable) raise a warning
    pub warning_percent: Decimal,
    /// Days with revenue above this get a high-value-day recommendation
    pub large_day_threshold: Money,
    /// Absolute cash variance above which a close requires a written reason
    pub cash_close_threshold: Money,
    /// Pre-flight closure check warns above this percentage of system sales
    pub preflight_variance_percent: Decimal,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            acceptable_percent: dec!(2.0),
            warning_percent: dec!(1.0),
            large_day_threshold: Money::inr(dec!(10000)),
            cash_close_threshold: Money::inr(dec!(1.00)),
            preflight_variance_percent: dec!(10.0),
        }
    }
}

/// Per-channel and total deltas between reported and system figures
///
/// All deltas are signed `user - system`: positive means the station reported
/// more than the ledger accounts for (over), negative means short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Differences {
    pub cash_diff: Money,
    pub card_diff: Money,
    pub upi_diff: Money,
    /// Reported total minus the collectable target (revenue less credit)
    pub total_diff: Money,
    /// Deviation as a percentage of total system revenue; zero when the
    /// station recorded no revenue
    pub percent_diff: Decimal,
    pub within_tolerance: bool,
}

/// Computes the variance block of a reconciliation summary
///
/// Deterministic and free of I/O. Credit sales are excluded from the
/// reconciliation target because they are not collected as cash/card/UPI on
/// the day. A zero-revenue day yields a zero percentage rather than a
/// division error.
pub fn compute_differences(
    system: &SystemCalculatedSales,
    reported: &UserEnteredCash,
    policy: &TolerancePolicy,
) -> Differences {
    let cash_diff = reported.cash_collected - system.cash_sales;
    let card_diff = reported.card_collected - system.card_sales;
    let upi_diff = reported.upi_collected - system.upi_sales;

    let total_diff = reported.total_collected - system.collected_revenue();

    let revenue = system.total_revenue.amount();
    let percent_diff = if revenue > Decimal::ZERO {
        (total_diff.amount() / revenue * dec!(100)).round_dp(4)
    } else {
        Decimal::ZERO
    };

    Differences {
        cash_diff,
        card_diff,
        upi_diff,
        total_diff,
        percent_diff,
        within_tolerance: percent_diff.abs() <= policy.acceptable_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn system(cash: Decimal, card: Decimal, upi: Decimal, credit: Decimal) -> SystemCalculatedSales {
        let mut s = SystemCalculatedSales::zero();
        s.cash_sales = Money::inr(cash);
        s.card_sales = Money::inr(card);
        s.upi_sales = Money::inr(upi);
        s.credit_sales = Money::inr(credit);
        s.total_revenue = Money::inr(cash + card + upi + credit);
        s
    }

    fn reported(cash: Decimal, card: Decimal, upi: Decimal) -> UserEnteredCash {
        UserEnteredCash {
            cash_collected: Money::inr(cash),
            card_collected: Money::inr(card),
            upi_collected: Money::inr(upi),
            total_collected: Money::inr(cash + card + upi),
        }
    }

    #[test]
    fn test_credit_excluded_from_target() {
        // Sales 900 of which 100 credit; collections 800 -> perfectly balanced
        let system = system(dec!(500), dec!(300), dec!(0), dec!(100));
        let user = reported(dec!(500), dec!(300), dec!(0));

        let diffs = compute_differences(&system, &user, &TolerancePolicy::default());
        assert!(diffs.cash_diff.is_zero());
        assert!(diffs.card_diff.is_zero());
        assert!(diffs.upi_diff.is_zero());
        assert!(diffs.total_diff.is_zero());
        assert_eq!(diffs.percent_diff, Decimal::ZERO);
        assert!(diffs.within_tolerance);
    }

    #[test]
    fn test_tolerance_boundary_inclusive_at_two_percent() {
        let system = system(dec!(1000), dec!(0), dec!(0), dec!(0));

        // 1020 reported over 1000 = exactly 2.0% -> within tolerance
        let at_boundary = compute_differences(
            &system,
            &reported(dec!(1020), dec!(0), dec!(0)),
            &TolerancePolicy::default(),
        );
        assert_eq!(at_boundary.percent_diff, dec!(2.0));
        assert!(at_boundary.within_tolerance);

        // 1021 = 2.1% -> out
        let over_boundary = compute_differences(
            &system,
            &reported(dec!(1021), dec!(0), dec!(0)),
            &TolerancePolicy::default(),
        );
        assert_eq!(over_boundary.percent_diff, dec!(2.1));
        assert!(!over_boundary.within_tolerance);
    }

    #[test]
    fn test_zero_revenue_day_has_zero_percent() {
        let diffs = compute_differences(
            &SystemCalculatedSales::zero(),
            &reported(dec!(50), dec!(0), dec!(0)),
            &TolerancePolicy::default(),
        );
        assert_eq!(diffs.percent_diff, Decimal::ZERO);
        assert_eq!(diffs.total_diff.amount(), dec!(50));
        // zero percent is trivially within tolerance
        assert!(diffs.within_tolerance);
    }

    #[test]
    fn test_shortfall_is_negative() {
        let system = system(dec!(1000), dec!(0), dec!(0), dec!(0));
        let diffs = compute_differences(
            &system,
            &reported(dec!(950), dec!(0), dec!(0)),
            &TolerancePolicy::default(),
        );
        assert_eq!(diffs.cash_diff.amount(), dec!(-50));
        assert_eq!(diffs.total_diff.amount(), dec!(-50));
        assert_eq!(diffs.percent_diff, dec!(-5.0));
        assert!(!diffs.within_tolerance);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// percent_diff always carries the sign of total_diff and never
        /// divides by zero
        #[test]
        fn percent_diff_sign_matches_total_diff(
            revenue in 0i64..10_000_000i64,
            collected in 0i64..10_000_000i64,
        ) {
            let mut system = SystemCalculatedSales::zero();
            system.cash_sales = Money::inr(Decimal::new(revenue, 2));
            system.total_revenue = system.cash_sales;

            let user = UserEnteredCash {
                cash_collected: Money::inr(Decimal::new(collected, 2)),
                card_collected: Money::zero_inr(),
                upi_collected: Money::zero_inr(),
                total_collected: Money::inr(Decimal::new(collected, 2)),
            };

            let diffs = compute_differences(&system, &user, &TolerancePolicy::default());

            if revenue == 0 {
                prop_assert_eq!(diffs.percent_diff, Decimal::ZERO);
            } else if diffs.total_diff.is_positive() {
                prop_assert!(diffs.percent_diff >= Decimal::ZERO);
            } else if diffs.total_diff.is_negative() {
                prop_assert!(diffs.percent_diff <= Decimal::ZERO);
            }
        }

        /// Equal figures always reconcile exactly
        #[test]
        fn identical_figures_reconcile(amount in 0i64..10_000_000i64) {
            let mut system = SystemCalculatedSales::zero();
            system.cash_sales = Money::inr(Decimal::new(amount, 2));
            system.total_revenue = system.cash_sales;

            let user = UserEnteredCash {
                cash_collected: system.cash_sales,
                card_collected: Money::zero_inr(),
                upi_collected: Money::zero_inr(),
                total_collected: system.cash_sales,
            };

            let diffs = compute_differences(&system, &user, &TolerancePolicy::default());
            prop_assert!(diffs.total_diff.is_zero());
            prop_assert!(diffs.within_tolerance);
        }
    }
}
