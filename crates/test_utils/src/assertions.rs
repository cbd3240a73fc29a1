//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give more
//! meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_reconciliation::ReconciliationSummary;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than
/// the tolerance.
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is exactly zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that a summary balances: zero total difference and within
/// tolerance
pub fn assert_summary_balanced(summary: &ReconciliationSummary) {
    assert!(
        summary.differences.total_diff.is_zero(),
        "Expected a balanced day, got total_diff={}",
        summary.differences.total_diff
    );
    assert!(
        summary.differences.within_tolerance,
        "Expected within tolerance, got percent_diff={}",
        summary.differences.percent_diff
    );
}

/// Asserts that a summary reports a shortfall of the given amount
pub fn assert_summary_short_by(summary: &ReconciliationSummary, shortfall: Money) {
    assert!(
        summary.differences.total_diff.is_negative(),
        "Expected a shortfall, got total_diff={}",
        summary.differences.total_diff
    );
    assert_eq!(
        summary.differences.total_diff.abs(),
        shortfall,
        "Shortfall amount mismatch"
    );
}
