//! Validation issues, recommended actions, and risk classification
//!
//! A pure rule pass over the computed summary figures. Rules emit typed
//! issues; the risk tier is derived from the worst issue severity and the
//! percentage deviation.

use serde::{Deserialize, Serialize};

use crate::collections::UserEnteredCash;
use crate::sales::SystemCalculatedSales;
use crate::variance::{Differences, TolerancePolicy};

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// Machine-readable issue codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// System revenue is zero; the station may not have operated
    NoSystemSales,
    /// Sales were recorded but no collections were entered
    MissingCashEntry,
    /// Deviation exceeds the acceptable percentage
    VarianceExceedsTolerance,
    /// Deviation exceeds the warning percentage but not the acceptable one
    VarianceAboveWarning,
}

/// One violated or noteworthy rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub message: String,
}

impl ValidationIssue {
    fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            message: message.into(),
        }
    }
}

/// Coarse classification of how concerning a day is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Output of the rule pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub issues: Vec<ValidationIssue>,
    pub recommended_actions: Vec<String>,
    pub risk_tier: RiskTier,
}

/// Runs the validation rules and derives the risk tier
///
/// Deterministic: the same inputs always produce the same issues in the same
/// order, so repeated summary builds are byte-identical.
pub fn classify(
    system: &SystemCalculatedSales,
    reported: &UserEnteredCash,
    diffs: &Differences,
    policy: &TolerancePolicy,
) -> Classification {
    let mut issues = Vec::new();

    if system.total_revenue.is_zero() {
        issues.push(ValidationIssue::warning(
            IssueCode::NoSystemSales,
            "No system-calculated sales for this day; the station may not have operated",
        ));
    }

    if reported.is_zero() && system.total_revenue.is_positive() {
        issues.push(ValidationIssue::error(
            IssueCode::MissingCashEntry,
            format!(
                "Sales of {} were recorded but no cash entry was submitted; a cash entry is mandatory whenever there were sales",
                system.total_revenue
            ),
        ));
    }

    let abs_percent = diffs.percent_diff.abs();
    if abs_percent > policy.acceptable_percent {
        issues.push(ValidationIssue::error(
            IssueCode::VarianceExceedsTolerance,
            format!(
                "Collections deviate {}% from system sales, beyond the {}% acceptable limit",
                diffs.percent_diff, policy.acceptable_percent
            ),
        ));
    } else if abs_percent > policy.warning_percent {
        issues.push(ValidationIssue::warning(
            IssueCode::VarianceAboveWarning,
            format!(
                "Collections deviate {}% from system sales, above the {}% warning level",
                diffs.percent_diff, policy.warning_percent
            ),
        ));
    }

    let recommended_actions = recommend_actions(system, diffs, policy);

    let has_error = issues.iter().any(|i| i.severity == IssueSeverity::Error);
    // NoSystemSales flags a possibly non-operating day, not a discrepancy;
    // only variance-related warnings raise the tier.
    let has_warning = issues
        .iter()
        .any(|i| i.severity == IssueSeverity::Warning && i.code != IssueCode::NoSystemSales);

    let risk_tier = if has_error || abs_percent > policy.acceptable_percent {
        RiskTier::High
    } else if has_warning || abs_percent > policy.warning_percent {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };

    Classification {
        issues,
        recommended_actions,
        risk_tier,
    }
}

/// Generates human-readable follow-ups per deviating channel
///
/// Channel order is fixed (cash, card, UPI) to keep output deterministic.
fn recommend_actions(
    system: &SystemCalculatedSales,
    diffs: &Differences,
    policy: &TolerancePolicy,
) -> Vec<String> {
    let mut actions = Vec::new();

    if !diffs.cash_diff.is_zero() {
        actions.push(format!(
            "Recount the cash drawer: reported cash differs from metered sales by {}",
            diffs.cash_diff
        ));
    }
    if !diffs.card_diff.is_zero() {
        actions.push(format!(
            "Check the card terminal settlement report: card collections differ by {}",
            diffs.card_diff
        ));
    }
    if !diffs.upi_diff.is_zero() {
        actions.push(format!(
            "Verify UPI transaction history: UPI collections differ by {}",
            diffs.upi_diff
        ));
    }

    if diffs.within_tolerance {
        actions.push("Collections reconcile within tolerance; the day is ready to close".to_string());
    }

    if system.total_revenue.amount() > policy.large_day_threshold.amount() {
        actions.push(format!(
            "High-value day ({} in sales); double-check before closing",
            system.total_revenue
        ));
    }

    actions
}
