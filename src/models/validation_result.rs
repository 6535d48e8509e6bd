//! Validation result models.
//!
//! This module contains the [`ValidationResult`] type returned for every
//! evaluated expense, together with its status and alert vocabulary.

use serde::{Deserialize, Serialize};

/// The decision reached for an expense.
///
/// Variants are declared from least to most restrictive, so the derived
/// ordering gives `Approved < Pending < Rejected` and the most restrictive
/// of several statuses is simply their maximum.
///
/// # Example
///
/// ```
/// use expense_policy::models::ValidationStatus;
///
/// let worst = [ValidationStatus::Pending, ValidationStatus::Approved]
///     .into_iter()
///     .max()
///     .unwrap();
/// assert_eq!(worst, ValidationStatus::Pending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    /// The expense can be reimbursed automatically.
    Approved,
    /// The expense needs a human reviewer.
    Pending,
    /// The expense cannot be reimbursed.
    Rejected,
}

impl ValidationStatus {
    /// Returns the stable upper-case name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Approved => "APPROVED",
            ValidationStatus::Pending => "PENDING",
            ValidationStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifiers for the reasons behind a decision.
///
/// Downstream consumers match on these codes, so their serialized form
/// must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCode {
    /// The amount was zero or negative.
    NegativeAmount,
    /// The amount was converted into the policy's base currency.
    CurrencyMismatch,
    /// The amount could not be converted into the policy's base currency.
    CurrencyConversionError,
    /// The expense is older than a policy age threshold.
    AgeLimit,
    /// The amount exceeds a category spending tier.
    CategoryLimit,
    /// The employee's cost center may not report this category.
    CostCenterPolicy,
}

impl AlertCode {
    /// Returns the serialized form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCode::NegativeAmount => "NEGATIVE_AMOUNT",
            AlertCode::CurrencyMismatch => "CURRENCY_MISMATCH",
            AlertCode::CurrencyConversionError => "CURRENCY_CONVERSION_ERROR",
            AlertCode::AgeLimit => "AGE_LIMIT",
            AlertCode::CategoryLimit => "CATEGORY_LIMIT",
            AlertCode::CostCenterPolicy => "COST_CENTER_POLICY",
        }
    }
}

impl std::fmt::Display for AlertCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single explanation attached to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// What kind of problem was found.
    pub code: AlertCode,
    /// The specific numbers behind it, in English.
    pub message: String,
}

impl Alert {
    /// Creates a new alert.
    pub fn new(code: AlertCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The outcome of evaluating one expense against a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The evaluated expense's identifier.
    pub expense_id: String,
    /// The final decision.
    pub status: ValidationStatus,
    /// Every alert raised, in the order it was raised.
    pub alerts: Vec<Alert>,
}

impl ValidationResult {
    /// Returns true if any alert carries the given code.
    pub fn has_alert(&self, code: AlertCode) -> bool {
        self.alerts.iter().any(|alert| alert.code == code)
    }

    /// Returns the alert codes in the order they were raised.
    pub fn alert_codes(&self) -> Vec<AlertCode> {
        self.alerts.iter().map(|alert| alert.code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_is_most_restrictive_last() {
        assert!(ValidationStatus::Approved < ValidationStatus::Pending);
        assert!(ValidationStatus::Pending < ValidationStatus::Rejected);
    }

    #[test]
    fn test_alert_code_serialization_matches_as_str() {
        let codes = [
            AlertCode::NegativeAmount,
            AlertCode::CurrencyMismatch,
            AlertCode::CurrencyConversionError,
            AlertCode::AgeLimit,
            AlertCode::CategoryLimit,
            AlertCode::CostCenterPolicy,
        ];
        for code in codes {
            assert_eq!(
                serde_json::to_string(&code).unwrap(),
                format!("\"{}\"", code.as_str())
            );
        }
    }

    #[test]
    fn test_result_serialization_shape() {
        let result = ValidationResult {
            expense_id: "exp_001".to_string(),
            status: ValidationStatus::Pending,
            alerts: vec![Alert::new(AlertCode::AgeLimit, "Expense is 45 days old")],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["expense_id"], "exp_001");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["alerts"][0]["code"], "AGE_LIMIT");
    }

    #[test]
    fn test_has_alert_and_alert_codes() {
        let result = ValidationResult {
            expense_id: "exp_002".to_string(),
            status: ValidationStatus::Rejected,
            alerts: vec![
                Alert::new(AlertCode::CategoryLimit, "over"),
                Alert::new(AlertCode::CostCenterPolicy, "forbidden"),
            ],
        };

        assert!(result.has_alert(AlertCode::CostCenterPolicy));
        assert!(!result.has_alert(AlertCode::AgeLimit));
        assert_eq!(
            result.alert_codes(),
            vec![AlertCode::CategoryLimit, AlertCode::CostCenterPolicy]
        );
    }
}
