//! Reimbursement policy model.
//!
//! A [`Policy`] holds every threshold the evaluation rules consult. All
//! monetary thresholds are denominated in the policy's base currency.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::ExpenseCategory;

/// Age thresholds, in whole days since the expense date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeLimits {
    /// Expenses older than this many days need review.
    pub pending_after_days: u32,
    /// Expenses older than this many days are rejected.
    pub rejected_after_days: u32,
}

/// Spending tiers for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLimit {
    /// Amounts up to and including this value are approved.
    pub approved_up_to: Decimal,
    /// Amounts up to and including this value need review; anything above is rejected.
    pub pending_up_to: Decimal,
}

/// Forbids one cost center from reporting one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenterRule {
    /// The restricted cost center.
    pub cost_center_id: String,
    /// The category that cost center may not report.
    pub forbidden_category: ExpenseCategory,
}

/// A complete reimbursement policy.
///
/// # Example
///
/// ```
/// use expense_policy::models::{AgeLimits, Policy};
/// use std::collections::HashMap;
///
/// let policy = Policy {
///     base_currency: "USD".to_string(),
///     age_limits: AgeLimits { pending_after_days: 30, rejected_after_days: 60 },
///     category_limits: HashMap::new(),
///     cost_center_rules: vec![],
/// };
/// assert!(policy.check_invariants().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// The currency all thresholds are expressed in.
    pub base_currency: String,
    /// Age thresholds.
    pub age_limits: AgeLimits,
    /// Spending tiers per category. A missing entry means no limit.
    #[serde(default)]
    pub category_limits: HashMap<ExpenseCategory, CategoryLimit>,
    /// Cost-center restrictions, in author-significant order.
    #[serde(default)]
    pub cost_center_rules: Vec<CostCenterRule>,
}

impl Policy {
    /// Returns the spending tiers configured for a category, if any.
    pub fn category_limit(&self, category: ExpenseCategory) -> Option<&CategoryLimit> {
        self.category_limits.get(&category)
    }

    /// Checks the ordering invariants between paired thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPolicy`] when the base currency is not a
    /// three-letter uppercase code, when `pending_after_days >
    /// rejected_after_days`, or when any category has `approved_up_to >
    /// pending_up_to`.
    pub fn check_invariants(&self) -> EngineResult<()> {
        let code = &self.base_currency;
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(EngineError::InvalidPolicy {
                field: "base_currency".to_string(),
                message: format!("'{}' is not a three-letter uppercase currency code", code),
            });
        }

        if self.age_limits.pending_after_days > self.age_limits.rejected_after_days {
            return Err(EngineError::InvalidPolicy {
                field: "age_limits".to_string(),
                message: format!(
                    "pending_after_days ({}) exceeds rejected_after_days ({})",
                    self.age_limits.pending_after_days, self.age_limits.rejected_after_days
                ),
            });
        }

        for (category, limit) in &self.category_limits {
            if limit.approved_up_to > limit.pending_up_to {
                return Err(EngineError::InvalidPolicy {
                    field: format!("category_limits.{}", category),
                    message: format!(
                        "approved_up_to ({}) exceeds pending_up_to ({})",
                        limit.approved_up_to, limit.pending_up_to
                    ),
                });
            }
        }

        Ok(())
    }
}
