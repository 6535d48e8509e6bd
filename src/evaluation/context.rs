//! Shared inputs and outputs of the individual policy rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Alert, Employee, Expense, Policy, ValidationStatus};

/// Everything a rule may look at while evaluating one expense.
///
/// Built once per evaluation by [`validate`](super::validate) and lent to
/// every rule. `amount_to_check` is the amount in the policy's base currency
/// when conversion succeeded, and the submitted amount otherwise.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// The expense under evaluation.
    pub expense: &'a Expense,
    /// The employee who submitted it.
    pub employee: &'a Employee,
    /// The policy being applied.
    pub policy: &'a Policy,
    /// The amount compared against category limits.
    pub amount_to_check: Decimal,
    /// The instant the evaluation is performed "as of".
    pub as_of: DateTime<Utc>,
}

impl<'a> EvaluationContext<'a> {
    /// Creates a new evaluation context.
    pub fn new(
        expense: &'a Expense,
        employee: &'a Employee,
        policy: &'a Policy,
        amount_to_check: Decimal,
        as_of: DateTime<Utc>,
    ) -> Self {
        Self {
            expense,
            employee,
            policy,
            amount_to_check,
            as_of,
        }
    }
}

/// What a single rule decided, with the alerts explaining it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// The rule's own status, before resolution with the other rules.
    pub status: ValidationStatus,
    /// Alerts raised by this rule, in order.
    pub alerts: Vec<Alert>,
}

impl RuleOutcome {
    /// An approval with nothing to report.
    pub fn approved() -> Self {
        Self {
            status: ValidationStatus::Approved,
            alerts: Vec::new(),
        }
    }

    /// A non-approving outcome explained by one alert.
    pub fn flagged(status: ValidationStatus, alert: Alert) -> Self {
        Self {
            status,
            alerts: vec![alert],
        }
    }
}
