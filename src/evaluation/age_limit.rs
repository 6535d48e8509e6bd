//! Age rule: how long after the fact an expense was submitted.

use tracing::debug;

use crate::models::{Alert, AlertCode, ValidationStatus};

use super::context::{EvaluationContext, RuleOutcome};
use super::days::days_old;

/// Checks the expense's age against the policy's age thresholds.
///
/// Age is counted in whole UTC calendar days from the expense date to the
/// evaluation instant; future-dated expenses count as zero days old.
///
/// # Decision
///
/// 1. `days_old > rejected_after_days` → `Rejected`
/// 2. `days_old > pending_after_days` → `Pending`
/// 3. otherwise → `Approved`
///
/// Both thresholds are inclusive: an expense exactly `pending_after_days`
/// old is approved, and one exactly `rejected_after_days` old is pending.
/// The rejection message names the limit; the review message does not.
///
/// # Examples
///
/// ```
/// use expense_policy::evaluation::{check_age, EvaluationContext};
/// use expense_policy::models::*;
/// use chrono::{Duration, TimeZone, Utc};
/// use rust_decimal::Decimal;
/// use std::collections::HashMap;
///
/// let as_of = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
/// let expense = Expense {
///     id: "exp_001".to_string(),
///     amount: Decimal::new(20, 0),
///     currency: "USD".to_string(),
///     category: ExpenseCategory::Transport,
///     date: as_of - Duration::days(45),
/// };
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     first_name: "Ana".to_string(),
///     last_name: "Rojas".to_string(),
///     cost_center: "sales".to_string(),
/// };
/// let policy = Policy {
///     base_currency: "USD".to_string(),
///     age_limits: AgeLimits { pending_after_days: 30, rejected_after_days: 60 },
///     category_limits: HashMap::new(),
///     cost_center_rules: vec![],
/// };
///
/// let ctx = EvaluationContext::new(&expense, &employee, &policy, expense.amount, as_of);
/// let outcome = check_age(&ctx);
/// assert_eq!(outcome.status, ValidationStatus::Pending);
/// assert_eq!(outcome.alerts[0].message, "Expense is 45 days old, requires review");
/// ```
pub fn check_age(ctx: &EvaluationContext<'_>) -> RuleOutcome {
    let limits = ctx.policy.age_limits;
    let days = days_old(ctx.expense.date, ctx.as_of);

    let outcome = if days > i64::from(limits.rejected_after_days) {
        RuleOutcome::flagged(
            ValidationStatus::Rejected,
            Alert::new(
                AlertCode::AgeLimit,
                format!(
                    "Expense is {} days old, exceeds the {} day limit",
                    days, limits.rejected_after_days
                ),
            ),
        )
    } else if days > i64::from(limits.pending_after_days) {
        RuleOutcome::flagged(
            ValidationStatus::Pending,
            Alert::new(
                AlertCode::AgeLimit,
                format!("Expense is {} days old, requires review", days),
            ),
        )
    } else {
        RuleOutcome::approved()
    };

    debug!(
        expense_id = %ctx.expense.id,
        days_old = days,
        status = %outcome.status,
        "age rule evaluated"
    );
    outcome
}
