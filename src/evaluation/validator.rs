//! The validation entry point.
//!
//! [`validate`] runs the up-front amount check, normalizes currency, runs
//! every policy rule and resolves their statuses into one decision.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Alert, AlertCode, Employee, Expense, Policy, RateTable, ValidationResult, ValidationStatus,
};

use super::age_limit::check_age;
use super::category_limit::check_category_limit;
use super::context::{EvaluationContext, RuleOutcome};
use super::cost_center::check_cost_center;
use super::currency::convert;
use super::format_amount;
use super::resolution::{escalate_conversion_failure, most_restrictive};

/// A policy rule: a pure function from context to outcome.
pub type Rule = fn(&EvaluationContext<'_>) -> RuleOutcome;

/// The policy rules in alert order. All of them always run.
pub const RULES: [Rule; 3] = [check_age, check_category_limit, check_cost_center];

/// Evaluates an expense against a policy.
///
/// # Arguments
///
/// * `expense` - The expense to evaluate (never modified)
/// * `employee` - The submitting employee
/// * `policy` - The policy to apply
/// * `rates` - Exchange rates, required only when the expense currency
///   differs from the policy's base currency
/// * `as_of` - The evaluation instant used for the age rule
///
/// # Steps
///
/// 1. A zero or negative amount is rejected immediately with a single
///    `NEGATIVE_AMOUNT` alert; nothing else runs.
/// 2. A foreign-currency amount is converted into the base currency and a
///    `CURRENCY_MISMATCH` alert records the conversion. If conversion fails,
///    a `CURRENCY_CONVERSION_ERROR` alert is recorded instead and the rules
///    see the unconverted amount.
/// 3. The age, category limit and cost-center rules all run, in that order.
/// 4. The final status is the most restrictive rule status, lifted from
///    `Approved` to `Pending` if conversion failed.
///
/// Alerts appear in the order raised: conversion, age, category, cost center.
///
/// # Errors
///
/// Returns [`EngineError::MissingRateTable`] when conversion is required and
/// `rates` is `None`. Every other problem is reported through alerts.
///
/// # Example
///
/// ```
/// use expense_policy::evaluation::validate;
/// use expense_policy::models::*;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
/// use std::collections::HashMap;
///
/// let expense = Expense {
///     id: "exp_001".to_string(),
///     amount: Decimal::new(-5, 0),
///     currency: "USD".to_string(),
///     category: ExpenseCategory::Food,
///     date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
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
/// let as_of = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
/// let result = validate(&expense, &employee, &policy, None, as_of).unwrap();
/// assert_eq!(result.status, ValidationStatus::Rejected);
/// assert_eq!(result.alert_codes(), vec![AlertCode::NegativeAmount]);
/// ```
pub fn validate(
    expense: &Expense,
    employee: &Employee,
    policy: &Policy,
    rates: Option<&RateTable>,
    as_of: DateTime<Utc>,
) -> EngineResult<ValidationResult> {
    if expense.amount <= Decimal::ZERO {
        debug!(expense_id = %expense.id, amount = %expense.amount, "non-positive amount");
        return Ok(ValidationResult {
            expense_id: expense.id.clone(),
            status: ValidationStatus::Rejected,
            alerts: vec![Alert::new(
                AlertCode::NegativeAmount,
                format!(
                    "Expense amount must be positive, got {} {}",
                    format_amount(expense.amount),
                    expense.currency
                ),
            )],
        });
    }

    let mut alerts = Vec::new();
    let amount_to_check = normalize_amount(expense, policy, rates, &mut alerts)?;

    let ctx = EvaluationContext::new(expense, employee, policy, amount_to_check, as_of);
    let mut statuses = Vec::with_capacity(RULES.len());
    for rule in RULES {
        let outcome = rule(&ctx);
        statuses.push(outcome.status);
        alerts.extend(outcome.alerts);
    }

    let resolved = most_restrictive(statuses);
    let status = escalate_conversion_failure(resolved, &alerts);

    debug!(
        expense_id = %expense.id,
        %status,
        alerts = alerts.len(),
        "expense evaluated"
    );

    Ok(ValidationResult {
        expense_id: expense.id.clone(),
        status,
        alerts,
    })
}

/// Evaluates an expense as of the current instant.
///
/// See [`validate`].
pub fn validate_now(
    expense: &Expense,
    employee: &Employee,
    policy: &Policy,
    rates: Option<&RateTable>,
) -> EngineResult<ValidationResult> {
    validate(expense, employee, policy, rates, Utc::now())
}

/// Returns the amount the rules should compare, recording conversion alerts.
fn normalize_amount(
    expense: &Expense,
    policy: &Policy,
    rates: Option<&RateTable>,
    alerts: &mut Vec<Alert>,
) -> EngineResult<Decimal> {
    if expense.currency == policy.base_currency {
        return Ok(expense.amount);
    }

    let table = rates.ok_or_else(|| EngineError::MissingRateTable {
        expense_id: expense.id.clone(),
        currency: expense.currency.clone(),
        base_currency: policy.base_currency.clone(),
    })?;

    match convert(expense.amount, &expense.currency, &policy.base_currency, table) {
        Ok(converted) => {
            debug!(
                expense_id = %expense.id,
                from = %expense.currency,
                to = %policy.base_currency,
                %converted,
                "amount converted"
            );
            alerts.push(Alert::new(
                AlertCode::CurrencyMismatch,
                format!(
                    "Amount converted from {} {} to {} {}",
                    format_amount(expense.amount),
                    expense.currency,
                    format_amount(converted),
                    policy.base_currency
                ),
            ));
            Ok(converted)
        }
        Err(err) => {
            warn!(
                expense_id = %expense.id,
                from = %expense.currency,
                to = %policy.base_currency,
                error = %err,
                "currency conversion failed"
            );
            alerts.push(Alert::new(
                AlertCode::CurrencyConversionError,
                format!(
                    "Could not convert {} to {}: {}",
                    expense.currency, policy.base_currency, err
                ),
            ));
            Ok(expense.amount)
        }
    }
}
