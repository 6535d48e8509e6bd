//! Batch anomaly detection: negative amounts and duplicate submissions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::evaluation::format_amount;
use crate::models::{Employee, Expense};

/// The kind of anomaly found in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    /// The amount is below zero.
    NegativeAmount,
    /// Another row with the same duplicate key came first.
    Duplicate,
}

impl AnomalyKind {
    /// Returns the stable upper-case name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::NegativeAmount => "NEGATIVE_AMOUNT",
            AnomalyKind::Duplicate => "DUPLICATE",
        }
    }
}

/// A suspicious row found while scanning a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    /// The expense on the suspicious row.
    pub expense_id: String,
    /// What was found.
    pub kind: AnomalyKind,
    /// Specifics, in English.
    pub detail: String,
}

/// Builds the key two submissions of the same expense would share.
///
/// The key combines amount, currency, UTC date, category and employee.
/// Amounts are normalized so `120` and `120.00` collide.
///
/// # Example
///
/// ```
/// use expense_policy::batch::duplicate_key;
/// use expense_policy::models::*;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let expense = Expense {
///     id: "exp_1".to_string(),
///     amount: Decimal::new(12000, 2),
///     currency: "USD".to_string(),
///     category: ExpenseCategory::Food,
///     date: Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0).unwrap(),
/// };
/// let employee = Employee {
///     id: "emp_1".to_string(),
///     first_name: "Ana".to_string(),
///     last_name: "Rojas".to_string(),
///     cost_center: "sales".to_string(),
/// };
/// assert_eq!(duplicate_key(&expense, &employee), "120|USD|2025-03-01|FOOD|emp_1");
/// ```
pub fn duplicate_key(expense: &Expense, employee: &Employee) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        expense.amount.normalize(),
        expense.currency,
        expense.date.date_naive().format("%Y-%m-%d"),
        expense.category,
        employee.id
    )
}

/// Tracks rows seen so far in a batch and flags anomalies.
#[derive(Debug, Clone, Default)]
pub struct AnomalyScanner {
    // duplicate key -> id of the first expense seen with it
    seen: HashMap<String, String>,
}

impl AnomalyScanner {
    /// Creates a scanner with no rows seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans one row, remembering it for later duplicate checks.
    ///
    /// The first row with a given key is never a duplicate; every later one is.
    pub fn scan(&mut self, expense: &Expense, employee: &Employee) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        if expense.amount.is_sign_negative() && !expense.amount.is_zero() {
            anomalies.push(Anomaly {
                expense_id: expense.id.clone(),
                kind: AnomalyKind::NegativeAmount,
                detail: format!(
                    "Negative amount {} {}",
                    format_amount(expense.amount),
                    expense.currency
                ),
            });
        }

        let key = duplicate_key(expense, employee);
        match self.seen.get(&key) {
            Some(first_id) => anomalies.push(Anomaly {
                expense_id: expense.id.clone(),
                kind: AnomalyKind::Duplicate,
                detail: format!("Duplicate of expense '{}'", first_id),
            }),
            None => {
                self.seen.insert(key, expense.id.clone());
            }
        }

        anomalies
    }
}
