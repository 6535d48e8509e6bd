//! Request types for the expense policy API.
//!
//! This module defines the JSON request structures for the `/validate`
//! endpoint. The same shape is read from disk by `expense-policy validate`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineResult;
use crate::evaluation::validate;
use crate::models::{Employee, Expense, ExpenseCategory, Policy, RateTable, ValidationResult};
use crate::rates::{RateProvider, RateQuery};

/// Request body for the `/validate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// The expense to evaluate.
    pub expense: ExpenseRequest,
    /// The submitting employee.
    pub employee: Employee,
    /// Rates to convert with. Fetched from the rate service when omitted
    /// and conversion is needed.
    #[serde(default)]
    pub rates: Option<RateTable>,
    /// Evaluation instant for the age rule. Defaults to now.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

impl ValidationRequest {
    /// Evaluates the request against `policy`.
    ///
    /// When the expense needs conversion and the request carries no rate
    /// table, the latest table is fetched from `provider`. Without a
    /// provider the evaluation fails with
    /// [`EngineError::MissingRateTable`](crate::error::EngineError::MissingRateTable).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RateFetchFailed`](crate::error::EngineError::RateFetchFailed)
    /// if fetching fails, or whatever [`validate`] returns.
    pub async fn evaluate(
        self,
        policy: &Policy,
        provider: Option<&dyn RateProvider>,
    ) -> EngineResult<ValidationResult> {
        let expense: Expense = self.expense.into();
        let as_of = self.as_of.unwrap_or_else(Utc::now);

        let needs_rates = expense.amount > Decimal::ZERO && expense.currency != policy.base_currency;
        let rates = match (self.rates, provider) {
            (Some(table), _) => Some(table),
            (None, Some(provider)) if needs_rates => {
                debug!(expense_id = %expense.id, currency = %expense.currency, "fetching latest rates");
                Some(provider.fetch_rates(RateQuery::Latest).await?)
            }
            (None, _) => None,
        };

        validate(&expense, &self.employee, policy, rates.as_ref(), as_of)
    }
}

/// Expense information in a validation request.
///
/// Category and currency are accepted in any case; unknown categories are
/// filed as `OTHER`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRequest {
    /// Unique identifier for the expense.
    pub id: String,
    /// The amount as submitted.
    pub amount: Decimal,
    /// Currency code of `amount`.
    pub currency: String,
    /// Free-text category.
    pub category: String,
    /// When the expense was incurred.
    pub date: DateTime<Utc>,
}

impl From<ExpenseRequest> for Expense {
    fn from(req: ExpenseRequest) -> Self {
        Expense {
            id: req.id,
            amount: req.amount,
            currency: req.currency.trim().to_ascii_uppercase(),
            category: ExpenseCategory::from_label(&req.category),
            date: req.date,
        }
    }
}
