//! Expense model and category enumeration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The spending category an expense is filed under.
///
/// Policies attach spending limits and cost-center restrictions per
/// category.
///
/// # Example
///
/// ```
/// use expense_policy::models::ExpenseCategory;
///
/// assert_eq!(ExpenseCategory::from_label(" food "), ExpenseCategory::Food);
/// assert_eq!(ExpenseCategory::from_label("parking"), ExpenseCategory::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    /// Meals and groceries.
    Food,
    /// Taxis, flights, fuel and other travel.
    Transport,
    /// Licenses and subscriptions.
    Software,
    /// Hotels and other accommodation.
    Lodging,
    /// Anything that does not fit another category.
    Other,
}

impl ExpenseCategory {
    /// Returns the stable upper-case name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "FOOD",
            ExpenseCategory::Transport => "TRANSPORT",
            ExpenseCategory::Software => "SOFTWARE",
            ExpenseCategory::Lodging => "LODGING",
            ExpenseCategory::Other => "OTHER",
        }
    }

    /// Normalizes free text into a category.
    ///
    /// Matching ignores case and surrounding whitespace. Unrecognized text
    /// falls back to [`ExpenseCategory::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "FOOD" => ExpenseCategory::Food,
            "TRANSPORT" => ExpenseCategory::Transport,
            "SOFTWARE" => ExpenseCategory::Software,
            "LODGING" => ExpenseCategory::Lodging,
            _ => ExpenseCategory::Other,
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single expense submitted for reimbursement.
///
/// Evaluation never modifies an expense; any converted amount is tracked
/// separately for the duration of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for the expense.
    pub id: String,
    /// The amount as submitted, in `currency`. May be zero or negative.
    pub amount: Decimal,
    /// ISO 4217 currency code of `amount`.
    pub currency: String,
    /// The category the expense is filed under.
    pub category: ExpenseCategory,
    /// When the expense was incurred.
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_label_is_case_insensitive() {
        assert_eq!(ExpenseCategory::from_label("Transport"), ExpenseCategory::Transport);
        assert_eq!(ExpenseCategory::from_label("software"), ExpenseCategory::Software);
        assert_eq!(ExpenseCategory::from_label("LODGING"), ExpenseCategory::Lodging);
        assert_eq!(ExpenseCategory::from_label("  other\t"), ExpenseCategory::Other);
    }

    #[test]
    fn test_from_label_defaults_unknown_to_other() {
        assert_eq!(ExpenseCategory::from_label(""), ExpenseCategory::Other);
        assert_eq!(ExpenseCategory::from_label("entertainment"), ExpenseCategory::Other);
    }

    #[test]
    fn test_category_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&ExpenseCategory::Lodging).unwrap(),
            "\"LODGING\""
        );
        assert_eq!(ExpenseCategory::Food.to_string(), "FOOD");
    }

    #[test]
    fn test_deserialize_expense() {
        let json = r#"{
            "id": "exp_001",
            "amount": "120.50",
            "currency": "USD",
            "category": "FOOD",
            "date": "2025-03-01T12:30:00Z"
        }"#;

        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.id, "exp_001");
        assert_eq!(expense.amount, Decimal::new(12050, 2));
        assert_eq!(expense.category, ExpenseCategory::Food);
        assert_eq!(
            expense.date,
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap()
        );
    }
}
