//! Exchange rate snapshot.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A snapshot of exchange rates relative to one base currency.
///
/// `rates[code]` is how many units of `code` one unit of `base` buys. The
/// base currency itself has an implicit rate of one and need not appear in
/// `rates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// The currency every rate is relative to.
    pub base: String,
    /// Rates keyed by currency code.
    pub rates: HashMap<String, Decimal>,
}

impl RateTable {
    /// Creates a rate table from a base currency and `(code, rate)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use expense_policy::models::RateTable;
    /// use rust_decimal::Decimal;
    ///
    /// let table = RateTable::new("USD", [("EUR", Decimal::new(92, 2))]);
    /// assert_eq!(table.rate_for("USD"), Some(Decimal::ONE));
    /// assert_eq!(table.rate_for("EUR"), Some(Decimal::new(92, 2)));
    /// assert_eq!(table.rate_for("GBP"), None);
    /// ```
    pub fn new<I, S>(base: impl Into<String>, rates: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        Self {
            base: base.into(),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.into(), rate))
                .collect(),
        }
    }

    /// Resolves a currency's rate relative to the table's base.
    pub fn rate_for(&self, currency: &str) -> Option<Decimal> {
        if currency == self.base {
            return Some(Decimal::ONE);
        }
        self.rates.get(currency).copied()
    }
}
