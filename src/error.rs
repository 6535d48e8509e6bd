//! Error types for the expense policy engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading policies, fetching
//! exchange rates, decoding batch input and evaluating expenses.

use thiserror::Error;

/// The main error type for the expense policy engine.
///
/// Rule violations are never errors: they surface as alerts on a
/// [`ValidationResult`](crate::models::ValidationResult). This type covers
/// the failures that prevent a decision from being made at all.
///
/// # Example
///
/// ```
/// use expense_policy::error::EngineError;
///
/// let error = EngineError::CurrencyNotFound {
///     currency: "XYZ".to_string(),
/// };
/// assert_eq!(error.to_string(), "Currency not found in rate table: XYZ");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A loaded policy breaks one of its invariants.
    #[error("Invalid policy field '{field}': {message}")]
    InvalidPolicy {
        /// The offending policy field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An environment setting could not be interpreted.
    #[error("Invalid setting '{name}': {message}")]
    InvalidSetting {
        /// The name of the environment variable.
        name: String,
        /// A description of the problem.
        message: String,
    },

    /// A currency is neither the rate table's base nor one of its entries.
    #[error("Currency not found in rate table: {currency}")]
    CurrencyNotFound {
        /// The currency code that was looked up.
        currency: String,
    },

    /// A rate table entry cannot be used for conversion.
    #[error("Invalid exchange rate for {currency}: {rate}")]
    InvalidRate {
        /// The currency code carrying the rate.
        currency: String,
        /// The unusable rate as it appeared in the table.
        rate: String,
    },

    /// Conversion was required but no rate table was supplied.
    #[error(
        "No rate table supplied for expense '{expense_id}': cannot convert {currency} to {base_currency}"
    )]
    MissingRateTable {
        /// The expense being evaluated.
        expense_id: String,
        /// The expense currency.
        currency: String,
        /// The policy base currency.
        base_currency: String,
    },

    /// Fetching exchange rates from the remote provider failed.
    #[error("Failed to fetch exchange rates ({query}): {message}")]
    RateFetchFailed {
        /// The requested date, or `latest`.
        query: String,
        /// A description of the failure.
        message: String,
    },

    /// Batch input could not be read as CSV.
    #[error("CSV error: {message}")]
    CsvError {
        /// A description of the failure.
        message: String,
    },

    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP server or logging setup failed.
    #[error("Server error: {message}")]
    ServerError {
        /// A description of the failure.
        message: String,
    },
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::CsvError {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policy.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_policy_displays_field_and_message() {
        let error = EngineError::InvalidPolicy {
            field: "age_limits".to_string(),
            message: "pending_after_days exceeds rejected_after_days".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid policy field 'age_limits': pending_after_days exceeds rejected_after_days"
        );
    }

    #[test]
    fn test_missing_rate_table_names_expense_and_currencies() {
        let error = EngineError::MissingRateTable {
            expense_id: "exp_001".to_string(),
            currency: "CLP".to_string(),
            base_currency: "USD".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No rate table supplied for expense 'exp_001': cannot convert CLP to USD"
        );
    }

    #[test]
    fn test_invalid_rate_displays_currency_and_rate() {
        let error = EngineError::InvalidRate {
            currency: "EUR".to_string(),
            rate: "0".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid exchange rate for EUR: 0");
    }

    #[test]
    fn test_rate_fetch_failed_displays_query() {
        let error = EngineError::RateFetchFailed {
            query: "2025-03-01".to_string(),
            message: "HTTP 503".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to fetch exchange rates (2025-03-01): HTTP 503"
        );
    }

    #[test]
    fn test_io_error_converts_with_question_mark() {
        fn reads_missing() -> EngineResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.csv")?)
        }

        assert!(matches!(reads_missing(), Err(EngineError::Io(_))));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_currency_not_found() -> EngineResult<()> {
            Err(EngineError::CurrencyNotFound {
                currency: "XYZ".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_currency_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
