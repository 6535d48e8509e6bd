//! Policy loading functionality.
//!
//! This module provides the [`PolicyLoader`] type for loading reimbursement
//! policies from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::Policy;

/// Loads reimbursement policies from YAML.
///
/// # File Format
///
/// ```text
/// base_currency: USD
/// age_limits:
///   pending_after_days: 30
///   rejected_after_days: 60
/// category_limits:
///   FOOD: { approved_up_to: 100, pending_up_to: 150 }
/// cost_center_rules:
///   - cost_center_id: core_engineering
///     forbidden_category: FOOD
/// ```
///
/// `category_limits` and `cost_center_rules` may be omitted.
///
/// # Example
///
/// ```no_run
/// use expense_policy::config::PolicyLoader;
///
/// let policy = PolicyLoader::load("./config/policy.yaml")?;
/// println!("Base currency: {}", policy.base_currency);
/// # Ok::<(), expense_policy::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyLoader;

impl PolicyLoader {
    /// Loads and checks the policy stored at `path`.
    ///
    /// # Returns
    ///
    /// Returns the parsed `Policy` on success, or an error if:
    /// - The file does not exist or cannot be read (`ConfigNotFound`)
    /// - The file is not valid YAML for a policy (`ConfigParseError`)
    /// - The policy breaks a threshold invariant (`InvalidPolicy`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Policy> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let policy = Self::parse(&content).map_err(|err| match err {
            EngineError::ConfigParseError { message, .. } => EngineError::ConfigParseError {
                path: path_str.clone(),
                message,
            },
            other => other,
        })?;

        info!(
            path = %path_str,
            base_currency = %policy.base_currency,
            category_limits = policy.category_limits.len(),
            cost_center_rules = policy.cost_center_rules.len(),
            "policy loaded"
        );
        Ok(policy)
    }

    /// Parses and checks a policy from YAML text.
    ///
    /// The base currency is trimmed and upper-cased first, the same way
    /// expense currencies are read.
    pub fn parse(content: &str) -> EngineResult<Policy> {
        let mut policy: Policy =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;

        policy.base_currency = policy.base_currency.trim().to_ascii_uppercase();
        policy.check_invariants()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/policy.yaml"
    }

    #[test]
    fn test_load_bundled_policy() {
        let result = PolicyLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load policy: {:?}", result.err());

        let policy = result.unwrap();
        assert_eq!(policy.base_currency, "USD");
        assert_eq!(policy.age_limits.pending_after_days, 30);
        assert_eq!(policy.age_limits.rejected_after_days, 60);

        let food = policy.category_limit(ExpenseCategory::Food).unwrap();
        assert_eq!(food.approved_up_to, Decimal::new(100, 0));
        assert_eq!(food.pending_up_to, Decimal::new(150, 0));
        assert_eq!(
            policy.cost_center_rules[0].cost_center_id,
            "core_engineering"
        );
    }

    #[test]
    fn test_parse_minimal_policy() {
        let yaml = "
base_currency: CLP
age_limits:
  pending_after_days: 15
  rejected_after_days: 45
";
        let policy = PolicyLoader::parse(yaml).unwrap();
        assert_eq!(policy.base_currency, "CLP");
        assert!(policy.category_limits.is_empty());
        assert!(policy.cost_center_rules.is_empty());
    }

    #[test]
    fn test_parse_normalizes_base_currency() {
        let yaml = "
base_currency: \" usd \"
age_limits: { pending_after_days: 30, rejected_after_days: 60 }
";
        let policy = PolicyLoader::parse(yaml).unwrap();
        assert_eq!(policy.base_currency, "USD");

        let expense = crate::models::Expense {
            id: "exp_1".to_string(),
            amount: Decimal::new(10, 0),
            currency: "USD".to_string(),
            category: ExpenseCategory::Food,
            date: "2025-03-01T00:00:00Z".parse().unwrap(),
        };
        let employee = crate::models::Employee {
            id: "emp_1".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Rojas".to_string(),
            cost_center: "sales".to_string(),
        };
        let as_of = "2025-03-02T00:00:00Z".parse().unwrap();
        let result = crate::evaluation::validate(&expense, &employee, &policy, None, as_of).unwrap();
        assert_eq!(result.status, crate::models::ValidationStatus::Approved);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_base_currency() {
        let yaml = "
base_currency: dollars
age_limits: { pending_after_days: 30, rejected_after_days: 60 }
";
        match PolicyLoader::parse(yaml) {
            Err(EngineError::InvalidPolicy { field, .. }) => assert_eq!(field, "base_currency"),
            other => panic!("Expected InvalidPolicy, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_decimal_limits_from_strings_and_numbers() {
        let yaml = "
base_currency: USD
age_limits: { pending_after_days: 30, rejected_after_days: 60 }
category_limits:
  LODGING: { approved_up_to: \"250.50\", pending_up_to: 400 }
";
        let policy = PolicyLoader::parse(yaml).unwrap();
        let lodging = policy.category_limit(ExpenseCategory::Lodging).unwrap();
        assert_eq!(lodging.approved_up_to, Decimal::new(25050, 2));
        assert_eq!(lodging.pending_up_to, Decimal::new(400, 0));
    }

    #[test]
    fn test_parse_rejects_inverted_thresholds() {
        let yaml = "
base_currency: USD
age_limits: { pending_after_days: 90, rejected_after_days: 60 }
";
        assert!(matches!(
            PolicyLoader::parse(yaml),
            Err(EngineError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_category_key() {
        let yaml = "
base_currency: USD
age_limits: { pending_after_days: 30, rejected_after_days: 60 }
category_limits:
  GROCERIES: { approved_up_to: 10, pending_up_to: 20 }
";
        assert!(matches!(
            PolicyLoader::parse(yaml),
            Err(EngineError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        match PolicyLoader::load("/nonexistent/policy.yaml") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }
}
