//! Core data models for the expense policy engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod expense;
mod policy;
mod rate_table;
mod validation_result;

pub use employee::Employee;
pub use expense::{Expense, ExpenseCategory};
pub use policy::{AgeLimits, CategoryLimit, CostCenterRule, Policy};
pub use rate_table::RateTable;
pub use validation_result::{Alert, AlertCode, ValidationResult, ValidationStatus};
