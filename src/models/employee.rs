//! Employee model.
//!
//! This module defines the Employee struct for representing the person
//! who submitted an expense.

use serde::{Deserialize, Serialize};

/// Represents an employee submitting expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's given name.
    pub first_name: String,
    /// The employee's family name.
    pub last_name: String,
    /// The organizational unit the employee reports expenses against.
    pub cost_center: String,
}

impl Employee {
    /// Returns the employee's display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use expense_policy::models::Employee;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     first_name: "Ana".to_string(),
    ///     last_name: "Rojas".to_string(),
    ///     cost_center: "sales".to_string(),
    /// };
    /// assert_eq!(employee.full_name(), "Ana Rojas");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
