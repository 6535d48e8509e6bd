//! Combining individual rule statuses into one decision.

use crate::models::{Alert, AlertCode, ValidationStatus};

/// Returns the most restrictive of the given statuses.
///
/// Any `Rejected` wins outright, otherwise any `Pending`, otherwise
/// `Approved`. An empty input is `Approved`.
///
/// # Example
///
/// ```
/// use expense_policy::evaluation::most_restrictive;
/// use expense_policy::models::ValidationStatus::{self, *};
///
/// assert_eq!(most_restrictive([Approved, Pending, Approved]), Pending);
/// assert_eq!(most_restrictive([Pending, Rejected, Approved]), Rejected);
/// assert_eq!(most_restrictive(Vec::<ValidationStatus>::new()), Approved);
/// ```
pub fn most_restrictive<I>(statuses: I) -> ValidationStatus
where
    I: IntoIterator<Item = ValidationStatus>,
{
    statuses
        .into_iter()
        .max()
        .unwrap_or(ValidationStatus::Approved)
}

/// Lifts an `Approved` status to `Pending` when a conversion failed.
///
/// A failed conversion leaves category limits compared against an amount in
/// the wrong currency, so such an expense must never be approved silently.
/// `Pending` and `Rejected` pass through unchanged.
pub fn escalate_conversion_failure(status: ValidationStatus, alerts: &[Alert]) -> ValidationStatus {
    let conversion_failed = alerts
        .iter()
        .any(|alert| alert.code == AlertCode::CurrencyConversionError);

    if conversion_failed && status == ValidationStatus::Approved {
        ValidationStatus::Pending
    } else {
        status
    }
}
