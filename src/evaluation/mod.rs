//! Policy evaluation logic for the expense policy engine.
//!
//! This module contains the rate converter, the three independent policy
//! rules (age, category limit and cost center), the resolution step that
//! combines their statuses, and the [`validate`] entry point that ties them
//! together.

mod age_limit;
mod category_limit;
mod context;
mod cost_center;
mod currency;
mod days;
mod resolution;
mod validator;

use rust_decimal::{Decimal, RoundingStrategy};

pub use age_limit::check_age;
pub use category_limit::check_category_limit;
pub use context::{EvaluationContext, RuleOutcome};
pub use cost_center::check_cost_center;
pub use currency::convert;
pub use days::{days_between, days_old};
pub use resolution::{escalate_conversion_failure, most_restrictive};
pub use validator::{RULES, Rule, validate, validate_now};

/// Formats an amount with exactly two decimal places, rounding half away from zero.
pub(crate) fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
