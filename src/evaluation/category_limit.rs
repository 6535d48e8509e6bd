//! Category limit rule: per-category spending tiers.

use tracing::debug;

use crate::models::{Alert, AlertCode, ValidationStatus};

use super::context::{EvaluationContext, RuleOutcome};
use super::format_amount;

/// Checks the amount to check against the expense category's spending tiers.
///
/// Categories without a configured limit are unrestricted.
///
/// # Decision
///
/// 1. `amount_to_check > pending_up_to` → `Rejected`
/// 2. `amount_to_check > approved_up_to` → `Pending`
/// 3. otherwise → `Approved`
///
/// An amount equal to a tier's ceiling belongs to that tier.
///
/// The comparison uses [`EvaluationContext::amount_to_check`], never the
/// submitted amount directly, so converted expenses are measured in the
/// policy's base currency.
pub fn check_category_limit(ctx: &EvaluationContext<'_>) -> RuleOutcome {
    let category = ctx.expense.category;
    let Some(limit) = ctx.policy.category_limit(category) else {
        debug!(expense_id = %ctx.expense.id, %category, "no category limit configured");
        return RuleOutcome::approved();
    };

    let amount = ctx.amount_to_check;
    let base = &ctx.policy.base_currency;

    let outcome = if amount > limit.pending_up_to {
        RuleOutcome::flagged(
            ValidationStatus::Rejected,
            Alert::new(
                AlertCode::CategoryLimit,
                format!(
                    "Amount {} {} exceeds maximum allowed {} {} for {}",
                    format_amount(amount),
                    base,
                    format_amount(limit.pending_up_to),
                    base,
                    category
                ),
            ),
        )
    } else if amount > limit.approved_up_to {
        RuleOutcome::flagged(
            ValidationStatus::Pending,
            Alert::new(
                AlertCode::CategoryLimit,
                format!(
                    "Amount {} {} exceeds auto-approval limit {} {} for {}, requires review",
                    format_amount(amount),
                    base,
                    format_amount(limit.approved_up_to),
                    base,
                    category
                ),
            ),
        )
    } else {
        RuleOutcome::approved()
    };

    debug!(
        expense_id = %ctx.expense.id,
        %category,
        amount = %amount,
        status = %outcome.status,
        "category limit rule evaluated"
    );
    outcome
}
