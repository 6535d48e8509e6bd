//! Cost-center rule: categories a cost center may not report.

use tracing::debug;

use crate::models::{Alert, AlertCode, ValidationStatus};

use super::context::{EvaluationContext, RuleOutcome};

/// Rejects the expense if the employee's cost center is forbidden from its category.
///
/// Rules are scanned in policy order and only the first match is reported.
pub fn check_cost_center(ctx: &EvaluationContext<'_>) -> RuleOutcome {
    let cost_center = &ctx.employee.cost_center;
    let category = ctx.expense.category;

    let matched = ctx
        .policy
        .cost_center_rules
        .iter()
        .find(|rule| rule.cost_center_id == *cost_center && rule.forbidden_category == category);

    match matched {
        Some(rule) => {
            debug!(
                expense_id = %ctx.expense.id,
                cost_center = %rule.cost_center_id,
                %category,
                "cost center restriction matched"
            );
            RuleOutcome::flagged(
                ValidationStatus::Rejected,
                Alert::new(
                    AlertCode::CostCenterPolicy,
                    format!(
                        "Cost center '{}' is not allowed to report {} expenses",
                        rule.cost_center_id, rule.forbidden_category
                    ),
                ),
            )
        }
        None => RuleOutcome::approved(),
    }
}
