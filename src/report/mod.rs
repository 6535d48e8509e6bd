//! Plain-text Spanish reports for batch runs.
//!
//! The evaluation engine speaks English; localized labels live only here.
//! Each alert line keeps the engine's original message next to its label.

use crate::batch::{AnomalyKind, BatchReport};
use crate::models::{AlertCode, ValidationResult, ValidationStatus};

/// Spanish label for a status.
pub fn status_label(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Approved => "APROBADO",
        ValidationStatus::Pending => "PENDIENTE",
        ValidationStatus::Rejected => "RECHAZADO",
    }
}

/// Spanish description of an alert code.
pub fn alert_label(code: AlertCode) -> &'static str {
    match code {
        AlertCode::NegativeAmount => "Monto no positivo",
        AlertCode::CurrencyMismatch => "Monto convertido a la moneda base",
        AlertCode::CurrencyConversionError => "No se pudo convertir la moneda",
        AlertCode::AgeLimit => "Gasto con antigüedad excesiva",
        AlertCode::CategoryLimit => "Límite de la categoría excedido",
        AlertCode::CostCenterPolicy => "Categoría no permitida para el centro de costo",
    }
}

/// Spanish description of an anomaly kind.
pub fn anomaly_label(kind: AnomalyKind) -> &'static str {
    match kind {
        AnomalyKind::NegativeAmount => "Monto negativo",
        AnomalyKind::Duplicate => "Posible duplicado",
    }
}

/// Renders one result as a status line followed by one line per alert.
///
/// # Example
///
/// ```
/// use expense_policy::models::*;
/// use expense_policy::report::render_result;
///
/// let result = ValidationResult {
///     expense_id: "exp_9".to_string(),
///     status: ValidationStatus::Pending,
///     alerts: vec![Alert::new(AlertCode::AgeLimit, "Expense is 45 days old, requires review")],
/// };
/// assert_eq!(
///     render_result(&result),
///     "- exp_9: PENDIENTE\n    * [AGE_LIMIT] Gasto con antigüedad excesiva: Expense is 45 days old, requires review\n"
/// );
/// ```
pub fn render_result(result: &ValidationResult) -> String {
    let mut out = format!("- {}: {}\n", result.expense_id, status_label(result.status));
    for alert in &result.alerts {
        out.push_str(&format!(
            "    * [{}] {}: {}\n",
            alert.code,
            alert_label(alert.code),
            alert.message
        ));
    }
    out
}

/// Renders a full batch report.
pub fn render_report(report: &BatchReport) -> String {
    let mut out = String::new();
    out.push_str("REPORTE DE VALIDACIÓN DE GASTOS\n");
    out.push_str("===============================\n");
    out.push_str(&format!("Filas leídas: {}\n", report.total_rows()));
    for status in [
        ValidationStatus::Approved,
        ValidationStatus::Pending,
        ValidationStatus::Rejected,
    ] {
        out.push_str(&format!("{}: {}\n", status_label(status), report.count(status)));
    }
    out.push_str(&format!("Filas omitidas: {}\n", report.skipped_rows));
    out.push_str(&format!("Filas con error: {}\n", report.failures.len()));

    out.push_str("\nDetalle por gasto\n");
    if report.results.is_empty() {
        out.push_str("  (sin gastos evaluados)\n");
    }
    for result in &report.results {
        out.push_str(&render_result(result));
    }

    out.push_str("\nAnomalías\n");
    if report.anomalies.is_empty() {
        out.push_str("  (ninguna)\n");
    }
    for anomaly in &report.anomalies {
        out.push_str(&format!(
            "- {}: {} ({})\n",
            anomaly.expense_id,
            anomaly_label(anomaly.kind),
            anomaly.detail
        ));
    }

    if !report.failures.is_empty() {
        out.push_str("\nFilas con error\n");
        for failure in &report.failures {
            out.push_str(&format!(
                "- línea {} ({}): {}\n",
                failure.line, failure.expense_id, failure.reason
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{Anomaly, RowFailure};
    use crate::models::Alert;

    fn create_test_report() -> BatchReport {
        BatchReport {
            results: vec![
                ValidationResult {
                    expense_id: "exp_1".to_string(),
                    status: ValidationStatus::Approved,
                    alerts: vec![],
                },
                ValidationResult {
                    expense_id: "exp_2".to_string(),
                    status: ValidationStatus::Rejected,
                    alerts: vec![Alert::new(
                        AlertCode::CostCenterPolicy,
                        "Cost center 'core_engineering' is not allowed to report FOOD expenses",
                    )],
                },
            ],
            anomalies: vec![Anomaly {
                expense_id: "exp_2".to_string(),
                kind: AnomalyKind::Duplicate,
                detail: "Duplicate of expense 'exp_1'".to_string(),
            }],
            failures: vec![RowFailure {
                expense_id: "exp_3".to_string(),
                line: 4,
                reason: "Failed to fetch exchange rates (2025-03-01): HTTP 503".to_string(),
            }],
            skipped_rows: 2,
        }
    }

    #[test]
    fn test_every_alert_code_has_a_label() {
        let codes = [
            AlertCode::NegativeAmount,
            AlertCode::CurrencyMismatch,
            AlertCode::CurrencyConversionError,
            AlertCode::AgeLimit,
            AlertCode::CategoryLimit,
            AlertCode::CostCenterPolicy,
        ];
        for code in codes {
            assert!(!alert_label(code).is_empty());
        }
    }

    #[test]
    fn test_report_totals() {
        let text = render_report(&create_test_report());

        assert!(text.contains("Filas leídas: 5\n"));
        assert!(text.contains("APROBADO: 1\n"));
        assert!(text.contains("PENDIENTE: 0\n"));
        assert!(text.contains("RECHAZADO: 1\n"));
        assert!(text.contains("Filas omitidas: 2\n"));
        assert!(text.contains("Filas con error: 1\n"));
    }

    #[test]
    fn test_report_keeps_raw_alert_message() {
        let text = render_report(&create_test_report());
        assert!(text.contains(
            "    * [COST_CENTER_POLICY] Categoría no permitida para el centro de costo: \
             Cost center 'core_engineering' is not allowed to report FOOD expenses\n"
        ));
    }

    #[test]
    fn test_report_lists_anomalies_and_failures() {
        let text = render_report(&create_test_report());
        assert!(text.contains("- exp_2: Posible duplicado (Duplicate of expense 'exp_1')\n"));
        assert!(text.contains("- línea 4 (exp_3): Failed to fetch exchange rates"));
    }

    #[test]
    fn test_empty_report() {
        let text = render_report(&BatchReport::default());
        assert!(text.contains("(sin gastos evaluados)"));
        assert!(text.contains("(ninguna)"));
        assert!(!text.contains("línea"));
    }
}
