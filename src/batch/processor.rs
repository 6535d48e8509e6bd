//! Batch evaluation of decoded CSV rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::evaluation::validate;
use crate::models::{Policy, RateTable, ValidationResult, ValidationStatus};
use crate::rates::{RateCache, RateProvider};

use super::anomalies::{Anomaly, AnomalyScanner};
use super::rows::{BatchRow, DecodedRows};

/// A row whose evaluation could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// The expense on the failed row.
    pub expense_id: String,
    /// 1-based line number in the source file.
    pub line: u64,
    /// What went wrong.
    pub reason: String,
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// One result per evaluated row, in file order.
    pub results: Vec<ValidationResult>,
    /// Anomalies found while scanning, in file order.
    pub anomalies: Vec<Anomaly>,
    /// Rows that could not be evaluated.
    pub failures: Vec<RowFailure>,
    /// Rows dropped during CSV decoding.
    pub skipped_rows: usize,
}

impl BatchReport {
    /// Number of results with the given status.
    pub fn count(&self, status: ValidationStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Number of rows seen, including skipped and failed ones.
    pub fn total_rows(&self) -> usize {
        self.results.len() + self.failures.len() + self.skipped_rows
    }
}

/// Runs the policy over a batch of rows.
///
/// Rates are fetched at most once per calendar date through a
/// [`RateCache`]. A failure on one row is recorded as a [`RowFailure`] and
/// never stops the rest of the batch.
pub struct BatchProcessor<'a, P: RateProvider + ?Sized> {
    policy: &'a Policy,
    provider: &'a P,
    cache: RateCache,
    scanner: AnomalyScanner,
}

impl<'a, P: RateProvider + ?Sized> BatchProcessor<'a, P> {
    /// Creates a processor with an empty rate cache.
    pub fn new(policy: &'a Policy, provider: &'a P) -> Self {
        Self {
            policy,
            provider,
            cache: RateCache::new(),
            scanner: AnomalyScanner::new(),
        }
    }

    /// The rate cache, for inspecting how many dates were fetched.
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Evaluates every decoded row against the policy as of `as_of`.
    ///
    /// # Example
    ///
    /// ```
    /// use expense_policy::batch::{read_rows, BatchProcessor};
    /// use expense_policy::models::*;
    /// use expense_policy::rates::StaticRateProvider;
    /// use chrono::{TimeZone, Utc};
    /// use rust_decimal::Decimal;
    /// use std::collections::HashMap;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let csv = "\
    /// expense_id,employee_id,first_name,last_name,cost_center,amount,currency,category,date
    /// exp_1,emp_1,Ana,Rojas,sales,45,USD,FOOD,2025-03-01
    /// ";
    /// let policy = Policy {
    ///     base_currency: "USD".to_string(),
    ///     age_limits: AgeLimits { pending_after_days: 30, rejected_after_days: 60 },
    ///     category_limits: HashMap::new(),
    ///     cost_center_rules: vec![],
    /// };
    /// let provider = StaticRateProvider::new(RateTable::new("USD", [("CLP", Decimal::new(950, 0))]));
    /// let as_of = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
    ///
    /// let mut processor = BatchProcessor::new(&policy, &provider);
    /// let report = processor.run(read_rows(csv.as_bytes()).unwrap(), as_of).await;
    /// assert_eq!(report.count(ValidationStatus::Approved), 1);
    /// # }
    /// ```
    pub async fn run(&mut self, decoded: DecodedRows, as_of: DateTime<Utc>) -> BatchReport {
        let mut report = BatchReport {
            skipped_rows: decoded.skipped.len(),
            ..BatchReport::default()
        };

        for row in &decoded.rows {
            self.process_row(row, as_of, &mut report).await;
        }

        info!(
            evaluated = report.results.len(),
            approved = report.count(ValidationStatus::Approved),
            pending = report.count(ValidationStatus::Pending),
            rejected = report.count(ValidationStatus::Rejected),
            anomalies = report.anomalies.len(),
            failures = report.failures.len(),
            skipped = report.skipped_rows,
            rate_fetches = self.cache.fetches(),
            "batch evaluation complete"
        );
        report
    }

    async fn process_row(&mut self, row: &BatchRow, as_of: DateTime<Utc>, report: &mut BatchReport) {
        let expense = &row.expense;
        report
            .anomalies
            .extend(self.scanner.scan(expense, &row.employee));

        let needs_rates =
            expense.amount > Decimal::ZERO && expense.currency != self.policy.base_currency;
        let rates: Option<&RateTable> = if needs_rates {
            match self
                .cache
                .get_or_fetch(expense.date.date_naive(), self.provider)
                .await
            {
                Ok(table) => Some(table),
                Err(err) => {
                    warn!(expense_id = %expense.id, line = row.line, error = %err, "rate fetch failed for row");
                    report.failures.push(RowFailure {
                        expense_id: expense.id.clone(),
                        line: row.line,
                        reason: err.to_string(),
                    });
                    return;
                }
            }
        } else {
            None
        };

        match validate(expense, &row.employee, self.policy, rates, as_of) {
            Ok(result) => report.results.push(result),
            Err(err) => {
                warn!(expense_id = %expense.id, line = row.line, error = %err, "row evaluation failed");
                report.failures.push(RowFailure {
                    expense_id: expense.id.clone(),
                    line: row.line,
                    reason: err.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::AnomalyKind;
    use crate::error::{EngineError, EngineResult};
    use crate::models::{AgeLimits, AlertCode, CategoryLimit, Employee, Expense, ExpenseCategory};
    use crate::rates::RateQuery;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Serves a CLP table, except on dates listed as broken.
    struct DatedProvider {
        broken: Vec<NaiveDate>,
        queries: Mutex<Vec<RateQuery>>,
    }

    impl DatedProvider {
        fn new(broken: Vec<NaiveDate>) -> Self {
            Self {
                broken,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RateProvider for DatedProvider {
        async fn fetch_rates(&self, query: RateQuery) -> EngineResult<RateTable> {
            self.queries.lock().unwrap().push(query);
            if let RateQuery::On(date) = query {
                if self.broken.contains(&date) {
                    return Err(EngineError::RateFetchFailed {
                        query: query.to_string(),
                        message: "HTTP 503 Service Unavailable".to_string(),
                    });
                }
            }
            Ok(RateTable::new("USD", [("CLP", dec("1000"))]))
        }
    }

    fn create_test_policy() -> Policy {
        let mut category_limits = HashMap::new();
        category_limits.insert(
            ExpenseCategory::Food,
            CategoryLimit {
                approved_up_to: dec("100"),
                pending_up_to: dec("150"),
            },
        );
        Policy {
            base_currency: "USD".to_string(),
            age_limits: AgeLimits {
                pending_after_days: 30,
                rejected_after_days: 60,
            },
            category_limits,
            cost_center_rules: vec![],
        }
    }

    fn create_test_row(line: u64, id: &str, amount: &str, currency: &str, day: u32) -> BatchRow {
        BatchRow {
            line,
            expense: Expense {
                id: id.to_string(),
                amount: dec(amount),
                currency: currency.to_string(),
                category: ExpenseCategory::Food,
                date: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
            },
            employee: Employee {
                id: "emp_1".to_string(),
                first_name: "Ana".to_string(),
                last_name: "Rojas".to_string(),
                cost_center: "sales".to_string(),
            },
        }
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()
    }

    fn decoded(rows: Vec<BatchRow>) -> DecodedRows {
        DecodedRows {
            rows,
            skipped: vec![],
        }
    }

    #[tokio::test]
    async fn test_rates_fetched_once_per_date() {
        let policy = create_test_policy();
        let provider = DatedProvider::new(vec![]);
        let mut processor = BatchProcessor::new(&policy, &provider);

        let report = processor
            .run(
                decoded(vec![
                    create_test_row(2, "exp_1", "50000", "CLP", 1),
                    create_test_row(3, "exp_2", "60000", "CLP", 1),
                    create_test_row(4, "exp_3", "70000", "CLP", 2),
                    create_test_row(5, "exp_4", "20", "USD", 3),
                ]),
                as_of(),
            )
            .await;

        assert_eq!(report.results.len(), 4);
        assert_eq!(provider.queries.lock().unwrap().len(), 2);
        assert_eq!(processor.cache().len(), 2);
        assert!(report.results[0].has_alert(AlertCode::CurrencyMismatch));
        assert!(!report.results[3].has_alert(AlertCode::CurrencyMismatch));
    }

    #[tokio::test]
    async fn test_rate_failure_is_isolated_to_its_row() {
        let policy = create_test_policy();
        let broken = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let provider = DatedProvider::new(vec![broken]);
        let mut processor = BatchProcessor::new(&policy, &provider);

        let report = processor
            .run(
                decoded(vec![
                    create_test_row(2, "exp_1", "50000", "CLP", 1),
                    create_test_row(3, "exp_2", "50000", "CLP", 2),
                    create_test_row(4, "exp_3", "40", "USD", 2),
                ]),
                as_of(),
            )
            .await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].expense_id, "exp_2");
        assert_eq!(report.failures[0].line, 3);
        assert!(report.failures[0].reason.contains("503"));
        assert_eq!(report.total_rows(), 3);
    }

    #[tokio::test]
    async fn test_negative_rows_skip_rate_fetch_and_are_flagged() {
        let policy = create_test_policy();
        let provider = DatedProvider::new(vec![]);
        let mut processor = BatchProcessor::new(&policy, &provider);

        let report = processor
            .run(decoded(vec![create_test_row(2, "exp_1", "-100", "CLP", 1)]), as_of())
            .await;

        assert!(provider.queries.lock().unwrap().is_empty());
        assert_eq!(report.results[0].status, ValidationStatus::Rejected);
        assert_eq!(report.anomalies[0].kind, AnomalyKind::NegativeAmount);
    }

    #[tokio::test]
    async fn test_duplicates_are_reported_and_still_evaluated() {
        let policy = create_test_policy();
        let provider = DatedProvider::new(vec![]);
        let mut processor = BatchProcessor::new(&policy, &provider);

        let report = processor
            .run(
                decoded(vec![
                    create_test_row(2, "exp_1", "120", "USD", 1),
                    create_test_row(3, "exp_2", "120", "USD", 1),
                ]),
                as_of(),
            )
            .await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.count(ValidationStatus::Pending), 2);
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].expense_id, "exp_2");
        assert_eq!(report.anomalies[0].kind, AnomalyKind::Duplicate);
    }

    #[tokio::test]
    async fn test_skipped_rows_are_counted() {
        let policy = create_test_policy();
        let provider = DatedProvider::new(vec![]);
        let mut processor = BatchProcessor::new(&policy, &provider);

        let input = DecodedRows {
            rows: vec![create_test_row(2, "exp_1", "10", "USD", 1)],
            skipped: vec![crate::batch::SkippedRow {
                line: 3,
                reason: "amount 'x' is not a decimal number".to_string(),
            }],
        };
        let report = processor.run(input, as_of()).await;

        assert_eq!(report.skipped_rows, 1);
        assert_eq!(report.total_rows(), 2);
    }
}
