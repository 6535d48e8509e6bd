//! CSV decoding of historical expenses.

use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::error::EngineResult;
use crate::models::{Employee, Expense, ExpenseCategory};

/// One decoded and checked CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    /// 1-based line number in the source file, counting the header.
    pub line: u64,
    /// The expense on this row.
    pub expense: Expense,
    /// The employee who submitted it.
    pub employee: Employee,
}

/// A row that failed decoding and was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: u64,
    /// Why the row was skipped.
    pub reason: String,
}

/// The outcome of decoding a CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRows {
    /// Rows ready for evaluation, in file order.
    pub rows: Vec<BatchRow>,
    /// Rows that were skipped.
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    expense_id: String,
    employee_id: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    cost_center: String,
    amount: String,
    currency: String,
    category: String,
    date: String,
}

/// Decodes expense rows from CSV with a header line.
///
/// Expected columns: `expense_id, employee_id, first_name, last_name,
/// cost_center, amount, currency, category, date`. Fields are trimmed.
/// Rows that cannot be decoded are skipped and reported in
/// [`DecodedRows::skipped`] rather than failing the whole file.
///
/// # Errors
///
/// Returns [`EngineError::CsvError`](crate::error::EngineError::CsvError) only when the underlying reader fails.
///
/// # Example
///
/// ```
/// use expense_policy::batch::read_rows;
///
/// let csv = "\
/// expense_id,employee_id,first_name,last_name,cost_center,amount,currency,category,date
/// exp_1,emp_1,Ana,Rojas,sales,45.10,usd,food,2025-03-01
/// exp_2,emp_1,Ana,Rojas,sales,not-a-number,USD,FOOD,2025-03-01
/// ";
/// let decoded = read_rows(csv.as_bytes()).unwrap();
/// assert_eq!(decoded.rows.len(), 1);
/// assert_eq!(decoded.rows[0].expense.currency, "USD");
/// assert_eq!(decoded.skipped.len(), 1);
/// ```
pub fn read_rows<R: Read>(reader: R) -> EngineResult<DecodedRows> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut decoded = DecodedRows::default();

    for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
        // Header is line 1
        let line = index as u64 + 2;
        let raw = match record {
            Ok(raw) => raw,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                skip(&mut decoded, line, err.to_string());
                continue;
            }
        };

        match decode_row(raw) {
            Ok((expense, employee)) => decoded.rows.push(BatchRow {
                line,
                expense,
                employee,
            }),
            Err(reason) => skip(&mut decoded, line, reason),
        }
    }

    Ok(decoded)
}

fn skip(decoded: &mut DecodedRows, line: u64, reason: String) {
    warn!(line, %reason, "skipping invalid expense row");
    decoded.skipped.push(SkippedRow { line, reason });
}

fn decode_row(raw: RawRow) -> Result<(Expense, Employee), String> {
    if raw.expense_id.is_empty() {
        return Err("expense_id is empty".to_string());
    }
    if raw.employee_id.is_empty() {
        return Err("employee_id is empty".to_string());
    }
    if raw.cost_center.is_empty() {
        return Err("cost_center is empty".to_string());
    }

    let amount = Decimal::from_str(&raw.amount)
        .map_err(|_| format!("amount '{}' is not a decimal number", raw.amount))?;
    let currency = normalize_currency(&raw.currency)
        .ok_or_else(|| format!("currency '{}' is not a three-letter code", raw.currency))?;
    let date = parse_date(&raw.date).ok_or_else(|| format!("date '{}' is not a valid date", raw.date))?;

    let expense = Expense {
        id: raw.expense_id,
        amount,
        currency,
        category: ExpenseCategory::from_label(&raw.category),
        date,
    };
    let employee = Employee {
        id: raw.employee_id,
        first_name: raw.first_name,
        last_name: raw.last_name,
        cost_center: raw.cost_center,
    };
    Ok((expense, employee))
}

fn normalize_currency(raw: &str) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())).then_some(code)
}

/// Parses an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` (taken as
/// UTC) or a bare `YYYY-MM-DD` (UTC midnight).
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}
