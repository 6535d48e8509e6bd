//! Batch processing of historical expenses from CSV.
//!
//! [`read_rows`] decodes a file, skipping rows it cannot understand.
//! [`BatchProcessor`] then scans each row for anomalies, obtains the rate
//! table for the row's date when conversion is needed and runs the
//! evaluation engine, collecting everything into a [`BatchReport`].

mod anomalies;
mod processor;
mod rows;

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::Policy;
use crate::rates::RateProvider;

pub use anomalies::{Anomaly, AnomalyKind, AnomalyScanner, duplicate_key};
pub use processor::{BatchProcessor, BatchReport, RowFailure};
pub use rows::{BatchRow, DecodedRows, SkippedRow, read_rows};

pub(crate) use rows::parse_date;

/// Decodes the CSV file at `path` and evaluates every row.
///
/// # Errors
///
/// Returns [`EngineError::CsvError`] if the file cannot be opened or read.
/// Row-level problems never fail the run.
pub async fn process_file<P>(
    path: impl AsRef<Path>,
    policy: &Policy,
    provider: &P,
    as_of: DateTime<Utc>,
) -> EngineResult<BatchReport>
where
    P: RateProvider + ?Sized,
{
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| EngineError::CsvError {
        message: format!("cannot open '{}': {}", path.display(), e),
    })?;

    let decoded = read_rows(file)?;
    info!(
        path = %path.display(),
        rows = decoded.rows.len(),
        skipped = decoded.skipped.len(),
        "expense CSV decoded"
    );

    let mut processor = BatchProcessor::new(policy, provider);
    Ok(processor.run(decoded, as_of).await)
}
