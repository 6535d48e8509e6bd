//! Exchange rate sources.
//!
//! The evaluation engine never performs I/O itself; it consumes a
//! [`RateTable`] obtained here. [`HttpRateProvider`] talks to a remote rate
//! service, [`StaticRateProvider`] serves one fixed table, and [`RateCache`]
//! keeps one table per calendar date for batch runs.

mod cache;
mod client;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::RateTable;

pub use cache::RateCache;
pub use client::{HttpRateProvider, parse_rates_payload};

/// Which snapshot of rates to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateQuery {
    /// The most recent rates available.
    Latest,
    /// Historical rates for a calendar date.
    On(NaiveDate),
}

impl std::fmt::Display for RateQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateQuery::Latest => write!(f, "latest"),
            RateQuery::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// A source of exchange rate tables.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the rate table for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RateFetchFailed`](crate::error::EngineError::RateFetchFailed)
    /// when the rates cannot be obtained.
    async fn fetch_rates(&self, query: RateQuery) -> EngineResult<RateTable>;
}

/// Serves the same table for every query.
///
/// Useful offline and in tests.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    table: RateTable,
}

impl StaticRateProvider {
    /// Creates a provider that always returns `table`.
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch_rates(&self, _query: RateQuery) -> EngineResult<RateTable> {
        Ok(self.table.clone())
    }
}
