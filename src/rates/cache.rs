//! Per-date rate table cache for batch runs.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::RateTable;

use super::{RateProvider, RateQuery};

/// Rate tables keyed by calendar date.
///
/// Entries are never evicted or replaced during a run: the first table
/// stored for a date is the one every later lookup sees. Failed fetches
/// are not cached.
#[derive(Debug, Clone, Default)]
pub struct RateCache {
    tables: HashMap<NaiveDate, RateTable>,
    fetches: usize,
}

impl RateCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table for `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<&RateTable> {
        self.tables.get(&date)
    }

    /// Stores `table` for `date` unless one is already cached, returning the cached table.
    pub fn insert(&mut self, date: NaiveDate, table: RateTable) -> &RateTable {
        self.tables.entry(date).or_insert(table)
    }

    /// Returns the table for `date`, fetching it from `provider` on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error; nothing is cached in that case.
    pub async fn get_or_fetch<P>(&mut self, date: NaiveDate, provider: &P) -> EngineResult<&RateTable>
    where
        P: RateProvider + ?Sized,
    {
        if !self.tables.contains_key(&date) {
            debug!(%date, "rate cache miss");
            let table = provider.fetch_rates(RateQuery::On(date)).await?;
            self.fetches += 1;
            return Ok(self.insert(date, table));
        }
        Ok(&self.tables[&date])
    }

    /// Number of dates cached.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of successful fetches made through [`get_or_fetch`](Self::get_or_fetch).
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}
