//! Application state for the expense policy API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::models::Policy;
use crate::rates::RateProvider;

/// Shared application state.
///
/// Holds the loaded policy and the rate provider used when a request needs
/// conversion but carries no rate table of its own.
#[derive(Clone)]
pub struct AppState {
    policy: Arc<Policy>,
    rates: Arc<dyn RateProvider>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(policy: Policy, rates: Arc<dyn RateProvider>) -> Self {
        Self {
            policy: Arc::new(policy),
            rates,
        }
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Returns the rate provider.
    pub fn rates(&self) -> &dyn RateProvider {
        self.rates.as_ref()
    }
}
