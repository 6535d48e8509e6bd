//! Expense Policy Engine
//!
//! This crate validates employee expense reimbursements against a company
//! policy: age thresholds, per-category spending tiers and cost-center
//! restrictions, with foreign-currency amounts converted into the policy's
//! base currency first. Every rule always runs and the most restrictive
//! status wins, with every alert preserved.
//!
//! The decision logic lives in [`evaluation`] and performs no I/O. Around
//! it sit a YAML policy loader ([`config`]), exchange rate providers
//! ([`rates`]), CSV batch processing ([`batch`]), Spanish report rendering
//! ([`report`]), an HTTP API ([`api`]) and a command line tool ([`cli`]).

#![warn(missing_docs)]

pub mod api;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod rates;
pub mod report;
pub mod telemetry;
