//! Configuration loading for the expense policy engine.
//!
//! This module provides functionality to load reimbursement policies from
//! YAML files and runtime settings from the environment.
//!
//! # Example
//!
//! ```no_run
//! use expense_policy::config::{PolicyLoader, Settings};
//!
//! let settings = Settings::from_env().unwrap();
//! let policy = PolicyLoader::load(&settings.policy_path).unwrap();
//! println!("Loaded policy in {}", policy.base_currency);
//! ```

mod loader;
mod settings;

pub use loader::PolicyLoader;
pub use settings::{RatesSettings, ServerSettings, Settings};
