//! Scenario orchestration module
//!
//! This module contains:
//! - `runner` - Scenario lifecycle hooks and step execution
//! - `steps` - The Planity step vocabulary
//! - `ledger` - Per-step records and the JSON report
//! - `error` - Scenario error types

pub mod error;
pub mod ledger;
pub mod runner;
pub mod steps;

pub use error::ScenarioError;
pub use ledger::{sanitize_file_name, Ledger, LedgerError, StepRecord, StepStatus};
pub use runner::ScenarioRunner;
pub use steps::PlanitySteps;
